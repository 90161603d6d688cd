use crate::errors::AppError;

/// Extracts the text of an uploaded PDF brief for prompt assembly.
pub fn extract_text(data: &[u8]) -> Result<String, AppError> {
    pdf_extract::extract_text_from_mem(data)
        .map_err(|e| AppError::Validation(format!("Could not extract text from PDF: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_pdf_bytes_rejected() {
        let err = extract_text(b"this is not a pdf").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
