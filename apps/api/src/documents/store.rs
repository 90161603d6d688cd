//! Thin object-store wrapper. All S3 access goes through these helpers so
//! handlers deal in `Bytes` and `AppError` only.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;

use crate::errors::AppError;

pub async fn put_object(
    s3: &S3Client,
    bucket: &str,
    key: &str,
    body: Bytes,
    content_type: &str,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .content_type(content_type)
        .body(ByteStream::from(body))
        .send()
        .await
        .map_err(|e| AppError::S3(format!("put {key}: {e}")))?;
    Ok(())
}

/// Fetches an object, returning `None` when the key does not exist.
pub async fn get_object(
    s3: &S3Client,
    bucket: &str,
    key: &str,
) -> Result<Option<Bytes>, AppError> {
    let result = s3.get_object().bucket(bucket).key(key).send().await;

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            let service_error = e.into_service_error();
            if service_error.is_no_such_key() {
                return Ok(None);
            }
            return Err(AppError::S3(format!("get {key}: {service_error}")));
        }
    };

    let data = output
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("read {key}: {e}")))?;
    Ok(Some(data.into_bytes()))
}

/// Fetches an object as UTF-8 text, erroring if the key is absent.
pub async fn get_text(s3: &S3Client, bucket: &str, key: &str) -> Result<String, AppError> {
    let bytes = get_object(s3, bucket, key)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Object {key} not found")))?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| AppError::S3(format!("object {key} is not valid UTF-8: {e}")))
}
