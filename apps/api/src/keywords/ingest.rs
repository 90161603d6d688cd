//! CSV ingestion adapter for keyword-research exports.
//!
//! Research tools shipped at least two incompatible header schemas over time
//! (`Volume`/`Keyword Difficulty`/`CPC (GBP)` vs `Search Volume`/`Difficulty`/
//! `CPC`), so columns are resolved by alias lookup rather than position.
//!
//! Cell-level failures are recovered locally: unparseable volume and CPC
//! become 0, unparseable difficulty becomes the 100 sentinel with
//! `difficulty_missing` set so the ranker's filter can still honor the
//! "unknown difficulty" branch. Structural failures (a required column absent
//! from the header row) are fatal for the batch and name it.

use crate::errors::AppError;
use crate::keywords::ranker::{KeywordBatch, KeywordRow};

const KEYWORD_ALIASES: &[&str] = &["keyword"];
const VOLUME_ALIASES: &[&str] = &["volume", "search volume"];
const DIFFICULTY_ALIASES: &[&str] = &["keyword difficulty", "difficulty"];
const CPC_ALIASES: &[&str] = &["cpc (gbp)", "cpc (usd)", "cpc"];

/// Resolved column positions for one CSV file.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    keyword: usize,
    volume: usize,
    difficulty: usize,
    cpc: usize,
}

/// Parses one uploaded CSV into a tagged batch of normalized rows.
pub fn parse_batch(source: &str, data: &[u8]) -> Result<KeywordBatch, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(data);

    let headers = reader.headers().map_err(|e| AppError::MalformedInput {
        batch: source.to_string(),
        reason: format!("unreadable header row: {e}"),
    })?;
    let columns = resolve_columns(source, headers)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::MalformedInput {
            batch: source.to_string(),
            reason: format!("unreadable record: {e}"),
        })?;

        let keyword = cell(&record, columns.keyword).to_string();
        let volume = parse_cell(cell(&record, columns.volume)).unwrap_or(0.0);
        let cpc = parse_cell(cell(&record, columns.cpc)).unwrap_or(0.0);
        let (difficulty, difficulty_missing) = match parse_cell(cell(&record, columns.difficulty)) {
            Some(d) => (d, false),
            None => (100.0, true),
        };

        rows.push(KeywordRow {
            keyword,
            volume,
            difficulty,
            difficulty_missing,
            cpc,
            source: source.to_string(),
        });
    }

    Ok(KeywordBatch {
        source: source.to_string(),
        rows,
    })
}

fn resolve_columns(source: &str, headers: &csv::StringRecord) -> Result<ColumnMap, AppError> {
    let find = |aliases: &[&str], label: &str| -> Result<usize, AppError> {
        headers
            .iter()
            .position(|h| {
                let h = h.trim().trim_start_matches('\u{feff}').to_lowercase();
                aliases.contains(&h.as_str())
            })
            .ok_or_else(|| AppError::MalformedInput {
                batch: source.to_string(),
                reason: format!(
                    "no {label} column found (expected one of: {})",
                    aliases.join(", ")
                ),
            })
    };

    Ok(ColumnMap {
        keyword: find(KEYWORD_ALIASES, "keyword")?,
        volume: find(VOLUME_ALIASES, "volume")?,
        difficulty: find(DIFFICULTY_ALIASES, "difficulty")?,
        cpc: find(CPC_ALIASES, "cpc")?,
    })
}

fn cell<'a>(record: &'a csv::StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("").trim()
}

/// Numeric coercion for one cell. `None` means missing or unparseable —
/// the caller substitutes the documented default. Negative and non-finite
/// values are rejected too: volume, difficulty, and CPC are all non-negative
/// quantities, and a negative volume would make the ranker's log score NaN.
fn parse_cell(raw: &str) -> Option<f64> {
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_legacy_schema() {
        let csv = "Keyword,Volume,Keyword Difficulty,CPC (GBP)\n\
                   garden sheds,1200,45,0.62\n\
                   shed base kits,90,22,0.18\n";
        let batch = parse_batch("acme_csv_file_1", csv.as_bytes()).unwrap();

        assert_eq!(batch.source, "acme_csv_file_1");
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].keyword, "garden sheds");
        assert_eq!(batch.rows[0].volume, 1200.0);
        assert_eq!(batch.rows[0].difficulty, 45.0);
        assert!(!batch.rows[0].difficulty_missing);
        assert_eq!(batch.rows[0].cpc, 0.62);
        assert_eq!(batch.rows[0].source, "acme_csv_file_1");
    }

    #[test]
    fn test_parses_revised_schema() {
        let csv = "Keyword,Search Volume,Difficulty,CPC\n\
                   timber decking,480,38,1.05\n";
        let batch = parse_batch("acme_csv_file_2", csv.as_bytes()).unwrap();

        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.rows[0].volume, 480.0);
        assert_eq!(batch.rows[0].difficulty, 38.0);
        assert_eq!(batch.rows[0].cpc, 1.05);
    }

    #[test]
    fn test_header_match_is_case_insensitive() {
        let csv = "KEYWORD,volume,keyword difficulty,CPC (gbp)\nfence panels,300,20,0.4\n";
        let batch = parse_batch("b", csv.as_bytes()).unwrap();
        assert_eq!(batch.rows[0].keyword, "fence panels");
    }

    #[test]
    fn test_unparseable_cells_substitute_defaults() {
        let csv = "Keyword,Volume,Keyword Difficulty,CPC (GBP)\n\
                   messy row,n/a,,not-a-number\n";
        let batch = parse_batch("b", csv.as_bytes()).unwrap();

        let row = &batch.rows[0];
        assert_eq!(row.volume, 0.0);
        assert_eq!(row.cpc, 0.0);
        assert_eq!(row.difficulty, 100.0);
        assert!(row.difficulty_missing, "blank difficulty must set the flag");
    }

    #[test]
    fn test_parsed_difficulty_clears_missing_flag() {
        let csv = "Keyword,Volume,Keyword Difficulty,CPC (GBP)\nhard term,10,100,0.1\n";
        let batch = parse_batch("b", csv.as_bytes()).unwrap();
        assert_eq!(batch.rows[0].difficulty, 100.0);
        assert!(
            !batch.rows[0].difficulty_missing,
            "a real 100 is not a missing value"
        );
    }

    #[test]
    fn test_short_record_treated_as_missing_cells() {
        let csv = "Keyword,Volume,Keyword Difficulty,CPC (GBP)\nbare keyword\n";
        let batch = parse_batch("b", csv.as_bytes()).unwrap();
        let row = &batch.rows[0];
        assert_eq!(row.keyword, "bare keyword");
        assert_eq!(row.volume, 0.0);
        assert!(row.difficulty_missing);
    }

    #[test]
    fn test_missing_column_is_fatal_and_names_batch() {
        let csv = "Keyword,Volume,CPC (GBP)\nterm,100,0.5\n";
        let err = parse_batch("acme_csv_file_3", csv.as_bytes()).unwrap_err();
        match err {
            AppError::MalformedInput { batch, reason } => {
                assert_eq!(batch, "acme_csv_file_3");
                assert!(reason.contains("difficulty"), "reason was: {reason}");
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_cells_substitute_defaults() {
        // A negative volume would reach ln() as a negative argument downstream
        let csv = "Keyword,Volume,Keyword Difficulty,CPC (GBP)\n\
                   refund row,-5,-10,-0.5\n";
        let batch = parse_batch("b", csv.as_bytes()).unwrap();

        let row = &batch.rows[0];
        assert_eq!(row.volume, 0.0);
        assert_eq!(row.cpc, 0.0);
        assert_eq!(row.difficulty, 100.0);
        assert!(row.difficulty_missing, "negative difficulty is not a real value");
    }

    #[test]
    fn test_non_finite_cells_substitute_defaults() {
        let csv = "Keyword,Volume,Keyword Difficulty,CPC (GBP)\n\
                   odd row,inf,NaN,-inf\n";
        let batch = parse_batch("b", csv.as_bytes()).unwrap();

        let row = &batch.rows[0];
        assert_eq!(row.volume, 0.0);
        assert_eq!(row.cpc, 0.0);
        assert!(row.difficulty_missing);
    }

    #[test]
    fn test_headers_only_file_yields_empty_batch() {
        let csv = "Keyword,Volume,Keyword Difficulty,CPC (GBP)\n";
        let batch = parse_batch("b", csv.as_bytes()).unwrap();
        assert!(batch.rows.is_empty());
    }

    #[test]
    fn test_empty_keyword_cell_is_kept_unvalidated() {
        // Keyword text is not validated at this layer
        let csv = "Keyword,Volume,Keyword Difficulty,CPC (GBP)\n,500,30,0.6\n";
        let batch = parse_batch("b", csv.as_bytes()).unwrap();
        assert_eq!(batch.rows[0].keyword, "");
        assert_eq!(batch.rows[0].volume, 500.0);
    }
}
