use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use super::InputError;

/// Header names picked automatically when no column is given.
const FEEDBACK_COLUMN_HINTS: &[&str] = &["feedback", "comments"];

/// Feedback texts loaded from one column.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackColumn {
    pub column: String,
    /// Non-empty values in row order.
    pub items: Vec<String>,
    pub total_rows: usize,
    /// Rows whose cell was missing or blank.
    pub dropped: usize,
}

/// First rows of a file, for display before choosing a column.
#[derive(Debug, Clone, Serialize)]
pub struct TablePreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Trim values and drop the empty ones, keeping the survivors' order.
pub fn clean_feedback<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Index of the column whose header looks like free-text feedback.
/// Exact (case-insensitive) names win over headers that merely contain one.
pub fn detect_feedback_column(headers: &[String]) -> Option<usize> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    FEEDBACK_COLUMN_HINTS
        .iter()
        .find_map(|hint| lowered.iter().position(|h| h == hint))
        .or_else(|| {
            FEEDBACK_COLUMN_HINTS
                .iter()
                .find_map(|hint| lowered.iter().position(|h| h.contains(hint)))
        })
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(source)
}

fn open(path: &Path) -> Result<csv::Reader<File>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(reader(file))
}

fn headers_of<R: Read>(rdr: &mut csv::Reader<R>) -> Result<Vec<String>, InputError> {
    let headers = rdr.headers()?;
    if headers.is_empty() {
        return Err(InputError::MissingHeader);
    }
    Ok(headers.iter().map(str::to_string).collect())
}

fn resolve_column(headers: &[String], column: Option<&str>) -> Result<usize, InputError> {
    match column {
        Some(name) => headers
            .iter()
            .position(|h| h == name)
            .or_else(|| headers.iter().position(|h| h.eq_ignore_ascii_case(name.trim())))
            .ok_or_else(|| InputError::ColumnNotFound {
                column: name.to_string(),
                available: headers.to_vec(),
            }),
        None => detect_feedback_column(headers).ok_or_else(|| InputError::NoFeedbackColumn {
            available: headers.to_vec(),
        }),
    }
}

/// Header names of a CSV file.
pub fn read_columns(path: &Path) -> Result<Vec<String>, InputError> {
    headers_of(&mut open(path)?)
}

/// Headers plus up to `limit` data rows.
pub fn preview_rows(path: &Path, limit: usize) -> Result<TablePreview, InputError> {
    preview_from_reader(open(path)?, limit)
}

fn preview_from_reader<R: Read>(
    mut rdr: csv::Reader<R>,
    limit: usize,
) -> Result<TablePreview, InputError> {
    let headers = headers_of(&mut rdr)?;
    let mut rows = Vec::with_capacity(limit);
    for record in rdr.records().take(limit) {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(TablePreview { headers, rows })
}

/// Load the non-empty values of `column` (or the detected feedback column).
pub fn load_feedback(path: &Path, column: Option<&str>) -> Result<FeedbackColumn, InputError> {
    let loaded = feedback_from_reader(open(path)?, column)?;
    tracing::info!(
        path = %path.display(),
        column = %loaded.column,
        rows = loaded.total_rows,
        items = loaded.items.len(),
        dropped = loaded.dropped,
        "Feedback loaded"
    );
    Ok(loaded)
}

/// Same as [`load_feedback`] over any reader.
pub fn load_feedback_from_reader<R: Read>(
    source: R,
    column: Option<&str>,
) -> Result<FeedbackColumn, InputError> {
    feedback_from_reader(reader(source), column)
}

fn feedback_from_reader<R: Read>(
    mut rdr: csv::Reader<R>,
    column: Option<&str>,
) -> Result<FeedbackColumn, InputError> {
    let headers = headers_of(&mut rdr)?;
    let idx = resolve_column(&headers, column)?;

    let mut values = Vec::new();
    for record in rdr.records() {
        let record = record?;
        // Short rows are allowed; a missing cell counts as empty.
        values.push(record.get(idx).unwrap_or_default().to_string());
    }

    let total_rows = values.len();
    let items = clean_feedback(&values);

    Ok(FeedbackColumn {
        column: headers[idx].clone(),
        dropped: total_rows - items.len(),
        items,
        total_rows,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = "id,Comments,rating\n\
        1,Love the new dashboard,5\n\
        2,,3\n\
        3,\"Checkout keeps failing, please fix\",1\n\
        4,   ,2\n\
        5,\"Multi\nline note\",4\n";

    #[test]
    fn clean_feedback_drops_blank_and_keeps_order() {
        let cleaned = clean_feedback(["b", "", "  a ", "\t", "c"]);
        assert_eq!(cleaned, vec!["b", "a", "c"]);
    }

    #[test]
    fn detects_comments_column_case_insensitive() {
        let headers: Vec<String> = ["id", "Comments", "rating"].map(String::from).to_vec();
        assert_eq!(detect_feedback_column(&headers), Some(1));
    }

    #[test]
    fn exact_feedback_header_beats_partial_match() {
        let headers: Vec<String> = ["feedback_date", "feedback"].map(String::from).to_vec();
        assert_eq!(detect_feedback_column(&headers), Some(1));
    }

    #[test]
    fn partial_header_match_used_as_fallback() {
        let headers: Vec<String> = ["id", "customer_comments"].map(String::from).to_vec();
        assert_eq!(detect_feedback_column(&headers), Some(1));
        let headers: Vec<String> = ["id", "text"].map(String::from).to_vec();
        assert_eq!(detect_feedback_column(&headers), None);
    }

    #[test]
    fn loads_named_column_and_drops_empty() {
        let loaded = load_feedback_from_reader(SAMPLE.as_bytes(), Some("Comments")).unwrap();
        assert_eq!(loaded.column, "Comments");
        assert_eq!(loaded.total_rows, 5);
        assert_eq!(loaded.dropped, 2);
        assert_eq!(
            loaded.items,
            vec![
                "Love the new dashboard",
                "Checkout keeps failing, please fix",
                "Multi\nline note",
            ]
        );
    }

    #[test]
    fn column_match_falls_back_to_case_insensitive() {
        let loaded = load_feedback_from_reader(SAMPLE.as_bytes(), Some("comments")).unwrap();
        assert_eq!(loaded.column, "Comments");
    }

    #[test]
    fn auto_detects_column_when_not_given() {
        let loaded = load_feedback_from_reader(SAMPLE.as_bytes(), None).unwrap();
        assert_eq!(loaded.items.len(), 3);
    }

    #[test]
    fn unknown_column_lists_available() {
        let err = load_feedback_from_reader(SAMPLE.as_bytes(), Some("notes")).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, InputError::ColumnNotFound { .. }));
        assert!(msg.contains("id, Comments, rating"), "got: {msg}");
    }

    #[test]
    fn no_detectable_column_is_error() {
        let csv = "id,text\n1,hello\n";
        let err = load_feedback_from_reader(csv.as_bytes(), None).unwrap_err();
        assert!(matches!(err, InputError::NoFeedbackColumn { .. }));
    }

    #[test]
    fn short_rows_count_as_missing() {
        let csv = "id,feedback\n1,great\n2\n3,slow\n";
        let loaded = load_feedback_from_reader(csv.as_bytes(), None).unwrap();
        assert_eq!(loaded.items, vec!["great", "slow"]);
        assert_eq!(loaded.dropped, 1);
    }

    #[test]
    fn empty_file_has_no_header() {
        let err = load_feedback_from_reader("".as_bytes(), None).unwrap_err();
        assert!(matches!(err, InputError::MissingHeader));
    }

    #[test]
    fn header_only_file_yields_no_items() {
        let loaded = load_feedback_from_reader("feedback\n".as_bytes(), None).unwrap();
        assert!(loaded.items.is_empty());
        assert_eq!(loaded.total_rows, 0);
    }

    #[test]
    fn file_round_trip_columns_and_preview() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let columns = read_columns(file.path()).unwrap();
        assert_eq!(columns, vec!["id", "Comments", "rating"]);

        let preview = preview_rows(file.path(), 2).unwrap();
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0][1], "Love the new dashboard");

        let loaded = load_feedback(file.path(), Some("Comments")).unwrap();
        assert_eq!(loaded.items.len(), 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_columns(Path::new("/nonexistent/feedback.csv")).unwrap_err();
        assert!(matches!(err, InputError::Io { .. }));
    }
}
