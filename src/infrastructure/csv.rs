// ============================================================
// CSV TABLE
// ============================================================
// Decode uploaded bytes and parse them into a header + records table.

use csv::{ReaderBuilder, Trim};
use encoding_rs::WINDOWS_1252;

use crate::domain::error::{AppError, Result};

/// A parsed CSV upload: one header row plus zero or more data records,
/// every record the same width as the header.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse raw upload bytes into a table.
    ///
    /// Headers and fields are whitespace-trimmed. Records whose width
    /// differs from the header fail the whole parse as `Malformed`; a file
    /// with no content at all is `EmptyInput`.
    pub fn parse(bytes: &[u8]) -> Result<CsvTable> {
        let content = decode(bytes);
        if content.trim().is_empty() {
            return Err(AppError::EmptyInput);
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(b',')
            .trim(Trim::All)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::Malformed(format!("failed to read header row: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::Malformed(format!("failed to parse row {}: {}", index + 1, e))
            })?;
            records.push(record.iter().map(str::to_string).collect());
        }

        Ok(CsvTable { headers, records })
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// Decode upload bytes as UTF-8, falling back to Windows-1252 for files
/// exported by older spreadsheet tools.
fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (content, _, _) = WINDOWS_1252.decode(bytes);
            content.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let table = CsvTable::parse(b"name,type\nP-101,Pump\nR-201,Reactor").unwrap();
        assert_eq!(table.headers, vec!["name", "type"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.records[0], vec!["P-101", "Pump"]);
    }

    #[test]
    fn test_headers_and_fields_are_trimmed() {
        let table = CsvTable::parse(b" name , type \n P-101 , Pump ").unwrap();
        assert_eq!(table.headers, vec!["name", "type"]);
        assert_eq!(table.records[0], vec!["P-101", "Pump"]);
    }

    #[test]
    fn test_empty_file_is_empty_input() {
        assert!(matches!(CsvTable::parse(b""), Err(AppError::EmptyInput)));
        assert!(matches!(
            CsvTable::parse(b"  \n  "),
            Err(AppError::EmptyInput)
        ));
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let err = CsvTable::parse(b"a,b,c\n1,2,3\n4,5").unwrap_err();
        assert!(matches!(err, AppError::Malformed(_)));
    }

    #[test]
    fn test_windows_1252_fallback() {
        // "Dégazeur" encoded as Windows-1252: é = 0xE9, not valid UTF-8.
        let bytes = b"name\nD\xe9gazeur";
        let table = CsvTable::parse(bytes).unwrap();
        assert_eq!(table.records[0][0], "Dégazeur");
    }
}
