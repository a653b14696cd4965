//! Comma-separated files as single-sheet workbooks

use super::SpreadsheetAccessor;
use crate::domain::{CellValue, RedactorError, Result, Sheet, Workbook};
use std::path::Path;

/// CSV accessor; the sheet is named after the file stem
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvAccessor;

impl CsvAccessor {
    pub fn new() -> Self {
        Self
    }
}

impl SpreadsheetAccessor for CsvAccessor {
    fn read(&self, path: &Path) -> Result<Workbook> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| RedactorError::file_access(path, e.to_string()))?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| RedactorError::file_access(path, e.to_string()))?;
            rows.push(record.iter().map(CellValue::from).collect());
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Sheet1".to_string());

        Ok(Workbook::new(vec![Sheet::new(name, rows)]))
    }

    fn write(&self, workbook: &Workbook, path: &Path) -> Result<()> {
        let sheet = match workbook.sheets.as_slice() {
            [sheet] => sheet,
            [] => return Err(RedactorError::write(path, "workbook has no sheets")),
            _ => {
                return Err(RedactorError::write(
                    path,
                    "CSV output holds exactly one sheet",
                ))
            }
        };

        let fail = |e: csv::Error| RedactorError::write(path, e.to_string());
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(fail)?;

        for row in &sheet.rows {
            let fields: Vec<String> = row
                .iter()
                .map(|cell| cell.as_text().map(|t| t.into_owned()).unwrap_or_default())
                .collect();
            if fields.is_empty() {
                // csv skips empty records; keep the row so coordinates survive
                writer.write_record([""]).map_err(fail)?;
            } else {
                writer.write_record(&fields).map_err(fail)?;
            }
        }

        writer
            .flush()
            .map_err(|e| RedactorError::write(path, e.to_string()))
    }

    fn output_extension(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_csv_as_single_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("visits.csv");
        std::fs::write(&path, "Name,MRN,Notes\nJane Roe,AB123456,\"seen, stable\"\n").unwrap();

        let workbook = CsvAccessor::new().read(&path).unwrap();
        assert_eq!(workbook.sheets.len(), 1);
        let sheet = &workbook.sheets[0];
        assert_eq!(sheet.name, "visits");
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.cell(1, 2), Some(&CellValue::Text("seen, stable".into())));
    }

    #[test]
    fn test_write_quotes_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let workbook = Workbook::new(vec![Sheet::new(
            "out",
            vec![
                vec!["Notes".into()],
                vec!["[PERSON], stable".into(), CellValue::Number(3.0)],
            ],
        )]);

        CsvAccessor::new().write(&workbook, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Notes\n\"[PERSON], stable\",3\n");
    }

    #[test]
    fn test_write_rejects_multiple_sheets() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let workbook = Workbook::new(vec![Sheet::new("a", vec![]), Sheet::new("b", vec![])]);
        assert!(CsvAccessor::new().write(&workbook, &path).is_err());
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let err = CsvAccessor::new()
            .read(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert_eq!(err.kind(), "file_access");
    }
}
