//! Excel and OpenDocument workbooks
//!
//! Reads `.xlsx/.xlsm/.xlsb/.xls/.ods` with calamine and writes `.xlsx` with
//! rust_xlsxwriter. Only cell values survive the round trip; formatting,
//! formulas and merged regions are not carried over. Date cells keep their
//! serial value and are written back with a date number format.

use super::SpreadsheetAccessor;
use crate::domain::{CellValue, RedactorError, Result, Sheet, Workbook};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Excel-family accessor
#[derive(Debug, Default, Clone, Copy)]
pub struct ExcelAccessor;

impl ExcelAccessor {
    pub fn new() -> Self {
        Self
    }
}

impl SpreadsheetAccessor for ExcelAccessor {
    fn read(&self, path: &Path) -> Result<Workbook> {
        let mut source =
            open_workbook_auto(path).map_err(|e| RedactorError::file_access(path, e.to_string()))?;

        let names: Vec<String> = source.sheet_names().iter().cloned().collect();
        let mut sheets = Vec::with_capacity(names.len());

        for name in names {
            let range = source.worksheet_range(&name).map_err(|e| {
                RedactorError::file_access(path, format!("sheet '{name}': {e}"))
            })?;

            // Ranges start at the first used cell; pad so indices match the sheet
            let (row_offset, col_offset) = range
                .start()
                .map(|(r, c)| (r as usize, c as usize))
                .unwrap_or((0, 0));

            let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
            for source_row in range.rows() {
                let mut row = vec![CellValue::Empty; col_offset];
                row.extend(source_row.iter().map(convert_cell));
                while matches!(row.last(), Some(CellValue::Empty)) {
                    row.pop();
                }
                rows.push(row);
            }

            sheets.push(Sheet::new(name, rows));
        }

        Ok(Workbook::new(sheets))
    }

    fn write(&self, workbook: &Workbook, path: &Path) -> Result<()> {
        let mut output = rust_xlsxwriter::Workbook::new();
        let date_format = rust_xlsxwriter::Format::new().set_num_format(DATE_FORMAT);
        let datetime_format = rust_xlsxwriter::Format::new().set_num_format(DATETIME_FORMAT);
        let fail = |e: rust_xlsxwriter::XlsxError| RedactorError::write(path, e.to_string());

        for sheet in &workbook.sheets {
            let worksheet = output.add_worksheet();
            worksheet.set_name(sheet.name.as_str()).map_err(fail)?;

            for (r, row) in sheet.rows.iter().enumerate() {
                let r = u32::try_from(r)
                    .map_err(|_| RedactorError::write(path, "row index exceeds sheet limits"))?;
                for (c, cell) in row.iter().enumerate() {
                    let c = u16::try_from(c).map_err(|_| {
                        RedactorError::write(path, "column index exceeds sheet limits")
                    })?;
                    match cell {
                        CellValue::Empty => {}
                        CellValue::Text(s) => {
                            worksheet.write_string(r, c, s.as_str()).map_err(fail)?;
                        }
                        CellValue::Number(n) => {
                            worksheet.write_number(r, c, *n).map_err(fail)?;
                        }
                        CellValue::Bool(b) => {
                            worksheet.write_boolean(r, c, *b).map_err(fail)?;
                        }
                        CellValue::DateTime { serial, .. } => {
                            let format = if serial.fract() == 0.0 {
                                &date_format
                            } else {
                                &datetime_format
                            };
                            worksheet
                                .write_number_with_format(r, c, *serial, format)
                                .map_err(fail)?;
                        }
                    }
                }
            }
        }

        output.save(path).map_err(fail)
    }

    fn output_extension(&self) -> &'static str {
        "xlsx"
    }
}

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => {
                let iso = if value.time() == chrono::NaiveTime::MIN {
                    value.format("%Y-%m-%d").to_string()
                } else {
                    value.format("%Y-%m-%d %H:%M:%S").to_string()
                };
                CellValue::DateTime {
                    serial: dt.as_f64(),
                    iso,
                }
            }
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_convert_scalar_cells() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(convert_cell(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(convert_cell(&Data::Int(42)), CellValue::Number(42.0));
        assert_eq!(
            convert_cell(&Data::String("AB123456".into())),
            CellValue::Text("AB123456".into())
        );
        assert_eq!(convert_cell(&Data::Bool(false)), CellValue::Bool(false));
    }

    #[test]
    fn test_write_then_read_preserves_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roundtrip.xlsx");

        let workbook = Workbook::new(vec![
            Sheet::new(
                "Patients",
                vec![
                    vec!["Name".into(), "Age".into()],
                    vec!["[PERSON]".into(), CellValue::Number(47.0)],
                    vec![CellValue::Empty, CellValue::Empty],
                    vec![CellValue::Empty, CellValue::Bool(true)],
                ],
            ),
            Sheet::new("Notes", vec![vec!["free text".into()]]),
        ]);

        let accessor = ExcelAccessor::new();
        accessor.write(&workbook, &path).unwrap();
        let read = accessor.read(&path).unwrap();

        assert_eq!(read.sheets.len(), 2);
        assert_eq!(read.sheets[0].name, "Patients");
        assert_eq!(read.sheets[1].name, "Notes");
        assert_eq!(
            read.sheets[0].cell(1, 0),
            Some(&CellValue::Text("[PERSON]".into()))
        );
        assert_eq!(read.sheets[0].cell(1, 1), Some(&CellValue::Number(47.0)));
        assert_eq!(read.sheets[0].cell(3, 1), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn test_dates_keep_their_type_through_write_and_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dates.xlsx");

        let visit = CellValue::DateTime {
            serial: 45306.0,
            iso: "2024-01-15".into(),
        };
        let admitted = CellValue::DateTime {
            serial: 45306.5,
            iso: "2024-01-15 12:00:00".into(),
        };
        let workbook = Workbook::new(vec![Sheet::new(
            "Visits",
            vec![
                vec!["Visit".into(), "Admitted".into()],
                vec![visit.clone(), admitted.clone()],
            ],
        )]);

        let accessor = ExcelAccessor::new();
        accessor.write(&workbook, &path).unwrap();
        let read = accessor.read(&path).unwrap();

        assert_eq!(read.sheets[0].cell(1, 0), Some(&visit));
        assert_eq!(read.sheets[0].cell(1, 1), Some(&admitted));
    }

    #[test]
    fn test_read_corrupt_file_is_file_access_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();

        let err = ExcelAccessor::new().read(&path).unwrap_err();
        assert_eq!(err.kind(), "file_access");
    }

    #[test]
    fn test_invalid_sheet_name_is_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.xlsx");
        let workbook = Workbook::new(vec![Sheet::new("bad[name]", vec![])]);

        let err = ExcelAccessor::new().write(&workbook, &path).unwrap_err();
        assert_eq!(err.kind(), "write");
    }
}
