//! Spreadsheet accessors
//!
//! Reading and writing tabular files is isolated behind
//! [`SpreadsheetAccessor`]. Implementations are synchronous; the pipeline
//! calls them from blocking tasks.

pub mod csv;
pub mod excel;

pub use self::csv::CsvAccessor;
pub use excel::ExcelAccessor;

use crate::domain::{RedactorError, Result, Workbook};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Trait for tabular file formats
pub trait SpreadsheetAccessor: Send + Sync {
    /// Reads every sheet of `path`
    ///
    /// # Errors
    ///
    /// Returns `RedactorError::FileAccess` if the file is missing, corrupt or
    /// in an unsupported layout.
    fn read(&self, path: &Path) -> Result<Workbook>;

    /// Writes `workbook` to exactly `path`, overwriting it
    ///
    /// # Errors
    ///
    /// Returns `RedactorError::Write` on any failure.
    fn write(&self, workbook: &Workbook, path: &Path) -> Result<()>;

    /// Extension (without dot) of files produced by [`write`](Self::write)
    fn output_extension(&self) -> &'static str;
}

/// Extensions accepted as input
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"];

/// Selects an accessor by file extension
///
/// # Errors
///
/// Returns `RedactorError::FileAccess` for unsupported extensions.
pub fn accessor_for(path: &Path) -> Result<Arc<dyn SpreadsheetAccessor>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => Ok(Arc::new(CsvAccessor::new())),
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Arc::new(ExcelAccessor::new())),
        _ => Err(RedactorError::file_access(
            path,
            format!(
                "unsupported file type; expected one of: {}",
                SUPPORTED_EXTENSIONS.join(", ")
            ),
        )),
    }
}

/// Writes through a sibling temporary file and renames it over `target`
///
/// A previous output at `target` is only replaced once the new file is
/// complete. With `replace_existing = false` an existing target is an error.
pub fn write_atomically<F>(target: &Path, replace_existing: bool, write: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    if target.exists() && !replace_existing {
        return Err(RedactorError::write(
            target,
            "output already exists and output.replace_existing is false",
        ));
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| RedactorError::write(target, format!("cannot create directory: {e}")))?;
    }

    let temp = temp_path_for(target);
    if let Err(e) = write(&temp) {
        let _ = std::fs::remove_file(&temp);
        return Err(e);
    }

    if let Err(first) = std::fs::rename(&temp, target) {
        // Some platforms refuse to rename over an existing file
        let retried = std::fs::remove_file(target).and_then(|_| std::fs::rename(&temp, target));
        if retried.is_err() {
            let _ = std::fs::remove_file(&temp);
            return Err(RedactorError::write(target, first.to_string()));
        }
    }
    Ok(())
}

fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    target.with_file_name(format!(".{name}.{}.partial", uuid::Uuid::new_v4().simple()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_accessor_selection() {
        assert_eq!(
            accessor_for(Path::new("a/Patients.XLSX")).unwrap().output_extension(),
            "xlsx"
        );
        assert_eq!(
            accessor_for(Path::new("legacy.xls")).unwrap().output_extension(),
            "xlsx"
        );
        assert_eq!(
            accessor_for(Path::new("visits.csv")).unwrap().output_extension(),
            "csv"
        );
        let err = accessor_for(Path::new("notes.docx")).err().unwrap();
        assert_eq!(err.kind(), "file_access");
        assert!(accessor_for(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_write_atomically_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.txt");
        std::fs::write(&target, "old").unwrap();

        write_atomically(&target, true, |tmp| {
            std::fs::write(tmp, "new").map_err(RedactorError::from)
        })
        .unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomically_keeps_old_output_on_failure() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.txt");
        std::fs::write(&target, "old").unwrap();

        let result = write_atomically(&target, true, |tmp| {
            std::fs::write(tmp, "partial").unwrap();
            Err(RedactorError::write(tmp, "disk full"))
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomically_respects_replace_flag() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.txt");
        std::fs::write(&target, "old").unwrap();

        let err = write_atomically(&target, false, |_| Ok(())).unwrap_err();
        assert_eq!(err.kind(), "write");
    }

    #[test]
    fn test_write_atomically_creates_parent() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested/deeper/out.txt");
        write_atomically(&target, true, |tmp| {
            std::fs::write(tmp, "x").map_err(RedactorError::from)
        })
        .unwrap();
        assert!(target.exists());
    }
}
