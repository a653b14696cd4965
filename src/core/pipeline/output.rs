//! Output naming
//!
//! Every input maps to `<stem><suffix>.<ext>` and `<stem><suffix>_report.csv`
//! in `output.directory` or next to the input. Inputs that would share an
//! output path get `_2`, `_3`, ... appended in input order.

use crate::config::OutputConfig;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Destination paths for one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub workbook: PathBuf,
    pub report: PathBuf,
}

/// Assigns collision-free output paths across one batch
#[derive(Debug)]
pub struct OutputPlanner {
    directory: Option<PathBuf>,
    suffix: String,
    taken: HashSet<PathBuf>,
}

impl OutputPlanner {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            suffix: config.suffix.clone(),
            taken: HashSet::new(),
        }
    }

    /// Reserves paths for `input`; `extension` is the written format
    pub fn plan(&mut self, input: &Path, extension: &str) -> OutputPaths {
        let directory = match &self.directory {
            Some(dir) => dir.clone(),
            None => input
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());

        let mut attempt = 1usize;
        loop {
            let base = if attempt == 1 {
                format!("{stem}{}", self.suffix)
            } else {
                format!("{stem}{}_{attempt}", self.suffix)
            };
            let paths = OutputPaths {
                workbook: directory.join(format!("{base}.{extension}")),
                report: directory.join(format!("{base}_report.csv")),
            };

            if !self.taken.contains(&paths.workbook) && !self.taken.contains(&paths.report) {
                self.taken.insert(paths.workbook.clone());
                self.taken.insert(paths.report.clone());
                return paths;
            }
            attempt += 1;
        }
    }
}
