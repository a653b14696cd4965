//! External system integrations
//!
//! - [`analyzer`] - statistical entity recognition (Presidio over HTTP)
//! - [`spreadsheet`] - workbook reading and writing (calamine, rust_xlsxwriter, csv)
//!
//! Both sit behind traits so the pipeline can be exercised with in-memory
//! test doubles.

pub mod analyzer;
pub mod spreadsheet;
