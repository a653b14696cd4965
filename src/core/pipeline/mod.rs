//! Pipeline controller and batch orchestration
//!
//! - [`controller`] - one workbook through load, classify, scan and write
//! - [`batch`] - bounded parallel processing of many files
//! - [`output`] - deterministic output naming
//! - [`summary`] - run-level counts and exit codes

pub mod batch;
pub mod controller;
pub mod output;
pub mod summary;

pub use batch::BatchRunner;
pub use controller::{
    FileOutcome, FileStage, FileStatus, PipelineController, ProcessingOptions, RunResult,
};
pub use output::{OutputPaths, OutputPlanner};
pub use summary::RunSummary;
