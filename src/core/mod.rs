//! Core orchestration for phi-redactor.
//!
//! # Modules
//!
//! - [`pipeline`] - per-file state machine, batch runner and run summary
//!
//! # Workflow
//!
//! 1. **Build**: compile rules and connect the recognizer registry once
//! 2. **Plan**: assign output paths for every input in order
//! 3. **Process**: load, classify columns, scan rows and write each file
//! 4. **Report**: write the per-file audit CSV and log the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use phi_redactor::config::load_config;
//! use phi_redactor::core::pipeline::{BatchRunner, PipelineController};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("phi-redactor.toml")?;
//! let controller = PipelineController::from_config(&config).await?;
//! let runner = BatchRunner::new(controller, &config);
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let summary = runner
//!     .run(vec![PathBuf::from("patients.xlsx")], shutdown_rx)
//!     .await;
//!
//! println!("Redactions: {}", summary.total_redactions());
//! println!("Failed files: {}", summary.files_failed());
//! # Ok(())
//! # }
//! ```

pub mod pipeline;
