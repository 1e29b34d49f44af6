//! `ed-output` — simulation output writers for the ed_dispatch simulation.
//!
//! | Backend | Files created                      |
//! |---------|------------------------------------|
//! | CSV     | `snapshots.csv`, `summary.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `ed_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ed_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{SnapshotRow, SummaryRow};
pub use writer::OutputWriter;
