#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod derive;
pub mod error;
pub mod records;
pub mod snapshot;
pub mod universe;

pub use error::{DataError, Result};
pub use records::{CompanyRecord, RecordProvider};
pub use snapshot::{SignalSnapshot, SnapshotRow};
pub use universe::{load_universe, read_universe};
