#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod frame;
pub mod report;
pub mod table;

pub use export::{ExportError, ExportFormat, Exporter, FactorScoreRow, RankedSecurity};
pub use frame::{factor_scores_frame, ranking_frame};
pub use report::{RankingReport, ReportBuilder, ReportError};
pub use table::{RankingTable, factor_scores_ascii_table};
