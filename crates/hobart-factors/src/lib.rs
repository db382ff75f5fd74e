#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod factor;
pub mod market_risk;
pub mod momentum;
pub mod quality;
pub mod registry;
pub mod signal;
pub mod size;
pub mod standardize;
pub mod stats;
pub mod universe;
pub mod value;
pub mod volatility;
pub mod winsorize;

pub use error::{FactorError, Result};
pub use factor::{
    Factor, FactorConfig, FactorId, SignalSpec, StyleFactor, Transform, average_scores,
    combine_signals,
};
pub use market_risk::MarketRiskFactor;
pub use momentum::MomentumFactor;
pub use quality::QualityFactor;
pub use signal::{Metric, SignalMap, SignalProvider, collect_signal};
pub use size::{SizeConfig, SizeFactor};
pub use standardize::standardize;
pub use universe::{CrossSection, SectorMap, Universe, normalize_symbol};
pub use value::ValueFactor;
pub use volatility::LowVolFactor;
pub use winsorize::{DEFAULT_WINSOR_LIMIT, winsorize};

// Re-export registry types for convenience
pub use registry::{
    FactorInfo, available_factors, build_factors, default_factors, get_factor_info,
    list_factor_names,
};
