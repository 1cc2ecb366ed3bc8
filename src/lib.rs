pub mod analyze;
pub mod config;
pub mod error;
pub mod parse;
pub mod report;
pub mod rules;
pub mod validate;
pub mod wasm;

pub use analyze::{Analyzer, Inspection, analyze};
pub use config::AnalyzerConfig;
pub use report::{RiskLevel, SecurityFinding, Severity, ValidationReport, count_secure_nodes};
