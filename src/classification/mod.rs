//! Classification module
//!
//! - `severity`: per-sample severity from the fused anomaly flag and the raw
//!   readings
//! - `status`: batch severity counts to one device status
//! - `advisory`: human-readable summary and recommended actions per status

pub mod advisory;
pub mod severity;
pub mod status;

pub use advisory::summarize;
pub use severity::classify_severity;
pub use status::aggregate_status;
