//! Feature engineering
//!
//! - `rolling`: trailing-window statistics
//! - `builder`: the 14-feature vectors and manifest-ordered rows

pub mod builder;
pub mod rolling;

pub use builder::{build_features, feature_vectors};
pub use rolling::{trailing_stats, WindowStats};
