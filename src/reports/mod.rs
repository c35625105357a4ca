// Reports module - baseline-relative score calculation

pub mod score;

pub use score::{compute_score, total_value};
