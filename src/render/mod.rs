//! Output rendering (text lines, JSON)

pub mod report;

pub use report::{render_json, report};
