//! Report rendering.

pub mod generator;

pub use generator::{format_currency, format_percentage, generate_json_report, generate_markdown_report};
