//! Report rendering: colored terminal text and JSON.

pub mod colors;
mod json;
mod terminal;

pub use json::{to_json, to_json_pretty};
pub use terminal::{format_bf, format_classical, format_report, SEPARATOR};
