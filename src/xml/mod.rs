//! XML request parsing and response rendering.
//!
//! Requests are matched by *local* tag names so clients may use any namespace
//! prefix (or none). Responses are plain fragments wrapped in a fixed envelope.

pub mod envelope;
pub mod extract;
pub mod fragment;

pub use envelope::wrap;
pub use extract::{Operation, extract_field, extract_items, find_operation, local_name};
pub use fragment::Fragment;
