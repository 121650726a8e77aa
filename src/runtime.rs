//! Process-wide encoding runtime and per-thread error handles.

pub mod context;

pub use context::{EncodingRuntime, ErrorHandle};
