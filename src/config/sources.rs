//! Configuration sources, one module per origin.

pub mod env;
pub mod global_file;
pub mod workspace_file;
