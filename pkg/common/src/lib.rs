//! Small helpers shared by the crates in this workspace.

pub extern crate failure;

pub mod errors;
pub mod line_builder;
