//! This crate defines utilities that any other crate can utilize. This crate
//! should not depend on any other crates of the workspace.

pub mod consts;
pub mod id;
pub mod loader;
pub mod math;
