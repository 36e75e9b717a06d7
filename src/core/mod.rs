// convlog - core/mod.rs
//
// Core business logic layer.
// Dependencies: util, regex, chrono.
// Must NOT depend on: platform, app, or touch the filesystem.

pub mod analyze;
pub mod dedupe;
pub mod model;
pub mod parser;
