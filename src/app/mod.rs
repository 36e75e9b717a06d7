// convlog - app/mod.rs
//
// Application layer: orchestration of a single run and report rendering.
// Dependencies: core, platform, util.

pub mod analyze;
pub mod dedupe;
pub mod report;
