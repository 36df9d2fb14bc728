//! Platform layer
//!
//! Everything outside the deterministic sim that a host needs to drive it:
//! - `arcade`: stand-in physics (gravity, drag, ground, overlaps)
//! - `autopilot`: scripted input
//! - `headless`: fixed-step loop wiring the two to the sim

pub mod arcade;
pub mod autopilot;
pub mod headless;

pub use arcade::{Arcade, Body};
pub use autopilot::Autopilot;
pub use headless::{RunSummary, Runner};
