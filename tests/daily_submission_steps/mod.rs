//! Step definitions for daily submission scenarios.

pub mod world;

mod given;
mod then;
mod when;
