//! Daily task reporting.
//!
//! A report (a [`domain::TaskSubmission`]) captures the work one team member
//! did on one day across six task categories. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Entry rules in [`validation`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Report-ready reductions in [`aggregation`]
//! - Export rows and formats in [`export`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod aggregation;
pub mod domain;
pub mod export;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
