//! Taskboard: daily task reporting for delivery teams.
//!
//! This crate records one report per team member per day, validates it
//! against the roster and the batch registry, stores it in a relational
//! store, and rebuilds report views (daily trends, per-user and per-batch
//! breakdowns, forecasts, exports) from the stored rows on demand.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`SQLite`, `PostgreSQL`,
//!   roster files, in-memory)
//!
//! # Modules
//!
//! - [`report`]: Submission model, validation, persistence and aggregation
//! - [`config`]: Process configuration and store selection

pub mod config;
pub mod report;
