//! Unit tests for the report module.
//!
//! Tests are organised by concern: entry rules, report views, exports and
//! the services that tie them to a store.

mod service_tests;
