//! Submission validation.
//!
//! Each rule is a pure function in [`rules`]; [`SubmissionValidator`] runs
//! them in their fixed reporting order and collects every violation before
//! building a [`NewSubmission`](crate::report::domain::NewSubmission).

mod error;
pub mod rules;
mod service;

pub use error::{ValidationError, ValidationErrors};
pub use service::{
    MINIMUM_DAILY_HOURS, SubmissionValidator, ValidationContext, build_submission,
};
