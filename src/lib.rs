//! Fair-fee checker for advertising-management quotes.
//!
//! The [`workflows::quote`] module classifies a quoted fee against a fair
//! range; [`workflows::feedback`] captures micro-feedback on the result; and
//! [`workflows::session`] ties both to a persisted key/value store.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
