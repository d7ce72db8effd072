//! Gateway middleware

pub mod quota;

pub use quota::{QuotaGate, enforce_quota};
