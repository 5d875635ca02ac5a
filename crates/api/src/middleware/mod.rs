//! Request middleware: authentication, role gates, rate limiting, and the
//! error envelope enricher.

pub mod auth;
pub mod error_envelope;
pub mod rate_limit;
pub mod rbac;
