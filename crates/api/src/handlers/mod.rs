//! Request handlers, one module per resource.

pub mod admin;
pub mod assistant;
pub mod auth;
pub mod bookmarks;
pub mod discussions;
pub mod milestones;
pub mod notifications;
pub mod projects;
