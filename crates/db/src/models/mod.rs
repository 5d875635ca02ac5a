//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! DTOs use `deny_unknown_fields` so unrecognized payload fields are
//! rejected outright rather than silently dropped.

pub mod assistant;
pub mod bookmark;
pub mod discussion;
pub mod milestone;
pub mod notification;
pub mod profile;
pub mod project;
pub mod session;
pub mod user;
