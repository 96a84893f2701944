//! # fresh-core
//!
//! Core types shared by every crate in the freshener registry workspace.
//!
//! This crate provides:
//! - `ColumnId`: family-only or fully-qualified column addresses
//! - `FreshenerRecord` and `ParameterDescription`: the persisted attachment payload
//! - `ProtocolVersion`: `<protocol>-<major>.<minor>` version strings
//! - `ValidationFailure` and `FailureSet`: aggregated validation results
//! - `TableLayout`: the schema view the validator checks attachments against
//! - Cross-cutting error types

pub mod column;
pub mod enums;
pub mod errors;
pub mod failure;
pub mod layout;
pub mod record;
pub mod version;

pub use column::ColumnId;
pub use enums::{ParameterScope, ValidationFailure};
pub use errors::CoreError;
pub use failure::FailureSet;
pub use layout::{FamilyLayout, TableLayout};
pub use record::{FreshenerRecord, ParameterDescription};
pub use version::{ProtocolVersion, VersionError};
