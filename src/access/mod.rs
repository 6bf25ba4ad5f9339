//! Ownership and role checks shared by every contract in the crate.
//!
//! Contracts embed [`AccessControl`] as a sub-module and call its
//! `assert_*` guards at the top of each restricted entry point.

pub mod control;
pub mod errors;
pub mod events;

pub use control::{is_null, null_address, AccessControl, Role};
pub use errors::AccessError;
pub use events::*;
