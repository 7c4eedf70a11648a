//! Shared type definitions: identifiers, pagination, and query filters.

pub mod filter;
pub mod id;
pub mod pagination;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use id::{RoleId, UserId};
pub use pagination::{PageRequest, PageResponse};
