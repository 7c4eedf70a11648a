//! Application-scoped repositories over the document store.
//!
//! Each repository is bound to one application namespace and prepends the
//! `application_name` equality filter to every query. Repositories take
//! the session as an explicit argument so one session (and therefore one
//! commit) can span user and role edits.

pub mod role;
pub mod user;

pub use role::RoleRepository;
pub use user::UserRepository;
