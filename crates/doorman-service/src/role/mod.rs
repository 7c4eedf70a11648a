//! Role membership module.

pub mod service;

pub use service::RoleService;
