//! Password encoding and policy enforcement.

pub mod codec;
pub mod validator;

pub use codec::PasswordCodec;
pub use validator::{PasswordValidator, PasswordViolation};
