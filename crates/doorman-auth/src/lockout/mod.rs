//! Account lockout state machine.

pub mod engine;

pub use engine::{AttemptOutcome, LockoutEngine, LockoutState};
