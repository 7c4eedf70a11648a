//! Integration test suite entry point.

mod helpers;

mod lockout_test;
mod query_test;
mod role_test;
