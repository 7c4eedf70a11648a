//! Shared test helpers for integration tests.

use std::sync::{Arc, Once};

use doorman::config::{AppConfig, MembershipConfig};
use doorman::entity::UserProfile;
use doorman::service::{CreateUserOutcome, CreateUserRequest, MembershipService, RoleService};
use doorman::store::MemoryDocumentStore;

static TRACING: Once = Once::new();

/// Test application context: both services wired over one fresh
/// in-memory store.
pub struct TestHarness {
    /// The shared store, for wiring additional tenants.
    pub store: Arc<MemoryDocumentStore>,
    /// Identity service.
    pub membership: MembershipService,
    /// Role membership service.
    pub roles: RoleService,
    /// The configuration the services were built with.
    pub config: MembershipConfig,
}

impl TestHarness {
    /// Create a harness with the default test configuration.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a harness with a custom configuration.
    pub fn with_config(config: MembershipConfig) -> Self {
        TRACING.call_once(|| {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init()
                .ok();
        });
        let store = Arc::new(MemoryDocumentStore::new());
        Self::sharing_store(store, config)
    }

    /// Wire a second tenant (or configuration) over an existing store.
    pub fn sharing_store(store: Arc<MemoryDocumentStore>, config: MembershipConfig) -> Self {
        let membership = MembershipService::new(store.clone(), config.clone())
            .expect("membership service should build from test config");
        let roles = RoleService::new(store.clone(), &config);
        Self {
            store,
            membership,
            roles,
            config,
        }
    }

    /// Create an approved user, panicking on any rejection.
    pub async fn create_user(&self, username: &str, password: &str, email: &str) -> UserProfile {
        let outcome = self
            .membership
            .create_user(CreateUserRequest {
                username: username.to_string(),
                password: password.to_string(),
                email: email.to_string(),
                question: None,
                answer: None,
                full_name: None,
                comment: None,
                is_approved: true,
            })
            .await
            .expect("create_user should not fail");
        match outcome {
            CreateUserOutcome::Created(profile) => profile,
            other => panic!("expected user '{username}' to be created, got {other:?}"),
        }
    }

    /// Create an approved user with a security question and answer.
    pub async fn create_user_with_answer(
        &self,
        username: &str,
        password: &str,
        email: &str,
        question: &str,
        answer: &str,
    ) -> UserProfile {
        let outcome = self
            .membership
            .create_user(CreateUserRequest {
                username: username.to_string(),
                password: password.to_string(),
                email: email.to_string(),
                question: Some(question.to_string()),
                answer: Some(answer.to_string()),
                full_name: None,
                comment: None,
                is_approved: true,
            })
            .await
            .expect("create_user should not fail");
        match outcome {
            CreateUserOutcome::Created(profile) => profile,
            other => panic!("expected user '{username}' to be created, got {other:?}"),
        }
    }
}

/// Default policy for tests, merged from config/default.toml and the
/// config/test.toml overlay: 3 attempts in a 10-minute window, length 7
/// with one special character, hashed storage, unique emails.
pub fn test_config() -> MembershipConfig {
    AppConfig::load("test")
        .expect("test configuration should load")
        .membership
}
