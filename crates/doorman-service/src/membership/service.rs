//! Credential and account flows: create, validate, change, reset,
//! retrieval, unlock, and profile queries.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use doorman_auth::lockout::{AttemptOutcome, LockoutEngine};
use doorman_auth::password::{PasswordCodec, PasswordValidator, PasswordViolation};
use doorman_core::config::{MembershipConfig, PasswordFormat};
use doorman_core::error::AppError;
use doorman_core::result::AppResult;
use doorman_core::traits::store::{DocumentSession, DocumentStore};
use doorman_core::types::filter::FilterField;
use doorman_core::types::id::UserId;
use doorman_core::types::pagination::{PageRequest, PageResponse};
use doorman_entity::user::{User, UserProfile};
use doorman_store::repositories::UserRepository;

/// Request to create a new user account.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateUserRequest {
    /// Desired username, unique within the application.
    pub username: String,
    /// Candidate password, validated against the configured policy.
    pub password: String,
    /// Email address.
    pub email: String,
    /// Security question (optional).
    pub question: Option<String>,
    /// Security answer (optional; mandatory when the policy requires
    /// question and answer).
    pub answer: Option<String>,
    /// Display name (optional).
    pub full_name: Option<String>,
    /// Administrative comment (optional).
    pub comment: Option<String>,
    /// Whether the account is approved for login.
    pub is_approved: bool,
}

/// Typed outcome of [`MembershipService::create_user`].
///
/// Policy rejections are expected results, not errors; only
/// configuration and storage problems surface as [`AppError`].
#[derive(Debug, Clone)]
pub enum CreateUserOutcome {
    /// The account was created and persisted.
    Created(UserProfile),
    /// The candidate password failed the configured policy.
    InvalidPassword(PasswordViolation),
    /// The username is already taken within the application.
    DuplicateUserName,
    /// Email uniqueness is enforced and the address is already in use.
    DuplicateEmail,
}

/// Orchestrates credential flows: one store session, in-memory entity
/// mutation, and a single atomic commit per operation.
///
/// Every lookup is scoped to the configured application namespace,
/// including credential validation, so identically named users of other
/// applications sharing the store are never touched.
#[derive(Debug, Clone)]
pub struct MembershipService {
    /// Document store handle.
    store: Arc<dyn DocumentStore>,
    /// Application-scoped user repository.
    users: UserRepository,
    /// Password codec for the configured format.
    codec: PasswordCodec,
    /// Password policy validator.
    validator: PasswordValidator,
    /// Lockout state machine.
    engine: LockoutEngine,
    /// Membership policy configuration.
    config: MembershipConfig,
}

impl MembershipService {
    /// Creates a new membership service.
    ///
    /// Contradictory policy settings (an unknown hash algorithm, a keyed
    /// digest without a validation key, the encrypted format without an
    /// encryption key, an unparseable strength pattern) fail here rather
    /// than on first use.
    pub fn new(store: Arc<dyn DocumentStore>, config: MembershipConfig) -> AppResult<Self> {
        let codec = PasswordCodec::from_config(&config)?;
        let validator = PasswordValidator::from_config(&config)?;
        let engine = LockoutEngine::from_config(&config);
        let users = UserRepository::new(config.application_name.clone());
        Ok(Self {
            store,
            users,
            codec,
            validator,
            engine,
            config,
        })
    }

    /// Creates a new user account.
    ///
    /// Validation order: password policy, question/answer configuration,
    /// username uniqueness, then email uniqueness (when enforced). A
    /// rejection writes nothing. The uniqueness pre-checks are not atomic
    /// against concurrent creates; a concurrent duplicate insert is
    /// resolved last-writer-wins by the store.
    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<CreateUserOutcome> {
        // Step 1: Password policy.
        if let Err(violation) = self.validator.validate(&request.password) {
            return Ok(CreateUserOutcome::InvalidPassword(violation));
        }

        // Step 2: The answer is mandatory when reset or retrieval is
        // answer-gated and the policy requires question and answer.
        let answer_required = self.config.requires_question_and_answer
            && (self.config.enable_password_reset || self.config.enable_password_retrieval);
        let answer = request.answer.as_deref().filter(|a| !a.is_empty());
        if answer_required && answer.is_none() {
            return Err(AppError::configuration(
                "Policy requires a question and answer but no answer was supplied",
            ));
        }

        // Step 3: Encode credential material under one fresh salt.
        let salt = PasswordCodec::create_salt();
        let password_hash = self.codec.encode(&request.password, &salt)?;
        let password_answer = match answer {
            Some(a) => Some(self.codec.encode(a, &salt)?),
            None => None,
        };

        let mut session = self.store.open_session().await?;

        // Step 4: Uniqueness pre-checks, application-scoped.
        if self
            .users
            .find_by_username(session.as_ref(), &request.username)
            .await?
            .is_some()
        {
            return Ok(CreateUserOutcome::DuplicateUserName);
        }
        if self.config.requires_unique_email
            && self
                .users
                .find_by_email(session.as_ref(), &request.email)
                .await?
                .is_some()
        {
            return Ok(CreateUserOutcome::DuplicateEmail);
        }

        // Step 5: Persist with a single commit.
        let user = User {
            id: UserId::new(),
            username: request.username,
            application_name: self.config.application_name.clone(),
            password_hash,
            password_salt: salt,
            password_question: request.question,
            password_answer,
            failed_password_attempts: 0,
            failed_password_answer_attempts: 0,
            last_failed_password_attempt: None,
            is_locked_out: false,
            email: request.email,
            full_name: request.full_name,
            comment: request.comment,
            is_approved: request.is_approved,
            is_online: false,
            date_created: Utc::now(),
            date_last_login: None,
            roles: Vec::new(),
        };
        self.users.store(session.as_mut(), &user)?;
        self.commit(session.as_mut()).await?;

        info!(
            application = %self.config.application_name,
            username = %user.username,
            "User created"
        );
        Ok(CreateUserOutcome::Created(user.profile()))
    }

    /// Validates a username/password pair.
    ///
    /// Returns `false` (never an error) for an unknown, unapproved, or
    /// locked user. A mismatch drives the lockout engine and the counter
    /// update is committed even though the validation fails; a match
    /// resets the counters, stamps the login time, and flags the user
    /// online.
    pub async fn validate_user(&self, username: &str, password: &str) -> AppResult<bool> {
        let mut session = self.store.open_session().await?;
        let Some(mut user) = self.users.find_by_username(session.as_ref(), username).await? else {
            return Ok(false);
        };
        if user.is_locked_out || !user.is_approved {
            return Ok(false);
        }

        let now = Utc::now();
        if self
            .codec
            .verify(password, &user.password_salt, &user.password_hash)?
        {
            self.engine.apply(&mut user, AttemptOutcome::Success, now);
            user.date_last_login = Some(now);
            user.is_online = true;
            self.users.store(session.as_mut(), &user)?;
            self.commit(session.as_mut()).await?;
            Ok(true)
        } else {
            let state = self
                .engine
                .apply(&mut user, AttemptOutcome::PasswordMismatch, now);
            self.users.store(session.as_mut(), &user)?;
            self.commit(session.as_mut()).await?;
            warn!(
                application = %self.config.application_name,
                username = %username,
                attempts = user.failed_password_attempts,
                state = ?state,
                "Password mismatch"
            );
            Ok(false)
        }
    }

    /// Changes a user's password after re-validating the old one.
    ///
    /// The failed-attempt update from a wrong old password is persisted
    /// before the invalid-credentials error is raised. The new password
    /// must pass the configured policy and is re-encoded with the
    /// existing salt.
    pub async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> AppResult<bool> {
        if !self.validate_user(username, old_password).await? {
            return Err(AppError::invalid_credentials(
                "Old password validation failed",
            ));
        }
        if let Err(violation) = self.validator.validate(new_password) {
            return Err(AppError::validation(violation.to_string()));
        }

        let mut session = self.store.open_session().await?;
        let Some(mut user) = self.users.find_by_username(session.as_ref(), username).await? else {
            return Err(AppError::not_found(format!("User '{username}' not found")));
        };
        user.password_hash = self.codec.encode(new_password, &user.password_salt)?;
        self.users.store(session.as_mut(), &user)?;
        self.commit(session.as_mut()).await?;

        info!(
            application = %self.config.application_name,
            username = %username,
            "Password changed"
        );
        Ok(true)
    }

    /// Changes a user's security question and answer after re-validating
    /// the password. The answer is encoded with the existing salt.
    pub async fn change_password_question_and_answer(
        &self,
        username: &str,
        password: &str,
        question: &str,
        answer: &str,
    ) -> AppResult<bool> {
        if !self.validate_user(username, password).await? {
            return Err(AppError::invalid_credentials(
                "Password validation failed",
            ));
        }

        let mut session = self.store.open_session().await?;
        let Some(mut user) = self.users.find_by_username(session.as_ref(), username).await? else {
            return Err(AppError::not_found(format!("User '{username}' not found")));
        };
        user.password_question = Some(question.to_string());
        user.password_answer = Some(self.codec.encode(answer, &user.password_salt)?);
        self.users.store(session.as_mut(), &user)?;
        self.commit(session.as_mut()).await?;
        Ok(true)
    }

    /// Retrieves a user's password, gated by the security answer.
    ///
    /// Unsupported when retrieval is disabled or the format is hashed.
    /// Returns the decoded (encrypted format) or stored (clear format)
    /// text.
    pub async fn get_password(&self, username: &str, answer: &str) -> AppResult<String> {
        if !self.config.enable_password_retrieval {
            return Err(AppError::unsupported("Password retrieval is disabled"));
        }
        if self.codec.format() == PasswordFormat::Hashed {
            return Err(AppError::unsupported(
                "Hashed passwords cannot be retrieved",
            ));
        }

        let mut session = self.store.open_session().await?;
        let Some(mut user) = self.users.find_by_username(session.as_ref(), username).await? else {
            return Err(AppError::not_found(format!("User '{username}' not found")));
        };
        if user.is_locked_out {
            return Err(AppError::invalid_credentials("Account is locked out"));
        }
        self.check_answer(session.as_mut(), &mut user, answer).await?;

        self.codec.decode(&user.password_hash, &user.password_salt)
    }

    /// Resets a user's password to a freshly generated one, gated by the
    /// security answer. The plaintext is returned exactly once; it is
    /// not retrievable afterward under the hashed format.
    pub async fn reset_password(&self, username: &str, answer: &str) -> AppResult<String> {
        if !self.config.enable_password_reset {
            return Err(AppError::unsupported("Password reset is disabled"));
        }

        let mut session = self.store.open_session().await?;
        let Some(mut user) = self.users.find_by_username(session.as_ref(), username).await? else {
            return Err(AppError::not_found(format!("User '{username}' not found")));
        };
        if user.is_locked_out {
            return Err(AppError::invalid_credentials("Account is locked out"));
        }
        self.check_answer(session.as_mut(), &mut user, answer).await?;

        let new_password = PasswordCodec::generate_password(
            self.config.min_required_password_length.max(8),
            self.config.min_required_non_alphanumeric_characters.max(2),
        );
        user.password_hash = self.codec.encode(&new_password, &user.password_salt)?;
        self.users.store(session.as_mut(), &user)?;
        self.commit(session.as_mut()).await?;

        info!(
            application = %self.config.application_name,
            username = %username,
            "Password reset"
        );
        Ok(new_password)
    }

    /// Clears the lockout flag. Counters are deliberately left intact,
    /// so another in-window mismatch locks the account again. Returns
    /// `false` when no matching user exists.
    pub async fn unlock_user(&self, username: &str) -> AppResult<bool> {
        let mut session = self.store.open_session().await?;
        let Some(mut user) = self.users.find_by_username(session.as_ref(), username).await? else {
            return Ok(false);
        };
        user.is_locked_out = false;
        self.users.store(session.as_mut(), &user)?;
        self.commit(session.as_mut()).await?;

        info!(
            application = %self.config.application_name,
            username = %username,
            "User unlocked"
        );
        Ok(true)
    }

    /// Fetches a user profile by username, optionally stamping the
    /// online flag.
    pub async fn get_user(
        &self,
        username: &str,
        mark_online: bool,
    ) -> AppResult<Option<UserProfile>> {
        let mut session = self.store.open_session().await?;
        let Some(mut user) = self.users.find_by_username(session.as_ref(), username).await? else {
            return Ok(None);
        };
        if mark_online {
            user.is_online = true;
            self.users.store(session.as_mut(), &user)?;
            self.commit(session.as_mut()).await?;
        }
        Ok(Some(user.profile()))
    }

    /// Fetches a user profile by its persistent key.
    pub async fn get_user_by_key(&self, id: UserId) -> AppResult<Option<UserProfile>> {
        let session = self.store.open_session().await?;
        let user = self.users.find_by_key(session.as_ref(), id).await?;
        Ok(user.map(|u| u.profile()))
    }

    /// Resolves an email address to a username within the application.
    pub async fn get_user_name_by_email(&self, email: &str) -> AppResult<Option<String>> {
        let session = self.store.open_session().await?;
        let user = self.users.find_by_email(session.as_ref(), email).await?;
        Ok(user.map(|u| u.username))
    }

    /// Updates profile fields (email, full name, comment, approval) from
    /// a caller-supplied projection. Credential, lockout, and membership
    /// state are never touched by this path.
    pub async fn update_user(&self, profile: &UserProfile) -> AppResult<()> {
        let mut session = self.store.open_session().await?;
        let Some(mut user) = self
            .users
            .find_by_username(session.as_ref(), &profile.username)
            .await?
        else {
            return Err(AppError::not_found(format!(
                "User '{}' not found",
                profile.username
            )));
        };
        user.email = profile.email.clone();
        user.full_name = profile.full_name.clone();
        user.comment = profile.comment.clone();
        user.is_approved = profile.is_approved;
        self.users.store(session.as_mut(), &user)?;
        self.commit(session.as_mut()).await?;
        Ok(())
    }

    /// Deletes a user document. Role membership lives on the user side,
    /// so no role cleanup is needed. Returns `false` when absent.
    pub async fn delete_user(&self, username: &str) -> AppResult<bool> {
        let mut session = self.store.open_session().await?;
        let Some(user) = self.users.find_by_username(session.as_ref(), username).await? else {
            return Ok(false);
        };
        self.users.delete(session.as_mut(), &user);
        self.commit(session.as_mut()).await?;

        info!(
            application = %self.config.application_name,
            username = %username,
            "User deleted"
        );
        Ok(true)
    }

    /// Counts users currently flagged online.
    pub async fn get_number_of_users_online(&self) -> AppResult<u64> {
        let session = self.store.open_session().await?;
        self.users.count_online(session.as_ref()).await
    }

    /// Lists all users in the application, paginated.
    pub async fn get_all_users(&self, page: &PageRequest) -> AppResult<PageResponse<UserProfile>> {
        self.query_profiles(None, page).await
    }

    /// Finds users whose username contains the given pattern.
    pub async fn find_users_by_name(
        &self,
        pattern: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserProfile>> {
        self.query_profiles(Some(FilterField::like("username", pattern)), page)
            .await
    }

    /// Finds users whose email contains the given pattern.
    pub async fn find_users_by_email(
        &self,
        pattern: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserProfile>> {
        self.query_profiles(Some(FilterField::like("email", pattern)), page)
            .await
    }

    /// Application filter first, optional substring predicate, then
    /// skip/take pagination over the filtered set.
    async fn query_profiles(
        &self,
        extra: Option<FilterField>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserProfile>> {
        let session = self.store.open_session().await?;
        let users = self.users.query_page(session.as_ref(), extra, page).await?;
        Ok(PageResponse::new(
            users.items.iter().map(User::profile).collect(),
            users.page,
            users.page_size,
            users.total_items,
        ))
    }

    /// Verifies the security answer when the policy requires one. A
    /// mismatch drives the lockout engine and commits the counter update
    /// before the invalid-credentials error is raised.
    async fn check_answer(
        &self,
        session: &mut dyn DocumentSession,
        user: &mut User,
        answer: &str,
    ) -> AppResult<()> {
        if !self.config.requires_question_and_answer {
            return Ok(());
        }
        let matches = match &user.password_answer {
            Some(stored) => self.codec.verify(answer, &user.password_salt, stored)?,
            None => false,
        };
        if matches {
            return Ok(());
        }
        let state = self
            .engine
            .apply(user, AttemptOutcome::AnswerMismatch, Utc::now());
        self.users.store(&mut *session, user)?;
        self.commit(&mut *session).await?;
        warn!(
            application = %self.config.application_name,
            username = %user.username,
            state = ?state,
            "Security answer mismatch"
        );
        Err(AppError::invalid_credentials("Security answer mismatch"))
    }

    /// Commits the session, logging storage failures with the acting
    /// application before propagating them unchanged.
    async fn commit(&self, session: &mut dyn DocumentSession) -> AppResult<()> {
        session.save_changes().await.inspect_err(|e| {
            error!(
                application = %self.config.application_name,
                error = %e,
                "Commit failed"
            );
        })
    }
}
