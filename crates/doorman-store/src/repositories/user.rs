//! User repository implementation.

use doorman_core::result::AppResult;
use doorman_core::traits::store::DocumentSession;
use doorman_core::types::filter::{FilterField, FilterOp, FilterValue};
use doorman_core::types::id::{RoleId, UserId};
use doorman_core::types::pagination::{PageRequest, PageResponse};
use doorman_entity::user::User;

/// Repository for user CRUD and query operations, bound to one
/// application namespace.
#[derive(Debug, Clone)]
pub struct UserRepository {
    application_name: String,
}

impl UserRepository {
    /// Create a new user repository scoped to an application.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
        }
    }

    /// The base filter every query starts from.
    fn scope(&self) -> FilterField {
        FilterField::eq("application_name", self.application_name.clone())
    }

    /// Find a user by username within the application.
    pub async fn find_by_username(
        &self,
        session: &dyn DocumentSession,
        username: &str,
    ) -> AppResult<Option<User>> {
        let filters = vec![self.scope(), FilterField::eq("username", username)];
        let mut docs = session.query(UserId::COLLECTION, &filters).await?;
        match docs.pop() {
            Some(doc) => Ok(Some(serde_json::from_value(doc.body)?)),
            None => Ok(None),
        }
    }

    /// Load a user by primary key. Returns `None` when the document is
    /// absent or belongs to another application.
    pub async fn find_by_key(
        &self,
        session: &dyn DocumentSession,
        id: UserId,
    ) -> AppResult<Option<User>> {
        match session.load(&id.document_key()).await? {
            Some(body) => {
                let user: User = serde_json::from_value(body)?;
                if user.application_name == self.application_name {
                    Ok(Some(user))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Find a user by exact email within the application. Used for the
    /// unique-email pre-check.
    pub async fn find_by_email(
        &self,
        session: &dyn DocumentSession,
        email: &str,
    ) -> AppResult<Option<User>> {
        let filters = vec![self.scope(), FilterField::eq("email", email)];
        let mut docs = session.query(UserId::COLLECTION, &filters).await?;
        match docs.pop() {
            Some(doc) => Ok(Some(serde_json::from_value(doc.body)?)),
            None => Ok(None),
        }
    }

    /// Resolve a set of usernames in one subclause query.
    pub async fn find_by_usernames(
        &self,
        session: &dyn DocumentSession,
        usernames: &[String],
    ) -> AppResult<Vec<User>> {
        if usernames.is_empty() {
            return Ok(Vec::new());
        }
        let filters = vec![
            self.scope(),
            FilterField::any_of("username", usernames.to_vec()),
        ];
        let docs = session.query(UserId::COLLECTION, &filters).await?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc.body).map_err(Into::into))
            .collect()
    }

    /// Find every user holding the given role.
    pub async fn members_of(
        &self,
        session: &dyn DocumentSession,
        role_id: RoleId,
    ) -> AppResult<Vec<User>> {
        let filters = vec![self.scope(), FilterField::eq("roles", role_id.to_string())];
        let docs = session.query(UserId::COLLECTION, &filters).await?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc.body).map_err(Into::into))
            .collect()
    }

    /// Query a page of users, optionally narrowed by one extra filter.
    ///
    /// The total count covers the filtered-but-unpaginated set.
    pub async fn query_page(
        &self,
        session: &dyn DocumentSession,
        extra: Option<FilterField>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let mut filters = vec![self.scope()];
        filters.extend(extra);
        let docs = session.query(UserId::COLLECTION, &filters).await?;
        let total = docs.len() as u64;
        let users: Vec<User> = docs
            .into_iter()
            .skip(page.skip())
            .take(page.take())
            .map(|doc| serde_json::from_value(doc.body).map_err(Into::into))
            .collect::<AppResult<_>>()?;
        Ok(PageResponse::new(users, page.page, page.page_size, total))
    }

    /// Count users currently flagged online.
    pub async fn count_online(&self, session: &dyn DocumentSession) -> AppResult<u64> {
        let filters = vec![
            self.scope(),
            FilterField::new("is_online", FilterOp::Eq, FilterValue::Boolean(true)),
        ];
        let docs = session.query(UserId::COLLECTION, &filters).await?;
        Ok(docs.len() as u64)
    }

    /// Buffer an upsert of the user document.
    pub fn store(&self, session: &mut dyn DocumentSession, user: &User) -> AppResult<()> {
        session.store(&user.id.document_key(), serde_json::to_value(user)?);
        Ok(())
    }

    /// Buffer a deletion of the user document.
    pub fn delete(&self, session: &mut dyn DocumentSession, user: &User) {
        session.delete(&user.id.document_key());
    }
}
