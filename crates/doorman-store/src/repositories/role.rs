//! Role repository implementation.

use doorman_core::result::AppResult;
use doorman_core::traits::store::DocumentSession;
use doorman_core::types::filter::FilterField;
use doorman_core::types::id::RoleId;
use doorman_entity::role::Role;

/// Repository for role CRUD and query operations, bound to one
/// application namespace.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    application_name: String,
}

impl RoleRepository {
    /// Create a new role repository scoped to an application.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
        }
    }

    /// The base filter every query starts from.
    fn scope(&self) -> FilterField {
        FilterField::eq("application_name", self.application_name.clone())
    }

    /// Find a role by name within the application.
    pub async fn find_by_name(
        &self,
        session: &dyn DocumentSession,
        name: &str,
    ) -> AppResult<Option<Role>> {
        let filters = vec![self.scope(), FilterField::eq("name", name)];
        let mut docs = session.query(RoleId::COLLECTION, &filters).await?;
        match docs.pop() {
            Some(doc) => Ok(Some(serde_json::from_value(doc.body)?)),
            None => Ok(None),
        }
    }

    /// Resolve a set of role names in one subclause query.
    pub async fn find_by_names(
        &self,
        session: &dyn DocumentSession,
        names: &[String],
    ) -> AppResult<Vec<Role>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let filters = vec![self.scope(), FilterField::any_of("name", names.to_vec())];
        let docs = session.query(RoleId::COLLECTION, &filters).await?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc.body).map_err(Into::into))
            .collect()
    }

    /// Resolve a set of role identifiers in one subclause query.
    pub async fn find_by_ids(
        &self,
        session: &dyn DocumentSession,
        ids: &[RoleId],
    ) -> AppResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_strings: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        let filters = vec![self.scope(), FilterField::any_of("id", id_strings)];
        let docs = session.query(RoleId::COLLECTION, &filters).await?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc.body).map_err(Into::into))
            .collect()
    }

    /// List every role in the application.
    pub async fn find_all(&self, session: &dyn DocumentSession) -> AppResult<Vec<Role>> {
        let filters = vec![self.scope()];
        let docs = session.query(RoleId::COLLECTION, &filters).await?;
        docs.into_iter()
            .map(|doc| serde_json::from_value(doc.body).map_err(Into::into))
            .collect()
    }

    /// Check whether a role name exists within the application.
    pub async fn exists(&self, session: &dyn DocumentSession, name: &str) -> AppResult<bool> {
        Ok(self.find_by_name(session, name).await?.is_some())
    }

    /// Buffer an upsert of the role document.
    pub fn store(&self, session: &mut dyn DocumentSession, role: &Role) -> AppResult<()> {
        session.store(&role.id.document_key(), serde_json::to_value(role)?);
        Ok(())
    }

    /// Buffer a deletion of the role document.
    pub fn delete(&self, session: &mut dyn DocumentSession, role: &Role) {
        session.delete(&role.id.document_key());
    }
}
