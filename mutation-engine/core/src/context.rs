use cud_value::CudValue;
use indexmap::IndexMap;

/// The caller of a mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextUser {
    pub id: CudValue,
    pub is_authenticated: bool,
    pub is_superuser: bool,
    pub permissions: Vec<String>,
}

impl ContextUser {
    /// An authenticated user without permissions.
    pub fn new(id: impl Into<CudValue>) -> Self {
        ContextUser {
            id: id.into(),
            is_authenticated: true,
            is_superuser: false,
            permissions: Vec::new(),
        }
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn superuser(mut self) -> Self {
        self.is_superuser = true;
        self
    }
}

/// Request scoped state handed to every hook.
#[derive(Debug, Clone, Default)]
pub struct MutationContext {
    pub user: Option<ContextUser>,
    /// Values `auto_context_fields` can refer to, by key.
    pub values: IndexMap<String, CudValue>,
}

impl MutationContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user: ContextUser) -> Self {
        MutationContext {
            user: Some(user),
            values: IndexMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<CudValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.as_ref().map(|u| u.is_authenticated).unwrap_or(false)
    }

    /// Superusers hold every permission, anonymous callers none.
    pub fn has_perms(&self, permissions: &[String]) -> bool {
        match &self.user {
            Some(user) if user.is_authenticated && user.is_superuser => true,
            Some(user) if user.is_authenticated => permissions.iter().all(|p| user.permissions.contains(p)),
            _ => permissions.is_empty(),
        }
    }

    /// Looks up a context value. The key `user` resolves to the id of the caller.
    pub fn value(&self, key: &str) -> Option<CudValue> {
        match (key, &self.user) {
            ("user", Some(user)) if !self.values.contains_key(key) => Some(user.id.clone()),
            _ => self.values.get(key).cloned(),
        }
    }
}
