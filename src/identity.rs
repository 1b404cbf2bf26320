//! Identity provider — who is submitting the onboarding record.

use async_trait::async_trait;

/// Supplies the current authenticated user, if any.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Stable id of the signed-in user, or `None` when signed out.
    async fn current_user_id(&self) -> Option<String>;
}

/// Identity fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user_id: Option<String>,
}

impl StaticIdentity {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn signed_out() -> Self {
        Self { user_id: None }
    }
}

impl From<Option<String>> for StaticIdentity {
    fn from(user_id: Option<String>) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}
