use uuid::Uuid;

/// Yields the identity a created report is bound to.
///
/// `None` means no identity is available; the creation pipeline treats that
/// as a connectivity failure, not a validation problem.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<String>;
}

/// One stable anonymous identity per process, minted at startup.
///
/// Mirrors the anonymous sign-in the mobile client performs once per app run:
/// every report from this process shares the same owner id.
pub struct AnonymousIdentityProvider {
    user_id: String,
}

impl AnonymousIdentityProvider {
    pub fn new() -> Self {
        Self {
            user_id: format!("anon-{}", Uuid::new_v4().simple()),
        }
    }

    /// Fixed identity, for deployments that pin a well-known local user.
    #[allow(dead_code)]
    pub fn with_user_id(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl Default for AnonymousIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for AnonymousIdentityProvider {
    fn current_user_id(&self) -> Option<String> {
        Some(self.user_id.clone())
    }
}
