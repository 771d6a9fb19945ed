use crate::error::TransportError;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Access level granted to a signed-in user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    Admin,
    Editor,
    #[default]
    Viewer,
}

impl Role {
    pub fn parse(raw: &str) -> Role {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Role::Admin,
            "EDITOR" => Role::Editor,
            _ => Role::Viewer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "ADMIN",
            Role::Editor => "EDITOR",
            Role::Viewer => "VIEWER",
        };
        f.write_str(name)
    }
}

/// Body posted to the login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login answer. Services name the token either `access_token` or `token`;
/// a missing role means the account is an administrator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Token and role granted by a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub role: Role,
}

impl LoginResponse {
    pub fn into_grant(self) -> Result<LoginGrant, TransportError> {
        let token = self
            .access_token
            .filter(|t| !t.is_empty())
            .or(self.token.filter(|t| !t.is_empty()))
            .ok_or(TransportError::MissingToken)?;
        let role = self
            .role
            .as_deref()
            .map(Role::parse)
            .unwrap_or(Role::Admin);
        Ok(LoginGrant { token, role })
    }
}

/// Exchanges an identity and secret for a session token
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, identity: &str, secret: &str) -> Result<LoginGrant, TransportError>;
}

#[derive(Debug, Clone)]
struct Credentials {
    token: String,
    role: Role,
}

/// Process-wide session shared by every HTTP request.
///
/// Cloning is cheap and all clones see the same state. The token is attached
/// as a bearer header while present; `logout` drops it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session from a token issued by the auth collaborator
    pub fn sign_in(&self, token: impl Into<String>, role: Role) {
        *self.inner.write() = Some(Credentials {
            token: token.into(),
            role,
        });
        info!("Session started with role {}", role);
    }

    /// Log in through `provider` and keep the granted token
    pub async fn login(
        &self,
        provider: &dyn AuthProvider,
        identity: &str,
        secret: &str,
    ) -> Result<Role, TransportError> {
        let grant = provider.login(identity, secret).await?;
        self.sign_in(grant.token, grant.role);
        Ok(grant.role)
    }

    pub fn logout(&self) {
        if self.inner.write().take().is_some() {
            info!("Session closed");
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|c| c.token.clone())
    }

    pub fn role(&self) -> Role {
        self.inner
            .read()
            .as_ref()
            .map(|c| c.role)
            .unwrap_or_default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.read().is_some()
    }
}
