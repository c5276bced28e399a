//! Single-owner identity provider
//!
//! The owner's credentials come from configuration, either as a plaintext
//! password compared in constant time or as an argon2 hash. Sessions are
//! opaque random tokens held in memory, so a restart signs the owner out.

use std::collections::HashMap;

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use subtle::ConstantTimeEq;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::OwnerConfig;
use crate::core::auth::{AuthContext, IdentityProvider, Session, SessionSubscription, SessionUser};
use crate::core::error::AuthError;

pub struct OwnerIdentityProvider {
    owner: OwnerConfig,
    sessions: RwLock<HashMap<String, SessionUser>>,
    state: watch::Sender<Option<SessionUser>>,
}

impl OwnerIdentityProvider {
    pub fn new(owner: OwnerConfig) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            owner,
            sessions: RwLock::new(HashMap::new()),
            state,
        }
    }

    fn credentials_match(&self, email: &str, password: &str) -> bool {
        let email_matches = email.trim().eq_ignore_ascii_case(self.owner.email.trim());
        let password_matches = self.password_matches(password);
        email_matches && password_matches
    }

    fn password_matches(&self, password: &str) -> bool {
        match &self.owner.password_hash {
            Some(hash) => match PasswordHash::new(hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(e) => {
                    warn!(error = %e, "owner password hash is unreadable");
                    false
                }
            },
            None => password
                .as_bytes()
                .ct_eq(self.owner.password.as_bytes())
                .into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for OwnerIdentityProvider {
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        if !self.credentials_match(email, password) {
            debug!("login refused");
            return Err(AuthError::InvalidCredentials);
        }

        let user = SessionUser {
            email: self.owner.email.trim().to_string(),
        };
        let token = Uuid::new_v4().simple().to_string();
        self.sessions
            .write()
            .await
            .insert(token.clone(), user.clone());
        self.state.send_replace(Some(user.clone()));

        info!(email = %user.email, "owner signed in");
        Ok(Session { token, user })
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(token).is_none() {
            debug!("logout for unknown session");
            return Ok(());
        }

        info!("owner signed out");
        if sessions.is_empty() {
            self.state.send_replace(None);
        }
        Ok(())
    }

    async fn authenticate(&self, token: &str) -> Result<AuthContext, AuthError> {
        let sessions = self.sessions.read().await;
        match sessions.get(token) {
            Some(user) => Ok(AuthContext::Owner {
                user: user.clone(),
                token: token.to_string(),
            }),
            None => Err(AuthError::InvalidToken),
        }
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.state.subscribe())
    }
}
