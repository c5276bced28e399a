//! Owner authentication and session observation
//!
//! The business has a single privileged operator, the owner. Customers use
//! the public surface anonymously. An [`IdentityProvider`] turns
//! credentials into a bearer token and lets any number of observers follow
//! the signed-in user through a [`SessionSubscription`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;

use crate::core::error::AuthError;

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub email: String,
}

/// A successful login: bearer token plus the user it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Authorization context extracted from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthContext {
    /// Authenticated owner
    Owner { user: SessionUser, token: String },

    /// No authentication (public access)
    Anonymous,
}

impl AuthContext {
    pub fn is_owner(&self) -> bool {
        matches!(self, AuthContext::Owner { .. })
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            AuthContext::Owner { user, .. } => Some(user),
            AuthContext::Anonymous => None,
        }
    }
}

/// Issues and checks owner sessions
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Exchange credentials for a session
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// End the session behind `token`. Unknown tokens are ignored.
    async fn logout(&self, token: &str) -> Result<(), AuthError>;

    /// Resolve a bearer token into an auth context
    async fn authenticate(&self, token: &str) -> Result<AuthContext, AuthError>;

    /// Follow the signed-in user; the current value is available immediately
    fn subscribe(&self) -> SessionSubscription;

    /// Subscribe and run `callback` with the current user, then on every
    /// change, for as long as the returned handle lives
    fn subscribe_with(
        &self,
        callback: Box<dyn FnMut(Option<SessionUser>) + Send + 'static>,
    ) -> SessionSubscription {
        self.subscribe().with_callback(callback)
    }
}

/// Handle on the signed-in user state
///
/// Dropping the handle (or calling [`unsubscribe`](Self::unsubscribe))
/// stops any callback attached with [`with_callback`](Self::with_callback).
pub struct SessionSubscription {
    receiver: watch::Receiver<Option<SessionUser>>,
    task: Option<JoinHandle<()>>,
}

impl SessionSubscription {
    pub fn new(receiver: watch::Receiver<Option<SessionUser>>) -> Self {
        Self {
            receiver,
            task: None,
        }
    }

    /// The user signed in right now, if any
    pub fn current(&self) -> Option<SessionUser> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change and return the new value.
    /// Returns `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<Option<SessionUser>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Stream that yields the current value first, then every change
    pub fn into_stream(self) -> WatchStream<Option<SessionUser>> {
        WatchStream::new(self.receiver.clone())
    }

    /// Run `callback` with the current value, then again on every change,
    /// until this subscription is dropped. Must be called inside a Tokio
    /// runtime.
    pub fn with_callback<F>(mut self, mut callback: F) -> Self
    where
        F: FnMut(Option<SessionUser>) + Send + 'static,
    {
        if let Some(previous) = self.task.take() {
            previous.abort();
        }

        let mut receiver = self.receiver.clone();
        self.task = Some(tokio::spawn(async move {
            let initial = receiver.borrow_and_update().clone();
            callback(initial);
            while receiver.changed().await.is_ok() {
                let next = receiver.borrow_and_update().clone();
                callback(next);
            }
        }));
        self
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
