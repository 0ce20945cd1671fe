//! Session tokens for client-context queries
//!
//! A [`Session`] owns the current bearer token and knows how to obtain a new
//! one. The transport reads the token before the first attempt and calls
//! [`Session::refresh`] at most once per query, after a 403.

use async_trait::async_trait;
use std::future::Future;
use std::sync::RwLock;
use tracing::debug;

/// Source of bearer tokens for an authenticated user
#[async_trait]
pub trait Session: Send + Sync {
    /// Current token, if the user is signed in
    fn token(&self) -> Option<String>;

    /// Obtain a fresh token. Returns the token now in effect, if any.
    async fn refresh(&self) -> Option<String>;
}

/// A fixed token that is never refreshed
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A signed-out session
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl Session for StaticSession {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }

    async fn refresh(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Produces replacement tokens for a [`RefreshingSession`]
///
/// Implemented for any `Fn() -> impl Future<Output = Option<String>>`, so a
/// closure calling the identity provider is enough.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self) -> Option<String>;
}

#[async_trait]
impl<F, Fut> TokenRefresher for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Option<String>> + Send,
{
    async fn refresh(&self) -> Option<String> {
        (self)().await
    }
}

/// Holds a token and replaces it through a [`TokenRefresher`]
pub struct RefreshingSession<R> {
    token: RwLock<Option<String>>,
    refresher: R,
}

impl<R: TokenRefresher> RefreshingSession<R> {
    pub fn new(token: Option<String>, refresher: R) -> Self {
        Self {
            token: RwLock::new(token),
            refresher,
        }
    }

    fn store(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }
}

#[async_trait]
impl<R: TokenRefresher> Session for RefreshingSession<R> {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    async fn refresh(&self) -> Option<String> {
        match self.refresher.refresh().await {
            Some(token) => {
                debug!("Session token refreshed");
                self.store(Some(token.clone()));
                Some(token)
            }
            None => {
                debug!("Session refresh produced no token");
                self.token()
            }
        }
    }
}
