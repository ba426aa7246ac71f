//! Client handle and configuration.

mod auth;
mod http;

pub use auth::{AuthInfo, AuthState};
pub use http::{build_client, HttpConfig, HttpExecutor, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};

use crate::api::{ChatApi, ListingApi, RatingApi};
use crate::bot::ChatBot;
use crate::error::Result;
use crate::models::UserId;
use crate::store::{DocumentStore, RestStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Builder for creating SkillSwapClient.
pub struct SkillSwapClientBuilder {
    auth: AuthState,
    http_config: HttpConfig,
    store: Option<Arc<dyn DocumentStore>>,
}

impl std::fmt::Debug for SkillSwapClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillSwapClientBuilder")
            .field("uid", &self.auth.uid())
            .field("http_config", &self.http_config)
            .field("store", &self.store.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Default for SkillSwapClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillSwapClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            auth: AuthState::new(),
            http_config: HttpConfig::default(),
            store: None,
        }
    }

    /// Sign in with a token and user id.
    pub fn auth(self, token: impl Into<String>, uid: impl Into<UserId>) -> Self {
        self.with_auth(AuthInfo::new(token, uid))
    }

    /// Sign in from AuthInfo.
    pub fn with_auth(self, auth: AuthInfo) -> Self {
        self.auth.sign_in(auth);
        self
    }

    /// Share an existing auth state, e.g. one driven by a login flow.
    pub fn auth_state(mut self, auth: AuthState) -> Self {
        self.auth = auth;
        self
    }

    /// Set base URL of the document service.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.http_config.base_url = url.into();
        self
    }

    /// Set custom user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.http_config.custom_user_agent = Some(ua.into());
        self
    }

    /// Set connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = timeout;
        self
    }

    /// Set read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.read_timeout = timeout;
        self
    }

    /// Set live query polling interval of the REST store.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.http_config.poll_interval = interval;
        self
    }

    /// Use a specific store instead of the REST document service.
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build SkillSwapClient.
    pub fn build(self) -> Result<SkillSwapClient> {
        let store = match self.store {
            Some(store) => store,
            None => Arc::new(RestStore::new(self.http_config, self.auth.clone())?),
        };

        Ok(SkillSwapClient {
            inner: Arc::new(ClientInner {
                store,
                auth: self.auth,
                rating_lock: Mutex::new(()),
            }),
        })
    }
}

/// Internal client state.
pub(crate) struct ClientInner {
    pub store: Arc<dyn DocumentStore>,
    pub auth: AuthState,
    /// Serializes rating look-up-then-write sequences of this client.
    pub rating_lock: Mutex<()>,
}

impl ClientInner {
    /// Get auth info or error.
    pub fn require_auth(&self) -> Result<AuthInfo> {
        self.auth.require()
    }
}

/// SkillSwap client.
#[derive(Clone)]
pub struct SkillSwapClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl SkillSwapClient {
    /// Create a new client builder.
    pub fn builder() -> SkillSwapClientBuilder {
        SkillSwapClientBuilder::new()
    }

    /// Get the listing API.
    pub fn listings(&self) -> ListingApi {
        ListingApi::new(self.inner.clone())
    }

    /// Get the rating API.
    pub fn ratings(&self) -> RatingApi {
        RatingApi::new(self.inner.clone())
    }

    /// Get the chat API.
    pub fn chats(&self) -> ChatApi {
        ChatApi::new(self.inner.clone())
    }

    /// Start an assistant session with the default FAQ table.
    pub fn chatbot(&self) -> ChatBot {
        ChatBot::default()
    }

    /// Sign-in state shared with the store.
    pub fn auth(&self) -> &AuthState {
        &self.inner.auth
    }

    /// Backing store.
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.inner.store.clone()
    }

    /// Check if the client is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.inner.auth.current().is_some()
    }

    /// Get the current user ID if authenticated.
    pub fn current_uid(&self) -> Option<UserId> {
        self.inner.auth.uid()
    }
}

impl std::fmt::Debug for SkillSwapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillSwapClient")
            .field("authenticated", &self.is_authenticated())
            .field("store", &self.inner.store)
            .finish()
    }
}
