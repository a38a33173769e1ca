pub mod error;
pub mod paginate;
pub mod types;

pub use error::{BlueskyError, Result};
pub use paginate::{collect_pages, PageSource};
pub use types::{GraphEntry, ListPage, Profile};

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use types::{FollowersResponse, FollowsResponse, ProfileView, SessionData};

/// Unauthenticated AppView endpoint. Profile and graph reads work here
/// without a session.
const PUBLIC_API: &str = "https://public.api.bsky.app/xrpc";

/// PDS endpoint used once a session exists; exposes viewer-relative fields
/// (blocks, mutes, known followers) on graph responses.
const AUTH_API: &str = "https://bsky.social/xrpc";

/// Tunables for paginated fetches. Defaults match the service's documented
/// page bound and a delay that stays under its rate limit; tests run with
/// zero delay.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub page_limit: u32,
    pub page_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_limit: 100,
            page_delay: Duration::from_millis(400),
        }
    }
}

/// Lightweight client for the Bluesky / AT Protocol API.
///
/// Starts anonymous against the public AppView; after a successful
/// [`login`](BlueskyClient::login) all graph requests carry the bearer token
/// and go to the authenticated endpoint instead.
pub struct BlueskyClient {
    client: reqwest::Client,
    config: ClientConfig,
    access_token: Option<String>,
    did: Option<String>,
    authenticated: bool,
}

impl BlueskyClient {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            access_token: None,
            did: None,
            authenticated: false,
        }
    }

    /// DID of the logged-in account, if any.
    pub fn did(&self) -> Option<&str> {
        self.did.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Base URL for graph requests. Profile lookups always use the public
    /// endpoint regardless of auth state.
    fn base_url(&self) -> &'static str {
        if self.authenticated {
            AUTH_API
        } else {
            PUBLIC_API
        }
    }

    /// Create a session and store the bearer token. A rejected login is
    /// fatal; the client stays anonymous and the caller should not proceed.
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<()> {
        let resp = self
            .client
            .post(format!("{AUTH_API}/com.atproto.server.createSession"))
            .json(&serde_json::json!({
                "identifier": identifier,
                "password": password,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BlueskyError::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let session: SessionData = resp.json().await?;
        info!(handle = %session.handle, did = %session.did, "Authenticated");
        self.access_token = Some(session.access_jwt);
        self.did = Some(session.did);
        self.authenticated = true;
        Ok(())
    }

    /// Fetch profile metadata for an actor (handle or DID).
    pub async fn get_profile(&self, actor: &str) -> Result<Profile> {
        let mut req = self
            .client
            .get(format!("{PUBLIC_API}/app.bsky.actor.getProfile"))
            .query(&[("actor", actor)]);
        if let Some(ref token) = self.access_token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BlueskyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let view: ProfileView = resp.json().await?;
        Ok(Profile::from(view))
    }

    /// All followers of an actor, in service order.
    pub async fn get_followers(&self, actor: &str) -> Result<Vec<GraphEntry>> {
        info!(actor, "Fetching followers");
        let mut source = HttpPageSource {
            client: self,
            list: GraphList::Followers,
            actor,
        };
        let followers = collect_pages(&mut source, self.config.page_delay).await?;
        info!(count = followers.len(), "Fetched followers");
        Ok(followers)
    }

    /// All accounts an actor follows, in service order.
    pub async fn get_follows(&self, actor: &str) -> Result<Vec<GraphEntry>> {
        info!(actor, "Fetching follows");
        let mut source = HttpPageSource {
            client: self,
            list: GraphList::Follows,
            actor,
        };
        let follows = collect_pages(&mut source, self.config.page_delay).await?;
        info!(count = follows.len(), "Fetched follows");
        Ok(follows)
    }
}

impl Default for BlueskyClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum GraphList {
    Followers,
    Follows,
}

impl GraphList {
    fn endpoint(self) -> &'static str {
        match self {
            GraphList::Followers => "app.bsky.graph.getFollowers",
            GraphList::Follows => "app.bsky.graph.getFollows",
        }
    }
}

/// [`PageSource`] over the live graph endpoints.
struct HttpPageSource<'a> {
    client: &'a BlueskyClient,
    list: GraphList,
    actor: &'a str,
}

#[async_trait]
impl PageSource for HttpPageSource<'_> {
    async fn fetch_page(&mut self, cursor: Option<&str>) -> Result<ListPage> {
        let limit = self.client.config.page_limit.to_string();
        let mut params = vec![("actor", self.actor), ("limit", limit.as_str())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }

        let mut req = self
            .client
            .client
            .get(format!(
                "{}/{}",
                self.client.base_url(),
                self.list.endpoint()
            ))
            .query(&params);
        if let Some(ref token) = self.client.access_token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BlueskyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let page = match self.list {
            GraphList::Followers => ListPage::from(resp.json::<FollowersResponse>().await?),
            GraphList::Follows => ListPage::from(resp.json::<FollowsResponse>().await?),
        };
        Ok(page)
    }
}
