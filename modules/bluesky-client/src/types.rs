use serde::{Deserialize, Serialize};

// --- Domain types ---

/// Profile snapshot for an actor, with aggregate counters as reported by the
/// service at fetch time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Profile {
    pub did: String,
    pub handle: String,
    pub display_name: String,
    pub description: String,
    pub followers_count: u64,
    pub follows_count: u64,
    pub posts_count: u64,
}

/// One account in a followers/follows list. Immutable once built; never
/// mutated locally.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphEntry {
    pub did: String,
    pub handle: String,
    pub display_name: String,
    pub description: String,
    pub indexed_at: String,
}

impl GraphEntry {
    /// Display name if set, otherwise the handle.
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.handle
        } else {
            &self.display_name
        }
    }
}

/// One page of a cursor-paginated graph list. The cursor is present iff more
/// results remain.
#[derive(Debug, Clone)]
pub struct ListPage {
    pub entries: Vec<GraphEntry>,
    pub cursor: Option<String>,
}

// --- Wire types (camelCase per the AT Protocol lexicons) ---

/// Response from com.atproto.server.createSession.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionData {
    #[serde(rename = "accessJwt")]
    pub access_jwt: String,
    pub did: String,
    pub handle: String,
}

/// Profile view from app.bsky.actor.getProfile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileView {
    pub did: String,
    pub handle: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "followersCount")]
    pub followers_count: Option<u64>,
    #[serde(rename = "followsCount")]
    pub follows_count: Option<u64>,
    #[serde(rename = "postsCount")]
    pub posts_count: Option<u64>,
}

impl From<ProfileView> for Profile {
    fn from(v: ProfileView) -> Self {
        Profile {
            did: v.did,
            handle: v.handle,
            display_name: v.display_name.unwrap_or_default(),
            description: v.description.unwrap_or_default(),
            followers_count: v.followers_count.unwrap_or(0),
            follows_count: v.follows_count.unwrap_or(0),
            posts_count: v.posts_count.unwrap_or(0),
        }
    }
}

/// A profile record nested in a graph list response.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorRecord {
    pub did: String,
    pub handle: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "indexedAt")]
    pub indexed_at: Option<String>,
}

impl From<ActorRecord> for GraphEntry {
    fn from(r: ActorRecord) -> Self {
        GraphEntry {
            did: r.did,
            handle: r.handle,
            display_name: r.display_name.unwrap_or_default(),
            description: r.description.unwrap_or_default(),
            indexed_at: r.indexed_at.unwrap_or_default(),
        }
    }
}

/// Response from app.bsky.graph.getFollowers.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowersResponse {
    pub followers: Vec<ActorRecord>,
    pub cursor: Option<String>,
}

impl From<FollowersResponse> for ListPage {
    fn from(r: FollowersResponse) -> Self {
        ListPage {
            entries: r.followers.into_iter().map(GraphEntry::from).collect(),
            cursor: r.cursor,
        }
    }
}

/// Response from app.bsky.graph.getFollows.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowsResponse {
    pub follows: Vec<ActorRecord>,
    pub cursor: Option<String>,
}

impl From<FollowsResponse> for ListPage {
    fn from(r: FollowsResponse) -> Self {
        ListPage {
            entries: r.follows.into_iter().map(GraphEntry::from).collect(),
            cursor: r.cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_record_tolerates_missing_optional_fields() {
        let json = r#"{"did":"did:plc:abc","handle":"alice.bsky.social"}"#;
        let record: ActorRecord = serde_json::from_str(json).unwrap();
        let entry = GraphEntry::from(record);
        assert_eq!(entry.did, "did:plc:abc");
        assert_eq!(entry.display_name, "");
        assert_eq!(entry.indexed_at, "");
    }

    #[test]
    fn profile_view_maps_camel_case_counters() {
        let json = r#"{
            "did": "did:plc:abc",
            "handle": "alice.bsky.social",
            "displayName": "Alice",
            "description": "hello",
            "followersCount": 12,
            "followsCount": 7,
            "postsCount": 99
        }"#;
        let profile = Profile::from(serde_json::from_str::<ProfileView>(json).unwrap());
        assert_eq!(profile.display_name, "Alice");
        assert_eq!(profile.followers_count, 12);
        assert_eq!(profile.follows_count, 7);
        assert_eq!(profile.posts_count, 99);
    }

    #[test]
    fn entry_name_falls_back_to_handle() {
        let entry = GraphEntry {
            did: "did:plc:abc".into(),
            handle: "alice.bsky.social".into(),
            display_name: String::new(),
            description: String::new(),
            indexed_at: String::new(),
        };
        assert_eq!(entry.name(), "alice.bsky.social");
    }

    #[test]
    fn followers_response_preserves_service_order() {
        let json = r#"{
            "followers": [
                {"did": "did:plc:b", "handle": "b.test"},
                {"did": "did:plc:a", "handle": "a.test"}
            ],
            "cursor": "next"
        }"#;
        let page = ListPage::from(serde_json::from_str::<FollowersResponse>(json).unwrap());
        assert_eq!(page.entries[0].did, "did:plc:b");
        assert_eq!(page.entries[1].did, "did:plc:a");
        assert_eq!(page.cursor.as_deref(), Some("next"));
    }
}
