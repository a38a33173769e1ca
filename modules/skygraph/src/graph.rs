use std::collections::HashSet;

use bluesky_client::{BlueskyClient, GraphEntry, Profile, Result};
use tracing::info;

/// The full social graph of one actor for one run. Built in three sequential
/// fetch steps, consumed by the reporter/exporter, then dropped.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    pub actor: String,
    pub profile: Option<Profile>,
    pub followers: Vec<GraphEntry>,
    pub follows: Vec<GraphEntry>,
    pub mutuals: Vec<GraphEntry>,
}

/// Follows whose DID also appears among the followers, in follows order.
pub fn mutuals(follows: &[GraphEntry], followers: &[GraphEntry]) -> Vec<GraphEntry> {
    let follower_dids: HashSet<&str> = followers.iter().map(|e| e.did.as_str()).collect();
    follows
        .iter()
        .filter(|e| follower_dids.contains(e.did.as_str()))
        .cloned()
        .collect()
}

/// Followers not followed back, in follower order.
pub fn fans(followers: &[GraphEntry], follows: &[GraphEntry]) -> Vec<GraphEntry> {
    let follow_dids: HashSet<&str> = follows.iter().map(|e| e.did.as_str()).collect();
    followers
        .iter()
        .filter(|e| !follow_dids.contains(e.did.as_str()))
        .cloned()
        .collect()
}

/// Follows that do not follow back, in follows order.
pub fn not_followed_back(follows: &[GraphEntry], followers: &[GraphEntry]) -> Vec<GraphEntry> {
    let follower_dids: HashSet<&str> = followers.iter().map(|e| e.did.as_str()).collect();
    follows
        .iter()
        .filter(|e| !follower_dids.contains(e.did.as_str()))
        .cloned()
        .collect()
}

/// Build the full social graph for an actor: profile, then followers, then
/// follows, then mutuals. Each step runs only after the previous one has
/// finished; any failure aborts the build with no partial graph.
pub async fn build_graph(client: &BlueskyClient, actor: &str) -> Result<SocialGraph> {
    let profile = client.get_profile(actor).await?;
    info!(
        display_name = %profile.display_name,
        handle = %profile.handle,
        followers = profile.followers_count,
        following = profile.follows_count,
        posts = profile.posts_count,
        "Profile fetched"
    );

    let followers = client.get_followers(actor).await?;
    let follows = client.get_follows(actor).await?;

    let mutuals = mutuals(&follows, &followers);
    info!(count = mutuals.len(), "Computed mutuals");

    Ok(SocialGraph {
        actor: actor.to_string(),
        profile: Some(profile),
        followers,
        follows,
        mutuals,
    })
}
