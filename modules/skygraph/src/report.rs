use std::fmt::Write as _;

use bluesky_client::GraphEntry;

use crate::graph::{fans, not_followed_back, SocialGraph};

const BIO_CHARS: usize = 100;
const MUTUALS_SHOWN: usize = 20;
const FANS_SHOWN: usize = 10;
const NOT_FOLLOWED_BACK_SHOWN: usize = 10;

/// Render the human-readable summary. Lists are capped (full lists stay
/// available via export); fans and not-followed-back are computed here only.
pub fn render_summary(graph: &SocialGraph) -> String {
    let mut out = String::new();
    let rule = "=".repeat(60);

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "SOCIAL GRAPH SUMMARY");
    let _ = writeln!(out, "{rule}");

    if let Some(ref profile) = graph.profile {
        let _ = writeln!(
            out,
            "Account:    {} (@{})",
            profile.display_name, profile.handle
        );
        let _ = writeln!(out, "DID:        {}", profile.did);
        let _ = writeln!(out, "Bio:        {}", truncate(&profile.description, BIO_CHARS));
    }
    let _ = writeln!(out, "Followers:  {}", graph.followers.len());
    let _ = writeln!(out, "Following:  {}", graph.follows.len());
    let _ = writeln!(out, "Mutuals:    {}", graph.mutuals.len());

    push_section(&mut out, "Top 20 Mutuals", &graph.mutuals, MUTUALS_SHOWN);

    let fans = fans(&graph.followers, &graph.follows);
    push_section(
        &mut out,
        "Top 10 Fans (follow you, you don't follow back)",
        &fans,
        FANS_SHOWN,
    );

    let not_back = not_followed_back(&graph.follows, &graph.followers);
    push_section(
        &mut out,
        "Top 10 Not Following Back",
        &not_back,
        NOT_FOLLOWED_BACK_SHOWN,
    );

    let _ = writeln!(out, "{rule}");
    out
}

fn push_section(out: &mut String, title: &str, entries: &[GraphEntry], cap: usize) {
    if entries.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n--- {title} ---");
    for entry in entries.iter().take(cap) {
        let _ = writeln!(out, "  @{:<30}  {}", entry.handle, entry.name());
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
