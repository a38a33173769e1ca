use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::info;

use crate::graph::SocialGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Default export path: `<actor with '.' replaced by '_'>_graph.<ext>`.
pub fn default_output_path(actor: &str, format: ExportFormat) -> String {
    format!("{}_graph.{}", actor.replace('.', "_"), format.extension())
}

pub fn export(graph: &SocialGraph, format: ExportFormat, path: &Path) -> Result<()> {
    match format {
        ExportFormat::Json => export_json(graph, path),
        ExportFormat::Csv => export_csv(graph, path),
    }
}

/// Write the graph as pretty-printed UTF-8 JSON: subject, profile (or null),
/// the full lists, and a stats block with the three counts.
pub fn export_json(graph: &SocialGraph, path: &Path) -> Result<()> {
    let data = serde_json::json!({
        "actor": graph.actor,
        "profile": graph.profile,
        "followers": graph.followers,
        "follows": graph.follows,
        "mutuals": graph.mutuals,
        "stats": {
            "followers_count": graph.followers.len(),
            "follows_count": graph.follows.len(),
            "mutuals_count": graph.mutuals.len(),
        },
    });
    let text = serde_json::to_string_pretty(&data)?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "Exported JSON");
    Ok(())
}

/// Write the graph as CSV, one row per relationship. Followers come first
/// (tagged `mutual` when also followed, else `follower`); follows that are
/// not also followers come after, tagged `following`, so a mutual appears
/// exactly once.
pub fn export_csv(graph: &SocialGraph, path: &Path) -> Result<()> {
    let mutual_dids: HashSet<&str> = graph.mutuals.iter().map(|e| e.did.as_str()).collect();
    let follower_dids: HashSet<&str> = graph.followers.iter().map(|e| e.did.as_str()).collect();

    let mut out = String::new();
    out.push_str("relationship,did,handle,display_name,description,indexed_at\n");

    for entry in &graph.followers {
        let rel = if mutual_dids.contains(entry.did.as_str()) {
            "mutual"
        } else {
            "follower"
        };
        push_row(&mut out, rel, entry);
    }
    for entry in &graph.follows {
        if !follower_dids.contains(entry.did.as_str()) {
            push_row(&mut out, "following", entry);
        }
    }

    fs::write(path, out).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "Exported CSV");
    Ok(())
}

fn push_row(out: &mut String, relationship: &str, entry: &bluesky_client::GraphEntry) {
    let _ = writeln!(
        out,
        "{},{},{},{},{},{}",
        relationship,
        csv_field(&entry.did),
        csv_field(&entry.handle),
        csv_field(&entry.display_name),
        csv_field(&entry.description),
        csv_field(&entry.indexed_at),
    );
}

/// Quote a field when it contains a delimiter, quote, or line break; bios
/// routinely contain all three.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluesky_client::{GraphEntry, Profile};

    fn entry(did: &str, handle: &str, description: &str) -> GraphEntry {
        GraphEntry {
            did: format!("did:plc:{did}"),
            handle: handle.to_string(),
            display_name: String::new(),
            description: description.to_string(),
            indexed_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn sample_graph() -> SocialGraph {
        // Followers A, B, C; follows B, D -> mutual B.
        let followers = vec![
            entry("a", "a.test", ""),
            entry("b", "b.test", "likes commas, and \"quotes\""),
            entry("c", "c.test", ""),
        ];
        let follows = vec![
            entry("b", "b.test", "likes commas, and \"quotes\""),
            entry("d", "d.test", ""),
        ];
        let mutuals = crate::graph::mutuals(&follows, &followers);
        SocialGraph {
            actor: "alice.bsky.social".to_string(),
            profile: Some(Profile {
                did: "did:plc:alice".to_string(),
                handle: "alice.bsky.social".to_string(),
                display_name: "Alice".to_string(),
                description: "caffé ☕".to_string(),
                followers_count: 3,
                follows_count: 2,
                posts_count: 10,
            }),
            followers,
            follows,
            mutuals,
        }
    }

    #[test]
    fn default_path_replaces_dots() {
        assert_eq!(
            default_output_path("alice.bsky.social", ExportFormat::Json),
            "alice_bsky_social_graph.json"
        );
        assert_eq!(
            default_output_path("did:plc:abc", ExportFormat::Csv),
            "did:plc:abc_graph.csv"
        );
    }

    #[test]
    fn json_stats_match_list_lengths() {
        let graph = sample_graph();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        export_json(&graph, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["actor"], "alice.bsky.social");
        assert_eq!(value["followers"].as_array().unwrap().len(), 3);
        assert_eq!(value["follows"].as_array().unwrap().len(), 2);
        assert_eq!(value["mutuals"].as_array().unwrap().len(), 1);
        assert_eq!(value["stats"]["followers_count"], 3);
        assert_eq!(value["stats"]["follows_count"], 2);
        assert_eq!(value["stats"]["mutuals_count"], 1);
    }

    #[test]
    fn json_keeps_non_ascii_verbatim() {
        let graph = sample_graph();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        export_json(&graph, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("caffé ☕"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn json_null_profile_serializes_as_null() {
        let mut graph = sample_graph();
        graph.profile = None;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.json");
        export_json(&graph, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["profile"].is_null());
    }

    #[test]
    fn csv_row_count_and_relationships() {
        let graph = sample_graph();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.csv");
        export_csv(&graph, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "relationship,did,handle,display_name,description,indexed_at"
        );
        // followers + (follows - mutuals) = 3 + 1 data rows.
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("follower,did:plc:a,"));
        assert!(lines[2].starts_with("mutual,did:plc:b,"));
        assert!(lines[3].starts_with("follower,did:plc:c,"));
        assert!(lines[4].starts_with("following,did:plc:d,"));
        // The mutual appears once, under the follower pass.
        assert_eq!(text.matches("did:plc:b").count(), 1);
    }

    #[test]
    fn csv_quotes_fields_with_delimiters() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn exports_are_deterministic() {
        let graph = sample_graph();
        let dir = tempfile::tempdir().unwrap();
        for format in [ExportFormat::Json, ExportFormat::Csv] {
            let first = dir.path().join(format!("one.{}", format.extension()));
            let second = dir.path().join(format!("two.{}", format.extension()));
            export(&graph, format, &first).unwrap();
            export(&graph, format, &second).unwrap();
            assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
        }
    }

    #[test]
    fn unwritable_path_surfaces_io_error() {
        let graph = sample_graph();
        let err = export_json(&graph, Path::new("/nonexistent/dir/graph.json")).unwrap_err();
        assert!(err.to_string().contains("graph.json"));
    }
}
