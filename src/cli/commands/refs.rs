//! Parsing of download references given on the command line.
//!
//! Accepted forms:
//! - catalog URLs: `https://zvuk.com/release/123`, `/track/`, `/playlist/`
//! - `kind:id` pairs: `release:123`, `track:5`, `playlist:7`
//! - the literal `favorites`

use anyhow::{Context, bail};
use std::collections::BTreeMap;

use crate::model::{EntityKind, EntityRef};

/// Parse one reference.
pub fn parse_ref(input: &str) -> anyhow::Result<EntityRef> {
    let input = input.trim();

    if input.eq_ignore_ascii_case("favorites") {
        return Ok(EntityRef {
            kind: EntityKind::Favorites,
            id: 0,
        });
    }

    if input.starts_with("http://") || input.starts_with("https://") {
        return parse_url(input);
    }

    let (kind, id) = input
        .split_once(':')
        .with_context(|| format!("unrecognized reference {input:?}"))?;
    Ok(EntityRef {
        kind: parse_kind(kind).with_context(|| format!("unknown kind in {input:?}"))?,
        id: parse_id(id)?,
    })
}

fn parse_url(input: &str) -> anyhow::Result<EntityRef> {
    let url = reqwest::Url::parse(input).with_context(|| format!("invalid URL {input:?}"))?;
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    for pair in segments.windows(2) {
        if let Some(kind) = parse_kind(pair[0]) {
            return Ok(EntityRef {
                kind,
                id: parse_id(pair[1])?,
            });
        }
    }
    bail!("no track, release or playlist id in {input:?}")
}

fn parse_kind(kind: &str) -> Option<EntityKind> {
    match kind.to_ascii_lowercase().as_str() {
        "track" => Some(EntityKind::Track),
        "release" | "album" => Some(EntityKind::Release),
        "playlist" => Some(EntityKind::Playlist),
        _ => None,
    }
}

fn parse_id(id: &str) -> anyhow::Result<u64> {
    id.trim()
        .parse()
        .with_context(|| format!("invalid id {id:?}"))
}

/// Group references into one id batch per kind.
///
/// Iteration order is releases, playlists, tracks, favorites. Duplicate ids
/// are dropped, first occurrence wins.
pub fn group(refs: &[EntityRef]) -> BTreeMap<EntityKind, Vec<u64>> {
    let mut batches: BTreeMap<EntityKind, Vec<u64>> = BTreeMap::new();
    for r in refs {
        let ids = batches.entry(r.kind).or_default();
        if r.kind != EntityKind::Favorites && !ids.contains(&r.id) {
            ids.push(r.id);
        }
    }
    batches
}
