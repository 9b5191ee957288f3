use crate::models::{ExtractedLink, ResolvedEdge};
use crate::pipeline::redirects::RedirectTable;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CollapseStats {
    pub input_links: u64,
    pub substituted: u64,
    pub duplicates_removed: u64,
    pub self_loops: u64,
    /// substituted target is itself a redirect; left as is
    pub multi_hop: u64,
}

/// Points every link at its redirect target (one hop) and collapses repeats.
/// Edges come back sorted by (from_id, to_id).
pub fn collapse_redirects(
    links: impl IntoIterator<Item = ExtractedLink>,
    redirects: &RedirectTable,
) -> (Vec<ResolvedEdge>, CollapseStats) {
    let mut stats = CollapseStats::default();

    let mut edges: Vec<ResolvedEdge> = links
        .into_iter()
        .map(|link| {
            stats.input_links += 1;
            let to_id = match redirects.get(link.to_id) {
                Some(target) => {
                    stats.substituted += 1;
                    if redirects.contains_source(target) {
                        stats.multi_hop += 1;
                    }
                    target
                }
                None => link.to_id,
            };
            ResolvedEdge {
                from_id: link.from_id,
                to_id,
            }
        })
        .collect();

    // the graph tracks whether a link exists, not how often
    edges.sort_unstable();
    edges.dedup();

    stats.duplicates_removed = stats.input_links - edges.len() as u64;
    stats.self_loops = edges.iter().filter(|e| e.from_id == e.to_id).count() as u64;

    info!(
        "collapsed {} links into {} edges ({} redirect targets substituted, {} duplicates)",
        stats.input_links,
        edges.len(),
        stats.substituted,
        stats.duplicates_removed
    );
    if stats.multi_hop > 0 {
        warn!(
            "{} links still point at a redirect after one hop (double redirects)",
            stats.multi_hop
        );
    }
    if stats.self_loops > 0 {
        info!("{} self-loop edges kept", stats.self_loops);
    }
    (edges, stats)
}
