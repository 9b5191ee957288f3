use crate::models::{NodeRecord, ResolvedEdge};
use crate::pipeline::entities::EntityMappings;
use crate::pipeline::page_catalog::PageCatalog;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeStats {
    pub nodes: u64,
    pub with_entity: u64,
    pub missing_from_catalog: u64,
}

/// One node per id seen on either side of an edge, sorted by id.
pub fn assemble_nodes(
    edges: &[ResolvedEdge],
    catalog: &PageCatalog,
    entities: &EntityMappings,
) -> (Vec<NodeRecord>, NodeStats) {
    let mut stats = NodeStats::default();

    let mut ids: Vec<u32> = edges.iter().flat_map(|e| [e.from_id, e.to_id]).collect();
    ids.sort_unstable();
    ids.dedup();

    let mut nodes = Vec::with_capacity(ids.len());
    for id in ids {
        // endpoints were resolved against the catalog already, so this should never miss
        let Some(article) = catalog.get(id) else {
            stats.missing_from_catalog += 1;
            continue;
        };
        let entity_id = entities.get(id).map(str::to_string);
        if entity_id.is_some() {
            stats.with_entity += 1;
        }
        nodes.push(NodeRecord {
            article_id: id,
            title: article.title.clone(),
            entity_id,
        });
    }
    stats.nodes = nodes.len() as u64;

    if stats.missing_from_catalog > 0 {
        warn!(
            "{} edge endpoints have no catalog entry and were left out of the nodes",
            stats.missing_from_catalog
        );
    }
    info!(
        "assembled {} nodes, {} with an entity id",
        stats.nodes, stats.with_entity
    );
    (nodes, stats)
}
