pub mod collapse;
pub mod entities;
pub mod links;
pub mod nodes;
pub mod page_catalog;
pub mod redirects;
pub mod source;

pub use collapse::*;
pub use entities::*;
pub use links::*;
pub use nodes::*;
pub use page_catalog::*;
pub use redirects::*;
pub use source::*;

use crate::models::{NodeRecord, Partition, ResolvedEdge};
use chrono::NaiveDate;
use std::time::Instant;
use tracing::{info, warn};

/// The two output tables of one (wiki, snapshot) run.
#[derive(Debug)]
pub struct GraphTables {
    pub partition: Partition,
    pub edges: Vec<ResolvedEdge>,
    pub nodes: Vec<NodeRecord>,
}

/// Runs every transformation for one partition. Pure apart from reading `source`.
pub fn build_graph(
    source: &dyn TableSource,
    partition: &Partition,
    entity_min_snapshot: NaiveDate,
) -> anyhow::Result<GraphTables> {
    let now = Instant::now();
    info!("building link graph for {}", partition);

    // catalog
    let (catalog, _) = load_page_catalog(source.pages(partition)?, partition);
    if catalog.is_empty() {
        warn!("page catalog for {} is empty, the graph will be empty too", partition);
    }
    // ↓
    let (redirects, _) = build_redirect_table(source.redirects(partition)?, &catalog, partition);
    if redirects.is_empty() {
        warn!("no redirects resolved for {}, links are kept as extracted", partition);
    }
    // ↓
    let mut extractor = LinkExtractor::new(&catalog, &redirects, partition);
    source.pagelinks(partition, &mut |row| extractor.push(row))?;
    let (links, _) = extractor.finish();
    // ↓
    let (edges, _) = collapse_redirects(links, &redirects);

    let (entities, _) =
        select_latest_entities(source.entity_links()?, &partition.wiki, entity_min_snapshot);
    if entities.is_empty() {
        warn!("no entity mappings for {}, every item_id will be null", partition.wiki);
    }
    // ↓
    let (nodes, _) = assemble_nodes(&edges, &catalog, &entities);

    info!(
        "graph {}: {} nodes, {} edges in {:.2?} (catalog {}, redirects {}, entities {})",
        partition,
        nodes.len(),
        edges.len(),
        now.elapsed(),
        catalog.len(),
        redirects.len(),
        entities.len()
    );
    Ok(GraphTables {
        partition: partition.clone(),
        edges,
        nodes,
    })
}
