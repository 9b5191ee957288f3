use crate::models::{Partition, RedirectEdge, RedirectRow, MAIN_NAMESPACE};
use crate::pipeline::page_catalog::PageCatalog;
use rustc_hash::FxHashMap;
use tracing::info;

/// redirect page id -> id of the page its title points at, one hop only
#[derive(Debug, Default)]
pub struct RedirectTable {
    targets: FxHashMap<u32, u32>,
}

impl RedirectTable {
    pub fn get(&self, from_id: u32) -> Option<u32> {
        self.targets.get(&from_id).copied()
    }

    pub fn contains_source(&self, id: u32) -> bool {
        self.targets.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// False if `edge.from_id` already has a target; the first one stays.
    pub fn insert(&mut self, edge: RedirectEdge) -> bool {
        if self.targets.contains_key(&edge.from_id) {
            return false;
        }
        self.targets.insert(edge.from_id, edge.to_id);
        true
    }

    /// Edges ordered by source id.
    #[cfg(test)]
    pub fn edges(&self) -> Vec<RedirectEdge> {
        let mut edges: Vec<RedirectEdge> = self
            .targets
            .iter()
            .map(|(&from_id, &to_id)| RedirectEdge { from_id, to_id })
            .collect();
        edges.sort_unstable_by_key(|e| e.from_id);
        edges
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RedirectStats {
    pub resolved: u64,
    pub other_partition: u64,
    pub other_namespace: u64,
    pub unknown_source: u64,
    pub source_not_redirect: u64,
    pub unresolved_target: u64,
    pub duplicate_source: u64,
}

pub fn build_redirect_table(
    rows: impl IntoIterator<Item = RedirectRow>,
    catalog: &PageCatalog,
    partition: &Partition,
) -> (RedirectTable, RedirectStats) {
    let mut table = RedirectTable::default();
    let mut stats = RedirectStats::default();

    for row in rows {
        if row.partition != *partition {
            stats.other_partition += 1;
            continue;
        }
        if row.namespace != MAIN_NAMESPACE {
            stats.other_namespace += 1;
            continue;
        }
        match catalog.get(row.from_page_id) {
            None => {
                stats.unknown_source += 1;
                continue;
            }
            // stale row, the page stopped being a redirect
            Some(article) if !article.is_redirect => {
                stats.source_not_redirect += 1;
                continue;
            }
            Some(_) => {}
        }

        // skip non existent target_title, ex: Chubchik
        let Some(to_id) = catalog.id_for_title(&row.target_title) else {
            stats.unresolved_target += 1;
            continue;
        };

        let edge = RedirectEdge {
            from_id: row.from_page_id,
            to_id,
        };
        if table.insert(edge) {
            stats.resolved += 1;
        } else {
            stats.duplicate_source += 1;
        }
    }

    info!(
        "redirects {}: {} resolved, {} unresolvable targets, {} unknown sources, {} stale, {} outside namespace 0",
        partition,
        stats.resolved,
        stats.unresolved_target,
        stats.unknown_source,
        stats.source_not_redirect,
        stats.other_namespace
    );
    (table, stats)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pipeline::page_catalog::load_page_catalog;
    use crate::pipeline::page_catalog::tests::{page, partition};

    pub(crate) fn redirect(from: u32, namespace: i32, to_title: &str) -> RedirectRow {
        RedirectRow {
            partition: partition(),
            namespace,
            from_page_id: from,
            target_title: to_title.to_string(),
        }
    }

    #[test]
    fn resolves_titles_to_ids() {
        let (catalog, _) = load_page_catalog(
            vec![page(1, 0, "A", true), page(2, 0, "B", false)],
            &partition(),
        );

        let (table, stats) = build_redirect_table(vec![redirect(1, 0, "B")], &catalog, &partition());

        assert_eq!(table.get(1), Some(2));
        assert!(table.contains_source(1));
        assert!(!table.contains_source(2));
        assert_eq!(table.edges(), vec![RedirectEdge { from_id: 1, to_id: 2 }]);
        assert_eq!(stats.resolved, 1);
    }

    #[test]
    fn double_redirects_keep_the_direct_target() {
        // A -> B -> C
        let (catalog, _) = load_page_catalog(
            vec![page(1, 0, "A", true), page(2, 0, "B", true), page(3, 0, "C", false)],
            &partition(),
        );

        let (table, _) = build_redirect_table(
            vec![redirect(1, 0, "B"), redirect(2, 0, "C")],
            &catalog,
            &partition(),
        );

        assert_eq!(table.get(1), Some(2));
        assert_eq!(table.get(2), Some(3));
    }

    #[test]
    fn drops_what_cannot_be_resolved() {
        let (catalog, _) = load_page_catalog(
            vec![
                page(1, 0, "A", true),
                page(2, 0, "B", false),
                page(4, 0, "D", false),
            ],
            &partition(),
        );

        let (table, stats) = build_redirect_table(
            vec![
                redirect(1, 0, "Chubchik"),
                redirect(9, 0, "B"),
                redirect(4, 0, "B"),
                redirect(1, 2, "User:B"),
            ],
            &catalog,
            &partition(),
        );

        assert!(table.is_empty());
        assert_eq!(stats.unresolved_target, 1);
        assert_eq!(stats.unknown_source, 1);
        assert_eq!(stats.source_not_redirect, 1);
        assert_eq!(stats.other_namespace, 1);
    }

    #[test]
    fn first_row_wins_for_repeated_sources() {
        let (catalog, _) = load_page_catalog(
            vec![page(1, 0, "A", true), page(2, 0, "B", false), page(3, 0, "C", false)],
            &partition(),
        );

        let (table, stats) = build_redirect_table(
            vec![redirect(1, 0, "B"), redirect(1, 0, "C")],
            &catalog,
            &partition(),
        );

        assert_eq!(table.get(1), Some(2));
        assert_eq!(stats.duplicate_source, 1);
    }

    #[test]
    fn insert_keeps_the_first_target() {
        let mut table = RedirectTable::default();

        assert!(table.insert(RedirectEdge { from_id: 1, to_id: 2 }));
        assert!(!table.insert(RedirectEdge { from_id: 1, to_id: 3 }));

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(1), Some(2));
        assert_eq!(table.edges(), vec![RedirectEdge { from_id: 1, to_id: 2 }]);
    }
}
