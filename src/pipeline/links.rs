use crate::models::{ExtractedLink, PagelinkRow, Partition, RawLink, MAIN_NAMESPACE};
use crate::pipeline::page_catalog::PageCatalog;
use crate::pipeline::redirects::RedirectTable;
use tracing::info;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    pub kept: u64,
    pub other_partition: u64,
    pub other_namespace: u64,
    pub from_redirect: u64,
    pub unresolved_target: u64,
}

/// Turns pagelinks rows into (from_id, to_id) pairs. Fed row by row so the
/// pagelinks table never has to be held in memory.
pub struct LinkExtractor<'a> {
    catalog: &'a PageCatalog,
    redirects: &'a RedirectTable,
    partition: &'a Partition,
    links: Vec<ExtractedLink>,
    stats: LinkStats,
}

impl<'a> LinkExtractor<'a> {
    pub fn new(
        catalog: &'a PageCatalog,
        redirects: &'a RedirectTable,
        partition: &'a Partition,
    ) -> Self {
        Self {
            catalog,
            redirects,
            partition,
            links: Vec::new(),
            stats: LinkStats::default(),
        }
    }

    pub fn push(&mut self, row: PagelinkRow) {
        if row.partition != *self.partition {
            self.stats.other_partition += 1;
            return;
        }
        if row.source_namespace != MAIN_NAMESPACE || row.target_namespace != MAIN_NAMESPACE {
            self.stats.other_namespace += 1;
            return;
        }
        // a redirect's own outgoing link says nothing about reading paths
        if self.redirects.contains_source(row.source_page_id)
            || self.catalog.is_redirect(row.source_page_id)
        {
            self.stats.from_redirect += 1;
            return;
        }

        let raw = RawLink {
            from_id: row.source_page_id,
            to_title: row.target_title,
        };
        match self.catalog.id_for_title(&raw.to_title) {
            Some(to_id) => {
                self.stats.kept += 1;
                self.links.push(ExtractedLink {
                    from_id: raw.from_id,
                    to_id,
                });
            }
            None => self.stats.unresolved_target += 1,
        }
    }

    pub fn finish(self) -> (Vec<ExtractedLink>, LinkStats) {
        let stats = self.stats;
        info!(
            "links {}: {} kept, {} from redirects, {} unresolved targets, {} outside namespace 0",
            self.partition,
            stats.kept,
            stats.from_redirect,
            stats.unresolved_target,
            stats.other_namespace
        );
        (self.links, stats)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pipeline::page_catalog::load_page_catalog;
    use crate::pipeline::page_catalog::tests::{page, partition};
    use crate::pipeline::redirects::build_redirect_table;
    use crate::pipeline::redirects::tests::redirect;

    fn extract_links(
        rows: impl IntoIterator<Item = PagelinkRow>,
        catalog: &PageCatalog,
        redirects: &RedirectTable,
        partition: &Partition,
    ) -> (Vec<ExtractedLink>, LinkStats) {
        let mut extractor = LinkExtractor::new(catalog, redirects, partition);
        for row in rows {
            extractor.push(row);
        }
        extractor.finish()
    }

    pub(crate) fn link(from: u32, to_title: &str) -> PagelinkRow {
        PagelinkRow {
            partition: partition(),
            source_namespace: 0,
            target_namespace: 0,
            source_page_id: from,
            target_title: to_title.to_string(),
        }
    }

    fn fixture() -> (PageCatalog, RedirectTable) {
        let (catalog, _) = load_page_catalog(
            vec![
                page(1, 0, "A", true),
                page(2, 0, "B", false),
                page(3, 0, "C", false),
                page(5, 0, "E", true),
            ],
            &partition(),
        );
        let (redirects, _) = build_redirect_table(vec![redirect(1, 0, "B")], &catalog, &partition());
        (catalog, redirects)
    }

    #[test]
    fn maps_titles_and_keeps_duplicates() {
        let (catalog, redirects) = fixture();

        let (links, stats) = extract_links(
            vec![link(3, "B"), link(3, "B"), link(2, "A")],
            &catalog,
            &redirects,
            &partition(),
        );

        assert_eq!(
            links,
            vec![
                ExtractedLink { from_id: 3, to_id: 2 },
                ExtractedLink { from_id: 3, to_id: 2 },
                ExtractedLink { from_id: 2, to_id: 1 },
            ]
        );
        assert_eq!(stats.kept, 3);
    }

    #[test]
    fn drops_links_out_of_redirects() {
        let (catalog, redirects) = fixture();

        // 1 has a resolved redirect row, 5 is only flagged in the catalog
        let (links, stats) = extract_links(
            vec![link(1, "C"), link(5, "C")],
            &catalog,
            &redirects,
            &partition(),
        );

        assert!(links.is_empty());
        assert_eq!(stats.from_redirect, 2);
    }

    #[test]
    fn drops_other_namespaces_and_unknown_titles() {
        let (catalog, redirects) = fixture();
        let mut talk_source = link(3, "B");
        talk_source.source_namespace = 1;
        let mut template_target = link(3, "B");
        template_target.target_namespace = 10;

        let (links, stats) = extract_links(
            vec![talk_source, template_target, link(3, "Nowhere")],
            &catalog,
            &redirects,
            &partition(),
        );

        assert!(links.is_empty());
        assert_eq!(stats.other_namespace, 2);
        assert_eq!(stats.unresolved_target, 1);
    }
}
