use crate::models::{ArticleRecord, PageRow, Partition, MAIN_NAMESPACE};
use rustc_hash::FxHashMap;
use tracing::info;

/// Namespace-0 articles of one partition, addressable by id and by title.
#[derive(Debug, Default)]
pub struct PageCatalog {
    articles: FxHashMap<u32, ArticleRecord>,
    title_to_id: FxHashMap<String, u32>,
}

impl PageCatalog {
    pub fn get(&self, id: u32) -> Option<&ArticleRecord> {
        self.articles.get(&id)
    }

    pub fn id_for_title(&self, title: &str) -> Option<u32> {
        self.title_to_id.get(title).copied()
    }

    pub fn is_redirect(&self, id: u32) -> bool {
        self.articles.get(&id).is_some_and(|a| a.is_redirect)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CatalogStats {
    pub kept: u64,
    pub other_partition: u64,
    pub other_namespace: u64,
}

pub fn load_page_catalog(
    rows: impl IntoIterator<Item = PageRow>,
    partition: &Partition,
) -> (PageCatalog, CatalogStats) {
    let mut catalog = PageCatalog::default();
    let mut stats = CatalogStats::default();

    for row in rows {
        if row.partition != *partition {
            stats.other_partition += 1;
            continue;
        }
        if row.namespace != MAIN_NAMESPACE {
            stats.other_namespace += 1;
            continue;
        }
        stats.kept += 1;
        catalog.title_to_id.insert(row.title.clone(), row.page_id);
        catalog.articles.insert(
            row.page_id,
            ArticleRecord {
                id: row.page_id,
                title: row.title,
                is_redirect: row.is_redirect,
            },
        );
    }

    info!(
        "page catalog {}: {} articles ({} rows outside partition, {} outside namespace 0)",
        partition, stats.kept, stats.other_partition, stats.other_namespace
    );
    (catalog, stats)
}
