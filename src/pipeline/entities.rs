use crate::models::{EntityLinkRow, EntityMapping};
use chrono::NaiveDate;
use std::cmp::{Ordering, Reverse};
use tracing::info;

/// Older item/page link exports carry mismatched items; ignore anything before this.
pub const DEFAULT_MIN_ENTITY_SNAPSHOT: &str = "2020-07-01";

/// At most one entity id per article, sorted by article id.
#[derive(Debug, Default)]
pub struct EntityMappings {
    mappings: Vec<EntityMapping>,
}

impl EntityMappings {
    pub fn get(&self, article_id: u32) -> Option<&str> {
        // binary search
        let mut lo = 0usize;
        let mut hi = self.mappings.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            match self.mappings[mid].article_id.cmp(&article_id) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Some(&self.mappings[mid].entity_id),
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EntityStats {
    pub selected: u64,
    pub other_wiki: u64,
    pub before_threshold: u64,
    pub superseded: u64,
}

/// Latest eligible mapping per article: filter, sort by (article, snapshot desc,
/// source order), keep the first row of every article group.
pub fn select_latest_entities(
    rows: impl IntoIterator<Item = EntityLinkRow>,
    wiki: &str,
    min_snapshot: NaiveDate,
) -> (EntityMappings, EntityStats) {
    let mut stats = EntityStats::default();

    let mut eligible: Vec<(u32, NaiveDate, usize, String)> = Vec::new();
    for (seq, row) in rows.into_iter().enumerate() {
        if row.wiki != wiki {
            stats.other_wiki += 1;
        } else if row.snapshot < min_snapshot {
            stats.before_threshold += 1;
        } else {
            eligible.push((row.page_id, row.snapshot, seq, row.entity_id));
        }
    }

    eligible.sort_unstable_by_key(|(page_id, date, seq, _)| (*page_id, Reverse(*date), *seq));

    let mut mappings: Vec<EntityMapping> = Vec::new();
    for (page_id, _, _, entity_id) in eligible {
        if mappings.last().is_some_and(|m| m.article_id == page_id) {
            stats.superseded += 1;
            continue;
        }
        mappings.push(EntityMapping {
            article_id: page_id,
            entity_id,
        });
    }
    stats.selected = mappings.len() as u64;

    info!(
        "entity mappings {}: {} selected, {} superseded, {} before {}",
        wiki, stats.selected, stats.superseded, stats.before_threshold, min_snapshot
    );
    (EntityMappings { mappings }, stats)
}
