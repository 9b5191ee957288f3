// src/models.rs

use anyhow::bail;
use chrono::{Datelike, Months, NaiveDate};
use std::fmt;
use std::sync::Arc;

pub const MAIN_NAMESPACE: i32 = 0;

// --- Identifiers ---

/// Year-month version of a dump export, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Snapshot {
    year: i32,
    month: u32,
}

impl Snapshot {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        // chrono wants a day, so pin it to the first
        let date = match NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => bail!("invalid snapshot '{}', expected YYYY-MM", s),
        };
        Ok(Self::from_date(date))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Two calendar months before `today`.
    pub fn default_for(today: NaiveDate) -> Self {
        let date = today.checked_sub_months(Months::new(2)).unwrap_or(today);
        Self::from_date(date)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// `en`, `enwiki` and `enwikiwiki` all become `enwiki`.
pub fn normalize_wiki(lang: &str) -> String {
    format!("{}wiki", lang.trim().replace("wiki", ""))
}

/// One (wiki, snapshot) slice of the input tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    pub wiki: Arc<str>,
    pub snapshot: Snapshot,
}

impl Partition {
    pub fn new(wiki: &str, snapshot: Snapshot) -> Self {
        Self {
            wiki: Arc::from(wiki),
            snapshot,
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.wiki, self.snapshot)
    }
}

// --- Raw table rows ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRow {
    pub partition: Partition,
    pub page_id: u32,
    pub namespace: i32,
    pub title: String,
    pub is_redirect: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRow {
    pub partition: Partition,
    pub namespace: i32,
    pub from_page_id: u32,
    pub target_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagelinkRow {
    pub partition: Partition,
    pub source_namespace: i32,
    pub target_namespace: i32,
    pub source_page_id: u32,
    pub target_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLinkRow {
    pub wiki: String,
    // weekly exports carry a full date
    pub snapshot: NaiveDate,
    pub page_id: u32,
    pub entity_id: String,
}

// --- Derived records ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub id: u32,
    pub title: String,
    pub is_redirect: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RedirectEdge {
    pub from_id: u32,
    pub to_id: u32,
}

/// A link from a non-redirect article, target still a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub from_id: u32,
    pub to_title: String,
}

/// A link whose target title was found in the catalog. May repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtractedLink {
    pub from_id: u32,
    pub to_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolvedEdge {
    pub from_id: u32,
    pub to_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMapping {
    pub article_id: u32,
    pub entity_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeRecord {
    pub article_id: u32,
    pub title: String,
    pub entity_id: Option<String>,
}
