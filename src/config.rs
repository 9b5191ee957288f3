// src/config.rs

use crate::parsers::parse_entity_snapshot;
use crate::pipeline::DEFAULT_MIN_ENTITY_SNAPSHOT;
use anyhow::Context;
use chrono::NaiveDate;
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DUMPS_DIR: &str = "../dumps";
pub const DEFAULT_STAGING_DIR: &str = "/tmp/wikilink-graph/graph";
pub const DEFAULT_OUTPUT_DIR: &str = "../output/graph";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironmentVariables {
    pub dumps_dir: PathBuf,
    pub entity_table: Option<PathBuf>,
    pub staging_dir: PathBuf,
    pub output_dir: PathBuf,
    pub entity_min_snapshot: NaiveDate,
}

impl EnvironmentVariables {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let dumps_dir = lookup("GRAPH_DUMPS_DIR").unwrap_or_else(|| DEFAULT_DUMPS_DIR.to_string());
        let entity_table = lookup("GRAPH_ENTITY_TABLE").filter(|v| !v.is_empty());
        let staging_dir =
            lookup("GRAPH_STAGING_DIR").unwrap_or_else(|| DEFAULT_STAGING_DIR.to_string());
        let output_dir = lookup("GRAPH_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());

        let entity_min_snapshot = match lookup("GRAPH_ENTITY_MIN_SNAPSHOT") {
            Some(val) => parse_entity_snapshot(&val).context("GRAPH_ENTITY_MIN_SNAPSHOT")?,
            None => parse_entity_snapshot(DEFAULT_MIN_ENTITY_SNAPSHOT)?,
        };

        Ok(Self {
            dumps_dir: PathBuf::from(dumps_dir),
            entity_table: entity_table.map(PathBuf::from),
            staging_dir: PathBuf::from(staging_dir),
            output_dir: PathBuf::from(output_dir),
            entity_min_snapshot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn falls_back_to_defaults() {
        let env = EnvironmentVariables::from_lookup(lookup_in(&[])).unwrap();

        assert_eq!(env.dumps_dir, PathBuf::from(DEFAULT_DUMPS_DIR));
        assert_eq!(env.staging_dir, PathBuf::from(DEFAULT_STAGING_DIR));
        assert_eq!(env.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(env.entity_table, None);
        assert_eq!(
            env.entity_min_snapshot,
            NaiveDate::from_ymd_opt(2020, 7, 1).unwrap()
        );
    }

    #[test]
    fn reads_overrides() {
        let env = EnvironmentVariables::from_lookup(lookup_in(&[
            ("GRAPH_DUMPS_DIR", "/data/dumps"),
            ("GRAPH_ENTITY_TABLE", "/data/item_page_link.tsv.gz"),
            ("GRAPH_ENTITY_MIN_SNAPSHOT", "2021-01"),
        ]))
        .unwrap();

        assert_eq!(env.dumps_dir, PathBuf::from("/data/dumps"));
        assert_eq!(
            env.entity_table,
            Some(PathBuf::from("/data/item_page_link.tsv.gz"))
        );
        assert_eq!(
            env.entity_min_snapshot,
            NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
        );
    }

    #[test]
    fn bad_threshold_is_fatal() {
        let result =
            EnvironmentVariables::from_lookup(lookup_in(&[("GRAPH_ENTITY_MIN_SNAPSHOT", "soon")]));
        assert!(result.is_err());
    }
}
