use crate::parsers::sql_dump::{self, TITLE_TUPLE};
use crate::util;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::path::Path;
use tracing::info;

/// lt_id -> (lt_namespace, lt_title)
pub type LinkTargets = FxHashMap<u64, (i32, String)>;

// pl_target_id in modern pagelinks points at lt_id here
pub fn parse_linktargets(path: &Path) -> anyhow::Result<LinkTargets> {
    let tuple_re = Regex::new(TITLE_TUPLE)?;
    let mut linktargets = LinkTargets::default();

    sql_dump::for_each_insert_line(path, "linktarget", |values| {
        let line = String::from_utf8_lossy(values);
        for cap in tuple_re.captures_iter(&line) {
            let linktarget_id: u64 = cap[1].parse()?;
            let namespace: i32 = cap[2].parse()?;
            // Handle escaped stuff
            let title = util::unescape_sql_string(&cap[3]);
            linktargets.insert(linktarget_id, (namespace, title));
        }
        Ok(())
    })?;

    info!("parsed {} linktargets from {}", linktargets.len(), path.display());
    Ok(linktargets)
}
