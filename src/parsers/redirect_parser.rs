use crate::models::{Partition, RedirectRow};
use crate::parsers::sql_dump::{self, TITLE_TUPLE};
use crate::util;
use regex::Regex;
use std::path::Path;
use tracing::info;

pub fn parse_redirect_rows(
    path: &Path,
    partition: &Partition,
) -> anyhow::Result<Vec<RedirectRow>> {
    let tuple_re = Regex::new(TITLE_TUPLE)?;
    let mut rows = Vec::new();

    sql_dump::for_each_insert_line(path, "redirect", |values| {
        let line = String::from_utf8_lossy(values);
        for cap in tuple_re.captures_iter(&line) {
            rows.push(RedirectRow {
                partition: partition.clone(),
                from_page_id: cap[1].parse()?,
                namespace: cap[2].parse()?,
                target_title: util::unescape_sql_string(&cap[3]),
            });
        }
        Ok(())
    })?;

    info!("parsed {} redirect rows from {}", rows.len(), path.display());
    Ok(rows)
}
