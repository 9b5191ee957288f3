use crate::models::{PageRow, Partition};
use crate::parsers::sql_dump;
use crate::util;
use regex::Regex;
use std::path::Path;
use tracing::info;

// (10 -> page_id,0 -> namespace,'Computer_accessibility' -> page_title,1 -> page_is_redirect
const PAGE_TUPLE: &str = r"\((\d+),(-?\d+),'((?:[^'\\]|\\.)*)',([01])";

/// Every page row of a page dump, all namespaces included.
pub fn parse_page_rows(path: &Path, partition: &Partition) -> anyhow::Result<Vec<PageRow>> {
    let tuple_re = Regex::new(PAGE_TUPLE)?;
    let mut rows = Vec::new();

    sql_dump::for_each_insert_line(path, "page", |values| {
        let line = String::from_utf8_lossy(values);
        for cap in tuple_re.captures_iter(&line) {
            rows.push(PageRow {
                partition: partition.clone(),
                page_id: cap[1].parse()?,
                namespace: cap[2].parse()?,
                // Handle escaped stuff
                title: util::unescape_sql_string(&cap[3]),
                is_redirect: &cap[4] == "1",
            });
        }
        Ok(())
    })?;

    info!("parsed {} page rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Snapshot;
    use crate::util::test_support::write_gz;

    #[test]
    fn parses_pages_across_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simplewiki-page.sql.gz");
        write_gz(
            &path,
            "INSERT INTO `page` VALUES (10,0,'Computer_accessibility',1,0,0.33,'20240101000000',NULL,5,120,'wikitext',NULL),\
             (12,0,'Rock\\'n\\'roll',0,0,0.5,'20240101000000',NULL,7,900,'wikitext',NULL),\
             (13,14,'Category:Music',0,1,0.1,'20240101000000',NULL,8,10,'wikitext',NULL);\n",
        );
        let partition = Partition::new("simplewiki", Snapshot::parse("2024-01").unwrap());

        let rows = parse_page_rows(&path, &partition).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].page_id, 10);
        assert!(rows[0].is_redirect);
        assert_eq!(rows[1].title, "Rock'n'roll");
        assert!(!rows[1].is_redirect);
        assert_eq!(rows[2].namespace, 14);
        assert!(rows.iter().all(|r| r.partition == partition));
    }
}
