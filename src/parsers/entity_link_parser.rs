use crate::models::EntityLinkRow;
use crate::util;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use std::io::BufRead;
use std::path::Path;
use tracing::info;

/// Accepts `YYYY-MM-DD` or `YYYY-MM` (first of the month).
pub fn parse_entity_snapshot(s: &str) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    match NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => bail!("invalid entity snapshot '{}'", s),
    }
}

/// Reads the tab-separated item/page link export:
/// wiki_db \t snapshot \t page_id \t item_id
pub fn parse_entity_link_rows(path: &Path) -> anyhow::Result<Vec<EntityLinkRow>> {
    let (reader, pb) = util::open_with_progress(path)?;
    let mut rows = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if i == 0 && fields[0] == "wiki_db" {
            continue; // header
        }
        if fields.len() != 4 {
            bail!(
                "{}:{}: expected 4 columns, found {}",
                path.display(),
                line_no,
                fields.len()
            );
        }

        rows.push(EntityLinkRow {
            wiki: fields[0].to_string(),
            snapshot: parse_entity_snapshot(fields[1])
                .with_context(|| format!("{}:{}", path.display(), line_no))?,
            page_id: fields[2]
                .trim()
                .parse()
                .with_context(|| format!("{}:{}: invalid page_id", path.display(), line_no))?,
            entity_id: fields[3].trim().to_string(),
        });
    }

    pb.finish_and_clear();
    info!("parsed {} entity link rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_support::write_gz;

    #[test]
    fn accepts_day_and_month_snapshots() {
        assert_eq!(
            parse_entity_snapshot("2020-07-06").unwrap(),
            NaiveDate::from_ymd_opt(2020, 7, 6).unwrap()
        );
        assert_eq!(
            parse_entity_snapshot("2021-06").unwrap(),
            NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()
        );
        assert!(parse_entity_snapshot("last week").is_err());
    }

    #[test]
    fn parses_rows_and_skips_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item_page_link.tsv.gz");
        write_gz(
            &path,
            "wiki_db\tsnapshot\tpage_id\titem_id\n\
             enwiki\t2021-01-04\t12\tQ1\n\
             \n\
             dewiki\t2021-06\t7\tQ42\n",
        );

        let rows = parse_entity_link_rows(&path).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].wiki, "enwiki");
        assert_eq!(rows[0].page_id, 12);
        assert_eq!(rows[1].entity_id, "Q42");
        assert_eq!(rows[1].snapshot, NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());
    }

    #[test]
    fn malformed_lines_name_their_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item_page_link.tsv");
        std::fs::write(&path, "enwiki\t2021-01-04\t12\tQ1\nenwiki\t2021-01-04\tnope\tQ2\n").unwrap();

        let err = parse_entity_link_rows(&path).unwrap_err();
        assert!(format!("{:#}", err).contains(":2"));
    }
}
