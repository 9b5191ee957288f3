use crate::models::{PagelinkRow, Partition};
use crate::parsers::linktarget_parser::LinkTargets;
use crate::parsers::sql_dump::{self, parse_i32, parse_title, parse_u32, parse_u64};
use anyhow::bail;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PagelinksScan {
    pub rows: u64,
    pub unknown_linktargets: u64,
}

/// Streams the pagelinks dump into `visit`, one row per link tuple.
///
/// Two tuple layouts exist in the wild:
///   modern: (pl_from, pl_from_namespace, pl_target_id), titles live in `linktarget`
///   legacy: (pl_from, pl_namespace, pl_title, pl_from_namespace)
pub fn scan_pagelinks(
    path: &Path,
    partition: &Partition,
    linktargets: Option<&LinkTargets>,
    visit: &mut dyn FnMut(PagelinkRow),
) -> anyhow::Result<PagelinksScan> {
    let mut scan = PagelinksScan::default();

    sql_dump::for_each_insert_line(path, "pagelinks", |values| {
        sql_dump::for_each_tuple(values, |fields| {
            let row = match fields.len() {
                3 => {
                    let Some(linktargets) = linktargets else {
                        bail!("pagelinks dump uses pl_target_id but no linktarget table was loaded");
                    };
                    let target_id = parse_u64(fields[2], "pl_target_id")?;
                    let Some((target_namespace, target_title)) = linktargets.get(&target_id) else {
                        scan.unknown_linktargets += 1;
                        return Ok(());
                    };
                    PagelinkRow {
                        partition: partition.clone(),
                        source_page_id: parse_u32(fields[0], "pl_from")?,
                        source_namespace: parse_i32(fields[1], "pl_from_namespace")?,
                        target_namespace: *target_namespace,
                        target_title: target_title.clone(),
                    }
                }
                4 => PagelinkRow {
                    partition: partition.clone(),
                    source_page_id: parse_u32(fields[0], "pl_from")?,
                    target_namespace: parse_i32(fields[1], "pl_namespace")?,
                    target_title: parse_title(fields[2]),
                    source_namespace: parse_i32(fields[3], "pl_from_namespace")?,
                },
                n => bail!("unexpected pagelinks tuple with {} fields", n),
            };
            scan.rows += 1;
            visit(row);
            Ok(())
        })
    })?;

    if scan.unknown_linktargets > 0 {
        warn!(
            "skipped {} pagelinks with unknown pl_target_id",
            scan.unknown_linktargets
        );
    }
    info!("streamed {} pagelinks from {}", scan.rows, path.display());
    Ok(scan)
}
