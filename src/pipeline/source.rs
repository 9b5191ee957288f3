use crate::models::{EntityLinkRow, PageRow, PagelinkRow, Partition, RedirectRow};
use crate::parsers::*;
use anyhow::bail;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Where the four input tables come from. The transformation stages only
/// ever see rows, so any backing that can produce them will do.
pub trait TableSource {
    fn pages(&self, partition: &Partition) -> anyhow::Result<Vec<PageRow>>;
    fn redirects(&self, partition: &Partition) -> anyhow::Result<Vec<RedirectRow>>;
    /// Streamed: this table dwarfs the others.
    fn pagelinks(
        &self,
        partition: &Partition,
        visit: &mut dyn FnMut(PagelinkRow),
    ) -> anyhow::Result<()>;
    fn entity_links(&self) -> anyhow::Result<Vec<EntityLinkRow>>;
}

/// Rows held in memory, any mix of partitions.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct InMemoryTables {
    pub pages: Vec<PageRow>,
    pub redirects: Vec<RedirectRow>,
    pub pagelinks: Vec<PagelinkRow>,
    pub entity_links: Vec<EntityLinkRow>,
}

#[cfg(test)]
impl TableSource for InMemoryTables {
    fn pages(&self, _partition: &Partition) -> anyhow::Result<Vec<PageRow>> {
        Ok(self.pages.clone())
    }

    fn redirects(&self, _partition: &Partition) -> anyhow::Result<Vec<RedirectRow>> {
        Ok(self.redirects.clone())
    }

    fn pagelinks(
        &self,
        _partition: &Partition,
        visit: &mut dyn FnMut(PagelinkRow),
    ) -> anyhow::Result<()> {
        for row in &self.pagelinks {
            visit(row.clone());
        }
        Ok(())
    }

    fn entity_links(&self) -> anyhow::Result<Vec<EntityLinkRow>> {
        Ok(self.entity_links.clone())
    }
}

/// MediaWiki SQL dumps laid out as `<root>/<wiki>/<YYYY-MM>/<wiki>-<table>.sql.gz`,
/// plus an optional item/page link TSV.
#[derive(Debug, Clone)]
pub struct DumpTables {
    pub dumps_dir: PathBuf,
    pub entity_table: Option<PathBuf>,
}

impl DumpTables {
    pub fn new(dumps_dir: impl Into<PathBuf>, entity_table: Option<PathBuf>) -> Self {
        Self {
            dumps_dir: dumps_dir.into(),
            entity_table,
        }
    }

    pub fn table_path(&self, partition: &Partition, table: &str) -> PathBuf {
        self.dumps_dir
            .join(&*partition.wiki)
            .join(partition.snapshot.to_string())
            .join(format!("{}-{}.sql.gz", partition.wiki, table))
    }

    fn existing_table(&self, partition: &Partition, table: &str) -> anyhow::Result<PathBuf> {
        let path = self.table_path(partition, table);
        if !path.is_file() {
            bail!("missing {} dump for {}: {}", table, partition, path.display());
        }
        Ok(path)
    }
}

impl TableSource for DumpTables {
    fn pages(&self, partition: &Partition) -> anyhow::Result<Vec<PageRow>> {
        parse_page_rows(&self.existing_table(partition, "page")?, partition)
    }

    fn redirects(&self, partition: &Partition) -> anyhow::Result<Vec<RedirectRow>> {
        parse_redirect_rows(&self.existing_table(partition, "redirect")?, partition)
    }

    fn pagelinks(
        &self,
        partition: &Partition,
        visit: &mut dyn FnMut(PagelinkRow),
    ) -> anyhow::Result<()> {
        let pagelinks = self.existing_table(partition, "pagelinks")?;
        let linktarget = self.table_path(partition, "linktarget");
        let linktargets = if linktarget.is_file() {
            Some(parse_linktargets(&linktarget)?)
        } else {
            None
        };
        scan_pagelinks(&pagelinks, partition, linktargets.as_ref(), visit)?;
        Ok(())
    }

    fn entity_links(&self) -> anyhow::Result<Vec<EntityLinkRow>> {
        match &self.entity_table {
            Some(path) => parse_entity_link_rows(path),
            None => {
                warn!("no entity link table configured, nodes will carry no entity ids");
                Ok(Vec::new())
            }
        }
    }
}

pub fn dump_dir_exists(dumps_dir: &Path, partition: &Partition) -> bool {
    dumps_dir
        .join(&*partition.wiki)
        .join(partition.snapshot.to_string())
        .is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Snapshot;
    use crate::util::test_support::write_gz;

    #[test]
    fn reads_a_dump_directory() {
        let dir = tempfile::tempdir().unwrap();
        let partition = Partition::new("simplewiki", Snapshot::parse("2024-05").unwrap());
        let tables = DumpTables::new(dir.path(), None);
        std::fs::create_dir_all(dir.path().join("simplewiki/2024-05")).unwrap();
        assert!(dump_dir_exists(dir.path(), &partition));

        write_gz(
            &tables.table_path(&partition, "page"),
            "INSERT INTO `page` VALUES (1,0,'A',1,0,0.1,'',NULL,1,1,'wikitext',NULL),(2,0,'B',0,0,0.1,'',NULL,1,1,'wikitext',NULL);\n",
        );
        write_gz(
            &tables.table_path(&partition, "redirect"),
            "INSERT INTO `redirect` VALUES (1,0,'B','','');\n",
        );
        write_gz(
            &tables.table_path(&partition, "linktarget"),
            "INSERT INTO `linktarget` VALUES (5,0,'A');\n",
        );
        write_gz(
            &tables.table_path(&partition, "pagelinks"),
            "INSERT INTO `pagelinks` VALUES (2,0,5);\n",
        );

        assert_eq!(tables.pages(&partition).unwrap().len(), 2);
        assert_eq!(tables.redirects(&partition).unwrap().len(), 1);
        let mut links = Vec::new();
        tables.pagelinks(&partition, &mut |row| links.push(row)).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target_title, "A");
        assert!(tables.entity_links().unwrap().is_empty());
    }

    #[test]
    fn missing_dumps_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let partition = Partition::new("enwiki", Snapshot::parse("2024-05").unwrap());
        let tables = DumpTables::new(dir.path(), None);

        assert!(!dump_dir_exists(dir.path(), &partition));
        assert!(tables.pages(&partition).is_err());
    }
}
