use crate::models::{NodeRecord, Partition, ResolvedEdge};
use crate::pipeline::GraphTables;
use anyhow::{bail, Context};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

const EXTENSION: &str = "parquet";

/// `graph_<wiki>_<snapshot>_<kind>.parquet`
pub fn output_file_name(partition: &Partition, kind: &str) -> String {
    format!(
        "graph_{}_{}_{}.{}",
        partition.wiki, partition.snapshot, kind, EXTENSION
    )
}

fn edges_schema() -> Schema {
    Schema::new(vec![
        Field::new("page_id_from", DataType::Int64, false),
        Field::new("page_id_to", DataType::Int64, false),
    ])
}

fn nodes_schema() -> Schema {
    Schema::new(vec![
        Field::new("page_id", DataType::Int64, false),
        Field::new("page_title", DataType::Utf8, false),
        Field::new("item_id", DataType::Utf8, true),
    ])
}

fn edges_to_record_batch(edges: &[ResolvedEdge]) -> anyhow::Result<RecordBatch> {
    let batch = RecordBatch::try_new(
        Arc::new(edges_schema()),
        vec![
            Arc::new(Int64Array::from_iter_values(
                edges.iter().map(|e| i64::from(e.from_id)),
            )),
            Arc::new(Int64Array::from_iter_values(
                edges.iter().map(|e| i64::from(e.to_id)),
            )),
        ],
    )?;
    Ok(batch)
}

fn nodes_to_record_batch(nodes: &[NodeRecord]) -> anyhow::Result<RecordBatch> {
    let batch = RecordBatch::try_new(
        Arc::new(nodes_schema()),
        vec![
            Arc::new(Int64Array::from_iter_values(
                nodes.iter().map(|n| i64::from(n.article_id)),
            )),
            Arc::new(StringArray::from_iter_values(
                nodes.iter().map(|n| &n.title),
            )),
            Arc::new(StringArray::from_iter(
                nodes.iter().map(|n| n.entity_id.as_deref()),
            )),
        ],
    )?;
    Ok(batch)
}

fn write_parquet(path: &Path, batch: &RecordBatch) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

fn parquet_row_count(path: &Path) -> anyhow::Result<i64> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = SerializedFileReader::new(file)?;
    Ok(reader.metadata().file_metadata().num_rows())
}

/// Staging area (the shared/distributed side) and the local destination.
#[derive(Debug, Clone)]
pub struct Exporter {
    pub staging_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Exporter {
    pub fn new(staging_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Writes edges then nodes. Returns the local paths.
    pub fn export(&self, graph: &GraphTables) -> anyhow::Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(&self.staging_dir)
            .with_context(|| format!("creating {}", self.staging_dir.display()))?;
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating {}", self.output_dir.display()))?;

        let edges = self.relocate(
            &output_file_name(&graph.partition, "edges"),
            &edges_to_record_batch(&graph.edges)?,
        )?;
        let nodes = self.relocate(
            &output_file_name(&graph.partition, "nodes"),
            &nodes_to_record_batch(&graph.nodes)?,
        )?;
        Ok((edges, nodes))
    }

    /// write staged -> copy to local -> verify -> delete staged.
    /// A failure part way leaves whatever was done in place; re-running overwrites it.
    fn relocate(&self, file_name: &str, batch: &RecordBatch) -> anyhow::Result<PathBuf> {
        let staged = self.staging_dir.join(file_name);
        let staged_tmp = self.staging_dir.join(format!("{}.inprogress", file_name));
        write_parquet(&staged_tmp, batch)?;
        fs::rename(&staged_tmp, &staged)
            .with_context(|| format!("moving {} into place", staged.display()))?;
        info!("wrote {} rows to {}", batch.num_rows(), staged.display());

        let local = self.output_dir.join(file_name);
        let local_tmp = self.output_dir.join(format!("{}.partial", file_name));
        let copied = fs::copy(&staged, &local_tmp).with_context(|| {
            format!("copying {} to {}", staged.display(), local_tmp.display())
        })?;

        let staged_len = fs::metadata(&staged)?.len();
        if copied != staged_len {
            bail!(
                "copy of {} is {} bytes, expected {}",
                staged.display(),
                copied,
                staged_len
            );
        }
        let rows = parquet_row_count(&local_tmp)?;
        if rows != batch.num_rows() as i64 {
            bail!(
                "copy of {} holds {} rows, expected {}",
                staged.display(),
                rows,
                batch.num_rows()
            );
        }
        fs::rename(&local_tmp, &local)
            .with_context(|| format!("moving {} into place", local.display()))?;

        fs::remove_file(&staged).with_context(|| format!("removing {}", staged.display()))?;
        info!("exported {}", local.display());
        Ok(local)
    }
}
