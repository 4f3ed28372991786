//! Parquet I/O for edge-list persistence
//!
//! Based on `DuckDB` (Raasveldt et al., SIGMOD 2019) columnar storage patterns.
//!
//! # Format
//!
//! A graph is stored as one Parquet file:
//! - `{path}_edges.parquet`: (source, target), both `UInt32` global ids
//!
//! Isolated trailing nodes are not represented; a loaded graph spans
//! `0..=max(source, target)`.

use super::{CsrGraph, GlobalNodeId};
use anyhow::{Context, Result};
use arrow::array::UInt32Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::arrow_writer::ArrowWriter;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

impl CsrGraph {
    /// Write graph edges to `{path}_edges.parquet`
    ///
    /// Encoding and file I/O run on tokio's blocking pool.
    ///
    /// # Errors
    ///
    /// Returns error if file I/O fails or Arrow conversion fails
    pub async fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let edges_path = format!("{}_edges.parquet", path.as_ref().display());
        let (sources, targets): (Vec<u32>, Vec<u32>) =
            self.iter_edges().map(|(src, dst)| (src.0, dst.0)).unzip();

        tokio::task::spawn_blocking(move || write_edges_parquet(&edges_path, sources, targets))
            .await
            .context("Parquet writer task failed")?
    }

    /// Read graph edges from `{path}_edges.parquet`
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist or Arrow conversion fails
    pub async fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let edges_path = format!("{}_edges.parquet", path.as_ref().display());

        let edges = tokio::task::spawn_blocking(move || read_edges_parquet(&edges_path))
            .await
            .context("Parquet reader task failed")??;
        Self::from_edge_list(&edges)
    }
}

fn write_edges_parquet(edges_path: &str, sources: Vec<u32>, targets: Vec<u32>) -> Result<()> {
    let edges = sources.len();
    let schema = Arc::new(Schema::new(vec![
        Field::new("source", DataType::UInt32, false),
        Field::new("target", DataType::UInt32, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(UInt32Array::from(sources)),
            Arc::new(UInt32Array::from(targets)),
        ],
    )
    .context("Failed to create RecordBatch")?;

    let file = File::create(edges_path).with_context(|| format!("Failed to create {edges_path}"))?;

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::ZSTD(
            parquet::basic::ZstdLevel::try_new(3)?,
        ))
        .build();

    let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    tracing::debug!(path = %edges_path, edges, "wrote edge list");
    Ok(())
}

fn read_edges_parquet(edges_path: &str) -> Result<Vec<(GlobalNodeId, GlobalNodeId)>> {
    let file = File::open(edges_path).with_context(|| format!("Failed to open {edges_path}"))?;

    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut edges = Vec::new();

    for batch_result in reader {
        let batch: RecordBatch = batch_result?;

        let sources = batch
            .column(0)
            .as_any()
            .downcast_ref::<UInt32Array>()
            .context("Invalid source column type")?;

        let targets = batch
            .column(1)
            .as_any()
            .downcast_ref::<UInt32Array>()
            .context("Invalid target column type")?;

        edges.extend(
            sources
                .values()
                .iter()
                .zip(targets.values().iter())
                .map(|(&s, &t)| (GlobalNodeId(s), GlobalNodeId(t))),
        );
    }

    tracing::debug!(path = %edges_path, edges = edges.len(), "read edge list");
    Ok(edges)
}
