use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::info;

use crate::classify::{Buckets, classify};
use crate::config::RunConfig;
use crate::domain::{Bucket, Endpoint, InputKind};
use crate::error::GdcError;
use crate::gdc::{MetadataClient, MetadataQuery, fetch_metadata};
use crate::manifest::load_identifiers;
use crate::matrix::clean;
use crate::output::write_bucket;

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: String,
    pub input_kind: InputKind,
    pub endpoint: Endpoint,
    pub identifiers: usize,
    pub outputs: Vec<BucketResult>,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub label: String,
    pub ids: usize,
    pub path: String,
    pub columns: usize,
    pub rows: usize,
}

#[derive(Debug)]
pub enum ProgressEvent<'a> {
    Started {
        config: &'a RunConfig,
    },
    Written {
        bucket: Bucket,
        path: &'a Utf8Path,
    },
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent<'_>);
}

pub struct App<C: MetadataClient> {
    client: C,
}

impl<C: MetadataClient> App<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn run(&self, config: &RunConfig, sink: &dyn ProgressSink) -> Result<RunSummary, GdcError> {
        let identifiers = load_identifiers(&config.input, config.input_kind)?;
        let buckets = classify(&identifiers, config.input_kind);
        if buckets.total() == 0 {
            return Err(GdcError::NoResults);
        }
        info!(
            standard = buckets.standard.len(),
            vcf = buckets.vcf.len(),
            maf = buckets.maf.len(),
            "classified files"
        );

        sink.event(ProgressEvent::Started { config });
        let mut outputs = Vec::new();
        for bucket in selected_buckets(config) {
            if buckets.get(bucket).is_empty() {
                continue;
            }
            outputs.push(self.run_bucket(config, &buckets, bucket, sink)?);
        }

        Ok(RunSummary {
            input: config.input.display().to_string(),
            input_kind: config.input_kind,
            endpoint: config.endpoint,
            identifiers: identifiers.len(),
            outputs,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    fn run_bucket(
        &self,
        config: &RunConfig,
        buckets: &Buckets,
        bucket: Bucket,
        sink: &dyn ProgressSink,
    ) -> Result<BucketResult, GdcError> {
        let ids = buckets.get(bucket).to_vec();
        let id_count = ids.len();

        let query = MetadataQuery::new(ids, config.fields, config.api.size);
        let payload = fetch_metadata(&self.client, config.endpoint, &query)?;
        let cleaned = clean(&payload, config.keep_all_columns);

        let path: Utf8PathBuf = config.output_path(bucket.suffix());
        write_bucket(&path, &cleaned.text)?;
        info!(%bucket, %path, columns = cleaned.columns, rows = cleaned.rows, "wrote metadata");
        sink.event(ProgressEvent::Written {
            bucket,
            path: &path,
        });

        Ok(BucketResult {
            bucket,
            label: bucket.label().to_string(),
            ids: id_count,
            path: path.to_string(),
            columns: cleaned.columns,
            rows: cleaned.rows,
        })
    }
}

fn selected_buckets(config: &RunConfig) -> Vec<Bucket> {
    Bucket::ALL
        .into_iter()
        .filter(|bucket| *bucket != Bucket::Maf || config.include_maf)
        .collect()
}
