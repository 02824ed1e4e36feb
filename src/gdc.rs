use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use tracing::debug;

use crate::config::{ApiSettings, FieldSelection};
use crate::domain::{Endpoint, FileId};
use crate::error::GdcError;

pub const BASE_FIELDS: [&str; 6] = [
    "file_id",
    "file_name",
    "cases.submitter_id",
    "cases.samples.sample_type",
    "cases.project.project_id",
    "cases.project.name",
];

pub const CLINICAL_EXPAND: [&str; 6] = [
    "cases",
    "cases.demographic",
    "cases.exposures",
    "cases.diagnoses",
    "cases.diagnoses.treatments",
    "cases.family_histories",
];

pub const BIOSPECIMEN_EXPAND: [&str; 7] = [
    "cases",
    "cases.samples",
    "cases.samples.portions",
    "cases.samples.portions.analytes",
    "cases.samples.portions.analytes.aliquots",
    "cases.samples.portions.slides",
    "analysis.metadata.read_groups",
];

#[derive(Debug, Clone)]
pub struct MetadataQuery {
    pub ids: Vec<FileId>,
    pub fields: FieldSelection,
    pub size: u32,
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    filters: Filter<'a>,
    format: &'static str,
    fields: String,
    expand: String,
    size: String,
}

#[derive(Debug, Serialize)]
struct Filter<'a> {
    op: &'static str,
    content: FilterContent<'a>,
}

#[derive(Debug, Serialize)]
struct FilterContent<'a> {
    field: &'static str,
    value: Vec<&'a str>,
}

impl MetadataQuery {
    pub fn new(ids: Vec<FileId>, fields: FieldSelection, size: u32) -> Self {
        Self { ids, fields, size }
    }

    pub fn field_list(&self) -> String {
        BASE_FIELDS.join(",")
    }

    pub fn expand_list(&self) -> String {
        let mut paths: Vec<&str> = Vec::new();
        let clinical = self.fields.clinical.then_some(CLINICAL_EXPAND.as_slice());
        let biospecimen = self
            .fields
            .biospecimen
            .then_some(BIOSPECIMEN_EXPAND.as_slice());
        for &path in clinical.into_iter().chain(biospecimen).flatten() {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths.join(",")
    }

    pub fn body(&self) -> impl Serialize + '_ {
        QueryBody {
            filters: Filter {
                op: "in",
                content: FilterContent {
                    field: "file_id",
                    value: self.ids.iter().map(FileId::as_str).collect(),
                },
            },
            format: "TSV",
            fields: self.field_list(),
            expand: self.expand_list(),
            size: self.size.to_string(),
        }
    }
}

pub trait MetadataClient {
    fn fetch_tsv(&self, endpoint: Endpoint, query: &MetadataQuery) -> Result<Vec<u8>, GdcError>;
}

impl<T: MetadataClient + ?Sized> MetadataClient for &T {
    fn fetch_tsv(&self, endpoint: Endpoint, query: &MetadataQuery) -> Result<Vec<u8>, GdcError> {
        (**self).fetch_tsv(endpoint, query)
    }
}

pub fn fetch_metadata<C: MetadataClient + ?Sized>(
    client: &C,
    endpoint: Endpoint,
    query: &MetadataQuery,
) -> Result<Vec<u8>, GdcError> {
    let payload = client.fetch_tsv(endpoint, query)?;
    check_payload(&payload)?;
    Ok(payload)
}

pub fn check_payload(payload: &[u8]) -> Result<(), GdcError> {
    if payload.trim_ascii().is_empty() {
        return Err(GdcError::NoResults);
    }
    Ok(())
}

#[derive(Clone)]
pub struct GdcHttpClient {
    client: Client,
    api: ApiSettings,
}

impl GdcHttpClient {
    pub fn new(api: ApiSettings) -> Result<Self, GdcError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("gdc-tsv/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| GdcError::GdcHttp(err.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(api.timeout_secs.map(Duration::from_secs))
            .build()
            .map_err(|err| GdcError::GdcHttp(err.to_string()))?;
        Ok(Self { client, api })
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, GdcError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "GDC request failed".to_string());
        Err(GdcError::GdcStatus { status, message })
    }
}

impl MetadataClient for GdcHttpClient {
    fn fetch_tsv(&self, endpoint: Endpoint, query: &MetadataQuery) -> Result<Vec<u8>, GdcError> {
        let url = self.api.url(endpoint);
        debug!(%url, ids = query.ids.len(), expand = %query.expand_list(), "querying GDC");
        let response = self
            .client
            .post(url)
            .json(&query.body())
            .send()
            .map_err(|err| GdcError::GdcHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        let bytes = response
            .bytes()
            .map_err(|err| GdcError::GdcHttp(err.to_string()))?;
        debug!(bytes = bytes.len(), "received GDC response");
        Ok(bytes.to_vec())
    }
}
