use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GdcError {
    #[error("Input must be valid GDC Manifest.")]
    #[diagnostic(help("Go to https://portal.gdc.cancer.gov/ to download a manifest"))]
    BadManifest,

    #[error("Input must be valid GDC Manifest (line {line} has no file name column).")]
    #[diagnostic(help("manifest lines are tab-separated: id, filename, md5, size, state"))]
    ManifestLine { line: usize },

    #[error("Query produced no results, are these files from the Legacy Archive? (use -l)")]
    NoResults,

    #[error("invalid file id: {0:?}")]
    InvalidFileId(String),

    #[error("GDC request failed: {0}")]
    GdcHttp(String),

    #[error("GDC returned status {status}: {message}")]
    GdcStatus { status: u16, message: String },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
