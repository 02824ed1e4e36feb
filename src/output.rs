use std::fs;
use std::io::{self, Write};

use camino::Utf8Path;
use serde::Serialize;

use crate::app::{ProgressEvent, ProgressSink, RunSummary};
use crate::config::RunConfig;
use crate::domain::Bucket;
use crate::error::GdcError;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

pub fn write_bucket(path: &Utf8Path, content: &str) -> Result<(), GdcError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| GdcError::Filesystem(err.to_string()))?;
    let mut temp = tempfile::Builder::new()
        .prefix(".gdc-tsv")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| GdcError::Filesystem(err.to_string()))?;
    temp.write_all(content.as_bytes())
        .map_err(|err| GdcError::Filesystem(err.to_string()))?;
    temp.persist(path.as_std_path())
        .map_err(|err| GdcError::Filesystem(format!("write {path}: {err}")))?;
    Ok(())
}

pub fn confirmation_line(bucket: Bucket, path: &Utf8Path) -> String {
    format!(">-- {} file metadata written to {}", bucket.label(), path)
}

pub fn banner(config: &RunConfig) -> String {
    let mut message = String::from("\n");
    if config.fields.is_simple() {
        message.push_str(">-- Retrieving basic metadata\n");
    }
    if config.fields.clinical {
        message.push_str(">-- Retrieving clinical metadata\n");
    }
    if config.fields.biospecimen {
        message.push_str(">-- Retrieving biospecimen metadata\n");
    }
    if config.include_maf {
        message.push_str(">-- Retrieving MAF/XLSX metadata\n");
    }
    message.push('\n');
    message.push_str("***************************************\n");
    message
}

pub struct HumanOutput;

impl ProgressSink for HumanOutput {
    fn event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { config } => println!("{}", banner(config)),
            ProgressEvent::Written { bucket, path } => {
                println!("{}\n", confirmation_line(bucket, path))
            }
        }
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &RunSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;

    #[test]
    fn confirmation_names_category_and_path() {
        let path = Utf8PathBuf::from("metadata.vcfs.txt");
        assert_eq!(
            confirmation_line(Bucket::Vcf, &path),
            ">-- VCF file metadata written to metadata.vcfs.txt"
        );
    }

    #[test]
    fn write_bucket_replaces_existing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("out").join("m.files.txt")).unwrap();
        write_bucket(&path, "old").unwrap();
        write_bucket(&path, "a\tb\n1\t2").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\tb\n1\t2");
    }
}
