use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GdcError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(String);

impl FileId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FileId {
    type Err = GdcError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        if normalized.is_empty() {
            return Err(GdcError::InvalidFileId(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputKind {
    Manifest,
    UuidList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Current,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Standard,
    Vcf,
    Maf,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Standard, Bucket::Vcf, Bucket::Maf];

    pub fn suffix(self) -> &'static str {
        match self {
            Bucket::Standard => ".files.txt",
            Bucket::Vcf => ".vcfs.txt",
            Bucket::Maf => ".mafs.txt",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Standard => "Standard",
            Bucket::Vcf => "VCF",
            Bucket::Maf => "MAF/XLSX",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
