use serde::Serialize;

use crate::domain::{Bucket, FileId, InputKind};
use crate::manifest::IdentifierMap;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Buckets {
    pub standard: Vec<FileId>,
    pub vcf: Vec<FileId>,
    pub maf: Vec<FileId>,
}

impl Buckets {
    pub fn get(&self, bucket: Bucket) -> &[FileId] {
        match bucket {
            Bucket::Standard => &self.standard,
            Bucket::Vcf => &self.vcf,
            Bucket::Maf => &self.maf,
        }
    }

    fn push(&mut self, bucket: Bucket, id: FileId) {
        match bucket {
            Bucket::Standard => self.standard.push(id),
            Bucket::Vcf => self.vcf.push(id),
            Bucket::Maf => self.maf.push(id),
        }
    }

    pub fn total(&self) -> usize {
        self.standard.len() + self.vcf.len() + self.maf.len()
    }
}

pub fn extension_bucket(file_name: &str) -> Bucket {
    let mut segments = file_name.trim().rsplit('.');
    let mut extension = segments.next().unwrap_or_default();
    if extension == "gz" {
        extension = segments.next().unwrap_or_default();
    }
    match extension {
        "maf" | "xlsx" => Bucket::Maf,
        "vcf" => Bucket::Vcf,
        _ => Bucket::Standard,
    }
}

pub fn classify(map: &IdentifierMap, kind: InputKind) -> Buckets {
    let mut buckets = Buckets::default();
    for (id, file_name) in map.iter() {
        let bucket = match kind {
            InputKind::Manifest => extension_bucket(file_name),
            InputKind::UuidList => Bucket::Standard,
        };
        buckets.push(bucket, id.clone());
    }
    buckets
}
