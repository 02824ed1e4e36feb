use std::fs;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

use gdc_metadata_tool::classify::classify;
use gdc_metadata_tool::domain::{Bucket, InputKind};
use gdc_metadata_tool::manifest::load_identifiers;

const MANIFEST: &str = "id\tfilename\tmd5\tsize\tstate\n\
    a\tTCGA.sample.bam\t00\t1\treleased\n\
    b\tTCGA.somatic.vcf.gz\t00\t1\treleased\n\
    c\tTCGA.mutect.maf.gz\t00\t1\treleased\n";

#[test]
fn loads_plain_manifest() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("gdc_manifest.txt");
    fs::write(&path, MANIFEST).unwrap();

    let map = load_identifiers(&path, InputKind::Manifest).unwrap();
    assert_eq!(map.len(), 3);
    let buckets = classify(&map, InputKind::Manifest);
    assert_eq!(buckets.get(Bucket::Standard).len(), 1);
    assert_eq!(buckets.get(Bucket::Vcf).len(), 1);
    assert_eq!(buckets.get(Bucket::Maf).len(), 1);
}

#[test]
fn loads_gzipped_manifest() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("gdc_manifest.txt.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(MANIFEST.as_bytes()).unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let map = load_identifiers(&path, InputKind::Manifest).unwrap();
    let ids: Vec<&str> = map.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn missing_input_is_filesystem_error() {
    let temp = tempfile::tempdir().unwrap();
    let err = load_identifiers(&temp.path().join("nope.txt"), InputKind::UuidList).unwrap_err();
    assert!(err.to_string().starts_with("filesystem error"));
}
