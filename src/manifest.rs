use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::domain::{FileId, InputKind};
use crate::error::GdcError;

/// Inserting an id twice keeps its original position and replaces the file
/// name, matching how repeated manifest rows were always resolved.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMap {
    entries: Vec<(FileId, String)>,
    index: HashMap<FileId, usize>,
}

impl IdentifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: FileId, file_name: String) {
        match self.index.get(&id) {
            Some(&pos) => self.entries[pos].1 = file_name,
            None => {
                self.index.insert(id.clone(), self.entries.len());
                self.entries.push((id, file_name));
            }
        }
    }

    pub fn get(&self, id: &FileId) -> Option<&str> {
        self.index
            .get(id)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FileId, &str)> {
        self.entries.iter().map(|(id, name)| (id, name.as_str()))
    }
}

pub fn load_identifiers(path: &Path, kind: InputKind) -> Result<IdentifierMap, GdcError> {
    let text = read_input(path)?;
    let map = parse_identifiers(&text, kind)?;
    debug!(path = %path.display(), ids = map.len(), "loaded identifiers");
    Ok(map)
}

pub fn parse_identifiers(text: &str, kind: InputKind) -> Result<IdentifierMap, GdcError> {
    match kind {
        InputKind::Manifest => parse_manifest(text),
        InputKind::UuidList => parse_uuid_list(text),
    }
}

fn parse_manifest(text: &str) -> Result<IdentifierMap, GdcError> {
    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default();
    if !header.starts_with("id") {
        return Err(GdcError::BadManifest);
    }

    let mut map = IdentifierMap::new();
    for (offset, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let id = fields.next().unwrap_or_default();
        let file_name = fields
            .next()
            .ok_or(GdcError::ManifestLine { line: offset + 2 })?;
        map.insert(id.parse()?, file_name.to_string());
    }
    Ok(map)
}

fn parse_uuid_list(text: &str) -> Result<IdentifierMap, GdcError> {
    let mut map = IdentifierMap::new();
    for (offset, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || (offset == 0 && line == "id") {
            continue;
        }
        map.insert(line.parse()?, String::new());
    }
    Ok(map)
}

fn read_input(path: &Path) -> Result<String, GdcError> {
    let file = File::open(path)
        .map_err(|err| GdcError::Filesystem(format!("open {}: {err}", path.display())))?;
    let is_gzip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false);

    let mut text = String::new();
    let result = if is_gzip {
        GzDecoder::new(file).read_to_string(&mut text)
    } else {
        let mut file = file;
        file.read_to_string(&mut text)
    };
    result.map_err(|err| GdcError::Filesystem(format!("read {}: {err}", path.display())))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const MANIFEST: &str = "id\tfilename\tmd5\tsize\tstate\n\
        aaa\tsample.bam\t0f\t10\treleased\n\
        bbb\tcalls.vcf.gz\t1e\t20\treleased\n";

    #[test]
    fn manifest_keys_by_first_field() {
        let map = parse_identifiers(MANIFEST, InputKind::Manifest).unwrap();
        assert_eq!(map.len(), 2);
        let aaa: FileId = "aaa".parse().unwrap();
        assert_eq!(map.get(&aaa), Some("sample.bam"));
    }

    #[test]
    fn manifest_requires_id_header() {
        let err = parse_identifiers("uuid\tfilename\naaa\tx.bam\n", InputKind::Manifest)
            .unwrap_err();
        assert_matches!(err, GdcError::BadManifest);
    }

    #[test]
    fn empty_manifest_is_rejected() {
        let err = parse_identifiers("", InputKind::Manifest).unwrap_err();
        assert_matches!(err, GdcError::BadManifest);
    }

    #[test]
    fn manifest_row_without_file_name() {
        let err = parse_identifiers("id\tfilename\naaa\n", InputKind::Manifest).unwrap_err();
        assert_matches!(err, GdcError::ManifestLine { line: 2 });
    }

    #[test]
    fn duplicate_ids_last_write_wins() {
        let text = "id\tfilename\naaa\tfirst.bam\nbbb\tother.bam\naaa\tsecond.maf\n";
        let map = parse_identifiers(text, InputKind::Manifest).unwrap();
        let ids: Vec<_> = map.iter().map(|(id, name)| (id.as_str(), name)).collect();
        assert_eq!(ids, vec![("aaa", "second.maf"), ("bbb", "other.bam")]);
    }

    #[test]
    fn uuid_list_has_empty_names() {
        let map = parse_identifiers("aaa\n\n  bbb  \r\n", InputKind::UuidList).unwrap();
        let ids: Vec<_> = map.iter().map(|(id, name)| (id.as_str(), name)).collect();
        assert_eq!(ids, vec![("aaa", ""), ("bbb", "")]);
    }

    #[test]
    fn uuid_list_skips_id_header() {
        let map = parse_identifiers("id\naaa\n", InputKind::UuidList).unwrap();
        assert_eq!(map.len(), 1);
    }
}
