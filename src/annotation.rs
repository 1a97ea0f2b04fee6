use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};

use camino::Utf8Path;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::cache::SnapshotCache;
use crate::error::GenesymError;

/// Identifier -> name table built from one reference source.
///
/// Duplicate identifiers within a source overwrite earlier entries: the
/// last line of the file wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationMap {
    entries: HashMap<String, String>,
}

impl AnnotationMap {
    pub fn insert(&mut self, gene_id: String, name: String) {
        self.entries.insert(gene_id, name);
    }

    pub fn get(&self, gene_id: &str) -> Option<&str> {
        self.entries.get(gene_id).map(String::as_str)
    }

    pub fn contains(&self, gene_id: &str) -> bool {
        self.entries.contains_key(gene_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(id, name)| (id.as_str(), name.as_str()))
    }
}

impl FromIterator<(String, String)> for AnnotationMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Which attribute keys of column 9 carry the identifier and the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSchema {
    pub id_key: &'static str,
    pub name_key: &'static str,
}

impl AttributeSchema {
    pub const ENSEMBL: Self = Self {
        id_key: "gene_id",
        name_key: "Name",
    };

    pub const GENCODE: Self = Self {
        id_key: "ID",
        name_key: "gene_name",
    };
}

/// Load an annotation table, preferring a cache snapshot over a fresh
/// parse. A freshly parsed table is snapshotted exactly once.
pub fn load_annotation(
    path: &Utf8Path,
    schema: AttributeSchema,
    cache: &SnapshotCache,
) -> Result<AnnotationMap, GenesymError> {
    if let Some(map) = cache.get(path)? {
        tracing::info!(path = %path, entries = map.len(), "loaded annotation table from snapshot");
        return Ok(map);
    }
    let map = parse_annotation(path, schema)?;
    cache.put(path, &map)?;
    tracing::info!(path = %path, entries = map.len(), "parsed annotation table");
    Ok(map)
}

/// Parse a tab-separated annotation file (GFF3-like) into a table.
///
/// `#`-prefixed lines are skipped. Every other line must carry at least
/// 9 tab-separated fields; the 9th holds `;`-separated `key=value`
/// attribute tokens. Lines without the schema's id key are skipped with
/// a warning, never keyed on the empty string.
pub fn parse_annotation(
    path: &Utf8Path,
    schema: AttributeSchema,
) -> Result<AnnotationMap, GenesymError> {
    let reader = open_reader(path)?;
    let mut map = AnnotationMap::default();

    for (index, line) in reader.lines().enumerate() {
        let line =
            line.map_err(|err| GenesymError::FileOpen(path.to_path_buf(), err.to_string()))?;
        if line.starts_with('#') {
            continue;
        }

        let number = index + 1;
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 9 {
            return Err(GenesymError::AnnotationParse {
                path: path.to_path_buf(),
                line: number,
                reason: format!("expected 9 tab-separated fields, found {}", fields.len()),
            });
        }

        let mut gene_id: Option<&str> = None;
        let mut gene_name: Option<&str> = None;
        for token in fields[8].split(';') {
            if token.is_empty() {
                continue;
            }
            let (key, value) = token.split_once('=').ok_or_else(|| {
                GenesymError::AnnotationParse {
                    path: path.to_path_buf(),
                    line: number,
                    reason: format!("attribute token without '=': {token}"),
                }
            })?;
            if key == schema.id_key {
                gene_id = Some(value);
            } else if key == schema.name_key {
                gene_name = Some(value);
            }
        }

        match gene_id {
            Some(id) => {
                map.insert(id.to_string(), gene_name.unwrap_or_default().to_string());
            }
            None => {
                tracing::warn!(
                    path = %path,
                    line = number,
                    key = schema.id_key,
                    "feature line without identifier attribute, skipped"
                );
            }
        }
    }

    Ok(map)
}

fn open_reader(path: &Utf8Path) -> Result<Box<dyn BufRead>, GenesymError> {
    let file = File::open(path.as_std_path())
        .map_err(|err| GenesymError::FileOpen(path.to_path_buf(), err.to_string()))?;
    let reader: Box<dyn Read> = if path.extension() == Some("gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    Ok(Box::new(BufReader::new(reader)))
}
