use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationMap;
use crate::error::GenesymError;

/// Snapshot format version. Bump when the on-disk layout changes.
const SNAPSHOT_VERSION: u32 = 1;

/// Suffix appended to the source file name to locate its snapshot.
pub const SNAPSHOT_SUFFIX: &str = "cache";

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    source: String,
    created_at: String,
    map: AnnotationMap,
}

/// On-disk cache of parsed annotation tables, keyed by source path.
///
/// A snapshot is served as long as its file exists. There is no
/// staleness check against the source file; delete the snapshot to
/// force a re-parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotCache;

impl SnapshotCache {
    pub fn new() -> Self {
        Self
    }

    pub fn snapshot_path(source: &Utf8Path) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{source}.{SNAPSHOT_SUFFIX}"))
    }

    pub fn get(&self, source: &Utf8Path) -> Result<Option<AnnotationMap>, GenesymError> {
        let path = Self::snapshot_path(source);
        if !path.as_std_path().exists() {
            return Ok(None);
        }

        let file = File::open(path.as_std_path())
            .map_err(|err| GenesymError::CacheRead(path.clone(), err.to_string()))?;
        let snapshot: Snapshot = bincode::deserialize_from(BufReader::new(file))
            .map_err(|err| GenesymError::CacheRead(path.clone(), err.to_string()))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(GenesymError::CacheVersion {
                path,
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        Ok(Some(snapshot.map))
    }

    pub fn put(&self, source: &Utf8Path, map: &AnnotationMap) -> Result<(), GenesymError> {
        let path = Self::snapshot_path(source);
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            source: source.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            map: map.clone(),
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let mut temp = tempfile::Builder::new()
            .prefix("genesym-snapshot")
            .tempfile_in(dir.as_std_path())
            .map_err(|err| GenesymError::CacheWrite(path.clone(), err.to_string()))?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            bincode::serialize_into(&mut writer, &snapshot)
                .map_err(|err| GenesymError::CacheWrite(path.clone(), err.to_string()))?;
            writer
                .flush()
                .map_err(|err| GenesymError::CacheWrite(path.clone(), err.to_string()))?;
        }
        temp.persist(path.as_std_path())
            .map_err(|err| GenesymError::CacheWrite(path.clone(), err.to_string()))?;
        Ok(())
    }
}
