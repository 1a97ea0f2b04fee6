use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::annotation::{AttributeSchema, load_annotation};
use crate::cache::SnapshotCache;
use crate::convert::convert_workbook;
use crate::error::GenesymError;
use crate::hgnc::load_hgnc;
use crate::resolve::GeneResolver;

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub ensembl_gff3: Utf8PathBuf,
    pub gencode_gff3: Utf8PathBuf,
    pub hgnc_json: Utf8PathBuf,
    pub xlsx_file: Utf8PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ensembl_entries: usize,
    pub gencode_entries: usize,
    pub hgnc_entries: usize,
    pub hgnc_skipped: usize,
    pub resolved: usize,
    pub missing: usize,
    pub resolved_path: String,
    pub missing_path: String,
}

pub struct App {
    cache: SnapshotCache,
    out_dir: Utf8PathBuf,
}

impl App {
    pub fn new(cache: SnapshotCache) -> Result<Self, GenesymError> {
        let cwd =
            std::env::current_dir().map_err(|err| GenesymError::Filesystem(err.to_string()))?;
        let out_dir = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|_| GenesymError::Filesystem("invalid working directory".to_string()))?;
        Ok(Self { cache, out_dir })
    }

    pub fn with_out_dir(cache: SnapshotCache, out_dir: Utf8PathBuf) -> Self {
        Self { cache, out_dir }
    }

    pub fn out_dir(&self) -> &Utf8Path {
        &self.out_dir
    }

    pub fn run(&self, request: &RunRequest) -> Result<RunSummary, GenesymError> {
        let ensembl =
            load_annotation(&request.ensembl_gff3, AttributeSchema::ENSEMBL, &self.cache)?;
        let gencode =
            load_annotation(&request.gencode_gff3, AttributeSchema::GENCODE, &self.cache)?;
        let hgnc = load_hgnc(&request.hgnc_json)?;

        let ensembl_entries = ensembl.len();
        let gencode_entries = gencode.len();
        let hgnc_entries = hgnc.map.len();
        let hgnc_skipped = hgnc.skipped.len();

        let resolver = GeneResolver::new(ensembl, hgnc.map, gencode);
        let outcome = convert_workbook(&request.xlsx_file, &resolver, &self.out_dir)?;

        Ok(RunSummary {
            ensembl_entries,
            gencode_entries,
            hgnc_entries,
            hgnc_skipped,
            resolved: outcome.resolved,
            missing: outcome.missing.len(),
            resolved_path: outcome.resolved_path.to_string(),
            missing_path: outcome.missing_path.to_string(),
        })
    }
}
