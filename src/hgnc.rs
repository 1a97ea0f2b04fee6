use std::fs;

use camino::Utf8Path;
use serde_json::Value;

use crate::annotation::AnnotationMap;
use crate::error::GenesymError;

/// HGNC lookup table plus the documents that could not contribute one.
#[derive(Debug, Default)]
pub struct HgncTable {
    pub map: AnnotationMap,
    pub skipped: Vec<Value>,
}

/// Load an HGNC export shaped as `{"response": {"docs": [...]}}` into an
/// `ensembl_gene_id` -> `symbol` table.
///
/// Documents missing either field are skipped, logged, and collected in
/// the table's skip report. Re-parsed on every run; this source is not
/// snapshotted.
pub fn load_hgnc(path: &Utf8Path) -> Result<HgncTable, GenesymError> {
    let content = fs::read_to_string(path.as_std_path())
        .map_err(|err| GenesymError::FileOpen(path.to_path_buf(), err.to_string()))?;
    let raw: Value = serde_json::from_str(&content)
        .map_err(|err| GenesymError::HgncParse(path.to_path_buf(), err.to_string()))?;

    let docs = raw
        .get("response")
        .and_then(|v| v.get("docs"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            GenesymError::HgncParse(path.to_path_buf(), "missing response.docs array".to_string())
        })?;

    let mut table = HgncTable::default();
    for doc in docs {
        let gene_id = doc.get("ensembl_gene_id").and_then(|v| v.as_str());
        let symbol = doc.get("symbol").and_then(|v| v.as_str());
        match (gene_id, symbol) {
            (Some(gene_id), Some(symbol)) => {
                table.map.insert(gene_id.to_string(), symbol.to_string());
            }
            _ => {
                tracing::warn!(doc = %doc, "HGNC document missing ensembl_gene_id or symbol, skipped");
                table.skipped.push(doc.clone());
            }
        }
    }

    tracing::info!(
        path = %path,
        entries = table.map.len(),
        skipped = table.skipped.len(),
        "loaded HGNC table"
    );
    Ok(table)
}
