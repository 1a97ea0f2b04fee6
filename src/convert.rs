use std::collections::HashSet;

use calamine::{Data, Reader, Xlsx, open_workbook};
use camino::{Utf8Path, Utf8PathBuf};
use rust_xlsxwriter::Workbook;

use crate::error::GenesymError;
use crate::resolve::{GENE_ID_PREFIX, GeneResolver};

/// Suffix appended to the input stem for the resolved output workbook.
pub const RESOLVED_SUFFIX: &str = "_genename";

/// Fixed file name of the unresolved-identifier workbook.
pub const MISSING_FILE_NAME: &str = "missing_genename.xlsx";

#[derive(Debug)]
pub struct ConvertOutcome {
    pub resolved: usize,
    pub missing: Vec<String>,
    pub resolved_path: Utf8PathBuf,
    pub missing_path: Utf8PathBuf,
}

pub fn resolved_output_name(input: &Utf8Path) -> String {
    let stem = input.file_stem().unwrap_or("input");
    format!("{stem}{RESOLVED_SUFFIX}.xlsx")
}

/// Scan the first worksheet of `input` for `ENSG`-prefixed text cells,
/// resolve each against the reference tables, and write the resolved and
/// missing workbooks into `out_dir`.
///
/// Cells are visited row-major, column order within a row. Non-text
/// cells cannot carry a gene accession and are skipped. Each distinct
/// unresolved identifier is recorded once, in first-seen order.
pub fn convert_workbook(
    input: &Utf8Path,
    resolver: &GeneResolver,
    out_dir: &Utf8Path,
) -> Result<ConvertOutcome, GenesymError> {
    let mut workbook: Xlsx<_> = open_workbook(input.as_std_path())
        .map_err(|err: calamine::XlsxError| {
            GenesymError::WorkbookRead(input.to_path_buf(), err.to_string())
        })?;
    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| GenesymError::EmptyWorkbook(input.to_path_buf()))?;
    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|err| GenesymError::WorkbookRead(input.to_path_buf(), err.to_string()))?;

    let resolved_path = out_dir.join(resolved_output_name(input));
    let missing_path = out_dir.join(MISSING_FILE_NAME);

    let mut resolved_book = Workbook::new();
    let resolved_sheet = resolved_book.add_worksheet();
    resolved_sheet
        .write_string(0, 0, "gene_id")
        .and_then(|sheet| sheet.write_string(0, 1, "gene_name"))
        .map_err(|err| GenesymError::WorkbookWrite(resolved_path.clone(), err.to_string()))?;

    let mut resolved_rows: u32 = 0;
    let mut missing = Vec::new();
    let mut seen_missing = HashSet::new();

    for row in range.rows() {
        for cell in row {
            let Data::String(value) = cell else {
                continue;
            };
            if !value.starts_with(GENE_ID_PREFIX) {
                continue;
            }
            match resolver.resolve(value.as_str()) {
                Some(hit) => {
                    resolved_rows += 1;
                    resolved_sheet
                        .write_string(resolved_rows, 0, value)
                        .and_then(|sheet| sheet.write_string(resolved_rows, 1, hit.name))
                        .map_err(|err| {
                            GenesymError::WorkbookWrite(resolved_path.clone(), err.to_string())
                        })?;
                    tracing::debug!(gene_id = %value, source = %hit.source, "resolved");
                }
                None => {
                    if seen_missing.insert(value.clone()) {
                        missing.push(value.clone());
                    }
                }
            }
        }
    }

    resolved_book
        .save(resolved_path.as_std_path())
        .map_err(|err| GenesymError::WorkbookWrite(resolved_path.clone(), err.to_string()))?;

    let mut missing_book = Workbook::new();
    let missing_sheet = missing_book.add_worksheet();
    missing_sheet
        .write_string(0, 0, "gene_id")
        .map_err(|err| GenesymError::WorkbookWrite(missing_path.clone(), err.to_string()))?;
    for (index, gene_id) in missing.iter().enumerate() {
        missing_sheet
            .write_string(index as u32 + 1, 0, gene_id)
            .map_err(|err| GenesymError::WorkbookWrite(missing_path.clone(), err.to_string()))?;
    }
    missing_book
        .save(missing_path.as_std_path())
        .map_err(|err| GenesymError::WorkbookWrite(missing_path.clone(), err.to_string()))?;

    Ok(ConvertOutcome {
        resolved: resolved_rows as usize,
        missing,
        resolved_path,
        missing_path,
    })
}
