use calamine::{Data, Reader, Xlsx, open_workbook};
use camino::{Utf8Path, Utf8PathBuf};
use rust_xlsxwriter::Workbook;

use genesym::annotation::AnnotationMap;
use genesym::convert::{MISSING_FILE_NAME, convert_workbook};
use genesym::resolve::GeneResolver;

fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(path).unwrap()
}

fn read_column(path: &Utf8Path, col: usize) -> Vec<String> {
    let mut workbook: Xlsx<_> = open_workbook(path.as_std_path()).unwrap();
    let sheet_names = workbook.sheet_names().to_vec();
    let range = workbook.worksheet_range(&sheet_names[0]).unwrap();
    range
        .rows()
        .filter_map(|row| match row.get(col) {
            Some(Data::String(value)) => Some(value.clone()),
            _ => None,
        })
        .collect()
}

fn resolver(entries: &[(&str, &str)]) -> GeneResolver {
    let ensembl: AnnotationMap = entries
        .iter()
        .map(|(id, name)| (id.to_string(), name.to_string()))
        .collect();
    GeneResolver::new(ensembl, AnnotationMap::default(), AnnotationMap::default())
}

#[test]
fn cells_are_visited_row_major() {
    let temp = tempfile::tempdir().unwrap();
    let dir = utf8(temp.path().to_path_buf());
    let input = dir.join("grid.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "ENSG001").unwrap();
    sheet.write_string(0, 1, "ENSG002").unwrap();
    sheet.write_string(1, 0, "ENSG003").unwrap();
    workbook.save(input.as_std_path()).unwrap();

    let resolver = resolver(&[
        ("ENSG001", "A"),
        ("ENSG002", "B"),
        ("ENSG003", "C"),
    ]);
    let outcome = convert_workbook(&input, &resolver, &dir).unwrap();
    assert_eq!(outcome.resolved, 3);

    let ids = read_column(&outcome.resolved_path, 0);
    assert_eq!(ids, vec!["gene_id", "ENSG001", "ENSG002", "ENSG003"]);
    let names = read_column(&outcome.resolved_path, 1);
    assert_eq!(names, vec!["gene_name", "A", "B", "C"]);
}

#[test]
fn non_text_and_empty_cells_are_skipped() {
    let temp = tempfile::tempdir().unwrap();
    let dir = utf8(temp.path().to_path_buf());
    let input = dir.join("mixed.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "ENSG001").unwrap();
    sheet.write_number(0, 1, 42.0).unwrap();
    sheet.write_boolean(1, 0, true).unwrap();
    // (1, 1) left empty; column 2 forces an empty gap into the range.
    sheet.write_string(1, 2, "notes").unwrap();
    workbook.save(input.as_std_path()).unwrap();

    let resolver = resolver(&[("ENSG001", "FOO")]);
    let outcome = convert_workbook(&input, &resolver, &dir).unwrap();

    assert_eq!(outcome.resolved, 1);
    assert!(outcome.missing.is_empty());
}

#[test]
fn missing_identifiers_dedupe_in_first_seen_order() {
    let temp = tempfile::tempdir().unwrap();
    let dir = utf8(temp.path().to_path_buf());
    let input = dir.join("dups.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "ENSG888").unwrap();
    sheet.write_string(0, 1, "ENSG999").unwrap();
    sheet.write_string(1, 0, "ENSG888").unwrap();
    sheet.write_string(2, 0, "ENSG999").unwrap();
    workbook.save(input.as_std_path()).unwrap();

    let outcome = convert_workbook(&input, &resolver(&[]), &dir).unwrap();

    assert_eq!(outcome.missing, vec!["ENSG888", "ENSG999"]);
    let listed = read_column(&outcome.missing_path, 0);
    assert_eq!(listed, vec!["gene_id", "ENSG888", "ENSG999"]);
}

#[test]
fn output_names_derive_from_input() {
    let temp = tempfile::tempdir().unwrap();
    let dir = utf8(temp.path().to_path_buf());
    let input = dir.join("cohort.xlsx");

    let mut workbook = Workbook::new();
    workbook.add_worksheet();
    workbook.save(input.as_std_path()).unwrap();

    let outcome = convert_workbook(&input, &resolver(&[]), &dir).unwrap();
    assert_eq!(outcome.resolved_path, dir.join("cohort_genename.xlsx"));
    assert_eq!(outcome.missing_path, dir.join(MISSING_FILE_NAME));
    assert!(outcome.resolved_path.as_std_path().exists());
    assert!(outcome.missing_path.as_std_path().exists());
}

#[test]
fn missing_input_workbook_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let dir = utf8(temp.path().to_path_buf());

    let err = convert_workbook(&dir.join("absent.xlsx"), &resolver(&[]), &dir).unwrap_err();
    assert!(matches!(err, genesym::error::GenesymError::WorkbookRead(_, _)));
}
