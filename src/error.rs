use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum GenesymError {
    #[error("failed to open {0}: {1}")]
    FileOpen(Utf8PathBuf, String),

    #[error("{path}:{line}: {reason}")]
    AnnotationParse {
        path: Utf8PathBuf,
        line: usize,
        reason: String,
    },

    #[error("failed to parse HGNC export {0}: {1}")]
    HgncParse(Utf8PathBuf, String),

    #[error("failed to read cache snapshot {0}: {1}")]
    CacheRead(Utf8PathBuf, String),

    #[error("failed to write cache snapshot {0}: {1}")]
    CacheWrite(Utf8PathBuf, String),

    #[error("cache snapshot {path} has version {found}, expected {expected}")]
    CacheVersion {
        path: Utf8PathBuf,
        found: u32,
        expected: u32,
    },

    #[error("failed to read workbook {0}: {1}")]
    WorkbookRead(Utf8PathBuf, String),

    #[error("workbook {0} has no worksheets")]
    EmptyWorkbook(Utf8PathBuf),

    #[error("failed to write workbook {0}: {1}")]
    WorkbookWrite(Utf8PathBuf, String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
