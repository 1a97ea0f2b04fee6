use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use genesym::app::{App, RunRequest, RunSummary};
use genesym::cache::SnapshotCache;
use genesym::error::GenesymError;
use genesym::output::{JsonOutput, OutputMode};

#[derive(Parser)]
#[command(name = "genesym")]
#[command(about = "Map Ensembl gene identifiers in a spreadsheet to gene symbols")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    non_interactive: bool,

    #[arg(long, help = "Ensembl GFF3 annotation file (optionally gzipped)")]
    ensembl_gff3: Utf8PathBuf,

    #[arg(long, help = "GENCODE GFF3 annotation file (optionally gzipped)")]
    gencode_gff3: Utf8PathBuf,

    #[arg(long, help = "HGNC JSON export")]
    hgnc_json: Utf8PathBuf,

    #[arg(short = 'x', long, help = "Input spreadsheet to annotate")]
    xlsx_file: Utf8PathBuf,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<GenesymError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &GenesymError) -> u8 {
    match error {
        GenesymError::FileOpen(_, _)
        | GenesymError::AnnotationParse { .. }
        | GenesymError::HgncParse(_, _)
        | GenesymError::WorkbookRead(_, _)
        | GenesymError::EmptyWorkbook(_) => 2,
        GenesymError::CacheRead(_, _)
        | GenesymError::CacheWrite(_, _)
        | GenesymError::CacheVersion { .. }
        | GenesymError::WorkbookWrite(_, _) => 3,
        GenesymError::Filesystem(_) => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.non_interactive {
        OutputMode::NonInteractive
    } else {
        OutputMode::Interactive
    };

    let request = RunRequest {
        ensembl_gff3: cli.ensembl_gff3,
        gencode_gff3: cli.gencode_gff3,
        hgnc_json: cli.hgnc_json,
        xlsx_file: cli.xlsx_file,
    };

    let app = App::new(SnapshotCache::new()).into_diagnostic()?;
    let summary = app.run(&request).into_diagnostic()?;

    match output_mode {
        OutputMode::NonInteractive => JsonOutput::print_run(&summary).into_diagnostic()?,
        OutputMode::Interactive => print_run_summary(&summary),
    }
    Ok(())
}

fn print_run_summary(summary: &RunSummary) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    println!("{cyan}genesym summary{reset}");
    println!(
        "{cyan}  reference entries: ensembl={} hgnc={} gencode={}{reset}",
        summary.ensembl_entries, summary.hgnc_entries, summary.gencode_entries
    );
    if summary.hgnc_skipped > 0 {
        println!(
            "{yellow}  skipped HGNC documents: {}{reset}",
            summary.hgnc_skipped
        );
    }
    println!("{green}  resolved gene ids: {}{reset}", summary.resolved);
    println!("{yellow}  missing gene names: {}{reset}", summary.missing);
    println!("  resolved output: {}", summary.resolved_path);
    println!("  missing output:  {}", summary.missing_path);
}
