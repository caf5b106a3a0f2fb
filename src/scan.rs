use std::path::Path;

use serde::Serialize;

use crate::{
    app::Cli,
    extractor::{DotscopeReader, MetadataReader, MetadataRecord, Outcome, SkipReason},
    output, walk,
};

/// Batch result of one run, also the `--json` document.
#[derive(Debug, Serialize)]
struct ScanReport {
    records: Vec<MetadataRecord>,
    total_files: usize,
    module_count: usize,
}

pub fn run(path: &Path, cli: &Cli) -> anyhow::Result<()> {
    run_with_reader(&DotscopeReader, path, cli)
}

/// Drive the traversal through `reader`, emitting per-file console output
/// as extraction completes and the CSV/JSON artifacts once at the end.
fn run_with_reader(reader: &dyn MetadataReader, path: &Path, cli: &Cli) -> anyhow::Result<()> {
    let single_file = path.is_file();
    let candidates = walk::collect_candidates(path, cli.recursive)?;

    let mut records = Vec::new();
    for candidate in &candidates {
        match reader.try_extract(candidate) {
            Outcome::Extracted(record) => {
                if !cli.json {
                    output::print_record(&record);
                }
                records.push(record);
            }
            Outcome::Skipped(SkipReason::NotAModule(detail)) => {
                log::debug!(
                    "skipping non-.NET or missing file: {} ({detail})",
                    candidate.display()
                );
            }
            Outcome::Skipped(SkipReason::Fault(detail)) => {
                log::debug!(
                    "unexpected error while processing {}: {detail}",
                    candidate.display()
                );
            }
        }
    }

    let report = ScanReport {
        total_files: candidates.len(),
        module_count: records.len(),
        records,
    };

    if cli.json {
        output::print_json(&report)?;
    } else if !single_file {
        println!(
            "Scanned {} files, {} .NET modules",
            report.total_files, report.module_count
        );
    }

    if let Some(dest) = &cli.csv {
        output::write_csv(dest, &report.records)?;
        log::info!("CSV file successfully written to: {}", dest.display());
    }

    Ok(())
}
