//! `compare` and `save-report`: reconcile stored records against stored
//! extraction results.

use std::path::Path;

use listcheck_core::{AuthoritativeRecord, ComparisonResult, ExtractionResult};
use listcheck_recon::{build_report, compare_record, sources_consulted};

use crate::input::{print_json, read_json, write_json};

fn load_inputs(
    records: &Path,
    results: &Path,
) -> anyhow::Result<(Vec<AuthoritativeRecord>, Vec<ExtractionResult>)> {
    Ok((read_json(records)?, read_json(results)?))
}

/// Compare every record, or only the one at `row`.
fn compare_all(
    records: &[AuthoritativeRecord],
    results: &[ExtractionResult],
    row: Option<usize>,
) -> anyhow::Result<Vec<ComparisonResult>> {
    let selected: Vec<&AuthoritativeRecord> = match row {
        Some(row) => {
            let record = records
                .iter()
                .find(|r| r.row == row)
                .ok_or_else(|| anyhow::anyhow!("no record at sheet row {row}"))?;
            vec![record]
        }
        None => records.iter().collect(),
    };
    Ok(selected
        .into_iter()
        .map(|record| compare_record(record, results))
        .collect())
}

pub(crate) fn run_compare(records: &Path, results: &Path, row: Option<usize>) -> anyhow::Result<()> {
    let (records, results) = load_inputs(records, results)?;
    let comparisons = compare_all(&records, &results, row)?;
    print_json(&comparisons)
}

pub(crate) fn run_save_report(records: &Path, results: &Path, out: &Path) -> anyhow::Result<()> {
    let (records, results) = load_inputs(records, results)?;
    let comparisons = compare_all(&records, &results, None)?;
    let report = build_report(comparisons, sources_consulted(&results));
    write_json(out, &report)?;
    println!(
        "wrote {} ({} records, {} with discrepancies)",
        out.display(),
        report.summary.records,
        report.summary.discrepancies.len()
    );
    Ok(())
}
