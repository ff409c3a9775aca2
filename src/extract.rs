use crate::config::{RecoveryPolicy, PROGRESS_INTERVAL};
use crate::error::DumpError;
use crate::models::Table;
use crate::parser::StatementReader;
use crate::scanner::scan_fields;
use crate::stats::ParseStats;
use indicatif::ProgressBar;
use tracing::{info, warn};

/// Records of one kind parsed from a dump, with the counters gathered on the way.
#[derive(Debug)]
pub struct ParsedDump<T> {
    pub records: Vec<T>,
    pub stats: ParseStats,
}

/// Parses every INSERT statement in `text` into records of kind `T`.
///
/// Only statements whose table [`Table::accepts_table`] are assembled; any other
/// table is logged, counted and skipped under either policy. Under [`RecoveryPolicy::Skip`] a
/// malformed statement or a row with the wrong field count is logged, counted
/// and skipped. Under [`RecoveryPolicy::Abort`] it is returned as the error.
pub fn parse_dump<T: Table>(
    text: &str,
    policy: RecoveryPolicy,
) -> Result<ParsedDump<T>, DumpError> {
    let mut records = Vec::new();
    let mut stats = ParseStats::new();
    let pb = ProgressBar::new_spinner();

    for statement in StatementReader::new(text) {
        stats.inc_statements();
        if stats.statements_seen % PROGRESS_INTERVAL as u64 == 0 {
            pb.tick();
        }

        let statement = match statement {
            Ok(s) => s,
            Err(e) => {
                recover(e, policy, &mut stats)?;
                continue;
            }
        };

        if !T::accepts_table(statement.table) {
            warn!(
                index = statement.index,
                table = statement.table,
                expected = T::NAME,
                "Skipping statement for another table"
            );
            stats.inc_foreign_statements();
            continue;
        }

        let bodies = match statement.row_bodies() {
            Ok(b) => b,
            Err(e) => {
                recover(e, policy, &mut stats)?;
                continue;
            }
        };
        stats.add_rows(bodies.len() as u64);

        for (row, body) in bodies.into_iter().enumerate() {
            let assembled = scan_fields(body)
                .map_err(|e| DumpError::MalformedStatement {
                    index: statement.index,
                    reason: format!("row {}: {}", row, e),
                })
                .and_then(T::assemble);

            match assembled {
                Ok(record) => {
                    records.push(record);
                    stats.inc_records();
                }
                Err(e) => {
                    if policy == RecoveryPolicy::Abort || !e.is_recoverable() {
                        return Err(e);
                    }
                    warn!(
                        table = T::NAME,
                        statement = statement.index,
                        row,
                        error = %e,
                        "Skipping row"
                    );
                    stats.inc_skipped_rows();
                }
            }
        }
    }

    pb.finish_and_clear();

    if stats.is_empty_input() {
        info!(table = T::NAME, "Dump contains no INSERT statements");
    }
    info!(
        table = T::NAME,
        statements = stats.statements_seen,
        rows = stats.rows_seen,
        records = stats.records,
        skipped = stats.skipped(),
        "Dump parsed"
    );

    Ok(ParsedDump { records, stats })
}

fn recover(
    e: DumpError,
    policy: RecoveryPolicy,
    stats: &mut ParseStats,
) -> Result<(), DumpError> {
    if policy == RecoveryPolicy::Abort || !e.is_recoverable() {
        return Err(e);
    }
    warn!(error = %e, "Skipping statement");
    stats.inc_skipped_statements();
    Ok(())
}
