/// Counters collected while parsing one dump
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseStats {
    pub statements_seen: u64,
    pub statements_skipped: u64,
    /// Statements naming some other table, e.g. `wp_usermeta` in a postmeta dump
    pub statements_foreign: u64,
    pub rows_seen: u64,
    pub rows_skipped: u64,
    pub records: u64,
}

impl ParseStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_statements(&mut self) {
        self.statements_seen += 1;
    }

    pub fn inc_skipped_statements(&mut self) {
        self.statements_skipped += 1;
    }

    pub fn inc_foreign_statements(&mut self) {
        self.statements_foreign += 1;
    }

    pub fn add_rows(&mut self, count: u64) {
        self.rows_seen += count;
    }

    pub fn inc_skipped_rows(&mut self) {
        self.rows_skipped += 1;
    }

    pub fn inc_records(&mut self) {
        self.records += 1;
    }

    /// True when the dump held no INSERT statements at all
    pub fn is_empty_input(&self) -> bool {
        self.statements_seen == 0
    }

    pub fn skipped(&self) -> u64 {
        self.statements_skipped + self.statements_foreign + self.rows_skipped
    }
}

/// Outcome of a full pipeline run
#[derive(Debug, Default, Clone)]
pub struct PipelineReport {
    pub posts: ParseStats,
    pub postmeta: ParseStats,
    pub referenced_ids: usize,
    pub filtered: usize,
    pub unique_authors: usize,
}
