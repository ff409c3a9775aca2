use clap::ValueEnum;
use std::path::PathBuf;

/// Default posts dump path
pub const DEFAULT_POSTS_PATH: &str = "wp_posts.sql";

/// Default postmeta dump path
pub const DEFAULT_POSTMETA_PATH: &str = "wp_postmeta.sql";

/// Default output for the filtered, author-ordered posts
pub const DEFAULT_FILTERED_OUTPUT: &str = "output/filtered_posts.csv";

/// Default output for the one-post-per-author view
pub const DEFAULT_UNIQUE_AUTHORS_OUTPUT: &str = "output/unique_authors.csv";

/// Table name of the posts dump
pub const POSTS_TABLE: &str = "wp_posts";

/// Table name of the postmeta dump
pub const POSTMETA_TABLE: &str = "wp_postmeta";

/// Progress update interval (tick every N statements)
pub const PROGRESS_INTERVAL: usize = 64;

/// Buffer size for output writers
pub const WRITE_BUFFER_SIZE: usize = 128 * 1024;

/// What the dump parser does with a malformed statement or a mismatched row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RecoveryPolicy {
    /// Log and skip the offending statement or row
    #[default]
    Skip,
    /// Stop at the first malformed statement or row
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header row of column names followed by one row per record
    #[default]
    Csv,
    /// Pretty-printed `{table, columns, rows}` document
    Json,
}

pub struct PipelineConfig {
    pub posts_path: PathBuf,
    pub postmeta_path: PathBuf,
    pub filtered_output: PathBuf,
    pub unique_authors_output: PathBuf,
    pub format: OutputFormat,
    pub recovery: RecoveryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            posts_path: PathBuf::from(DEFAULT_POSTS_PATH),
            postmeta_path: PathBuf::from(DEFAULT_POSTMETA_PATH),
            filtered_output: PathBuf::from(DEFAULT_FILTERED_OUTPUT),
            unique_authors_output: PathBuf::from(DEFAULT_UNIQUE_AUTHORS_OUTPUT),
            format: OutputFormat::default(),
            recovery: RecoveryPolicy::default(),
        }
    }
}
