//! wp-dump-filter: WordPress table dump extraction and author filtering
//!
//! This crate turns two `mysqldump`-style exports (`wp_posts` and `wp_postmeta`)
//! into a filtered, author-ordered dataset:
//!
//! 1. **Parse** -- Walk each dump's `INSERT INTO ... VALUES (...), (...);` statements
//!    and assemble one raw-text record per row tuple
//! 2. **Filter** -- Keep only posts whose `ID` is referenced by at least one
//!    postmeta `post_id`
//! 3. **Sort** -- Stable byte-wise sort of the survivors by `post_author`
//! 4. **Deduplicate** -- Keep the first post per distinct author
//!
//! Steps 3 and 4 each produce an output file (CSV or JSON).
//!
//! # Parsing
//!
//! Statements and row tuples are found by a quote-aware scanner rather than by
//! regular expressions over the whole body:
//!
//! - Commas, parentheses and semicolons inside `'...'` literals are content
//! - Backslash escapes and doubled quotes never close a literal
//! - A statement ends at the first `;` outside quotes at parenthesis depth 0
//! - Field text is kept verbatim, quotes and escapes included
//!
//! Malformed statements and rows with the wrong field count are logged and
//! skipped by default, or abort the run under [`config::RecoveryPolicy::Abort`].
//!
//! # Key Modules
//!
//! - [`scanner`] -- Quote-aware tuple field scanner
//! - [`parser`] -- Lazy INSERT statement and row tuple extraction
//! - [`models`] -- Column schemas and record types
//! - [`extract`] -- Dump parsing with skip-and-report recovery
//! - [`filter`] -- Referential filter over postmeta `post_id`s
//! - [`authors`] -- Author sort and first-per-author deduplication
//! - [`serialize`] -- Deterministic CSV/JSON output and reload
//! - [`pipeline`] -- End-to-end run over configured paths
//! - [`error`] -- Typed parse errors
//! - [`stats`] -- Parse counters and run report
//! - [`config`] -- Defaults, output format and recovery policy
//!
//! # Example Usage
//!
//! ```bash
//! # Full run with JSON output, aborting on the first malformed row
//! wp-dump-filter run --posts wp_posts.sql --postmeta wp_postmeta.sql.bz2 \
//!     --format json --on-error abort
//!
//! # Rebuild the unique-authors view from an existing filtered file
//! wp-dump-filter dedup -i output/filtered_posts.csv -o output/unique_authors.csv
//! ```

pub mod authors;
pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod scanner;
pub mod serialize;
pub mod stats;
