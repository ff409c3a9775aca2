use crate::authors::{dedup_by_author, sort_by_author};
use crate::config::{OutputFormat, PipelineConfig};
use crate::error::DumpError;
use crate::extract::parse_dump;
use crate::filter::{filter_referenced, ReferenceIndex};
use crate::models::{PostMetaRecord, PostRecord};
use crate::serialize::{load_records, save_records};
use crate::stats::PipelineReport;
use anyhow::{Context, Result};
use bzip2::read::BzDecoder;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Reads a whole dump into memory, decompressing `.bz2` inputs on the fly.
pub fn read_dump(path: &Path) -> Result<String> {
    let is_bz2 = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bz2"));

    if is_bz2 {
        let file = File::open(path).with_context(|| format!("Failed to open dump: {:?}", path))?;
        let mut text = String::new();
        BzDecoder::new(BufReader::new(file))
            .read_to_string(&mut text)
            .with_context(|| format!("Failed to decompress dump: {:?}", path))?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read dump: {:?}", path))
    }
}

fn ensure_exists(path: &Path) -> Result<(), DumpError> {
    if path.exists() {
        Ok(())
    } else {
        Err(DumpError::MissingInputFile {
            path: path.to_path_buf(),
        })
    }
}

/// Parses both dumps, writes the filtered author-ordered posts and the
/// one-post-per-author view.
///
/// Both inputs are checked before anything is parsed.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    ensure_exists(&config.posts_path)?;
    ensure_exists(&config.postmeta_path)?;

    info!(path = %config.postmeta_path.display(), "Parsing postmeta dump");
    let meta_text = read_dump(&config.postmeta_path)?;
    let meta = parse_dump::<PostMetaRecord>(&meta_text, config.recovery)
        .with_context(|| format!("Failed to parse {:?}", config.postmeta_path))?;
    drop(meta_text);

    info!(path = %config.posts_path.display(), "Parsing posts dump");
    let posts_text = read_dump(&config.posts_path)?;
    let posts = parse_dump::<PostRecord>(&posts_text, config.recovery)
        .with_context(|| format!("Failed to parse {:?}", config.posts_path))?;
    drop(posts_text);

    let index = ReferenceIndex::build(&meta.records);
    let referenced_ids = index.len();
    let filtered = sort_by_author(filter_referenced(posts.records, &index));
    save_records(&config.filtered_output, &filtered, config.format)?;

    let filtered_count = filtered.len();
    let unique = dedup_by_author(filtered);
    save_records(&config.unique_authors_output, &unique, config.format)?;

    Ok(PipelineReport {
        posts: posts.stats,
        postmeta: meta.stats,
        referenced_ids,
        filtered: filtered_count,
        unique_authors: unique.len(),
    })
}

/// Reloads a filtered output file and writes its one-post-per-author view.
/// Returns `(records read, records written)`.
pub fn run_dedup(input: &Path, output: &Path, format: OutputFormat) -> Result<(usize, usize)> {
    ensure_exists(input)?;
    let posts: Vec<PostRecord> = load_records(input, format)?;
    let read = posts.len();
    let unique = dedup_by_author(posts);
    save_records(output, &unique, format)?;
    Ok((read, unique.len()))
}
