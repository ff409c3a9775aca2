use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use wp_dump_filter::config::{self, OutputFormat, PipelineConfig, RecoveryPolicy};
use wp_dump_filter::pipeline;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "wp-dump-filter")]
#[command(about = "Filter WordPress post dumps by postmeta references and author")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse both dumps and write the filtered and unique-author outputs
    Run(RunArgs),
    /// Rebuild the unique-author output from an existing filtered output
    Dedup(DedupArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Path to the wp_posts dump (.sql or .sql.bz2)
    #[arg(long, default_value = config::DEFAULT_POSTS_PATH)]
    posts: PathBuf,

    /// Path to the wp_postmeta dump (.sql or .sql.bz2)
    #[arg(long, default_value = config::DEFAULT_POSTMETA_PATH)]
    postmeta: PathBuf,

    /// Output for referenced posts ordered by author
    #[arg(long, default_value = config::DEFAULT_FILTERED_OUTPUT)]
    filtered_output: PathBuf,

    /// Output holding the first post of each author
    #[arg(long, default_value = config::DEFAULT_UNIQUE_AUTHORS_OUTPUT)]
    unique_output: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// What to do with malformed statements and mismatched rows
    #[arg(long, value_enum, default_value_t = RecoveryPolicy::Skip)]
    on_error: RecoveryPolicy,
}

#[derive(Args)]
struct DedupArgs {
    /// Filtered output written by `run`
    #[arg(short, long, default_value = config::DEFAULT_FILTERED_OUTPUT)]
    input: PathBuf,

    /// Where to write the unique-author view
    #[arg(short, long, default_value = config::DEFAULT_UNIQUE_AUTHORS_OUTPUT)]
    output: PathBuf,

    /// Format of both files
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
}

fn run_filter(args: RunArgs) -> Result<()> {
    let config = PipelineConfig {
        posts_path: args.posts,
        postmeta_path: args.postmeta,
        filtered_output: args.filtered_output,
        unique_authors_output: args.unique_output,
        format: args.format,
        recovery: args.on_error,
    };

    let start = Instant::now();
    let report = pipeline::run_pipeline(&config)?;
    let duration = start.elapsed();

    let skipped = report.posts.skipped() + report.postmeta.skipped();
    if skipped > 0 {
        warn!(skipped, "Some statements or rows were skipped; see warnings above");
    }

    println!();
    println!("=== Summary ===");
    println!("Total time:          {:.2}s", duration.as_secs_f64());
    println!();
    println!("Postmeta statements: {}", report.postmeta.statements_seen);
    println!("Postmeta records:    {}", report.postmeta.records);
    println!("Postmeta skipped:    {}", report.postmeta.skipped());
    println!("Referenced post IDs: {}", report.referenced_ids);
    println!("Post statements:     {}", report.posts.statements_seen);
    println!("Post records:        {}", report.posts.records);
    println!("Post skipped:        {}", report.posts.skipped());
    println!("Filtered posts:      {}", report.filtered);
    println!("Unique authors:      {}", report.unique_authors);
    println!();
    println!("Filtered output:     {}", config.filtered_output.display());
    println!("Unique output:       {}", config.unique_authors_output.display());

    Ok(())
}

fn run_dedup(args: DedupArgs) -> Result<()> {
    let (read, unique) = pipeline::run_dedup(&args.input, &args.output, args.format)?;
    println!("Posts read:     {}", read);
    println!("Unique authors: {}", unique);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Run(args) => run_filter(args),
        Commands::Dedup(args) => run_dedup(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
