use clap::Parser as ClapParser;
use jql::cli::{self, CliError, Config, OutputOptions};
use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(ClapParser)]
#[command(name = "jql")]
#[command(about = "jql - A lispy query language for streams of JSON values")]
#[command(version)]
struct Cli {
    /// The query to run against every input value
    #[arg(default_value = "(id)")]
    query: String,

    /// Read JSON from a file instead of stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Disable colored output
    #[arg(short, long)]
    monochrome: bool,

    /// Print each result on a single line
    #[arg(short, long)]
    compact: bool,

    /// Config file (defaults to ~/.jql.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only validate syntax, don't execute
    #[arg(long)]
    syntax_only: bool,

    /// Log compilation and per-record progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("jql: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "jql=debug" } else { "jql=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(args: Cli) -> Result<(), CliError> {
    if args.syntax_only {
        jql::compile(&args.query)?;
        writeln!(io::stdout(), "Syntax is valid")?;
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    let options = OutputOptions {
        pretty: !(args.compact || config.compact),
        color: !(args.monochrome || config.monochrome) && atty::is(atty::Stream::Stdout),
    };

    let stdout = io::stdout().lock();
    let processed = match args.input {
        Some(path) => cli::run(&args.query, File::open(path)?, stdout, &options)?,
        None => cli::run(&args.query, io::stdin().lock(), stdout, &options)?,
    };
    tracing::debug!(processed, "done");
    Ok(())
}
