use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use cifetch::{
    load_config, resolve_secret_optional, Fetcher, FetcherConfig, Reporter, Session,
};

/// Fetches the latest GitLab CI build artifact, unpacks it over a local
/// output directory, and installs the unpacked project's dependencies.
#[derive(Parser)]
#[command(name = "cifetch", version, about)]
struct Cli {
    /// CI service root
    #[arg(long)]
    url: Option<String>,

    /// Repository identifier, e.g. group/project
    #[arg(long)]
    repo: Option<String>,

    /// Branch name for artifact lookup
    #[arg(long)]
    branch: Option<String>,

    /// CI job name whose latest artifact is fetched
    #[arg(long)]
    job: Option<String>,

    /// Local output directory
    #[arg(long)]
    path: Option<String>,

    /// Directory the archive is downloaded to and unpacked in
    #[arg(long)]
    work_dir: Option<String>,

    /// Private access token (prefer --token-file or the CIFETCH_TOKEN env var)
    #[arg(long)]
    token: Option<String>,

    /// File containing the private access token
    #[arg(long)]
    token_file: Option<String>,

    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Writes pipeline output to the console: progress to stdout, diagnostics to
/// stderr.
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn write_line(&self, text: &str) {
        println!("{}", text);
    }

    fn write_error(&self, text: &str) {
        eprintln!("{}", text);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_log::LogTracer::init();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli, reporter: &dyn Reporter) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut config = FetcherConfig::default();

    if let Some(path) = &cli.config {
        config.merge_file(load_config(path)?);
    }

    if let Some(url) = cli.url {
        config.url = url;
    }
    if let Some(repo) = cli.repo {
        config.repo = Some(repo);
    }
    if let Some(branch) = cli.branch {
        config.branch = branch;
    }
    if let Some(job) = cli.job {
        config.job = job;
    }
    if let Some(path) = cli.path {
        config.output_path = PathBuf::from(path);
    }
    if let Some(work_dir) = cli.work_dir {
        config.work_dir = PathBuf::from(work_dir);
    }

    // Token sources in priority order: --token, --token-file, CIFETCH_TOKEN.
    // A token from the config file survives only if none of those are set.
    if let Some(token) = resolve_secret_optional(
        cli.token.as_deref(),
        cli.token_file.as_deref(),
        Some("CIFETCH_TOKEN"),
    )? {
        config.token = Some(token);
    }

    let config = Arc::new(config);
    let mut session = Session::new(&config);
    let fetcher = Fetcher::from_config(config);

    let path = fetcher.run(&mut session, reporter).await?;
    Ok(path)
}

#[tokio::main]
async fn main() {
    init_tracing();
    info!("Starting cifetch v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let reporter = ConsoleReporter;

    match run(cli, &reporter).await {
        Ok(path) => {
            reporter.write_line(&format!("build fetched into {}", path.display()));
        }
        Err(e) => {
            reporter.write_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
