mod migrate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("cannot read {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("{failed} of {total} files failed to migrate")]
    MigrationFailed { failed: usize, total: usize },
}

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Folio gallery admin CLI")]
struct Cli {
    #[arg(long, env = "FOLIO_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the service is up.
    Ping,
    Tiles(TilesCommand),
    /// Upload every image in a directory, one tile per file.
    Migrate(MigrateArgs),
}

#[derive(Args, Debug)]
struct TilesCommand {
    #[command(subcommand)]
    command: TilesSubcommand,
}

#[derive(Subcommand, Debug)]
enum TilesSubcommand {
    List {
        #[arg(default_value = "photos")]
        gallery: String,
        #[arg(long)]
        category: Option<String>,
    },
}

#[derive(Args, Debug)]
struct MigrateArgs {
    /// Directory holding the image files.
    dir: PathBuf,

    #[arg(long, default_value = "photos")]
    gallery: String,

    /// Upload everything into this category instead of guessing from names.
    #[arg(long)]
    category: Option<String>,

    /// Print the plan without uploading.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url.trim_end_matches('/').to_owned(), client: reqwest::Client::new() };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Tiles(tiles) => run_tiles(&ctx, tiles).await,
        Command::Migrate(args) => migrate::run(&ctx, args).await,
    }
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let response = cli.client.get(format!("{}/healthz", cli.base_url)).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_tiles(cli: &CliContext, tiles: TilesCommand) -> Result<(), CliError> {
    match tiles.command {
        TilesSubcommand::List { gallery, category } => {
            let path = format!("/api/{gallery}/tiles");
            let query: Vec<(&str, &str)> = category.as_deref().map(|c| ("category", c)).into_iter().collect();
            let json = api_request(cli, reqwest::Method::GET, &path, &query, None).await?;
            print_json(&json)
        }
    }
}

/// Send a request and decode the JSON reply. Non-2xx replies become
/// `ServerError` carrying the response body.
async fn api_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    query: &[(&str, &str)],
    body: Option<reqwest::Body>,
) -> Result<Value, CliError> {
    let url = format!("{}{}", cli.base_url, path);
    let request = cli.client.request(method, &url).query(query);
    let request = if let Some(body) = body { request.body(body) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;
    let value = if text.is_empty() { Value::Null } else { serde_json::from_str(&text).unwrap_or(Value::String(text)) };

    if !status.is_success() {
        let message = value.get("message").and_then(Value::as_str).map_or_else(|| value.to_string(), str::to_owned);
        return Err(CliError::ServerError { status: status.as_u16(), message });
    }
    Ok(value)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
