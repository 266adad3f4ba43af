use clap::Parser;
use tracing_subscriber::EnvFilter;

use davls::config::Config;
use davls::listing::{render_manifest, render_table, sort_entries};
use davls::services::webdav::{WebDAVError, WebDAVService};

#[derive(Parser, Debug)]
#[command(
    name = "davls",
    version,
    about = "List WebDAV directory contents in a readable format"
)]
struct Cli {
    /// WebDAV URL to list
    url: String,

    /// WebDAV username
    #[arg(short, long)]
    username: String,

    /// WebDAV password or token
    #[arg(short, long)]
    token: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_seconds: u64,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays a clean listing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), WebDAVError> {
    let config = Config::new(&cli.url, &cli.username, &cli.token, cli.timeout_seconds)?;

    let service = WebDAVService::new(config.clone())?;
    let mut entries = service.list_directory().await?;

    sort_entries(&mut entries);

    print!("{}", render_table(&config.url, &entries));
    print!("{}", render_manifest(&entries));

    Ok(())
}
