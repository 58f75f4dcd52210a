use anyhow::Context;
use clap::{Parser, Subcommand};
use miniurl::config::parse_timeout_ms;
use miniurl::normalize::has_http_scheme;
use miniurl::{classify, normalize, trim_input, ClientConfig, MiniUrlClient, INVALID_URL_MESSAGE};
use std::time::Duration;

/// Command line front end for a MiniURL server.
#[derive(Debug, Parser)]
#[command(name = "miniurl")]
#[command(about = "Shorten links with a MiniURL server", long_about = None)]
struct Cli {
    /// Server root, e.g. https://miniurl.example
    #[arg(long, global = true, env = "MINIURL_BASE_URL", value_name = "URL")]
    base_url: Option<String>,

    /// Request timeout in milliseconds (default 10000).
    #[arg(
        long,
        global = true,
        env = "MINIURL_TIMEOUT_MS",
        value_name = "MS",
        value_parser = parse_timeout_ms
    )]
    timeout_ms: Option<Duration>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Shorten a link. Bare hosts like `example.com` get a scheme added.
    Shorten {
        /// Link to shorten.
        url: String,

        /// Preferred alias (5-20 characters).
        #[arg(long)]
        alias: Option<String>,

        /// Free-form description (up to 255 characters).
        #[arg(long)]
        description: Option<String>,
    },

    /// Print the link an alias points to.
    Resolve {
        /// Alias, i.e. the last path segment of a short link.
        alias: String,
    },

    /// Normalize a link locally without contacting the server.
    Check {
        /// Text to normalize.
        text: String,
    },
}

fn build_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut builder = ClientConfig::builder();
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(timeout) = cli.timeout_ms {
        builder = builder.timeout(timeout);
    }
    builder.build().context("invalid client configuration")
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Check { ref text } => {
            let normalized = normalize(text).ok_or_else(|| anyhow::anyhow!(INVALID_URL_MESSAGE))?;
            let pattern = if has_http_scheme(trim_input(text)) {
                "explicit scheme"
            } else {
                classify(text).map(|p| p.as_str()).unwrap_or("unknown")
            };
            println!("{}\t({})", normalized, pattern);
        }
        Command::Shorten {
            ref url,
            ref alias,
            ref description,
        } => {
            let client = MiniUrlClient::new(build_config(&cli)?)?;
            let minified = client
                .minify_with(url, alias.clone(), description.clone())
                .await?;
            println!("{}", minified.minified_url);
            eprintln!("{} minified in {} ms", minified.url, minified.elapsed_ms);
        }
        Command::Resolve { ref alias } => {
            let client = MiniUrlClient::new(build_config(&cli)?)?;
            println!("{}", client.resolve(alias).await?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));

    let cli = Cli::parse();
    log::debug!("Starting miniurl: {:?}", cli.command);

    if let Err(err) = run(cli).await {
        eprintln!("miniurl: {:#}", err);
        std::process::exit(1);
    }
}
