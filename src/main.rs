use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use davplay::backends::{DirectoryLister, SearchClient, SearchProvider, WebDavClient};
use davplay::config::Config;
use davplay::sorter;

const HELP: &str = "\
davplay — WebDAV media player core

USAGE:
  davplay [--config <path>] <COMMAND>

COMMANDS:
  list <path>       List a server directory, episodes in playback order
  search <keyword>  Query the companion indexer for matching paths
  url <path>        Print the authenticated stream URL for a file

OPTIONS:
  --config <path>   Use an explicit config file
  -h, --help        Print this help
";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("davplay=info")
        .init();

    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let config_path: Option<PathBuf> = args.opt_value_from_str("--config")?;
    let config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let Some(command) = args.subcommand()? else {
        print!("{HELP}");
        return Ok(());
    };

    if config.webdav_url.is_empty() {
        bail!(
            "no webdav_url configured; set it in {}",
            config.path().display()
        );
    }

    match command.as_str() {
        "list" => {
            let path: String = args.free_from_str().context("list needs a server path")?;
            let client =
                WebDavClient::new(&config.webdav_url, &config.username, &config.password)?;
            let (dirs, files) = sorter::partition_listing(client.list(&path).await);
            for dir in &dirs {
                println!("{}/", dir.name());
            }
            for file in &files {
                println!("{}", file.name());
            }
        }
        "search" => {
            let keyword: String = args.free_from_str().context("search needs a keyword")?;
            let client = SearchClient::new(&config.webdav_url)?;
            for path in client.search(&keyword).await {
                println!("{path}");
            }
        }
        "url" => {
            let path: String = args.free_from_str().context("url needs a server path")?;
            let client =
                WebDavClient::new(&config.webdav_url, &config.username, &config.password)?;
            println!("{}", client.stream_url(&path)?);
        }
        other => bail!("unknown command {other:?}; try --help"),
    }

    Ok(())
}
