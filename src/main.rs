use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use songlister_server::config::{AppConfig, CliConfig, FileConfig, DEFAULT_INDEX_USER_ID};
use songlister_server::echonest::DEFAULT_ECHO_NEST_BASE_URL;
use songlister_server::{run_server, RequestsLoggingLevel, ServerConfig, SonglistManager};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
#[command(version)]
struct CliArgs {
    /// Path to the SQLite database file [default: /tmp/songlister.db].
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// Path to a TOML config file. Its values override command line arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Directory to be statically served under /static.
    #[clap(long)]
    pub static_dir_path: Option<String>,

    /// Id of the user whose songs are listed on the index page.
    #[clap(long, default_value_t = DEFAULT_INDEX_USER_ID)]
    pub index_user_id: i64,

    /// Echo Nest API key used to enrich new artists and songs.
    #[clap(long, env = "ECHO_NEST_API_KEY", hide_env_values = true)]
    pub echonest_api_key: Option<String>,

    /// Base URL of the Echo Nest API.
    #[clap(long, default_value = DEFAULT_ECHO_NEST_BASE_URL)]
    pub echonest_base_url: String,

    /// Timeout in seconds for a single Echo Nest request.
    #[clap(long, default_value_t = 10)]
    pub echonest_timeout_sec: u64,

    /// Timeout in seconds for enriching one artist or song.
    #[clap(long, default_value_t = 30)]
    pub enrichment_timeout_sec: u64,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            static_dir_path: self.static_dir_path.clone(),
            index_user_id: self.index_user_id,
            echonest_api_key: self.echonest_api_key.clone(),
            echonest_base_url: self.echonest_base_url.clone(),
            echonest_timeout_sec: self.echonest_timeout_sec,
            enrichment_timeout_sec: self.enrichment_timeout_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening SQLite database at {:?}...", app_config.db_path);
    let manager = SonglistManager::open(
        &app_config.db_path,
        app_config.echonest_config(),
        app_config.enrichment_timeout(),
    )?;
    let counts = manager.get_counts()?;
    info!(
        "Loaded {} users, {} artists, {} songs",
        counts.users, counts.artists, counts.songs
    );

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        index_user_id: app_config.index_user_id,
        static_dir_path: app_config.static_dir_path.clone(),
    };

    let hash = env!("GIT_HASH").to_string();
    info!(
        "Starting songlister {} ({}) on port {}...",
        env!("CARGO_PKG_VERSION"),
        hash,
        server_config.port
    );
    run_server(server_config, Arc::new(manager), hash).await
}
