use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lyrics_enrichment_server::config::{AdminSettings, AppConfig, CliConfig, FileConfig};
use lyrics_enrichment_server::server::ServerConfig;
use lyrics_enrichment_server::user::AdminBootstrap;
use lyrics_enrichment_server::{
    run_server, EnrichmentPipeline, RequestsLoggingLevel, SqliteSongStore, SqliteUserStore,
};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding the SQLite databases (songs.db, user.db).
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to a TOML config file. Its values override the CLI ones.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Musixmatch API key.
    #[clap(long, env = "MUSIXMATCH_API_KEY", hide_env_values = true)]
    pub musixmatch_api_key: Option<String>,

    /// OpenAI API key.
    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,
}

impl From<&CliArgs> for CliConfig {
    fn from(args: &CliArgs) -> Self {
        CliConfig {
            db_dir: args.db_dir.clone(),
            port: args.port,
            logging_level: args.logging_level.clone(),
            musixmatch_api_key: args.musixmatch_api_key.clone(),
            openai_api_key: args.openai_api_key.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Variables from .env must be visible before clap reads the environment.
    let dotenv_path = dotenvy::dotenv().ok();
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

    if let Some(path) = dotenv_path {
        info!("Loaded environment from {:?}", path);
    }

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let config = AppConfig::resolve(&CliConfig::from(&cli_args), file_config)?;

    info!("Opening song database at {:?}...", config.song_db_path());
    let song_store = Arc::new(SqliteSongStore::new(config.song_db_path())?);

    info!("Opening user database at {:?}...", config.user_db_path());
    let user_store = SqliteUserStore::new(config.user_db_path())?;
    match AdminSettings::from_env() {
        Some(admin) => match user_store.ensure_admin(&admin)? {
            AdminBootstrap::Created => info!("Admin account {} created", admin.username),
            AdminBootstrap::AlreadyExists => {
                info!("Admin account {} already present", admin.username)
            }
            AdminBootstrap::PasswordDiffers => warn!(
                "Admin account {} already present with a different password, left unchanged",
                admin.username
            ),
        },
        None => info!("ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD not all set, no admin bootstrap"),
    }

    let pipeline = Arc::new(EnrichmentPipeline::from_config(&config));

    info!(
        "Ready to serve at port {} (retries: {} attempts, {}s initial backoff)",
        config.port, config.retry.max_attempts, config.retry.initial_backoff_secs
    );
    run_server(
        ServerConfig {
            requests_logging_level: config.logging_level.clone(),
            port: config.port,
        },
        song_store,
        pipeline,
    )
    .await
}
