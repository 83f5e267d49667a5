//! Aula server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! SQLite store, and serves the portal over HTTP.
//!
//! # Teacher accounts
//!
//! Registration over HTTP only ever creates students. Teacher accounts are
//! seeded from the command line:
//!
//! ```
//! cargo run -p aula-server -- --seed-teacher teacher@example.com
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use aula_core::{
  store::CourseStore as _,
  user::{NewProfile, Role},
};
use aula_server::{AppState, ServerConfig, storage::DiskStorage};
use aula_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Aula course portal server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Create a teacher account with this email (password read from stdin)
  /// and exit.
  #[arg(long, value_name = "EMAIL")]
  seed_teacher: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("AULA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path and open the store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Helper mode: seed a teacher account and exit.
  if let Some(email) = cli.seed_teacher {
    let password = read_password_from_stdin()?;
    let password_hash = aula_api::auth::hash_password(&password)
      .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?;

    let profile = store
      .create_profile(NewProfile {
        email,
        full_name: None,
        role: Role::Teacher,
        password_hash,
      })
      .await
      .context("failed to create teacher profile")?;

    println!("created teacher {} ({})", profile.email, profile.profile_id);
    return Ok(());
  }

  // Build application state.
  let state = AppState {
    store:   Arc::new(store),
    storage: DiskStorage::new(server_cfg.data_dir.clone()),
    config:  Arc::new(server_cfg.clone()),
  };

  let app = aula_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a password from stdin (echo is the terminal's problem; this runs
/// once at provisioning time).
fn read_password_from_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  let password = line
    .trim_end_matches('\n')
    .trim_end_matches('\r')
    .to_string();
  if password.is_empty() {
    anyhow::bail!("empty password");
  }
  Ok(password)
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
