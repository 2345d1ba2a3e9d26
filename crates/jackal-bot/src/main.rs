//! `jackal` — Telegram bot answering personnel medical-status queries.
//!
//! Reads `config.toml` (or the path given with `--config`) and `JACKAL_*`
//! environment variables, then either serves the bot or runs a single query.
//!
//! # Examples
//!
//! ```text
//! jackal --config config.toml serve
//! JACKAL_SHEETS__API_KEY=... jackal query search A123
//! JACKAL_SHEETS__SERVICE_ACCOUNT_KEY=key.json jackal serve
//! ```

use std::{future::IntoFuture as _, path::PathBuf, sync::Arc};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use jackal_bot::{
  BotConfig, Calendar, dispatch::Dispatcher, poller::Poller, telegram::TelegramClient,
};
use jackal_core::QueryEngine;
use jackal_sheets::SheetsSource;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Jackal medical-status bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  mode: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
  /// Run the Telegram bot and the health-check endpoint (default).
  Serve,
  /// Answer one query against the sheet and print the reply.
  Query {
    #[command(subcommand)]
    query: Query,
  },
}

#[derive(Subcommand)]
enum Query {
  /// Look up one person by SYN NO.
  Search { syn_no: String },
  /// List everyone with a PES code.
  Pes { code: String },
  /// List everyone on the roster.
  All,
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
    .add_source(
      config::Environment::with_prefix("JACKAL")
        .prefix_separator("_")
        .separator("__"),
    )
    .build()
    .context("failed to read config file")?;

  let bot_cfg: BotConfig = settings
    .try_deserialize()
    .context("failed to deserialise BotConfig")?;

  let calendar = match bot_cfg.utc_offset_hours {
    Some(hours) => Calendar::with_offset_hours(hours)
      .with_context(|| format!("utc_offset_hours {hours} is out of range"))?,
    None => Calendar::local(),
  };

  let source = SheetsSource::new(bot_cfg.sheets.clone())
    .await
    .context("failed to build sheets client")?;
  let engine = QueryEngine::new(bot_cfg.columns.clone());

  match cli.mode.unwrap_or(Mode::Serve) {
    Mode::Serve => serve(bot_cfg, source, engine, calendar).await,
    Mode::Query { query } => {
      let today = calendar.today();
      let reply = match &query {
        Query::Search { syn_no } => engine.lookup(&source, syn_no, today).await,
        Query::Pes { code } => engine.by_category(&source, code, today).await,
        Query::All => engine.list_all(&source, today).await,
      }
      .context("query failed")?;
      println!("{}", reply.render());
      Ok(())
    }
  }
}

async fn serve(
  bot_cfg: BotConfig,
  source: SheetsSource,
  engine: QueryEngine,
  calendar: Calendar,
) -> anyhow::Result<()> {
  let Some(telegram_cfg) = &bot_cfg.telegram else {
    bail!("`telegram.token` must be configured to serve");
  };
  let client =
    TelegramClient::new(telegram_cfg).context("failed to build telegram client")?;
  let username = match &telegram_cfg.username {
    Some(name) => name.trim_start_matches('@').to_owned(),
    None => client
      .get_me()
      .await
      .context("failed to look up the bot account")?
      .username
      .context("the bot account has no username")?,
  };

  let dispatcher = Dispatcher::new(
    Arc::new(source),
    engine,
    calendar,
    bot_cfg.update_form_url.clone(),
  );
  let poller = Poller::new(client, Arc::new(dispatcher), username.clone());

  let address = format!("{}:{}", bot_cfg.server.host, bot_cfg.server.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("Health check listening on http://{address}");
  tracing::info!("Jackal bot @{username} is polling for commands");

  tokio::select! {
    served = axum::serve(listener, jackal_bot::router()).into_future() => {
      served.context("server error")?;
    }
    () = poller.run() => {}
    signal = tokio::signal::ctrl_c() => {
      signal.context("failed to listen for ctrl-c")?;
      tracing::info!("Shutting down");
    }
  }

  Ok(())
}
