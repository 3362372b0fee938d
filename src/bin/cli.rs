//! TamilMV Bot CLI
//!
//! Local driver for the bot. Every command is issued as the configured
//! admin, so the same dispatch path as the chat front end is exercised.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tamilmv_bot::{
    bot::{Bot, CallbackAnswer, Reply},
    error::Result,
    models::Config,
    services::Catalog,
    utils::{HttpFetcher, SystemClock},
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Chat id used for the local session.
const LOCAL_CHAT: i64 = 0;

/// TamilMV Bot - forum torrent link fetcher
#[derive(Parser, Debug)]
#[command(
    name = "tamilmv-bot",
    version,
    about = "Fetch latest movie posts and torrent links from the forum"
)]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List today's posts
    Today,

    /// List yesterday's posts
    Yesterday,

    /// List posts for a date (YYYY-MM-DD)
    Date { date: String },

    /// Search cached titles
    Search { query: String },

    /// Extract torrent links from a post URL
    GetLink { url: String },

    /// Show cache statistics
    Stats,

    /// Validate configuration
    Validate,

    /// Interactive session: `/cmd` for commands, `:data` for button presses
    Repl,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_replies(replies: &[Reply]) {
    for reply in replies {
        println!("{}", reply.text);
        for row in &reply.buttons {
            let row: Vec<String> = row
                .iter()
                .map(|b| format!("[{}] :{}", b.label, b.data))
                .collect();
            println!("  {}", row.join("  "));
        }
        println!();
    }
}

fn print_answer(answer: &CallbackAnswer) {
    if let Some(notice) = &answer.notice {
        println!("({notice})");
    }
    print_replies(&answer.replies);
}

/// Send a command and its follow-up text, printing only the final answer.
async fn prompted(
    bot: &mut Bot<HttpFetcher, SystemClock>,
    admin: i64,
    command: &str,
    input: &str,
) -> Vec<Reply> {
    bot.handle_message(admin, LOCAL_CHAT, command).await;
    bot.handle_message(admin, LOCAL_CHAT, input).await
}

async fn repl(bot: &mut Bot<HttpFetcher, SystemClock>, admin: i64) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "exit" | "quit" => break,
            _ => {}
        }

        if let Some(data) = line.strip_prefix(':') {
            let answer = bot.handle_callback(admin, LOCAL_CHAT, data).await;
            print_answer(&answer);
        } else {
            let replies = bot.handle_message(admin, LOCAL_CHAT, line).await;
            print_replies(&replies);
        }
    }

    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env()?;
    log::info!("Loaded configuration from {}", cli.config.display());

    if matches!(cli.command, Command::Validate) {
        if let Err(e) = config.validate() {
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
        log::info!("✓ Config OK (source: {})", config.site.base_url);
        return Ok(());
    }

    if let Err(e) = config.validate() {
        log::warn!("Config validation failed: {}", e);
    }

    let admin = config.bot.admin_id;
    let fetcher = HttpFetcher::new(&config.http)?;
    let catalog = Catalog::new(&config, fetcher, SystemClock)?;
    let mut bot = Bot::new(&config, catalog);

    let replies = match cli.command {
        Command::Today => bot.handle_message(admin, LOCAL_CHAT, "/today").await,
        Command::Yesterday => bot.handle_message(admin, LOCAL_CHAT, "/yesterday").await,
        Command::Date { date } => prompted(&mut bot, admin, "/date", &date).await,
        Command::Search { query } => prompted(&mut bot, admin, "/search", &query).await,
        Command::GetLink { url } => prompted(&mut bot, admin, "/getlink", &url).await,
        Command::Stats => bot.handle_message(admin, LOCAL_CHAT, "/stats").await,
        Command::Repl => {
            print_replies(&bot.handle_message(admin, LOCAL_CHAT, "/start").await);
            repl(&mut bot, admin).await?;
            Vec::new()
        }
        Command::Validate => Vec::new(),
    };

    print_replies(&replies);

    Ok(())
}
