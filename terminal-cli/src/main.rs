use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hitstand_client::controller::DEFAULT_TOURNAMENT_HANDS;
use hitstand_client::view::{render_outcome, render_results, render_table, render_trace};
use hitstand_client::{App, Client, Command};
use hitstand_types::CardStyle;

mod commands;
mod config;
mod render;
mod tui;

use config::{load_config, log_path, save_config, Settings};

/// CLI flags (user-provided override persisted config)
#[derive(Parser, Debug)]
#[command(name = "hitstand", about = "Watch blackjack agents play against the simulation service")]
struct Args {
    /// Service base URL (http://localhost:5000)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Default tournament size (1000)
    #[arg(long)]
    hands: Option<i64>,

    /// Render cards as emoji (remembered)
    #[arg(long, global = true, conflicts_with = "no_emoji")]
    emoji: bool,

    /// Render cards as text (remembered)
    #[arg(long, global = true)]
    no_emoji: bool,

    /// Debug-level logging for this run
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Mode>,
}

/// One-shot modes; without one the interactive client starts.
#[derive(Subcommand, Debug)]
enum Mode {
    /// List the agents offered by the service
    Agents,
    /// Play a single hand and print its table and trace
    Play {
        /// Agent id (defaults to the current selection, EV)
        #[arg(long)]
        agent: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        seed: Option<i64>,
    },
    /// Run a tournament between both agents
    Match {
        #[arg(long, allow_hyphen_values = true)]
        hands: Option<i64>,
        #[arg(long, allow_hyphen_values = true)]
        seed: Option<i64>,
    },
}

fn init_logging(verbose: bool, interactive: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    if !interactive {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }
    // The alternate screen owns stdout/stderr, so the interactive client logs to a file.
    let Some(path) = log_path() else {
        return Ok(());
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = load_config().unwrap_or_default();
    let emoji = match (args.emoji, args.no_emoji) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let settings = Settings::resolve(args.url.clone(), args.hands, emoji, args.verbose, &cfg);
    save_config(&settings.persisted())?;

    init_logging(settings.verbose, args.command.is_none())?;

    let client = Client::new(&settings.url).with_context(|| format!("service URL {}", settings.url))?;
    let style = if settings.emoji {
        CardStyle::Emoji
    } else {
        CardStyle::Text
    };
    let mut app = App::new(client).with_card_style(style);

    match args.command {
        None => tui::run(app, &settings).await,
        Some(Mode::Agents) => {
            app.run(Command::LoadAgents).await?;
            let selected = app.session().selected_agent_id();
            for agent in app.catalog().agents() {
                let marker = if agent.id == selected { "*" } else { " " };
                if agent.description.is_empty() {
                    println!("{marker} {:<8} {}", agent.id, agent.name);
                } else {
                    println!("{marker} {:<8} {} · {}", agent.id, agent.name, agent.description);
                }
            }
            Ok(())
        }
        Some(Mode::Play { agent, seed }) => {
            app.run(Command::LoadAgents).await?;
            if let Some(agent) = agent {
                app.run(Command::SelectAgent(agent)).await?;
            }
            app.run(Command::PlayHand { seed }).await?;
            if let Some(hand) = &app.screen().hand {
                for line in render_table(hand, style) {
                    println!("{line}");
                }
                println!();
                for line in render_trace(&hand.steps, style) {
                    println!("{line}");
                }
                println!();
                println!("{}", render_outcome(hand));
            }
            Ok(())
        }
        Some(Mode::Match { hands, seed }) => {
            let num_hands = match hands {
                None => settings.hands,
                Some(0) => DEFAULT_TOURNAMENT_HANDS,
                Some(hands) => hands,
            };
            app.run(Command::RunTournament { num_hands, seed }).await?;
            if let Some(results) = &app.screen().tournament {
                for line in render_results(results) {
                    println!("{line}");
                }
            }
            Ok(())
        }
    }
}
