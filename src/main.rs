//! yt-focus - focus timer, YouTube playlist and task list in your terminal

use std::io::{IsTerminal, Write};
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, interval_at};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use yt_focus::app::{AppController, Effect};
use yt_focus::core::ingest::{IngestCompletion, IngestOutcome, PlaylistIngester};
use yt_focus::core::timer;
use yt_focus::core::youtube::YouTubeClient;
use yt_focus::storage::config;
use yt_focus::types::{Intent, TimerMode, TimerState};
use yt_focus::ui::commands::{self, Command, HELP};
use yt_focus::ui::console_player::ConsoleFactory;
use yt_focus::ui::render;

type App = AppController<YouTubeClient, ConsoleFactory>;

/// Focus timer with a YouTube playlist and a task list.
#[derive(Parser, Debug)]
#[command(name = "yt-focus")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Playlist URL to load on startup
    #[arg(long)]
    playlist: Option<String>,

    /// YouTube Data API key (overrides YOUTUBE_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// Focus phase length in minutes
    #[arg(long)]
    focus: Option<u32>,

    /// Break phase length in minutes
    #[arg(long = "break")]
    break_minutes: Option<u32>,

    /// Edit the configuration file
    #[arg(short, long)]
    edit: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

enum Flow {
    Continue,
    Quit,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "yt_focus=debug" } else { "yt_focus=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn prompt_playlist() -> anyhow::Result<Option<String>> {
    let input: String = dialoguer::Input::new()
        .with_prompt("Playlist URL (blank to skip)")
        .allow_empty(true)
        .interact_text()?;
    let input = input.trim();
    Ok((!input.is_empty()).then(|| input.to_string()))
}

fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Loading playlist...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Ticker exists only while the timer runs
fn sync_ticker(ticker: &mut Option<Interval>, running: bool) {
    match (running, ticker.is_some()) {
        (true, false) => {
            let second = Duration::from_secs(1);
            let mut t = interval_at(Instant::now() + second, second);
            t.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(t);
        }
        (false, true) => *ticker = None,
        _ => {}
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn print_status(app: &App) {
    println!("{}", render::status_line(&app.snapshot()));
}

fn print_error(e: impl std::fmt::Display) {
    eprintln!("{} {}", "Error:".red(), e);
}

fn run_intent(app: &mut App, intent: Intent, done_tx: &mpsc::UnboundedSender<IngestCompletion>) {
    match app.dispatch(intent) {
        Ok(Effect::Ingest(job)) => {
            let tx = done_tx.clone();
            tokio::spawn(async move {
                let _ = tx.send(job.run().await);
            });
        }
        Ok(Effect::None) => print_status(app),
        Err(e) => print_error(e),
    }
}

fn handle_command(
    app: &mut App,
    command: Command,
    done_tx: &mpsc::UnboundedSender<IngestCompletion>,
) -> Flow {
    match command {
        Command::Intent(intent) => run_intent(app, intent, done_tx),
        Command::Toggle => {
            let intent = if app.timer().running {
                Intent::PauseTimer
            } else {
                Intent::StartTimer
            };
            run_intent(app, intent, done_tx);
        }
        Command::Next => {
            let index = app.playlist().current_index + 1;
            run_intent(app, Intent::SelectVideo(index), done_tx);
        }
        Command::Prev => match app.playlist().current_index.checked_sub(1) {
            Some(index) => run_intent(app, Intent::SelectVideo(index), done_tx),
            None => println!("{}", "Already at the first video.".yellow()),
        },
        Command::List => {
            for line in render::playlist_lines(app.playlist()) {
                println!("{}", line);
            }
        }
        Command::Tasks => {
            for line in render::task_lines(app.tasks()) {
                println!("{}", line);
            }
        }
        Command::Status => print_status(app),
        Command::Help => println!("{}", HELP),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn announce_phase(mode: TimerMode, bell: bool) {
    let message = match mode {
        TimerMode::Break => "Focus phase done. Take a break; 'start' when ready.",
        TimerMode::Focus => "Break is over. 'start' to focus again.",
    };
    if bell {
        print!("\x07");
    }
    println!("{}", message.magenta().bold());
    std::io::stdout().flush().ok();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load_config().await?;

    // Handle --edit flag
    if cli.edit {
        config::edit_config(&cfg.editor).await?;
        return Ok(());
    }

    let api_key = config::resolve_api_key(cli.api_key.as_deref(), &cfg);
    let ingester = PlaylistIngester::new(YouTubeClient::new(&cfg.api_base_url), api_key);
    let factory = ConsoleFactory::new(Duration::from_millis(cfg.player_ready_delay_ms));
    let timer_state = timer::update_durations(
        TimerState::default(),
        cli.focus.unwrap_or(cfg.focus_minutes),
        cli.break_minutes.unwrap_or(cfg.break_minutes),
    );
    let mut app: App = AppController::new(ingester, factory, timer_state);
    info!("yt-focus v{} starting", env!("CARGO_PKG_VERSION"));

    let initial_playlist = match cli.playlist {
        Some(url) => Some(url),
        None if std::io::stdin().is_terminal() => prompt_playlist()?,
        None => None,
    };

    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<IngestCompletion>();
    if let Some(url) = initial_playlist {
        run_intent(&mut app, Intent::IngestPlaylist(url), &done_tx);
    }

    println!("{}", "Type 'help' for commands.".dimmed());
    print_status(&app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker: Option<Interval> = None;
    let mut refresh = interval(Duration::from_millis(200));
    let mut spinner: Option<ProgressBar> = None;

    loop {
        sync_ticker(&mut ticker, app.timer().running);

        tokio::select! {
            _ = next_tick(&mut ticker) => {
                if let Some(mode) = app.tick() {
                    announce_phase(mode, cfg.bell);
                    print_status(&app);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let flow = match commands::parse(&line) {
                    Ok(command) => handle_command(&mut app, command, &done_tx),
                    Err(e) => {
                        print_error(e);
                        Flow::Continue
                    }
                };
                if let Flow::Quit = flow {
                    break;
                }
            }
            Some(completion) = done_rx.recv() => {
                if let Some(s) = spinner.take() {
                    s.finish_and_clear();
                }
                let stale = app.is_superseded(&completion);
                match app.complete_ingest(completion) {
                    Ok(IngestOutcome::Committed { count }) => {
                        println!("{} {} videos", "Playlist loaded:".green(), count);
                        print_status(&app);
                    }
                    Ok(IngestOutcome::Superseded) => {}
                    Err(e) if stale => debug!(error = %e, "ignoring failure of a superseded ingest"),
                    Err(e) => print_error(format!("Failed to load playlist: {}", e)),
                }
            }
            _ = refresh.tick() => {
                if app.poll_player() {
                    print_status(&app);
                }
            }
        }

        match (app.playlist().loading, spinner.is_some()) {
            (true, false) => spinner = Some(loading_spinner()),
            (false, true) => {
                if let Some(s) = spinner.take() {
                    s.finish_and_clear();
                }
            }
            _ => {}
        }
    }

    println!("👋 Stay focused.");
    Ok(())
}
