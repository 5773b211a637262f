//! Blockfall terminal runner (default binary).
//!
//! Input is polled synchronously with crossterm; the game itself runs as a
//! session actor on a tokio runtime owned by `main`. Frames are redrawn whenever
//! the published snapshot or the terminal size changes.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use tokio::runtime::Runtime;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{debug, info, warn};

use blockfall::core::Randomizer;
use blockfall::engine::{Session, SessionConfig, SessionEvent, SessionHandle};
use blockfall::input::{handle_key_event, should_quit};
use blockfall::store::{HighScores, ScoreEntry, ScoreStore};
use blockfall::term::{FrameBuffer, GameView, Screen, Viewport};
use blockfall::types::Difficulty;

/// Input poll timeout; bounds how late a gravity step shows up on screen.
const FRAME: Duration = Duration::from_millis(16);

/// Falling-block puzzle game for the terminal
#[derive(Parser, Debug)]
#[command(name = "blockfall", version, about, long_about = None)]
struct Cli {
    /// Difficulty: easy, medium or hard
    #[arg(short, long, env = "BLOCKFALL_DIFFICULTY", default_value = "medium", value_parser = parse_difficulty)]
    difficulty: Difficulty,

    /// Piece generator seed (random when omitted)
    #[arg(long, env = "BLOCKFALL_SEED")]
    seed: Option<u32>,

    /// Deal pieces from shuffled bags of seven instead of uniformly
    #[arg(long, env = "BLOCKFALL_BAG")]
    bag: bool,

    /// High score file (defaults to the platform data directory)
    #[arg(long, env = "BLOCKFALL_SCORES_FILE")]
    scores_file: Option<PathBuf>,

    /// Write logs to this file; filter with RUST_LOG
    #[arg(long, env = "BLOCKFALL_LOG")]
    log_file: Option<PathBuf>,

    /// Print the high score lists and exit
    #[arg(long, conflicts_with = "clear_scores")]
    scores: bool,

    /// Delete every stored high score and exit
    #[arg(long)]
    clear_scores: bool,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s)
        .ok_or_else(|| format!("unknown difficulty {s:?} (expected easy, medium or hard)"))
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            difficulty: self.difficulty,
            seed: self.seed.unwrap_or_else(rand::random),
            randomizer: if self.bag {
                Randomizer::Bag
            } else {
                Randomizer::Uniform
            },
            ..SessionConfig::default()
        }
    }

    fn open_store(&self) -> Result<ScoreStore> {
        Ok(match &self.scores_file {
            Some(path) => ScoreStore::new(path),
            None => ScoreStore::open_default()?,
        })
    }

    fn score_store(&self) -> Option<ScoreStore> {
        self.open_store()
            .map_err(|e| warn!("high scores disabled: {e}"))
            .ok()
    }
}

/// Logs go to a file or nowhere; the terminal belongs to the game.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    if cli.scores {
        let scores = cli.open_store()?.load()?;
        let mut stdout = io::stdout().lock();
        write_leaderboard(&mut stdout, &scores)?;
        return Ok(());
    }
    if cli.clear_scores {
        let store = cli.open_store()?;
        store.clear()?;
        info!(path = %store.path().display(), "high scores cleared");
        println!("Cleared high scores in {}", store.path().display());
        return Ok(());
    }

    // Restore the terminal before the default hook prints the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::cursor::Show,
            crossterm::terminal::LeaveAlternateScreen
        );
        default_hook(info);
    }));

    let rt = Runtime::new().context("creating tokio runtime")?;
    let config = cli.session_config();
    info!(seed = config.seed, "starting blockfall");
    let handle = {
        let _guard = rt.enter();
        Session::spawn(config)
    };
    let store = cli.score_store();

    let mut screen = Screen::enter()?;
    let result = run(&rt, &handle, store.as_ref(), &mut screen);
    screen.leave()?;

    rt.block_on(handle.shutdown());
    result
}

fn run(
    rt: &Runtime,
    handle: &SessionHandle,
    store: Option<&ScoreStore>,
    screen: &mut Screen,
) -> Result<()> {
    let difficulty = handle.snapshot().difficulty;
    let mut events = handle.subscribe();

    let mut view = GameView::default();
    view.set_best_score(store.and_then(|s| load_best(s, difficulty)));

    let mut fb = FrameBuffer::new(0, 0);
    let mut drawn: Option<(u64, (u16, u16))> = None;

    loop {
        loop {
            match events.try_recv() {
                Ok(SessionEvent::GameOver {
                    score,
                    level,
                    lines,
                    difficulty,
                }) => {
                    if let Some(store) = store {
                        record_score(store, difficulty, ScoreEntry::new(score, level, lines));
                        view.set_best_score(load_best(store, difficulty));
                        drawn = None;
                    }
                }
                Ok(SessionEvent::StateChanged(_)) => {}
                Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "event receiver lagged"),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => return Ok(()),
            }
        }

        let snap = handle.snapshot();
        let size = screen.size().unwrap_or((80, 24));
        if drawn != Some((snap.revision, size)) {
            view.render_into(&snap, Viewport::new(size.0, size.1), &mut fb);
            screen.present(&mut fb)?;
            drawn = Some((snap.revision, size));
        }

        if !event::poll(FRAME)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if should_quit(key) {
                    return Ok(());
                }
                if let Some(command) = handle_key_event(key, snap.phase) {
                    rt.block_on(handle.execute(command));
                }
            }
            Event::Resize(..) => screen.invalidate(),
            _ => {}
        }
    }
}

fn load_best(store: &ScoreStore, difficulty: Difficulty) -> Option<u32> {
    match store.load() {
        Ok(scores) => scores.best(difficulty),
        Err(e) => {
            warn!("failed to load high scores: {e}");
            None
        }
    }
}

fn record_score(store: &ScoreStore, difficulty: Difficulty, entry: ScoreEntry) {
    let score = entry.score;
    match store.record(difficulty, entry) {
        Ok(Some(rank)) => info!(score, rank = rank + 1, "new high score"),
        Ok(None) => debug!(score, "score did not make the list"),
        Err(e) => warn!("failed to save score: {e}"),
    }
}

/// Ranked table per difficulty: rank, score, level, lines and date.
fn write_leaderboard(out: &mut impl Write, scores: &HighScores) -> io::Result<()> {
    for (i, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}", difficulty.as_str().to_uppercase())?;
        let entries = scores.top(difficulty);
        if entries.is_empty() {
            writeln!(out, "  no scores yet")?;
            continue;
        }
        writeln!(out, "  {:>2}  {:>8}  {:>5}  {:>5}  DATE", "#", "SCORE", "LEVEL", "LINES")?;
        for (rank, e) in entries.iter().enumerate() {
            writeln!(
                out,
                "  {:>2}  {:>8}  {:>5}  {:>5}  {}",
                rank + 1,
                e.score,
                e.level,
                e.lines,
                e.timestamp.format("%Y-%m-%d")
            )?;
        }
    }
    Ok(())
}
