//! Session actor.
//!
//! One tokio task owns the [`GameState`] and its [`DropScheduler`]. Commands from
//! any number of [`SessionHandle`]s and gravity ticks share a single bounded queue
//! and are applied strictly one at a time.
//!
//! After every applied mutation the actor, in order: reconciles the scheduler,
//! publishes the new snapshot on a `watch` channel, broadcasts
//! [`SessionEvent::StateChanged`] (and [`SessionEvent::GameOver`] when the game
//! ended), and finally replies to the caller.

use blockfall_core::{GameSnapshot, GameState, Randomizer};
use blockfall_types::{Command, Difficulty};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, trace};

use crate::scheduler::{DropScheduler, Tick};

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub difficulty: Difficulty,
    pub seed: u32,
    pub randomizer: Randomizer,
    /// Capacity of the command queue shared by handles and the timer.
    pub queue_capacity: usize,
    /// Per-subscriber backlog before a slow subscriber starts lagging.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            seed: 1,
            randomizer: Randomizer::default(),
            queue_capacity: 64,
            event_capacity: 256,
        }
    }
}

/// Notification published by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Emitted after every applied mutation with the fully updated state.
    StateChanged(GameSnapshot),
    /// Emitted once when a spawn collides.
    GameOver {
        score: u32,
        level: u32,
        lines: u32,
        difficulty: Difficulty,
    },
}

enum Message {
    Command {
        command: Command,
        reply: oneshot::Sender<bool>,
    },
    Tick(Tick),
    Shutdown(oneshot::Sender<()>),
}

impl From<Tick> for Message {
    fn from(tick: Tick) -> Self {
        Message::Tick(tick)
    }
}

pub struct Session;

impl Session {
    /// Start a session actor on the current tokio runtime.
    ///
    /// The game starts in `Ready`; send [`Command::Start`] to begin play.
    pub fn spawn(config: SessionConfig) -> SessionHandle {
        let state = GameState::new(config.difficulty, config.seed, config.randomizer);
        info!(
            difficulty = config.difficulty.as_str(),
            seed = config.seed,
            randomizer = ?config.randomizer,
            "session started"
        );
        Self::spawn_state(state, &config)
    }

    fn spawn_state(state: GameState, config: &SessionConfig) -> SessionHandle {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(state.snapshot());

        let actor = Actor {
            state,
            scheduler: DropScheduler::new(&tx),
            scheduled_level: None,
            snapshot_tx,
            events: events.clone(),
        };
        tokio::spawn(actor.run(rx));

        SessionHandle {
            tx,
            snapshot_rx,
            events,
        }
    }
}

struct Actor {
    state: GameState,
    scheduler: DropScheduler<Message>,
    /// Level the running timer was started for.
    scheduled_level: Option<u32>,
    snapshot_tx: watch::Sender<GameSnapshot>,
    events: broadcast::Sender<SessionEvent>,
}

impl Actor {
    async fn run(mut self, mut rx: mpsc::Receiver<Message>) {
        while let Some(message) = rx.recv().await {
            match message {
                Message::Command { command, reply } => {
                    let applied = self.apply(command);
                    let _ = reply.send(applied);
                }
                Message::Tick(tick) => {
                    if self.scheduler.is_current(tick) {
                        self.apply(Command::MoveDown);
                    } else {
                        trace!(epoch = tick.epoch, "stale tick ignored");
                    }
                }
                Message::Shutdown(done) => {
                    self.scheduler.cancel();
                    let _ = done.send(());
                    break;
                }
            }
        }
        self.scheduler.cancel();
        debug!("session stopped");
    }

    fn apply(&mut self, command: Command) -> bool {
        if !self.state.apply(command) {
            trace!(
                command = command.as_str(),
                phase = self.state.phase().as_str(),
                "command rejected"
            );
            return false;
        }
        let event = self.state.take_last_event();
        if let Some(event) = event.filter(|e| e.level_changed) {
            info!(level = event.level, "level up");
        }

        self.reconcile_scheduler();

        let snapshot = self.state.snapshot();
        self.snapshot_tx.send_replace(snapshot);
        // No subscribers is fine.
        let _ = self.events.send(SessionEvent::StateChanged(snapshot));

        if event.is_some_and(|e| e.game_over) {
            info!(
                score = snapshot.score,
                level = snapshot.level,
                lines = snapshot.lines,
                "game over"
            );
            let _ = self.events.send(SessionEvent::GameOver {
                score: snapshot.score,
                level: snapshot.level,
                lines: snapshot.lines,
                difficulty: snapshot.difficulty,
            });
        }
        true
    }

    /// Running means ticking at the interval for the current level; anything
    /// else means no timer at all.
    fn reconcile_scheduler(&mut self) {
        if self.state.is_running() {
            let level = self.state.level();
            if self.scheduled_level != Some(level) || !self.scheduler.is_active() {
                self.scheduler.start(self.state.drop_interval_ms());
                self.scheduled_level = Some(level);
            }
        } else if self.scheduler.is_active() || self.scheduled_level.is_some() {
            self.scheduler.cancel();
            self.scheduled_level = None;
        }
    }
}

/// Cloneable handle to a running session.
///
/// Dropping every handle stops the session and its timer.
#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Message>,
    snapshot_rx: watch::Receiver<GameSnapshot>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Queue `command` and wait until it has been applied.
    ///
    /// Returns whether the state changed; `false` once the session has stopped.
    pub async fn execute(&self, command: Command) -> bool {
        let (reply, rx) = oneshot::channel();
        if self
            .tx
            .send(Message::Command { command, reply })
            .await
            .is_err()
        {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    pub async fn start(&self) -> bool {
        self.execute(Command::Start).await
    }

    pub async fn pause(&self) -> bool {
        self.execute(Command::Pause).await
    }

    pub async fn resume(&self) -> bool {
        self.execute(Command::Resume).await
    }

    pub async fn reset(&self) -> bool {
        self.execute(Command::Reset).await
    }

    pub async fn move_left(&self) -> bool {
        self.execute(Command::MoveLeft).await
    }

    pub async fn move_right(&self) -> bool {
        self.execute(Command::MoveRight).await
    }

    pub async fn move_down(&self) -> bool {
        self.execute(Command::MoveDown).await
    }

    pub async fn rotate(&self) -> bool {
        self.execute(Command::Rotate).await
    }

    pub async fn hard_drop(&self) -> bool {
        self.execute(Command::HardDrop).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> GameSnapshot {
        *self.snapshot_rx.borrow()
    }

    /// Receiver that wakes whenever a new snapshot is published.
    pub fn watch(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Stop the session and cancel its timer. Waits for the actor to confirm.
    pub async fn shutdown(&self) {
        let (done, rx) = oneshot::channel();
        if self.tx.send(Message::Shutdown(done)).await.is_ok() {
            let _ = rx.await;
        }
    }
}

#[cfg(test)]
impl Session {
    /// Run a session over an already prepared game.
    pub(crate) fn spawn_with_state(state: GameState) -> SessionHandle {
        Self::spawn_state(state, &SessionConfig::default())
    }
}
