//! The session loop.
//!
//! Each [`Controller::tick`] drains the events of one poll in arrival order,
//! services lifecycle requests, then either advances the running animation by
//! one frame or gives the AI its turn step, and finally renders a frame.
//! Nothing inside a tick waits on the AI.

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::input::{InputEvent, InputSource};
use crate::layout;
use crate::lifecycle::{ActionOutcome, LifecycleAction, LifecycleFlags, LifecycleReport};
use crate::menu::{MenuOutcome, Mode, ModeSelector};
use crate::render::{DrawSurface, FrameRenderer, RenderContext};
use crate::session::Session;
use crate::turn::{TurnOrchestrator, TurnStep};
use chess_ai::{Minimax, MoveSearch};
use chess_engine::{load_game, save_game, FileSlot, SaveError, SaveSlot};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Coarse controller state, derived from what is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InMenu,
    InGame,
    AwaitingAi,
    Animating,
}

/// Whether the loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Options for [`Controller::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
    /// Stop once a game has ended and its last move finished animating.
    pub stop_when_over: bool,
    /// Sleep between ticks to hold the configured tick rates.
    pub paced: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            max_ticks: None,
            stop_when_over: false,
            paced: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    TickBudget,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub reason: StopReason,
}

/// Owns the session and its collaborators.
pub struct Controller {
    config: SessionConfig,
    menu: ModeSelector,
    session: Option<Session>,
    flags: LifecycleFlags,
    turns: TurnOrchestrator,
    renderer: FrameRenderer,
    slot: Box<dyn SaveSlot>,
    last_lifecycle: Vec<LifecycleReport>,
    last_turn: Option<TurnStep>,
    ticks: u64,
}

impl Controller {
    pub fn new(config: SessionConfig, searcher: Arc<dyn MoveSearch>, slot: Box<dyn SaveSlot>) -> Self {
        let turns = TurnOrchestrator::new(searcher, &config.ai);
        Controller {
            config,
            menu: ModeSelector::new(),
            session: None,
            flags: LifecycleFlags::new(),
            turns,
            renderer: FrameRenderer::new(RenderContext::default()),
            slot,
            last_lifecycle: Vec::new(),
            last_turn: None,
            ticks: 0,
        }
    }

    /// Builds a controller with the minimax searcher and a file save slot.
    pub fn from_config(config: SessionConfig) -> Self {
        let searcher = Arc::new(Minimax::new(config.ai.depth));
        let slot = Box::new(FileSlot::new(config.save_path.clone()));
        Self::new(config, searcher, slot)
    }

    pub fn with_renderer(mut self, renderer: FrameRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        match &self.session {
            None => Phase::InMenu,
            Some(s) if s.is_animating() => Phase::Animating,
            Some(s) if s.ai_busy() => Phase::AwaitingAi,
            Some(_) => Phase::InGame,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn flags(&self) -> &LifecycleFlags {
        &self.flags
    }

    /// Lifecycle actions serviced during the last tick, in order.
    pub fn last_lifecycle(&self) -> &[LifecycleReport] {
        &self.last_lifecycle
    }

    /// AI turn step taken during the last tick, if any.
    pub fn last_turn(&self) -> Option<TurnStep> {
        self.last_turn
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Starts a fresh session under `mode`, leaving the menu.
    pub fn start_session(&mut self, mode: Mode) {
        if let Some(old) = self.session.as_mut() {
            old.cancel_ai();
        }
        self.flags.clear();
        self.session = Some(Session::new(
            mode,
            self.config.frames_per_square,
            self.config.promotion.piece(),
        ));
        info!(%mode, selections = self.menu.selections(), "session started");
    }

    /// Runs one loop iteration.
    pub fn tick(&mut self, events: &[InputEvent], surface: &mut dyn DrawSurface) -> Result<Flow, SessionError> {
        self.ticks += 1;
        self.last_lifecycle.clear();
        self.last_turn = None;

        for &event in events {
            if self.handle_event(event) == Flow::Quit {
                info!("quit requested");
                if let Some(session) = self.session.as_mut() {
                    session.cancel_ai();
                }
                return Ok(Flow::Quit);
            }
        }

        self.service_lifecycle();

        if let Some(session) = self.session.as_mut() {
            if session.is_animating() {
                session.advance_animation();
            } else {
                self.last_turn = Some(self.turns.step(session));
            }
        }

        self.render(surface)?;
        Ok(Flow::Continue)
    }

    /// Time until the next tick should start.
    pub fn tick_interval(&self) -> Duration {
        let fps = match self.phase() {
            Phase::Animating => self.config.animation_fps,
            _ => self.config.logic_fps,
        };
        Duration::from_secs(1) / fps.max(1)
    }

    /// Ticks until quit, the tick budget or (optionally) the end of the game.
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        surface: &mut dyn DrawSurface,
        options: RunOptions,
    ) -> Result<RunSummary, SessionError> {
        let mut ticks = 0;
        loop {
            let started = Instant::now();
            let events = input.poll();
            let flow = self.tick(&events, surface)?;
            ticks += 1;

            let reason = if flow == Flow::Quit {
                Some(StopReason::Quit)
            } else if options.stop_when_over
                && self.session.as_ref().is_some_and(|s| s.is_over() && !s.is_animating())
            {
                Some(StopReason::GameOver)
            } else if options.max_ticks.is_some_and(|max| ticks >= max) {
                Some(StopReason::TickBudget)
            } else {
                None
            };
            if let Some(reason) = reason {
                info!(ticks, ?reason, "session loop stopped");
                return Ok(RunSummary { ticks, reason });
            }

            if options.paced {
                if let Some(rest) = self.tick_interval().checked_sub(started.elapsed()) {
                    thread::sleep(rest);
                }
            }
        }
    }

    fn handle_event(&mut self, event: InputEvent) -> Flow {
        if self.session.is_none() {
            return self.handle_menu_event(event);
        }
        let Some(session) = self.session.as_mut() else {
            return Flow::Continue;
        };

        match event {
            InputEvent::KeyPress(key) => {
                if let Some(action) = LifecycleAction::for_key(key) {
                    debug!(%action, "requested by key");
                    self.flags.request(action);
                }
            }
            InputEvent::PointerPress { x, y } => {
                if let Some(action) = layout::lifecycle_hit(x, y) {
                    debug!(%action, "requested by button");
                    self.flags.request(action);
                }
                session.click(layout::square_at(x, y));
            }
            InputEvent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// While no session runs, every event goes to the mode selector. Its
    /// quit ends the loop.
    fn handle_menu_event(&mut self, event: InputEvent) -> Flow {
        match self.menu.on_event(event) {
            MenuOutcome::Selected(mode) => {
                self.start_session(mode);
                Flow::Continue
            }
            MenuOutcome::Quit => Flow::Quit,
            MenuOutcome::Waiting => Flow::Continue,
        }
    }

    fn service_lifecycle(&mut self) {
        for action in LifecycleAction::SERVICE_ORDER {
            if !self.flags.take(action) {
                continue;
            }
            let outcome = self.perform(action);
            match &outcome {
                ActionOutcome::Failed(reason) => warn!(%action, %reason, "lifecycle action failed"),
                other => info!(%action, outcome = ?other, "lifecycle action serviced"),
            }
            self.last_lifecycle.push(LifecycleReport { action, outcome });
        }
    }

    fn perform(&mut self, action: LifecycleAction) -> ActionOutcome {
        let Some(session) = self.session.as_mut() else {
            return ActionOutcome::Nothing;
        };

        match action {
            LifecycleAction::Save => match save_game(self.slot.as_mut(), session.game()) {
                Ok(()) => {
                    session.set_status("Game saved");
                    ActionOutcome::Applied
                }
                Err(e) => fail(session, format!("Save failed: {e}")),
            },
            LifecycleAction::Load => match load_game(self.slot.as_ref()) {
                Ok(game) => {
                    session.replace_game(game);
                    session.set_status("Game loaded");
                    ActionOutcome::Applied
                }
                Err(SaveError::NotFound) => fail(
                    session,
                    "No saved game found! Press S to save a game first.".to_string(),
                ),
                Err(e) => fail(session, format!("Load failed: {e}")),
            },
            LifecycleAction::Undo => match session.undo() {
                Some(_) => ActionOutcome::Applied,
                None => ActionOutcome::Nothing,
            },
            LifecycleAction::Reset => {
                session.reset();
                ActionOutcome::Applied
            }
            LifecycleAction::ExitToMenu => {
                session.cancel_ai();
                self.session = None;
                info!("returned to menu");
                ActionOutcome::Applied
            }
        }
    }

    fn render(&self, surface: &mut dyn DrawSurface) -> Result<(), SessionError> {
        match &self.session {
            None => self.renderer.draw_menu(surface)?,
            Some(session) => self.renderer.draw_session(surface, session)?,
        }
        surface.present()?;
        Ok(())
    }
}

fn fail(session: &mut Session, message: String) -> ActionOutcome {
    session.set_status(message.clone());
    ActionOutcome::Failed(message)
}
