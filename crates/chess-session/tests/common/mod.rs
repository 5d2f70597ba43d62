#![allow(dead_code)]

use chess_ai::{CancelToken, MoveSearch};
use chess_core::{Move, Square};
use chess_engine::{MemorySlot, Position, SaveSlot};
use chess_session::{
    layout, Controller, Flow, InputEvent, LifecycleAction, Mode, Phase, RecordingSurface, Session,
    SessionConfig,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Plays the first listed move that is legal, otherwise nothing.
pub struct Scripted(pub Vec<&'static str>);

impl MoveSearch for Scripted {
    fn find_best_move(&self, _: &Position, moves: &[Move], _: &CancelToken) -> Option<Move> {
        self.0
            .iter()
            .find_map(|uci| moves.iter().find(|m| m.to_uci() == *uci).copied())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Blows up on every call.
pub struct Panicking;

impl MoveSearch for Panicking {
    fn find_best_move(&self, _: &Position, _: &[Move], _: &CancelToken) -> Option<Move> {
        panic!("search crashed");
    }

    fn name(&self) -> &str {
        "panicking"
    }
}

/// Never finishes on its own. Once cancelled it still returns a move, which
/// must never reach the board.
#[derive(Default)]
pub struct Blocking {
    pub returned: AtomicUsize,
}

impl MoveSearch for Blocking {
    fn find_best_move(&self, _: &Position, moves: &[Move], cancel: &CancelToken) -> Option<Move> {
        while !cancel.is_cancelled() {
            thread::sleep(Duration::from_millis(1));
        }
        self.returned.fetch_add(1, Ordering::SeqCst);
        moves.first().copied()
    }

    fn name(&self) -> &str {
        "blocking"
    }
}

pub fn config(background: bool) -> SessionConfig {
    let mut config = SessionConfig::default();
    config.ai.background = background;
    config.ai.seed = Some(7);
    config
}

pub fn square_press(row: u8, col: u8) -> InputEvent {
    let sq = Square::new(row, col).expect("square on the board");
    let (x, y) = layout::square_rect(sq).center();
    InputEvent::PointerPress { x, y }
}

pub fn press(name: &str) -> InputEvent {
    let sq = Square::from_algebraic(name).expect("algebraic square");
    square_press(sq.row(), sq.col())
}

pub fn button_press(action: LifecycleAction) -> InputEvent {
    let (x, y) = layout::lifecycle_button(action).center();
    InputEvent::PointerPress { x, y }
}

pub fn menu_press(mode: Mode) -> InputEvent {
    let (x, y) = layout::menu_region(mode).center();
    InputEvent::PointerPress { x, y }
}

pub struct Harness {
    pub ctl: Controller,
    pub surface: RecordingSurface,
}

impl Harness {
    pub fn new(searcher: Arc<dyn MoveSearch>, background: bool) -> Self {
        Self::with_slot(searcher, background, Box::new(MemorySlot::new()))
    }

    pub fn with_slot(searcher: Arc<dyn MoveSearch>, background: bool, slot: Box<dyn SaveSlot>) -> Self {
        Harness {
            ctl: Controller::new(config(background), searcher, slot),
            surface: RecordingSurface::new(),
        }
    }

    pub fn start(&mut self, mode: Mode) {
        self.tick(&[menu_press(mode)]);
        assert_eq!(self.session().mode(), mode);
    }

    pub fn tick(&mut self, events: &[InputEvent]) -> Flow {
        self.ctl.tick(events, &mut self.surface).expect("tick")
    }

    pub fn session(&self) -> &Session {
        self.ctl.session().expect("a running session")
    }

    /// Ticks until nothing is animating or searching and it is a human turn
    /// (or the game is over).
    pub fn settle(&mut self) {
        let deadline = Instant::now() + Duration::from_secs(20);
        loop {
            let idle = self.ctl.phase() == Phase::InGame
                && self
                    .ctl
                    .session()
                    .is_some_and(|s| s.human_turn() || s.is_over());
            if idle {
                return;
            }
            assert!(Instant::now() < deadline, "session did not settle");
            if self.ctl.phase() == Phase::AwaitingAi {
                thread::sleep(Duration::from_millis(1));
            }
            self.tick(&[]);
        }
    }

    /// Plays a move by clicking its two squares, then settles.
    pub fn play(&mut self, from: &str, to: &str) {
        let before = self.session().game().ply_count();
        self.tick(&[press(from)]);
        self.tick(&[press(to)]);
        assert_eq!(self.session().game().ply_count(), before + 1, "{from}{to} was not applied");
        self.settle();
    }
}
