//! Window geometry shared by hit-testing and drawing.
//!
//! The window is the board on the left and the move-log panel on the right.
//! Both the menu and the lifecycle buttons use fixed rectangles so that a
//! click is tested against exactly what was drawn.

use crate::lifecycle::LifecycleAction;
use crate::menu::Mode;
use chess_core::{Square, BOARD_DIMENSION};

pub const BOARD_SIZE: i32 = 512;
pub const SQUARE_SIZE: i32 = BOARD_SIZE / BOARD_DIMENSION as i32;
pub const PANEL_WIDTH: i32 = 250;
pub const WINDOW_WIDTH: i32 = BOARD_SIZE + PANEL_WIDTH;
pub const WINDOW_HEIGHT: i32 = BOARD_SIZE;

const MENU_BUTTON_WIDTH: i32 = 220;
const MENU_BUTTON_HEIGHT: i32 = 44;

const LIFECYCLE_BUTTON_WIDTH: i32 = 80;
const LIFECYCLE_BUTTON_HEIGHT: i32 = 24;
const LIFECYCLE_BUTTON_GAP: i32 = 5;
const LIFECYCLE_MARGIN: i32 = 10;

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// Returns true if the point lies inside, edges included on the top-left.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }
}

/// Board square under a pointer, `None` outside the 8x8 board.
pub fn square_at(x: i32, y: i32) -> Option<Square> {
    if x < 0 || y < 0 {
        return None;
    }
    Square::from_coords(y / SQUARE_SIZE, x / SQUARE_SIZE)
}

/// Pixel rectangle of a board square.
pub fn square_rect(sq: Square) -> Rect {
    Rect::new(
        sq.col() as i32 * SQUARE_SIZE,
        sq.row() as i32 * SQUARE_SIZE,
        SQUARE_SIZE,
        SQUARE_SIZE,
    )
}

/// Rectangle of the full board.
pub fn board_rect() -> Rect {
    Rect::new(0, 0, BOARD_SIZE, BOARD_SIZE)
}

/// Rectangle of the move-log panel.
pub fn panel_rect() -> Rect {
    Rect::new(BOARD_SIZE, 0, PANEL_WIDTH, WINDOW_HEIGHT)
}

/// Clickable region of a menu entry. The three entries never overlap.
pub fn menu_region(mode: Mode) -> Rect {
    let x = WINDOW_WIDTH / 2 - MENU_BUTTON_WIDTH / 2;
    let y = match mode {
        Mode::Single => WINDOW_HEIGHT / 2 - MENU_BUTTON_HEIGHT / 2,
        Mode::Multiplayer => WINDOW_HEIGHT / 2 + MENU_BUTTON_HEIGHT / 2 + 10,
        Mode::BotVsBot => WINDOW_HEIGHT / 2 + MENU_BUTTON_HEIGHT * 3 / 2 + 40,
    };
    Rect::new(x, y, MENU_BUTTON_WIDTH, MENU_BUTTON_HEIGHT)
}

/// Menu entry under a pointer.
pub fn menu_hit(x: i32, y: i32) -> Option<Mode> {
    Mode::ALL
        .into_iter()
        .find(|&mode| menu_region(mode).contains(x, y))
}

/// Lifecycle buttons, stacked upwards from the bottom-right corner in
/// [`LifecycleAction::BUTTON_ORDER`].
pub fn lifecycle_button(action: LifecycleAction) -> Rect {
    let slot = LifecycleAction::BUTTON_ORDER
        .iter()
        .position(|&a| a == action)
        .unwrap_or(0) as i32;
    let bottom = WINDOW_HEIGHT - LIFECYCLE_MARGIN - slot * (LIFECYCLE_BUTTON_HEIGHT + LIFECYCLE_BUTTON_GAP);
    Rect::new(
        WINDOW_WIDTH - LIFECYCLE_MARGIN - LIFECYCLE_BUTTON_WIDTH,
        bottom - LIFECYCLE_BUTTON_HEIGHT,
        LIFECYCLE_BUTTON_WIDTH,
        LIFECYCLE_BUTTON_HEIGHT,
    )
}

/// Lowest y the status line may reach: just above the button stack.
pub fn status_bottom() -> i32 {
    LifecycleAction::BUTTON_ORDER
        .into_iter()
        .map(|action| lifecycle_button(action).y)
        .min()
        .unwrap_or(WINDOW_HEIGHT)
        - LIFECYCLE_BUTTON_GAP
}

/// Lifecycle button under a pointer.
pub fn lifecycle_hit(x: i32, y: i32) -> Option<LifecycleAction> {
    LifecycleAction::BUTTON_ORDER
        .into_iter()
        .find(|&action| lifecycle_button(action).contains(x, y))
}
