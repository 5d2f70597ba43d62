//! Frame rendering.
//!
//! The renderer only reads session state. Everything it needs besides the
//! session (colours, sprite table, font sizes) lives in a [`RenderContext`]
//! built once at startup.

use crate::layout::{self, Rect, BOARD_SIZE, PANEL_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::lifecycle::LifecycleAction;
use crate::menu::Mode;
use crate::session::Session;
use chess_core::{Color, ColoredPiece, Move, Piece, Square};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reported by a draw surface. Always terminal.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The sprite was never registered with the render context.
    #[error("unknown sprite: {0}")]
    UnknownSprite(String),
    /// The backend failed to draw or present.
    #[error("draw surface failed: {0}")]
    Surface(String),
}

/// An RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const WHITE: Rgba = Rgba(255, 255, 255, 255);
    pub const GRAY: Rgba = Rgba(190, 190, 190, 255);
    pub const BLACK: Rgba = Rgba(0, 0, 0, 255);
    pub const SHADE: Rgba = Rgba(0, 0, 0, 128);
    pub const BUTTON: Rgba = Rgba(255, 255, 255, 25);
    pub const LAST_MOVE: Rgba = Rgba(0, 255, 0, 100);
    pub const SELECTED: Rgba = Rgba(0, 0, 255, 100);
    pub const DESTINATION: Rgba = Rgba(255, 255, 0, 100);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// How a piece of text is drawn. `(x, y)` is the top edge at the aligned
/// horizontal anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub size: u16,
    pub bold: bool,
    pub color: Rgba,
    pub align: Align,
}

impl TextStyle {
    pub const fn new(size: u16, color: Rgba) -> Self {
        TextStyle {
            size,
            bold: false,
            color,
            align: Align::Left,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// A drawing backend.
pub trait DrawSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> Result<(), RenderError>;

    /// Draws a registered sprite scaled to `rect`.
    fn blit(&mut self, sprite: &str, rect: Rect) -> Result<(), RenderError>;

    fn draw_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle) -> Result<(), RenderError>;

    /// Shows the frame drawn since the last call.
    fn present(&mut self) -> Result<(), RenderError>;
}

/// Read-only rendering resources.
#[derive(Debug, Clone)]
pub struct RenderContext {
    sprites: HashMap<String, PathBuf>,
    pub light: Rgba,
    pub dark: Rgba,
    pub log_font: u16,
    pub banner_font: u16,
}

impl RenderContext {
    pub const BACKGROUND: &'static str = "background";

    /// Registers the twelve piece sprites and the menu background found in
    /// `asset_dir`. Files are not opened here.
    pub fn new(asset_dir: impl AsRef<Path>) -> Self {
        let dir = asset_dir.as_ref();
        let mut sprites = HashMap::new();
        for color in Color::BOTH {
            for kind in Piece::ALL {
                let key = ColoredPiece::new(color, kind).sprite_key();
                sprites.insert(key.clone(), dir.join(format!("{key}.png")));
            }
        }
        sprites.insert(Self::BACKGROUND.to_string(), dir.join("background.png"));

        RenderContext {
            sprites,
            light: Rgba::WHITE,
            dark: Rgba::GRAY,
            log_font: 14,
            banner_font: 32,
        }
    }

    /// Path of a registered sprite.
    pub fn sprite_path(&self, key: &str) -> Option<&Path> {
        self.sprites.get(key).map(PathBuf::as_path)
    }

    fn sprite<'a>(&self, key: &'a str) -> Result<&'a str, RenderError> {
        if self.sprites.contains_key(key) {
            Ok(key)
        } else {
            Err(RenderError::UnknownSprite(key.to_string()))
        }
    }

    fn square_color(&self, sq: Square) -> Rgba {
        if sq.is_light() {
            self.light
        } else {
            self.dark
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new("images")
    }
}

/// Move log lines: "1. e4 e5  " entries, three to a line.
pub fn move_log_lines(moves: &[Move]) -> Vec<String> {
    let entries: Vec<String> = moves
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| match pair {
            [white, black] => format!("{}. {} {}  ", i + 1, white, black),
            [white] => format!("{}. {} ", i + 1, white),
            _ => String::new(),
        })
        .collect();
    entries.chunks(3).map(|line| line.concat()).collect()
}

/// Greedy word wrap. Words longer than `columns` get a line of their own.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        match lines.last_mut() {
            Some(line) if line.len() + 1 + word.len() <= columns => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_string()),
        }
    }
    lines
}

/// Draws menu and session frames.
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    ctx: RenderContext,
}

impl FrameRenderer {
    const LOG_PADDING: i32 = 5;
    const LOG_LINE_SPACING: i32 = 2;

    pub fn new(ctx: RenderContext) -> Self {
        FrameRenderer { ctx }
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Draws the mode menu.
    pub fn draw_menu(&self, surface: &mut dyn DrawSurface) -> Result<(), RenderError> {
        let window = Rect::new(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT);
        surface.fill_rect(window, Rgba::BLACK)?;
        surface.blit(self.ctx.sprite(RenderContext::BACKGROUND)?, window)?;

        let title = TextStyle::new(80, Rgba::WHITE).bold().aligned(Align::Center);
        surface.draw_text("CHESS GAME", WINDOW_WIDTH / 2, WINDOW_HEIGHT / 4 - 40, title)?;

        let entry = TextStyle::new(32, Rgba::WHITE).bold().aligned(Align::Center);
        for mode in Mode::ALL {
            let region = layout::menu_region(mode);
            surface.fill_rect(region, Rgba::SHADE)?;
            let (cx, _) = region.center();
            surface.draw_text(mode.label(), cx, region.y + 5, entry)?;
        }
        Ok(())
    }

    /// Draws one in-game frame.
    pub fn draw_session(&self, surface: &mut dyn DrawSurface, session: &Session) -> Result<(), RenderError> {
        self.draw_board(surface)?;
        match session.animation() {
            Some(_) => self.draw_animated_pieces(surface, session)?,
            None => {
                self.draw_highlights(surface, session)?;
                self.draw_pieces(surface, session, None)?;
            }
        }

        if !session.is_over() {
            self.draw_move_log(surface, session.game().move_log())?;
        }
        self.draw_buttons(surface)?;
        if let Some(status) = session.status() {
            self.draw_status(surface, status)?;
        }
        if let Some(text) = session.outcome_text() {
            self.draw_banner(surface, &text)?;
        }
        Ok(())
    }

    fn draw_board(&self, surface: &mut dyn DrawSurface) -> Result<(), RenderError> {
        for sq in Square::all() {
            surface.fill_rect(layout::square_rect(sq), self.ctx.square_color(sq))?;
        }
        Ok(())
    }

    fn draw_highlights(&self, surface: &mut dyn DrawSurface, session: &Session) -> Result<(), RenderError> {
        if let Some(last) = session.game().last_move() {
            surface.fill_rect(layout::square_rect(last.to), Rgba::LAST_MOVE)?;
        }

        let Some(selected) = session.selection().selected() else {
            return Ok(());
        };
        let own_piece = session
            .position()
            .piece_at(selected)
            .is_some_and(|piece| piece.color == session.position().side_to_move);
        if !own_piece {
            return Ok(());
        }

        surface.fill_rect(layout::square_rect(selected), Rgba::SELECTED)?;
        for mv in session.legal_moves().iter().filter(|m| m.from == selected) {
            surface.fill_rect(layout::square_rect(mv.to), Rgba::DESTINATION)?;
        }
        Ok(())
    }

    fn draw_pieces(
        &self,
        surface: &mut dyn DrawSurface,
        session: &Session,
        skip: Option<Square>,
    ) -> Result<(), RenderError> {
        for (sq, piece) in session.position().pieces() {
            if Some(sq) == skip {
                continue;
            }
            surface.blit(self.ctx.sprite(&piece.sprite_key())?, layout::square_rect(sq))?;
        }
        Ok(())
    }

    fn draw_animated_pieces(&self, surface: &mut dyn DrawSurface, session: &Session) -> Result<(), RenderError> {
        let Some(task) = session.animation() else {
            return Ok(());
        };

        // The board already shows the move; hide the mover on its destination.
        self.draw_pieces(surface, session, Some(task.dest()))?;
        surface.fill_rect(task.dest_rect(), self.ctx.square_color(task.dest()))?;

        if let Some((victim, square)) = task.captured() {
            surface.blit(self.ctx.sprite(&victim.sprite_key())?, layout::square_rect(square))?;
        }

        // A promoted pawn travels as a pawn.
        let mover = task.mv().piece;
        surface.blit(self.ctx.sprite(&mover.sprite_key())?, task.piece_rect())
    }

    fn draw_move_log(&self, surface: &mut dyn DrawSurface, moves: &[Move]) -> Result<(), RenderError> {
        surface.fill_rect(layout::panel_rect(), Rgba::BLACK)?;
        let style = TextStyle::new(self.ctx.log_font, Rgba::WHITE);
        let mut y = Self::LOG_PADDING;
        for line in move_log_lines(moves) {
            surface.draw_text(&line, BOARD_SIZE + Self::LOG_PADDING, y, style)?;
            y += self.ctx.log_font as i32 + Self::LOG_LINE_SPACING;
        }
        Ok(())
    }

    fn draw_buttons(&self, surface: &mut dyn DrawSurface) -> Result<(), RenderError> {
        let style = TextStyle::new(18, Rgba::WHITE).bold().aligned(Align::Right);
        for action in LifecycleAction::BUTTON_ORDER {
            let rect = layout::lifecycle_button(action);
            surface.fill_rect(rect, Rgba::BUTTON)?;
            surface.draw_text(action.label(), rect.x + rect.w - 5, rect.y + 3, style)?;
        }
        Ok(())
    }

    /// Status text, wrapped to the panel and ending above the buttons.
    fn draw_status(&self, surface: &mut dyn DrawSurface, status: &str) -> Result<(), RenderError> {
        let style = TextStyle::new(self.ctx.log_font, Rgba::WHITE);
        let line_height = self.ctx.log_font as i32 + Self::LOG_LINE_SPACING;
        let columns = (PANEL_WIDTH - 2 * Self::LOG_PADDING) as usize / (self.ctx.log_font as usize / 2).max(1);
        let lines = wrap_text(status, columns);

        let mut y = layout::status_bottom() - line_height * lines.len() as i32;
        for line in &lines {
            surface.draw_text(line, BOARD_SIZE + Self::LOG_PADDING, y, style)?;
            y += line_height;
        }
        Ok(())
    }

    fn draw_banner(&self, surface: &mut dyn DrawSurface, text: &str) -> Result<(), RenderError> {
        let (cx, cy) = layout::board_rect().center();
        let y = cy - self.ctx.banner_font as i32 / 2;
        let style = TextStyle::new(self.ctx.banner_font, Rgba::GRAY).bold().aligned(Align::Center);
        surface.draw_text(text, cx, y, style)?;
        surface.draw_text(text, cx + 2, y + 2, TextStyle { color: Rgba::BLACK, ..style })
    }
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    Fill { rect: Rect, color: Rgba },
    Blit { sprite: String, rect: Rect },
    Text { text: String, x: i32, y: i32, style: TextStyle },
}

/// A surface that records draw calls instead of drawing.
///
/// Only the last presented frame is kept.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    current: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Text drawn in the last frame, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.last_frame
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Sprites blitted in the last frame, with their rectangles.
    pub fn blits(&self) -> Vec<(&str, Rect)> {
        self.last_frame
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Blit { sprite, rect } => Some((sprite.as_str(), *rect)),
                _ => None,
            })
            .collect()
    }

    /// Rectangles filled with `color` in the last frame.
    pub fn fills_with(&self, color: Rgba) -> Vec<Rect> {
        self.last_frame
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Fill { rect, color: c } if *c == color => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> Result<(), RenderError> {
        self.current.push(DrawCommand::Fill { rect, color });
        Ok(())
    }

    fn blit(&mut self, sprite: &str, rect: Rect) -> Result<(), RenderError> {
        self.current.push(DrawCommand::Blit {
            sprite: sprite.to_string(),
            rect,
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle) -> Result<(), RenderError> {
        self.current.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            style,
        });
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.last_frame = std::mem::take(&mut self.current);
        self.frames += 1;
        Ok(())
    }
}
