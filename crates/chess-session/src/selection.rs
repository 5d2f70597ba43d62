//! Two-click move selection.
//!
//! The first click picks an origin, the second a destination. The pair is
//! only ever turned into a move by finding it in the legal move list, so a
//! returned move always carries the rule engine's full metadata.

use chess_core::{Move, Piece, Square};

/// What a click did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click was recorded; no pair is complete yet.
    Selected,
    /// The selection was dropped.
    Cleared,
    /// The pair matched this legal move.
    Moved(Move),
    /// The pair matched no legal move. Only `to` stays selected.
    Rejected { from: Square, to: Square },
}

impl ClickOutcome {
    pub fn into_move(self) -> Option<Move> {
        match self {
            ClickOutcome::Moved(mv) => Some(mv),
            _ => None,
        }
    }
}

/// Pending board clicks. Never more than two.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pending: Vec<Square>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[Square] {
        &self.pending
    }

    /// The most recently selected square, highlighted on screen.
    pub fn selected(&self) -> Option<Square> {
        self.pending.last().copied()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Handles a click on `target` (`None` for a click off the board).
    ///
    /// When `can_move` is false the click is only remembered as the current
    /// selection. A click pair that matches no legal move collapses to the
    /// second click, so it can start the next pair. Pawn moves reaching the
    /// last row promote to `promotion`.
    pub fn on_square_clicked(
        &mut self,
        target: Option<Square>,
        can_move: bool,
        legal_moves: &[Move],
        promotion: Piece,
    ) -> ClickOutcome {
        let sq = match target {
            Some(sq) if self.pending != [sq] => sq,
            _ => {
                self.pending.clear();
                return ClickOutcome::Cleared;
            }
        };

        if !can_move {
            self.pending.clear();
            self.pending.push(sq);
            return ClickOutcome::Selected;
        }

        self.pending.push(sq);
        if self.pending.len() < 2 {
            return ClickOutcome::Selected;
        }

        let (from, to) = (self.pending[0], self.pending[1]);
        self.pending.clear();
        match legal_moves.iter().find(|m| m.matches(from, to, Some(promotion))) {
            Some(&mv) => ClickOutcome::Moved(mv),
            None => {
                self.pending.push(to);
                ClickOutcome::Rejected { from, to }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::MoveFlag;
    use chess_engine::Game;
    use proptest::prelude::*;

    fn sq(name: &str) -> Option<Square> {
        Square::from_algebraic(name)
    }

    fn click(state: &mut SelectionState, game: &Game, target: Option<Square>) -> Option<Move> {
        state
            .on_square_clicked(target, true, &game.legal_moves(), Piece::Queen)
            .into_move()
    }

    #[test]
    fn two_clicks_make_a_move() {
        let game = Game::new();
        let mut state = SelectionState::new();

        assert_eq!(click(&mut state, &game, sq("e2")), None);
        assert_eq!(state.selected(), sq("e2"));

        let mv = click(&mut state, &game, sq("e4")).unwrap();
        assert_eq!(mv.flag, MoveFlag::DoublePush);
        assert!(game.legal_moves().contains(&mv));
        assert!(state.pending().is_empty());
    }

    #[test]
    fn same_square_twice_deselects() {
        let game = Game::new();
        let mut state = SelectionState::new();
        click(&mut state, &game, sq("g1"));
        assert_eq!(click(&mut state, &game, sq("g1")), None);
        assert!(state.pending().is_empty());
    }

    #[test]
    fn off_board_deselects() {
        let game = Game::new();
        let mut state = SelectionState::new();
        click(&mut state, &game, sq("g1"));
        assert_eq!(click(&mut state, &game, None), None);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn failed_pair_keeps_second_click() {
        let game = Game::new();
        let moves = game.legal_moves();
        let mut state = SelectionState::new();
        click(&mut state, &game, sq("e2"));
        assert_eq!(
            state.on_square_clicked(sq("e5"), true, &moves, Piece::Queen),
            ClickOutcome::Rejected {
                from: Square::from_algebraic("e2").unwrap(),
                to: Square::from_algebraic("e5").unwrap(),
            }
        );
        assert_eq!(state.pending(), &[Square::from_algebraic("e5").unwrap()]);

        // The kept click can start the next pair right away.
        let mut state = SelectionState::new();
        click(&mut state, &game, sq("a1"));
        click(&mut state, &game, sq("g1"));
        let mv = click(&mut state, &game, sq("f3")).unwrap();
        assert_eq!(mv.to_uci(), "g1f3");
    }

    #[test]
    fn clicks_out_of_turn_only_select() {
        let game = Game::new();
        let moves = game.legal_moves();
        let mut state = SelectionState::new();
        assert_eq!(state.on_square_clicked(sq("e2"), false, &moves, Piece::Queen), ClickOutcome::Selected);
        assert_eq!(state.on_square_clicked(sq("e4"), false, &moves, Piece::Queen), ClickOutcome::Selected);
        assert_eq!(state.pending(), &[Square::from_algebraic("e4").unwrap()]);
    }

    #[test]
    fn promotion_uses_the_chosen_piece() {
        let game = Game::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut state = SelectionState::new();
        state.on_square_clicked(sq("a7"), true, &game.legal_moves(), Piece::Knight);
        let mv = state
            .on_square_clicked(sq("a8"), true, &game.legal_moves(), Piece::Knight)
            .into_move()
            .unwrap();
        assert_eq!(mv.flag, MoveFlag::Promote(Piece::Knight));
    }

    fn arbitrary_click() -> impl Strategy<Value = Option<Square>> {
        prop_oneof![
            9 => (0u8..8, 0u8..8).prop_map(|(r, c)| Square::new(r, c)),
            1 => Just(None),
        ]
    }

    proptest! {
        #[test]
        fn only_legal_moves_come_out(
            opening in proptest::collection::vec(0usize..64, 0..12),
            clicks in proptest::collection::vec(arbitrary_click(), 0..40),
        ) {
            let mut game = Game::new();
            for choice in opening {
                let moves = game.legal_moves();
                if moves.is_empty() {
                    break;
                }
                game.make_move(moves[choice % moves.len()]).unwrap();
            }

            let mut state = SelectionState::new();
            for target in clicks {
                let legal = game.legal_moves();
                if let ClickOutcome::Moved(mv) = state.on_square_clicked(target, true, &legal, Piece::Queen) {
                    prop_assert_eq!(legal.iter().filter(|&&m| m == mv).count(), 1);
                    game.make_move(mv).unwrap();
                }
                prop_assert!(state.pending().len() <= 2);
            }
        }
    }
}
