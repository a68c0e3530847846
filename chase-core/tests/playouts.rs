//! Randomized playouts checking board invariants and turn alternation.
//!
//! Every game is seeded, so a failure reproduces with the printed seed.

use chase_core::{
    Game, GameError, GamePhase, Label, PieceId, PieceKind, Player, Pos, Slot, BOARD_SIZE,
};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};

const GAMES: u64 = 200;
const MAX_PLIES: usize = 300;

const ALL_LABELS: [Label; 8] = [
    Label::Left,
    Label::Right,
    Label::Forward,
    Label::Back,
    Label::ForwardLeft,
    Label::ForwardRight,
    Label::BackLeft,
    Label::BackRight,
];

/// Fill both home rows in a random column order.
fn random_placement(rng: &mut StdRng) -> Game {
    let mut game = Game::new();
    for player in [Player::A, Player::B] {
        let mut cols: Vec<u8> = (0..BOARD_SIZE).collect();
        cols.shuffle(rng);
        for col in cols {
            game.place(player.home_row(), col).unwrap();
        }
    }
    game.begin_game().unwrap();
    game
}

#[test]
fn test_random_playouts_keep_invariants() {
    for seed in 0..GAMES {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut game = random_placement(&mut rng);

        for _ in 0..MAX_PLIES {
            if game.phase() == GamePhase::Ended {
                break;
            }
            let mover = game.current_player();
            let ids: Vec<_> = game
                .board()
                .pieces()
                .filter(|p| p.owner == mover)
                .map(|p| p.id)
                .collect();
            let id = *ids.choose(&mut rng).unwrap();
            let label = *ALL_LABELS.choose(&mut rng).unwrap();

            let before = game.board().clone();
            let legal = game.legal_moves(id).unwrap();
            let preview = legal.iter().find(|m| m.label == label).cloned();

            match game.move_piece(id, label) {
                Ok(outcome) => {
                    let preview = preview.expect("accepted move was not listed as legal");
                    assert_eq!(outcome.record.to, preview.to, "seed {seed}");
                    assert_eq!(outcome.record.captured, preview.captures, "seed {seed}");
                    for captured in &outcome.record.captured {
                        assert_ne!(captured.owner, mover, "seed {seed}: captured own piece");
                        assert!(!game.board().contains(*captured));
                    }
                    assert_eq!(
                        game.board().len() + outcome.record.captured.len(),
                        before.len(),
                        "seed {seed}"
                    );
                    if outcome.winner.is_none() {
                        assert_eq!(game.current_player(), mover.opponent(), "seed {seed}");
                    }
                }
                Err(err) => {
                    assert!(
                        matches!(
                            err,
                            GameError::IllegalDestination { .. } | GameError::LabelNotAllowed { .. }
                        ),
                        "seed {seed}: unexpected {err:?}"
                    );
                    assert!(preview.is_none(), "seed {seed}: listed move was rejected");
                    assert_eq!(game.board(), &before, "seed {seed}");
                    assert_eq!(game.current_player(), mover, "seed {seed}");
                }
            }

            assert!(game.board().is_consistent(), "seed {seed}");
            for piece in game.board().pieces() {
                assert!(piece.pos.row() < BOARD_SIZE && piece.pos.col() < BOARD_SIZE);
            }
        }

        if game.phase() == GamePhase::Ended {
            let winner = game.winner().unwrap();
            assert_eq!(game.board().count(winner.opponent()), 0, "seed {seed}");
            assert!(game.board().count(winner) > 0, "seed {seed}");
        }
    }
}

#[test]
fn test_every_listed_move_stays_on_board_and_off_own_pieces() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..100 {
        // Scatter a few pieces of each side on distinct random cells.
        let mut cells: Vec<Pos> = Pos::all().collect();
        cells.shuffle(&mut rng);
        let count = rng.random_range(2..=5);
        let mut pieces = Vec::new();
        for (i, owner) in [Player::A, Player::B].into_iter().enumerate() {
            for (j, slot) in Slot::ORDER.into_iter().take(count).enumerate() {
                pieces.push((PieceId::new(owner, slot), cells[i * 5 + j]));
            }
        }
        let game = Game::from_pieces(&pieces, Player::A).unwrap();

        for piece in game.board().pieces() {
            for m in game.legal_moves(piece.id).unwrap() {
                assert!(piece.kind.labels().contains(&m.label));
                assert_ne!(game.board().owner_at(m.to), Some(piece.owner));
                let dr = (m.to.row() as i8 - piece.pos.row() as i8).abs();
                let dc = (m.to.col() as i8 - piece.pos.col() as i8).abs();
                match piece.kind {
                    PieceKind::Pawn => assert_eq!(dr + dc, 1),
                    PieceKind::Hero1 => assert!(matches!((dr, dc), (2, 0) | (0, 2))),
                    PieceKind::Hero2 => assert_eq!((dr, dc), (2, 2)),
                }
            }
        }
    }
}
