//! Resolution tests - pops, special creation and blasts through GameState

use zoo_pop::core::{
    Board, GameEvent, GameState, Goal, Goals, RulesConfig, ScriptedSource, TapOutcome,
};
use zoo_pop::types::{Color, RocketAxis, Special};

/// A scripted, instant-settle game on a fixture board. Goals are parked on
/// colors the fixtures never use so no level ends by accident.
fn game_on(rows: &[&str], script: &[usize]) -> GameState<ScriptedSource> {
    let mut game = GameState::with_rng(RulesConfig::instant(), ScriptedSource::default());
    game.load_board(Board::from_rows(rows).unwrap());
    game.set_goals(Goals::new(
        Goal::new(Color::Purple, 100),
        Goal::new(Color::Orange, 100),
    ));
    for &v in script {
        game.rng_mut().push(v);
    }
    game.drain_events().for_each(drop);
    game
}

/// Column 0 is one color; the rest is a blue/green checkerboard with no
/// groups of two.
fn column_fixture(width: usize) -> Vec<String> {
    (0..width)
        .map(|y| {
            let mut row = String::from("R");
            for x in 1..width {
                row.push(if (x + y) % 2 == 0 { 'B' } else { 'G' });
            }
            row
        })
        .collect()
}

fn rows(owned: &[String]) -> Vec<&str> {
    owned.iter().map(String::as_str).collect()
}

#[test]
fn test_single_tile_tap_costs_nothing() {
    let mut game = game_on(&["RB", "GY"], &[]);
    let before = game.snapshot();

    assert_eq!(game.tap(0, 0), TapOutcome::TooSmall { size: 1 });

    let after = game.snapshot();
    assert_eq!(after.cells, before.cells);
    assert_eq!(after.score, before.score);
    assert_eq!(after.moves_remaining, before.moves_remaining);
    let events: Vec<_> = game.drain_events().collect();
    assert_eq!(events, vec![GameEvent::TooSmall { x: 0, y: 0 }]);
    assert_eq!(events[0].message().as_deref(), Some("Need 2+ to pop"));
}

#[test]
fn test_pop_of_six_creates_rocket_in_anchor_column() {
    let fixture = column_fixture(6);
    let mut game = game_on(&rows(&fixture), &[]);

    let outcome = game.tap(0, 2);

    assert_eq!(
        outcome,
        TapOutcome::Popped {
            size: 6,
            special: Special::Rocket
        }
    );
    assert_eq!(game.score(), 36);
    assert_eq!(game.moves_remaining(), 29);
    assert!(game.board().is_full());
    // The whole column was the group, so the rocket lands at its bottom.
    assert_eq!(game.board().specials(), vec![((0, 5), Special::Rocket)]);

    let events: Vec<_> = game.drain_events().collect();
    assert!(events.contains(&GameEvent::Popped {
        color: Color::Red,
        size: 6,
        score: 36
    }));
    assert!(events.contains(&GameEvent::SpecialCreated {
        special: Special::Rocket,
        x: 0,
        y: 5
    }));
}

#[test]
fn test_pop_of_eight_creates_bomb() {
    let fixture = column_fixture(8);
    let mut game = game_on(&rows(&fixture), &[]);

    let outcome = game.tap(0, 0);

    assert_eq!(
        outcome,
        TapOutcome::Popped {
            size: 8,
            special: Special::Bomb
        }
    );
    assert_eq!(game.score(), 64);
    assert_eq!(game.board().specials(), vec![((0, 7), Special::Bomb)]);
}

#[test]
fn test_small_pop_creates_nothing() {
    let mut game = game_on(&["RRB", "GBY", "YGP"], &[]);
    assert_eq!(
        game.tap(1, 0),
        TapOutcome::Popped {
            size: 2,
            special: Special::None
        }
    );
    assert!(game.board().specials().is_empty());
}

#[test]
fn test_special_anchor_uses_picked_column() {
    // Flood fill from (0, 0) discovers the top row left to right, so the
    // scripted pick of 4 anchors the rocket on column 4.
    let mut game = game_on(&["RRRRR", "BGBGB", "GBGBG", "BGBGB", "GBGBG"], &[4]);

    let outcome = game.tap(0, 0);

    assert_eq!(
        outcome,
        TapOutcome::Popped {
            size: 5,
            special: Special::Rocket
        }
    );
    assert_eq!(game.board().specials(), vec![((4, 4), Special::Rocket)]);
}

#[test]
fn test_rocket_row_blast() {
    let mut game = game_on(&["RGBY", "GBYR", "BYRG", "YRGB"], &[1]);
    game.load_board({
        let mut b = Board::from_rows(&["RGBY", "GBYR", "BYRG", "YRGB"]).unwrap();
        b.set_tile(1, 2, Color::Yellow, Special::Rocket);
        b
    });

    let outcome = game.tap(1, 2);

    assert_eq!(
        outcome,
        TapOutcome::Triggered {
            special: Special::Rocket,
            cleared: 4
        }
    );
    assert_eq!(game.score(), 12);
    assert_eq!(game.moves_remaining(), 29);
    assert!(game.board().is_full());
    let events: Vec<_> = game.drain_events().collect();
    assert!(events.contains(&GameEvent::Blasted {
        special: Special::Rocket,
        axis: Some(RocketAxis::Row),
        cleared: 4,
        score: 12
    }));
}

#[test]
fn test_rocket_column_blast() {
    let mut game = game_on(&["RGB", "GBY", "BYR"], &[0]);
    game.load_board({
        let mut b = Board::from_rows(&["RGB", "GBY", "BYR"]).unwrap();
        b.set_tile(2, 0, Color::Blue, Special::Rocket);
        b
    });

    let outcome = game.tap(2, 0);
    assert_eq!(
        outcome,
        TapOutcome::Triggered {
            special: Special::Rocket,
            cleared: 3
        }
    );
    assert_eq!(game.score(), 9);
}

#[test]
fn test_corner_bomb_clears_only_in_bounds_cells() {
    let mut game = game_on(&["RGBY", "GBYR", "BYRG", "YRGB"], &[]);
    game.load_board({
        let mut b = Board::from_rows(&["RGBY", "GBYR", "BYRG", "YRGB"]).unwrap();
        b.set_tile(0, 0, Color::Red, Special::Bomb);
        b
    });

    let outcome = game.tap(0, 0);

    assert_eq!(
        outcome,
        TapOutcome::Triggered {
            special: Special::Bomb,
            cleared: 4
        }
    );
    assert_eq!(game.score(), 12);
    assert!(game.board().is_full());
}

#[test]
fn test_blast_does_not_chain_into_specials() {
    let mut game = game_on(&["RGB", "GBY", "BYR"], &[1]);
    game.load_board({
        let mut b = Board::from_rows(&["RGB", "GBY", "BYR"]).unwrap();
        b.set_tile(0, 1, Color::Green, Special::Rocket);
        b.set_tile(2, 1, Color::Yellow, Special::Bomb);
        b
    });

    // Row blast through the bomb: only the row goes.
    let outcome = game.tap(0, 1);
    assert_eq!(
        outcome,
        TapOutcome::Triggered {
            special: Special::Rocket,
            cleared: 3
        }
    );
    assert_eq!(game.score(), 9);
    assert!(game.board().specials().is_empty());
}

#[test]
fn test_blast_credits_goals() {
    let mut game = game_on(&["GGG", "GBG", "GGG"], &[]);
    game.load_board({
        let mut b = Board::from_rows(&["GGG", "GBG", "GGG"]).unwrap();
        b.set_tile(1, 1, Color::Blue, Special::Bomb);
        b
    });
    game.set_goals(Goals::new(
        Goal::new(Color::Green, 100),
        Goal::new(Color::Blue, 100),
    ));

    game.tap(1, 1);

    assert_eq!(game.goals().a.have, 8);
    assert_eq!(game.goals().b.have, 1);
    assert_eq!(game.score(), 27);
}

#[test]
fn test_pop_credits_matching_goal_only() {
    let mut game = game_on(&["PPB", "GBY", "YGR"], &[]);
    game.tap(0, 0);
    assert_eq!(game.goals().a.have, 2);
    assert_eq!(game.goals().b.have, 0);
}
