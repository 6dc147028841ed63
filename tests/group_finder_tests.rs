//! Group finder tests - flood fill over same-colored neighbors

use zoo_pop::core::{find_group, Board};
use zoo_pop::types::{Color, Special};

fn sorted(mut cells: Vec<(i8, i8)>) -> Vec<(i8, i8)> {
    cells.sort();
    cells
}

#[test]
fn test_group_is_exact_uniform_region() {
    let board = Board::from_rows(&[
        "RRGB", //
        "RGGB", //
        "YRGB", //
        "YRRR", //
    ])
    .unwrap();

    let group = find_group(&board, 0, 0).unwrap();
    assert_eq!(group.color(), Color::Red);
    assert_eq!(sorted(group.cells().to_vec()), vec![(0, 0), (0, 1), (1, 0)]);

    let group = find_group(&board, 1, 3).unwrap();
    assert_eq!(
        sorted(group.cells().to_vec()),
        vec![(1, 2), (1, 3), (2, 3), (3, 3)]
    );
    assert!(group.contains(3, 3));
    assert!(!group.contains(0, 0));
}

#[test]
fn test_diagonals_do_not_connect() {
    let board = Board::from_rows(&["RB", "BR"]).unwrap();
    let group = find_group(&board, 0, 0).unwrap();
    assert_eq!(group.len(), 1);
    assert!(!group.is_poppable());
}

#[test]
fn test_specials_join_groups_by_color() {
    let mut board = Board::from_rows(&["GG", "BB"]).unwrap();
    board.set_tile(1, 0, Color::Green, Special::Rocket);

    let group = find_group(&board, 0, 0).unwrap();
    assert_eq!(group.len(), 2);
}

#[test]
fn test_whole_board_single_color() {
    let rows = ["PPPPP"; 5];
    let board = Board::from_rows(&rows).unwrap();
    let group = find_group(&board, 2, 2).unwrap();
    assert_eq!(group.len(), 25);
    assert!(group.is_poppable());
}

#[test]
fn test_no_group_outside_or_on_empty() {
    let board = Board::from_rows(&["R.", "RR"]).unwrap();
    assert!(find_group(&board, -1, 0).is_none());
    assert!(find_group(&board, 2, 0).is_none());
    assert!(find_group(&board, 1, 0).is_none());
    assert_eq!(find_group(&board, 1, 1).map(|g| g.len()), Some(3));
}

#[test]
fn test_every_cell_of_a_group_finds_the_same_group() {
    let board = Board::from_rows(&["YYO", "OYO", "OYY"]).unwrap();
    let reference = sorted(find_group(&board, 0, 0).unwrap().cells().to_vec());
    assert_eq!(reference.len(), 5);
    for &(x, y) in &reference {
        let again = sorted(find_group(&board, x, y).unwrap().cells().to_vec());
        assert_eq!(again, reference);
    }
}
