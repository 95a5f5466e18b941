use maxout_core::{Board, Piece, Position};
use maxout_engine::{fit_maps, move_search, Level, MoveSearch, PossibleMoves, TAP_30HZ};

/// An adjustment frame past the last level-18 frame: every lock commits up
/// front and the redirect sets stay empty.
const NO_ADJUST: u32 = 61;

fn positions(list: &[(u8, u8, u8)]) -> Vec<Position> {
    let mut out: Vec<Position> = list
        .iter()
        .map(|&(rot, row, col)| Position::new(rot, row, col))
        .collect();
    out.sort();
    out
}

fn search(board: &Board, piece: Piece, level: Level, adj_frame: u32) -> PossibleMoves {
    let mut moves = move_search(board, piece, level, adj_frame, &TAP_30HZ);
    moves.normalize(true);
    moves
}

/// Every resting place the J piece has on an empty board: the side columns
/// are excluded per orientation by the cells hanging off the position, and
/// only the orientation with no cell below its row reaches row 19.
fn empty_board_j_locks() -> Vec<Position> {
    let mut expected = Vec::new();
    for col in 1..=8 {
        expected.push((0, 18, col));
        expected.push((2, 19, col));
    }
    for col in 1..=9 {
        expected.push((1, 18, col));
    }
    for col in 0..=8 {
        expected.push((3, 18, col));
    }
    positions(&expected)
}

#[test]
fn empty_board_all_columns_reachable() {
    let moves = search(&Board::new(), Piece::J, Level::Level18, NO_ADJUST);
    assert_eq!(moves.non_adj, empty_board_j_locks());
    assert!(moves.adj.is_empty());
}

#[test]
fn adjustment_at_spawn_moves_everything_into_redirect_sets() {
    let moves = search(&Board::new(), Piece::J, Level::Level18, 0);
    // with the commit point on frame 0, no lock survives the deadline
    assert!(moves.non_adj.is_empty());
    // one redirect set per reachable spawn-table state: 40 minus the six
    // (rot, col) pairs whose cells hang off the board
    assert_eq!(moves.adj.len(), 34);
    let spawn_state = moves
        .adj
        .iter()
        .find(|(state, _)| *state == Position::SPAWN)
        .expect("spawn state must be redirectable");
    // redirecting from spawn at frame 0 reaches everything
    assert_eq!(spawn_state.1, empty_board_j_locks());
    for (state, set) in &moves.adj {
        assert!((state.rot as usize) < Piece::J.rotations());
        assert!(!set.is_empty());
    }
}

#[test]
fn filled_corner_cell_raises_nearby_locks() {
    let mut board = Board::new();
    board.set(19, 0, true);
    let moves = search(&board, Piece::J, Level::Level18, NO_ADJUST);
    let mut expected: Vec<Position> = empty_board_j_locks()
        .into_iter()
        .filter(|p| {
            *p != Position::new(3, 18, 0)
                && *p != Position::new(2, 19, 1)
                && *p != Position::new(1, 18, 1)
        })
        .collect();
    expected.extend([
        Position::new(3, 17, 0),
        Position::new(2, 18, 1),
        Position::new(1, 17, 1),
    ]);
    expected.sort();
    assert_eq!(moves.non_adj, expected);
}

#[test]
fn filled_column_blocks_deep_locks() {
    let mut board = Board::new();
    for row in 10..20 {
        board.set(row, 9, true);
    }
    let moves = search(&board, Piece::J, Level::Level18, NO_ADJUST);
    // nothing rests deeper than the garbage surface in the last column
    assert!(moves.non_adj.iter().all(|p| p.col != 9 || p.row <= 8));
    let mut expected: Vec<Position> = empty_board_j_locks()
        .into_iter()
        .filter(|p| {
            *p != Position::new(1, 18, 9)
                && *p != Position::new(0, 18, 8)
                && *p != Position::new(2, 19, 8)
                && *p != Position::new(3, 18, 8)
        })
        .collect();
    expected.extend([
        Position::new(1, 8, 9),
        Position::new(0, 8, 8),
        Position::new(2, 9, 8),
        Position::new(3, 10, 8),
    ]);
    expected.sort();
    assert_eq!(moves.non_adj, expected);
}

#[test]
fn shift_tuck_reaches_pocket_under_overhang() {
    // a lone block on column 0 leaves a three-row pocket beneath it that
    // the O can only enter by shifting left during the fall
    let mut board = Board::new();
    board.set(15, 0, true);
    let moves = search(&board, Piece::O, Level::Level18, NO_ADJUST);
    let mut expected = vec![(0, 13, 1), (0, 18, 1)];
    for col in 2..=9 {
        expected.push((0, 18, col));
    }
    assert_eq!(moves.non_adj, positions(&expected));
}

#[test]
fn rotation_tuck_reaches_notch_in_shaft() {
    // a two-wide shaft down columns 4-5 with a notch carved at (18, 3):
    // the T falls nub-right, then a late B rotation swings the nub into
    // the notch
    let mut rows = vec!["..........".to_string(); 14];
    rows.push("####..####".to_string());
    rows.push("####..####".to_string());
    rows.push("####..####".to_string());
    rows.push("####..####".to_string());
    rows.push("###...####".to_string());
    rows.push("####..####".to_string());
    let board = Board::from_rows(&rows.iter().map(String::as_str).collect::<Vec<_>>());

    let moves = search(&board, Piece::T, Level::Level18, NO_ADJUST);
    // straight fall in the shaft
    assert!(moves.non_adj.contains(&Position::new(3, 18, 4)));
    // the fall in the notch orientation stops on the garbage surface
    assert!(moves.non_adj.contains(&Position::new(2, 13, 4)));
    // the spin lock in the notch
    assert!(moves.non_adj.contains(&Position::new(2, 18, 4)));

    // seal the notch: the spin lock disappears, the rest stays
    let mut sealed = board;
    sealed.set(18, 3, true);
    let moves = search(&sealed, Piece::T, Level::Level18, NO_ADJUST);
    assert!(moves.non_adj.contains(&Position::new(3, 18, 4)));
    assert!(moves.non_adj.contains(&Position::new(2, 13, 4)));
    assert!(!moves.non_adj.contains(&Position::new(2, 18, 4)));
}

#[test]
fn level_39_outruns_the_adjustment_window() {
    // the board lasts ten frames at level 39; an adjustment offered on the
    // last frame can never beat a lock
    let moves = search(&Board::new(), Piece::J, Level::Level39, 10);
    assert_eq!(moves.non_adj, empty_board_j_locks());
    assert!(moves.adj.is_empty());
}

#[test]
fn spawn_on_filled_cell_yields_nothing() {
    let mut board = Board::new();
    board.set(0, 5, true);
    for level in Level::ALL {
        let moves = search(&board, Piece::J, level, 0);
        assert!(moves.non_adj.is_empty());
        assert!(moves.adj.is_empty());
    }
}

#[test]
fn higher_gravity_never_adds_lock_cells() {
    // a tall stack on column 0: slow gravity still walks five taps there,
    // fast gravity drops below the stack top before the last tap can fire
    let mut board = Board::new();
    for row in 14..20 {
        board.set(row, 0, true);
    }
    let by_level: Vec<Vec<Position>> = Level::ALL
        .iter()
        .map(|&level| search(&board, Piece::J, level, NO_ADJUST).non_adj)
        .collect();
    // sets shrink as gravity grows: 39 within 29 within 19 within 18
    for (faster, slower) in [(3, 2), (2, 1), (1, 0)] {
        for p in &by_level[faster] {
            assert!(
                by_level[slower].contains(p),
                "{:?} found at {:?} but not {:?}",
                p,
                Level::ALL[faster],
                Level::ALL[slower]
            );
        }
    }
    assert!(by_level[0].contains(&Position::new(3, 12, 0)));
    assert!(!by_level[3].iter().any(|p| p.col == 0));
}

#[test]
fn every_emitted_lock_rests_on_its_support() {
    let mut board = Board::new();
    for col in 0..10 {
        board.set(19, col, col % 3 != 0);
        board.set(16, col, col >= 6);
        board.set(12, col, col == 2);
    }
    for piece in Piece::ALL {
        let maps = fit_maps(&board, piece);
        for level in Level::ALL {
            for adj_frame in [0, 18, NO_ADJUST] {
                let moves = search(&board, piece, level, adj_frame);
                let all = moves
                    .non_adj
                    .iter()
                    .chain(moves.adj.iter().flat_map(|(_, set)| set));
                for p in all {
                    let (rot, row, col) = (p.rot as usize, p.row as usize, p.col as usize);
                    assert!(rot < piece.rotations() && row < 20 && col < 10);
                    assert!(maps[rot].get(row, col), "{:?} floats: {:?}", piece, p);
                    assert!(
                        row == 19 || !maps[rot].get(row + 1, col),
                        "{:?} not resting: {:?}",
                        piece,
                        p
                    );
                }
            }
        }
    }
}

#[test]
fn redirect_states_sit_on_the_gravity_line() {
    let moves = search(&Board::new(), Piece::T, Level::Level18, 12);
    assert!(!moves.adj.is_empty());
    for (state, _) in &moves.adj {
        // the commit point is at or after the adjustment frame, so the
        // state row is at or below row_at(adj_frame)
        assert!(state.row as u32 >= Level::Level18.row_at(12));
        assert!((state.row as usize) < 20);
    }
}

#[test]
fn search_is_deterministic() {
    let mut board = Board::new();
    for col in 3..7 {
        board.set(18, col, true);
        board.set(19, col, true);
    }
    let engine = MoveSearch::new(Level::Level19, 4, 8, TAP_30HZ);
    let layers = fit_maps(&board, Piece::L);
    let first = engine.run(&layers);
    let second = engine.run(&layers);
    assert_eq!(first, second);
    // the one-call surface agrees with the reused engine
    assert_eq!(
        first,
        move_search(&board, Piece::L, Level::Level19, 8, &TAP_30HZ)
    );
}
