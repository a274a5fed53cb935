use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Every playable cell, sentinel bits excluded.
fn playable_mask() -> u64 {
    (0..COLS).fold(0u64, |mask, col| {
        mask | (((1u64 << ROWS) - 1) << (col * COLUMN_BITS))
    })
}

fn board(moves: &str) -> Board {
    moves.parse().unwrap()
}

/// Check the structural invariants that must hold for every reachable board.
fn assert_invariants(board: &Board) {
    let one = board.bitboard(Player::One);
    let two = board.bitboard(Player::Two);

    assert_eq!(one & two, 0, "bit-sets overlap\n{}", board);
    assert_eq!((one | two) & !playable_mask(), 0, "sentinel bit set\n{}", board);
    assert_eq!(
        (one | two).count_ones() as usize,
        board.move_count(),
        "move count mismatch\n{}",
        board
    );
    assert!(board.move_count() <= BOARD_SIZE);

    for col in 0..COLS {
        let column_bits = ((one | two) >> (col * COLUMN_BITS)) & ((1u64 << COLUMN_BITS) - 1);
        let height = board.column_height(col);
        assert_eq!(
            column_bits,
            (1u64 << height) - 1,
            "column {} is not filled bottom-up\n{}",
            col,
            board
        );
    }
}

#[test]
fn test_initial_state() {
    let board = Board::new();
    assert_eq!(board.current_player(), Player::One);
    assert_eq!(board.move_count(), 0);
    assert_eq!(board.bitboard(Player::One), 0);
    assert_eq!(board.bitboard(Player::Two), 0);
    assert!(!board.has_four_in_a_row());
    assert!(!board.is_draw());
    assert_eq!(board.winner(), None);
    assert_eq!(board, Board::default());
}

#[test]
fn test_legal_moves() {
    let board = Board::new();
    assert_eq!(board.legal_moves(), (0..COLS as u8).collect::<Vec<_>>());
    assert_eq!(board.legal_moves_mask(), 0x7F);

    // After one move
    let board = board.apply_move(3).unwrap();
    assert_eq!(board.legal_moves().len(), 7);
    assert!(board.legal_moves().contains(&3));
}

#[test]
fn test_first_move_in_center() {
    let board = Board::new().apply_move(3).unwrap();

    assert_eq!(board.column_height(3), 1);
    assert_eq!(board.cell(3, 0), Some(Player::One));
    assert_eq!(board.current_player(), Player::Two);
    assert_eq!(board.move_count(), 1);
}

#[test]
fn test_apply_move_leaves_original_untouched() {
    let before = Board::new();
    let after = before.apply_move(0).unwrap();

    assert_eq!(before, Board::new());
    assert_ne!(before, after);
}

#[test]
fn test_stacking_pieces() {
    let mut board = Board::new();

    for i in 0..ROWS {
        board.play(0).unwrap();
        assert_eq!(board.column_height(0), i + 1);
    }

    assert!(!board.legal_moves().contains(&0));
    assert_eq!(board.legal_moves_mask() & 1, 0);
}

#[test]
fn test_invalid_move_full_column() {
    let mut board = board("000000");
    let before = board;

    assert_eq!(
        board.apply_move(0),
        Err(MoveError::ColumnFull { column: 0 })
    );
    assert_eq!(board.play(0), Err(MoveError::ColumnFull { column: 0 }));

    // Board should be unchanged
    assert_eq!(board, before);
    assert_eq!(board.column_height(0), ROWS);
    assert_eq!(board.move_count(), ROWS);
}

#[test]
fn test_invalid_move_out_of_range() {
    let board = Board::new();
    assert_eq!(
        board.apply_move(7),
        Err(MoveError::ColumnOutOfRange { column: 7 })
    );
}

#[test]
fn test_horizontal_win() {
    // Player one: bottom row, columns 0-3. Player two: second row.
    let board = board("0011223");

    assert!(board.has_four_in_a_row());
    assert_eq!(board.current_player(), Player::Two);
    assert_eq!(board.winner(), Some(Outcome::Winner(Player::One)));
}

#[test]
fn test_horizontal_win_right_edge() {
    let board = board("3344556");
    assert_eq!(board.winner(), Some(Outcome::Winner(Player::One)));
}

#[test]
fn test_vertical_win() {
    let board = board("0101010");
    assert!(board.has_four_in_a_row());
    assert_eq!(board.winner(), Some(Outcome::Winner(Player::One)));
}

#[test]
fn test_diagonal_win_ascending() {
    // Player one at (0,0), (1,1), (2,2), (3,3)
    let board = board("01123223633");
    assert_eq!(board.cell(3, 3), Some(Player::One));
    assert_eq!(board.winner(), Some(Outcome::Winner(Player::One)));
}

#[test]
fn test_diagonal_win_descending() {
    // Player one at (3,0), (2,1), (1,2), (0,3)
    let board = board("32211010040");
    assert_eq!(board.winner(), Some(Outcome::Winner(Player::One)));
}

#[test]
fn test_three_in_a_row_is_not_a_win() {
    let board = board("001122");
    assert!(!board.has_four_in_a_row());
    assert_eq!(board.winner(), None);
}

#[test]
fn test_gapped_run_is_not_a_win() {
    // Player one on columns 0, 1, 2 and 4 of the bottom row
    let board = board("0011224");
    assert!(!board.has_four_in_a_row());
    assert_eq!(board.winner(), None);
}

#[test]
fn test_sentinel_blocks_column_wrap() {
    // Player one holds the top three cells of column 0 and the bottom cell of
    // column 1. Without the sentinel row those bits would be contiguous.
    let board = board("10205006060");
    assert_eq!(board.cell(0, 5), Some(Player::One));
    assert_eq!(board.cell(1, 0), Some(Player::One));
    assert!(!board.has_four_in_a_row());
}

#[test]
fn test_win_only_counts_last_mover() {
    // Player one has four in a row, but it is evaluated from player two's
    // perspective after player two moves.
    let mut board = board("0011223");
    board.play(6).unwrap();
    assert!(!board.has_four_in_a_row());
}

#[test]
fn test_draw_game() {
    let board = board("340452242635505300653366441162462235001111");

    assert_eq!(board.move_count(), BOARD_SIZE);
    assert!(board.legal_moves().is_empty());
    assert!(!board.has_four_in_a_row());
    assert!(board.is_draw());
    assert_eq!(board.winner(), Some(Outcome::Draw));
    assert_invariants(&board);
}

#[test]
fn test_full_board_with_win_is_not_a_draw() {
    // The 42nd move completes a line for player two
    let board = board("566214432022610024340515233450165365613140");

    assert_eq!(board.move_count(), BOARD_SIZE);
    assert!(board.has_four_in_a_row());
    assert!(!board.is_draw());
    assert_eq!(board.winner(), Some(Outcome::Winner(Player::Two)));
}

#[test]
fn test_parse_errors() {
    assert_eq!(
        "01x".parse::<Board>(),
        Err(ParseBoardError::InvalidCharacter {
            ch: 'x',
            position: 2
        })
    );
    assert_eq!(
        "0000000".parse::<Board>(),
        Err(ParseBoardError::IllegalMove {
            position: 6,
            source: MoveError::ColumnFull { column: 0 }
        })
    );
    assert!("9".parse::<Board>().is_err());
    assert_eq!("3 3 4".parse::<Board>().unwrap(), board("334"));
}

#[test]
fn test_from_moves_matches_parse() {
    assert_eq!(Board::from_moves(&[3, 3, 4]).unwrap(), board("334"));
    assert_eq!(
        Board::from_moves(&[0, 0, 0, 0, 0, 0, 0]),
        Err(MoveError::ColumnFull { column: 0 })
    );
}

#[test]
fn test_moves_after_a_win_are_rejected() {
    // Player one completes column 0 on the seventh disc; the eighth is too late
    assert_eq!(
        "01010102".parse::<Board>(),
        Err(ParseBoardError::GameOver { position: 7 })
    );
    assert_eq!(
        Board::from_moves(&[0, 1, 0, 1, 0, 1, 0, 2]),
        Err(MoveError::GameOver)
    );

    // Positions are counted over the raw string, whitespace included
    assert_eq!(
        "0101 010 2".parse::<Board>(),
        Err(ParseBoardError::GameOver { position: 9 })
    );

    // The winning move itself is accepted
    let won = board("0101010");
    assert_eq!(won.winner(), Some(Outcome::Winner(Player::One)));
    assert_eq!(Board::from_moves(&[0, 1, 0, 1, 0, 1, 0]), Ok(won));
}

#[test]
fn test_moves_after_a_full_board_are_game_over() {
    let full = "340452242635505300653366441162462235001111";
    assert_eq!(
        format!("{}0", full).parse::<Board>(),
        Err(ParseBoardError::GameOver { position: 42 })
    );
}

#[test]
fn test_play_still_allows_moves_after_a_win() {
    // Only replaying a history enforces game over; single moves check the column alone
    let mut board = board("0101010");
    assert!(board.play(2).is_ok());
    assert_eq!(board.winner(), None);
}

#[test]
fn test_display() {
    let rendered = board("334").to_string();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), ROWS + 1);
    assert_eq!(lines[ROWS - 2], ". . . O . . .");
    assert_eq!(lines[ROWS - 1], ". . . X X . .");
    assert_eq!(lines[ROWS], "0 1 2 3 4 5 6");
}

#[test]
fn test_random_games_invariants() {
    for seed in 0..50 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut board = Board::new();

        while board.winner().is_none() {
            let legal = board.legal_moves();
            assert!(
                !legal.is_empty(),
                "Open game must have legal moves (seed={})",
                seed
            );

            let prev_player = board.current_player();
            let column = legal[rng.gen_range(0..legal.len())];
            board.play(column).unwrap();

            assert_ne!(board.current_player(), prev_player);
            assert_invariants(&board);
        }

        match board.winner() {
            Some(Outcome::Winner(player)) => {
                assert_eq!(player, board.current_player().other(), "seed={}", seed)
            }
            Some(Outcome::Draw) => assert_eq!(board.move_count(), BOARD_SIZE),
            None => unreachable!(),
        }
    }
}

#[test]
fn test_exhaustive_horizontal_and_vertical_lines() {
    // Place every horizontal and vertical four directly and check detection.
    for col in 0..COLS {
        for row in 0..ROWS {
            if col + 3 < COLS {
                let bits = (0..4).fold(0u64, |b, i| b | Board::bit(col + i, row));
                assert!(Board::has_run_of_four(bits), "horizontal at ({col},{row})");
                let three = bits & !Board::bit(col + 3, row);
                assert!(!Board::has_run_of_four(three));
            }
            if row + 3 < ROWS {
                let bits = (0..4).fold(0u64, |b, i| b | Board::bit(col, row + i));
                assert!(Board::has_run_of_four(bits), "vertical at ({col},{row})");
            }
            if col + 3 < COLS && row + 3 < ROWS {
                let up = (0..4).fold(0u64, |b, i| b | Board::bit(col + i, row + i));
                assert!(Board::has_run_of_four(up), "diagonal up at ({col},{row})");
                let down = (0..4).fold(0u64, |b, i| b | Board::bit(col + i, row + 3 - i));
                assert!(Board::has_run_of_four(down), "diagonal down at ({col},{row})");
            }
        }
    }
}
