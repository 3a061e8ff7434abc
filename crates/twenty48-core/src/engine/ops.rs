use log::trace;
use rand::Rng;

use super::state::{Board, Grid, Line, Move, MoveResult, Score, Tile, SIZE};

/// A fresh board: all zeros plus two spawned tiles.
pub fn new_board<R: Rng + ?Sized>(rng: &mut R) -> Board {
    Board::EMPTY.with_random_tile(rng).with_random_tile(rng)
}

/// Insert a random 2 (90%) or 4 (10%) tile using thread-local RNG.
///
/// For reproducible behavior, prefer `spawn_tile(board, &mut impl Rng)`.
pub fn insert_random_tile(board: Board) -> Board {
    board.with_random_tile_thread()
}

/// Place one new tile in a uniformly chosen empty cell. A full board is
/// returned unchanged.
pub fn spawn_tile<R: Rng + ?Sized>(board: Board, rng: &mut R) -> Board {
    let mut empty = [(0usize, 0usize); SIZE * SIZE];
    let mut n = 0;
    for (r, row) in board.0.iter().enumerate() {
        for (c, &tile) in row.iter().enumerate() {
            if tile == 0 {
                empty[n] = (r, c);
                n += 1;
            }
        }
    }
    if n == 0 {
        return board;
    }
    let (row, col) = empty[rng.gen_range(0..n)];
    let tile = generate_random_tile(rng);
    trace!("spawning {tile} at ({row}, {col})");
    let mut cells = board.0;
    cells[row][col] = tile;
    Board(cells)
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10) < 9 { 2 } else { 4 }
}

/// Slide/merge tiles in the given direction. No randomness.
pub fn apply_move(direction: Move, board: Board) -> MoveResult {
    match direction {
        Move::Left => move_left(board),
        Move::Right => move_right(board),
        Move::Up => move_up(board),
        Move::Down => move_down(board),
    }
}

pub fn move_left(board: Board) -> MoveResult {
    let (grid, score) = shift_rows_left(board.0);
    MoveResult {
        board: Board(grid),
        score,
    }
}

pub fn move_right(board: Board) -> MoveResult {
    let (grid, score) = shift_rows_right(board.0);
    MoveResult {
        board: Board(grid),
        score,
    }
}

pub fn move_up(board: Board) -> MoveResult {
    let (grid, score) = shift_rows_left(transpose(board.0));
    MoveResult {
        board: Board(transpose(grid)),
        score,
    }
}

pub fn move_down(board: Board) -> MoveResult {
    let (grid, score) = shift_rows_right(transpose(board.0));
    MoveResult {
        board: Board(transpose(grid)),
        score,
    }
}

fn shift_rows_left(grid: Grid) -> (Grid, Score) {
    let mut out = [[0; SIZE]; SIZE];
    let mut score = 0;
    for (dst, &row) in out.iter_mut().zip(grid.iter()) {
        let (line, line_score) = compress_line(row);
        *dst = line;
        score += line_score;
    }
    (out, score)
}

fn shift_rows_right(grid: Grid) -> (Grid, Score) {
    let (shifted, score) = shift_rows_left(reverse_rows(grid));
    (reverse_rows(shifted), score)
}

fn reverse_rows(mut grid: Grid) -> Grid {
    for row in grid.iter_mut() {
        row.reverse();
    }
    grid
}

pub(crate) fn transpose(grid: Grid) -> Grid {
    let mut out = [[0; SIZE]; SIZE];
    for (r, row) in grid.iter().enumerate() {
        for (c, &tile) in row.iter().enumerate() {
            out[c][r] = tile;
        }
    }
    out
}

/// Compress one line towards index 0 and merge equal neighbours.
///
/// Zeros are dropped first, so tiles separated by gaps still meet. A tile
/// produced by a merge is never a merge source again in the same pass.
pub(crate) fn compress_line(line: Line) -> (Line, Score) {
    let mut packed = [0; SIZE];
    let mut len = 0;
    for &tile in line.iter().filter(|&&t| t != 0) {
        packed[len] = tile;
        len += 1;
    }

    let mut score = 0;
    for i in 0..len.saturating_sub(1) {
        if packed[i] != 0 && packed[i] == packed[i + 1] {
            packed[i] *= 2;
            score += Score::from(packed[i]);
            // the right partner becomes a hole and is skipped next iteration
            packed[i + 1] = 0;
        }
    }

    let mut out = [0; SIZE];
    for (dst, tile) in out.iter_mut().zip(packed[..len].iter().filter(|&&t| t != 0)) {
        *dst = *tile;
    }
    (out, score)
}

/// True if no move in any direction changes the board.
///
/// Checks for an empty cell first, then for equal horizontal or vertical
/// neighbours; either one means a move is still possible.
pub fn is_terminal(board: Board) -> bool {
    let cells = board.0;
    if cells.iter().flatten().any(|&t| t == 0) {
        return false;
    }
    for r in 0..SIZE {
        for c in 0..SIZE - 1 {
            if cells[r][c] == cells[r][c + 1] {
                return false;
            }
        }
    }
    for c in 0..SIZE {
        for r in 0..SIZE - 1 {
            if cells[r][c] == cells[r + 1][c] {
                return false;
            }
        }
    }
    true
}

/// Count the number of zero tiles.
pub fn count_empty(board: Board) -> usize {
    board.tiles().filter(|&t| t == 0).count()
}

pub fn get_highest_tile_val(board: Board) -> Tile {
    board.tiles().max().unwrap_or(0)
}

pub(crate) fn format_val(val: &Tile) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{:^7}", x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn row_board(row: Line) -> Board {
        Board::from_rows([row, [0; 4], [0; 4], [0; 4]])
    }

    #[test]
    fn it_compress_line() {
        assert_eq!(compress_line([0, 0, 0, 0]), ([0, 0, 0, 0], 0));
        assert_eq!(compress_line([2, 4, 2, 4]), ([2, 4, 2, 4], 0));
        assert_eq!(compress_line([2, 2, 4, 4]), ([4, 8, 0, 0], 12));
        assert_eq!(compress_line([2, 0, 0, 2]), ([4, 0, 0, 0], 4));
        assert_eq!(compress_line([0, 0, 0, 8]), ([8, 0, 0, 0], 0));
        assert_eq!(compress_line([4, 2, 2, 0]), ([4, 4, 0, 0], 4));
    }

    #[test]
    fn it_compress_line_no_triple_merge() {
        assert_eq!(compress_line([2, 2, 2, 0]), ([4, 2, 0, 0], 4));
        assert_eq!(compress_line([4, 4, 8, 0]), ([8, 8, 0, 0], 8));
        assert_eq!(compress_line([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
    }

    #[test]
    fn test_move_left_rows() {
        let res = move_left(row_board([2, 2, 0, 0]));
        assert_eq!(res.board.rows()[0], [4, 0, 0, 0]);
        assert_eq!(res.score, 4);

        let res = move_left(row_board([2, 2, 2, 2]));
        assert_eq!(res.board.rows()[0], [4, 4, 0, 0]);
        assert_eq!(res.score, 8);

        let res = move_left(row_board([2, 0, 2, 4]));
        assert_eq!(res.board.rows()[0], [4, 4, 0, 0]);
        assert_eq!(res.score, 4);
    }

    #[test]
    fn test_move_left() {
        let game = Board::from_rows([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 0, 0, 4]]);
        let res = move_left(game);
        assert_eq!(
            res.board,
            Board::from_rows([[2, 4, 8, 16], [2, 16, 4, 0], [8, 0, 0, 0], [2, 4, 0, 0]])
        );
        assert_eq!(res.score, 24);
    }

    #[test]
    fn test_move_right() {
        let game = Board::from_rows([[2, 4, 8, 16], [2, 8, 8, 4], [4, 0, 0, 4], [2, 2, 2, 0]]);
        let res = move_right(game);
        assert_eq!(
            res.board,
            Board::from_rows([[2, 4, 8, 16], [0, 2, 16, 4], [0, 0, 0, 8], [0, 0, 2, 4]])
        );
        assert_eq!(res.score, 28);
    }

    #[test]
    fn test_move_up() {
        let game = Board::from_rows([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        let res = move_up(game);
        assert_eq!(
            res.board,
            Board::from_rows([[2, 2, 8, 2], [4, 16, 0, 4], [8, 4, 0, 0], [16, 0, 0, 0]])
        );
        assert_eq!(res.score, 24);
    }

    #[test]
    fn test_move_down() {
        let game = Board::from_rows([[2, 2, 4, 2], [4, 8, 0, 0], [8, 8, 0, 0], [16, 4, 4, 4]]);
        let res = move_down(game);
        assert_eq!(
            res.board,
            Board::from_rows([[2, 0, 0, 0], [4, 2, 0, 0], [8, 16, 0, 2], [16, 4, 8, 4]])
        );
        assert_eq!(res.score, 24);
    }

    #[test]
    fn moves_do_not_touch_input() {
        let game = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let before = game;
        let _ = move_left(game);
        let _ = move_down(game);
        assert_eq!(game, before);
    }

    #[test]
    fn it_transpose() {
        let grid = [[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 16]];
        let t = transpose(grid);
        assert_eq!(t[0], [1, 5, 9, 13]);
        assert_eq!(t[3], [4, 8, 12, 16]);
        assert_eq!(transpose(t), grid);
    }

    #[test]
    fn checkerboard_is_terminal() {
        let b = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(is_terminal(b));
    }

    #[test]
    fn full_board_with_pair_is_not_terminal() {
        let horizontal = Board::from_rows([
            [2, 2, 8, 16],
            [4, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ]);
        assert!(!is_terminal(horizontal));
        let vertical = Board::from_rows([
            [2, 4, 8, 16],
            [2, 8, 16, 32],
            [8, 16, 32, 64],
            [16, 32, 64, 128],
        ]);
        assert!(!is_terminal(vertical));
    }

    #[test]
    fn board_with_hole_is_not_terminal() {
        let b = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 0, 4], [4, 2, 4, 2]]);
        assert!(!is_terminal(b));
    }

    #[test]
    fn it_new_board_has_two_tiles() {
        let mut rng = StdRng::seed_from_u64(2048);
        for _ in 0..50 {
            let b = new_board(&mut rng);
            let tiles: Vec<Tile> = b.tiles().filter(|&t| t != 0).collect();
            assert_eq!(tiles.len(), 2);
            assert!(tiles.iter().all(|&t| t == 2 || t == 4));
        }
    }

    #[test]
    fn it_spawn_fills_board() {
        let mut game = Board::EMPTY;
        for _ in 0..16 {
            game = insert_random_tile(game);
        }
        assert_eq!(count_empty(game), 0);
        assert_eq!(insert_random_tile(game), game);
    }

    #[test]
    fn spawn_is_deterministic_for_a_seed() {
        let a = new_board(&mut StdRng::seed_from_u64(99));
        let b = new_board(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn spawn_value_ratio_is_roughly_nine_to_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let fours = (0..10_000)
            .filter(|_| generate_random_tile(&mut rng) == 4)
            .count();
        assert!((700..1300).contains(&fours), "got {fours} fours");
    }

    #[test]
    fn spawn_cell_is_uniform_over_empty_cells() {
        let mut rng = StdRng::seed_from_u64(16);
        let mut hits = [[0u32; SIZE]; SIZE];
        for _ in 0..16_000 {
            let b = spawn_tile(Board::EMPTY, &mut rng);
            for (r, row) in b.rows().iter().enumerate() {
                for (c, &tile) in row.iter().enumerate() {
                    if tile != 0 {
                        hits[r][c] += 1;
                    }
                }
            }
        }
        for count in hits.iter().flatten() {
            assert!((850..1150).contains(count), "cell hit {count} times");
        }
    }

    #[test]
    fn spawn_only_targets_empty_cells() {
        let mut rng = StdRng::seed_from_u64(3);
        let b = Board::from_rows([[2, 4, 8, 16], [4, 8, 16, 2], [8, 16, 0, 4], [16, 2, 4, 8]]);
        for _ in 0..100 {
            let spawned = spawn_tile(b, &mut rng);
            assert_eq!(count_empty(spawned), 0);
            assert!(matches!(spawned.get(2, 2), 2 | 4));
        }
    }

    #[test]
    fn it_highest_tile_and_empty_count() {
        let b = Board::from_rows([[2, 0, 0, 0], [0, 256, 0, 0], [0; 4], [0, 0, 0, 8]]);
        assert_eq!(get_highest_tile_val(b), 256);
        assert_eq!(count_empty(b), 13);
        assert_eq!(get_highest_tile_val(Board::EMPTY), 0);
    }
}
