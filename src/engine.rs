use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the square grid.
pub const SIZE: usize = 4;

/// One ordered row (or reoriented column) of cell values; 0 means empty.
pub type Line = [u32; SIZE];

type Cells = [[u32; SIZE]; SIZE];

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, handy for iteration.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Where `spawn_tile` is allowed to place a new tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnRegion {
    /// Any empty cell on the board. The corrected default.
    AnyEmpty,
    /// Empty cells of row 0 only. Reproduces the original program's
    /// behavior, kept as a compatibility mode.
    FirstRowOnly,
}

/// Spawn policy: candidate region plus the 2-vs-4 weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPolicy {
    pub region: SpawnRegion,
    /// Chance in tenths that the spawned tile is a 4 rather than a 2.
    pub four_in_ten: u32,
}

impl Default for SpawnPolicy {
    /// Anywhere-empty region, 4 with probability 1/10.
    fn default() -> Self {
        SpawnPolicy {
            region: SpawnRegion::AnyEmpty,
            four_in_ten: 1,
        }
    }
}

/// 4x4 board of tile values in row-major order.
///
/// A cell holds 0 when empty, otherwise a power of two >= 2. Public methods
/// provide ergonomic, safe operations while preserving an escape hatch to
/// the raw cell matrix for advanced use.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board(Cells);

impl Board {
    /// A constant empty board (all cells empty).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// Construct a `Board` from a raw cell matrix.
    #[inline]
    pub fn from_cells(cells: [[u32; SIZE]; SIZE]) -> Self {
        Board(cells)
    }

    /// Consume this `Board`, returning the raw cell matrix.
    #[inline]
    pub fn into_cells(self) -> [[u32; SIZE]; SIZE] {
        self.0
    }

    /// Borrow the raw cell matrix for this `Board`.
    #[inline]
    pub fn cells(&self) -> &[[u32; SIZE]; SIZE] {
        &self.0
    }

    /// Return the value at `(row, col)`, 0 if the cell is empty.
    ///
    /// Panics if `row` or `col` is out of range. This is the read surface
    /// for a presentation layer.
    #[inline]
    pub fn get(self, row: usize, col: usize) -> u32 {
        self.0[row][col]
    }

    /// Return the board after sliding/merging in `direction` plus whether
    /// anything moved or merged (no random insert).
    ///
    /// Example
    /// ```
    /// use twenty48::engine::{Board, Direction};
    /// let b = Board::from_cells([
    ///     [2, 0, 2, 4],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 0],
    /// ]);
    /// let (moved, changed) = b.apply_move(Direction::Left);
    /// assert!(changed);
    /// assert_eq!(moved.cells()[0], [4, 4, 0, 0]);
    /// ```
    #[inline]
    pub fn apply_move(self, direction: Direction) -> (Self, bool) {
        apply_move(self, direction)
    }

    /// Insert a random 2 or 4 tile into a random empty cell of the policy's
    /// region, using the provided RNG. No-op when the region has no empty
    /// cell; never overwrites an occupied cell.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use twenty48::engine::{Board, SpawnPolicy};
    /// use rand::{rngs::StdRng, SeedableRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let policy = SpawnPolicy::default();
    /// let b = Board::EMPTY
    ///     .with_spawned_tile(&mut rng, policy)
    ///     .with_spawned_tile(&mut rng, policy);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_spawned_tile<R: Rng + ?Sized>(self, rng: &mut R, policy: SpawnPolicy) -> Self {
        spawn_tile(self, rng, policy)
    }

    /// Convenience: like `with_spawned_tile` but uses thread-local RNG.
    #[inline]
    pub fn with_spawned_tile_thread(self, policy: SpawnPolicy) -> Self {
        let mut rng = rand::thread_rng();
        self.with_spawned_tile(&mut rng, policy)
    }

    /// Return true if no empty cell remains and no two orthogonally
    /// adjacent cells hold equal values.
    #[inline]
    pub fn is_terminal(self) -> bool {
        is_terminal(self)
    }

    /// Return the highest tile value present, 0 on an empty board.
    #[inline]
    pub fn highest_tile(self) -> u32 {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> usize {
        self.0.iter().flatten().filter(|&&v| v == 0).count()
    }

    /// Sum of all tile values. Conserved by `apply_move`.
    #[inline]
    pub fn total_value(self) -> u64 {
        self.0.iter().flatten().map(|&v| u64::from(v)).sum()
    }

    /// True iff every cell is empty or a power of two >= 2.
    pub fn is_well_formed(self) -> bool {
        self.0
            .iter()
            .flatten()
            .all(|&v| v == 0 || (v >= 2 && v.is_power_of_two()))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:?})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (idx, row) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f, "{}", "-".repeat(SIZE * 8 - 1))?;
            }
            let vals: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", vals.join("|"))?;
        }
        Ok(())
    }
}

impl From<[[u32; SIZE]; SIZE]> for Board {
    fn from(cells: [[u32; SIZE]; SIZE]) -> Self {
        Board::from_cells(cells)
    }
}
impl From<Board> for [[u32; SIZE]; SIZE] {
    fn from(b: Board) -> Self {
        b.into_cells()
    }
}

/// Create a board with every cell empty.
pub fn create_empty() -> Board {
    Board::EMPTY
}

/// Free-function mirror of [`Board::get`].
pub fn get_cell(board: Board, row: usize, col: usize) -> u32 {
    board.get(row, col)
}

/// Slide/merge one line toward index 0.
///
/// Compaction first (drop zeros, preserve order), then a single
/// left-to-right merge pass where two adjacent equal survivors fuse into
/// one doubled cell and the scan advances past both, so a merged tile is
/// never re-merged in the same move. The result is right-padded with zeros.
///
/// This is the single source of truth for merge semantics; all four
/// directions reduce to it after reorientation.
pub fn slide_reduce_line(line: Line) -> Line {
    let mut compact = [0u32; SIZE];
    let mut len = 0;
    for v in line {
        if v != 0 {
            compact[len] = v;
            len += 1;
        }
    }

    let mut out = [0u32; SIZE];
    let mut write = 0;
    let mut read = 0;
    while read < len {
        if read + 1 < len && compact[read] == compact[read + 1] {
            out[write] = compact[read] * 2;
            read += 2;
        } else {
            out[write] = compact[read];
            read += 1;
        }
        write += 1;
    }
    out
}

/// Rotate the board by `turns` clockwise quarter turns (`turns` taken mod 4).
///
/// The single orientation primitive: all four directional transforms derive
/// from it plus [`mirror_rows`], so the directions stay mutually consistent.
pub fn rotate_quarter_turns(board: Board, turns: usize) -> Board {
    let mut cells = board.0;
    for _ in 0..turns % 4 {
        let mut next = [[0u32; SIZE]; SIZE];
        for (r, row) in cells.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                next[c][SIZE - 1 - r] = v;
            }
        }
        cells = next;
    }
    Board(cells)
}

/// Reverse every row (horizontal reflection).
pub fn mirror_rows(board: Board) -> Board {
    let mut cells = board.0;
    for row in &mut cells {
        row.reverse();
    }
    Board(cells)
}

// Quarter turns that map each direction of motion onto "left", and back.
fn orientation(direction: Direction) -> (usize, usize) {
    match direction {
        Direction::Left | Direction::Right => (0, 0),
        Direction::Up => (3, 1),
        Direction::Down => (1, 3),
    }
}

/// Slide/merge the whole board in `direction`.
///
/// Returns the moved board and whether any cell differs from the input,
/// computed by structural comparison. The total tile value is conserved:
/// each merge removes two tiles of value v and inserts one of value 2v.
///
/// Panics if the board is malformed (a nonzero cell that is not a power of
/// two); inputs are pre-validated upstream so this only guards regressions.
pub fn apply_move(board: Board, direction: Direction) -> (Board, bool) {
    assert!(board.is_well_formed(), "malformed board: {:?}", board);
    let (pre, post) = orientation(direction);
    let mut oriented = rotate_quarter_turns(board, pre);
    if direction == Direction::Right {
        oriented = mirror_rows(oriented);
    }

    let mut cells = oriented.0;
    for row in &mut cells {
        *row = slide_reduce_line(*row);
    }

    let mut moved = Board(cells);
    if direction == Direction::Right {
        moved = mirror_rows(moved);
    }
    let moved = rotate_quarter_turns(moved, post);
    let changed = moved != board;
    (moved, changed)
}

/// Insert a random 2 or 4 tile into a random empty cell of the policy's
/// region, using the provided RNG. See [`Board::with_spawned_tile`].
pub fn spawn_tile<R: Rng + ?Sized>(board: Board, rng: &mut R, policy: SpawnPolicy) -> Board {
    let rows = match policy.region {
        SpawnRegion::AnyEmpty => 0..SIZE,
        SpawnRegion::FirstRowOnly => 0..1,
    };
    let candidates: Vec<(usize, usize)> = rows
        .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
        .filter(|&(r, c)| board.0[r][c] == 0)
        .collect();
    if candidates.is_empty() {
        return board;
    }
    let (row, col) = candidates[rng.gen_range(0..candidates.len())];
    let value = if rng.gen_range(0..10) < policy.four_in_ten {
        4
    } else {
        2
    };
    let mut cells = board.0;
    cells[row][col] = value;
    Board(cells)
}

/// True iff no cell is empty and no two orthogonally adjacent cells hold
/// equal values, i.e. no further move can change the board.
///
/// Recomputed from scratch on every call; nothing is cached.
pub fn is_terminal(board: Board) -> bool {
    for r in 0..SIZE {
        for c in 0..SIZE {
            let v = board.0[r][c];
            if v == 0 {
                return false;
            }
            if c + 1 < SIZE && v == board.0[r][c + 1] {
                return false;
            }
            if r + 1 < SIZE && v == board.0[r + 1][c] {
                return false;
            }
        }
    }
    true
}

fn format_val(val: &u32) -> String {
    match val {
        0 => String::from("       "),
        &x => format!("{:^7}", x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board_with_row0(row: Line) -> Board {
        let mut cells = [[0u32; SIZE]; SIZE];
        cells[0] = row;
        Board::from_cells(cells)
    }

    #[test]
    fn it_slide_reduce_line() {
        assert_eq!(slide_reduce_line([0, 0, 0, 0]), [0, 0, 0, 0]);
        assert_eq!(slide_reduce_line([2, 4, 2, 4]), [2, 4, 2, 4]);
        assert_eq!(slide_reduce_line([2, 0, 0, 2]), [4, 0, 0, 0]);
        assert_eq!(slide_reduce_line([0, 2, 0, 2]), [4, 0, 0, 0]);
        assert_eq!(slide_reduce_line([4, 4, 8, 0]), [8, 8, 0, 0]);
    }

    #[test]
    fn it_merges_each_tile_at_most_once() {
        assert_eq!(slide_reduce_line([2, 2, 2, 2]), [4, 4, 0, 0]);
        assert_eq!(slide_reduce_line([4, 2, 2, 0]), [4, 4, 0, 0]);
        assert_eq!(slide_reduce_line([2, 2, 4, 0]), [4, 4, 0, 0]);
    }

    #[test]
    fn it_rotates_consistently() {
        let b = Board::from_cells([
            [2, 4, 0, 0],
            [0, 8, 0, 0],
            [0, 0, 16, 0],
            [0, 0, 0, 32],
        ]);
        assert_eq!(rotate_quarter_turns(b, 0), b);
        assert_eq!(rotate_quarter_turns(b, 4), b);
        let once = rotate_quarter_turns(b, 1);
        assert_eq!(once.get(0, 3), 2);
        assert_eq!(once.get(1, 3), 4);
        assert_eq!(rotate_quarter_turns(once, 3), b);
        assert_eq!(rotate_quarter_turns(rotate_quarter_turns(b, 2), 2), b);
        assert_eq!(mirror_rows(mirror_rows(b)), b);
    }

    #[test]
    fn test_move_left() {
        let b = board_with_row0([2, 0, 2, 4]);
        let (moved, changed) = apply_move(b, Direction::Left);
        assert!(changed);
        assert_eq!(moved.cells()[0], [4, 4, 0, 0]);
    }

    #[test]
    fn test_move_right() {
        let b = board_with_row0([2, 0, 2, 4]);
        let (moved, changed) = apply_move(b, Direction::Right);
        assert!(changed);
        assert_eq!(moved.cells()[0], [0, 0, 4, 4]);
    }

    #[test]
    fn test_move_up() {
        let b = Board::from_cells([
            [2, 0, 0, 0],
            [2, 4, 0, 0],
            [0, 4, 2, 0],
            [4, 0, 2, 8],
        ]);
        let (moved, changed) = apply_move(b, Direction::Up);
        assert!(changed);
        assert_eq!(
            moved.cells(),
            &[[4, 8, 4, 8], [4, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]
        );
    }

    #[test]
    fn test_move_down() {
        let b = Board::from_cells([
            [2, 0, 0, 0],
            [2, 4, 0, 0],
            [0, 4, 2, 0],
            [4, 0, 2, 8],
        ]);
        let (moved, changed) = apply_move(b, Direction::Down);
        assert!(changed);
        assert_eq!(
            moved.cells(),
            &[[0, 0, 0, 0], [0, 0, 0, 0], [4, 0, 0, 0], [4, 8, 4, 8]]
        );
    }

    #[test]
    fn it_reports_unchanged_moves() {
        let b = board_with_row0([2, 4, 0, 0]);
        let (moved, changed) = apply_move(b, Direction::Left);
        assert!(!changed);
        assert_eq!(moved, b);
        let (_, changed) = apply_move(b, Direction::Up);
        assert!(!changed);
    }

    #[test]
    fn it_conserves_total_value() {
        let mut rng = StdRng::seed_from_u64(7);
        let policy = SpawnPolicy::default();
        let mut b = Board::EMPTY
            .with_spawned_tile(&mut rng, policy)
            .with_spawned_tile(&mut rng, policy);
        for step in 0..200 {
            let direction = Direction::ALL[step % 4];
            let before = b.total_value();
            let (moved, changed) = apply_move(b, direction);
            assert_eq!(moved.total_value(), before);
            assert!(moved.is_well_formed());
            b = if changed {
                moved.with_spawned_tile(&mut rng, policy)
            } else {
                moved
            };
            if is_terminal(b) {
                break;
            }
        }
    }

    #[test]
    fn it_is_idempotent_per_direction() {
        let mut rng = StdRng::seed_from_u64(11);
        let policy = SpawnPolicy::default();
        let b = Board::EMPTY
            .with_spawned_tile(&mut rng, policy)
            .with_spawned_tile(&mut rng, policy);
        for direction in Direction::ALL {
            let (once, _) = apply_move(b, direction);
            let (twice, changed) = apply_move(once, direction);
            assert!(!changed);
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn it_detects_terminal_boards() {
        let stuck = Board::from_cells([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(is_terminal(stuck));

        let mut cells = stuck.into_cells();
        cells[3][3] = 4; // equal vertical pair at (2,3)/(3,3)
        assert!(!is_terminal(Board::from_cells(cells)));

        let mut cells = stuck.into_cells();
        cells[1][2] = 0;
        assert!(!is_terminal(Board::from_cells(cells)));
        assert!(!is_terminal(Board::EMPTY));
    }

    #[test]
    fn it_spawns_only_into_empty_cells() {
        let mut rng = StdRng::seed_from_u64(3);
        let policy = SpawnPolicy::default();
        let mut b = Board::EMPTY;
        for n in 1..=(SIZE * SIZE) {
            b = b.with_spawned_tile(&mut rng, policy);
            assert_eq!(b.count_empty(), SIZE * SIZE - n);
        }
        // Full board: spawning is a no-op.
        let full = b;
        assert_eq!(full.with_spawned_tile(&mut rng, policy), full);
    }

    #[test]
    fn it_respects_first_row_spawn_region() {
        let policy = SpawnPolicy {
            region: SpawnRegion::FirstRowOnly,
            four_in_ten: 5,
        };
        let mut rng = StdRng::seed_from_u64(9);
        let mut b = Board::EMPTY;
        for _ in 0..SIZE {
            b = b.with_spawned_tile(&mut rng, policy);
        }
        assert_eq!(b.cells()[0].iter().filter(|&&v| v != 0).count(), SIZE);
        assert_eq!(b.count_empty(), SIZE * SIZE - SIZE);
        // Row 0 full: further first-row spawns are no-ops.
        assert_eq!(b.with_spawned_tile(&mut rng, policy), b);
    }

    #[test]
    fn it_spawns_only_twos_and_fours() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..64 {
            let b = Board::EMPTY.with_spawned_tile(&mut rng, SpawnPolicy::default());
            let v = b.cells().iter().flatten().copied().max().unwrap();
            assert!(v == 2 || v == 4);
        }
    }

    #[test]
    #[should_panic(expected = "malformed board")]
    fn it_rejects_malformed_boards() {
        let bad = board_with_row0([3, 0, 0, 0]);
        let _ = apply_move(bad, Direction::Left);
    }
}
