//! Game-session state machine over the board engine.
//!
//! A [`Session`] owns the board and the current phase, replacing any
//! process-wide mutable state: every operation takes the session (and an
//! RNG) explicitly. Restart is an in-place reset, never a re-entry into a
//! driving loop.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::{self, Board, Direction, SpawnPolicy};

/// Phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Moves are accepted; a changing move is followed by a spawn.
    Playing,
    /// No move can change the board. Only [`Session::restart`] leaves
    /// this phase.
    Terminal,
}

/// A running game: board, phase, and the spawn policy in effect.
///
/// The session owns the board exclusively; collaborators read it through
/// [`Session::board`] and never mutate it.
///
/// ```
/// use twenty48::engine::Direction;
/// use twenty48::session::{Phase, Session};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let mut session = Session::new(&mut rng);
/// assert_eq!(session.phase(), Phase::Playing);
/// assert_eq!(session.board().count_empty(), 14);
/// session.apply(Direction::Left, &mut rng);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    board: Board,
    phase: Phase,
    policy: SpawnPolicy,
}

impl Session {
    /// Start a session with the default spawn policy: a fresh board seeded
    /// with exactly two tiles, phase `Playing`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_policy(SpawnPolicy::default(), rng)
    }

    /// Start a session with an explicit spawn policy.
    pub fn with_policy<R: Rng + ?Sized>(policy: SpawnPolicy, rng: &mut R) -> Self {
        let mut session = Session {
            board: Board::EMPTY,
            phase: Phase::Playing,
            policy,
        };
        session.reseed(rng);
        session
    }

    /// Convenience: start a session using thread-local RNG.
    pub fn new_thread() -> Self {
        let mut rng = rand::thread_rng();
        Self::new(&mut rng)
    }

    /// The current board, read-only.
    #[inline]
    pub fn board(&self) -> Board {
        self.board
    }

    /// The current phase.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The spawn policy in effect.
    #[inline]
    pub fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    /// True once the session has reached `Terminal`. Cheap to poll per tick.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Terminal
    }

    /// Apply one directional move. Returns whether the board changed.
    ///
    /// A changing move is followed by exactly one spawn, then terminality
    /// is re-evaluated. A move that changes nothing consumes no turn and
    /// spawns nothing. In `Terminal` this is a no-op returning `false`.
    pub fn apply<R: Rng + ?Sized>(&mut self, direction: Direction, rng: &mut R) -> bool {
        if self.phase == Phase::Terminal {
            return false;
        }
        let (moved, changed) = engine::apply_move(self.board, direction);
        if !changed {
            return false;
        }
        self.board = moved.with_spawned_tile(rng, self.policy);
        if engine::is_terminal(self.board) {
            self.phase = Phase::Terminal;
        }
        true
    }

    /// Reset in place: fresh board re-seeded with two tiles, phase back to
    /// `Playing`. Valid from either phase.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.reseed(rng);
    }

    fn reseed<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.board = engine::create_empty()
            .with_spawned_tile(rng, self.policy)
            .with_spawned_tile(rng, self.policy);
        self.phase = Phase::Playing;
    }
}
