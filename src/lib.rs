//! twenty48: the board engine of a 4x4 sliding-tile merge puzzle
//!
//! This crate provides:
//! - A `Board` type with ergonomic methods (`apply_move`, `with_spawned_tile`,
//!   `is_terminal`, ...) over a row-major grid of tile values
//! - The canonical slide-reduce pass all four directions share, built on a
//!   single quarter-turn rotation primitive (`engine` module)
//! - A `Session` state machine (`Playing`/`Terminal`, restart) for driving
//!   loops (`session` module)
//!
//! Rendering and input translation are deliberately out of scope: a
//! presentation layer reads cells via `Board::get` and feeds back one of the
//! four `Direction`s per input event.
//!
//! Quick start:
//! ```
//! use twenty48::engine::Direction;
//! use twenty48::session::Session;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic session with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut session = Session::new(&mut rng);
//! let changed = session.apply(Direction::Left, &mut rng);
//! if changed {
//!     // the engine spawned exactly one new tile after the move
//!     assert!(session.board().count_empty() >= 12);
//! }
//! ```
//!
//! Note: For convenience, there are also free functions mirroring the `Board`
//! methods (e.g., `engine::apply_move`, `engine::spawn_tile`) and `*_thread`
//! variants using thread-local RNG. Prefer the RNG-taking forms when you need
//! determinism.
//!
pub mod engine;
pub mod session;
