//! Pipeline entry points for board watching.
//!
//! - `run_watch`: Bootstrap every board, then scan them on an interval
//! - `Watcher::run_round`: Scan every board once and deliver matches
//! - `run_validate`: Check a configuration and summarize it

pub mod validate;
pub mod watch;

pub use validate::run_validate;
pub use watch::{RoundStats, Watcher, run_watch};
