//! Shared plumbing for the population synthesizer: a hierarchical timer with
//! deterministic parallelism, RNG forking, logging, and a few collection helpers.

mod collections;
mod logger;
mod random;
mod time;
mod utils;

pub use crate::collections::MultiMap;
pub use crate::logger::Logger;
pub use crate::random::fork_rng;
pub use crate::time::{elapsed_seconds, prettyprint_time, Timer};
pub use crate::utils::prettyprint_usize;

const PROGRESS_FREQUENCY_SECONDS: f64 = 0.2;
