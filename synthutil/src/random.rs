use rand::{RngCore, SeedableRng};
use rand_xorshift::XorShiftRng;

/// Derive a new generator from an existing one. Keeps outcomes consistent between two different
/// consumers when each one might make slightly different sequences of calls to its own RNG.
pub fn fork_rng(base_rng: &mut XorShiftRng) -> XorShiftRng {
    XorShiftRng::from_seed([base_rng.next_u32() as u8; 16])
}
