use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use sha2::{Digest, Sha256};

/// Maximum number of recommendations returned
pub const TOP_N: usize = 5;

/// How far down the ranking a randomized request may reach
pub const SHUFFLE_WINDOW: usize = 10;

/// Picks the final recommendations from a ranked pool
///
/// Without `randomize` this is the top [`TOP_N`] in rank order. With it, the
/// top [`SHUFFLE_WINDOW`] are shuffled and the first [`TOP_N`] returned. A
/// `seed` makes the shuffle reproducible; without one it uses fresh entropy.
pub fn sample<T>(mut pool: Vec<T>, randomize: bool, seed: Option<&str>) -> Vec<T> {
    if randomize {
        pool.truncate(SHUFFLE_WINDOW);
        match seed {
            Some(seed) => pool.shuffle(&mut seeded_rng(seed)),
            None => pool.shuffle(&mut rand::rng()),
        }
    }

    pool.truncate(TOP_N);
    pool
}

/// Deterministic generator derived from an arbitrary seed string
pub fn seeded_rng(seed: &str) -> StdRng {
    let digest: [u8; 32] = Sha256::digest(seed.as_bytes()).into();
    StdRng::from_seed(digest)
}
