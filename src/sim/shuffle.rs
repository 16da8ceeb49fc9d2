//! Subject queue shuffling

use rand::Rng;

/// Fisher-Yates shuffle: walk from the last index down, swapping each slot
/// with a uniformly chosen slot at or before it.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
