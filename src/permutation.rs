//! Random permutations of point indices.
//!
//! Permutations are drawn with a caller-supplied rng so searches stay
//! reproducible under a fixed seed.

use rand::prelude::*;

/// The identity permutation of `[0, n)`
pub fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// Draw a uniformly random permutation of `[0, n)`
pub fn random_permutation(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut perm = identity(n);
    perm.shuffle(rng);
    perm
}

/// True when `order` contains every index in `[0, order.len())` exactly once
pub fn is_permutation(order: &[usize]) -> bool {
    let mut seen = vec![false; order.len()];
    for &v in order {
        if v >= order.len() || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}
