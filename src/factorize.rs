//! Divisor listing
//!
//! Independent of the sorter: each number is handled on its own, so a batch
//! is a plain parallel map over a rayon pool.

use crate::error::Result;
use rayon::prelude::*;
use std::collections::VecDeque;

/// All divisors of `number` in ascending order
///
/// Trial division up to the square root; each small divisor is paired with
/// its cofactor. `0` has no finite divisor list and yields an empty vector.
pub fn divisors(number: u64) -> Vec<u64> {
    if number == 0 {
        return Vec::new();
    }

    let mut low = Vec::new();
    let mut high = VecDeque::new();
    let mut i = 1u64;
    while i <= number / i {
        if number % i == 0 {
            low.push(i);
            let pair = number / i;
            if pair != i {
                high.push_front(pair);
            }
        }
        i += 1;
    }

    low.extend(high);
    low
}

/// Divisors of every number, in input order, computed in parallel
pub fn divisors_parallel(numbers: &[u64]) -> Vec<Vec<u64>> {
    numbers.par_iter().map(|&n| divisors(n)).collect()
}

/// Same as [`divisors_parallel`] on a dedicated pool of `threads` threads
/// (0 = one per CPU)
pub fn divisors_with_threads(numbers: &[u64], threads: usize) -> Result<Vec<Vec<u64>>> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    Ok(pool.install(|| divisors_parallel(numbers)))
}
