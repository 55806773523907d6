//! Track selection policy for next/previous
//!
//! Sequential navigation wraps around the playlist. Shuffle picks
//! uniformly among every index except the current one; there is no
//! history, so "previous" under shuffle is just another random pick.

use rand::Rng;

/// Index to play after `current`
pub fn next_index<R: Rng + ?Sized>(current: usize, len: usize, shuffle: bool, rng: &mut R) -> usize {
    if shuffle {
        random_other(current, len, rng)
    } else if len == 0 {
        0
    } else {
        (current + 1) % len
    }
}

/// Index to play before `current`
pub fn previous_index<R: Rng + ?Sized>(
    current: usize,
    len: usize,
    shuffle: bool,
    rng: &mut R,
) -> usize {
    if shuffle {
        random_other(current, len, rng)
    } else if len == 0 {
        0
    } else {
        (current % len + len - 1) % len
    }
}

/// Uniform pick over `0..len` excluding `current`
///
/// With one track or fewer there is nothing else to pick, so the answer
/// is 0.
fn random_other<R: Rng + ?Sized>(current: usize, len: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return 0;
    }

    if current >= len {
        return rng.gen_range(0..len);
    }

    // Draw from len - 1 slots and skip over the current index
    let pick = rng.gen_range(0..len - 1);
    if pick >= current {
        pick + 1
    } else {
        pick
    }
}
