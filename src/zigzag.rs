//! Zigzag coefficient reordering
//!
//! Maps a `size × size` block to a 1D sequence by walking the
//! anti-diagonals from the top-left corner, alternating direction on
//! every diagonal. Low-frequency coefficients land first and
//! similar-frequency coefficients land adjacently, which lengthens the
//! zero runs the entropy coder feeds on. `unzigzag` is the exact
//! structural inverse.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Visit order for a `size × size` block: `order[k]` is the row-major
/// index of the k-th coefficient in scan order. Every cell appears
/// exactly once.
#[must_use]
pub fn scan_order(size: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(size * size);
    for d in 0..(2 * size - 1) {
        // Cells on diagonal d satisfy row + col == d.
        let lo = d.saturating_sub(size - 1);
        let hi = d.min(size - 1);
        if d % 2 == 0 {
            // Walk up-right: start at the highest row.
            for row in (lo..=hi).rev() {
                order.push(row * size + (d - row));
            }
        } else {
            for row in lo..=hi {
                order.push(row * size + (d - row));
            }
        }
    }
    order
}

/// Reorder a block into scan order.
#[must_use]
pub fn zigzag(block: &[i16], size: usize) -> Vec<i16> {
    debug_assert_eq!(block.len(), size * size);
    scan_order(size).iter().map(|&idx| block[idx]).collect()
}

/// Restore row-major order from a scanned sequence.
#[must_use]
pub fn unzigzag(scanned: &[i16], size: usize) -> Vec<i16> {
    debug_assert_eq!(scanned.len(), size * size);
    let mut block = vec![0i16; size * size];
    for (k, &idx) in scan_order(size).iter().enumerate() {
        block[idx] = scanned[k];
    }
    block
}
