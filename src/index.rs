//! Index arithmetic shared by the view, ROI, and cursor layers.
//!
//! Everything here is plain integer math over a column-major layout
//! (first dimension fastest): `strides[i] = sizes[0] * ... * sizes[i-1]`,
//! `flat = sum(index[d] * strides[d])`. Circular access reduces every
//! out-of-range position to `[0, len)` with a true modulo, so negative
//! positions wrap backwards instead of misbehaving like `%` would.

/// Wraps an unbounded signed index into `[0, len)` using true modulo.
///
/// Unlike the `%` operator, negative inputs wrap around the far end:
/// `circ_index(-1, 5) == 4`. This single primitive underlies every
/// circular access path in the crate.
///
/// # Panics
///
/// Panics if `len == 0`.
#[inline]
pub fn circ_index(index: isize, len: usize) -> usize {
    assert!(len > 0, "circular index into zero-length buffer");
    let len = len as isize;
    (((index % len) + len) % len) as usize
}

/// Linearizes a multi-index against per-dimension strides.
///
/// Equivalent to the accumulation form `partial = index[d] * prod(sizes[0..d))`
/// summed over dimensions.
#[inline]
pub fn flat_index(indices: &[usize], strides: &[usize]) -> usize {
    debug_assert_eq!(indices.len(), strides.len());
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&i, &s)| i * s)
        .sum()
}

/// Decomposes a flat index into per-dimension coordinates.
///
/// Walks the strides right to left: the highest dimension is recovered by
/// integer division, lower dimensions by the remainder. Inverse of
/// [`flat_index`] for coordinates inside the shape.
#[inline]
pub fn decompose(flat: usize, strides: &[usize], coords: &mut [usize]) {
    debug_assert_eq!(strides.len(), coords.len());
    let mut rem = flat;
    for d in (0..strides.len()).rev() {
        debug_assert!(strides[d] > 0, "decompose over degenerate stride");
        coords[d] = rem / strides[d];
        rem %= strides[d];
    }
}

/// Product of all extents, `None` on `usize` overflow.
///
/// An empty shape has volume 0, not 1: a buffer with no dimensions holds
/// nothing.
#[inline]
pub fn checked_volume(sizes: &[usize]) -> Option<usize> {
    if sizes.is_empty() || sizes.contains(&0) {
        return Some(0);
    }
    sizes.iter().try_fold(1usize, |acc, &s| acc.checked_mul(s))
}

/// Product of all extents.
///
/// # Panics
///
/// Panics if the product overflows `usize`.
#[inline]
pub fn volume(sizes: &[usize]) -> usize {
    match checked_volume(sizes) {
        Some(v) => v,
        None => panic!("shape volume overflows usize: {:?}", sizes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circ_index_wraps_forward_and_backward() {
        assert_eq!(circ_index(-1, 5), 4);
        assert_eq!(circ_index(5, 5), 0);
        assert_eq!(circ_index(7, 5), 2);
        assert_eq!(circ_index(0, 5), 0);
        assert_eq!(circ_index(-5, 5), 0);
        assert_eq!(circ_index(-7, 5), 3);
    }

    #[test]
    fn circ_index_is_periodic() {
        for i in -37isize..37 {
            for k in -3isize..4 {
                let len = 7usize;
                assert_eq!(circ_index(i, len), circ_index(i + k * len as isize, len));
            }
        }
    }

    #[test]
    fn circ_index_stays_in_range() {
        for i in -100isize..100 {
            let w = circ_index(i, 9);
            assert!(w < 9);
        }
    }

    #[test]
    #[should_panic(expected = "zero-length")]
    fn circ_index_rejects_empty() {
        circ_index(3, 0);
    }

    #[test]
    fn flat_and_decompose_round_trip() {
        // Shape (3, 4, 2), column-major strides (1, 3, 12).
        let strides = [1usize, 3, 12];
        let sizes = [3usize, 4, 2];
        for p in 0..sizes[2] {
            for c in 0..sizes[1] {
                for r in 0..sizes[0] {
                    let flat = flat_index(&[r, c, p], &strides);
                    let mut coords = [0usize; 3];
                    decompose(flat, &strides, &mut coords);
                    assert_eq!(coords, [r, c, p]);
                }
            }
        }
    }

    #[test]
    fn flat_index_matches_column_major_convention() {
        // (row, col) -> col * rows + row on a 4 x 3 shape.
        let strides = [1usize, 4];
        assert_eq!(flat_index(&[2, 1], &strides), 1 * 4 + 2);
        // (row, col, page) -> page * cols * rows + col * rows + row.
        let strides = [1usize, 4, 12];
        assert_eq!(flat_index(&[2, 1, 1], &strides), 12 + 4 + 2);
    }

    #[test]
    fn volume_of_shapes() {
        assert_eq!(checked_volume(&[]), Some(0));
        assert_eq!(checked_volume(&[4]), Some(4));
        assert_eq!(checked_volume(&[3, 4, 2]), Some(24));
        assert_eq!(checked_volume(&[3, 0, 2]), Some(0));
        assert_eq!(checked_volume(&[usize::MAX, usize::MAX, 0]), Some(0));
        assert_eq!(checked_volume(&[usize::MAX, 2]), None);
        assert_eq!(volume(&[5, 5]), 25);
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn volume_panics_on_overflow() {
        volume(&[usize::MAX, 3]);
    }
}
