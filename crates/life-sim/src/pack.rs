//! Packed-bit cell encoding: 8 cells per byte, LSB first.

/// Packs booleans into bytes; bit `i % 8` of byte `i / 8` is cell `i`.
///
/// A trailing partial byte is zero-padded.
pub fn compact(cells: &[bool]) -> Vec<u8> {
    cells
        .chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (bit, &alive)| byte | ((alive as u8) << bit))
        })
        .collect()
}

/// Inverse of [`compact`]. Always yields `bytes.len() * 8` cells.
pub fn expand(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).map(move |bit| byte & (1 << bit) != 0))
        .collect()
}

/// Packs one-byte-per-cell data (nonzero = alive).
pub fn compact_bytes(cells: &[u8]) -> Vec<u8> {
    let bools: Vec<bool> = cells.iter().map(|&c| c != 0).collect();
    compact(&bools)
}

/// Unpacks to one byte per cell, truncated to `cell_count`.
pub fn expand_bytes(bytes: &[u8], cell_count: usize) -> Vec<u8> {
    let mut cells: Vec<u8> = expand(bytes).into_iter().map(u8::from).collect();
    cells.truncate(cell_count);
    cells
}

/// Number of packed bytes needed for `cell_count` cells.
#[inline]
pub fn packed_len(cell_count: usize) -> usize {
    cell_count.div_ceil(8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn bit_order_is_lsb_first() {
        let mut cells = [false; 16];
        cells[0] = true;
        cells[3] = true;
        cells[15] = true;
        assert_eq!(compact(&cells), vec![0b0000_1001, 0b1000_0000]);
    }

    #[test]
    fn expand_inverts_compact() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [8usize, 64, 8 * 37] {
            let cells: Vec<bool> = (0..len).map(|_| rng.random_bool(0.5)).collect();
            assert_eq!(expand(&compact(&cells)), cells);
        }
    }

    #[test]
    fn partial_byte_is_zero_padded() {
        let packed = compact(&[true, true, true]);
        assert_eq!(packed, vec![0b111]);
        assert_eq!(expand_bytes(&packed, 3), vec![1, 1, 1]);
        assert_eq!(packed_len(3), 1);
        assert_eq!(packed_len(16), 2);
    }
}
