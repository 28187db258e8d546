pub mod io;

use crate::sha1::BLOCK_SIZE;

pub fn to_string(bytes: &[u8]) -> String {
     bytes.iter().map(|&byte| format!("{byte:02x}")).collect::<Vec<_>>().join("")
}

/// Packs a block into the first 16 words of an `N` word array, big-endian.
/// Words past the 16th are left zeroed for the caller's message schedule.
pub fn be_words<const N: usize>(block: &[u8; BLOCK_SIZE]) -> [u32; N] {
    const { assert!(N >= BLOCK_SIZE / 4, "output must hold at least 16 words") };
    let mut w: [u32; N] = [0; N];
    for (word, chunk) in w.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    w
}

pub fn be_bytes<const M: usize, const N: usize>(ints: [u32; M]) -> [u8; N] {
    const { assert!(M * 4 == N, "`N` expected to be 4 * `M`") };
    let mut arr: [u8; N] = [0; N];
    for (chunk, word) in arr.chunks_exact_mut(4).zip(ints.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    arr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_string_is_lower_case_and_padded() {
        assert_eq!(to_string(&[0x00, 0x0f, 0xab, 0xff]), "000fabff");
        assert_eq!(to_string(&[]), "");
    }

    #[test]
    fn words_are_packed_big_endian() {
        let mut block = [0u8; BLOCK_SIZE];
        block[..8].copy_from_slice(&[0x01, 0x02, 0x03, 0x04, 0xFF, 0x00, 0xFF, 0x00]);
        block[63] = 0x7F;
        let w = be_words::<80>(&block);
        assert_eq!(w[0], 0x0102_0304);
        assert_eq!(w[1], 0xFF00_FF00);
        assert_eq!(w[15], 0x0000_007F);
        assert!(w[16..].iter().all(|&x| x == 0));
    }

    #[test]
    fn bytes_are_unpacked_big_endian() {
        let bytes: [u8; 8] = be_bytes([0x6745_2301, 0xEFCD_AB89]);
        assert_eq!(bytes, [0x67, 0x45, 0x23, 0x01, 0xEF, 0xCD, 0xAB, 0x89]);
    }
}
