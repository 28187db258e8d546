use crate::util::be_words;

use super::BLOCK_SIZE;

const K0: u32 = 0x5A827999;
const K1: u32 = 0x6ED9EBA1;
const K2: u32 = 0x8F1BBCDC;
const K3: u32 = 0xCA62C1D6;

/// Folds one 64 byte block into the running state and returns the new state.
///
/// The result is the old state plus the output of the 80 rounds, word by word,
/// with every addition wrapping modulo 2^32.
pub fn compress(state: [u32; 5], block: &[u8; BLOCK_SIZE]) -> [u32; 5] {
    let mut w: [u32; 80] = be_words::<80>(block);

    for i in 16..80 {
        w[i] = (w[i-3] ^ w[i-8] ^ w[i-14] ^ w[i-16]).rotate_left(1);
    }

    let [mut a, mut b, mut c, mut d, mut e] = state;

    for (i, word) in w.iter().enumerate() {
        let (f, k) = match i {
            0..=19 => ((b & c) | ((!b) & d), K0),
            20..=39 => (b ^ c ^ d, K1),
            40..=59 => ((b & c) | (b & d) | (c & d), K2),
            _ => (b ^ c ^ d, K3),
        };
        let temp = a.rotate_left(5)
                         .wrapping_add(f)
                         .wrapping_add(e)
                         .wrapping_add(k)
                         .wrapping_add(*word);
        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = temp;
    }

    [
        state[0].wrapping_add(a),
        state[1].wrapping_add(b),
        state[2].wrapping_add(c),
        state[3].wrapping_add(d),
        state[4].wrapping_add(e),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sha1::IV;

    fn padded_abc() -> [u8; BLOCK_SIZE] {
        let mut block = [0u8; BLOCK_SIZE];
        block[..3].copy_from_slice(b"abc");
        block[3] = 0x80;
        block[63] = 24;
        block
    }

    #[test]
    fn single_padded_block_yields_abc_state() {
        let state = compress(IV, &padded_abc());
        assert_eq!(state, [0xA9993E36, 0x4706816A, 0xBA3E2571, 0x7850C26C, 0x9CD0D89D]);
    }

    #[test]
    fn compress_is_pure() {
        let block = [0x5Au8; BLOCK_SIZE];
        assert_eq!(compress(IV, &block), compress(IV, &block));
    }

    #[test]
    fn saturated_state_wraps() {
        let state = compress([u32::MAX; 5], &[0xFF; BLOCK_SIZE]);
        assert_ne!(state, [u32::MAX; 5]);
    }
}
