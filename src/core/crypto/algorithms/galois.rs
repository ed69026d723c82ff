/*!
Galois-field arithmetic for the Feistel cipher's S-boxes.

Field elements are polynomials over GF(2) packed into a `u16`. The
arithmetic runs on the full 16-bit register: a modulus that does not
carry the field's top bit (the 11-bit field's 0xA7) leaves high bits in
place, and those bits flow into the next multiplication exactly as the
S-box tables expect.
*/

/// Modulus of the 13-bit field used by S1
pub const S1_MODULUS: u16 = 0x2911;

/// Width of the S1 field
pub const S1_BITS: u32 = 13;

/// Modulus of the 11-bit field used by S2
pub const S2_MODULUS: u16 = 0xA7;

/// Width of the S2 field
pub const S2_BITS: u32 = 11;

/// Carry-less multiplication of `a` and `b`, reduced by `modulus`
///
/// Walks the low `bits` bits of `b`; whenever the shifted copy of `a`
/// reaches bit `bits` it is reduced by XOR with the modulus.
pub fn gf_multiply(a: u16, mut b: u16, modulus: u16, bits: u32) -> u16 {
    let mut result = 0u16;
    let mut ax = a;
    for _ in 0..bits {
        if b & 1 != 0 {
            result ^= ax;
        }
        ax <<= 1;
        if ax & (1 << bits) != 0 {
            ax ^= modulus;
        }
        b >>= 1;
    }
    result
}

/// Cube of `x` in the field
pub fn gf_cube(x: u16, modulus: u16, bits: u32) -> u16 {
    let squared = gf_multiply(x, x, modulus, bits);
    gf_multiply(squared, x, modulus, bits)
}

/// S-box over GF(2^13): invert, cube, keep the low byte
pub fn s1(x: u16) -> u8 {
    let x = !x & 0x1FFF;
    (gf_cube(x, S1_MODULUS, S1_BITS) & 0xFF) as u8
}

/// S-box over GF(2^11): invert, cube, keep the low byte
pub fn s2(x: u16) -> u8 {
    let x = !x & 0x07FF;
    (gf_cube(x, S2_MODULUS, S2_BITS) & 0xFF) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiply_by_one_is_identity() {
        for x in [0u16, 1, 0x155, 0x7FF, 0x1ABC] {
            assert_eq!(gf_multiply(x & 0x1FFF, 1, S1_MODULUS, S1_BITS), x & 0x1FFF);
        }
    }

    #[test]
    fn test_multiply_small_polynomials() {
        // (x + 1) * (x + 1) = x^2 + 1 over GF(2)
        assert_eq!(gf_multiply(0b11, 0b11, S1_MODULUS, S1_BITS), 0b101);
        // x * x^2 = x^3
        assert_eq!(gf_multiply(0b10, 0b100, S2_MODULUS, S2_BITS), 0b1000);
    }

    #[test]
    fn test_multiply_reduces_in_13_bit_field() {
        // x^12 * x = x^13, which reduces to 0x2911 ^ 0x2000
        assert_eq!(gf_multiply(1 << 12, 0b10, S1_MODULUS, S1_BITS), 0x0911);
    }

    #[test]
    fn test_multiply_is_commutative() {
        for (a, b) in [(0x123u16, 0x456u16), (0x1FFF, 0x0FFF), (0x0AB, 0x1C0)] {
            assert_eq!(
                gf_multiply(a, b, S1_MODULUS, S1_BITS),
                gf_multiply(b, a, S1_MODULUS, S1_BITS)
            );
        }
    }

    #[test]
    fn test_cube_matches_repeated_multiply() {
        let x = 0x0ABC;
        let expected = gf_multiply(gf_multiply(x, x, S1_MODULUS, S1_BITS), x, S1_MODULUS, S1_BITS);
        assert_eq!(gf_cube(x, S1_MODULUS, S1_BITS), expected);
    }

    #[test]
    fn test_sboxes_of_all_ones() {
        // Inputs whose field inversion is zero cube to zero
        assert_eq!(s1(0x1FFF), 0);
        assert_eq!(s2(0x07FF), 0);
    }

    #[test]
    fn test_sboxes_are_deterministic_and_not_constant() {
        let first: Vec<u8> = (0..=255u16).map(s1).collect();
        let second: Vec<u8> = (0..=255u16).map(s1).collect();
        assert_eq!(first, second);
        assert!(first.iter().any(|&b| b != first[0]));

        let s2_values: Vec<u8> = (0..=255u16).map(s2).collect();
        assert!(s2_values.iter().any(|&b| b != s2_values[0]));
    }
}
