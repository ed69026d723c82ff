/*!
Byte-slice arithmetic shared by the ciphers and the mode engine.

Every helper checks operand lengths and reports a mismatch as an error
instead of panicking.
*/

use crate::core::error::{CryptoError, Result};
use crate::crypto_err;

fn check_lengths(a: &[u8], b: &[u8]) -> Result<()> {
    if a.len() != b.len() {
        return crypto_err!(CryptoError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// XOR two equally long slices
pub fn xor_bytes(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x ^ y).collect())
}

/// Add two big-endian integers of equal width, dropping the final carry
pub fn add_bytes(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    check_lengths(a, b)?;
    let mut result = vec![0u8; a.len()];
    let mut carry = 0u16;
    for i in (0..a.len()).rev() {
        let sum = u16::from(a[i]) + u16::from(b[i]) + carry;
        result[i] = sum as u8;
        carry = sum >> 8;
    }
    Ok(result)
}

/// Subtract two big-endian integers of equal width, wrapping on borrow
pub fn sub_bytes(a: &[u8], b: &[u8]) -> Result<Vec<u8>> {
    check_lengths(a, b)?;
    let mut result = vec![0u8; a.len()];
    let mut borrow = 0i16;
    for i in (0..a.len()).rev() {
        let mut diff = i16::from(a[i]) - i16::from(b[i]) - borrow;
        borrow = 0;
        if diff < 0 {
            diff += 256;
            borrow = 1;
        }
        result[i] = diff as u8;
    }
    Ok(result)
}

/// Add `index` to a big-endian counter block, wrapping at its width
pub fn add_counter(counter: &[u8], index: u64) -> Vec<u8> {
    let mut result = counter.to_vec();
    let mut carry = u128::from(index);
    for byte in result.iter_mut().rev() {
        if carry == 0 {
            break;
        }
        let sum = u128::from(*byte) + (carry & 0xFF);
        *byte = sum as u8;
        carry = (carry >> 8) + (sum >> 8);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    #[test]
    fn test_xor() {
        assert_eq!(xor_bytes(&[0xF0, 0x0F], &[0xFF, 0xFF]).unwrap(), vec![0x0F, 0xF0]);
    }

    #[test]
    fn test_length_mismatch_is_an_error() {
        let result = xor_bytes(&[1, 2, 3], &[1, 2]);
        assert!(matches!(
            result,
            Err(Error::Crypto(CryptoError::LengthMismatch { left: 3, right: 2 }))
        ));
        assert!(xor_bytes(&[], &[0]).is_err());
        assert!(add_bytes(&[1], &[]).is_err());
        assert!(sub_bytes(&[], &[1]).is_err());
    }

    #[test]
    fn test_add_carries_and_wraps() {
        assert_eq!(add_bytes(&[0x00, 0xFF], &[0x00, 0x01]).unwrap(), vec![0x01, 0x00]);
        assert_eq!(add_bytes(&[0xFF, 0xFF], &[0x00, 0x01]).unwrap(), vec![0x00, 0x00]);
    }

    #[test]
    fn test_sub_inverts_add() {
        let a = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        let b = [0xFF, 0x00, 0xEE, 0x11, 0xDD, 0x22, 0xCC, 0x33];
        let sum = add_bytes(&a, &b).unwrap();
        assert_eq!(sub_bytes(&sum, &b).unwrap(), a.to_vec());
    }

    #[test]
    fn test_add_matches_wrapping_u64() {
        let a = 0xFFFF_0000_1234_5678u64;
        let b = 0x0001_FFFF_FFFF_FFFFu64;
        let sum = add_bytes(&a.to_be_bytes(), &b.to_be_bytes()).unwrap();
        assert_eq!(sum, a.wrapping_add(b).to_be_bytes().to_vec());
        let diff = sub_bytes(&b.to_be_bytes(), &a.to_be_bytes()).unwrap();
        assert_eq!(diff, b.wrapping_sub(a).to_be_bytes().to_vec());
    }

    #[test]
    fn test_add_counter() {
        assert_eq!(add_counter(&[0, 0, 0xFF], 1), vec![0, 1, 0]);
        assert_eq!(add_counter(&[0, 0, 0], 0x0102), vec![0, 1, 2]);
        assert_eq!(add_counter(&[0xFF, 0xFF], 1), vec![0, 0]);
        assert_eq!(add_counter(&[7; 4], 0), vec![7; 4]);
        assert_eq!(add_counter(&[0; 16], u64::MAX), [vec![0; 8], vec![0xFF; 8]].concat());
        assert_eq!(add_counter(&[0xFF; 8], u64::MAX), vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]);
    }
}
