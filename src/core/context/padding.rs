/*!
Padding schemes for block-aligned encryption.

Padding is never empty: a plaintext that is already block-aligned gets a
full block of padding, so removal always has a length byte to read
(except for zero padding, which has none).
*/

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::core::crypto::config::PaddingScheme;
use crate::core::error::{Error, PaddingError, Result};
use crate::padding_err;

/// Number of padding bytes appended to `len` bytes of data
pub fn padding_len(len: usize, block_size: usize) -> usize {
    block_size - (len % block_size)
}

/// Append padding so the result is a non-empty multiple of `block_size`
pub fn add_padding(data: &[u8], block_size: usize, scheme: PaddingScheme) -> Result<Vec<u8>> {
    let pad = padding_len(data.len(), block_size);
    if scheme != PaddingScheme::Zeros && pad > 255 {
        return padding_err!(PaddingError::TooLong(pad));
    }

    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    match scheme {
        PaddingScheme::Zeros => out.resize(data.len() + pad, 0),
        PaddingScheme::AnsiX923 => {
            out.resize(data.len() + pad - 1, 0);
            out.push(pad as u8);
        }
        PaddingScheme::Pkcs7 => out.resize(data.len() + pad, pad as u8),
        PaddingScheme::Iso10126 => {
            let mut fill = vec![0u8; pad - 1];
            OsRng
                .try_fill_bytes(&mut fill)
                .map_err(|e| Error::Entropy(format!("failed to generate padding: {}", e)))?;
            out.extend_from_slice(&fill);
            out.push(pad as u8);
        }
    }
    Ok(out)
}

/// Strip padding, validating it as far as the scheme allows
///
/// Zero padding strips every trailing zero byte, including zeros that
/// belonged to the plaintext.
pub fn remove_padding(data: &[u8], scheme: PaddingScheme) -> Result<Vec<u8>> {
    if data.is_empty() {
        return padding_err!(PaddingError::Empty);
    }

    if scheme == PaddingScheme::Zeros {
        let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        return Ok(data[..end].to_vec());
    }

    let pad = data[data.len() - 1] as usize;
    if pad == 0 || pad > data.len() {
        return padding_err!(PaddingError::InvalidLength(pad));
    }
    let (body, tail) = data.split_at(data.len() - pad);

    if scheme == PaddingScheme::Pkcs7 && tail.iter().any(|&b| b as usize != pad) {
        return padding_err!(PaddingError::Mismatch);
    }
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    #[test]
    fn test_padding_is_never_empty() {
        assert_eq!(padding_len(0, 16), 16);
        assert_eq!(padding_len(16, 16), 16);
        assert_eq!(padding_len(20, 16), 12);
        assert_eq!(padding_len(15, 16), 1);
    }

    #[test]
    fn test_pkcs7_layout() {
        let padded = add_padding(b"YELLOW SUBMARINE1234", 16, PaddingScheme::Pkcs7).unwrap();
        assert_eq!(padded.len(), 32);
        assert!(padded[20..].iter().all(|&b| b == 12));
        assert_eq!(remove_padding(&padded, PaddingScheme::Pkcs7).unwrap(), b"YELLOW SUBMARINE1234");
    }

    #[test]
    fn test_ansi_x923_layout() {
        let padded = add_padding(b"abc", 8, PaddingScheme::AnsiX923).unwrap();
        assert_eq!(padded, vec![b'a', b'b', b'c', 0, 0, 0, 0, 5]);
        assert_eq!(remove_padding(&padded, PaddingScheme::AnsiX923).unwrap(), b"abc");
    }

    #[test]
    fn test_iso10126_layout() {
        let padded = add_padding(&[1u8; 16], 16, PaddingScheme::Iso10126).unwrap();
        assert_eq!(padded.len(), 32);
        assert_eq!(padded[31], 16);
        assert_eq!(remove_padding(&padded, PaddingScheme::Iso10126).unwrap(), vec![1u8; 16]);
    }

    #[test]
    fn test_iso10126_fill_comes_from_the_os() {
        let a = add_padding(&[], 64, PaddingScheme::Iso10126).unwrap();
        let b = add_padding(&[], 64, PaddingScheme::Iso10126).unwrap();
        assert_eq!((a[63], b[63]), (64, 64));
        assert_ne!(a[..63], b[..63]);
        assert!(a[..63].iter().any(|&byte| byte != 0));
    }

    #[test]
    fn test_zeros_strip_plaintext_zeros_too() {
        let padded = add_padding(&[7, 0, 0], 8, PaddingScheme::Zeros).unwrap();
        assert_eq!(padded, vec![7, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(remove_padding(&padded, PaddingScheme::Zeros).unwrap(), vec![7]);
        assert_eq!(remove_padding(&[0u8; 8], PaddingScheme::Zeros).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_pkcs7_rejects_bad_padding() {
        let mut block = vec![b'x'; 13];
        block.extend_from_slice(&[3, 2, 3]);
        assert!(matches!(
            remove_padding(&block, PaddingScheme::Pkcs7),
            Err(Error::Padding(PaddingError::Mismatch))
        ));

        let zero_tail = [1u8, 2, 3, 0];
        assert!(matches!(
            remove_padding(&zero_tail, PaddingScheme::Pkcs7),
            Err(Error::Padding(PaddingError::InvalidLength(0)))
        ));

        let oversized = [9u8, 9, 9, 9];
        assert!(matches!(
            remove_padding(&oversized, PaddingScheme::Pkcs7),
            Err(Error::Padding(PaddingError::InvalidLength(9)))
        ));
    }

    #[test]
    fn test_length_byte_schemes_reject_zero_and_overlong() {
        for scheme in [PaddingScheme::AnsiX923, PaddingScheme::Iso10126] {
            assert!(remove_padding(&[5, 5, 0], scheme).is_err());
            assert!(remove_padding(&[1, 2, 200], scheme).is_err());
        }
    }

    #[test]
    fn test_empty_input_cannot_be_unpadded() {
        for scheme in PaddingScheme::ALL {
            assert!(matches!(
                remove_padding(&[], scheme),
                Err(Error::Padding(PaddingError::Empty))
            ));
        }
    }

    #[test]
    fn test_oversized_blocks_are_rejected() {
        assert!(matches!(
            add_padding(&[], 256, PaddingScheme::Pkcs7),
            Err(Error::Padding(PaddingError::TooLong(256)))
        ));
        assert!(add_padding(&[], 256, PaddingScheme::Zeros).is_ok());
    }
}
