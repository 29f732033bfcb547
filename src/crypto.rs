//! Repeating-key XOR used by MANGA Plus to obfuscate page images.
//!
//! Each image byte is XOR-ed with the key byte at `index % key.len()`. The key
//! arrives hex-encoded next to the image URL. XOR is its own inverse, so the same
//! routine obfuscates and recovers the bytes. It deters hot-linking and offers no
//! confidentiality.
//!
//! ```rust
//! use tosho_mangaplus::crypto;
//!
//! let plain = crypto::decrypt_bytes(&[0x01, 0x02, 0x03], "ff").unwrap();
//! assert_eq!(plain, vec![0xFE, 0xFD, 0xFC]);
//! ```

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::{Error, Result};

/// Decodes a hexadecimal key into raw bytes.
///
/// Upper and lower case digits are accepted.
///
/// # Errors
///
/// * [`Error::Decode`] - On an empty key, an odd number of digits or a non-hex character
pub fn decode_key(key: &str) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::decode("Encryption key is empty"));
    }
    Ok(hex::decode(key)?)
}

/// XORs `data` with `key` repeated over its length.
///
/// # Errors
///
/// * [`Error::Decode`] - If `key` is empty
pub fn xor_with_key(data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    if key.is_empty() {
        return Err(Error::decode("Encryption key is empty"));
    }

    Ok(data
        .iter()
        .zip(key.iter().cycle())
        .map(|(byte, k)| byte ^ k)
        .collect())
}

/// Recovers image bytes using a hex-encoded key.
pub fn decrypt_bytes(data: &[u8], key_hex: &str) -> Result<Vec<u8>> {
    let key = decode_key(key_hex)?;
    xor_with_key(data, &key)
}

/// Recovers a base64-encoded image and returns it base64-encoded again.
///
/// # Errors
///
/// * [`Error::Decode`] - If `data` is not valid base64 or the key is invalid
pub fn decrypt_base64(data: &str, key_hex: &str) -> Result<String> {
    let ciphertext = STANDARD.decode(data.trim())?;
    let plaintext = decrypt_bytes(&ciphertext, key_hex)?;
    Ok(STANDARD.encode(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_known_vector() {
        let ciphertext = STANDARD.encode([0x01, 0x02, 0x03]);
        let decrypted = decrypt_base64(&ciphertext, "ff").unwrap();
        assert_eq!(STANDARD.decode(decrypted).unwrap(), vec![0xFE, 0xFD, 0xFC]);
    }

    #[test]
    fn test_key_repeats_over_data() {
        let data = [0x00, 0x00, 0x00, 0x00, 0x00];
        let key = [0x10, 0x20];
        assert_eq!(
            xor_with_key(&data, &key).unwrap(),
            vec![0x10, 0x20, 0x10, 0x20, 0x10]
        );
    }

    #[test]
    fn test_round_trip_for_various_lengths() {
        let keys = ["a5", "00ff", "0123456789abcdef", "DEADBEEF01"];
        for key in keys {
            for len in [0usize, 1, 2, 7, 64, 1000] {
                let plain: Vec<u8> = (0..len).map(|i| (i * 31 % 256) as u8).collect();
                let scrambled = decrypt_bytes(&plain, key).unwrap();
                let recovered = decrypt_bytes(&scrambled, key).unwrap();
                assert_eq!(recovered, plain, "key {} length {}", key, len);
            }
        }
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(decrypt_bytes(&[], "ff").unwrap().is_empty());
        assert_eq!(decrypt_base64("", "ff").unwrap(), "");
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let err = decrypt_bytes(&[1, 2, 3], "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        let err = xor_with_key(&[1, 2, 3], &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_malformed_key_is_rejected() {
        assert_eq!(decode_key("abc").unwrap_err().kind(), ErrorKind::Decode);
        assert_eq!(decode_key("zz").unwrap_err().kind(), ErrorKind::Decode);
        assert_eq!(decode_key("é1").unwrap_err().kind(), ErrorKind::Decode);
        assert_eq!(decode_key("+f").unwrap_err().kind(), ErrorKind::Decode);
        assert_eq!(decode_key("+f+1").unwrap_err().kind(), ErrorKind::Decode);
        assert_eq!(decode_key("-1").unwrap_err().kind(), ErrorKind::Decode);
        assert!(decrypt_bytes(&[1, 2, 3], "+f").is_err());
        assert_eq!(decode_key("0A0b").unwrap(), vec![0x0A, 0x0B]);
    }

    #[test]
    fn test_malformed_base64_is_rejected() {
        let err = decrypt_base64("not base64!", "ff").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
