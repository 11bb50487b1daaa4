//! Unpadded base64url (RFC 4648 §5), the encoding WebAuthn uses for every
//! binary field on the wire.

use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::Base64UrlError;

/// Encodes without padding and decodes leniently: trailing bits that a
/// canonical encoder would have zeroed are accepted, as browsers do.
const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Encode `bytes` as unpadded base64url.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    ENGINE.encode(bytes)
}

/// Decode base64url `input`, padded or not.
///
/// Padding is stripped and re-derived from the remaining length, so `"AQ"`,
/// `"AQ=="` and `"AQ="` all decode to `[1]`.
///
/// # Errors
///
/// Returns [`Base64UrlError::MalformedEncoding`] when `input` contains a
/// character outside the base64url alphabet, or its length can not be the
/// length of any encoding (`len % 4 == 1`).
pub fn decode(input: &str) -> Result<Vec<u8>, Base64UrlError> {
    let unpadded = input.trim_end_matches('=');
    Ok(ENGINE.decode(unpadded)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[idcloud_macros::test]
    fn it_encodes_without_padding() {
        assert_eq!(encode(b""), "");
        assert_eq!(encode([0xfb_u8]), "-w");
        assert_eq!(encode([0xfb_u8, 0xff]), "-_8");
        assert_eq!(encode([0xfb_u8, 0xff, 0xbf]), "-_-_");
    }

    #[idcloud_macros::test]
    fn it_decodes_padded_and_unpadded_input() {
        assert_eq!(decode("AQ").unwrap(), vec![1]);
        assert_eq!(decode("AQ==").unwrap(), vec![1]);
        assert_eq!(decode("AQI=").unwrap(), vec![1, 2]);
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[idcloud_macros::test]
    fn it_rejects_the_standard_alphabet() {
        assert!(matches!(
            decode("+/8"),
            Err(Base64UrlError::MalformedEncoding(_))
        ));
    }

    #[idcloud_macros::test]
    fn it_rejects_impossible_lengths() {
        assert!(decode("AAAAA").is_err());
    }

    #[idcloud_macros::test]
    fn it_round_trips_every_length_class() {
        for len in 0..8usize {
            let bytes: Vec<u8> = (0..len as u8).map(|b| b.wrapping_mul(37)).collect();
            assert_eq!(decode(&encode(&bytes)).unwrap(), bytes, "length {len}");
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod properties {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decode_inverts_encode(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
                prop_assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
            }

            #[test]
            fn padded_input_decodes_like_unpadded(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
                let unpadded = encode(&bytes);
                let padding = (4 - unpadded.len() % 4) % 4;
                let padded = format!("{unpadded}{}", "=".repeat(padding));
                prop_assert_eq!(decode(&padded).unwrap(), bytes);
            }
        }
    }
}
