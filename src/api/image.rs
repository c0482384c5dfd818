// Copyright 2023 Remi Bernotavicius

use crate::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Decoded image payload ready for storage.
#[derive(Debug)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub format: String,
}

/// Decodes a `data:image/<ext>;base64,<payload>` string. Anything that does
/// not match the prefix, fails to decode, or whose bytes are not
/// recognizable image data is a validation error scoped to `field`.
pub fn decode_data_uri(field: &'static str, value: &str) -> Result<ImageData> {
    let rest = value
        .strip_prefix("data:image/")
        .ok_or_else(|| Error::validation(field, "expected a data:image/..;base64,.. string"))?;
    let (format, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| Error::validation(field, "expected a base64-encoded data URI"))?;
    if format.is_empty() {
        return Err(Error::validation(field, "missing image format"));
    }

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| Error::validation(field, format!("invalid base64 payload: {e}")))?;
    ::image::guess_format(&bytes)
        .map_err(|_| Error::validation(field, "decoded payload is not image data"))?;

    Ok(ImageData {
        bytes,
        format: format.into(),
    })
}

pub fn encode_data_uri(format: &str, bytes: &[u8]) -> String {
    format!("data:image/{format};base64,{}", STANDARD.encode(bytes))
}

#[test]
fn data_uri_round_trip() {
    let uri = encode_data_uri("png", crate::api::testing::PNG_BYTES);
    let decoded = decode_data_uri("image", &uri).unwrap();
    assert_eq!(decoded.bytes, crate::api::testing::PNG_BYTES);
    assert_eq!(decoded.format, "png");
}

#[test]
fn data_uri_rejects_wrong_prefix() {
    for value in ["", "hello", "data:text/plain;base64,aGk=", "image/png"] {
        let err = decode_data_uri("image", value).unwrap_err();
        assert!(err.is_validation(), "{value:?} gave {err:?}");
    }
}

#[test]
fn data_uri_rejects_bad_base64() {
    let err = decode_data_uri("image", "data:image/png;base64,!!!not-base64!!!").unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn data_uri_rejects_non_image_payload() {
    let uri = encode_data_uri("png", b"just some text");
    let err = decode_data_uri("image", &uri).unwrap_err();
    assert!(err.is_validation());
}
