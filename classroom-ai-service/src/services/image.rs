//! Screenshot payload decoding.
//!
//! Clients send either bare base64 or a `data:` URL straight from
//! `canvas.toDataURL`. Only the encoding is checked; pixels are not inspected.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::AnalysisError;
use crate::services::providers::ImagePart;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// True when the field is absent or holds nothing but whitespace.
pub fn is_missing(payload: Option<&str>) -> bool {
    payload.map_or(true, |p| p.trim().is_empty())
}

pub fn decode_image(payload: &str) -> Result<ImagePart, AnalysisError> {
    let (declared_mime, encoded) = split_data_url(payload.trim());

    let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let data = STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| AnalysisError::Decode(e.to_string()))?;

    if data.is_empty() {
        return Err(AnalysisError::Decode("image payload is empty".to_string()));
    }

    let mime_type = sniff_mime_type(&data)
        .or(declared_mime)
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();

    Ok(ImagePart { mime_type, data })
}

/// Split `data:<mime>;base64,<payload>` into its MIME type and payload.
fn split_data_url(payload: &str) -> (Option<&str>, &str) {
    let Some(rest) = payload.strip_prefix("data:") else {
        return (None, payload);
    };

    match rest.split_once(',') {
        Some((header, data)) => {
            let mime = header
                .split(';')
                .next()
                .filter(|m| m.starts_with("image/"));
            (mime, data)
        }
        None => (None, payload),
    }
}

fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}
