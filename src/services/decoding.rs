// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::compression::CompressionType;
use crate::models::settings::DecompressionMode;
use crate::services::logging::redact_url;
use flate2::read::MultiGzDecoder;
use std::borrow::Cow;
use std::io::Read;
use tracing::debug;

const UTF8_BOM: &str = "\u{feff}";

/// Decompress gzip data, reading every concatenated member
pub fn decompress_gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = MultiGzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

/// Run a fetched payload through gzip when the mode asks for it.
///
/// Decompression failure is never fatal: the raw bytes are returned as-is.
pub fn decode_payload(url: &str, bytes: Vec<u8>, mode: DecompressionMode) -> Vec<u8> {
    if bytes.is_empty() || !mode.should_decompress(url) {
        return bytes;
    }

    match decompress_gzip(&bytes) {
        Ok(decompressed) if !decompressed.is_empty() => {
            debug!(
                url = %redact_url(url),
                suffix = %CompressionType::from_url(url),
                compressed = bytes.len(),
                decompressed = decompressed.len(),
                "decompressed sitemap payload"
            );
            decompressed
        }
        Ok(_) => bytes,
        Err(e) => {
            if CompressionType::from_url(url) == CompressionType::Gzip {
                debug!(url = %redact_url(url), error = %e, "gzip suffix but payload is not gzip, using raw bytes");
            }
            bytes
        }
    }
}

/// Payload bytes as text, without a leading byte-order mark
pub fn payload_text(bytes: &[u8]) -> Cow<'_, str> {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => Cow::Borrowed(text.strip_prefix(UTF8_BOM).unwrap_or(text)),
        Cow::Owned(text) => match text.strip_prefix(UTF8_BOM) {
            Some(stripped) => Cow::Owned(stripped.to_string()),
            None => Cow::Owned(text),
        },
    }
}

#[cfg(test)]
pub(crate) fn compress_gzip(data: &[u8]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
