//! Text decoding with BOM handling, encoding detection and binary rejection.
//!
//! All decisions are made on a single in-memory read of the file:
//! - BOM markers (UTF-8, UTF-16 LE/BE) win outright
//! - strict UTF-8 is the fast path
//! - anything else is decoded with the chardetng guess
//! - null bytes or a low printable ratio in the sample mean binary

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use std::path::Path;

const SAMPLE_SIZE: usize = 8192;

/// Outcome of decoding one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Text { content: String, encoding: &'static str },
    Binary,
}

/// Read `path` and decode it as text.
///
/// I/O failures (missing file, permission denied) are returned as errors;
/// undecodable content is reported as [`Decoded::Binary`].
pub fn read_text(path: &Path) -> std::io::Result<Decoded> {
    let bytes = std::fs::read(path)?;
    Ok(decode_bytes(&bytes))
}

pub fn decode_bytes(bytes: &[u8]) -> Decoded {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return Decoded::Text { content: decoded.into_owned(), encoding: encoding.name() };
    }

    if looks_binary(&bytes[..bytes.len().min(SAMPLE_SIZE)]) {
        return Decoded::Binary;
    }

    if let Ok(content) = std::str::from_utf8(bytes) {
        return Decoded::Text { content: content.to_string(), encoding: UTF_8.name() };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(&bytes[..bytes.len().min(SAMPLE_SIZE)], bytes.len() <= SAMPLE_SIZE);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(bytes);
    Decoded::Text { content: decoded.into_owned(), encoding: encoding.name() }
}

/// Null bytes, or fewer than 70% printable bytes, mark a sample as binary.
///
/// Bytes >= 0x80 count as printable so that legacy 8-bit encodings and
/// multi-byte UTF-8 are not rejected.
fn looks_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    let printable = sample
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || b >= 0x80 || matches!(b, b'\t' | b'\n' | b'\r'))
        .count();
    (printable as f64 / sample.len() as f64) < 0.70
}
