// ABOUTME: Input handling for the block importer: reads HTML files and decodes their bytes to text.
// ABOUTME: Honours a BOM, then an in-document charset declaration, then falls back to chardetng detection.

use std::fs;
use std::path::Path;

use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::error::ImportError;

/// How far into the document a `<meta>` charset declaration is looked for.
const CHARSET_SNIFF_LEN: usize = 1024;

static META_CHARSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_.:-]+)"#).unwrap()
});

/// Decode document bytes to a String.
///
/// Order: byte order mark, `<meta charset>` or `http-equiv` content-type in the
/// first kilobyte, then detection.
pub fn decode_html(body: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(body) {
        let (decoded, _) = encoding.decode_without_bom_handling(&body[bom_len..]);
        return decoded.into_owned();
    }

    if let Some(encoding) = declared_encoding(body) {
        let (decoded, _, _) = encoding.decode(body);
        return decoded.into_owned();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(body, true);
    let encoding = detector.guess(None, true);
    let (decoded, _, _) = encoding.decode(body);
    decoded.into_owned()
}

/// Encoding named by a `<meta>` declaration near the start of the document.
fn declared_encoding(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(CHARSET_SNIFF_LEN)];
    let label = META_CHARSET_RE.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes())
}

/// Read and decode an HTML file.
pub fn read_html_file(path: &Path) -> Result<String, ImportError> {
    let bytes = fs::read(path)
        .map_err(|e| ImportError::io(path.display().to_string(), "read input", Some(e.into())))?;
    Ok(decode_html(&bytes))
}
