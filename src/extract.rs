//! Recipient extraction from delivery trace headers

use crate::encoding::{
    DEFAULT_SAMPLE_LINES, Detection, detect_bytes, detect_encoding, sample_prefix,
};
use crate::error::{ExtractError, Result};
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, warn};

/// Opens the recipient inside a `Received` header value
pub const RECIPIENT_OPEN: &str = "for <";

/// Closes the recipient, searched for after [`RECIPIENT_OPEN`]
pub const RECIPIENT_CLOSE: &str = ">;";

// RFC 5322 field-name: printable US-ASCII except colon
static FIELD_NAME_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"^[!-9;-~]+$").unwrap());

/// Find the delivery recipient of the message stored at `path`.
///
/// Returns `Ok(None)` when no `Received` header names a recipient.
pub fn extract_recipient(path: &Path) -> Result<Option<String>> {
    let result = read_and_extract(path);

    if let Err(ref e) = result {
        warn!(path = %path.display(), error = %e, "Error processing message");
    }

    result
}

/// Find the delivery recipient of an in-memory message
pub fn extract_recipient_from_bytes(raw: &[u8]) -> Result<Option<String>> {
    let detection = detect_bytes(sample_prefix(raw, DEFAULT_SAMPLE_LINES));
    recipient_from_raw(raw, detection)
}

fn read_and_extract(path: &Path) -> Result<Option<String>> {
    let read_error = |source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    };

    let detection = detect_encoding(path, DEFAULT_SAMPLE_LINES).map_err(read_error)?;
    let raw = std::fs::read(path).map_err(read_error)?;

    recipient_from_raw(&raw, detection)
}

fn recipient_from_raw(raw: &[u8], detection: Option<Detection>) -> Result<Option<String>> {
    let text = decode(raw, detection.map_or(UTF_8, |d| d.encoding))?;
    let headers = header_block(text.as_bytes())?;

    let received = headers
        .iter()
        .filter(|h| h.get_key().eq_ignore_ascii_case("received"))
        .map(|h| String::from_utf8_lossy(h.get_value_raw()));

    for value in received {
        if let Some(recipient) = recipient_in_received(&value)? {
            debug!("Found recipient {recipient}");
            return Ok(Some(recipient));
        }
    }

    Ok(None)
}

/// Pull the recipient out of one `Received` header value.
///
/// The recipient is whatever sits between [`RECIPIENT_OPEN`] and the next
/// [`RECIPIENT_CLOSE`], lower-cased and otherwise unchecked.
pub fn recipient_in_received(value: &str) -> Result<Option<String>> {
    let Some(start) = value.find(RECIPIENT_OPEN) else {
        return Ok(None);
    };

    let rest = &value[start + RECIPIENT_OPEN.len()..];
    let end = rest
        .find(RECIPIENT_CLOSE)
        .ok_or_else(|| ExtractError::MalformedMarker(value.trim().to_string()))?;

    Ok(Some(rest[..end].to_lowercase()))
}

// A byte order mark overrides the guess
fn decode<'a>(raw: &'a [u8], guessed: &'static Encoding) -> Result<Cow<'a, str>> {
    let (encoding, body) = match Encoding::for_bom(raw) {
        Some((bom_encoding, bom_len)) => (bom_encoding, &raw[bom_len..]),
        None => (guessed, raw),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or(ExtractError::Decode {
            encoding: encoding.name(),
        })
}

/// Parse the leading header block loosely.
///
/// A leading mbox `From ` line is skipped. The block ends at the first blank
/// line or at the first line that is not a well-formed `name: value` header,
/// whichever comes first. Only a block with no valid header at all is an error.
fn header_block(text: &[u8]) -> Result<Vec<mailparse::MailHeader<'_>>> {
    let mut rest = skip_mbox_from_line(text);
    let mut headers = Vec::new();

    while !rest.is_empty() && !rest.starts_with(b"\n") && !rest.starts_with(b"\r") {
        let Ok((header, consumed)) = mailparse::parse_header(rest) else {
            break;
        };

        let line_end = rest.iter().position(|b| *b == b'\n').unwrap_or(rest.len());
        let key = header.get_key();
        if !rest[..line_end].contains(&b':') || !FIELD_NAME_REGEX.is_match(&key) {
            if headers.is_empty() {
                return Err(ExtractError::Parse(format!("invalid header name {key:?}")));
            }
            debug!("Header block ends at invalid header name {key:?}");
            break;
        }

        headers.push(header);
        rest = &rest[consumed..];
    }

    if headers.is_empty() {
        return Err(ExtractError::Parse("no header block".into()));
    }

    Ok(headers)
}

fn skip_mbox_from_line(text: &[u8]) -> &[u8] {
    if !text.starts_with(b"From ") {
        return text;
    }

    text.iter()
        .position(|b| *b == b'\n')
        .map_or(&text[text.len()..], |newline| &text[newline + 1..])
}
