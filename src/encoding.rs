//! Charset guessing for message files

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Number of lines sampled when guessing a file's encoding
pub const DEFAULT_SAMPLE_LINES: usize = 1024;

/// Best guess for the encoding of a byte sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub encoding: &'static Encoding,

    /// False when the detector had no clear winner
    pub confident: bool,
}

/// Read up to `max_lines` raw lines from the start of `path`
pub fn read_sample(path: &Path, max_lines: usize) -> io::Result<Vec<u8>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut sample = Vec::new();

    for _ in 0..max_lines {
        if reader.read_until(b'\n', &mut sample)? == 0 {
            break;
        }
    }

    Ok(sample)
}

/// The first `max_lines` lines of an in-memory message
#[must_use]
pub fn sample_prefix(raw: &[u8], max_lines: usize) -> &[u8] {
    if max_lines == 0 {
        return &[];
    }

    let end = raw
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .nth(max_lines - 1)
        .map_or(raw.len(), |(i, _)| i + 1);

    &raw[..end]
}

/// Guess the encoding of `sample`, or `None` when there is nothing to look at
#[must_use]
pub fn detect_bytes(sample: &[u8]) -> Option<Detection> {
    if sample.is_empty() {
        return None;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    let (encoding, confident) = detector.guess_assess(None, true);

    Some(Detection {
        encoding,
        confident,
    })
}

/// Guess the encoding of the file at `path` from its first `max_lines` lines
pub fn detect_encoding(path: &Path, max_lines: usize) -> io::Result<Option<Detection>> {
    let sample = read_sample(path, max_lines)?;
    let detection = detect_bytes(&sample);

    match detection {
        Some(d) if !d.confident => debug!(
            path = %path.display(),
            encoding = d.encoding.name(),
            "Low confidence encoding guess"
        ),
        None => debug!(path = %path.display(), "Empty file, no encoding guess"),
        Some(_) => {}
    }

    Ok(detection)
}
