//! HTTP Range request parsing module
//!
//! Byte-range parsing for partial content, compliant with RFC 7233.

/// Parsed Range request, both bounds inclusive and inside the content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Number of bytes covered by the range
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for this range
    pub fn content_range(&self, total_size: usize) -> String {
        format!("bytes {}-{}/{total_size}", self.start, self.end)
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Satisfiable ranges in request order
    Valid(Vec<ByteRange>),
    /// No range can overlap the content - should return 416
    NotSatisfiable,
    /// No Range header, foreign unit or malformed (serve full content)
    None,
}

/// One comma-separated element of a `bytes=` range set
enum RangeSpec {
    Range(ByteRange),
    NoOverlap,
    Malformed,
}

/// Parse HTTP Range header (bytes unit)
///
/// Supported formats, comma separated:
/// - `bytes=start-end` - Specific range
/// - `bytes=start-` - From start to end
/// - `bytes=-suffix` - Last suffix bytes
///
/// Ranges starting past the end are dropped; the request is unsatisfiable
/// only when every range was dropped.
///
/// # Examples
/// ```
/// use asset_responder::http::range::{parse_range_header, RangeParseResult};
///
/// let result = parse_range_header(Some("bytes=0-99"), 1000);
/// assert!(matches!(result, RangeParseResult::Valid(ref r) if r.len() == 1));
///
/// let result = parse_range_header(None, 1000);
/// assert!(matches!(result, RangeParseResult::None));
/// ```
pub fn parse_range_header(range_header: Option<&str>, size: usize) -> RangeParseResult {
    let Some(set) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };

    let mut ranges = Vec::new();
    let mut no_overlap = false;

    for part in set.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((first, last)) = part.split_once('-') else {
            return RangeParseResult::None;
        };
        let (first, last) = (first.trim(), last.trim());

        let parsed = if first.is_empty() {
            parse_suffix_range(last, size)
        } else {
            parse_standard_range(first, last, size)
        };

        match parsed {
            RangeSpec::Range(range) => ranges.push(range),
            RangeSpec::NoOverlap => no_overlap = true,
            RangeSpec::Malformed => return RangeParseResult::None,
        }
    }

    if !ranges.is_empty() {
        RangeParseResult::Valid(ranges)
    } else if no_overlap {
        RangeParseResult::NotSatisfiable
    } else {
        RangeParseResult::None
    }
}

/// Parse suffix range (e.g., "-500")
fn parse_suffix_range(suffix: &str, size: usize) -> RangeSpec {
    let Ok(suffix) = suffix.parse::<usize>() else {
        return RangeSpec::Malformed;
    };

    if suffix == 0 || size == 0 {
        return RangeSpec::NoOverlap;
    }

    // Suffix larger than the content selects all of it
    RangeSpec::Range(ByteRange {
        start: size.saturating_sub(suffix),
        end: size - 1,
    })
}

/// Parse standard range (e.g., "0-99" or "100-")
fn parse_standard_range(first: &str, last: &str, size: usize) -> RangeSpec {
    let Ok(start) = first.parse::<usize>() else {
        return RangeSpec::Malformed;
    };

    let end = if last.is_empty() {
        None
    } else {
        let Ok(end) = last.parse::<usize>() else {
            return RangeSpec::Malformed;
        };
        if end < start {
            return RangeSpec::Malformed;
        }
        Some(end)
    };

    if start >= size {
        return RangeSpec::NoOverlap;
    }

    let last_byte = size - 1;
    RangeSpec::Range(ByteRange {
        start,
        end: end.map_or(last_byte, |e| e.min(last_byte)),
    })
}
