//! Raw cell values and permissive coercion.
//!
//! Source tables arrive as loosely-typed cells (spreadsheet cells or
//! absent columns). [`Cell`] is the common currency between the workbook
//! reader and the normalizer: every coercion here is best-effort with a
//! caller-supplied default, never an error.

/// A single raw value from a content table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    /// Absent or empty cell.
    Null,
    /// Native boolean cell.
    Bool(bool),
    /// Integer-valued cell.
    Int(i64),
    /// Floating-point cell.
    Float(f64),
    /// Text cell, stored verbatim.
    Text(String),
}

/// Strings recognized as true by [`Cell::truthy`], compared case-insensitively.
const TRUE_WORDS: [&str; 5] = ["1", "true", "yes", "y", "on"];
/// Strings recognized as false by [`Cell::truthy`].
const FALSE_WORDS: [&str; 5] = ["0", "false", "no", "n", "off"];

impl Cell {
    pub(crate) fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for absent cells and whitespace-only text.
    ///
    /// Numeric and boolean cells are never blank; a row of zeroes is data.
    pub(crate) fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Bool(_) | Self::Int(_) | Self::Float(_) => false,
        }
    }

    /// Stringify the cell, or `None` for [`Cell::Null`].
    ///
    /// Integral floats render without a decimal part, matching how
    /// spreadsheet readers surface whole numbers stored as floats.
    pub(crate) fn display(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    Some((*f as i64).to_string())
                } else {
                    Some(f.to_string())
                }
            }
            Self::Text(s) => Some(s.clone()),
        }
    }

    /// Interpret the cell as a boolean flag.
    ///
    /// Null → `default`; booleans pass through; recognized true/false
    /// words match case-insensitively; anything else falls back to
    /// `default` rather than erroring.
    pub(crate) fn truthy(&self, default: bool) -> bool {
        match self {
            Self::Null => default,
            Self::Bool(b) => *b,
            _ => {
                let Some(text) = self.display() else {
                    return default;
                };
                let word = text.trim().to_lowercase();
                if TRUE_WORDS.contains(&word.as_str()) {
                    true
                } else if FALSE_WORDS.contains(&word.as_str()) {
                    false
                } else {
                    default
                }
            }
        }
    }

    /// Interpret the cell as an integer, truncating floats.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn int_or(&self, default: i64) -> i64 {
        match self {
            Self::Null => default,
            Self::Bool(b) => i64::from(*b),
            Self::Int(i) => *i,
            Self::Float(f) => *f as i64,
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                    .unwrap_or(default)
            }
        }
    }

    /// Interpret the cell as a float.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn float_or(&self, default: f64) -> f64 {
        match self {
            Self::Null => default,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::Text(s) => s.trim().parse().unwrap_or(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_owned())
    }

    #[test]
    fn test_is_blank() {
        assert!(Cell::Null.is_blank());
        assert!(text("").is_blank());
        assert!(text("   \t").is_blank());
        assert!(!text("x").is_blank());
        assert!(!Cell::Int(0).is_blank());
        assert!(!Cell::Float(0.0).is_blank());
        assert!(!Cell::Bool(false).is_blank());
    }

    #[test]
    fn test_display_collapses_integral_floats() {
        assert_eq!(Cell::Float(3.0).display(), Some("3".to_owned()));
        assert_eq!(Cell::Float(3.5).display(), Some("3.5".to_owned()));
        assert_eq!(Cell::Int(7).display(), Some("7".to_owned()));
        assert_eq!(Cell::Null.display(), None);
        assert_eq!(text(" padded ").display(), Some(" padded ".to_owned()));
    }

    #[test]
    fn test_truthy_recognized_words() {
        for word in ["1", "true", "YES", "y", "On"] {
            assert!(text(word).truthy(false), "{word} should be true");
        }
        for word in ["0", "FALSE", "no", "N", "off"] {
            assert!(!text(word).truthy(true), "{word} should be false");
        }
    }

    #[test]
    fn test_truthy_booleans_pass_through() {
        assert!(Cell::Bool(true).truthy(false));
        assert!(!Cell::Bool(false).truthy(true));
    }

    #[test]
    fn test_truthy_null_and_unrecognized_use_default() {
        assert!(Cell::Null.truthy(true));
        assert!(!Cell::Null.truthy(false));
        assert!(text("maybe").truthy(true));
        assert!(!text("maybe").truthy(false));
    }

    #[test]
    fn test_truthy_numeric_one_and_zero() {
        // Spreadsheets store flag columns as numbers; 1/0 must coerce.
        assert!(Cell::Float(1.0).truthy(false));
        assert!(!Cell::Float(0.0).truthy(true));
        assert!(Cell::Int(1).truthy(false));
    }

    #[test]
    fn test_int_or() {
        assert_eq!(Cell::Null.int_or(5), 5);
        assert_eq!(Cell::Int(3).int_or(0), 3);
        assert_eq!(Cell::Float(3.9).int_or(0), 3);
        assert_eq!(text("42").int_or(0), 42);
        assert_eq!(text("2.5").int_or(0), 2);
        assert_eq!(text("n/a").int_or(7), 7);
        assert_eq!(Cell::Bool(true).int_or(0), 1);
    }

    #[test]
    fn test_float_or() {
        assert_eq!(Cell::Null.float_or(1.0), 1.0);
        assert_eq!(Cell::Float(0.75).float_or(1.0), 0.75);
        assert_eq!(Cell::Int(2).float_or(1.0), 2.0);
        assert_eq!(text("1.25").float_or(1.0), 1.25);
        assert_eq!(text("fast").float_or(1.0), 1.0);
    }
}
