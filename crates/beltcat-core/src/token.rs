//! Token cleaning and numeric classification.
//!
//! [`tokenize`] turns a raw text span into an ordered sequence of numeric
//! [`Token`]s. Everything that does not survive cleaning (titles, units,
//! footnote text) is dropped silently.
//!
//! Catalog numbers use a decimal comma and a thousands-separator dot, so a
//! cleaned token like `1.000` is ambiguous. A [`Token`] keeps the cleaned text
//! and defers the decision to the caller: header and first-column positions
//! read it through [`Token::axis_value`], measurements through
//! [`Token::as_decimal`].

use unicode_normalization::UnicodeNormalization;

/// A cleaned numeric token with its position in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Token {
    /// Cleaned text (markers stripped, decimal comma converted).
    pub text: String,
    /// 0-based line index within the block the token came from.
    pub line: usize,
    /// 0-based index of the extracted block the token came from.
    pub block: usize,
}

impl Token {
    /// Create a token at the given position.
    pub fn new(text: impl Into<String>, line: usize, block: usize) -> Self {
        Self {
            text: text.into(),
            line,
            block,
        }
    }

    /// Value read as a decimal measurement.
    ///
    /// `1.000` is one, `1.5` is one and a half. Tokens with more than one
    /// separator dot (`1.000.000`) can only be grouped integers and are read
    /// with the dots removed.
    pub fn as_decimal(&self) -> Option<f64> {
        if is_plain_number(&self.text) {
            self.text.parse().ok()
        } else if is_grouped_integer(&self.text) {
            strip_dots(&self.text).parse().ok()
        } else {
            None
        }
    }

    /// Value read as an integer with thousands-separator dots removed.
    ///
    /// Returns `None` for tokens that cannot be an integer (`1.5`, `12.25`).
    pub fn as_integer(&self) -> Option<u64> {
        if is_digits(&self.text) {
            self.text.parse().ok()
        } else if is_grouped_integer(&self.text) {
            strip_dots(&self.text).parse().ok()
        } else {
            None
        }
    }

    /// Returns true if this token parses as an integer at or above `min_speed`.
    ///
    /// This is the header boundary predicate.
    pub fn is_speed(&self, min_speed: u32) -> bool {
        self.as_integer()
            .is_some_and(|value| value >= u64::from(min_speed))
    }

    /// Value read in an axis position (diameter header or row speed).
    ///
    /// Integer-looking tokens at or above the speed threshold are integers
    /// with separator dots removed; everything else is a decimal.
    pub fn axis_value(&self, min_speed: u32) -> Option<f64> {
        if self.is_speed(min_speed) {
            self.as_integer().map(|value| value as f64)
        } else {
            self.as_decimal()
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Clean a text span into numeric tokens.
///
/// Per line: footnote markers are removed, the line is NFKC-normalized
/// (fullwidth digits, non-breaking spaces), split on whitespace, surrounding
/// brackets are trimmed and a decimal comma becomes a decimal point. Pieces
/// that are then not numeric are dropped.
///
/// Markers are stripped before normalization so superscript footnote digits
/// never turn into real digits.
pub fn tokenize(text: &str, block: usize, footnote_markers: &[char]) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        let stripped: String = line
            .chars()
            .filter(|c| !footnote_markers.contains(c))
            .collect();
        let normalized: String = stripped.nfkc().collect();
        for piece in normalized.split_whitespace() {
            if let Some(cleaned) = clean_piece(piece) {
                tokens.push(Token::new(cleaned, line_idx, block));
            }
        }
    }
    tokens
}

/// Clean one whitespace-delimited piece; `None` if it is not numeric.
pub fn clean_piece(piece: &str) -> Option<String> {
    let trimmed = piece.trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']' | ';' | ':'));
    let cleaned = trimmed.replace(',', ".");
    is_numeric(&cleaned).then_some(cleaned)
}

/// Returns true for a plain number (`710`, `1.25`) or a grouped integer (`1.000.000`).
pub fn is_numeric(s: &str) -> bool {
    is_plain_number(s) || is_grouped_integer(s)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// `\d+(\.\d+)?`
fn is_plain_number(s: &str) -> bool {
    match s.split_once('.') {
        None => is_digits(s),
        Some((int, frac)) => is_digits(int) && is_digits(frac),
    }
}

/// `[1-9]\d{0,2}(\.\d{3})+`
fn is_grouped_integer(s: &str) -> bool {
    let mut groups = s.split('.');
    let Some(lead) = groups.next() else {
        return false;
    };
    if lead.is_empty() || lead.len() > 3 || lead.starts_with('0') || !is_digits(lead) {
        return false;
    }
    let mut count = 0;
    for group in groups {
        if group.len() != 3 || !is_digits(group) {
            return false;
        }
        count += 1;
    }
    count > 0
}

fn strip_dots(s: &str) -> String {
    s.chars().filter(|c| *c != '.').collect()
}
