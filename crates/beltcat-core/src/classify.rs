//! Header/data classification state machine.
//!
//! The token stream of a table carries no row or column markers. The leading
//! tokens are the diameter axis; the first integer token at or above the
//! profile's minimum plausible speed ends it and starts the data stream.
//!
//! ```text
//! AwaitingHeader --start sentinel--> ReadingHeader --speed token--> ReadingData
//! ```
//!
//! Transitions only move forward. The boundary token is re-injected as the
//! first data token; it is never part of the header.

use tracing::{debug, warn};

use crate::error::{CatalogError, ParseResult, ParseWarning, ParseWarningCode};
use crate::profile::Profile;
use crate::token::Token;

/// Classifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierState {
    /// Tokens are discarded until a start sentinel is observed.
    AwaitingHeader,
    /// Tokens accumulate into the axis header.
    ReadingHeader,
    /// Tokens accumulate into the flat data stream. Terminal.
    ReadingData,
}

/// Ordered diameter axis, in document order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisHeader {
    values: Vec<f64>,
}

impl AxisHeader {
    /// Wrap diameter values. Order is kept as given.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Diameter values in document order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of diameters (`D`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the header holds no diameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Tokens per reconstructed row: one speed plus one value per diameter.
    pub fn row_width(&self) -> usize {
        self.values.len() + 1
    }
}

/// Output of a completed classification pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedTable {
    /// The diameter axis.
    pub header: AxisHeader,
    /// Flat data stream, starting with the boundary token.
    pub data: Vec<Token>,
}

/// Streaming header/data classifier for one profile.
#[derive(Debug, Clone)]
pub struct Classifier {
    profile: String,
    start_marker: String,
    end_marker: String,
    min_speed: u32,
    state: ClassifierState,
    header: Vec<Token>,
    data: Vec<Token>,
}

impl Classifier {
    /// Create a classifier in [`ClassifierState::AwaitingHeader`].
    pub fn new(profile: &Profile) -> Self {
        Self {
            profile: profile.id.clone(),
            start_marker: profile.start_marker.clone(),
            end_marker: profile.end_marker.clone(),
            min_speed: profile.min_speed,
            state: ClassifierState::AwaitingHeader,
            header: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> ClassifierState {
        self.state
    }

    /// Signal that a start sentinel was seen.
    ///
    /// Only the first call has an effect; later blocks of a concatenated
    /// table continue whatever stage the classifier is in.
    pub fn observe_start(&mut self) {
        if self.state == ClassifierState::AwaitingHeader {
            debug!(profile = %self.profile, "start sentinel observed, reading header");
            self.state = ClassifierState::ReadingHeader;
        }
    }

    /// Feed one token.
    pub fn push(&mut self, token: Token) {
        match self.state {
            ClassifierState::AwaitingHeader => {}
            ClassifierState::ReadingHeader => {
                if token.is_speed(self.min_speed) {
                    debug!(
                        profile = %self.profile,
                        diameters = self.header.len(),
                        boundary = %token,
                        "header terminated"
                    );
                    self.state = ClassifierState::ReadingData;
                    self.data.push(token);
                } else {
                    self.header.push(token);
                }
            }
            ClassifierState::ReadingData => self.data.push(token),
        }
    }

    /// Feed every token of an iterator.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) {
        for token in tokens {
            self.push(token);
        }
    }

    /// Finish the pass.
    ///
    /// Fails with [`CatalogError::TableNotFound`] if no start was observed,
    /// [`CatalogError::HeaderNotTerminated`] if no boundary token arrived, and
    /// [`CatalogError::EmptyHeader`] if the boundary came before any diameter.
    pub fn finish(self) -> Result<ParseResult<ClassifiedTable>, CatalogError> {
        match self.state {
            ClassifierState::AwaitingHeader => {
                return Err(CatalogError::TableNotFound {
                    profile: self.profile,
                    start_marker: self.start_marker,
                    end_marker: self.end_marker,
                });
            }
            ClassifierState::ReadingHeader => {
                return Err(CatalogError::HeaderNotTerminated {
                    profile: self.profile,
                    min_speed: self.min_speed,
                    consumed: self.header.len(),
                });
            }
            ClassifierState::ReadingData => {}
        }

        if self.header.is_empty() {
            let token = self.data.first().map(|t| t.text.clone()).unwrap_or_default();
            return Err(CatalogError::EmptyHeader {
                profile: self.profile,
                token,
            });
        }

        let values: Vec<f64> = self
            .header
            .iter()
            .filter_map(|t| t.axis_value(self.min_speed))
            .collect();

        let mut warnings = Vec::new();
        let mut seen: Vec<f64> = Vec::with_capacity(values.len());
        for (i, value) in values.iter().enumerate() {
            if seen.contains(value) {
                warn!(profile = %self.profile, diameter = value, "repeated diameter in header");
                let block = self.header.get(i).map(|t| t.block).unwrap_or(0);
                warnings.push(ParseWarning::in_block(
                    ParseWarningCode::DuplicateDiameter,
                    format!("diameter {value} appears more than once in the header"),
                    block,
                ));
            } else {
                seen.push(*value);
            }
        }

        Ok(ParseResult::with_warnings(
            ClassifiedTable {
                header: AxisHeader::new(values),
                data: self.data,
            },
            warnings,
        ))
    }
}

/// Classify a single token stream that begins right after a start sentinel.
pub fn classify(
    tokens: impl IntoIterator<Item = Token>,
    profile: &Profile,
) -> Result<ParseResult<ClassifiedTable>, CatalogError> {
    let mut classifier = Classifier::new(profile);
    classifier.observe_start();
    classifier.extend(tokens);
    classifier.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile::new("C", "Profile C", "Profile D", 500)
    }

    fn tokens(texts: &[&str]) -> Vec<Token> {
        texts.iter().map(|t| Token::new(*t, 0, 0)).collect()
    }

    fn data_texts(table: &ClassifiedTable) -> Vec<&str> {
        table.data.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_header_from_data() {
        let result = classify(tokens(&["180", "200", "710", "1.2", "1.5"]), &profile()).unwrap();
        assert!(result.is_clean());
        assert_eq!(result.value.header.values(), &[180.0, 200.0]);
        assert_eq!(result.value.header.row_width(), 3);
        assert_eq!(data_texts(&result.value), vec!["710", "1.2", "1.5"]);
    }

    #[test]
    fn boundary_token_starts_data() {
        let result = classify(tokens(&["180", "950", "1.0"]), &profile()).unwrap();
        assert_eq!(result.value.data[0].text, "950");
        assert_eq!(result.value.header.len(), 1);
    }

    #[test]
    fn grouped_speed_ends_header() {
        let result = classify(tokens(&["180", "200", "1.450", "2.1", "2.6"]), &profile()).unwrap();
        assert_eq!(result.value.header.values(), &[180.0, 200.0]);
        assert_eq!(result.value.data[0].text, "1.450");
    }

    #[test]
    fn decimal_above_threshold_does_not_end_header() {
        let result = classify(tokens(&["180", "712.5", "950", "1.0", "1.1"]), &profile()).unwrap();
        assert_eq!(result.value.header.values(), &[180.0, 712.5]);
    }

    #[test]
    fn header_not_terminated() {
        let err = classify(tokens(&["180", "200", "224"]), &profile()).unwrap_err();
        assert_eq!(
            err,
            CatalogError::HeaderNotTerminated {
                profile: "C".to_string(),
                min_speed: 500,
                consumed: 3,
            }
        );
    }

    #[test]
    fn empty_header() {
        let err = classify(tokens(&["710", "1.2"]), &profile()).unwrap_err();
        assert_eq!(
            err,
            CatalogError::EmptyHeader {
                profile: "C".to_string(),
                token: "710".to_string(),
            }
        );
    }

    #[test]
    fn tokens_before_start_are_ignored() {
        let mut c = Classifier::new(&profile());
        c.push(Token::new("999", 0, 0));
        assert_eq!(c.state(), ClassifierState::AwaitingHeader);
        c.observe_start();
        c.extend(tokens(&["180", "710", "1.2"]));
        assert_eq!(c.state(), ClassifierState::ReadingData);
        let table = c.finish().unwrap().value;
        assert_eq!(table.header.values(), &[180.0]);
        assert_eq!(data_texts(&table), vec!["710", "1.2"]);
    }

    #[test]
    fn no_start_is_table_not_found() {
        let c = Classifier::new(&profile());
        assert!(matches!(c.finish(), Err(CatalogError::TableNotFound { .. })));
    }

    #[test]
    fn second_start_does_not_reset() {
        let mut c = Classifier::new(&profile());
        c.observe_start();
        c.extend(tokens(&["180", "710"]));
        c.observe_start();
        assert_eq!(c.state(), ClassifierState::ReadingData);
        c.push(Token::new("200", 1, 1));
        let table = c.finish().unwrap().value;
        assert_eq!(data_texts(&table), vec!["710", "200"]);
    }

    #[test]
    fn header_may_span_blocks() {
        let mut c = Classifier::new(&profile());
        c.observe_start();
        c.push(Token::new("180", 0, 0));
        c.observe_start();
        c.extend(vec![Token::new("200", 0, 1), Token::new("710", 1, 1)]);
        let table = c.finish().unwrap().value;
        assert_eq!(table.header.values(), &[180.0, 200.0]);
    }

    #[test]
    fn repeated_diameter_warns() {
        let result = classify(tokens(&["180", "180", "710", "1", "1"]), &profile()).unwrap();
        assert!(result.has_warning(ParseWarningCode::DuplicateDiameter));
        assert_eq!(result.value.header.len(), 2);
    }
}
