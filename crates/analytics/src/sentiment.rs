use std::fmt;

use records::{Record, RecordValue};
use serde::{Deserialize, Serialize};

/// Field holding the review text.
pub const TEXT_FIELD: &str = "text";
/// Field holding the sentiment label.
pub const SENTIMENT_FIELD: &str = "sentiment";

/// The three sentiment classes a review can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Exact, case-sensitive match against the stored label text.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "POSITIVE" => Some(SentimentLabel::Positive),
            "NEGATIVE" => Some(SentimentLabel::Negative),
            "NEUTRAL" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }

    pub fn score(self) -> f64 {
        match self {
            SentimentLabel::Positive => 1.0,
            SentimentLabel::Negative => -1.0,
            SentimentLabel::Neutral => 0.0,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a record's sentiment field holds, once we know it holds something.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentTag {
    Known(SentimentLabel),
    /// Present but not one of the three labels.
    Unrecognized,
}

impl SentimentTag {
    /// Unrecognized labels score as neutral.
    pub fn score(self) -> f64 {
        match self {
            SentimentTag::Known(label) => label.score(),
            SentimentTag::Unrecognized => 0.0,
        }
    }

    pub fn label(self) -> Option<SentimentLabel> {
        match self {
            SentimentTag::Known(label) => Some(label),
            SentimentTag::Unrecognized => None,
        }
    }
}

/// Read the sentiment field of `record`.
///
/// `None` when the field is absent, null, or empty text. Any other value is
/// either a known label or [`SentimentTag::Unrecognized`].
pub fn sentiment_tag(record: &Record) -> Option<SentimentTag> {
    match record.get(SENTIMENT_FIELD) {
        None | Some(RecordValue::Null) => None,
        Some(RecordValue::Text(text)) if text.is_empty() => None,
        Some(RecordValue::Text(text)) => Some(
            SentimentLabel::parse(text)
                .map(SentimentTag::Known)
                .unwrap_or(SentimentTag::Unrecognized),
        ),
        Some(_) => Some(SentimentTag::Unrecognized),
    }
}

/// Non-empty review text, if the record has any.
pub fn review_text(record: &Record) -> Option<&str> {
    record.text(TEXT_FIELD).filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_exactly() {
        assert_eq!(SentimentLabel::parse("POSITIVE"), Some(SentimentLabel::Positive));
        assert_eq!(SentimentLabel::parse("positive"), None);
        assert_eq!(SentimentLabel::parse("MIXED"), None);
        for label in SentimentLabel::ALL {
            assert_eq!(SentimentLabel::parse(label.as_str()), Some(label));
        }
    }

    #[test]
    fn tags_distinguish_absent_from_unrecognized() {
        let absent = Record::new();
        let null = Record::new().with(SENTIMENT_FIELD, RecordValue::Null);
        let empty = Record::new().with(SENTIMENT_FIELD, "");
        let unknown = Record::new().with(SENTIMENT_FIELD, "UNKNOWN");
        let numeric = Record::new().with(SENTIMENT_FIELD, 1.0);
        let known = Record::new().with(SENTIMENT_FIELD, "NEGATIVE");

        assert_eq!(sentiment_tag(&absent), None);
        assert_eq!(sentiment_tag(&null), None);
        assert_eq!(sentiment_tag(&empty), None);
        assert_eq!(sentiment_tag(&unknown), Some(SentimentTag::Unrecognized));
        assert_eq!(sentiment_tag(&numeric), Some(SentimentTag::Unrecognized));
        assert_eq!(
            sentiment_tag(&known),
            Some(SentimentTag::Known(SentimentLabel::Negative))
        );
        assert_eq!(SentimentTag::Unrecognized.score(), 0.0);
    }

    #[test]
    fn label_serializes_uppercase() {
        let json = serde_json::to_string(&SentimentLabel::Neutral).unwrap();
        assert_eq!(json, "\"NEUTRAL\"");
    }
}
