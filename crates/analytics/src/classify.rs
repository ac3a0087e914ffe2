//! Sentiment classification of review text.
//!
//! The pipeline only needs `text -> label`; [`SentimentClassifier`] is that
//! seam. [`VaderClassifier`] scores English reviews with the VADER
//! rule-based model and works offline.

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::sentiment::SentimentLabel;

/// Anything that can label a piece of review text.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> SentimentLabel;
}

impl<F> SentimentClassifier for F
where
    F: Fn(&str) -> SentimentLabel + Send + Sync,
{
    fn classify(&self, text: &str) -> SentimentLabel {
        self(text)
    }
}

/// Compound scores strictly beyond this magnitude are polar.
pub const POLARITY_THRESHOLD: f64 = 0.05;

/// Label for a compound score in `[-1, 1]`.
pub fn label_for(compound: f64) -> SentimentLabel {
    if compound > POLARITY_THRESHOLD {
        SentimentLabel::Positive
    } else if compound < -POLARITY_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// VADER compound score, thresholded by [`label_for`].
pub struct VaderClassifier {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl Default for VaderClassifier {
    fn default() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl VaderClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized compound score; 0.0 for blank text.
    pub fn compound(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        self.analyzer
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}

impl SentimentClassifier for VaderClassifier {
    fn classify(&self, text: &str) -> SentimentLabel {
        label_for(self.compound(text))
    }
}
