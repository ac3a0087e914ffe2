use std::collections::HashMap;

use records::Record;
use tracing::debug;

use crate::config::AggregateConfig;
use crate::sentiment::{review_text, sentiment_tag};
use crate::text::{clean_text, tokenize};

/// Per-token running totals.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TokenStat {
    pub frequency: u64,
    pub sentiment_sum: f64,
    pub sentiment_count: u64,
}

impl TokenStat {
    /// Mean sentiment, undefined (`None`) when nothing was scored.
    pub fn average_sentiment(&self) -> Option<f64> {
        if self.sentiment_count == 0 {
            None
        } else {
            Some(self.sentiment_sum / self.sentiment_count as f64)
        }
    }

    fn observe(&mut self, score: f64) {
        self.frequency += 1;
        self.sentiment_sum += score;
        self.sentiment_count += 1;
    }
}

/// Token statistics in first-seen order.
///
/// Order is kept so that ranking ties resolve the same way on every run
/// over the same input.
#[derive(Debug, Clone, Default)]
pub struct TokenStats {
    entries: Vec<(String, TokenStat)>,
    index: HashMap<String, usize>,
    records_used: usize,
}

impl TokenStats {
    pub fn get(&self, token: &str) -> Option<&TokenStat> {
        self.index.get(token).map(|&idx| &self.entries[idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of records that had both text and a sentiment value.
    pub fn records_used(&self) -> usize {
        self.records_used
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenStat)> {
        self.entries.iter().map(|(token, stat)| (token.as_str(), stat))
    }

    /// Tokens eligible for charting, with their mean sentiment, in
    /// first-seen order.
    pub fn qualifying(&self, cfg: &AggregateConfig) -> Vec<(&str, u64, f64)> {
        self.iter()
            .filter(|(_, stat)| stat.frequency >= cfg.min_frequency)
            .filter_map(|(token, stat)| {
                stat.average_sentiment()
                    .map(|average| (token, stat.frequency, average))
            })
            .collect()
    }

    fn observe(&mut self, token: &str, score: f64) {
        let idx = match self.index.get(token) {
            Some(&idx) => idx,
            None => {
                self.entries.push((token.to_string(), TokenStat::default()));
                self.index.insert(token.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[idx].1.observe(score);
    }
}

/// Count token frequency and accumulate sentiment over review text.
///
/// A record is skipped when it has no non-empty `text` or no `sentiment`
/// value at all. A present but unrecognized label still counts, scoring
/// 0.0 like a neutral review.
pub fn aggregate(records: &[Record]) -> TokenStats {
    let mut stats = TokenStats::default();
    let mut skipped = 0usize;

    for record in records {
        let (Some(text), Some(tag)) = (review_text(record), sentiment_tag(record)) else {
            skipped += 1;
            continue;
        };
        let score = tag.score();
        let cleaned = clean_text(text);
        for token in tokenize(&cleaned) {
            stats.observe(token, score);
        }
        stats.records_used += 1;
    }

    debug!(
        records = records.len(),
        skipped,
        distinct_tokens = stats.len(),
        "aggregate_complete"
    );
    stats
}
