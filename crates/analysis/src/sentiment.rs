//! Lexicon-based headline sentiment scoring.
//!
//! Produces a compound polarity score in [-1, 1] per text. Token weights are
//! summed, a preceding negation flips a token's contribution, and the raw sum
//! is squashed with `s / sqrt(s^2 + 15)` so that a handful of strong words
//! saturates toward the extremes without exceeding them.

use market_signal_core::SentimentSample;

/// Positive polarity words with weights, tuned for crypto headlines.
const POSITIVE_WORDS: [(&str, f64); 24] = [
    ("surge", 2.2),
    ("surges", 2.2),
    ("soar", 2.4),
    ("soars", 2.4),
    ("rally", 2.0),
    ("rallies", 2.0),
    ("gain", 1.5),
    ("gains", 1.5),
    ("bullish", 2.0),
    ("breakout", 1.8),
    ("record", 1.4),
    ("high", 1.0),
    ("adoption", 1.5),
    ("approval", 1.8),
    ("approve", 1.8),
    ("approved", 1.8),
    ("growth", 1.4),
    ("rebound", 1.6),
    ("recover", 1.5),
    ("recovery", 1.5),
    ("optimism", 1.6),
    ("win", 1.3),
    ("boost", 1.4),
    ("upgrade", 1.3),
];

/// Negative polarity words with weights.
const NEGATIVE_WORDS: [(&str, f64); 24] = [
    ("crash", -2.6),
    ("crashes", -2.6),
    ("plunge", -2.4),
    ("plunges", -2.4),
    ("plummet", -2.4),
    ("dump", -2.0),
    ("selloff", -2.0),
    ("bearish", -2.0),
    ("drop", -1.5),
    ("drops", -1.5),
    ("fall", -1.4),
    ("falls", -1.4),
    ("loss", -1.5),
    ("losses", -1.5),
    ("hack", -2.4),
    ("hacked", -2.4),
    ("exploit", -2.2),
    ("fraud", -2.4),
    ("lawsuit", -1.8),
    ("ban", -2.0),
    ("banned", -2.0),
    ("fear", -1.6),
    ("liquidation", -1.8),
    ("collapse", -2.5),
];

const NEGATIONS: [&str; 8] = [
    "not", "no", "never", "isn't", "wasn't", "don't", "won't", "without",
];

/// Scores a text's overall polarity into [-1, 1].
///
/// Empty or lexicon-free text scores exactly 0.
#[must_use]
pub fn score_text(text: &str) -> f64 {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect();

    let mut sum = 0.0;
    for (i, token) in tokens.iter().enumerate() {
        let Some(weight) = lookup(token) else {
            continue;
        };
        let negated = i > 0 && NEGATIONS.contains(&tokens[i - 1].as_str());
        sum += if negated { -weight } else { weight };
    }

    if sum == 0.0 {
        return 0.0;
    }
    // VADER-style normalization into (-1, 1)
    sum / (sum * sum + 15.0).sqrt()
}

fn lookup(token: &str) -> Option<f64> {
    POSITIVE_WORDS
        .iter()
        .chain(NEGATIVE_WORDS.iter())
        .find(|(word, _)| *word == token)
        .map(|(_, weight)| *weight)
}

/// Arithmetic mean of compound scores over all samples; 0 when empty.
#[must_use]
pub fn mean_sentiment(samples: &[SentimentSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let total: f64 = samples.iter().map(|s| s.compound_score).sum();
    total / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_headline_scores_positive() {
        let score = score_text("Bitcoin surges to record high as ETF approval fuels rally");
        assert!(score > 0.2, "score was {score}");
        assert!(score <= 1.0);
    }

    #[test]
    fn test_negative_headline_scores_negative() {
        let score = score_text("Exchange hacked: Bitcoin crashes amid liquidation fears");
        assert!(score < -0.2, "score was {score}");
        assert!(score >= -1.0);
    }

    #[test]
    fn test_neutral_text_scores_zero() {
        assert_eq!(score_text("Bitcoin trades sideways on Tuesday"), 0.0);
        assert_eq!(score_text(""), 0.0);
    }

    #[test]
    fn test_negation_flips_polarity() {
        let plain = score_text("bullish outlook");
        let negated = score_text("not bullish outlook");
        assert!(plain > 0.0);
        assert!(negated < 0.0);
    }

    #[test]
    fn test_punctuation_is_stripped() {
        assert!(score_text("Crash!") < 0.0);
        assert!(score_text("\"Rally\",") > 0.0);
    }

    #[test]
    fn test_score_stays_in_bounds() {
        let extreme = "crash crash crash crash plunge plunge collapse collapse fraud hack";
        let score = score_text(extreme);
        assert!((-1.0..=0.0).contains(&score));
        assert!(score < -0.8);
    }

    #[test]
    fn test_mean_sentiment_empty_is_zero() {
        assert_eq!(mean_sentiment(&[]), 0.0);
    }

    #[test]
    fn test_mean_sentiment_averages() {
        let samples = vec![
            SentimentSample {
                headline: "a".to_string(),
                compound_score: 0.6,
            },
            SentimentSample {
                headline: "b".to_string(),
                compound_score: -0.2,
            },
        ];
        let mean = mean_sentiment(&samples);
        assert!((mean - 0.2).abs() < 1e-12);
    }
}
