//! Engagement counters pulled out of free-form post text.
//!
//! Both functions are lossy on purpose: anything that does not look like a
//! count degrades to zero instead of failing.

use serde::Serialize;

/// Parsed engagement counters for one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Engagement {
    pub replies: u64,
    pub retweets: u64,
    pub likes: u64,
    pub views: u64,
}

impl Engagement {
    /// Ranking score: likes plus retweets.
    pub fn score(&self) -> u64 {
        self.likes.saturating_add(self.retweets)
    }
}

/// Parse an abbreviated count like `1.2K`, `3M`, `1,234` or `42`.
///
/// Suffixes are matched case-insensitively. Returns 0 for anything unparsable.
pub fn parse_count(token: &str) -> u64 {
    let cleaned = token.trim().replace(',', "");
    let (number, multiplier) = match cleaned.chars().last() {
        Some('K' | 'k') => (&cleaned[..cleaned.len() - 1], 1_000.0),
        Some('M' | 'm') => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        _ => return cleaned.parse().unwrap_or(0),
    };
    match number.parse::<f64>() {
        // truncated; the epsilon absorbs products like 4.35 * 1000 = 4349.999..
        // and `as` saturates negatives to 0
        Ok(v) if v.is_finite() => (v * multiplier + 1e-6).trunc() as u64,
        _ => 0,
    }
}

/// Take the last four digit-led tokens of `text` as
/// (replies, retweets, likes, views).
///
/// Counters render after the body, so trailing numbers are the best signal.
/// Fewer than four candidates yields all zeros.
pub fn extract_metrics(text: &str) -> Engagement {
    let numeric: Vec<&str> = text
        .split_whitespace()
        .filter(|t| t.starts_with(|c: char| c.is_ascii_digit()))
        .collect();

    let [replies, retweets, likes, views] = match numeric.len().checked_sub(4) {
        Some(start) => [
            numeric[start],
            numeric[start + 1],
            numeric[start + 2],
            numeric[start + 3],
        ]
        .map(parse_count),
        None => return Engagement::default(),
    };

    Engagement {
        replies,
        retweets,
        likes,
        views,
    }
}
