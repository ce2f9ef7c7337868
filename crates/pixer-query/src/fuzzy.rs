//! Approximate substring scoring.
//!
//! A [`Pattern`] is scored against a field's text by finding the substring
//! of the text it matches with the fewest edits (insertions, deletions,
//! substitutions). The score combines that error rate with a penalty for
//! how far into the text the match starts:
//!
//! ```text
//! score = errors / pattern_len + start / distance
//! ```
//!
//! `0.0` is a perfect match at the start of the text. A text matches when
//! its best score is at or below the threshold.

/// Scores below this are treated as this value when multiplied together,
/// so a perfect match on one field does not erase the others.
pub const SCORE_EPSILON: f64 = 0.001;

/// Tuning for approximate matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyOptions {
    /// Highest score that still counts as a match, in `[0, 1]`.
    pub threshold: f64,
    /// Characters of start offset that add `1.0` to the score.
    pub distance: usize,
    /// Score matches on errors alone, wherever they start.
    pub ignore_location: bool,
    /// Compare characters exactly instead of lowercased.
    pub case_sensitive: bool,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        FuzzyOptions {
            threshold: 0.3,
            distance: 100,
            ignore_location: false,
            case_sensitive: false,
        }
    }
}

/// Normalizes text into the character form the scorer works on.
pub fn normalize(text: &str, case_sensitive: bool) -> Box<[char]> {
    if case_sensitive {
        text.chars().collect()
    } else {
        text.chars().flat_map(char::to_lowercase).collect()
    }
}

/// A normalized search pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    chars: Box<[char]>,
    options: FuzzyOptions,
}

impl Pattern {
    /// Normalizes `text` into a pattern scored with `options`.
    pub fn new(text: &str, options: FuzzyOptions) -> Self {
        Pattern {
            chars: normalize(text, options.case_sensitive),
            options,
        }
    }

    /// Returns `true` if the pattern has no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Scores already-normalized text, returning `Some(score)` on a match.
    pub fn matches(&self, text: &[char]) -> Option<f64> {
        let score = self.score(text);
        if self.options.threshold >= 1.0 || score <= self.options.threshold {
            Some(score)
        } else {
            None
        }
    }

    /// Returns the best score of this pattern against normalized text.
    pub fn score(&self, text: &[char]) -> f64 {
        let pattern = &self.chars;
        let m = pattern.len();
        if m == 0 {
            return 0.0;
        }

        // One text column of the semi-global edit matrix: `cost[i]` is the
        // fewest edits aligning pattern[..i] with a substring ending at the
        // current text position, `start[i]` where that substring begins.
        let mut cost: Vec<usize> = (0..=m).collect();
        let mut start: Vec<usize> = vec![0; m + 1];
        let mut best = self.position_score(m, 0);

        for (j, &tc) in text.iter().enumerate() {
            let mut diag_cost = cost[0];
            let mut diag_start = start[0];
            cost[0] = 0;
            start[0] = j + 1;

            for i in 1..=m {
                let substitution = diag_cost + usize::from(pattern[i - 1] != tc);
                let mut next = (substitution, diag_start);

                let skip_text = (cost[i] + 1, start[i]);
                if skip_text < next {
                    next = skip_text;
                }
                let skip_pattern = (cost[i - 1] + 1, start[i - 1]);
                if skip_pattern < next {
                    next = skip_pattern;
                }

                diag_cost = cost[i];
                diag_start = start[i];
                cost[i] = next.0;
                start[i] = next.1;
            }

            let score = self.position_score(cost[m], start[m]);
            if score < best {
                best = score;
                if best == 0.0 {
                    break;
                }
            }
        }

        best
    }

    fn position_score(&self, errors: usize, start: usize) -> f64 {
        let accuracy = errors as f64 / self.chars.len() as f64;
        if self.options.ignore_location || start == 0 {
            return accuracy;
        }
        if self.options.distance == 0 {
            return 1.0;
        }
        accuracy + start as f64 / self.options.distance as f64
    }
}
