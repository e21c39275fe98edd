//! Password strength estimation
//!
//! Scores a candidate secret between 0.0 and 1.0 from its length, the
//! character classes it uses and the Shannon entropy of its characters.
//! Dictionary-like values (repeated chunks, word phrases, well-known literals)
//! are dampened so that they never look like real secrets.

use std::collections::HashMap;

/// Score above which a value is treated as a real secret
pub const LIKELY_PASSWORD_THRESHOLD: f64 = 0.5;

const LENGTH_WEIGHT: f64 = 0.5;
const DIVERSITY_WEIGHT: f64 = 0.3;
const ENTROPY_WEIGHT: f64 = 0.2;

/// Length at which the length component saturates
const SATURATION_LENGTH: usize = 8;

const PHRASE_DAMPENER: f64 = 0.3;
const PHRASE_SEPARATORS: [char; 3] = ['-', '_', '.'];
const MIN_SEPARATED_WORDS: usize = 3;
const MIN_SPACED_WORDS: usize = 2;

/// Values that commonly sit under secret-looking keys without being secrets
const NON_SECRET_LITERALS: &[&str] = &[
    "true", "false", "yes", "no", "on", "off", "none", "null", "nil", "omit", "present",
    "absent", "always", "never", "on_create", "latest",
];

/// Returns true if the value scores above [`LIKELY_PASSWORD_THRESHOLD`]
///
/// ```
/// use task_anonymizer::is_likely_password;
///
/// assert!(is_likely_password("@This-should-disapear!"));
/// assert!(!is_likely_password("teal-kiwi-chile"));
/// assert!(!is_likely_password(""));
/// ```
pub fn is_likely_password(value: &str) -> bool {
    password_strength(value) > LIKELY_PASSWORD_THRESHOLD
}

/// Estimate how strong `value` would be as a password, in `[0.0, 1.0]`
pub fn password_strength(value: &str) -> f64 {
    if value.is_empty() || is_non_secret_literal(value) {
        return 0.0;
    }

    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();

    let length = len.min(SATURATION_LENGTH) as f64 / SATURATION_LENGTH as f64;
    let diversity = character_classes(&chars) as f64 / 4.0;
    let entropy = normalized_entropy(&chars);

    let mut score = LENGTH_WEIGHT * length + DIVERSITY_WEIGHT * diversity + ENTROPY_WEIGHT * entropy;

    if let Some(period) = smallest_period(&chars) {
        score *= period as f64 / len as f64;
    }
    if is_phrase(value) {
        score *= PHRASE_DAMPENER;
    }

    score.clamp(0.0, 1.0)
}

fn is_non_secret_literal(value: &str) -> bool {
    let lowered = value.to_lowercase();
    NON_SECRET_LITERALS.contains(&lowered.as_str())
}

/// Number of classes among lowercase, uppercase, digit and other
fn character_classes(chars: &[char]) -> usize {
    let lower = chars.iter().any(|c| c.is_lowercase());
    let upper = chars.iter().any(|c| c.is_uppercase());
    let digit = chars.iter().any(|c| c.is_numeric());
    let other = chars
        .iter()
        .any(|c| !c.is_lowercase() && !c.is_uppercase() && !c.is_numeric());

    [lower, upper, digit, other].iter().filter(|present| **present).count()
}

/// Shannon entropy of the character distribution divided by its maximum
fn normalized_entropy(chars: &[char]) -> f64 {
    let len = chars.len();
    if len <= 1 {
        return 1.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in chars {
        *counts.entry(*c).or_insert(0) += 1;
    }

    let total = len as f64;
    let entropy: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum();

    entropy / total.log2()
}

/// Shortest chunk that tiles the whole value, if the value is a repetition
fn smallest_period(chars: &[char]) -> Option<usize> {
    let len = chars.len();
    (1..len)
        .filter(|period| len % period == 0)
        .find(|&period| (period..len).all(|i| chars[i] == chars[i % period]))
}

/// Words joined by spaces or by a single repeated separator
fn is_phrase(value: &str) -> bool {
    let all_alphabetic = |word: &str| !word.is_empty() && word.chars().all(char::is_alphabetic);

    let spaced: Vec<&str> = value.split_whitespace().collect();
    if spaced.len() >= MIN_SPACED_WORDS && spaced.iter().all(|w| all_alphabetic(*w)) {
        return true;
    }

    PHRASE_SEPARATORS.iter().any(|sep| {
        let words: Vec<&str> = value.split(*sep).collect();
        words.len() >= MIN_SEPARATED_WORDS && words.iter().all(|w| all_alphabetic(*w))
    })
}
