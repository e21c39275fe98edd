//! Surrogate generation
//!
//! Surrogates replace redacted values with synthetic ones that keep the
//! original's shape. Every generator takes its random source as an argument
//! so callers can pin it.

use crate::anonymization::detector::patterns::EMAIL;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Captures;

/// Reserved domain (RFC 2606) used by every generated email address
pub const SURROGATE_EMAIL_DOMAIN: &str = "example.com";

/// Largest numeric suffix appended to a surrogate email name
pub const MAX_EMAIL_SUFFIX: u32 = 100;

const COLOURS: &[&str] = &[
    "amber", "azure", "blue", "coral", "crimson", "green", "indigo", "ivory", "maroon", "olive",
    "orange", "purple", "red", "scarlet", "teal", "violet",
];

const FRUITS: &[&str] = &[
    "apple", "apricot", "banana", "cherry", "fig", "grape", "guava", "kiwi", "lemon", "lime",
    "lychee", "mango", "melon", "papaya", "peach", "plum",
];

const COUNTRIES: &[&str] = &[
    "brazil", "canada", "chile", "egypt", "france", "ghana", "iceland", "india", "italy",
    "japan", "kenya", "mexico", "nepal", "norway", "peru", "spain",
];

const NAMES: &[&str] = &[
    "alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi", "ivan", "judy",
    "mallory", "oscar", "peggy", "trent", "victor", "wendy",
];

fn pick<R: Rng + ?Sized>(words: &[&'static str], rng: &mut R) -> &'static str {
    words.choose(rng).copied().unwrap_or_default()
}

/// Generate a weak, readable `colour-fruit-country` password
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use task_anonymizer::{generate_surrogate_password, is_likely_password};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let password = generate_surrogate_password(&mut rng);
/// assert_eq!(password.split('-').count(), 3);
/// assert!(!is_likely_password(&password));
/// ```
pub fn generate_surrogate_password<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}-{}-{}",
        pick(COLOURS, rng),
        pick(FRUITS, rng),
        pick(COUNTRIES, rng)
    )
}

/// Generate `<name><0..=100>@example.com`
pub fn generate_surrogate_email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let name = pick(NAMES, rng);
    let suffix = rng.gen_range(0..=MAX_EMAIL_SUFFIX);
    format!("{name}{suffix}@{SURROGATE_EMAIL_DOMAIN}")
}

/// Replace every email address inside `value` with a fresh surrogate
///
/// Text around the addresses is kept. A value without any address is
/// returned unchanged.
pub fn remove_email<R: Rng + ?Sized>(value: &str, rng: &mut R) -> String {
    EMAIL
        .replace_all(value, |_: &Captures<'_>| generate_surrogate_email(rng))
        .into_owned()
}
