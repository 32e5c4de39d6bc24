//! Referral slug derivation for invite-chain links.
//!
//! A slug is `<lowercased-dash-joined-name>-<unix-millis>`. The millisecond
//! suffix keeps two links minted for the same name apart; the slug is a
//! display and tracking convenience, not a primary key, and is not globally
//! unique.

use chrono::Utc;

lazy_static::lazy_static! {
    static ref TIMESTAMP_SUFFIX: regex::Regex = regex::Regex::new(r"-\d+$").unwrap();
}

/// Derives a shareable path segment from a display name.
pub fn generate(display_name: &str) -> String {
    generate_at(display_name, Utc::now().timestamp_millis())
}

/// As [`generate`], with the mint time supplied by the caller.
pub fn generate_at(display_name: &str, minted_at_millis: i64) -> String {
    let lowered = display_name.trim().to_lowercase();
    let joined = lowered.split_whitespace().collect::<Vec<_>>().join("-");
    format!("{}-{}", joined, minted_at_millis)
}

/// Recovers a presentable name from a slug.
///
/// The trailing `-<digits>` timestamp is stripped when present (a no-op
/// otherwise), then each whitespace-separated word is title-cased and the
/// words are rejoined with single spaces.
pub fn recover_display_name(slug: &str) -> String {
    let stripped = TIMESTAMP_SUFFIX.replace(slug, "");
    stripped
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
