//! Invite token codec for referral links.
//!
//! A token is `base64(name) "|" base64(phone)`, each half encoded
//! independently. Tokens travel inside URL query strings and routinely
//! arrive percent-encoded once or twice by intermediate handling, with
//! `=` padding showing up as `%3D` and similar. Decoding therefore works
//! through an ordered list of candidate readings instead of a strict parse.
//!
//! The token identifies an inviter for display purposes only; it is not a
//! signed credential.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;

/// The `(name, phone)` pair carried by an invite token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitee {
    pub name: String,
    pub phone: String,
}

/// Encodes an inviter identity into a URL-embeddable token.
///
/// Empty fields encode to empty base64 halves and round-trip as empty
/// strings.
pub fn encode(name: &str, phone: &str) -> String {
    format!(
        "{}|{}",
        STANDARD.encode(name.as_bytes()),
        STANDARD.encode(phone.as_bytes())
    )
}

/// Decodes an invite token, tolerating URL-transport mangling.
///
/// Candidate readings are tried in order; the first one whose halves both
/// base64-decode into valid UTF-8 wins. An undecodable token yields `None`,
/// which callers treat as "no inviter known" rather than an error.
pub fn decode(token: &str) -> Option<Invitee> {
    candidate_readings(token)
        .into_iter()
        .find_map(|reading| decode_reading(&reading))
}

/// The ordered decode attempts: percent-decode once, then the token as-is,
/// then manual substitution of the escapes double encoding leaves behind.
fn candidate_readings(token: &str) -> [Vec<u8>; 3] {
    [
        percent_decode_once(token.as_bytes()),
        token.as_bytes().to_vec(),
        substitute_known_escapes(token).into_bytes(),
    ]
}

/// Splits one reading at the first `|` and decodes both halves.
fn decode_reading(reading: &[u8]) -> Option<Invitee> {
    let separator = reading.iter().position(|&b| b == b'|')?;
    let name = decode_half(&reading[..separator])?;
    let phone = decode_half(&reading[separator + 1..])?;
    Some(Invitee { name, phone })
}

/// Extracts the base64 alphabet characters from one half, re-pads to a
/// multiple of four, and decodes. Stray padding and leftover escape bytes
/// are dropped by the extraction.
fn decode_half(half: &[u8]) -> Option<String> {
    let mut extracted: Vec<u8> = half
        .iter()
        .copied()
        .filter(|b| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/')
        .collect();

    match extracted.len() % 4 {
        0 => {}
        // A 4n+1-length block cannot be valid base64 under any padding.
        1 => return None,
        n => extracted.extend(std::iter::repeat(b'=').take(4 - n)),
    }

    let raw = STANDARD.decode(&extracted).ok()?;
    String::from_utf8(raw).ok()
}

/// Decodes `%XX` escapes a single time; malformed escapes pass through
/// untouched.
fn percent_decode_once(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        if input[i] == b'%' && i + 2 < input.len() {
            if let (Some(hi), Some(lo)) = (hex_value(input[i + 1]), hex_value(input[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(input[i]);
        i += 1;
    }
    out
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Replaces the escapes that survive a partial percent-decode of a token:
/// padding and the two base64 symbols outside the unreserved set.
fn substitute_known_escapes(token: &str) -> String {
    token
        .replace("%3D", "=")
        .replace("%3d", "=")
        .replace("%2B", "+")
        .replace("%2b", "+")
        .replace("%2F", "/")
        .replace("%2f", "/")
}
