// 🔎 Field Resolver - find the name and games fields in a registration
// Registrations came from several form versions, so the same data lives
// under different field names. Exact, case-sensitive match against a fixed
// candidate list; first hit wins.

use crate::record::{AttributeValue, Record};
use regex::Regex;
use std::sync::OnceLock;

// ============================================================================
// CANDIDATE LISTS
// ============================================================================

/// Participant name fields, highest priority first
pub const NAME_FIELDS: &[&str] = &[
    "nomeCompleto",
    "name",
    "userName",
    "user_name",
    "nome",
    "username",
    "Name",
    "UserName",
];

/// Games fields, highest priority first
pub const GAMES_FIELDS: &[&str] = &["jogos", "games", "Jogos", "Games"];

/// Placeholder people type when they bring nothing
const NO_GAMES_MARKER: &str = "N/A";

fn game_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[,;\n]+").expect("separator regex is valid"))
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Find the participant name.
///
/// A candidate only counts when it holds non-blank text, so an empty
/// `nomeCompleto` falls through to `name`. Returns an empty string when no
/// candidate matches.
pub fn resolve_name(record: &Record) -> String {
    NAME_FIELDS
        .iter()
        .filter_map(|field| record.get(*field))
        .find_map(|value| value.decode().first_text().map(str::to_string))
        .map(|name| capitalize_name(&name))
        .unwrap_or_default()
}

/// Find the games a participant will bring.
///
/// The first candidate field present wins. Only string and number values
/// (bare, in lists or in sets) count as game names; maps, booleans, binary
/// and unknown tags give an empty list, as does a missing field or `N/A`.
pub fn resolve_games(record: &Record) -> Vec<String> {
    GAMES_FIELDS
        .iter()
        .find_map(|field| record.get(*field))
        .map(game_names)
        .unwrap_or_default()
}

fn game_names(value: &AttributeValue) -> Vec<String> {
    match value {
        AttributeValue::S(text) | AttributeValue::N(text) => split_games(text),
        AttributeValue::Ss(items) | AttributeValue::Ns(items) => {
            items.iter().flat_map(|item| split_games(item)).collect()
        }
        AttributeValue::L(items) => items.iter().flat_map(game_names).collect(),
        AttributeValue::M(_)
        | AttributeValue::Bool(_)
        | AttributeValue::Null
        | AttributeValue::B(_)
        | AttributeValue::Bs(_)
        | AttributeValue::Raw(_) => Vec::new(),
    }
}

/// Split free text on commas, semicolons and line breaks.
///
/// "Catan, Risk;\nUno" → ["Catan", "Risk", "Uno"]
pub fn split_games(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NO_GAMES_MARKER) {
        return Vec::new();
    }

    game_separator()
        .split(trimmed)
        .map(str::trim)
        .filter(|game| !game.is_empty())
        .map(str::to_string)
        .collect()
}

/// First letter uppercase, rest lowercase: "aNA maria" → "Ana maria"
pub fn capitalize_name(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
