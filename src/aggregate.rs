// 🎲 Aggregator - group games by participant
// One pass over the fetched registrations. Participants keep the order in
// which they first appear; the house games always close the list.

use crate::record::Record;
use crate::resolver::{resolve_games, resolve_name};
use std::collections::HashMap;

// ============================================================================
// HOUSE GAMES
// ============================================================================

/// Label for the organizer's own games
pub const HOUSE_LABEL: &str = "Joga Junto (Jogos da Casa)";

/// Games the organizer always brings, in listing order
pub const HOUSE_GAMES: &[&str] = &[
    "Joga Junto",
    "Mind Invaders",
    "Amazoom",
    "Frost Shelter",
    "Pool Party",
    "Azul",
    "Dixit",
    "Scrap Racer",
    "Beaver Creek",
    "Yozu",
    "Café da tarde",
    "Dobrões",
    "Carcasone",
    "Caveiras de Sedlec",
    "Codinames",
    "Bugô",
    "Balde de caranguejo.",
    "Não testamos esse troço/cinético",
    "Lálálá",
    "Sapotagem",
    "Cultive",
    "Exploding Kittens",
    "Revelando Emoções",
    "Dobble",
    "Coup",
    "O Cerco de Runedar",
    "Dogs",
];

// ============================================================================
// TYPES
// ============================================================================

/// ParticipantEntry - a display name and the games under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantEntry {
    pub name: String,
    pub games: Vec<String>,
    /// True only for the synthetic house entry
    pub is_house: bool,
}

impl ParticipantEntry {
    pub fn new(name: &str) -> Self {
        ParticipantEntry {
            name: name.to_string(),
            games: Vec::new(),
            is_house: false,
        }
    }

    fn house() -> Self {
        ParticipantEntry {
            name: HOUSE_LABEL.to_string(),
            games: HOUSE_GAMES.iter().map(|g| g.to_string()).collect(),
            is_house: true,
        }
    }

    /// Append a game unless this participant already listed it
    pub fn add_game(&mut self, game: &str) {
        if !self.games.iter().any(|g| g == game) {
            self.games.push(game.to_string());
        }
    }
}

/// Aggregation - ordered name → games mapping, house entry last
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    entries: Vec<ParticipantEntry>,
    index: HashMap<String, usize>,
    /// Registrations without any recognizable name
    pub skipped_records: usize,
}

impl Aggregation {
    /// Build the aggregation from the full registration set.
    ///
    /// Records without a name are skipped; records without games still
    /// register the participant with an empty list.
    pub fn from_records(records: &[Record]) -> Self {
        let mut aggregation = Aggregation::default();

        for (position, record) in records.iter().enumerate() {
            let name = resolve_name(record);
            if name.is_empty() {
                tracing::debug!(position, "registration has no name field, skipping");
                aggregation.skipped_records += 1;
                continue;
            }

            let games = resolve_games(record);
            if games.is_empty() {
                tracing::debug!(participant = %name, "registration lists no games");
            }
            aggregation.add(&name, &games);
        }

        aggregation.entries.push(ParticipantEntry::house());
        aggregation
    }

    fn add(&mut self, name: &str, games: &[String]) {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                self.entries.push(ParticipantEntry::new(name));
                self.index.insert(name.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[slot];
        for game in games {
            entry.add_game(game);
        }
    }

    /// All entries in listing order, house entry last
    pub fn entries(&self) -> &[ParticipantEntry] {
        &self.entries
    }

    /// Real participants only
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantEntry> {
        self.entries.iter().filter(|e| !e.is_house)
    }

    /// Games for one participant (house entry excluded)
    #[cfg(test)]
    pub fn games_for(&self, name: &str) -> Option<&[String]> {
        self.index
            .get(name)
            .map(|&slot| self.entries[slot].games.as_slice())
    }

    pub fn participant_count(&self) -> usize {
        self.participants().count()
    }

    /// Games across every entry, house games included
    pub fn total_games(&self) -> usize {
        self.entries.iter().map(|e| e.games.len()).sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
