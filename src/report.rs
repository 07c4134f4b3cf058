// 📦 Report pipeline - aggregate, render, write
// Records are fetched completely before this runs, so a store failure never
// leaves half-written outputs behind.

use crate::aggregate::{Aggregation, HOUSE_GAMES};
use crate::config::OutputPaths;
use crate::record::Record;
use crate::render::{export_csv, render_gamers_list, render_numbered_listing, write_text_file};
use anyhow::Result;
use tracing::info;

/// Counts reported at the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub records: usize,
    pub participants: usize,
    /// All numbered games, house games included
    pub total_games: usize,
    pub house_games: usize,
    pub csv_columns: usize,
    pub skipped_records: usize,
}

impl ReportSummary {
    pub fn summary(&self) -> String {
        format!(
            "Participants: {}, Games: {} (including {} house games), Records: {}, CSV columns: {}, Skipped: {}",
            self.participants,
            self.total_games,
            self.house_games,
            self.records,
            self.csv_columns,
            self.skipped_records
        )
    }
}

/// Write the games listing, the gamers list and the CSV export.
///
/// Files are overwritten in that order; the first write failure aborts.
pub fn generate_reports(records: &[Record], outputs: &OutputPaths) -> Result<ReportSummary> {
    let aggregation = Aggregation::from_records(records);

    write_text_file(&outputs.games_listing, &render_numbered_listing(&aggregation))?;
    info!(path = %outputs.games_listing.display(), "Games listing written");

    write_text_file(&outputs.gamers, &render_gamers_list(&aggregation))?;
    info!(path = %outputs.gamers.display(), "Gamers list written");

    let csv_columns = export_csv(records, &outputs.csv)?;
    info!(path = %outputs.csv.display(), columns = csv_columns, "CSV export written");

    Ok(ReportSummary {
        records: records.len(),
        participants: aggregation.participant_count(),
        total_games: aggregation.total_games(),
        house_games: HOUSE_GAMES.len(),
        csv_columns,
        skipped_records: aggregation.skipped_records,
    })
}
