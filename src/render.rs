// 📝 Renderers - numbered listing, gamers list, CSV export
// Listings are pure functions over the Aggregation; the CSV export works on
// the raw registrations.

use crate::aggregate::Aggregation;
use crate::record::{PlainValue, Record};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

/// Columns that lead the CSV export when present, in this order.
/// Every other field follows alphabetically.
pub const PREFERRED_COLUMNS: &[&str] = &[
    "id",
    "nomeCompleto",
    "email",
    "celular",
    "cidade",
    "dataNascimento",
    "edicao",
    "jogos",
    "possuiJogos",
    "interesseRPG",
    "status",
    "createdAt",
    "instagram",
    "protecaoDados",
    "usoImagem",
];

// ============================================================================
// TEXT LISTINGS
// ============================================================================

/// Games listing, one running counter across every participant:
///
/// ```text
/// - Ana
///    1) Catan
///    2) Risk
///
/// - Bea
///    3) Uno
/// ```
pub fn render_numbered_listing(aggregation: &Aggregation) -> String {
    let mut out = String::new();
    let mut counter = 1usize;

    for entry in aggregation.entries() {
        let _ = writeln!(out, "- {}", entry.name);
        for game in &entry.games {
            let _ = writeln!(out, "   {}) {}", counter, game);
            counter += 1;
        }
        out.push('\n');
    }

    out
}

/// Every display name (house label included), case-insensitive order
pub fn render_gamers_list(aggregation: &Aggregation) -> String {
    let mut names: Vec<&str> = aggregation
        .entries()
        .iter()
        .map(|e| e.name.as_str())
        .collect();

    names.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });

    let mut out = String::new();
    for name in names {
        out.push_str(name);
        out.push('\n');
    }
    out
}

// ============================================================================
// CSV EXPORT
// ============================================================================

/// Union of every field name, preferred columns first
pub fn csv_columns(records: &[Record]) -> Vec<String> {
    let mut remaining: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.keys().map(String::as_str))
        .collect();

    let mut columns = Vec::with_capacity(remaining.len());
    for preferred in PREFERRED_COLUMNS {
        if remaining.remove(preferred) {
            columns.push(preferred.to_string());
        }
    }
    columns.extend(remaining.into_iter().map(str::to_string));

    columns
}

/// Write all registrations as CSV; missing fields become empty cells.
///
/// Zero records writes nothing at all (no header). Returns the column count.
pub fn write_csv<W: Write>(records: &[Record], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        csv_writer.flush().context("Failed to flush CSV output")?;
        return Ok(0);
    }

    let columns = csv_columns(records);
    csv_writer
        .write_record(&columns)
        .context("Failed to write CSV header")?;

    for (row, record) in records.iter().enumerate() {
        let cells = columns.iter().map(|column| {
            record
                .get(column)
                .map(|value| value.decode())
                .unwrap_or(PlainValue::Empty)
                .to_cell()
        });
        csv_writer
            .write_record(cells)
            .with_context(|| format!("Failed to write CSV row {}", row + 1))?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(columns.len())
}

// ============================================================================
// FILE HELPERS
// ============================================================================

/// Overwrite `path` with `contents`
pub fn write_text_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Overwrite `path` with the CSV export, returns the column count
pub fn export_csv(records: &[Record], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_csv(records, file).with_context(|| format!("Failed to export CSV: {}", path.display()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{HOUSE_GAMES, HOUSE_LABEL};
    use crate::record::AttributeValue;

    fn s(text: &str) -> AttributeValue {
        AttributeValue::S(text.to_string())
    }

    fn record(fields: &[(&str, AttributeValue)]) -> Record {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn sample_records() -> Vec<Record> {
        vec![
            record(&[
                ("name", s("Ana")),
                ("games", AttributeValue::L(vec![s("Catan"), s("Risk")])),
            ]),
            record(&[("name", s("Bea")), ("games", s("Uno"))]),
        ]
    }

    #[test]
    fn test_numbered_listing_counter_never_resets() {
        let agg = Aggregation::from_records(&sample_records());
        let listing = render_numbered_listing(&agg);

        assert!(listing.starts_with("- Ana\n   1) Catan\n   2) Risk\n\n- Bea\n   3) Uno\n\n"));
        assert!(listing.contains(&format!("- {}\n   4) {}\n", HOUSE_LABEL, HOUSE_GAMES[0])));

        let numbers: Vec<usize> = listing
            .lines()
            .filter_map(|line| line.trim_start().split_once(") "))
            .filter_map(|(n, _)| n.parse().ok())
            .collect();
        let expected: Vec<usize> = (1..=3 + HOUSE_GAMES.len()).collect();
        assert_eq!(numbers, expected);
    }

    #[test]
    fn test_numbered_listing_empty_input() {
        let agg = Aggregation::from_records(&[]);
        let listing = render_numbered_listing(&agg);

        assert!(listing.starts_with(&format!("- {}\n   1) ", HOUSE_LABEL)));
        assert_eq!(listing.matches("\n- ").count(), 0);
    }

    #[test]
    fn test_numbered_listing_participant_without_games() {
        let records = vec![record(&[("nome", s("Caio"))])];
        let agg = Aggregation::from_records(&records);
        let listing = render_numbered_listing(&agg);

        assert!(listing.starts_with(&format!("- Caio\n\n- {}\n   1) ", HOUSE_LABEL)));
    }

    #[test]
    fn test_gamers_list_sorted_case_insensitive() {
        let records = vec![
            record(&[("name", s("zeca"))]),
            record(&[("name", s("Ana"))]),
            record(&[("name", s("ítalo"))]),
            record(&[("name", s("bruno"))]),
        ];
        let agg = Aggregation::from_records(&records);
        let list = render_gamers_list(&agg);
        let lines: Vec<&str> = list.lines().collect();

        assert_eq!(lines.len(), 4 + 1);
        assert_eq!(lines, vec!["Ana", "Bruno", HOUSE_LABEL, "Zeca", "Ítalo"]);
    }

    #[test]
    fn test_csv_columns_union_preferred_first() {
        let records = vec![
            record(&[("zeta", s("1")), ("email", s("a@b.c")), ("nomeCompleto", s("Ana"))]),
            record(&[("alpha", s("x")), ("id", s("42")), ("email", s("b@c.d"))]),
        ];

        assert_eq!(
            csv_columns(&records),
            vec!["id", "nomeCompleto", "email", "alpha", "zeta"]
        );
    }

    #[test]
    fn test_write_csv_rows() {
        let records = vec![
            record(&[
                ("id", s("1")),
                ("jogos", AttributeValue::L(vec![s("Catan"), s("Risk, 2")])),
            ]),
            record(&[("id", s("2")), ("usoImagem", AttributeValue::Bool(true))]),
        ];

        let mut buffer = Vec::new();
        let columns = write_csv(&records, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(columns, 3);
        assert_eq!(
            text,
            "id,jogos,usoImagem\n1,\"Catan; Risk, 2\",\n2,,true\n"
        );
    }

    #[test]
    fn test_write_csv_empty_input_writes_nothing() {
        let mut buffer = Vec::new();
        let columns = write_csv(&[], &mut buffer).unwrap();

        assert_eq!(columns, 0);
        assert!(buffer.is_empty());
    }
}
