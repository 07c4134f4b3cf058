// Games Listing - Core Library
// Exposes all modules for use in the CLI and tests

pub mod record;    // Typed-attribute envelope + decoder
pub mod resolver;  // Name / games field guessing
pub mod aggregate; // Games grouped by participant
pub mod render;    // Numbered listing, gamers list, CSV
pub mod source;    // DynamoDB scan, JSON scan dump
pub mod report;    // End-to-end pipeline
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use record::{record_from_item, AttributeValue, PlainValue, Record};
pub use resolver::{
    capitalize_name, resolve_games, resolve_name, split_games, GAMES_FIELDS, NAME_FIELDS,
};
pub use aggregate::{Aggregation, ParticipantEntry, HOUSE_GAMES, HOUSE_LABEL};
pub use render::{
    csv_columns, export_csv, render_gamers_list, render_numbered_listing, write_csv,
    write_text_file, PREFERRED_COLUMNS,
};
pub use source::{DynamoDbSource, JsonFileSource, RecordSource};
pub use report::{generate_reports, ReportSummary};
pub use config::{AwsConfig, Config, OutputPaths};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
