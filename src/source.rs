// 📡 Record Sources - where registrations come from
// Live: a full DynamoDB table scan. Offline: a JSON scan dump
// (`aws dynamodb scan --table-name ... --output json > scan.json`).

use crate::config::AwsConfig;
use crate::record::{record_from_item, Record};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::Client;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// CORE TRAIT
// ============================================================================

/// RecordSource - fetches every registration in one go
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Pull the full record set. Any failure is fatal for the run.
    async fn fetch(&self) -> Result<Vec<Record>>;

    /// Human-readable origin for progress output
    fn describe(&self) -> String;
}

// ============================================================================
// DYNAMODB
// ============================================================================

/// Scans a DynamoDB table, following pagination to the end
pub struct DynamoDbSource {
    client: Client,
    table_name: String,
}

impl DynamoDbSource {
    pub fn new(client: Client, table_name: &str) -> Self {
        DynamoDbSource {
            client,
            table_name: table_name.to_string(),
        }
    }

    /// Build a client from config.
    ///
    /// Static credentials are used only when both key id and secret are
    /// set; otherwise the default AWS provider chain applies.
    pub async fn connect(aws: &AwsConfig, table_name: &str) -> Result<Self> {
        info!(region = %aws.region, "Initializing DynamoDB client");

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(aws.region.clone()));

        if let Some((key_id, secret)) = aws.static_credentials() {
            debug!("Using static credentials from environment");
            loader = loader.credentials_provider(Credentials::new(
                key_id,
                secret,
                None,
                None,
                "games-listing-env",
            ));
        }

        if let Some(endpoint) = &aws.endpoint_url {
            debug!(endpoint = %endpoint, "Using custom DynamoDB endpoint");
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Ok(Self::new(Client::new(&sdk_config), table_name))
    }
}

#[async_trait]
impl RecordSource for DynamoDbSource {
    async fn fetch(&self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        let mut start_key = None;
        let mut page = 0usize;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| {
                    anyhow!(
                        "Failed to scan table {}: {}",
                        self.table_name,
                        DisplayErrorContext(&e)
                    )
                })?;

            page += 1;
            let items = output.items.unwrap_or_default();
            debug!(page, items = items.len(), "Scanned page");
            records.extend(items.into_iter().map(record_from_item));

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(records)
    }

    fn describe(&self) -> String {
        format!("DynamoDB table {}", self.table_name)
    }
}

// ============================================================================
// JSON SCAN DUMP
// ============================================================================

/// Shapes accepted for a scan dump
#[derive(Deserialize)]
#[serde(untagged)]
enum ScanDump {
    /// `aws dynamodb scan` output
    Cli {
        #[serde(rename = "Items")]
        items: Vec<Record>,
    },
    /// Bare list of items
    Items(Vec<Record>),
}

/// Reads registrations from a JSON scan dump on disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: &Path) -> Self {
        JsonFileSource {
            path: path.to_path_buf(),
        }
    }

    /// Parse a scan dump already in memory
    pub fn parse(contents: &str) -> Result<Vec<Record>> {
        let dump: ScanDump =
            serde_json::from_str(contents).context("Failed to parse scan dump JSON")?;

        Ok(match dump {
            ScanDump::Cli { items } => items,
            ScanDump::Items(items) => items,
        })
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<Record>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read scan dump: {}", self.path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Invalid scan dump: {}", self.path.display()))
    }

    fn describe(&self) -> String {
        format!("scan dump {}", self.path.display())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::AttributeValue;
    use aws_sdk_dynamodb::operation::scan::{ScanError, ScanOutput};
    use aws_sdk_dynamodb::types::error::ResourceNotFoundException;
    use aws_sdk_dynamodb::types::AttributeValue as SdkAttributeValue;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};
    use std::collections::HashMap;

    fn item(id: &str) -> HashMap<String, SdkAttributeValue> {
        HashMap::from([("id".to_string(), SdkAttributeValue::S(id.to_string()))])
    }

    #[tokio::test]
    async fn test_scan_follows_last_evaluated_key() {
        let first_page = mock!(Client::scan)
            .match_requests(|req| req.exclusive_start_key().is_none())
            .then_output(|| {
                ScanOutput::builder()
                    .items(item("r1"))
                    .items(item("r2"))
                    .last_evaluated_key("id", SdkAttributeValue::S("r2".to_string()))
                    .build()
            });
        let second_page = mock!(Client::scan)
            .match_requests(|req| {
                req.exclusive_start_key()
                    .and_then(|key| key.get("id"))
                    .is_some_and(|id| id.as_s().is_ok_and(|s| s == "r2"))
            })
            .then_output(|| ScanOutput::builder().items(item("r3")).build());

        let client = mock_client!(
            aws_sdk_dynamodb,
            RuleMode::Sequential,
            &[&first_page, &second_page]
        );
        let source = DynamoDbSource::new(client, "Registrations");

        let records = source.fetch().await.unwrap();

        let ids: Vec<&AttributeValue> = records.iter().map(|r| &r["id"]).collect();
        assert_eq!(
            ids,
            vec![
                &AttributeValue::S("r1".to_string()),
                &AttributeValue::S("r2".to_string()),
                &AttributeValue::S("r3".to_string()),
            ]
        );
        assert_eq!(first_page.num_calls(), 1);
        assert_eq!(second_page.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_scan_stops_on_empty_last_evaluated_key() {
        let only_page = mock!(Client::scan).then_output(|| {
            ScanOutput::builder()
                .items(item("r1"))
                .set_last_evaluated_key(Some(HashMap::new()))
                .build()
        });

        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&only_page]);
        let source = DynamoDbSource::new(client, "Registrations");

        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(only_page.num_calls(), 1);
    }

    #[tokio::test]
    async fn test_scan_error_names_table() {
        let missing_table = mock!(Client::scan).then_error(|| {
            ScanError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Requested resource not found")
                    .build(),
            )
        });

        let client = mock_client!(aws_sdk_dynamodb, RuleMode::Sequential, &[&missing_table]);
        let source = DynamoDbSource::new(client, "JogaJuntoRegistrations");

        let err = source.fetch().await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Failed to scan table JogaJuntoRegistrations"));
        assert!(message.contains("Requested resource not found"));
    }

    #[test]
    fn test_parse_cli_dump() {
        let json = r#"{
            "Items": [
                {"nomeCompleto": {"S": "Ana"}, "jogos": {"S": "Catan"}},
                {"nomeCompleto": {"S": "Bea"}}
            ],
            "Count": 2,
            "ScannedCount": 2
        }"#;

        let records = JsonFileSource::parse(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["jogos"], AttributeValue::S("Catan".to_string()));
    }

    #[test]
    fn test_parse_bare_array() {
        let json = r#"[{"name": "Ana", "games": ["Catan", "Risk"]}]"#;

        let records = JsonFileSource::parse(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["name"], AttributeValue::S("Ana".to_string()));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(JsonFileSource::parse("not json").is_err());
        assert!(JsonFileSource::parse(r#"{"Count": 0}"#).is_err());
    }

    #[tokio::test]
    async fn test_fetch_missing_file_fails() {
        let source = JsonFileSource::new(Path::new("/nonexistent/scan.json"));
        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read scan dump"));
    }
}
