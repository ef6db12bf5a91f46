use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::{FetchError, MetricTable, ensure_success};

const SERVICE: &str = "sheet";

/// Fetches the KPI grid from a values endpoint shaped like
/// `{ "values": [["label", "value", ...], ...] }`.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    url: String,
}

impl SheetsClient {
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            url: url.into(),
        }
    }

    pub async fn fetch_table(&self) -> Result<MetricTable, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::transport(SERVICE))?;
        let payload: ValuesResponse = ensure_success(SERVICE, response)?
            .json()
            .await
            .map_err(FetchError::decode(SERVICE))?;

        Ok(MetricTable::new(
            payload
                .values
                .into_iter()
                .map(|row| row.into_iter().map(cell_text).collect())
                .collect(),
        ))
    }
}

fn cell_text(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(text) => text,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells_keep_their_text_form() {
        assert_eq!(cell_text(serde_json::json!("$1,200")), "$1,200");
        assert_eq!(cell_text(serde_json::json!(42.5)), "42.5");
        assert_eq!(cell_text(serde_json::Value::Null), "");
    }

    #[test]
    fn missing_values_key_is_an_empty_table() {
        let payload: ValuesResponse =
            serde_json::from_str(r#"{"range":"KPIs!A1:F11"}"#).expect("payload");
        assert!(payload.values.is_empty());
    }
}
