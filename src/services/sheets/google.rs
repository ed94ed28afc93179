use async_trait::async_trait;
use serde_json::json;

use super::auth::ServiceAccountAuth;
use super::ReservationSink;
use crate::errors::{AppError, SinkError};
use crate::models::ReservationRecord;

/// Appends reservation rows to a Google Sheets range.
pub struct GoogleSheetsSink {
    auth: ServiceAccountAuth,
    spreadsheet_id: String,
    range: String,
    append_url: reqwest::Url,
    client: reqwest::Client,
}

impl GoogleSheetsSink {
    /// Fails on an unusable API base so a bad deployment is caught at startup.
    pub fn new(
        auth: ServiceAccountAuth,
        spreadsheet_id: String,
        range: String,
        api_base: &str,
        client: reqwest::Client,
    ) -> Result<Self, AppError> {
        let append_url = append_url(api_base, &spreadsheet_id, &range)?;
        Ok(Self {
            auth,
            spreadsheet_id,
            range,
            append_url,
            client,
        })
    }
}

fn append_url(api_base: &str, spreadsheet_id: &str, range: &str) -> Result<reqwest::Url, AppError> {
    let mut url = reqwest::Url::parse(api_base)
        .map_err(|e| AppError::Config(format!("invalid Sheets API base {api_base:?}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| AppError::Config(format!("Sheets API base {api_base:?} cannot hold a path")))?
        .pop_if_empty()
        .push("spreadsheets")
        .push(spreadsheet_id)
        .push("values")
        .push(&format!("{range}:append"));
    Ok(url)
}

#[async_trait]
impl ReservationSink for GoogleSheetsSink {
    async fn append(&self, record: &ReservationRecord) -> Result<(), SinkError> {
        let token = self.auth.authorize().await?;

        let resp = self
            .client
            .post(self.append_url.clone())
            .bearer_auth(token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&json!({ "values": [record.to_row()] }))
            .send()
            .await
            .map_err(|e| SinkError::Append(format!("append request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SinkError::Append(format!("Sheets API returned {status}: {body}")));
        }

        tracing::info!(
            spreadsheet_id = %self.spreadsheet_id,
            range = %self.range,
            service_account = %self.auth.email(),
            "reservation row appended"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &str = include_str!("../../../tests/fixtures/test_service_account_key.pem");

    fn sink(api_base: &str) -> Result<GoogleSheetsSink, AppError> {
        let client = reqwest::Client::new();
        let auth = ServiceAccountAuth::new(
            "bot@example.iam.gserviceaccount.com".to_string(),
            TEST_KEY,
            "https://oauth2.googleapis.com/token".to_string(),
            client.clone(),
        )
        .unwrap();
        GoogleSheetsSink::new(
            auth,
            "sheet-123".to_string(),
            "Sheet1!A1:F1".to_string(),
            api_base,
            client,
        )
    }

    #[test]
    fn test_append_url() {
        let sink = sink("https://sheets.googleapis.com/v4").unwrap();
        assert_eq!(
            sink.append_url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/Sheet1!A1:F1:append"
        );
    }

    #[test]
    fn test_append_url_trailing_slash() {
        let sink = sink("http://127.0.0.1:9000/v4/").unwrap();
        assert_eq!(
            sink.append_url.path(),
            "/v4/spreadsheets/sheet-123/values/Sheet1!A1:F1:append"
        );
    }

    #[test]
    fn test_bad_base_rejected_at_construction() {
        assert!(matches!(sink("not a url"), Err(AppError::Config(_))));
        assert!(matches!(sink("mailto:ops@example.com"), Err(AppError::Config(_))));
    }
}
