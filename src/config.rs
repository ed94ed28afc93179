use std::env;

use crate::errors::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub spreadsheet_id: String,
    pub sheet_range: String,
    pub service_account_email: String,
    pub service_account_private_key: String,
    pub service_account_file: Option<String>,
    pub token_uri: String,
    pub sheets_api_base: String,
    /// Declared for the agent's locale; not applied to slot values.
    pub time_zone: String,
    pub time_zone_offset: String,
    pub transfer_phone_number: Option<String>,
    pub telephony_responses: bool,
    pub debug: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            spreadsheet_id: env::var("SPREADSHEET_ID").unwrap_or_default(),
            sheet_range: env::var("SHEET_RANGE").unwrap_or_else(|_| "Sheet1!A1:F1".to_string()),
            service_account_email: env::var("GOOGLE_SERVICE_ACCOUNT_EMAIL").unwrap_or_default(),
            service_account_private_key: env::var("GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY")
                .map(|key| unescape_newlines(&key))
                .unwrap_or_default(),
            service_account_file: non_empty(env::var("GOOGLE_SERVICE_ACCOUNT_FILE").ok()),
            token_uri: env::var("GOOGLE_TOKEN_URI")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
            sheets_api_base: env::var("SHEETS_API_BASE")
                .unwrap_or_else(|_| "https://sheets.googleapis.com/v4".to_string()),
            time_zone: env::var("TIME_ZONE").unwrap_or_else(|_| "America/Los_Angeles".to_string()),
            time_zone_offset: env::var("TIME_ZONE_OFFSET").unwrap_or_else(|_| "-07:00".to_string()),
            transfer_phone_number: non_empty(env::var("TRANSFER_PHONE_NUMBER").ok()),
            telephony_responses: flag("TELEPHONY_RESPONSES"),
            debug: flag("FULFILLMENT_DEBUG"),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(AppError::Config("SPREADSHEET_ID must be set".to_string()));
        }
        if self.service_account_email.is_empty() || self.service_account_private_key.is_empty() {
            return Err(AppError::Config(
                "service account credentials are missing (set GOOGLE_SERVICE_ACCOUNT_FILE or \
                 GOOGLE_SERVICE_ACCOUNT_EMAIL and GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Keys pasted into a single-line env var usually carry literal `\n` sequences.
pub fn unescape_newlines(key: &str) -> String {
    key.replace("\\n", "\n")
}
