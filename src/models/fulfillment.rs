use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inbound webhook body sent by the agent platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
    pub query_result: QueryResult,
    #[serde(default)]
    pub original_detect_intent_request: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub query_text: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    pub intent: IntentRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRef {
    #[serde(default)]
    pub name: Option<String>,
    pub display_name: String,
}

/// One classified intent with its slot parameters, owned for the duration of
/// a single webhook call.
#[derive(Debug, Clone)]
pub struct IntentEvent {
    pub intent: String,
    pub parameters: Map<String, Value>,
    pub language_code: String,
    pub session: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl IntentEvent {
    pub fn from_request(request: WebhookRequest, headers: HashMap<String, String>, body: String) -> Self {
        let query = request.query_result;
        Self {
            intent: query.intent.display_name,
            parameters: query.parameters,
            language_code: query.language_code.unwrap_or_else(|| "en".to_string()),
            session: request.session,
            headers,
            body,
        }
    }

    /// Slot value as text. Person entities arrive as `{"name": ".."}`.
    pub fn text_param(&self, key: &str) -> Option<String> {
        match self.parameters.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(obj) => obj.get("name").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }

    /// Slot value kept as JSON so numbers stay numbers in the sheet row.
    pub fn value_param(&self, key: &str) -> Option<Value> {
        match self.parameters.get(key)? {
            Value::Null => None,
            Value::Object(obj) => obj.get("name").cloned(),
            other => Some(other.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfillment_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fulfillment_messages: Vec<FulfillmentMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followup_event_input: Option<FollowupEvent>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FulfillmentMessage {
    Text {
        text: TextMessage,
    },
    #[serde(rename_all = "camelCase")]
    SynthesizeSpeech {
        platform: Platform,
        telephony_synthesize_speech: SynthesizeSpeech,
    },
    #[serde(rename_all = "camelCase")]
    TransferCall {
        platform: Platform,
        telephony_transfer_call: TransferCall,
    },
}

impl FulfillmentMessage {
    pub fn text(text: impl Into<String>) -> Self {
        FulfillmentMessage::Text {
            text: TextMessage {
                text: vec![text.into()],
            },
        }
    }

    pub fn ssml(ssml: impl Into<String>) -> Self {
        FulfillmentMessage::SynthesizeSpeech {
            platform: Platform::Telephony,
            telephony_synthesize_speech: SynthesizeSpeech { ssml: ssml.into() },
        }
    }

    pub fn transfer_call(phone_number: impl Into<String>) -> Self {
        FulfillmentMessage::TransferCall {
            platform: Platform::Telephony,
            telephony_transfer_call: TransferCall {
                phone_number: phone_number.into(),
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FulfillmentMessage::Text { text } => text.text.first().map(String::as_str),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextMessage {
    pub text: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Telephony,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SynthesizeSpeech {
    pub ssml: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferCall {
    /// E.164 format.
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FollowupEvent {
    pub name: String,
    pub language_code: String,
}
