use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::errors::AppError;
use crate::models::{FollowupEvent, FulfillmentMessage, IntentEvent, WebhookResponse};
use crate::state::AppState;

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Fulfillment> + Send + 'a>>;

/// Common signature for intent callbacks: event in, fulfillment out.
pub type IntentHandler = for<'a> fn(&'a AppState, &'a IntentEvent) -> HandlerFuture<'a>;

/// Static intent-name → handler table. Filled at startup, read-only afterwards.
#[derive(Default, Clone)]
pub struct IntentMap {
    handlers: HashMap<&'static str, IntentHandler>,
}

impl IntentMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, intent: &'static str, handler: IntentHandler) -> &mut Self {
        self.handlers.insert(intent, handler);
        self
    }

    pub fn get(&self, intent: &str) -> Option<IntentHandler> {
        self.handlers.get(intent).copied()
    }

    pub fn intents(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}

/// Messages and follow-up event collected while one handler runs.
#[derive(Debug)]
pub struct Fulfillment {
    language_code: String,
    messages: Vec<FulfillmentMessage>,
    followup: Option<FollowupEvent>,
}

impl Fulfillment {
    pub fn new(event: &IntentEvent) -> Self {
        Self {
            language_code: event.language_code.clone(),
            messages: Vec::new(),
            followup: None,
        }
    }

    pub fn add(&mut self, text: impl Into<String>) {
        self.messages.push(FulfillmentMessage::text(text));
    }

    pub fn add_message(&mut self, message: FulfillmentMessage) {
        self.messages.push(message);
    }

    pub fn set_followup_event(&mut self, name: &str) {
        self.followup = Some(FollowupEvent {
            name: name.to_string(),
            language_code: self.language_code.clone(),
        });
    }

    pub fn into_response(self) -> WebhookResponse {
        let fulfillment_text = self
            .messages
            .iter()
            .find_map(FulfillmentMessage::as_text)
            .map(str::to_string);

        let only_text = self.messages.len() <= 1
            && self.messages.iter().all(|m| m.as_text().is_some());

        WebhookResponse {
            fulfillment_text,
            fulfillment_messages: if only_text { Vec::new() } else { self.messages },
            followup_event_input: self.followup,
        }
    }
}

/// Resolves the handler for `event.intent`, runs it to completion and turns
/// its output into the single response for this request.
pub async fn dispatch(state: &AppState, event: &IntentEvent) -> Result<WebhookResponse, AppError> {
    let handler = state
        .intents
        .get(&event.intent)
        .ok_or_else(|| AppError::UnhandledIntent(event.intent.clone()))?;

    tracing::info!(intent = %event.intent, session = ?event.session, "dispatching intent");

    let fulfillment = handler(state, event).await;
    Ok(fulfillment.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WebhookRequest;
    use serde_json::json;

    fn event(intent: &str) -> IntentEvent {
        let request: WebhookRequest = serde_json::from_value(json!({
            "queryResult": {
                "languageCode": "en-us",
                "intent": { "displayName": intent }
            }
        }))
        .unwrap();
        IntentEvent::from_request(request, HashMap::new(), String::new())
    }

    #[test]
    fn test_single_text_only_sets_fulfillment_text() {
        let mut agent = Fulfillment::new(&event("x"));
        agent.add("hello");
        let response = agent.into_response();
        assert_eq!(response.fulfillment_text.as_deref(), Some("hello"));
        assert!(response.fulfillment_messages.is_empty());
        assert!(response.followup_event_input.is_none());
    }

    #[test]
    fn test_multiple_texts_listed() {
        let mut agent = Fulfillment::new(&event("x"));
        agent.add("one");
        agent.add("two");
        let response = agent.into_response();
        assert_eq!(response.fulfillment_text.as_deref(), Some("one"));
        assert_eq!(
            response.fulfillment_messages,
            vec![FulfillmentMessage::text("one"), FulfillmentMessage::text("two")]
        );
    }

    #[test]
    fn test_text_found_after_rich_message() {
        let mut agent = Fulfillment::new(&event("x"));
        agent.add_message(FulfillmentMessage::ssml("<speak>hi</speak>"));
        agent.add("hi");
        let response = agent.into_response();
        assert_eq!(response.fulfillment_text.as_deref(), Some("hi"));
        assert_eq!(response.fulfillment_messages.len(), 2);
    }

    #[test]
    fn test_followup_uses_event_language() {
        let mut agent = Fulfillment::new(&event("x"));
        agent.add("bye");
        agent.set_followup_event("call_transfer_event");
        let response = agent.into_response();
        assert_eq!(
            response.followup_event_input,
            Some(FollowupEvent {
                name: "call_transfer_event".to_string(),
                language_code: "en-us".to_string(),
            })
        );
    }

    fn noop<'a>(_state: &'a AppState, event: &'a IntentEvent) -> HandlerFuture<'a> {
        Box::pin(async move { Fulfillment::new(event) })
    }

    #[test]
    fn test_intent_map_lookup() {
        let mut map = IntentMap::new();
        map.set("a", noop).set("b", noop);
        assert!(map.get("a").is_some());
        assert!(map.get("b").is_some());
        assert!(map.get("A").is_none());
        let mut names: Vec<_> = map.intents().collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }
}
