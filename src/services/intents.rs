use crate::errors::SinkError;
use crate::models::{FulfillmentMessage, IntentEvent, ReservationRecord};
use crate::services::dispatcher::{Fulfillment, HandlerFuture, IntentMap};
use crate::state::AppState;

pub const WELCOME_INTENT: &str = "Default Welcome Intent";
pub const FALLBACK_INTENT: &str = "Default Fallback Intent";
pub const RESERVATION_INTENT: &str = "makeRes";

pub const CALL_TRANSFER_EVENT: &str = "call_transfer_event";

pub const WELCOME_TEXT: &str = "Welcome to my agent!";
pub const FALLBACK_TEXTS: [&str; 2] = ["I didn't understand", "I'm sorry, can you try again?"];
pub const APOLOGY_TEXT: &str = "I'm sorry I'm not able to take down your reservation but you'll be connected to the main line in a moment";
pub const REPROMPT_TEXT: &str =
    "Sorry, I didn't catch the date and time for your reservation. Could you say it again?";

pub fn default_intent_map() -> IntentMap {
    let mut map = IntentMap::new();
    map.set(WELCOME_INTENT, welcome)
        .set(FALLBACK_INTENT, fallback)
        .set(RESERVATION_INTENT, make_reservation);
    map
}

pub fn welcome<'a>(_state: &'a AppState, event: &'a IntentEvent) -> HandlerFuture<'a> {
    Box::pin(async move {
        let mut agent = Fulfillment::new(event);
        agent.add(WELCOME_TEXT);
        agent
    })
}

pub fn fallback<'a>(_state: &'a AppState, event: &'a IntentEvent) -> HandlerFuture<'a> {
    Box::pin(async move {
        let mut agent = Fulfillment::new(event);
        for text in FALLBACK_TEXTS {
            agent.add(text);
        }
        agent
    })
}

pub fn confirmation_text(record: &ReservationRecord) -> String {
    format!(
        "Perfect I've got you down for {} at {}, see you later!",
        record.date, record.time
    )
}

fn confirmation_ssml(record: &ReservationRecord) -> String {
    format!(
        "<speak>Perfect I've got you down for {} at {}<break time=\"200ms\"/>see you later!</speak>",
        record.date, record.time
    )
}

/// Validates the slots, appends one row to the sink and confirms, or
/// apologises and hands the caller to the main line.
pub fn make_reservation<'a>(state: &'a AppState, event: &'a IntentEvent) -> HandlerFuture<'a> {
    Box::pin(async move {
        let mut agent = Fulfillment::new(event);

        let record = match ReservationRecord::from_event(event) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting reservation slots");
                agent.add(REPROMPT_TEXT);
                return agent;
            }
        };

        match state.sink.append(&record).await {
            Ok(()) => {
                tracing::info!(date = %record.date, time = %record.time, "reservation recorded");
                if state.config.telephony_responses {
                    agent.add_message(FulfillmentMessage::ssml(confirmation_ssml(&record)));
                }
                agent.add(confirmation_text(&record));
            }
            Err(e) => {
                let stage = match &e {
                    SinkError::Auth(_) => "authorize",
                    SinkError::Append(_) => "append",
                };
                tracing::error!(error = %e, stage, "failed to record reservation");
                agent.add(APOLOGY_TEXT);
                if let Some(number) = &state.config.transfer_phone_number {
                    agent.add_message(FulfillmentMessage::transfer_call(number.clone()));
                }
                agent.set_followup_event(CALL_TRANSFER_EVENT);
            }
        }

        agent
    })
}
