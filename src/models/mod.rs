pub mod fulfillment;
pub mod reservation;

pub use fulfillment::{
    FollowupEvent, FulfillmentMessage, IntentEvent, IntentRef, QueryResult, WebhookRequest,
    WebhookResponse,
};
pub use reservation::ReservationRecord;
