use crate::config::AppConfig;
use crate::services::dispatcher::IntentMap;
use crate::services::sheets::ReservationSink;

pub struct AppState {
    pub config: AppConfig,
    pub sink: Box<dyn ReservationSink>,
    pub intents: IntentMap,
}
