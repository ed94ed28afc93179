pub mod dispatcher;
pub mod intents;
pub mod sheets;
