pub mod auth;
pub mod google;

use async_trait::async_trait;

use crate::errors::SinkError;
use crate::models::ReservationRecord;

/// Durable destination for reservation rows.
#[async_trait]
pub trait ReservationSink: Send + Sync {
    async fn append(&self, record: &ReservationRecord) -> Result<(), SinkError>;
}
