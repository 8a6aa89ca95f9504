use crate::{error::QueryError, model::WeatherQueryResult};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

pub use weatherapi::WeatherApiClient;

/// Looks up current conditions for a raw search term.
///
/// `Ok` means the service answered with a decodable body, success or
/// structured failure. `Err` covers everything else.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn perform_query(&self, term: &str) -> Result<WeatherQueryResult, QueryError>;
}
