use crate::{AnalysisError, CompanyFacts};
use async_trait::async_trait;

/// Trait for fundamentals data providers. A provider resolves a ticker
/// symbol to one normalized facts record, or fails the whole lookup.
/// Partially populated records are normal; individual missing fields are
/// never an error.
#[async_trait]
pub trait FactProvider: Send + Sync {
    async fn fetch_facts(&self, symbol: &str) -> Result<CompanyFacts, AnalysisError>;
}
