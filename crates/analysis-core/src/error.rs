use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
