#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Time series request for {record_code} returned HTTP {status}")]
    HttpStatus { status: u16, record_code: String },
    #[error("Failed to parse time series JSON: {0}")]
    ParseError(String),
    #[error("No static record code configured for station {0}")]
    MissingRecordCode(String),
}
