use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response for region '{region}' is not a valid POWER payload")]
    InvalidPayload {
        region: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response for region '{region}' has no '{parameter}' series")]
    MissingParameter {
        region: String,
        parameter: &'static str,
    },

    #[error("No coordinates known for region '{0}'")]
    UnknownRegion(String),
}
