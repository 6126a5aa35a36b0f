use thiserror::Error;

#[derive(Error, Debug)]
pub enum MortgageError {
    #[error("fetch failed: transport error: {message}")]
    Transport {
        message: String,
    },

    #[error("fetch failed: unexpected status {status}")]
    UnexpectedStatus {
        status: u16,
    },

    #[error("fetch failed: unparseable response body: {message}")]
    UnparseableResponse {
        message: String,
    },

    #[error("loan to value is undefined for a zero property price")]
    ZeroPropertyPrice,

    #[error("amount out of range: {message}")]
    AmountOutOfRange {
        message: String,
    },

    #[error("invalid number {input:?}: {message}")]
    InvalidNumber {
        input: String,
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },
}

impl MortgageError {
    /// transport, status and body failures all count as one failed fetch
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            MortgageError::Transport { .. }
                | MortgageError::UnexpectedStatus { .. }
                | MortgageError::UnparseableResponse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MortgageError>;
