use reqwest::StatusCode;
use thiserror::Error;

/// All different error types this crate uses.
///
/// Per-title failures fall into two groups the crawl loop treats
/// differently: expected empty outcomes ([`is_empty_page`]) that are cached
/// so the title is never refetched, and tolerated transient failures
/// ([`is_transient`]) that are left out of the cache so a later run retries
/// them. Everything else aborts the run.
///
/// [`is_empty_page`]: BaedekerError::is_empty_page
/// [`is_transient`]: BaedekerError::is_transient
#[derive(Error, Debug)]
pub enum BaedekerError {
    /// The remote API reported that the page does not exist.
    #[error("missing page")]
    MissingPage,
    /// The API call succeeded but the rendered HTML was empty.
    #[error("empty HTML parse returned by API")]
    EmptyHtml,
    /// The classifier accepted no paragraph of the page.
    #[error("empty extraction, no content paragraphs")]
    EmptyExtraction,
    /// Failed to get a response.
    #[error("request failed: {error}")]
    HttpRequestFailure {
        /// The reqwest error.
        error: reqwest::Error,
    },
    /// Received a non success Http response.
    #[error("expected a 2xx success but got: {status}")]
    NoHttpSuccessResponse { status: StatusCode },
    /// The response body could not be decoded as an API payload.
    #[error("malformed API response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
    /// The payload carried neither a parse result nor an error marker.
    #[error("API response carried neither parse result nor error")]
    IncompletePayload,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BaedekerError {
    /// Expected page-level outcome: the title is recorded in the crawl cache
    /// so it is not fetched again by a later run.
    pub fn is_empty_page(&self) -> bool {
        matches!(
            self,
            BaedekerError::MissingPage | BaedekerError::EmptyHtml | BaedekerError::EmptyExtraction
        )
    }

    /// Tolerated per-title failure. The title stays out of the cache and is
    /// eligible for a retry on a future run.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BaedekerError::HttpRequestFailure { .. }
                | BaedekerError::NoHttpSuccessResponse { .. }
                | BaedekerError::MalformedResponse(_)
                | BaedekerError::IncompletePayload
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_transient_are_disjoint() {
        let empty = [
            BaedekerError::MissingPage,
            BaedekerError::EmptyHtml,
            BaedekerError::EmptyExtraction,
        ];
        for err in &empty {
            assert!(err.is_empty_page());
            assert!(!err.is_transient());
        }

        let transient = BaedekerError::NoHttpSuccessResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
        };
        assert!(transient.is_transient());
        assert!(!transient.is_empty_page());

        let fatal = BaedekerError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(!fatal.is_empty_page());
        assert!(!fatal.is_transient());
    }
}
