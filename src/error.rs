use thiserror::Error;

/// Client-side payload rejections. The `Display` text of each variant is the
/// exact message returned in the response body, so these strings are part of
/// the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),

    #[error("'url' must be valid")]
    InvalidUrl,

    #[error("'rating' must be a number between 0 and 5")]
    InvalidRating,

    #[error("Request body must contain either 'title, 'url', or 'rating'")]
    EmptyUpdate,
}
