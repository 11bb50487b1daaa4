use thiserror::Error;

/// Errors from the base64url codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base64UrlError {
    /// The input is not base64url.
    #[error("malformed base64url encoding: {0}")]
    MalformedEncoding(#[from] base64::DecodeError),
}

/// Errors from decoding a wire tree into its native form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranscodeError {
    /// A binary field held a string that is not base64url.
    #[error("malformed base64url at `{path}`")]
    MalformedEncoding {
        /// Path of the offending field.
        path: String,
        /// Codec failure.
        #[source]
        source: Base64UrlError,
    },

    /// A binary or text field held something other than a string.
    #[error("expected {expected} at `{path}`")]
    UnexpectedType {
        /// Path of the offending field.
        path: String,
        /// What the policy required there.
        expected: &'static str,
    },
}
