use thiserror::Error;

/// Failure taxonomy for the analysis engine. Everything is caught at the
/// engine boundary and turned into a `{success: false, error}` envelope;
/// nothing propagates past it and nothing is retried.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Malformed source text, surfaced with the parser's own message.
    #[error("{0}")]
    ParseFailure(String),

    /// Nesting exceeds the hard ceiling the parser enforces.
    #[error("Document exceeds maximum nesting depth of {0}")]
    DocumentTooDeep(usize),

    /// Unknown format selector for conversion.
    #[error("Unsupported format")]
    UnsupportedFormat(String),

    /// An optional serializer dependency is missing in this build.
    #[error("{0} support is not available in this build")]
    ConversionUnavailable(&'static str),

    /// Unexpected fault inside the engine itself.
    #[error("Analysis error: {0}")]
    InternalAnalysisError(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
