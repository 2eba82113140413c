//! Error types for the conversion pipeline.
//!
//! Each variant names the stage that failed: the PDF/A-1 gate, the metadata
//! rewrite, packet serialization, or the underlying PDF and file I/O.

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input did not pass the PDF/A-1 conformance gate.
    #[error("File is not a valid PDF/A-1 input file: {0}")]
    InputValidation(String),

    /// The gate's checker could not parse the input.
    #[error("Failed to parse PDF/A-1 candidate: {0}")]
    Parse(String),

    /// A metadata field setter rejected its value.
    #[error("Invalid value {value:?} for metadata field {field}")]
    BadFieldValue {
        /// Qualified field name, e.g. `pdfaid:conformance`
        field: &'static str,
        /// The rejected value
        value: String,
    },

    /// The metadata packet could not be turned into bytes.
    #[error("Failed to serialize metadata packet: {0}")]
    Serialization(String),

    /// The document is missing a structure the conversion needs.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Error reported by the PDF object model.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
