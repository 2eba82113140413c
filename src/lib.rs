//! Converts PDF/A-1 documents into PDF/A-3 documents.
//!
//! The input is first checked against PDF/A-1 rules. Its metadata is then
//! replaced by a fresh XMP packet that declares PDF/A-3 conformance and
//! records producer, creator and creation date, optionally with the ZUGFeRD
//! invoice schema and the PDF/A extension description it requires. The Info
//! dictionary is rewritten to match.
//!
//! Embedding the invoice XML itself is left to the caller, which receives the
//! converted [`lopdf::Document`] through [`ConvertedDocument`].

pub mod config;
pub mod converter;
pub mod error;
pub mod gate;
pub mod info;
pub mod pdfa1;
pub mod rewriter;
pub mod xmp;

#[cfg(test)]
mod fixtures;

pub use config::{ConversionRequest, ConverterConfig};
pub use converter::{ConvertedDocument, Converter};
pub use error::{Error, Result};
pub use gate::{ConformanceChecker, ConformanceGate, GateOutcome, Verdict, Violation};
pub use info::{DocumentInfo, read_document_info};
pub use pdfa1::Pdfa1Checker;
pub use rewriter::{FieldWarning, RewriteReport, build_packet, rewrite};
pub use xmp::{MetadataPacket, MetadataSerializer, PacketSummary, RdfXmlSerializer};

/// Tool name appended to the producer string.
pub const TOOL_NAME: &str = env!("CARGO_PKG_NAME");
/// Tool version appended to the producer string.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");
