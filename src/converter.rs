//! Conversion entry points.

use crate::config::{ConversionRequest, ConverterConfig};
use crate::error::{Error, Result};
use crate::gate::{ConformanceChecker, ConformanceGate};
use crate::info::read_document_info;
use crate::pdfa1::Pdfa1Checker;
use crate::rewriter::{self, FieldWarning};
use crate::xmp::{MetadataSerializer, RdfXmlSerializer};
use log::{info, warn};
use lopdf::{Document, Object, ObjectId};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::SystemTime;

/// Converts PDF/A-1 input into PDF/A-3 documents.
///
/// ```no_run
/// use pdfa3_convert::Converter;
///
/// # fn main() -> pdfa3_convert::Result<()> {
/// let mut converted = Converter::new()
///     .conformance_level('B')
///     .convert_file("invoice-a1.pdf", "Acme Billing", "Jane Doe", true)?;
/// converted.save("invoice-a3.pdf")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter<C = Pdfa1Checker, S = RdfXmlSerializer> {
    config: ConverterConfig,
    gate: ConformanceGate<C>,
    serializer: S,
}

impl Converter {
    /// A converter using the built-in PDF/A-1 checker and RDF/XML serializer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C, S> Converter<C, S>
where
    C: ConformanceChecker,
    S: MetadataSerializer,
{
    /// A converter with a custom checker and serializer.
    pub fn with_components(checker: C, serializer: S) -> Self {
        Self {
            config: ConverterConfig::default(),
            gate: ConformanceGate::new(checker),
            serializer,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert even when the input fails the PDF/A-1 gate.
    pub fn ignore_gate_failures(mut self, ignore: bool) -> Self {
        self.config.ignore_gate_failures = ignore;
        self
    }

    /// PDF/A-3 conformance level (`A`, `B` or `U`; default `U`).
    pub fn conformance_level(mut self, level: char) -> Self {
        self.config.conformance_level = level;
        self
    }

    /// ZUGFeRD conformance level declared by the invoice marker.
    pub fn invoice_conformance_level(mut self, level: Option<&str>) -> Self {
        self.config.invoice_conformance_level = level.map(str::to_string);
        self
    }

    /// Fail on rejected metadata values instead of logging them.
    pub fn strict_field_values(mut self, strict: bool) -> Self {
        self.config.strict_field_values = strict;
        self
    }

    /// Converts the file at `path`.
    pub fn convert_file(
        &self,
        path: impl AsRef<Path>,
        producer: &str,
        creator: &str,
        attach_invoice_markers: bool,
    ) -> Result<ConvertedDocument> {
        let bytes = fs::read(path.as_ref())?;
        self.convert_bytes(&bytes, producer, creator, attach_invoice_markers)
    }

    /// Reads `reader` to the end and converts the result.
    pub fn convert_reader<R: Read>(
        &self,
        mut reader: R,
        producer: &str,
        creator: &str,
        attach_invoice_markers: bool,
    ) -> Result<ConvertedDocument> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.convert_bytes(&bytes, producer, creator, attach_invoice_markers)
    }

    /// Converts an in-memory PDF.
    pub fn convert_bytes(
        &self,
        bytes: &[u8],
        producer: &str,
        creator: &str,
        attach_invoice_markers: bool,
    ) -> Result<ConvertedDocument> {
        let request =
            ConversionRequest::from_config(&self.config, producer, creator, attach_invoice_markers);

        if request.ignore_gate_failures {
            info!("Skipping PDF/A-1 validation");
        } else {
            let outcome = self.gate.check(bytes);
            if !outcome.is_valid() {
                return Err(Error::InputValidation(outcome.summary()));
            }
        }

        let mut document = Document::load_mem(bytes)?;
        let report = rewriter::rewrite(&mut document, &request, &self.serializer)?;
        info!(
            "Converted document to PDF/A-3{} ({} warning(s))",
            request.conformance_level,
            report.warnings.len()
        );

        Ok(ConvertedDocument {
            document,
            metadata_id: report.metadata_id,
            warnings: report.warnings,
        })
    }
}

/// A document whose metadata now declares PDF/A-3.
#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    document: Document,
    metadata_id: ObjectId,
    warnings: Vec<FieldWarning>,
}

impl ConvertedDocument {
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for downstream steps such as attaching the invoice file.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Metadata values rejected during the rewrite.
    pub fn warnings(&self) -> &[FieldWarning] {
        &self.warnings
    }

    /// The serialized packet installed as the catalog's metadata stream.
    pub fn metadata_bytes(&self) -> Result<&[u8]> {
        let stream = self.document.get_object(self.metadata_id)?.as_stream()?;
        Ok(&stream.content)
    }

    /// `(key, value)` pairs of the Info dictionary.
    pub fn document_info(&self) -> Result<Vec<(String, String)>> {
        read_document_info(&self.document)
    }

    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.document.save_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Writes the document to `output_path` through a temporary file in the
    /// same directory, so an existing file is only replaced by a complete one.
    pub fn save(&mut self, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();
        let parent_dir = match output_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let stem = output_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("converted");
        let timestamp = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_micros())
            .unwrap_or_default();
        let temp_file_path = parent_dir.join(format!("{}_{}.pdf.tmp", stem, timestamp));

        let bytes = self.to_bytes()?;
        if let Err(e) = fs::write(&temp_file_path, bytes) {
            let _ = fs::remove_file(&temp_file_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_file_path, output_path) {
            warn!("Could not move {} into place: {}", temp_file_path.display(), e);
            let _ = fs::remove_file(&temp_file_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Whether the catalog references the installed metadata stream.
    pub fn has_single_metadata_stream(&self) -> bool {
        self.document
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .and_then(|id| self.document.get_dictionary(id))
            .and_then(|catalog| catalog.get(b"Metadata"))
            .and_then(Object::as_reference)
            .is_ok_and(|id| id == self.metadata_id)
    }
}
