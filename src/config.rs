//! Conversion configuration.

/// Per-converter settings, applied to every conversion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// PDF/A-3 conformance level written to `pdfaid:conformance`.
    pub conformance_level: char,
    /// ZUGFeRD conformance level (`BASIC`, `COMFORT`, ...); `None` uses the
    /// marker's default.
    pub invoice_conformance_level: Option<String>,
    /// Convert even when the input fails the PDF/A-1 gate.
    pub ignore_gate_failures: bool,
    /// Fail instead of logging when a metadata field rejects its value.
    pub strict_field_values: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            conformance_level: 'U',
            invoice_conformance_level: None,
            ignore_gate_failures: false,
            strict_field_values: false,
        }
    }
}

/// Everything the metadata rewriter needs for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub producer: String,
    pub creator: String,
    pub attach_invoice_markers: bool,
    pub conformance_level: char,
    pub invoice_conformance_level_override: Option<String>,
    pub ignore_gate_failures: bool,
    pub strict_field_values: bool,
}

impl ConversionRequest {
    /// A request with default configuration.
    pub fn new(producer: impl Into<String>, creator: impl Into<String>) -> Self {
        Self::from_config(&ConverterConfig::default(), producer, creator, false)
    }

    pub fn from_config(
        config: &ConverterConfig,
        producer: impl Into<String>,
        creator: impl Into<String>,
        attach_invoice_markers: bool,
    ) -> Self {
        Self {
            producer: producer.into(),
            creator: creator.into(),
            attach_invoice_markers,
            conformance_level: config.conformance_level,
            invoice_conformance_level_override: config.invoice_conformance_level.clone(),
            ignore_gate_failures: config.ignore_gate_failures,
            strict_field_values: config.strict_field_values,
        }
    }

    pub fn with_invoice_markers(mut self, attach: bool) -> Self {
        self.attach_invoice_markers = attach;
        self
    }

    pub fn with_conformance_level(mut self, level: char) -> Self {
        self.conformance_level = level;
        self
    }

    /// The producer string with the tool identification appended, as written
    /// to both the Info dictionary and `pdf:Producer`.
    pub fn full_producer(&self) -> String {
        format!(
            "{} (via {} {})",
            self.producer,
            crate::TOOL_NAME,
            crate::TOOL_VERSION
        )
    }
}
