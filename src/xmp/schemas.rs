//! Typed builders for the XMP schemas written during conversion.

use super::{Field, FieldValue, Namespace, SchemaBlock, SchemaKind};
use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset};

pub const NS_PDFAID: &str = "http://www.aiim.org/pdfa/ns/id/";
pub const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
pub const NS_XMP: &str = "http://ns.adobe.com/xap/1.0/";
pub const NS_PDF: &str = "http://ns.adobe.com/pdf/1.3/";
pub const NS_ZUGFERD: &str = "urn:ferd:pdfa:CrossIndustryDocument:invoice:1p0#";
pub const NS_PDFA_EXTENSION: &str = "http://www.aiim.org/pdfa/ns/extension/";
pub const NS_PDFA_SCHEMA: &str = "http://www.aiim.org/pdfa/ns/schema#";
pub const NS_PDFA_PROPERTY: &str = "http://www.aiim.org/pdfa/ns/property#";

/// Conformance levels accepted by `pdfaid:conformance`.
pub const CONFORMANCE_LEVELS: [char; 3] = ['A', 'B', 'U'];

/// PDF/A identification schema (`pdfaid`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfaIdentification {
    part: Option<u8>,
    conformance: Option<char>,
}

impl PdfaIdentification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_part(&mut self, part: u8) {
        self.part = Some(part);
    }

    /// Sets the conformance level. Anything outside `A`, `B`, `U` is rejected
    /// and leaves the current value untouched.
    pub fn set_conformance(&mut self, level: char) -> Result<()> {
        if !CONFORMANCE_LEVELS.contains(&level) {
            return Err(Error::BadFieldValue {
                field: "pdfaid:conformance",
                value: level.to_string(),
            });
        }
        self.conformance = Some(level);
        Ok(())
    }

    pub fn part(&self) -> Option<u8> {
        self.part
    }

    pub fn conformance(&self) -> Option<char> {
        self.conformance
    }
}

impl From<PdfaIdentification> for SchemaBlock {
    fn from(id: PdfaIdentification) -> Self {
        let mut block = SchemaBlock::new(
            SchemaKind::PdfaIdentification,
            Namespace::new("pdfaid", NS_PDFAID),
        );
        if let Some(part) = id.part {
            block.push("part", FieldValue::Integer(part.into()));
        }
        if let Some(level) = id.conformance {
            block.push("conformance", FieldValue::Text(level.to_string()));
        }
        block
    }
}

/// Dublin Core schema (`dc`), limited to the creator list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DublinCore {
    creators: Vec<String>,
}

impl DublinCore {
    pub fn with_creator(creator: impl Into<String>) -> Self {
        let mut dc = Self::default();
        dc.add_creator(creator);
        dc
    }

    pub fn add_creator(&mut self, creator: impl Into<String>) {
        self.creators.push(creator.into());
    }
}

impl From<DublinCore> for SchemaBlock {
    fn from(dc: DublinCore) -> Self {
        let mut block = SchemaBlock::new(SchemaKind::DublinCore, Namespace::new("dc", NS_DC));
        if !dc.creators.is_empty() {
            let items = dc.creators.into_iter().map(FieldValue::Text).collect();
            block.push("creator", FieldValue::Seq(items));
        }
        block
    }
}

/// XMP basic schema (`xmp`).
#[derive(Debug, Clone, PartialEq)]
pub struct XmpBasic {
    creator_tool: String,
    create_date: DateTime<FixedOffset>,
}

impl XmpBasic {
    pub fn new(creator_tool: impl Into<String>, create_date: DateTime<FixedOffset>) -> Self {
        Self {
            creator_tool: creator_tool.into(),
            create_date,
        }
    }
}

impl From<XmpBasic> for SchemaBlock {
    fn from(basic: XmpBasic) -> Self {
        let mut block = SchemaBlock::new(SchemaKind::XmpBasic, Namespace::new("xmp", NS_XMP));
        block.push("CreatorTool", FieldValue::Text(basic.creator_tool));
        block.push("CreateDate", FieldValue::Date(basic.create_date));
        block
    }
}

/// Adobe PDF schema (`pdf`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdobePdf {
    producer: String,
}

impl AdobePdf {
    pub fn new(producer: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
        }
    }
}

impl From<AdobePdf> for SchemaBlock {
    fn from(pdf: AdobePdf) -> Self {
        let mut block = SchemaBlock::new(SchemaKind::AdobePdf, Namespace::new("pdf", NS_PDF));
        block.push("Producer", FieldValue::Text(pdf.producer));
        block
    }
}

/// ZUGFeRD invoice marker schema (`zf`).
///
/// Flags the embedded XML attachment as a ZUGFeRD invoice and records its
/// conformance level (`BASIC`, `COMFORT`, `EXTENDED`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceMarker {
    document_file_name: String,
    document_type: String,
    version: String,
    conformance_level: String,
}

impl InvoiceMarker {
    pub const DEFAULT_FILE_NAME: &'static str = "ZUGFeRD-invoice.xml";
    pub const DEFAULT_CONFORMANCE_LEVEL: &'static str = "BASIC";

    /// Creates the marker; without an override the level is `BASIC`.
    pub fn new(conformance_level: Option<&str>) -> Self {
        Self {
            document_file_name: Self::DEFAULT_FILE_NAME.to_string(),
            document_type: "INVOICE".to_string(),
            version: "1.0".to_string(),
            conformance_level: conformance_level
                .unwrap_or(Self::DEFAULT_CONFORMANCE_LEVEL)
                .to_string(),
        }
    }

    pub fn conformance_level(&self) -> &str {
        &self.conformance_level
    }

    /// The PDF/A extension description that makes this schema's properties
    /// known to PDF/A-3 validators.
    pub fn extension_schema() -> ExtensionSchema {
        let property = |name: &str, description: &str| PropertyDescription {
            name: name.to_string(),
            value_type: "Text".to_string(),
            category: "external".to_string(),
            description: description.to_string(),
        };
        ExtensionSchema {
            name: "ZUGFeRD PDFA Extension Schema".to_string(),
            namespace_uri: NS_ZUGFERD.to_string(),
            prefix: "zf".to_string(),
            properties: vec![
                property("DocumentFileName", "name of the embedded XML invoice file"),
                property("DocumentType", "INVOICE"),
                property("Version", "The actual version of the ZUGFeRD XML schema"),
                property(
                    "ConformanceLevel",
                    "The conformance level of the embedded ZUGFeRD data",
                ),
            ],
        }
    }
}

impl From<InvoiceMarker> for SchemaBlock {
    fn from(marker: InvoiceMarker) -> Self {
        let mut block =
            SchemaBlock::new(SchemaKind::InvoiceMarker, Namespace::new("zf", NS_ZUGFERD));
        block.push("DocumentFileName", FieldValue::Text(marker.document_file_name));
        block.push("DocumentType", FieldValue::Text(marker.document_type));
        block.push("Version", FieldValue::Text(marker.version));
        block.push("ConformanceLevel", FieldValue::Text(marker.conformance_level));
        block
    }
}

/// Description of one property of a custom schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescription {
    pub name: String,
    pub value_type: String,
    pub category: String,
    pub description: String,
}

/// Description of one custom schema inside `pdfaExtension:schemas`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSchema {
    pub name: String,
    pub namespace_uri: String,
    pub prefix: String,
    pub properties: Vec<PropertyDescription>,
}

/// PDF/A extension schema container (`pdfaExtension`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfaExtension {
    schemas: Vec<ExtensionSchema>,
}

impl PdfaExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn describing(schema: ExtensionSchema) -> Self {
        let mut ext = Self::new();
        ext.add_schema(schema);
        ext
    }

    pub fn add_schema(&mut self, schema: ExtensionSchema) {
        self.schemas.push(schema);
    }

    pub fn schemas(&self) -> &[ExtensionSchema] {
        &self.schemas
    }
}

impl From<PdfaExtension> for SchemaBlock {
    fn from(ext: PdfaExtension) -> Self {
        let mut block = SchemaBlock::new(
            SchemaKind::PdfaExtension,
            Namespace::new("pdfaExtension", NS_PDFA_EXTENSION),
        );
        block.auxiliary_namespaces = vec![
            Namespace::new("pdfaSchema", NS_PDFA_SCHEMA),
            Namespace::new("pdfaProperty", NS_PDFA_PROPERTY),
        ];

        let text = |prefix: &str, name: &str, value: &str| {
            Field::new(prefix, name, FieldValue::text(value))
        };
        let schemas = ext
            .schemas
            .into_iter()
            .map(|schema| {
                let properties = schema
                    .properties
                    .iter()
                    .map(|p| {
                        FieldValue::Resource(vec![
                            text("pdfaProperty", "name", &p.name),
                            text("pdfaProperty", "valueType", &p.value_type),
                            text("pdfaProperty", "category", &p.category),
                            text("pdfaProperty", "description", &p.description),
                        ])
                    })
                    .collect();
                FieldValue::Resource(vec![
                    text("pdfaSchema", "schema", &schema.name),
                    text("pdfaSchema", "namespaceURI", &schema.namespace_uri),
                    text("pdfaSchema", "prefix", &schema.prefix),
                    Field::new("pdfaSchema", "property", FieldValue::Seq(properties)),
                ])
            })
            .collect();
        block.push("schemas", FieldValue::Bag(schemas));
        block
    }
}
