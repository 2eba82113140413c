//! XMP metadata packet model.
//!
//! A [`MetadataPacket`] is an ordered list of [`SchemaBlock`]s, one per XMP
//! schema. Blocks are usually produced from the typed builders in
//! [`schemas`] and turned into RDF/XML by a [`MetadataSerializer`].

pub mod reader;
pub mod schemas;
pub mod serializer;

use chrono::{DateTime, FixedOffset};

pub use reader::PacketSummary;
pub use schemas::{
    AdobePdf, DublinCore, ExtensionSchema, InvoiceMarker, PdfaExtension, PdfaIdentification,
    PropertyDescription, XmpBasic,
};
pub use serializer::{MetadataSerializer, RdfXmlSerializer};

/// An XML namespace binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: String,
    pub uri: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

/// Which schema a block carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    PdfaIdentification,
    DublinCore,
    XmpBasic,
    AdobePdf,
    InvoiceMarker,
    PdfaExtension,
}

/// Value of a single XMP property.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Date(DateTime<FixedOffset>),
    /// Ordered array (`rdf:Seq`)
    Seq(Vec<FieldValue>),
    /// Unordered array (`rdf:Bag`)
    Bag(Vec<FieldValue>),
    /// Structured value (`rdf:parseType="Resource"`)
    Resource(Vec<Field>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A prefixed property and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub prefix: String,
    pub name: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
            value,
        }
    }

    /// `prefix:name`
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.prefix, self.name)
    }
}

/// One schema's worth of properties, serialized as one `rdf:Description`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaBlock {
    pub kind: SchemaKind,
    pub namespace: Namespace,
    /// Namespaces used by nested structured fields.
    pub auxiliary_namespaces: Vec<Namespace>,
    pub fields: Vec<Field>,
}

impl SchemaBlock {
    pub fn new(kind: SchemaKind, namespace: Namespace) -> Self {
        Self {
            kind,
            namespace,
            auxiliary_namespaces: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Appends a field in the block's own namespace.
    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        let prefix = self.namespace.prefix.clone();
        self.fields.push(Field::new(prefix, name, value));
    }

    /// Looks up a top-level field by local name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// All namespaces the block needs declared.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        std::iter::once(&self.namespace).chain(self.auxiliary_namespaces.iter())
    }
}

/// An ordered collection of schema blocks, built fresh for every conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataPacket {
    blocks: Vec<SchemaBlock>,
}

impl MetadataPacket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a schema block.
    pub fn add_schema(&mut self, schema: impl Into<SchemaBlock>) {
        self.blocks.push(schema.into());
    }

    pub fn blocks(&self) -> &[SchemaBlock] {
        &self.blocks
    }

    /// The first block of the given kind.
    pub fn block(&self, kind: SchemaKind) -> Option<&SchemaBlock> {
        self.blocks.iter().find(|b| b.kind == kind)
    }

    pub fn count(&self, kind: SchemaKind) -> usize {
        self.blocks.iter().filter(|b| b.kind == kind).count()
    }

    /// A copy of the packet with every timestamp field removed, for comparing
    /// packets produced at different times.
    pub fn without_timestamps(&self) -> MetadataPacket {
        let blocks = self
            .blocks
            .iter()
            .map(|b| {
                let mut b = b.clone();
                b.fields.retain(|f| !matches!(f.value, FieldValue::Date(_)));
                b
            })
            .collect();
        MetadataPacket { blocks }
    }
}
