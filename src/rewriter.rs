//! Replaces a document's metadata with a PDF/A-3 packet.
//!
//! The packet is built and serialized before the document is touched, so a
//! serialization failure leaves the document exactly as it was.

use crate::config::ConversionRequest;
use crate::error::{Error, Result};
use crate::info::DocumentInfo;
use crate::xmp::{
    AdobePdf, DublinCore, InvoiceMarker, MetadataPacket, MetadataSerializer, PdfaExtension,
    PdfaIdentification, XmpBasic,
};
use chrono::{DateTime, FixedOffset, Local};
use log::{debug, warn};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::fmt;

/// The PDF/A part every rewritten document declares.
pub const PDFA_PART: u8 = 3;

/// A metadata value that was rejected and left unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWarning {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rejected value {:?}; left unset", self.field, self.value)
    }
}

/// What a rewrite did besides installing the packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteReport {
    pub warnings: Vec<FieldWarning>,
    /// Object id of the newly installed metadata stream.
    pub metadata_id: ObjectId,
}

/// Builds the packet for `request`, stamping `created_at` as `xmp:CreateDate`.
///
/// A conformance level outside `A`, `B`, `U` is reported as a warning and the
/// identification schema keeps no conformance entry, unless the request asks
/// for strict field values.
pub fn build_packet(
    request: &ConversionRequest,
    created_at: DateTime<FixedOffset>,
) -> Result<(MetadataPacket, Vec<FieldWarning>)> {
    let mut warnings = Vec::new();
    let mut packet = MetadataPacket::new();
    let full_producer = request.full_producer();

    let mut identification = PdfaIdentification::new();
    identification.set_part(PDFA_PART);
    match identification.set_conformance(request.conformance_level) {
        Ok(()) => {}
        Err(Error::BadFieldValue { field, value }) if !request.strict_field_values => {
            warn!("{} rejected value {:?}; continuing without it", field, value);
            warnings.push(FieldWarning { field, value });
        }
        Err(e) => return Err(e),
    }
    packet.add_schema(identification);

    packet.add_schema(DublinCore::with_creator(request.creator.as_str()));
    packet.add_schema(XmpBasic::new(request.creator.as_str(), created_at));
    packet.add_schema(AdobePdf::new(full_producer));

    if request.attach_invoice_markers {
        debug!("Adding ZUGFeRD invoice schema and PDF/A extension description");
        packet.add_schema(InvoiceMarker::new(
            request.invoice_conformance_level_override.as_deref(),
        ));
        packet.add_schema(PdfaExtension::describing(InvoiceMarker::extension_schema()));
    }

    Ok((packet, warnings))
}

/// Rewrites the document's metadata in place: a new Info dictionary with the
/// producer and author, and a new catalog `/Metadata` stream holding the
/// serialized packet. Both replace what was there before.
pub fn rewrite<S>(
    doc: &mut Document,
    request: &ConversionRequest,
    serializer: &S,
) -> Result<RewriteReport>
where
    S: MetadataSerializer + ?Sized,
{
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| Error::InvalidDocument("trailer has no /Root".to_string()))?;
    // Fail before mutating anything if the catalog is unusable.
    doc.get_dictionary(catalog_id)?;

    let created_at = Local::now().fixed_offset();
    let (packet, warnings) = build_packet(request, created_at)?;
    let bytes = serializer.serialize(&packet)?;
    debug!("Serialized metadata packet: {} bytes", bytes.len());

    DocumentInfo::new(request.full_producer(), request.creator.as_str()).install(doc);

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"Metadata".to_vec()));
    dict.set("Subtype", Object::Name(b"XML".to_vec()));
    let mut stream = Stream::new(dict, bytes);
    // PDF/A keeps metadata readable without decoding.
    stream.allows_compression = false;
    let metadata_id = doc.add_object(stream);

    let catalog = doc.get_dictionary_mut(catalog_id)?;
    let previous = catalog
        .get(b"Metadata")
        .and_then(Object::as_reference)
        .ok();
    catalog.set("Metadata", Object::Reference(metadata_id));
    if let Some(old) = previous {
        doc.objects.remove(&old);
    }

    Ok(RewriteReport {
        warnings,
        metadata_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::xmp::{FieldValue, PacketSummary, RdfXmlSerializer, SchemaKind};
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 14, 9, 30, 0)
            .unwrap()
    }

    struct FailingSerializer;

    impl MetadataSerializer for FailingSerializer {
        fn serialize(&self, _packet: &MetadataPacket) -> Result<Vec<u8>> {
            Err(Error::Serialization("disk full".to_string()))
        }
    }

    fn metadata_ref(doc: &Document) -> ObjectId {
        let catalog_id = doc.trailer.get(b"Root").unwrap().as_reference().unwrap();
        doc.get_dictionary(catalog_id)
            .unwrap()
            .get(b"Metadata")
            .unwrap()
            .as_reference()
            .unwrap()
    }

    #[test]
    fn test_packet_declares_part_three_and_level() {
        for level in ['A', 'B', 'U'] {
            let request = ConversionRequest::new("Acme", "Jane").with_conformance_level(level);
            let (packet, warnings) = build_packet(&request, fixed_time()).unwrap();
            let id = packet.block(SchemaKind::PdfaIdentification).unwrap();
            assert_eq!(id.field("part"), Some(&FieldValue::Integer(3)));
            assert_eq!(
                id.field("conformance").and_then(FieldValue::as_text),
                Some(level.to_string().as_str())
            );
            assert!(warnings.is_empty());
        }
    }

    #[test]
    fn test_invalid_level_is_logged_and_left_unset() {
        let request = ConversionRequest::new("Acme", "Jane").with_conformance_level('Z');
        let (packet, warnings) = build_packet(&request, fixed_time()).unwrap();

        let id = packet.block(SchemaKind::PdfaIdentification).unwrap();
        assert!(id.field("conformance").is_none());
        assert_eq!(id.field("part"), Some(&FieldValue::Integer(3)));
        assert_eq!(
            warnings,
            vec![FieldWarning {
                field: "pdfaid:conformance",
                value: "Z".to_string()
            }]
        );
        assert_eq!(packet.blocks().len(), 4);
    }

    #[test]
    fn test_invalid_level_fails_in_strict_mode() {
        let mut request = ConversionRequest::new("Acme", "Jane").with_conformance_level('Z');
        request.strict_field_values = true;
        assert!(matches!(
            build_packet(&request, fixed_time()),
            Err(Error::BadFieldValue { .. })
        ));
    }

    #[test]
    fn test_invoice_blocks_only_when_requested() {
        let request = ConversionRequest::new("Acme", "Jane");
        let (packet, _) = build_packet(&request, fixed_time()).unwrap();
        assert_eq!(packet.count(SchemaKind::InvoiceMarker), 0);
        assert_eq!(packet.count(SchemaKind::PdfaExtension), 0);

        let (packet, _) = build_packet(&request.with_invoice_markers(true), fixed_time()).unwrap();
        assert_eq!(packet.count(SchemaKind::InvoiceMarker), 1);
        assert_eq!(packet.count(SchemaKind::PdfaExtension), 1);
    }

    #[test]
    fn test_rewrite_installs_packet_and_info() {
        let mut doc = fixtures::pdfa1_document();
        let old_metadata = metadata_ref(&doc);
        let request = ConversionRequest::new("Acme", "Jane").with_invoice_markers(true);

        let report = rewrite(&mut doc, &request, &RdfXmlSerializer::new()).unwrap();

        assert_eq!(metadata_ref(&doc), report.metadata_id);
        assert!(doc.get_object(old_metadata).is_err());

        let stream = doc.get_object(report.metadata_id).unwrap().as_stream().unwrap();
        assert!(stream.dict.get(b"Filter").is_err());
        let summary = PacketSummary::parse(&stream.content).unwrap();
        assert_eq!(summary.pdfa_part(), Some(3));
        assert_eq!(summary.pdfa_conformance(), Some('U'));
        assert_eq!(summary.get("pdf:Producer"), Some(request.full_producer().as_str()));
        assert_eq!(summary.get("dc:creator"), Some("Jane"));
        assert_eq!(summary.get("xmp:CreatorTool"), Some("Jane"));
        assert_eq!(summary.get("zf:ConformanceLevel"), Some("BASIC"));
    }

    #[test]
    fn test_serialization_failure_leaves_document_untouched() {
        let mut doc = fixtures::pdfa1_document();
        let before = fixtures::to_bytes(doc.clone());

        let err = rewrite(
            &mut doc,
            &ConversionRequest::new("Acme", "Jane"),
            &FailingSerializer,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(fixtures::to_bytes(doc), before);
    }

    #[test]
    fn test_unwritable_creator_leaves_document_untouched() {
        let mut doc = fixtures::pdfa1_document();
        let before = fixtures::to_bytes(doc.clone());

        let err = rewrite(
            &mut doc,
            &ConversionRequest::new("Acme", "Ja\u{1}ne"),
            &RdfXmlSerializer::new(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(fixtures::to_bytes(doc), before);
    }

    #[test]
    fn test_rewrite_without_catalog_fails() {
        let mut doc = Document::with_version("1.4");
        let err = rewrite(
            &mut doc,
            &ConversionRequest::new("Acme", "Jane"),
            &RdfXmlSerializer::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
    }

    #[test]
    fn test_packets_differ_only_in_timestamp() {
        let request = ConversionRequest::new("Acme", "Jane").with_invoice_markers(true);
        let (first, _) = build_packet(&request, fixed_time()).unwrap();
        let (second, _) = build_packet(&request, Local::now().fixed_offset()).unwrap();

        assert_ne!(first, second);
        assert_eq!(first.without_timestamps(), second.without_timestamps());
    }
}
