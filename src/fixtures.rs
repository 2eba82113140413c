//! Minimal documents shared by the unit and integration tests.

use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

pub const PDFA1_XMP: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about="" xmlns:pdfaid="http://www.aiim.org/pdfa/ns/id/">
      <pdfaid:part>1</pdfaid:part>
      <pdfaid:conformance>B</pdfaid:conformance>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

fn add_page_tree(doc: &mut Document) -> Dictionary {
    let pages_id = doc.new_object_id();
    let mut page = Dictionary::new();
    page.set("Type", Object::Name(b"Page".to_vec()));
    page.set("Parent", Object::Reference(pages_id));
    page.set(
        "MediaBox",
        Object::Array(vec![0.into(), 0.into(), 595.into(), 842.into()]),
    );
    let page_id = doc.add_object(page);

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(1));
    pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    catalog
}

/// A one-page document without Info, metadata or output intents.
pub fn plain_document() -> Document {
    let mut doc = Document::with_version("1.4");
    let catalog = add_page_tree(&mut doc);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

/// A one-page document carrying the structures the PDF/A-1 checker looks
/// for: PDF/A-1b metadata, a GTS_PDFA1 output intent, a file ID and an Info
/// dictionary with a title.
pub fn pdfa1_document() -> Document {
    let mut doc = Document::with_version("1.4");
    let mut catalog = add_page_tree(&mut doc);

    let mut metadata = Dictionary::new();
    metadata.set("Type", Object::Name(b"Metadata".to_vec()));
    metadata.set("Subtype", Object::Name(b"XML".to_vec()));
    let metadata_id = doc.add_object(Stream::new(metadata, PDFA1_XMP.as_bytes().to_vec()));
    catalog.set("Metadata", Object::Reference(metadata_id));

    let profile_id = doc.add_object(Stream::new(Dictionary::new(), b"icc".to_vec()));
    let mut intent = Dictionary::new();
    intent.set("Type", Object::Name(b"OutputIntent".to_vec()));
    intent.set("S", Object::Name(b"GTS_PDFA1".to_vec()));
    intent.set("OutputConditionIdentifier", Object::string_literal("sRGB"));
    intent.set("DestOutputProfile", Object::Reference(profile_id));
    catalog.set("OutputIntents", Object::Array(vec![Object::Dictionary(intent)]));

    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut info = Dictionary::new();
    info.set("Title", Object::string_literal("Invoice 42"));
    info.set("Producer", Object::string_literal("Legacy Writer"));
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", Object::Reference(info_id));

    let file_id = Object::String(b"0123456789abcdef".to_vec(), StringFormat::Hexadecimal);
    doc.trailer
        .set("ID", Object::Array(vec![file_id.clone(), file_id]));
    doc
}

pub fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("saving fixture to memory");
    bytes
}
