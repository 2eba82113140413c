#![allow(dead_code)]

#[path = "../../src/fixtures.rs"]
mod fixtures;

use lopdf::Object;

/// pdfaid in attribute form, next to an unrelated Dublin Core block.
const PDFA1B_XMP: &str = r#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about="" xmlns:pdfaid="http://www.aiim.org/pdfa/ns/id/"
        pdfaid:part="1" pdfaid:conformance="B"/>
    <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
      <dc:title><rdf:Alt><rdf:li xml:lang="x-default">Old title</rdf:li></rdf:Alt></dc:title>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>
<?xpacket end="w"?>"#;

/// A minimal document that passes the built-in PDF/A-1 checks.
pub fn minimal_pdfa1() -> Vec<u8> {
    let mut doc = fixtures::pdfa1_document();
    let metadata_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|id| doc.get_dictionary(id))
        .and_then(|catalog| catalog.get(b"Metadata"))
        .and_then(Object::as_reference)
        .expect("fixture catalog references its metadata");
    doc.get_object_mut(metadata_id)
        .and_then(Object::as_stream_mut)
        .expect("fixture metadata is a stream")
        .set_content(PDFA1B_XMP.as_bytes().to_vec());
    fixtures::to_bytes(doc)
}

/// A well-formed PDF that is not PDF/A-1.
pub fn plain_pdf() -> Vec<u8> {
    fixtures::to_bytes(fixtures::plain_document())
}

/// `minimal_pdfa1` with its header damaged.
pub fn corrupt_pdfa1() -> Vec<u8> {
    let mut bytes = minimal_pdfa1();
    bytes[1] = b'X';
    bytes
}

pub fn info_value<'a>(entries: &'a [(String, String)], key: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
