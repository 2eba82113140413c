//! Reading and replacing the document information dictionary.

use crate::error::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

/// The classic document information dictionary written during conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    pub producer: String,
    pub author: String,
}

impl DocumentInfo {
    pub fn new(producer: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
            author: author.into(),
        }
    }

    fn to_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Producer", text_string(&self.producer));
        dict.set("Author", text_string(&self.author));
        dict
    }

    /// Replaces the document's Info dictionary with this record. Entries of the
    /// previous dictionary are not carried over; the old object is removed.
    pub fn install(&self, doc: &mut Document) -> ObjectId {
        let previous = info_dict_id(doc);
        let id = doc.add_object(self.to_dictionary());
        doc.trailer.set("Info", Object::Reference(id));
        if let Some(old) = previous {
            doc.objects.remove(&old);
        }
        id
    }
}

fn info_dict_id(doc: &Document) -> Option<ObjectId> {
    doc.trailer
        .get(b"Info")
        .and_then(|obj_ref: &Object| obj_ref.as_reference())
        .ok()
}

/// Encodes a PDF text string: ASCII as a literal string, anything else as
/// UTF-16BE with a byte order mark.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut utf16_bytes = vec![0xFE, 0xFF];
    for ch in text.encode_utf16() {
        utf16_bytes.extend_from_slice(&ch.to_be_bytes());
    }
    Object::String(utf16_bytes, StringFormat::Hexadecimal)
}

/// Decodes a PDF text string written either as UTF-16BE with a byte order
/// mark or as single-byte text.
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    String::from_utf8_lossy(bytes).into_owned()
}

/// Converts an Info dictionary value into readable text.
fn info_value_to_string(object: &Object) -> String {
    match object {
        Object::String(bytes, _format) => decode_text_string(bytes),
        Object::Name(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        Object::Integer(i) => i.to_string(),
        Object::Real(f) => f.to_string(),
        Object::Boolean(b) => b.to_string(),
        Object::Null => "null".to_string(),
        _ => {
            let type_name = object.type_name().unwrap_or(b"<unknown>");
            format!("<unsupported {}>", String::from_utf8_lossy(type_name))
        }
    }
}

/// Returns the `(key, value)` pairs of the document's Info dictionary.
pub fn read_document_info(doc: &Document) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    if let Some(info_id) = info_dict_id(doc) {
        let dictionary = doc.get_dictionary(info_id)?;
        for (key_bytes, value_object) in dictionary.iter() {
            let key = String::from_utf8_lossy(key_bytes).into_owned();
            entries.push((key, info_value_to_string(value_object)));
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn value<'a>(entries: &'a [(String, String)], key: &str) -> Option<&'a str> {
        entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_install_replaces_previous_info() {
        let mut doc = fixtures::pdfa1_document();
        let old_id = info_dict_id(&doc).unwrap();

        DocumentInfo::new("Acme", "Jane").install(&mut doc);

        let entries = read_document_info(&doc).unwrap();
        assert_eq!(value(&entries, "Producer"), Some("Acme"));
        assert_eq!(value(&entries, "Author"), Some("Jane"));
        assert_eq!(value(&entries, "Title"), None, "old entries must not be merged");
        assert!(doc.get_object(old_id).is_err());
    }

    #[test]
    fn test_non_ascii_round_trips_as_utf16() {
        let obj = text_string("Jörg Müller");
        let Object::String(bytes, _) = &obj else {
            panic!("expected a string object");
        };
        assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
        assert_eq!(info_value_to_string(&obj), "Jörg Müller");
    }

    #[test]
    fn test_read_info_without_dictionary() {
        let doc = fixtures::plain_document();
        assert!(read_document_info(&doc).unwrap().is_empty());
    }
}
