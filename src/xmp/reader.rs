//! Minimal reading of existing XMP packets.
//!
//! Only what the conversion needs to look at is extracted: the declared
//! namespaces and the text of every simple property, in both the element form
//! (`<pdfaid:part>1</pdfaid:part>`) and the attribute form
//! (`<rdf:Description pdfaid:part="1"/>`).

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Flattened view of an XMP packet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketSummary {
    /// `(prefix, uri)` pairs in declaration order.
    pub namespaces: Vec<(String, String)>,
    /// `(qualified name, text)` pairs in document order. Array items are
    /// reported under the enclosing property's name.
    pub properties: Vec<(String, String)>,
    /// Number of `rdf:Description` elements.
    pub descriptions: usize,
}

impl PacketSummary {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| Error::InvalidDocument(format!("metadata is not UTF-8: {e}")))?;
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut summary = PacketSummary::default();
        // Open non-RDF property elements.
        let mut open: Vec<String> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let name = summary.visit_element(e)?;
                    if !is_rdf_or_meta(&name) {
                        open.push(name);
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    summary.visit_element(e)?;
                }
                Ok(Event::End(ref e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if !is_rdf_or_meta(&name) {
                        open.pop();
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::InvalidDocument(format!("XMP text: {e}")))?;
                    if let Some(property) = open.last() {
                        summary.properties.push((property.clone(), text.into_owned()));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(Error::InvalidDocument(format!(
                        "malformed XMP at position {}: {e}",
                        reader.buffer_position()
                    )));
                }
            }
            buf.clear();
        }

        Ok(summary)
    }

    /// Records namespace declarations and attribute-form properties, and
    /// returns the element's qualified name.
    fn visit_element(&mut self, element: &BytesStart) -> Result<String> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        if name == "rdf:Description" {
            self.descriptions += 1;
        }
        for attr in element.attributes() {
            let attr = attr.map_err(|e| Error::InvalidDocument(format!("XMP attribute: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::InvalidDocument(format!("XMP attribute: {e}")))?
                .into_owned();
            if let Some(prefix) = key.strip_prefix("xmlns:") {
                self.namespaces.push((prefix.to_string(), value));
            } else if key.contains(':') && !is_rdf_or_meta(&key) && !key.starts_with("xml:") {
                self.properties.push((key, value));
            }
        }
        Ok(name)
    }

    /// First value of a property, e.g. `pdfaid:part`.
    pub fn get(&self, qualified_name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == qualified_name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of a property, in document order.
    pub fn get_all<'a>(&'a self, qualified_name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.properties
            .iter()
            .filter(move |(k, _)| k == qualified_name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any description declares `uri`.
    pub fn declares_namespace(&self, uri: &str) -> bool {
        self.namespaces.iter().any(|(_, u)| u == uri)
    }

    /// `pdfaid:part` as a number.
    pub fn pdfa_part(&self) -> Option<u32> {
        self.get("pdfaid:part").and_then(|p| p.trim().parse().ok())
    }

    /// `pdfaid:conformance` as its single letter.
    pub fn pdfa_conformance(&self) -> Option<char> {
        let value = self.get("pdfaid:conformance")?.trim();
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

fn is_rdf_or_meta(name: &str) -> bool {
    name.starts_with("rdf:") || name.starts_with("x:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_element_form() {
        let xml = br#"<x:xmpmeta xmlns:x="adobe:ns:meta/">
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
    <rdf:Description rdf:about="" xmlns:pdfaid="http://www.aiim.org/pdfa/ns/id/">
      <pdfaid:part>1</pdfaid:part>
      <pdfaid:conformance>B</pdfaid:conformance>
    </rdf:Description>
    <rdf:Description rdf:about="" xmlns:dc="http://purl.org/dc/elements/1.1/">
      <dc:creator><rdf:Seq><rdf:li>Jane</rdf:li><rdf:li>John</rdf:li></rdf:Seq></dc:creator>
    </rdf:Description>
  </rdf:RDF>
</x:xmpmeta>"#;
        let summary = PacketSummary::parse(xml).unwrap();
        assert_eq!(summary.pdfa_part(), Some(1));
        assert_eq!(summary.pdfa_conformance(), Some('B'));
        assert_eq!(summary.descriptions, 2);
        assert_eq!(
            summary.get_all("dc:creator").collect::<Vec<_>>(),
            vec!["Jane", "John"]
        );
        assert!(summary.declares_namespace("http://www.aiim.org/pdfa/ns/id/"));
    }

    #[test]
    fn test_parse_attribute_form() {
        let xml = br#"<?xpacket begin="" id="W5M0MpCehiHzreSzNTczkc9d"?>
<x:xmpmeta xmlns:x="adobe:ns:meta/"><rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
<rdf:Description rdf:about="" xmlns:pdfaid="http://www.aiim.org/pdfa/ns/id/" pdfaid:part="1" pdfaid:conformance="A"/>
</rdf:RDF></x:xmpmeta>
<?xpacket end="w"?>"#;
        let summary = PacketSummary::parse(xml).unwrap();
        assert_eq!(summary.pdfa_part(), Some(1));
        assert_eq!(summary.pdfa_conformance(), Some('A'));
        assert!(summary.get("rdf:about").is_none());
    }

    #[test]
    fn test_parse_rejects_non_utf8() {
        assert!(PacketSummary::parse(&[0xFF, 0xFE, 0x00]).is_err());
    }
}
