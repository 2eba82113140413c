//! RDF/XML serialization of metadata packets.

use super::{Field, FieldValue, MetadataPacket, SchemaBlock};
use crate::error::{Error, Result};
use chrono::SecondsFormat;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

const NS_X: &str = "adobe:ns:meta/";
const NS_RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

const XPACKET_BEGIN: &[u8] = b"<?xpacket begin=\"\xEF\xBB\xBF\" id=\"W5M0MpCehiHzreSzNTczkc9d\"?>\n";
const XPACKET_END: &[u8] = b"\n<?xpacket end=\"w\"?>";

/// Turns a packet into the bytes stored in a PDF metadata stream.
pub trait MetadataSerializer {
    fn serialize(&self, packet: &MetadataPacket) -> Result<Vec<u8>>;
}

/// Writes packets as `x:xmpmeta` / `rdf:RDF` with one `rdf:Description` per
/// schema block.
#[derive(Debug, Clone)]
pub struct RdfXmlSerializer {
    with_xpacket: bool,
}

impl Default for RdfXmlSerializer {
    fn default() -> Self {
        Self { with_xpacket: true }
    }
}

impl RdfXmlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the packet is wrapped in `<?xpacket?>` processing instructions.
    pub fn with_xpacket(mut self, enabled: bool) -> Self {
        self.with_xpacket = enabled;
        self
    }

    fn write_block<W: std::io::Write>(writer: &mut Writer<W>, block: &SchemaBlock) -> Result<()> {
        let mut description = BytesStart::new("rdf:Description");
        description.push_attribute(("rdf:about", ""));
        for ns in block.namespaces() {
            check_name(&ns.prefix)?;
            check_text(&ns.uri)?;
            let attr = format!("xmlns:{}", ns.prefix);
            description.push_attribute((attr.as_str(), ns.uri.as_str()));
        }
        writer.write_event(Event::Start(description))?;
        for field in &block.fields {
            Self::write_field(writer, field)?;
        }
        writer.write_event(Event::End(BytesEnd::new("rdf:Description")))?;
        Ok(())
    }

    fn write_field<W: std::io::Write>(writer: &mut Writer<W>, field: &Field) -> Result<()> {
        check_name(&field.prefix)?;
        check_name(&field.name)?;
        let name = field.qualified_name();
        match &field.value {
            FieldValue::Resource(fields) => {
                let mut start = BytesStart::new(name.as_str());
                start.push_attribute(("rdf:parseType", "Resource"));
                writer.write_event(Event::Start(start))?;
                for inner in fields {
                    Self::write_field(writer, inner)?;
                }
            }
            value => {
                writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
                Self::write_value(writer, value)?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        Ok(())
    }

    fn write_value<W: std::io::Write>(writer: &mut Writer<W>, value: &FieldValue) -> Result<()> {
        match value {
            FieldValue::Text(s) => {
                check_text(s)?;
                writer.write_event(Event::Text(BytesText::new(s)))?;
            }
            FieldValue::Integer(i) => {
                writer.write_event(Event::Text(BytesText::new(&i.to_string())))?;
            }
            FieldValue::Date(date) => {
                let iso = date.to_rfc3339_opts(SecondsFormat::Secs, false);
                writer.write_event(Event::Text(BytesText::new(&iso)))?;
            }
            FieldValue::Seq(items) => Self::write_array(writer, "rdf:Seq", items)?,
            FieldValue::Bag(items) => Self::write_array(writer, "rdf:Bag", items)?,
            FieldValue::Resource(_) => {
                return Err(Error::Serialization(
                    "structured value outside of a property".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn write_array<W: std::io::Write>(
        writer: &mut Writer<W>,
        container: &str,
        items: &[FieldValue],
    ) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new(container)))?;
        for item in items {
            match item {
                FieldValue::Resource(fields) => {
                    let mut li = BytesStart::new("rdf:li");
                    li.push_attribute(("rdf:parseType", "Resource"));
                    writer.write_event(Event::Start(li))?;
                    for inner in fields {
                        Self::write_field(writer, inner)?;
                    }
                }
                value => {
                    writer.write_event(Event::Start(BytesStart::new("rdf:li")))?;
                    Self::write_value(writer, value)?;
                }
            }
            writer.write_event(Event::End(BytesEnd::new("rdf:li")))?;
        }
        writer.write_event(Event::End(BytesEnd::new(container)))?;
        Ok(())
    }
}

impl MetadataSerializer for RdfXmlSerializer {
    fn serialize(&self, packet: &MetadataPacket) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        if self.with_xpacket {
            out.extend_from_slice(XPACKET_BEGIN);
        }

        let mut writer = Writer::new_with_indent(out, b' ', 2);
        let mut xmpmeta = BytesStart::new("x:xmpmeta");
        xmpmeta.push_attribute(("xmlns:x", NS_X));
        writer.write_event(Event::Start(xmpmeta))?;

        let mut rdf = BytesStart::new("rdf:RDF");
        rdf.push_attribute(("xmlns:rdf", NS_RDF));
        writer.write_event(Event::Start(rdf))?;

        for block in packet.blocks() {
            Self::write_block(&mut writer, block)?;
        }

        writer.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
        writer.write_event(Event::End(BytesEnd::new("x:xmpmeta")))?;

        let mut out = writer.into_inner();
        if self.with_xpacket {
            out.extend_from_slice(XPACKET_END);
        }
        Ok(out)
    }
}

/// Rejects anything that cannot be used as an XML name part.
fn check_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if valid_start && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.')) {
        Ok(())
    } else {
        Err(Error::Serialization(format!("invalid XML name {name:?}")))
    }
}

/// Rejects characters outside the XML 1.0 `Char` production, which no
/// escape can represent.
fn check_text(text: &str) -> Result<()> {
    let forbidden = text.chars().find(|c| {
        matches!(
            c,
            '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
        )
    });
    match forbidden {
        Some(c) => Err(Error::Serialization(format!(
            "character U+{:04X} is not allowed in XML: {text:?}",
            c as u32
        ))),
        None => Ok(()),
    }
}
