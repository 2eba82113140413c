//! Built-in PDF/A-1 rule checker.
//!
//! Covers the structural rules that matter when promoting a PDF/A-1 file to
//! PDF/A-3 rather than the full ISO 19005-1 catalog. Clause numbers refer to
//! ISO 19005-1:2005.

use crate::error::{Error, Result};
use crate::gate::{ConformanceChecker, Verdict};
use crate::xmp::PacketSummary;
use lopdf::{Dictionary, Document, Object};

/// Actions forbidden by clause 6.6.1.
const FORBIDDEN_ACTIONS: [&[u8]; 6] = [
    b"Launch",
    b"Sound",
    b"Movie",
    b"ResetForm",
    b"ImportData",
    b"JavaScript",
];

/// Output of the parse phase.
#[derive(Debug)]
pub struct Pdfa1Document {
    pub document: Document,
}

/// Checks a document against a subset of the PDF/A-1 rules.
#[derive(Debug, Clone, Default)]
pub struct Pdfa1Checker;

impl Pdfa1Checker {
    pub fn new() -> Self {
        Self
    }
}

impl ConformanceChecker for Pdfa1Checker {
    type Parsed = Pdfa1Document;

    fn parse(&self, bytes: &[u8]) -> Result<Pdfa1Document> {
        if !bytes.starts_with(b"%PDF-1.") || bytes.len() < 8 {
            return Err(Error::Parse("missing %PDF-1.x header".to_string()));
        }
        let minor = bytes[7];
        if !(b'0'..=b'4').contains(&minor) {
            return Err(Error::Parse(format!(
                "PDF version 1.{} is newer than PDF/A-1 allows",
                minor as char
            )));
        }

        let tail = if bytes.len() > 1024 {
            &bytes[bytes.len() - 1024..]
        } else {
            bytes
        };
        if !tail.windows(5).any(|w| w == b"%%EOF") {
            return Err(Error::Parse("missing %%EOF marker".to_string()));
        }

        let document = Document::load_mem(bytes).map_err(|e| Error::Parse(e.to_string()))?;
        Ok(Pdfa1Document { document })
    }

    fn validate(&self, parsed: Pdfa1Document) -> Result<Verdict> {
        let doc = &parsed.document;
        let mut verdict = Verdict::default();

        check_trailer(doc, &mut verdict);

        let catalog_id = doc
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .map_err(|_| Error::InvalidDocument("trailer has no /Root".to_string()))?;
        let catalog = doc.get_dictionary(catalog_id)?;

        check_metadata(doc, catalog, &mut verdict);
        check_output_intents(doc, catalog, &mut verdict);
        check_name_dictionary(doc, catalog, &mut verdict);

        for object in doc.objects.values() {
            walk(object, &mut verdict);
        }

        Ok(verdict)
    }
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn check_trailer(doc: &Document, verdict: &mut Verdict) {
    if doc.trailer.get(b"ID").is_err() {
        verdict.push("6.1.3", "file trailer has no /ID entry");
    }
    if doc.trailer.get(b"Encrypt").is_ok() || doc.is_encrypted() {
        verdict.push("6.1.3", "document is encrypted");
    }
}

fn check_metadata(doc: &Document, catalog: &Dictionary, verdict: &mut Verdict) {
    let Some(stream) = catalog
        .get(b"Metadata")
        .ok()
        .and_then(|m| resolve(doc, m))
        .and_then(|m| m.as_stream().ok())
    else {
        verdict.push("6.7.2", "catalog has no metadata stream");
        return;
    };

    if stream.dict.get(b"Filter").is_ok() {
        verdict.push("6.7.2", "metadata stream is filtered");
        return;
    }

    match PacketSummary::parse(&stream.content) {
        Ok(summary) => {
            if summary.pdfa_part() != Some(1) {
                verdict.push("6.7.11", "metadata does not declare pdfaid:part 1");
            }
            if !matches!(summary.pdfa_conformance(), Some('A' | 'B')) {
                verdict.push("6.7.11", "metadata does not declare conformance A or B");
            }
        }
        Err(e) => verdict.push("6.7.2", format!("metadata is not well-formed XMP: {e}")),
    }
}

fn check_output_intents(doc: &Document, catalog: &Dictionary, verdict: &mut Verdict) {
    let has_pdfa_intent = catalog
        .get(b"OutputIntents")
        .ok()
        .and_then(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
        .is_some_and(|intents| {
            intents.iter().any(|intent| {
                resolve(doc, intent)
                    .and_then(|i| i.as_dict().ok())
                    .and_then(|i| i.get(b"S").ok())
                    .and_then(|s| s.as_name().ok())
                    == Some(b"GTS_PDFA1".as_slice())
            })
        });
    if !has_pdfa_intent {
        verdict.push("6.2.2", "no GTS_PDFA1 output intent");
    }
}

fn check_name_dictionary(doc: &Document, catalog: &Dictionary, verdict: &mut Verdict) {
    let names = catalog
        .get(b"Names")
        .ok()
        .and_then(|n| resolve(doc, n))
        .and_then(|n| n.as_dict().ok());
    if let Some(names) = names {
        if names.has(b"EmbeddedFiles") {
            verdict.push("6.1.11", "name dictionary contains /EmbeddedFiles");
        }
        if names.has(b"JavaScript") {
            verdict.push("6.6.1", "name dictionary contains /JavaScript");
        }
    }
}

/// Applies the per-dictionary rules to every dictionary nested in `object`.
fn walk(object: &Object, verdict: &mut Verdict) {
    match object {
        Object::Dictionary(dict) => check_dictionary(dict, verdict),
        Object::Stream(stream) => check_dictionary(&stream.dict, verdict),
        Object::Array(items) => items.iter().for_each(|item| walk(item, verdict)),
        _ => {}
    }
}

fn check_dictionary(dict: &Dictionary, verdict: &mut Verdict) {
    if let Ok(filter) = dict.get(b"Filter") {
        let uses_lzw = match filter {
            Object::Name(name) => name == b"LZWDecode",
            Object::Array(names) => names
                .iter()
                .any(|n| n.as_name().is_ok_and(|n| n == b"LZWDecode")),
            _ => false,
        };
        if uses_lzw {
            verdict.push("6.1.10", "stream uses LZWDecode");
        }
    }

    if let Ok(smask) = dict.get(b"SMask") {
        if smask.as_name().ok() != Some(b"None".as_slice()) {
            verdict.push("6.4", "soft mask present");
        }
    }

    if let Ok(subtype) = dict.get(b"S").and_then(Object::as_name) {
        if subtype == b"Transparency" {
            verdict.push("6.4", "transparency group present");
        } else if FORBIDDEN_ACTIONS.contains(&subtype) {
            verdict.push(
                "6.6.1",
                format!("forbidden {} action", String::from_utf8_lossy(subtype)),
            );
        }
    }

    for (_, value) in dict.iter() {
        walk(value, verdict);
    }
}
