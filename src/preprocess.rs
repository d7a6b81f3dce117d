// SPDX-License-Identifier: MIT
//! Content transforms applied to files before they are stored

use std::str::FromStr;

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

/// A named transform from the manifest's `preprocess` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preprocessor {
    /// Drop whitespace-only text nodes from an XML document
    XmlStripBlanks,

    /// Re-serialize a JSON document without insignificant whitespace
    JsonStripBlanks,
}

impl Preprocessor {
    pub fn name(&self) -> &'static str {
        match self {
            Preprocessor::XmlStripBlanks => "xml-stripblanks",
            Preprocessor::JsonStripBlanks => "json-stripblanks",
        }
    }

    /// Parse a comma-separated list such as `"xml-stripblanks, json-stripblanks"`
    pub fn parse_list(list: &str) -> Result<Vec<Self>, String> {
        list.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Self::from_str)
            .collect()
    }

    /// Apply the transform to `data`
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>, String> {
        match self {
            Preprocessor::XmlStripBlanks => xml_strip_blanks(data),
            Preprocessor::JsonStripBlanks => json_strip_blanks(data),
        }
    }
}

impl FromStr for Preprocessor {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "xml-stripblanks" => Ok(Preprocessor::XmlStripBlanks),
            "json-stripblanks" => Ok(Preprocessor::JsonStripBlanks),
            other => Err(format!("Unknown preprocessing option “{}”", other)),
        }
    }
}

impl std::fmt::Display for Preprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Run `data` through every preprocessor in order
pub fn apply_all(preprocessors: &[Preprocessor], data: Vec<u8>) -> Result<Vec<u8>, String> {
    preprocessors
        .iter()
        .try_fold(data, |data, preprocessor| preprocessor.apply(&data))
}

fn xml_strip_blanks(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut reader = Reader::from_reader(data);
    let mut writer = Writer::new(Vec::with_capacity(data.len()));
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| format!("XML error at byte {}: {}", reader.buffer_position(), e))?;
        match event {
            Event::Eof => break,
            Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
            event => writer
                .write_event(event)
                .map_err(|e| format!("XML write failed: {}", e))?,
        }
        buf.clear();
    }

    Ok(writer.into_inner())
}

fn json_strip_blanks(data: &[u8]) -> Result<Vec<u8>, String> {
    let value: serde_json::Value =
        serde_json::from_slice(data).map_err(|e| format!("JSON error: {}", e))?;
    serde_json::to_vec(&value).map_err(|e| format!("JSON write failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            Preprocessor::parse_list("xml-stripblanks, json-stripblanks").unwrap(),
            vec![Preprocessor::XmlStripBlanks, Preprocessor::JsonStripBlanks]
        );
        assert!(Preprocessor::parse_list("").unwrap().is_empty());
        assert!(Preprocessor::parse_list("to-pixdata").is_err());
    }

    #[test]
    fn test_xml_strip_blanks() {
        let xml = b"<interface>\n  <object id=\"w\">\n    <property name=\"x\">a b</property>\n  </object>\n</interface>\n";
        let stripped = Preprocessor::XmlStripBlanks.apply(xml).unwrap();
        assert_eq!(
            String::from_utf8(stripped).unwrap(),
            "<interface><object id=\"w\"><property name=\"x\">a b</property></object></interface>"
        );
    }

    #[test]
    fn test_xml_strip_blanks_rejects_malformed() {
        assert!(Preprocessor::XmlStripBlanks.apply(b"<a><b></a>").is_err());
    }

    #[test]
    fn test_json_strip_blanks_keeps_key_order() {
        let json = b"{\n  \"zeta\": 1,\n  \"alpha\": [ true, null ]\n}\n";
        let stripped = Preprocessor::JsonStripBlanks.apply(json).unwrap();
        assert_eq!(stripped, br#"{"zeta":1,"alpha":[true,null]}"#);
    }

    #[test]
    fn test_apply_all_in_order() {
        let out = apply_all(&[Preprocessor::JsonStripBlanks], b"[ 1, 2 ]".to_vec()).unwrap();
        assert_eq!(out, b"[1,2]");
        assert_eq!(apply_all(&[], b"raw".to_vec()).unwrap(), b"raw");
    }
}
