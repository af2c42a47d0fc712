use crate::event::Event;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event as XmlEvent};
use quick_xml::Writer;
use serde_json::Value;
use std::io::{self, Write};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0} payload is not a record")]
    NotARecord(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ndjson,
    Xml,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ndjson" | "json" => Ok(Format::Ndjson),
            "xml" => Ok(Format::Xml),
            _ => Err(format!("unknown output format {:?}", s)),
        }
    }
}

pub fn write_events<W: Write>(format: Format, events: &[Event], writer: W) -> Result<(), OutputError> {
    match format {
        Format::Ndjson => write_ndjson(events, writer),
        Format::Xml => write_xml(events, writer),
    }
}

/// One `{type, id, op, data}` object per line.
pub fn write_ndjson<W: Write>(events: &[Event], mut writer: W) -> Result<(), OutputError> {
    for event in events {
        serde_json::to_writer(&mut writer, event)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// A `<contest>` tree with one element per event, in feed order.
pub fn write_xml<W: Write>(events: &[Event], writer: W) -> Result<(), OutputError> {
    let mut xml = Writer::new_with_indent(writer, b' ', 2);
    xml.write_event(XmlEvent::Decl(BytesDecl::new(b"1.0", Some(b"UTF-8"), None)))?;
    xml.write_event(XmlEvent::Start(BytesStart::borrowed_name(b"contest")))?;

    for event in events {
        let name = event.entity_type().element_name();
        let mut start = BytesStart::borrowed_name(name.as_bytes());
        start.push_attribute(("id", event.id.as_str()));
        start.push_attribute(("op", event.op.as_str()));
        xml.write_event(XmlEvent::Start(start))?;

        let fields = match serde_json::to_value(&event.data)? {
            Value::Object(fields) => fields,
            _ => return Err(OutputError::NotARecord(name)),
        };
        for (field, value) in &fields {
            match value {
                Value::Array(items) => {
                    for item in items {
                        write_field(&mut xml, field, item)?;
                    }
                }
                _ => write_field(&mut xml, field, value)?,
            }
        }

        xml.write_event(XmlEvent::End(BytesEnd::borrowed(name.as_bytes())))?;
    }

    xml.write_event(XmlEvent::End(BytesEnd::borrowed(b"contest")))?;
    let mut writer = xml.into_inner();
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn write_field<W: Write>(xml: &mut Writer<W>, field: &str, value: &Value) -> Result<(), OutputError> {
    let text = match value {
        Value::Null => return Ok(()),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    xml.write_event(XmlEvent::Start(BytesStart::borrowed_name(field.as_bytes())))?;
    xml.write_event(XmlEvent::Text(BytesText::from_plain_str(&text)))?;
    xml.write_event(XmlEvent::End(BytesEnd::borrowed(field.as_bytes())))?;
    Ok(())
}
