//! Event stream → XML text.
//!
//! Escaping is left to quick-xml. A newline follows block-level ends so the
//! output reads one paragraph, line or heading per line.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use super::event::{Element, OsisEvent};
use crate::error::Result;

/// Elements followed by a newline when they close.
const BLOCK_ENDS: &[&str] = &[
    "div", "p", "lg", "l", "list", "item", "table", "row", "title", "closer", "speaker", "osisText",
    "osis", "header",
];

/// Elements followed by a newline when they open.
const BLOCK_STARTS: &[&str] = &["div", "lg", "list", "table", "row", "osis", "osisText", "header"];

/// Empty elements followed by a newline.
const BLOCK_MILESTONES: &[&str] = &["chapter", "work"];

fn start_tag(element: &Element) -> BytesStart<'_> {
    let mut tag = BytesStart::new(element.name);
    for (key, value) in &element.attributes {
        tag.push_attribute((*key, value.as_str()));
    }
    tag
}

/// Comments cannot contain `--` or end with `-`.
fn comment_text(text: &str) -> String {
    let mut out = text.replace("--", "- -");
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    if out.ends_with('-') {
        out.push(' ');
    }
    out
}

/// Serialize events into `writer`.
pub fn write_events<W: Write>(writer: &mut Writer<W>, events: &[OsisEvent]) -> Result<()> {
    for event in events {
        match event {
            OsisEvent::Start(element) => {
                writer.write_event(Event::Start(start_tag(element)))?;
                if BLOCK_STARTS.contains(&element.name) {
                    writer.get_mut().write_all(b"\n")?;
                }
            }
            OsisEvent::End(name) => {
                writer.write_event(Event::End(BytesEnd::new(*name)))?;
                if BLOCK_ENDS.contains(name) {
                    writer.get_mut().write_all(b"\n")?;
                }
            }
            OsisEvent::Empty(element) => {
                writer.write_event(Event::Empty(start_tag(element)))?;
                if BLOCK_MILESTONES.contains(&element.name) {
                    writer.get_mut().write_all(b"\n")?;
                }
            }
            OsisEvent::Text(text) => {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            OsisEvent::Comment(text) => {
                let text = comment_text(text);
                writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?;
            }
        }
    }
    Ok(())
}

/// Serialize events to a string.
pub fn events_to_string(events: &[OsisEvent]) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_events(&mut writer, events)?;
    Ok(String::from_utf8(writer.into_inner())?)
}
