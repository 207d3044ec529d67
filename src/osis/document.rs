//! OSIS document envelope.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, Event};

use super::event::{Element, OsisEvent};
use super::writer::write_events;
use crate::config::OsisWork;
use crate::error::Result;

pub const OSIS_VERSION: &str = "2.1.1";
pub const OSIS_NAMESPACE: &str = "http://www.bibletechnologies.net/2003/OSIS/namespace";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Wraps converted books in `<osis><osisText>` with a work header.
#[derive(Debug, Clone)]
pub struct OsisDocument {
    work: OsisWork,
}

impl OsisDocument {
    pub fn new(work: OsisWork) -> Self {
        Self { work }
    }

    pub fn work(&self) -> &OsisWork {
        &self.work
    }

    fn opening(&self) -> Vec<OsisEvent> {
        let schema = format!("{OSIS_NAMESPACE} http://www.bibletechnologies.net/osisCore.{OSIS_VERSION}.xsd");
        vec![
            OsisEvent::Start(
                Element::new("osis")
                    .with("xmlns", OSIS_NAMESPACE)
                    .with("xmlns:xsi", XSI_NAMESPACE)
                    .with("xsi:schemaLocation", schema),
            ),
            OsisEvent::Start(
                Element::new("osisText")
                    .with("osisRefWork", "Bible")
                    .with("xml:lang", &self.work.language)
                    .with("osisIDWork", &self.work.work),
            ),
            OsisEvent::Start(Element::new("header")),
            OsisEvent::Empty(Element::new("work").with("osisWork", &self.work.work)),
            OsisEvent::End("header"),
        ]
    }

    /// Write the full document with each book's events in order.
    pub fn write<'e, W, I>(&self, out: W, books: I) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = &'e [OsisEvent]>,
    {
        let mut writer = Writer::new(out);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.get_mut().write_all(b"\n")?;
        write_events(&mut writer, &self.opening())?;
        for book in books {
            write_events(&mut writer, book)?;
        }
        write_events(&mut writer, &[OsisEvent::End("osisText"), OsisEvent::End("osis")])?;
        Ok(())
    }

    pub fn to_xml<'e, I>(&self, books: I) -> Result<String>
    where
        I: IntoIterator<Item = &'e [OsisEvent]>,
    {
        let mut out = Vec::new();
        self.write(&mut out, books)?;
        Ok(String::from_utf8(out)?)
    }
}
