//! OSIS event stream.

/// An element with its attributes, in output order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: &'static str,
    pub attributes: Vec<(&'static str, String)>,
}

impl Element {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set an attribute, replacing an earlier value for the same key.
    pub fn set(&mut self, key: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// One step of converted output.
///
/// The engine produces a flat, well-nested sequence of these; serialization
/// to XML text happens separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsisEvent {
    Start(Element),
    End(&'static str),
    /// An element with no content (`<verse sID=".."/>`, `<lb/>`).
    Empty(Element),
    Text(String),
    Comment(String),
}

impl OsisEvent {
    pub fn text(&self) -> Option<&str> {
        match self {
            OsisEvent::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_start_of(&self, name: &str) -> bool {
        matches!(self, OsisEvent::Start(e) if e.name == name)
    }
}

/// Whether every start has exactly one matching end, properly nested.
pub fn is_well_nested(events: &[OsisEvent]) -> bool {
    let mut open = Vec::new();
    for event in events {
        match event {
            OsisEvent::Start(e) => open.push(e.name),
            OsisEvent::End(name) => {
                if open.pop() != Some(*name) {
                    return false;
                }
            }
            _ => {}
        }
    }
    open.is_empty()
}
