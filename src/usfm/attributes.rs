//! Attribute syntax inside character markers.
//!
//! USFM 3 word-level attributes follow a `|` at the end of the marker's
//! content: `\w gracious|lemma="grace" strong="H2603"\w*`. A bare value
//! without `key=` names the marker's default attribute (`\w word|H1\w*`).
//! Figures additionally accept the USFM 2 form with six `|` separators.

use std::fmt;

/// A parsed `key="value"` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Why attribute text could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedAttributes {
    /// A key was not followed by `=`.
    MissingEquals,
    /// A value did not start with `"`.
    UnquotedValue,
    /// A quoted value was not terminated.
    UnterminatedQuote,
    /// A character that cannot start a key.
    UnexpectedCharacter(char),
}

impl fmt::Display for MalformedAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEquals => write!(f, "attribute key without '='"),
            Self::UnquotedValue => write!(f, "attribute value must be quoted"),
            Self::UnterminatedQuote => write!(f, "unterminated attribute value"),
            Self::UnexpectedCharacter(c) => write!(f, "unexpected character {c:?} in attributes"),
        }
    }
}

/// Split marker content at the attribute separator.
///
/// Returns the visible text and the attribute text, or `None` when the
/// content has no `|`.
pub fn split_attributes(content: &str) -> Option<(&str, &str)> {
    let bar = content.find('|')?;
    Some((&content[..bar], &content[bar + 1..]))
}

/// Parse attribute text.
///
/// Pairs are separated by whitespace or `|`. Text without any `=` is taken
/// as the value of `default_key`.
///
/// # Examples
///
/// ```
/// use usfm2osis::usfm::parse_attributes;
///
/// let attrs = parse_attributes(r#"lemma="grace" strong="H2603""#, "lemma").unwrap();
/// assert_eq!(attrs.len(), 2);
/// assert_eq!(attrs[1].value, "H2603");
///
/// let default = parse_attributes("H2603", "lemma").unwrap();
/// assert_eq!(default[0].key, "lemma");
/// ```
pub fn parse_attributes(src: &str, default_key: &str) -> Result<Vec<Attribute>, MalformedAttributes> {
    let trimmed = src.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if !trimmed.contains('=') {
        return Ok(vec![Attribute::new(default_key, trimmed)]);
    }

    let mut attrs = Vec::new();
    let mut chars = trimmed.char_indices().peekable();

    loop {
        while chars.next_if(|&(_, c)| c.is_whitespace() || c == '|').is_some() {}
        let Some(&(key_start, first)) = chars.peek() else {
            break;
        };
        if !is_key_char(first) {
            return Err(MalformedAttributes::UnexpectedCharacter(first));
        }

        let mut key_end = key_start;
        while let Some((i, c)) = chars.next_if(|&(_, c)| is_key_char(c)) {
            key_end = i + c.len_utf8();
        }
        let key = &trimmed[key_start..key_end];

        while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
        if chars.next_if(|&(_, c)| c == '=').is_none() {
            return Err(MalformedAttributes::MissingEquals);
        }
        while chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
        if chars.next_if(|&(_, c)| c == '"').is_none() {
            return Err(MalformedAttributes::UnquotedValue);
        }

        let mut value = String::new();
        let mut terminated = false;
        for (_, c) in chars.by_ref() {
            if c == '"' {
                terminated = true;
                break;
            }
            value.push(c);
        }
        if !terminated {
            return Err(MalformedAttributes::UnterminatedQuote);
        }
        attrs.push(Attribute::new(key, value));
    }

    Ok(attrs)
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// A figure description in either USFM 2 or USFM 3 syntax.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Figure {
    pub caption: String,
    pub src: Option<String>,
    pub size: Option<String>,
    pub alt: Option<String>,
    pub copy: Option<String>,
    pub reference: Option<String>,
}

/// Parse `\fig` content.
///
/// USFM 2: `DESC|FILE|SIZE|LOC|COPY|CAP|REF`. USFM 3: `CAP|src="…" size="…"`.
pub fn parse_figure(content: &str, default_key: &str) -> Result<Figure, MalformedAttributes> {
    let fields: Vec<&str> = content.split('|').collect();
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    if fields.len() == 7 && !content.contains('=') {
        return Ok(Figure {
            caption: fields[5].trim().to_string(),
            src: non_empty(fields[1]),
            size: non_empty(fields[2]),
            alt: non_empty(fields[0]),
            copy: non_empty(fields[4]),
            reference: non_empty(fields[6]),
        });
    }

    let Some((caption, attrs)) = split_attributes(content) else {
        return Ok(Figure {
            caption: content.trim().to_string(),
            ..Figure::default()
        });
    };
    let mut figure = Figure {
        caption: caption.trim().to_string(),
        ..Figure::default()
    };
    for attr in parse_attributes(attrs, default_key)? {
        let slot = match attr.key.as_str() {
            "src" | "file" => &mut figure.src,
            "size" => &mut figure.size,
            "alt" => &mut figure.alt,
            "copy" => &mut figure.copy,
            "ref" => &mut figure.reference,
            _ => continue,
        };
        *slot = Some(attr.value);
    }
    Ok(figure)
}
