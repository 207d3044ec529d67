//! Tag registry: USFM marker → OSIS conversion rule.
//!
//! Rules are keyed by base marker name. Numbered families (`\q1`..`\q4`,
//! `\s1`..`\s4`, `\toc1`..`\toc3`) share one rule; lookup strips the
//! trailing digits and retries when the exact name is not registered.
//!
//! The registry is built once and is read-only during conversion. Use
//! [`TagRegistry::standard`] for the shared USFM 2.x inventory.

use std::collections::HashMap;

// ============================================================================
// Scope ranks
// ============================================================================
//
// A frame is implicitly closed by an incoming block marker whose rank is at
// least its own. Inline frames have rank zero; the book division is never
// implicitly closed.

/// Character styles and note text.
pub const RANK_INLINE: u8 = 0;
/// Line-scoped titles and labels (closed at end of line).
pub const RANK_LINE: u8 = 2;
/// Table cells.
pub const RANK_CELL: u8 = 3;
/// Paragraphs, poetry lines, list items, table rows.
pub const RANK_PARAGRAPH: u8 = 5;
/// `lg`, `list` and `table` wrappers.
pub const RANK_CONTAINER: u8 = 10;
/// `\s` sections (level 1; deeper levels rank lower).
pub const RANK_SECTION: u8 = 25;
/// `\ms` major sections (level 1; deeper levels rank lower).
pub const RANK_MAJOR_SECTION: u8 = 29;
/// The book division.
pub const RANK_BOOK: u8 = 100;

/// Scope class of a rule, used for dispatch in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeClass {
    /// Block-level element with an implicit terminator (`\p`, `\s`, `\mt`).
    Structural,
    /// Character-level element, closed by `\xxx*` or implicitly.
    Inline,
    /// Point marker carrying an argument (`\c`, `\v`, `\toc1`, `\rem`).
    Milestone,
    /// Marker that produces an empty element and opens no scope (`\b`).
    SelfClosing,
    /// Structural marker whose numeric suffix is an indent level (`\q2`).
    NumberedFamily,
}

/// Mutually exclusive families: a new member closes an open one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Paragraph,
    Cell,
    NoteText,
}

/// Wrapper elements that group consecutive members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    LineGroup,
    List,
    Table,
}

impl Container {
    /// The rule used for the wrapper's scope frame.
    pub fn rule(self) -> &'static TagRule {
        match self {
            Container::LineGroup => &LINE_GROUP,
            Container::List => &LIST,
            Container::Table => &TABLE,
        }
    }
}

/// How a numeric suffix is rendered on the output element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStyle {
    /// Not rendered.
    Hidden,
    /// As a `level` attribute (`<l level="2">`).
    Attribute,
    /// Appended to the `type` attribute (`type="x-indented-2"`).
    TypeSuffix,
}

/// Argument syntax of a marker that consumes following text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Argument {
    /// First whitespace-delimited word (`\c 3`, `\v 5-6`, `\f +`).
    Word,
    /// Rest of the source line (`\toc1 Genesis`, `\rem note`).
    Line,
}

/// Kind of note opened by `\f`, `\fe` and `\x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Footnote,
    Endnote,
    CrossReference,
}

/// What the engine does with a resolved marker beyond the generic
/// open/close behaviour of its scope class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Open the rule's element (and container if any).
    Open,
    /// `\c`: chapter milestone.
    Chapter,
    /// `\v`: verse milestone.
    Verse,
    /// Section heading: a division plus a line-scoped title. `deeper`
    /// replaces the division type for levels above one.
    Heading { deeper: &'static str },
    /// Note with a re-tokenized body.
    Note(NoteKind),
    /// Word-level attributes (`\w word|strong="H1"\w*`).
    Word,
    /// Figure with pipe or attribute syntax.
    Figure,
    /// Reference to the verse currently being converted.
    AnnotateRef,
    /// Cross-reference target whose text may resolve to an osisRef.
    XrefTarget,
    /// Milestone whose `n` is the rest of the line.
    LineMilestone,
    /// XML comment holding the rest of the line.
    Comment,
    /// Drop the marker and the rest of its line.
    Discard,
}

/// Fixed attributes of an element template.
pub type Attrs = &'static [(&'static str, &'static str)];

/// Output element shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementTemplate {
    pub name: &'static str,
    pub attributes: Attrs,
}

/// Conversion rule for one marker family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRule {
    /// Base marker name (`q` for `\q1`).
    pub name: &'static str,
    pub scope: ScopeClass,
    /// Element to open; `None` for scopes with no output (`\ft`).
    pub element: Option<ElementTemplate>,
    /// Attribute names the marker may carry in attribute syntax.
    pub attributes: &'static [&'static str],
    /// Attribute assumed when the attribute text has no `key=`.
    pub default_attribute: Option<&'static str>,
    /// Markers that force-close this scope while it is on top.
    pub implicitly_closed_by: &'static [&'static str],
    pub family: Option<Family>,
    pub rank: u8,
    /// Highest accepted numeric suffix; `None` when digits are not allowed.
    pub max_level: Option<u32>,
    pub level_style: LevelStyle,
    pub container: Option<Container>,
    /// Scope ends with its source line.
    pub line_scoped: bool,
    /// Line breaks inside the scope become `<lb/>`.
    pub keeps_lines: bool,
    pub argument: Option<Argument>,
    pub action: Action,
}

/// Character styles do not run across verse or chapter boundaries.
const CHAR_CLOSERS: &[&str] = &["c", "v"];

const WORD_ATTRIBUTES: &[&str] = &["lemma", "strong", "x-morph", "morph", "srcloc", "gloss"];
const FIGURE_ATTRIBUTES: &[&str] = &["alt", "src", "size", "loc", "copy", "ref"];
const NOTE_ATTRIBUTES: &[&str] = &["caller"];

impl TagRule {
    pub const fn new(name: &'static str, scope: ScopeClass) -> Self {
        Self {
            name,
            scope,
            element: None,
            attributes: &[],
            default_attribute: None,
            implicitly_closed_by: &[],
            family: None,
            rank: RANK_INLINE,
            max_level: None,
            level_style: LevelStyle::Hidden,
            container: None,
            line_scoped: false,
            keeps_lines: false,
            argument: None,
            action: Action::Open,
        }
    }

    pub const fn element(mut self, name: &'static str, attributes: Attrs) -> Self {
        self.element = Some(ElementTemplate { name, attributes });
        self
    }

    pub const fn rank(mut self, rank: u8) -> Self {
        self.rank = rank;
        self
    }

    pub const fn family(mut self, family: Family) -> Self {
        self.family = Some(family);
        self
    }

    pub const fn levels(mut self, max: u32, style: LevelStyle) -> Self {
        self.max_level = Some(max);
        self.level_style = style;
        self
    }

    pub const fn container(mut self, container: Container) -> Self {
        self.container = Some(container);
        self
    }

    pub const fn keeps_lines(mut self) -> Self {
        self.keeps_lines = true;
        self
    }

    pub const fn closed_by(mut self, markers: &'static [&'static str]) -> Self {
        self.implicitly_closed_by = markers;
        self
    }

    pub const fn attributes(mut self, names: &'static [&'static str], default: &'static str) -> Self {
        self.attributes = names;
        self.default_attribute = Some(default);
        self
    }

    pub const fn argument(mut self, argument: Argument) -> Self {
        self.argument = Some(argument);
        self
    }

    pub const fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// A paragraph-class block.
    pub const fn paragraph(name: &'static str) -> Self {
        Self::new(name, ScopeClass::Structural)
            .rank(RANK_PARAGRAPH)
            .family(Family::Paragraph)
    }

    /// A title-like block ending with its source line.
    pub const fn line(name: &'static str, element: &'static str) -> Self {
        let mut rule = Self::new(name, ScopeClass::Structural).rank(RANK_LINE);
        rule.element = Some(ElementTemplate {
            name: element,
            attributes: &[],
        });
        rule.line_scoped = true;
        rule
    }

    /// A character style.
    pub const fn inline(name: &'static str) -> Self {
        Self::new(name, ScopeClass::Inline).closed_by(CHAR_CLOSERS)
    }

    /// Text inside a footnote or cross reference.
    pub const fn note_text(name: &'static str) -> Self {
        Self::new(name, ScopeClass::Inline).family(Family::NoteText)
    }

    /// Whether this marker accepts a numeric suffix.
    pub fn is_numbered(&self) -> bool {
        self.max_level.is_some()
    }

    /// Whether this rule opens a block-level scope.
    pub fn is_block(&self) -> bool {
        matches!(
            self.scope,
            ScopeClass::Structural | ScopeClass::NumberedFamily | ScopeClass::SelfClosing
        ) && self.rank > RANK_INLINE
    }

    /// Whether this rule is a wrapper (`lg`, `list`, `table`).
    pub fn is_container(&self) -> bool {
        self.rank == RANK_CONTAINER
    }

    /// Rank of a frame opened by this rule at `level`.
    ///
    /// Deeper section levels rank lower so `\s1` closes an open `\s2`
    /// but not the reverse.
    pub fn frame_rank(&self, level: Option<u32>) -> u8 {
        let depth = level.unwrap_or(1).saturating_sub(1).min(4) as u8;
        if self.rank >= RANK_SECTION && self.rank < RANK_BOOK {
            self.rank - depth
        } else {
            self.rank
        }
    }

    /// Rank used when this rule closes frames ahead of itself.
    ///
    /// Line-scoped titles sit inside nothing paragraph-like, so they close
    /// open paragraphs even though their own frame ranks lower.
    pub fn closing_rank(&self, level: Option<u32>) -> u8 {
        if self.line_scoped {
            RANK_PARAGRAPH
        } else {
            self.frame_rank(level)
        }
    }
}

// ============================================================================
// Synthetic rules (not addressable by marker name)
// ============================================================================

/// `<lg>` around poetry lines.
pub static LINE_GROUP: TagRule =
    TagRule::new("lg", ScopeClass::Structural).element("lg", &[]).rank(RANK_CONTAINER);

/// `<list>` around list items.
pub static LIST: TagRule =
    TagRule::new("list", ScopeClass::Structural).element("list", &[]).rank(RANK_CONTAINER);

/// `<table>` around rows.
pub static TABLE: TagRule =
    TagRule::new("table", ScopeClass::Structural).element("table", &[]).rank(RANK_CONTAINER);

/// The book division wrapping a whole document.
pub static BOOK: TagRule =
    TagRule::new("book", ScopeClass::Structural).element("div", &[("type", "book")]).rank(RANK_BOOK);

/// The title line of a section heading.
pub static HEADING_TITLE: TagRule = TagRule::line("s", "title");

// ============================================================================
// Registry
// ============================================================================

/// Marker name → rule lookup table.
#[derive(Debug, Clone, Default)]
pub struct TagRegistry {
    rules: HashMap<&'static str, TagRule>,
}

impl TagRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a rule.
    pub fn register(&mut self, rule: TagRule) {
        self.rules.insert(rule.name, rule);
    }

    /// Look up a marker name, retrying without trailing digits for
    /// numbered families.
    pub fn lookup(&self, name: &str) -> Option<&TagRule> {
        if let Some(rule) = self.rules.get(name) {
            return Some(rule);
        }
        let base = name.trim_end_matches(|c: char| c.is_ascii_digit());
        if base.is_empty() || base.len() == name.len() {
            return None;
        }
        self.rules.get(base).filter(|rule| rule.is_numbered())
    }

    /// Whether a marker name (with optional digits) is known.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All registered rules.
    pub fn rules(&self) -> impl Iterator<Item = &TagRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The shared USFM 2.x registry (built on first use).
    pub fn standard() -> &'static Self {
        use std::sync::LazyLock;
        static STANDARD: LazyLock<TagRegistry> = LazyLock::new(TagRegistry::build_standard);
        &STANDARD
    }

    /// Build the USFM 2.x marker inventory.
    fn build_standard() -> Self {
        use Argument::{Line, Word};
        use LevelStyle::{Attribute, Hidden, TypeSuffix};
        use ScopeClass::{Milestone, NumberedFamily, SelfClosing};

        let mut r = Self::new();

        // ====================================================================
        // Identification
        // ====================================================================

        for name in ["id", "ide", "sts", "restore", "usfm"] {
            r.register(TagRule::new(name, Milestone).argument(Line).action(Action::Discard));
        }
        r.register(TagRule::new("rem", Milestone).argument(Line).action(Action::Comment));
        r.register(
            TagRule::line("h", "title")
                .element("title", &[("type", "runningHead")])
                .levels(3, Hidden),
        );
        r.register(
            TagRule::new("toc", Milestone)
                .element("milestone", &[])
                .levels(3, Hidden)
                .argument(Line)
                .action(Action::LineMilestone),
        );

        // ====================================================================
        // Introductions
        // ====================================================================

        r.register(
            TagRule::line("imt", "title")
                .element("title", &[("type", "main"), ("subType", "x-introduction")])
                .levels(4, Attribute),
        );
        r.register(
            TagRule::line("imte", "title")
                .element("title", &[("type", "main"), ("subType", "x-introduction-end")])
                .levels(4, Attribute),
        );
        r.register(
            TagRule::new("is", ScopeClass::Structural)
                .element("div", &[("type", "section"), ("subType", "x-introduction")])
                .rank(RANK_SECTION)
                .levels(2, Hidden)
                .action(Action::Heading {
                    deeper: "subSection",
                }),
        );
        let intro: &[(&str, Attrs)] = &[
            ("ip", &[("subType", "x-introduction")]),
            ("ipi", &[("type", "x-indented"), ("subType", "x-introduction")]),
            ("im", &[("type", "x-noindent"), ("subType", "x-introduction")]),
            ("imi", &[("type", "x-noindent-indented"), ("subType", "x-introduction")]),
            ("ipq", &[("type", "x-quote"), ("subType", "x-introduction")]),
            ("imq", &[("type", "x-noindent-quote"), ("subType", "x-introduction")]),
            ("ipr", &[("type", "x-right"), ("subType", "x-introduction")]),
            ("iex", &[("type", "x-bridge")]),
        ];
        for &(name, attrs) in intro {
            r.register(TagRule::paragraph(name).element("p", attrs));
        }
        r.register(
            TagRule::paragraph("iq")
                .element("l", &[("subType", "x-introduction")])
                .levels(3, Attribute)
                .container(Container::LineGroup)
                .keeps_lines(),
        );
        r.register(
            TagRule::new("ib", SelfClosing)
                .element("lb", &[("type", "x-p")])
                .rank(RANK_PARAGRAPH),
        );
        r.register(
            TagRule::paragraph("ili")
                .element("item", &[("subType", "x-introduction")])
                .levels(2, Attribute)
                .container(Container::List)
                .keeps_lines(),
        );
        r.register(
            TagRule::line("iot", "title")
                .element("title", &[("type", "x-introduction-outline")]),
        );
        r.register(
            TagRule::paragraph("io")
                .element("item", &[("subType", "x-introduction-outline")])
                .levels(4, Attribute)
                .container(Container::List)
                .keeps_lines(),
        );
        r.register(TagRule::inline("ior").element("reference", &[]));
        r.register(TagRule::inline("iqt").element("q", &[("subType", "x-introduction")]));
        r.register(TagRule::new("ie", SelfClosing));

        // ====================================================================
        // Titles, headings and labels
        // ====================================================================

        r.register(
            TagRule::line("mt", "title")
                .element("title", &[("type", "main")])
                .levels(4, Attribute),
        );
        r.register(
            TagRule::line("mte", "title")
                .element("title", &[("type", "main"), ("subType", "x-end")])
                .levels(4, Attribute),
        );
        r.register(
            TagRule::new("ms", ScopeClass::Structural)
                .element("div", &[("type", "majorSection")])
                .rank(RANK_MAJOR_SECTION)
                .levels(3, Hidden)
                .action(Action::Heading {
                    deeper: "majorSection",
                }),
        );
        r.register(
            TagRule::new("s", ScopeClass::Structural)
                .element("div", &[("type", "section")])
                .rank(RANK_SECTION)
                .levels(4, Hidden)
                .action(Action::Heading {
                    deeper: "subSection",
                }),
        );
        r.register(TagRule::line("mr", "title").element("title", &[("type", "scope")]));
        r.register(TagRule::line("sr", "title").element("title", &[("type", "scope")]));
        r.register(TagRule::line("r", "title").element("title", &[("type", "parallel")]));
        r.register(
            TagRule::line("d", "title")
                .element("title", &[("type", "psalm"), ("canonical", "true")]),
        );
        r.register(TagRule::line("sp", "speaker"));
        r.register(TagRule::line("cl", "title").element("title", &[("type", "chapterLabel")]));
        r.register(TagRule::line("qa", "title").element("title", &[("type", "acrostic")]));
        r.register(TagRule::inline("rq").element("reference", &[("type", "source")]));

        // ====================================================================
        // Chapters and verses
        // ====================================================================

        r.register(
            TagRule::new("c", Milestone)
                .element("chapter", &[])
                .argument(Word)
                .action(Action::Chapter),
        );
        r.register(
            TagRule::new("v", Milestone)
                .element("verse", &[])
                .argument(Word)
                .action(Action::Verse),
        );
        r.register(
            TagRule::new("cp", Milestone)
                .element("milestone", &[])
                .argument(Line)
                .action(Action::LineMilestone),
        );
        r.register(TagRule::paragraph("cd").element("p", &[("type", "x-chapter-description")]));
        r.register(TagRule::inline("ca").element("seg", &[("type", "x-alternate-chapter")]));
        r.register(TagRule::inline("va").element("seg", &[("type", "x-alternate-verse")]));
        r.register(TagRule::inline("vp").element("seg", &[("type", "x-published-verse")]));

        // ====================================================================
        // Paragraphs
        // ====================================================================

        let paragraphs: &[(&str, Attrs)] = &[
            ("p", &[]),
            ("m", &[("type", "x-noindent")]),
            ("pmo", &[("type", "x-embedded-opening")]),
            ("pm", &[("type", "x-embedded")]),
            ("pmc", &[("type", "x-embedded-closing")]),
            ("pmr", &[("type", "x-embedded-refrain")]),
            ("mi", &[("type", "x-noindent-indented")]),
            ("nb", &[("type", "x-nobreak")]),
            ("pc", &[("type", "x-center")]),
            ("pr", &[("type", "x-right")]),
            ("lit", &[("type", "x-liturgical")]),
        ];
        for &(name, attrs) in paragraphs {
            r.register(TagRule::paragraph(name).element("p", attrs));
        }
        r.register(
            TagRule::paragraph("pi")
                .element("p", &[("type", "x-indented")])
                .levels(3, TypeSuffix),
        );
        r.register(
            TagRule::paragraph("ph")
                .element("p", &[("type", "x-hanging")])
                .levels(3, TypeSuffix),
        );
        r.register(TagRule::paragraph("cls").element("closer", &[]));
        r.register(
            TagRule::paragraph("li")
                .element("item", &[])
                .levels(4, Attribute)
                .container(Container::List)
                .keeps_lines(),
        );
        r.register(
            TagRule::new("b", SelfClosing)
                .element("lb", &[("type", "x-p")])
                .rank(RANK_PARAGRAPH),
        );

        // ====================================================================
        // Poetry
        // ====================================================================

        r.register(
            TagRule::paragraph("q")
                .element("l", &[])
                .levels(4, Attribute)
                .container(Container::LineGroup)
                .keeps_lines(),
        );
        r.register(
            TagRule::paragraph("qm")
                .element("l", &[("type", "x-embedded")])
                .levels(3, Attribute)
                .container(Container::LineGroup)
                .keeps_lines(),
        );
        let aligned: &[(&str, Attrs)] = &[("qr", &[("type", "x-right")]), ("qc", &[("type", "x-center")])];
        for &(name, attrs) in aligned {
            r.register(
                TagRule::paragraph(name)
                    .element("l", attrs)
                    .container(Container::LineGroup)
                    .keeps_lines(),
            );
        }
        r.register(TagRule::inline("qs").element("l", &[("type", "selah")]));
        r.register(TagRule::inline("qac").element("hi", &[("type", "acrostic")]));

        // ====================================================================
        // Tables
        // ====================================================================

        r.register(
            TagRule::paragraph("tr")
                .element("row", &[])
                .container(Container::Table),
        );
        let cells: &[(&str, Attrs)] = &[
            ("th", &[("role", "label")]),
            ("thr", &[("role", "label"), ("align", "end")]),
            ("tc", &[]),
            ("tcr", &[("align", "end")]),
        ];
        for &(name, attrs) in cells {
            r.register(
                TagRule::new(name, NumberedFamily)
                    .element("cell", attrs)
                    .rank(RANK_CELL)
                    .family(Family::Cell)
                    .levels(5, Hidden),
            );
        }

        // ====================================================================
        // Footnotes and cross references
        // ====================================================================

        let notes: &[(&str, NoteKind, Attrs)] = &[
            ("f", NoteKind::Footnote, &[("placement", "foot")]),
            ("fe", NoteKind::Endnote, &[("placement", "end")]),
            ("x", NoteKind::CrossReference, &[("type", "crossReference")]),
        ];
        for &(name, kind, attrs) in notes {
            r.register(
                TagRule::new(name, ScopeClass::Inline)
                    .element("note", attrs)
                    .attributes(NOTE_ATTRIBUTES, "caller")
                    .argument(Word)
                    .action(Action::Note(kind)),
            );
        }

        r.register(
            TagRule::note_text("fr")
                .element("reference", &[("type", "annotateRef")])
                .action(Action::AnnotateRef),
        );
        r.register(
            TagRule::note_text("xo")
                .element("reference", &[("type", "annotateRef")])
                .action(Action::AnnotateRef),
        );
        r.register(TagRule::note_text("ft"));
        for name in ["fk", "xk"] {
            r.register(TagRule::note_text(name).element("catchWord", &[]));
        }
        for name in ["fq", "xq"] {
            r.register(TagRule::note_text(name).element("q", &[]));
        }
        r.register(TagRule::note_text("fqa").element("rdg", &[("type", "alternative")]));
        r.register(TagRule::note_text("fl").element("label", &[]));
        r.register(TagRule::note_text("fp").element("p", &[]));
        r.register(TagRule::note_text("fv").element("hi", &[("type", "super")]));
        r.register(TagRule::note_text("fm").element("hi", &[("type", "super")]));
        r.register(
            TagRule::note_text("xt")
                .element("reference", &[])
                .action(Action::XrefTarget),
        );
        let editions: &[(&str, Attrs)] = &[
            ("fdc", &[("editions", "dc")]),
            ("xdc", &[("editions", "dc")]),
            ("xot", &[("editions", "ot")]),
            ("xnt", &[("editions", "nt")]),
        ];
        for &(name, attrs) in editions {
            r.register(TagRule::note_text(name).element("seg", attrs));
        }

        // ====================================================================
        // Special text and character styles
        // ====================================================================

        let styles: &[(&str, &str, Attrs)] = &[
            ("add", "transChange", &[("type", "added")]),
            ("bk", "reference", &[("type", "x-bookName")]),
            ("dc", "transChange", &[("type", "added"), ("editions", "dc")]),
            ("k", "seg", &[("type", "keyword")]),
            ("nd", "divineName", &[]),
            ("ord", "hi", &[("type", "super")]),
            ("pn", "name", &[]),
            ("qt", "seg", &[("type", "otPassage")]),
            ("sig", "signed", &[]),
            ("sls", "foreign", &[("type", "x-secondaryLanguage")]),
            ("tl", "foreign", &[]),
            ("wj", "q", &[("who", "Jesus"), ("marker", "")]),
            ("em", "hi", &[("type", "emphasis")]),
            ("bd", "hi", &[("type", "bold")]),
            ("it", "hi", &[("type", "italic")]),
            ("bdit", "hi", &[("type", "x-bold-italic")]),
            ("no", "hi", &[("type", "normal")]),
            ("sc", "hi", &[("type", "small-caps")]),
            ("pro", "seg", &[("type", "x-pronunciation")]),
            ("ndx", "seg", &[("type", "x-index")]),
        ];
        for &(name, element, attrs) in styles {
            r.register(TagRule::inline(name).element(element, attrs));
        }

        let words: &[(&str, Attrs)] = &[
            ("w", &[]),
            ("wg", &[("xml:lang", "grc")]),
            ("wh", &[("xml:lang", "hbo")]),
        ];
        for &(name, attrs) in words {
            r.register(
                TagRule::inline(name)
                    .element("w", attrs)
                    .attributes(WORD_ATTRIBUTES, "lemma")
                    .action(Action::Word),
            );
        }
        r.register(
            TagRule::inline("fig")
                .element("figure", &[])
                .attributes(FIGURE_ATTRIBUTES, "src")
                .action(Action::Figure),
        );

        // ====================================================================
        // Breaks
        // ====================================================================

        r.register(TagRule::new("pb", SelfClosing).element("milestone", &[("type", "pb")]));

        r
    }
}
