use proptest::prelude::*;

use super::*;
use crate::osis::{Element, OsisEvent, is_well_nested};
use crate::usfm::MAX_BRIDGE_VERSES;

fn run(text: &str, config: ConvertConfig) -> (Conversion, UnhandledTags) {
    let unhandled = UnhandledTags::new();
    let conversion =
        Converter::with_config(config).convert(text, "Gen", &BookNames::new(), &unhandled);
    (conversion, unhandled)
}

fn strict(text: &str) -> (Conversion, UnhandledTags) {
    run(text, ConvertConfig::default())
}

fn xml(text: &str) -> String {
    strict(text).0.to_xml().unwrap()
}

/// Compact rendering of an event stream: `+p`, `-p`, `=verse`, `'text'`.
fn shape(events: &[OsisEvent]) -> Vec<String> {
    events
        .iter()
        .map(|e| match e {
            OsisEvent::Start(el) => format!("+{}", el.name),
            OsisEvent::End(name) => format!("-{name}"),
            OsisEvent::Empty(el) => format!("={}", el.name),
            OsisEvent::Text(t) => format!("'{t}'"),
            OsisEvent::Comment(c) => format!("#{c}"),
        })
        .collect()
}

fn kinds(conversion: &Conversion) -> Vec<ViolationKind> {
    conversion.violations.iter().map(|v| v.kind).collect()
}

#[test]
fn test_book_division() {
    let (conversion, _) = strict("\\id GEN Genesis\n");
    assert_eq!(
        conversion.events.first(),
        Some(&OsisEvent::Start(
            Element::new("div")
                .with("type", "book")
                .with("osisID", "Gen")
                .with("canonical", "true")
        ))
    );
    assert_eq!(conversion.events.last(), Some(&OsisEvent::End("div")));
    assert_eq!(conversion.events.len(), 2);
}

#[test]
fn test_front_matter_is_not_canonical() {
    let unhandled = UnhandledTags::new();
    let conversion =
        Converter::new().convert("\\id FRT\n\\p Preface", "FRONT", &BookNames::new(), &unhandled);
    let xml = conversion.to_xml().unwrap();
    assert!(xml.starts_with(r#"<div type="book" osisID="FRONT" canonical="false">"#));
}

#[test]
fn test_paragraph_poetry_paragraph_are_siblings() {
    let (conversion, _) = strict("\\c 1\n\\p\n\\v 1 a\n\\q1 b\n\\p\n c");
    assert_eq!(
        shape(&conversion.events),
        vec![
            "+div", "=chapter", "+p", "=verse", "'a'", "-p", "+lg", "+l", "'b'", "-l", "-lg",
            "+p", "'c'", "=verse", "=chapter", "-p", "-div",
        ]
    );
}

#[test]
fn test_reference_synthesis() {
    let out = xml("\\c 3\n\\p\n\\v 5 text");
    assert!(out.contains(r#"<chapter sID="Gen.3" osisID="Gen.3" n="3"/>"#));
    assert!(out.contains(r#"<verse sID="Gen.3.5" osisID="Gen.3.5" n="5"/>text"#));
    assert!(out.contains(r#"<verse eID="Gen.3.5"/><chapter eID="Gen.3"/>"#));
}

#[test]
fn test_verse_range_synthesis() {
    let out = xml("\\c 3\n\\p\n\\v 5-6 text");
    assert!(out.contains(r#"<verse sID="Gen.3.5 Gen.3.6" osisID="Gen.3.5 Gen.3.6" n="5-6"/>"#));
}

#[test]
fn test_chapter_ends_previous_chapter() {
    let out = xml("\\c 1\n\\p\n\\v 1 a\n\\c 2\n\\p\n\\v 1 b");
    assert!(out.contains(
        "a</p>\n<verse eID=\"Gen.1.1\"/><chapter eID=\"Gen.1\"/>\n<chapter sID=\"Gen.2\" osisID=\"Gen.2\" n=\"2\"/>\n"
    ));
    assert!(out.contains(r#"<verse sID="Gen.2.1" osisID="Gen.2.1" n="1"/>b"#));
}

#[test]
fn test_verse_before_chapter_starts_chapter_one() {
    let out = xml("\\p\n\\v 1 a");
    assert!(out.contains(r#"<chapter sID="Gen.1" osisID="Gen.1" n="1"/>"#));
    assert!(out.contains(r#"<verse sID="Gen.1.1""#));
}

#[test]
fn test_consecutive_verses_keep_separating_space() {
    let out = xml("\\c 1\n\\p\n\\v 1 one.\n\\v 2 two.");
    assert!(out.contains(r#"one. <verse eID="Gen.1.1"/><verse sID="Gen.1.2" osisID="Gen.1.2" n="2"/>two."#));
}

#[test]
fn test_unknown_marker_tolerance() {
    let (conversion, unhandled) = strict("\\c 1\n\\p\n\\v 1 \\zzz sometext \\zzz again");
    let out = conversion.to_xml().unwrap();
    assert!(out.contains("sometext again"));
    assert_eq!(unhandled.snapshot(), vec!["\\zzz"]);
    assert_eq!(
        kinds(&conversion),
        vec![ViolationKind::UnknownMarker, ViolationKind::UnknownMarker]
    );
}

#[test]
fn test_unknown_marker_relaxed() {
    let (conversion, unhandled) = run("\\p \\zzz sometext", ConvertConfig::relaxed());
    assert!(conversion.to_xml().unwrap().contains("sometext"));
    assert_eq!(unhandled.len(), 1);
    assert!(!conversion.has_violations());
}

#[test]
fn test_unmatched_close_marker() {
    let (conversion, _) = strict("\\c 1\n\\p\n\\v 1 text \\q1* more");
    assert_eq!(kinds(&conversion), vec![ViolationKind::UnmatchedCloseMarker]);
    assert_eq!(conversion.violations[0].marker, "\\q1*");
    assert_eq!(conversion.violations[0].line, 3);
    assert!(!conversion.events.contains(&OsisEvent::End("l")));
    assert!(conversion.to_xml().unwrap().contains("text more"));
}

#[test]
fn test_forced_close_at_end_of_input() {
    let (conversion, _) = strict("\\p text \\add a \\nd b");
    let events = &conversion.events;
    assert_eq!(
        events[events.len() - 4..].to_vec(),
        vec![
            OsisEvent::End("divineName"),
            OsisEvent::End("transChange"),
            OsisEvent::End("p"),
            OsisEvent::End("div"),
        ]
    );
}

#[test]
fn test_conversion_is_deterministic() {
    let text = "\\c 1\n\\s1 Head\n\\p\n\\v 1 a \\f + \\ft b\\f* \\wj c\n\\q1 d";
    assert_eq!(xml(text), xml(text));
}

#[test]
fn test_footnote_nesting() {
    let (conversion, _) = strict("\\c 3\n\\p\n\\v 5 text\\f + \\fr 3:5 \\ft note text\\f* after");
    let out = conversion.to_xml().unwrap();
    assert!(out.contains(concat!(
        r#"text<note placement="foot" n="+" osisRef="Gen.3.5">"#,
        r#"<reference type="annotateRef" osisRef="Gen.3.5">3:5</reference> note text</note> after"#
    )));
    assert!(is_well_nested(&conversion.events));
    assert!(!conversion.has_violations());
}

#[test]
fn test_cross_reference_without_caller() {
    let out = xml("\\c 1\n\\p\n\\v 1 a\\x - \\xo 1:1 \\xt Exod 2:3\\x* b");
    assert!(out.contains(r#"<note type="crossReference" osisRef="Gen.1.1">"#));
    assert!(out.contains(r#"<reference osisRef="Exod.2.3">Exod 2:3</reference></note> b"#));
}

#[test]
fn test_cross_reference_localized_book() {
    let mut names = BookNames::new();
    names.insert("Exod", "Ex");
    let unhandled = UnhandledTags::new();
    let conversion = Converter::new().convert(
        "\\c 1\n\\p\n\\v 1 a\\x + \\xt Ex 2:3-5\\x*",
        "Gen",
        &names,
        &unhandled,
    );
    let out = conversion.to_xml().unwrap();
    assert!(out.contains(r#"<reference osisRef="Exod.2.3-Exod.2.5">Ex 2:3-5</reference>"#));
}

#[test]
fn test_unresolved_cross_reference_has_no_target() {
    let out = xml("\\c 1\n\\p\n\\v 1 a\\x + \\xt Somewhere 2:3\\x*");
    assert!(out.contains("<reference>Somewhere 2:3</reference>"));
}

#[test]
fn test_unterminated_note() {
    let (conversion, _) = strict("\\c 1\n\\p\n\\v 1 a\\f + \\ft note\n\\v 2 b");
    assert_eq!(kinds(&conversion), vec![ViolationKind::UnterminatedNote]);
    let out = conversion.to_xml().unwrap();
    assert!(out.contains("<note placement=\"foot\" n=\"+\" osisRef=\"Gen.1.1\">note</note>"));
    assert!(out.contains(r#"<verse sID="Gen.1.2" osisID="Gen.1.2" n="2"/>b"#));
    assert!(is_well_nested(&conversion.events));
}

#[test]
fn test_note_depth_limit() {
    let config = ConvertConfig {
        note_depth: 0,
        ..ConvertConfig::default()
    };
    let (conversion, _) = run("\\p a\\f + \\ft b\\f* c", config);
    assert_eq!(kinds(&conversion), vec![ViolationKind::NoteDepthExceeded]);
    assert!(!conversion.to_xml().unwrap().contains("<note"));
}

#[test]
fn test_word_attributes() {
    let out = xml("\\p \\w gracious|lemma=\"grace\" strong=\"H2603\"\\w* Lord");
    assert!(out.contains(r#"<w lemma="grace strong:H2603">gracious</w> Lord"#));
}

#[test]
fn test_word_default_attribute_and_morphology() {
    let out = xml("\\p \\w logos|x-morph=\"N-NSM\" strong=\"G3056\"\\w*");
    assert!(out.contains(r#"<w morph="N-NSM" lemma="strong:G3056">logos</w>"#));
    let out = xml("\\p \\w grace|H2603\\w*");
    assert!(out.contains(r#"<w lemma="H2603">grace</w>"#));
}

#[test]
fn test_malformed_word_attributes_degrade_to_text() {
    let (conversion, _) = strict("\\p \\w word|strong=\"H1\\w*");
    assert_eq!(kinds(&conversion), vec![ViolationKind::MalformedAttributeSyntax]);
    assert!(conversion
        .events
        .contains(&OsisEvent::Text("word|strong=\"H1".to_string())));
}

#[test]
fn test_strict_refuses_out_of_range_level() {
    let (conversion, unhandled) = strict("\\q5 text");
    assert_eq!(kinds(&conversion), vec![ViolationKind::RefusedMarker]);
    assert_eq!(unhandled.snapshot(), vec!["\\q5"]);
    assert!(!conversion.to_xml().unwrap().contains("<l"));
}

#[test]
fn test_relaxed_accepts_out_of_range_level() {
    let (conversion, unhandled) = run("\\q5 text", ConvertConfig::relaxed());
    assert!(unhandled.is_empty());
    assert!(conversion.to_xml().unwrap().contains(r#"<l level="5">text</l>"#));
}

#[test]
fn test_unnumbered_marker_is_level_one() {
    let out = xml("\\q a\n\\q1 b");
    assert!(out.contains(r#"<l level="1">a</l>"#));
    assert!(out.contains(r#"<l level="1">b</l>"#));
}

#[test]
fn test_poetry_line_breaks() {
    let out = xml("\\q1 one\ntwo\n\\q2 three");
    assert!(out.contains("<lg>\n<l level=\"1\">one<lb/>two</l>\n<l level=\"2\">three</l>\n</lg>\n"));
}

#[test]
fn test_prose_line_breaks_collapse() {
    let out = xml("\\p one\ntwo   three\n");
    assert!(out.contains("<p>one two three</p>"));
}

#[test]
fn test_no_break_space() {
    assert!(xml("\\p a~b").contains("a\u{a0}b"));
}

#[test]
fn test_section_heading() {
    let out = xml("\\c 1\n\\s1 The Title\n\\p\n\\v 1 text\n\\s2 Sub\n\\p more");
    assert!(out.contains("<div type=\"section\">\n<title>The Title</title>\n<p>"));
    assert!(out.contains("<div type=\"subSection\">\n<title>Sub</title>\n<p>more</p>"));
}

#[test]
fn test_heading_ends_verse() {
    let out = xml("\\c 1\n\\p\n\\v 1 a\n\\s1 Head\n\\p\n\\v 2 b");
    assert!(out.contains("a</p>\n<verse eID=\"Gen.1.1\"/><div type=\"section\">"));
}

#[test]
fn test_line_scoped_title() {
    let out = xml("\\mt1 Main Title\n\\p text");
    assert!(out.contains("<title type=\"main\" level=\"1\">Main Title</title>\n<p>text</p>"));
}

#[test]
fn test_table() {
    let out = xml("\\tr \\th1 A \\th2 B\n\\tr \\tc1 1 \\tc2 2");
    assert!(out.contains(concat!(
        "<table>\n<row>\n<cell role=\"label\">A</cell><cell role=\"label\">B</cell></row>\n",
        "<row>\n<cell>1</cell><cell>2</cell></row>\n</table>\n"
    )));
}

#[test]
fn test_list_container() {
    let out = xml("\\li1 one\n\\li2 two\n\\p after");
    assert!(out.contains(
        "<list>\n<item level=\"1\">one</item>\n<item level=\"2\">two</item>\n</list>\n<p>after</p>"
    ));
}

#[test]
fn test_indented_paragraph_type_suffix() {
    assert!(xml("\\pi2 text").contains(r#"<p type="x-indented-2">text</p>"#));
    assert!(xml("\\pi text").contains(r#"<p type="x-indented">text</p>"#));
}

#[test]
fn test_character_style_closed_by_verse() {
    let out = xml("\\c 1\n\\p\n\\v 1 \\wj Follow me \\v 2 next");
    assert!(out.contains(r#"<q who="Jesus" marker="">Follow me</q> <verse eID="Gen.1.1"/>"#));
}

#[test]
fn test_nested_character_style() {
    let out = xml("\\p \\add the \\+nd Lord\\+nd*\\add* said");
    assert!(out.contains(r#"<transChange type="added">the <divineName>Lord</divineName></transChange> said"#));
}

#[test]
fn test_figure_usfm2() {
    let out = xml("\\p \\fig A map|map.png|col|||The land|1.4\\fig*");
    assert!(out.contains(concat!(
        r#"<figure src="map.png" size="col" alt="A map"><caption>The land"#,
        r#"<reference type="annotateRef">1.4</reference></caption></figure>"#
    )));
}

#[test]
fn test_comment_and_milestones() {
    let out = xml("\\toc1 The Book of Genesis\n\\rem a -- b\n\\p x");
    assert!(out.contains(r#"<milestone type="x-usfm-toc1" n="The Book of Genesis"/>"#));
    assert!(out.contains("<!-- rem: a - - b -->"));
}

#[test]
fn test_invalid_verse_number() {
    let (conversion, _) = strict("\\c 1\n\\p\n\\v x text");
    assert_eq!(kinds(&conversion), vec![ViolationKind::InvalidNumber]);
    assert!(conversion.to_xml().unwrap().contains("x text"));
}

#[test]
fn test_overwide_verse_bridge_is_refused() {
    let (conversion, _) = strict("\\c 1\n\\p\n\\v 1-4000000000 text");
    assert_eq!(kinds(&conversion), vec![ViolationKind::InvalidNumber]);
    assert_eq!(conversion.violations[0].marker, "\\v 1-4000000000");
    let out = conversion.to_xml().unwrap();
    assert!(out.contains("1-4000000000 text"));
    assert!(!out.contains("<verse"));
}

#[test]
fn test_widest_verse_bridge() {
    let arg = format!("1-{MAX_BRIDGE_VERSES}");
    let (conversion, _) = strict(&format!("\\c 1\n\\p\n\\v {arg} text"));
    assert!(!conversion.has_violations());
    let out = conversion.to_xml().unwrap();
    let last = format!("Gen.1.{MAX_BRIDGE_VERSES}\"");
    assert!(out.contains("osisID=\"Gen.1.1 Gen.1.2 "));
    assert!(out.contains(&last));
    assert!(out.contains(&format!("n=\"{arg}\"/>text")));
}

#[test]
fn test_unknown_closing_marker_counts_once() {
    let (conversion, unhandled) = strict("\\p \\zzz sometext \\zzz* more");
    assert_eq!(unhandled.snapshot(), vec!["\\zzz"]);
    assert_eq!(
        conversion.violations.iter().map(|v| v.marker.as_str()).collect::<Vec<_>>(),
        vec!["\\zzz", "\\zzz*"]
    );
}

#[test]
fn test_violation_line_numbers() {
    let text = "\\c 1\n\\p\n\\v 1 a \\zzz b\n\\v 2 c\\f + \\ft n \\yyy x\\f*\n\\v 3 d \\add* e\n";
    let (conversion, _) = strict(text);
    let lines: Vec<_> = conversion
        .violations
        .iter()
        .map(|v| (v.marker.as_str(), v.line))
        .collect();
    assert_eq!(lines, vec![("\\zzz", 3), ("\\yyy", 4), ("\\add*", 5)]);
}

#[test]
fn test_blank_line_marker() {
    let out = xml("\\q1 a\n\\b\n\\q1 b");
    assert!(out.contains("<l level=\"1\">a</l>\n</lg>\n<lb type=\"x-p\"/><lg>"));
}

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "\\p ", "\\q1 ", "\\q2 ", "\\q1* ", "\\s1 ", "\\ms ", "\\mt1 ", "\\c 1\n", "\\c 2 ",
        "\\v 1 ", "\\v 2-3 ", "\\v 1-4000000000 ", "\\f + ", "\\f*", "\\x - ", "\\x*",
        "\\fr 1:1 ", "\\ft ", "\\xt ", "\\add ", "\\add*", "\\nd ", "\\+nd ", "\\nd*", "\\w ",
        "\\w*", "\\wj ", "\\zzz ", "\\li ", "\\tr ", "\\tc1 ", "\\th2 ", "\\b ", "\\fig ",
        "\\fig*", "\\toc1 ", "\\rem ", "word ", "a|strong=\"H1\" ", "a|b=\"", "\n", "x~y ",
        "Gen 1:1", "\\", " \\ ",
    ])
}

proptest! {
    #[test]
    fn prop_output_is_well_nested(parts in prop::collection::vec(fragment(), 0..60)) {
        let text: String = parts.concat();
        let (conversion, _) = strict(&text);
        prop_assert!(is_well_nested(&conversion.events));
        prop_assert!(conversion.events.first().is_some_and(|e| e.is_start_of("div")));
        prop_assert_eq!(conversion.events.last(), Some(&OsisEvent::End("div")));
        prop_assert!(conversion.to_xml().is_ok());
    }

    #[test]
    fn prop_conversion_is_deterministic(parts in prop::collection::vec(fragment(), 0..40)) {
        let text: String = parts.concat();
        let (first, _) = strict(&text);
        let (second, _) = strict(&text);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_arbitrary_text_never_panics(text in "[a-z0-9 \\\\*+|~\n]{0,200}") {
        let (relaxed, _) = run(&text, ConvertConfig::relaxed());
        prop_assert!(is_well_nested(&relaxed.events));
    }
}
