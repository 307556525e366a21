mod common;

use common::*;
use doctrans_core::{count_tokens, FailurePolicy, SegmentStatus, SkipRule};
use doctrans_engine::{document_outline, extract_segments, DocumentTranslator, TranslateOptions};

fn deck() -> Vec<u8> {
    pptx(&[
        format!(
            "{}{}{}",
            sp("Welcome"),
            pic(),
            group(&[sp("Grouped"), group(&[sp("Deep inside")])])
        ),
        format!("{}{}", table(&[&["A1", "A2", "A3"], &["B1", "B2", "B3"]]), sp("Thanks")),
    ])
}

#[test]
fn test_structure_is_isomorphic() {
    let input = deck();
    let mut translator = DocumentTranslator::new(Recorder::new(upper), TranslateOptions::default());
    let output = translator.translate_document(&input, "pptx", "German").unwrap();

    assert_eq!(
        document_outline(&input, "pptx").unwrap(),
        document_outline(&output, "pptx").unwrap()
    );
    assert_eq!(
        document_outline(&output, "pptx").unwrap(),
        vec![
            "text(1), other, group[text(1), group[text(1)]]",
            "table(2x3), text(1)"
        ]
    );
    let input_names: Vec<String> = parts(&input).into_iter().map(|(n, _)| n).collect();
    let output_names: Vec<String> = parts(&output).into_iter().map(|(n, _)| n).collect();
    assert_eq!(input_names, output_names);
}

#[test]
fn test_nested_group_is_translated() {
    let input = deck();
    let mut translator = DocumentTranslator::new(Recorder::new(upper), TranslateOptions::default());
    let output = translator.translate_document(&input, "pptx", "German").unwrap();

    let segments = extract_segments(&output, "pptx", false).unwrap();
    let deep = segments
        .iter()
        .find(|s| s.location == "pptx:slide:0:shape:2.1.0")
        .unwrap();
    assert_eq!(deep.text, "DEEP INSIDE");
}

#[test]
fn test_table_cells_row_major_once_each() {
    let input = pptx(&[table(&[&["A1", "A2", "A3"], &["B1", "B2", "B3"]])]);
    let mut translator = DocumentTranslator::new(
        Recorder::new(|t| Ok(format!("{}'", t.to_lowercase()))),
        TranslateOptions::default(),
    );
    let output = translator.translate_document(&input, "pptx", "German").unwrap();

    assert_eq!(
        translator.translator_mut().calls,
        vec!["A1", "A2", "A3", "B1", "B2", "B3"]
    );
    assert_eq!(
        texts(&output, "pptx"),
        vec!["a1'", "a2'", "a3'", "b1'", "b2'", "b3'"]
    );
    let segments = extract_segments(&output, "pptx", false).unwrap();
    assert_eq!(segments[5].location, "pptx:slide:0:shape:0:cell:1:2");
}

#[test]
fn test_fail_open_keeps_every_part() {
    let input = deck();
    let mut translator =
        DocumentTranslator::new(Recorder::new(offline), TranslateOptions::default());
    let out = translator
        .translate_document_with_report(&input, "pptx", "German")
        .unwrap();

    assert_eq!(out.bytes, input);
    assert_eq!(out.report.failed_count(), 10);
    assert_eq!(out.report.translated_count(), 0);
    assert_eq!(out.report.tokens, 0);
    assert!(out
        .report
        .segments
        .iter()
        .all(|s| s.status == SegmentStatus::Failed && s.output.is_none()));
}

#[test]
fn test_failed_units_can_be_marked() {
    let input = pptx(&[sp("Hello")]);
    let options = TranslateOptions {
        failure_policy: FailurePolicy::Mark("[untranslated] ".to_string()),
        ..Default::default()
    };
    let mut translator = DocumentTranslator::new(Recorder::new(offline), options);
    let output = translator.translate_document(&input, "pptx", "German").unwrap();
    assert_eq!(texts(&output, "pptx"), vec!["[untranslated] Hello"]);
}

#[test]
fn test_order_is_deterministic() {
    let input = deck();
    let run = || {
        let mut translator =
            DocumentTranslator::new(Recorder::new(append_marker), TranslateOptions::default());
        let output = translator.translate_document(&input, "pptx", "German").unwrap();
        (output, translator.translator_mut().calls.clone())
    };

    let (first, first_calls) = run();
    let (second, second_calls) = run();
    assert_eq!(first, second);
    assert_eq!(first_calls, second_calls);
    assert_eq!(
        first_calls,
        vec![
            "Welcome",
            "Grouped",
            "Deep inside",
            "A1",
            "A2",
            "A3",
            "B1",
            "B2",
            "B3",
            "Thanks"
        ]
    );
    assert!(texts(&first, "pptx").iter().all(|t| t.ends_with("_X")));
}

#[test]
fn test_blank_and_symbol_units_untouched() {
    let input = pptx(&[format!("{}{}{}", sp("   "), sp("©"), sp("Body"))]);
    let mut translator = DocumentTranslator::new(Recorder::new(upper), TranslateOptions::default());
    let out = translator
        .translate_document_with_report(&input, "pptx", "German")
        .unwrap();

    assert_eq!(translator.translator_mut().calls, vec!["Body"]);
    assert_eq!(out.report.empty_units, 1);
    assert_eq!(out.report.skipped_count(), 1);
    assert_eq!(texts(&out.bytes, "pptx"), vec!["©", "BODY"]);

    let segments = extract_segments(&out.bytes, "pptx", false).unwrap();
    assert_eq!(segments[0].location, "pptx:slide:0:shape:1");
}

#[test]
fn test_only_blank_units_leave_parts_identical() {
    let input = pptx(&[format!("{}{}", sp(""), sp("  "))]);
    let options = TranslateOptions {
        skip_rule: SkipRule::empty_only(),
        ..Default::default()
    };
    let mut translator = DocumentTranslator::new(Recorder::new(upper), options);
    let output = translator.translate_document(&input, "pptx", "German").unwrap();
    assert!(translator.translator_mut().calls.is_empty());
    assert_eq!(output, input);
}

#[test]
fn test_notes_translated_on_request() {
    let input = pptx_with_notes(&[sp("Slide text")], &[Some(sp("Remember this"))]);

    let mut plain = DocumentTranslator::new(Recorder::new(upper), TranslateOptions::default());
    plain.translate_document(&input, "pptx", "German").unwrap();
    assert_eq!(plain.translator_mut().calls, vec!["Slide text"]);

    let options = TranslateOptions {
        include_notes: true,
        ..Default::default()
    };
    let mut with_notes = DocumentTranslator::new(Recorder::new(upper), options);
    let output = with_notes.translate_document(&input, "pptx", "German").unwrap();
    assert_eq!(texts(&output, "pptx"), vec!["SLIDE TEXT", "REMEMBER THIS"]);
}

#[test]
fn test_font_size_and_autofit_applied() {
    let input = pptx(&[sp("Resize me")]);
    let options = TranslateOptions {
        font_size: Some(12.0),
        autofit: true,
        ..Default::default()
    };
    let mut translator = DocumentTranslator::new(Recorder::new(upper), options);
    let output = translator.translate_document(&input, "pptx", "German").unwrap();

    let slide = parts(&output)
        .into_iter()
        .find(|(name, _)| name == "ppt/slides/slide1.xml")
        .map(|(_, data)| String::from_utf8(data).unwrap())
        .unwrap();
    assert!(slide.contains(r#"sz="1200""#));
    assert!(slide.contains("<a:normAutofit/>"));
    assert!(slide.contains(r#"<a:pPr algn="l"/>"#));
}

#[test]
fn test_progress_counts_translatable_units() {
    let input = pptx(&[format!("{}{}{}", sp("One"), sp(" "), sp("Two"))]);
    let mut translator = DocumentTranslator::new(Recorder::new(upper), TranslateOptions::default());
    let mut ticks = Vec::new();
    translator
        .translate_with_progress(
            &input,
            "pptx",
            "German",
            Box::new(|done: usize, total: usize| ticks.push((done, total))),
        )
        .unwrap();
    assert_eq!(ticks, vec![(1, 2), (2, 2)]);
}

#[test]
fn test_report_counts_output_tokens() {
    let input = pptx(&[format!("{}{}", sp("Good morning"), sp("See you tomorrow"))]);
    let mut translator = DocumentTranslator::new(Recorder::new(upper), TranslateOptions::default());
    let out = translator
        .translate_document_with_report(&input, "pptx", "German")
        .unwrap();

    let expected = count_tokens("GOOD MORNING") + count_tokens("SEE YOU TOMORROW");
    assert!(expected > 0);
    assert_eq!(out.report.tokens, expected);
}
