use recall_core::{
    check_blank, grade_answer, hints, is_equivalent, levenshtein, process, CoreError, ItemKind,
    ReviewItem, Verdict, PLACEHOLDER_MAX_LEN,
};

#[test]
fn identical_answers_match() {
    for x in ["a", "cat", "photosynthesis", "the quick brown fox", "  Paris "] {
        assert!(is_equivalent(x, x), "{x}");
    }
}

#[test]
fn normalization_ignores_case_and_padding() {
    assert!(is_equivalent("Paris", "  paris\n"));
    assert!(is_equivalent("ÉCOLE", "école"));
}

#[test]
fn short_answers_need_exact_match() {
    assert!(!is_equivalent("cat", "dog"));
    assert!(!is_equivalent("cat", "hat"));
    assert!(!is_equivalent("ox", "o"));
}

#[test]
fn typos_tolerated_on_longer_answers() {
    assert!(is_equivalent("elephant", "elefant"));
    assert!(is_equivalent("necessary", "neccesary"));
    assert!(!is_equivalent("elephant", "elegance"));
    // four chars is long enough
    assert!(is_equivalent("bird", "bard"));
}

#[test]
fn word_by_word_overlap() {
    // 4 of 5 words within one edit
    assert!(is_equivalent(
        "the mitochondria is the powerhouse",
        "teh mitochondria iss the powerhous"
    ));
    assert!(is_equivalent(
        "one two three four five",
        "one twu three four zzzzz"
    ));
    assert!(!is_equivalent(
        "one two three four five",
        "one twu thrxx four zzzzz"
    ));
    assert!(!is_equivalent("red green blue", "red green"));
}

#[test]
fn levenshtein_basics() {
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("flaw", "lawn"), 2);
    assert_eq!(levenshtein("same", "same"), 0);
}

#[test]
fn cloze_single_blank_with_hint() {
    let r = process("A {{c1::answer::hint}} test");
    assert_eq!(r.blanks.len(), 1);
    let b = &r.blanks[0];
    assert_eq!(b.id, 1);
    assert_eq!(b.correct_answer, "answer");
    assert_eq!(b.hint.as_deref(), Some("hint"));
    assert_eq!(r.text, "A ______ test");
    let placeholder = &r.text[b.span()];
    assert!(placeholder.len() <= PLACEHOLDER_MAX_LEN);
    assert!(placeholder.chars().all(|c| c == '_'));
}

#[test]
fn cloze_spans_track_rendered_offsets() {
    let r = process("{{c2::Paris}} is the capital of {{c1::France::country}}, near {{c3::Belgium}}.");
    assert_eq!(r.text, "_____ is the capital of ______, near _______.");
    let ids: Vec<u32> = r.blanks.iter().map(|b| b.id).collect();
    assert_eq!(ids, [1, 2, 3]);
    for b in &r.blanks {
        assert_eq!(&r.text[b.span()], "_".repeat(b.correct_answer.len()));
    }
    assert_eq!(r.blanks[1].start, 0);
    assert_eq!(r.blanks[0].hint.as_deref(), Some("country"));
    assert_eq!(r.blanks[2].hint, None);
}

#[test]
fn cloze_placeholder_is_capped() {
    let r = process("x {{c1::antidisestablishmentarianism}} y");
    let b = &r.blanks[0];
    assert_eq!(b.end - b.start, PLACEHOLDER_MAX_LEN);
    assert_eq!(r.text.len(), "x  y".len() + PLACEHOLDER_MAX_LEN);
}

#[test]
fn cloze_alternatives() {
    let r = process("The {{c1::colour|color}} red");
    let b = &r.blanks[0];
    assert_eq!(b.correct_answer, "colour");
    assert_eq!(b.alternatives, ["color"]);
    assert_eq!(check_blank(b, "Color"), Verdict::Exact);
    assert_eq!(check_blank(b, "collour"), Verdict::Close);
    assert_eq!(check_blank(b, "blue"), Verdict::Incorrect);
}

#[test]
fn malformed_cloze_is_left_verbatim() {
    let r = process("open {{c1::never closed and {{c0::zero}} and {{c2::}} end");
    assert!(r.blanks.is_empty());
    assert_eq!(r.text, "open {{c1::never closed and {{c0::zero}} and {{c2::}} end");

    let r = process("{{c1::one}} and {{c1::again}}");
    assert_eq!(r.blanks.len(), 1);
    assert_eq!(r.text, "___ and {{c1::again}}");

    let r = process("no markup at all");
    assert_eq!(r.text, "no markup at all");
    assert!(r.blanks.is_empty());
}

#[test]
fn hints_are_deterministic() {
    assert_eq!(
        hints("Elephant"),
        ["Starts with \"E\"", "8 characters", "Ends with \"t\"", "1 word"]
    );
    assert_eq!(
        hints(" New York "),
        ["Starts with \"N\"", "8 characters", "Ends with \"k\"", "2 words"]
    );
    assert!(hints("   ").is_empty());
    assert_eq!(hints("Elephant"), hints("Elephant"));
}

#[test]
fn grading_by_item_kind() {
    let choice = ReviewItem::new(ItemKind::Choice, "2 + 2?", Some("B".into()));
    assert_eq!(grade_answer(&choice, &["b".into()]).unwrap(), Verdict::Exact);
    assert_eq!(grade_answer(&choice, &["C".into()]).unwrap(), Verdict::Incorrect);

    let free = ReviewItem::new(ItemKind::FreeText, "big grey animal", Some("elephant".into()));
    assert_eq!(grade_answer(&free, &["Elephant".into()]).unwrap(), Verdict::Exact);
    assert_eq!(grade_answer(&free, &["elefant".into()]).unwrap(), Verdict::Close);
    assert_eq!(grade_answer(&free, &[]).unwrap(), Verdict::Incorrect);

    let cloze = ReviewItem::new(ItemKind::Cloze, "{{c2::Berlin}} is in {{c1::Germany}}", None);
    let ok = grade_answer(&cloze, &["germany".into(), "berlin".into()]).unwrap();
    assert_eq!(ok, Verdict::Exact);
    let close = grade_answer(&cloze, &["Germani".into(), "Berlin".into()]).unwrap();
    assert_eq!(close, Verdict::Close);
    let wrong = grade_answer(&cloze, &["Berlin".into(), "Germany".into()]).unwrap();
    assert_eq!(wrong, Verdict::Incorrect);

    let missing = ReviewItem::new(ItemKind::FreeText, "no answer stored", None);
    assert!(matches!(grade_answer(&missing, &[]), Err(CoreError::Invalid(_))));
}

#[test]
fn verdict_suggests_quality() {
    assert_eq!(Verdict::Exact.suggested_quality().value(), 5);
    assert_eq!(Verdict::Close.suggested_quality().value(), 4);
    assert!(!Verdict::Incorrect.suggested_quality().is_pass());
}
