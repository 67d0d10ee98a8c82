use super::*;

fn span(start: u32, end: u32) -> TextSpan {
    TextSpan::new(start, end)
}

#[test]
fn test_applies_edits_in_descending_order() {
    // "class Foo extends Bar {}" located at offset 10 in its file
    let text = "class Foo extends Bar {}";
    let mut edits = TextEdits::new(10);
    edits.replace(span(16, 19), "Foo", "Foo_1");
    edits.replace(span(28, 31), "Bar", "Base");
    edits.insert(10, "declare ");

    assert_eq!(
        edits.apply(text).unwrap(),
        "declare class Foo_1 extends Base {}"
    );
}

#[test]
fn test_insertion_lands_before_replacement_at_same_offset() {
    let text = "class {}";
    let mut edits = TextEdits::new(0);
    edits.replace(span(0, 5), "class", "class Named");
    edits.insert(0, "declare ");

    assert_eq!(edits.apply(text).unwrap(), "declare class Named {}");
}

#[test]
fn test_rejects_mismatched_text() {
    let text = "interface A {}";
    let mut edits = TextEdits::new(0);
    edits.replace(span(10, 11), "B", "C");

    let err = edits.apply(text).unwrap_err();
    assert_eq!(
        err,
        TextEditError::Mismatch {
            start: 10,
            end: 11,
            expected: "B".into(),
            found: "A".into(),
        }
    );
}

#[test]
fn test_rejects_overlapping_edits() {
    let text = "type A = B.C;";
    let mut edits = TextEdits::new(0);
    edits.replace(span(9, 12), "B.C", "C");
    edits.replace(span(9, 10), "B", "X");

    assert!(matches!(
        edits.apply(text),
        Err(TextEditError::Overlap { .. })
    ));
}

#[test]
fn test_rejects_edits_outside_the_text() {
    let text = "type A = B;";
    let mut edits = TextEdits::new(5);
    edits.replace(span(0, 4), "type", "");

    assert!(matches!(
        edits.apply(text),
        Err(TextEditError::OutOfBounds { .. })
    ));
}

#[test]
fn test_no_edits_returns_text_unchanged() {
    let edits = TextEdits::new(0);
    assert_eq!(edits.apply("enum E {}").unwrap(), "enum E {}");
}
