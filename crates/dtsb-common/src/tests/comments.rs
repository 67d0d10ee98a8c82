use super::*;

#[test]
fn test_collects_line_and_block_comments() {
    let source = "// one\n/* two */\n/** three */\nclass A {}";
    let start = source.find("class").unwrap() as u32;
    let ranges = get_comment_ranges(source, 0, start);

    assert_eq!(ranges.len(), 3);
    assert!(!ranges[0].is_multi_line);
    assert_eq!(ranges[0].get_text(source), "// one");
    assert_eq!(ranges[1].get_text(source), "/* two */");
    assert!(ranges[2].is_jsdoc(source));
}

#[test]
fn test_jsdoc_picks_the_closest_block() {
    let source = "/** first */\n/** second */\n// trailing note\nexport class A {}";
    let start = source.find("export").unwrap() as u32;

    assert_eq!(get_jsdoc_comment(source, 0, start), Some("/** second */"));
}

#[test]
fn test_plain_block_comments_are_not_documentation() {
    let source = "/* not docs */\n/**/\ninterface I {}";
    let start = source.find("interface").unwrap() as u32;

    assert_eq!(get_jsdoc_comment(source, 0, start), None);
}

#[test]
fn test_scanning_stops_at_code() {
    let source = "/** a */ x /** b */";
    let ranges = get_comment_ranges(source, 0, source.len() as u32);
    assert_eq!(ranges.len(), 1);
}
