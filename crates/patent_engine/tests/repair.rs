use std::sync::Once;

use patent_engine::repair;
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(pipeline_logging::initialize_for_tests);
}

#[test]
fn well_formed_input_passes_through_unchanged() {
    init_logging();
    let input = "<root>\n  <document-id format=\"epo\">\n    <doc-number>999000888</doc-number>\n  </document-id>\n</root>";
    assert_eq!(repair(input), input);
}

#[test]
fn unclosed_tag_at_end_of_input_is_closed() {
    assert_eq!(repair("<a b><c d"), "<a b><c d=\"\">");
}

#[test]
fn unclosed_tag_before_next_tag_is_closed() {
    assert_eq!(repair("<a b<c d>"), "<a b=\"\"><c d>");
}

#[test]
fn consecutive_unclosed_tags_each_get_their_own_closure() {
    assert_eq!(repair("<a b<c d<e f>"), "<a b=\"\"><c d=\"\"><e f>");
}

#[test]
fn closed_tag_with_bare_looking_tail_is_not_touched() {
    // The fix-up only applies to unclosed tags.
    assert_eq!(repair("<a b>"), "<a b>");
}

#[test]
fn unclosed_tag_without_bare_attribute_gets_only_a_bracket() {
    assert_eq!(repair("<a b=\"1\"<c>"), "<a b=\"1\"><c>");
}

#[test]
fn ellipsis_between_values_collapses_to_a_single_space() {
    assert_eq!(repair("<x>1 ... 2</x>"), "<x>1 2</x>");
}

#[test]
fn ellipsis_inside_repaired_markup_is_removed() {
    assert_eq!(repair("<x>...</x>"), "<x></x>");
}

#[test]
fn repair_is_total_on_degenerate_inputs() {
    assert_eq!(repair(""), "");
    assert_eq!(repair("<"), "<>");
    assert_eq!(repair("plain text, no tags"), "plain text, no tags");
    assert_eq!(repair(">>"), ">>");
}

#[test]
fn repair_is_idempotent() {
    let once = repair("<a b<c d ... <e f");
    assert_eq!(repair(&once), once);
}

#[test]
fn truncated_patent_feed_document_becomes_parseable() {
    // Upstream feed shape: a tag missing both its closing bracket and
    // the value of its last attribute.
    let malformed = "<root>\n  <application-reference ucid=\"US-XXXXXXXX-A\" us-art-unit=\"9999\" us-series-code\n    <document-id load-source=\"docdb\" format=\"epo\">\n      <doc-number>999000888</doc-number>\n    </document-id>\n  </application-reference>\n</root>";
    let repaired = repair(malformed);
    assert!(repaired.contains("us-series-code=\"\">"));
    assert!(repaired.contains("<document-id load-source=\"docdb\" format=\"epo\">"));
}
