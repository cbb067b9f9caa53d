//! Line number gutter: width, colors and behavior under horizontal scroll

use crate::common::fixtures::{numbered_defs, wide_defs, DEFS_RAW};
use crate::common::harness::ViewerTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::style::Color;
use xmlview::model::document::DocumentVariant;

fn harness_with(xml: &str) -> ViewerTestHarness {
    let mut harness =
        ViewerTestHarness::with_documents(80, 20, &[(DocumentVariant::Raw, xml)]).unwrap();
    harness.run_query("/Defs").unwrap();
    harness
}

#[test]
fn test_small_document_uses_two_digits() {
    let harness = harness_with(DEFS_RAW);
    assert!(harness.get_row_text(1).starts_with("  1  <Defs>"));
    assert!(harness.get_row_text(11).starts_with(" 11  </Defs>"));
}

#[test]
fn test_gutter_grows_with_line_count() {
    // 102 lines
    let harness = harness_with(&numbered_defs(100));
    assert!(harness.get_row_text(1).starts_with("   1  <Defs>"));

    // 1002 lines
    let harness = harness_with(&numbered_defs(1000));
    assert!(harness.get_row_text(1).starts_with("    1  <Defs>"));
}

#[test]
fn test_gutter_colors() {
    let harness = harness_with(DEFS_RAW);

    let number = harness.get_cell_style(2, 1).unwrap();
    assert_eq!(number.fg, Some(Color::Rgb(102, 102, 102)));
    assert_eq!(number.bg, Some(Color::Rgb(37, 37, 38)));

    let separator = harness.get_cell_style(3, 1).unwrap();
    assert_eq!(separator.bg, Some(Color::Rgb(60, 60, 60)));

    let code = harness.get_cell_style(5, 1).unwrap();
    assert_eq!(code.bg, Some(Color::Rgb(30, 30, 30)));
}

#[test]
fn test_gutter_stays_fixed_when_scrolling_right() {
    let mut harness = harness_with(&wide_defs(200));
    assert!(harness.get_row_text(1).starts_with("  1  <Defs>"));

    harness
        .send_key_repeat(KeyCode::Right, KeyModifiers::NONE, 3)
        .unwrap();
    assert!(harness.viewer().tabs().current().scroll.x > 0.0);

    let row = harness.get_row_text(1);
    assert!(row.starts_with("  1"), "row: {row}");
    assert!(!row.contains("<Defs>"), "row: {row}");
    assert!(harness.get_row_text(2).starts_with("  2"));
    assert_eq!(
        harness.get_cell_style(3, 2).unwrap().bg,
        Some(Color::Rgb(60, 60, 60))
    );

    harness
        .send_key_repeat(KeyCode::Left, KeyModifiers::NONE, 10)
        .unwrap();
    assert_eq!(harness.viewer().tabs().current().scroll.x, 0.0);
    assert!(harness.get_row_text(1).starts_with("  1  <Defs>"));
}
