//! Keyboard scrolling and clamping of the code viewport

use crate::common::fixtures::numbered_defs;
use crate::common::harness::ViewerTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use xmlview::model::document::DocumentVariant;

/// 100 items: 102 lines in an 18 row viewport
fn harness() -> ViewerTestHarness {
    let xml = numbered_defs(100);
    let mut harness =
        ViewerTestHarness::with_documents(80, 20, &[(DocumentVariant::Raw, &xml)]).unwrap();
    harness.run_query("/Defs").unwrap();
    harness
}

fn key(harness: &mut ViewerTestHarness, code: KeyCode) {
    harness.send_key(code, KeyModifiers::NONE).unwrap();
}

#[test]
fn test_initial_view_starts_at_top() {
    let harness = harness();
    assert!(harness.get_row_text(1).starts_with("   1  <Defs>"));
    assert!(harness.get_row_text(18).starts_with("  18    <Item>Item 17</Item>"));
    harness.assert_screen_not_contains("</Defs>");
}

#[test]
fn test_line_scrolling() {
    let mut harness = harness();
    key(&mut harness, KeyCode::Down);
    assert!(harness.get_row_text(1).starts_with("   2    <Item>Item 1</Item>"));

    key(&mut harness, KeyCode::Char('j'));
    key(&mut harness, KeyCode::Char('k'));
    key(&mut harness, KeyCode::Up);
    assert!(harness.get_row_text(1).starts_with("   1  <Defs>"));
}

#[test]
fn test_scroll_is_clamped_at_both_ends() {
    let mut harness = harness();
    harness
        .send_key_repeat(KeyCode::Up, KeyModifiers::NONE, 5)
        .unwrap();
    assert!(harness.get_row_text(1).starts_with("   1  <Defs>"));

    harness
        .send_key_repeat(KeyCode::Down, KeyModifiers::NONE, 500)
        .unwrap();
    assert!(harness.get_row_text(18).starts_with(" 102  </Defs>"));
    assert_eq!(harness.viewer().tabs().current().scroll.y, 84.0);

    // Content fits horizontally, so there is nothing to scroll
    key(&mut harness, KeyCode::Right);
    assert_eq!(harness.viewer().tabs().current().scroll.x, 0.0);
}

#[test]
fn test_paging() {
    let mut harness = harness();
    key(&mut harness, KeyCode::PageDown);
    assert!(harness.get_row_text(1).starts_with("  19    <Item>Item 18</Item>"));

    key(&mut harness, KeyCode::PageUp);
    assert!(harness.get_row_text(1).starts_with("   1  <Defs>"));
}

#[test]
fn test_home_and_end() {
    let mut harness = harness();
    key(&mut harness, KeyCode::End);
    harness.assert_screen_contains("</Defs>");
    harness.assert_screen_contains("<Item>Item 100</Item>");

    key(&mut harness, KeyCode::Home);
    assert!(harness.get_row_text(1).starts_with("   1  <Defs>"));
}

#[test]
fn test_scrollbar_thumb_follows_scroll() {
    let mut harness = harness();
    assert_eq!(harness.get_cell(79, 1).as_deref(), Some("█"));

    key(&mut harness, KeyCode::End);
    assert_eq!(harness.get_cell(79, 1).as_deref(), Some("│"));
    assert_eq!(harness.get_cell(79, 18).as_deref(), Some("█"));
}
