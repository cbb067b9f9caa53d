//! Startup, the query prompt, status messages and quitting

use crate::common::fixtures::{DEFS_PATCHED, DEFS_RAW};
use crate::common::harness::ViewerTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use xmlview::app::{InputMode, ViewStatus};
use xmlview::model::document::DocumentVariant;

fn harness() -> ViewerTestHarness {
    ViewerTestHarness::with_documents(
        80,
        20,
        &[
            (DocumentVariant::Raw, DEFS_RAW),
            (DocumentVariant::Patched, DEFS_PATCHED),
        ],
    )
    .unwrap()
}

#[test]
fn test_startup_asks_for_query() {
    let harness = harness();
    harness.assert_screen_contains("Enter a query and press Enter.");
    harness.assert_screen_contains("Press : to enter a query");
    assert_eq!(harness.viewer().status(), ViewStatus::NoQuery);
}

#[test]
fn test_no_documents_loaded() {
    let harness = ViewerTestHarness::new(80, 20).unwrap();
    harness.assert_screen_contains("Selected document not available.");
}

#[test]
fn test_query_shows_formatted_document() {
    let mut harness = harness();
    harness.run_query("/Defs").unwrap();

    harness.assert_screen_contains("<Defs>");
    harness.assert_screen_contains(r#"<ThingDef Name="WallBase" Abstract="True">"#);
    harness.assert_screen_contains("    <defName>Wall</defName>");
    harness.assert_screen_contains("</Defs>");
    harness.assert_screen_not_contains("<!-- Node");
    harness.assert_screen_not_contains("<?xml");

    let status = harness.get_row_text(19);
    assert!(status.contains("/Defs ("), "status: {status}");
    assert!(status.contains("All (1)"), "status: {status}");
}

#[test]
fn test_multiple_results_get_headers() {
    let mut harness = harness();
    harness.run_query("//ThingDef").unwrap();

    harness.assert_screen_contains("<!-- Node 1 / 3 -->");
    harness.assert_screen_contains("<!-- Node 2 / 3 -->");
    harness.assert_screen_contains("<!-- Node 3 / 3 -->");

    // A blank line separates consecutive nodes
    let header = harness.find_row("<!-- Node 2 / 3 -->").unwrap();
    let above = harness.get_row_text(header - 1);
    assert!(above.trim_start().starts_with(char::is_numeric));
    assert!(!above.contains('<'), "row above header: {above}");
}

#[test]
fn test_invalid_query_then_recovery() {
    let mut harness = harness();
    harness.run_query("//ThingDef[").unwrap();
    harness.assert_screen_contains("Invalid query.");
    assert!(harness.app().notice().is_some());

    harness.run_query("//defName").unwrap();
    harness.assert_screen_not_contains("Invalid query.");
    harness.assert_screen_contains("<defName>Wall</defName>");
    assert_eq!(harness.app().notice(), None);
}

#[test]
fn test_empty_result_set() {
    let mut harness = harness();
    harness.run_query("//Missing").unwrap();
    harness.assert_screen_contains("No nodes found.");
    harness.assert_screen_contains("Raw (0 B)");
}

#[test]
fn test_query_prompt_editing() {
    let mut harness = harness();
    harness
        .send_key(KeyCode::Char(':'), KeyModifiers::NONE)
        .unwrap();
    assert_eq!(harness.app().mode(), InputMode::Query);
    harness.type_text("//abc").unwrap();
    harness
        .send_key(KeyCode::Backspace, KeyModifiers::NONE)
        .unwrap();
    assert!(harness.get_row_text(19).contains("Query: //ab"));

    harness.send_key(KeyCode::Esc, KeyModifiers::NONE).unwrap();
    assert_eq!(harness.app().mode(), InputMode::Normal);
    harness.assert_screen_contains("Enter a query and press Enter.");
}

#[test]
fn test_query_prompt_starts_with_last_query() {
    let mut harness = harness();
    harness.run_query("//label").unwrap();
    harness
        .send_key(KeyCode::Char(':'), KeyModifiers::NONE)
        .unwrap();
    assert_eq!(harness.app().input(), "//label");
}

#[test]
fn test_quit_keys() {
    let mut harness = harness();
    assert!(!harness.should_quit());
    harness
        .send_key(KeyCode::Char('q'), KeyModifiers::NONE)
        .unwrap();
    assert!(harness.should_quit());

    let mut harness = self::harness();
    harness
        .send_key(KeyCode::Char('c'), KeyModifiers::CONTROL)
        .unwrap();
    assert!(harness.should_quit());
}

#[test]
fn test_typing_q_in_prompt_does_not_quit() {
    let mut harness = harness();
    harness.run_query("//q").unwrap();
    assert!(!harness.should_quit());
    harness.assert_screen_contains("No nodes found.");
}
