//! Document variant tabs, node selection and per-tab state

use crate::common::fixtures::{numbered_defs, DEFS_PATCHED, DEFS_RAW};
use crate::common::harness::ViewerTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use xmlview::app::ViewStatus;
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

fn press(harness: &mut ViewerTestHarness, code: KeyCode) {
    harness.send_key(code, KeyModifiers::NONE).unwrap();
}

#[test]
fn test_tab_bar_labels() {
    let mut harness = harness();
    harness.run_query("//ThingDef").unwrap();

    let tabs = harness.get_row_text(0);
    assert!(tabs.contains(" 1 Raw ("), "tabs: {tabs}");
    assert!(tabs.contains(" 2 Patched ("), "tabs: {tabs}");
    assert!(tabs.contains(" 3 Resolved "), "tabs: {tabs}");
    assert!(!tabs.contains("Resolved ("), "tabs: {tabs}");
}

#[test]
fn test_switching_variants() {
    let mut harness = harness();
    harness.run_query("//label").unwrap();
    harness.assert_screen_contains("<label>door</label>");

    press(&mut harness, KeyCode::Char('2'));
    assert_eq!(
        harness.viewer().current_variant(),
        DocumentVariant::Patched
    );
    harness.assert_screen_contains("<label>stone wall</label>");
    harness.assert_screen_not_contains("<label>door</label>");

    press(&mut harness, KeyCode::Char('3'));
    assert_eq!(harness.viewer().status(), ViewStatus::NoDocument);
    harness.assert_screen_contains("Selected document not available.");

    press(&mut harness, KeyCode::Char('1'));
    harness.assert_screen_contains("<label>door</label>");
}

#[test]
fn test_tab_key_cycles_variants() {
    let mut harness = harness();
    harness.run_query("/Defs").unwrap();
    let order: Vec<DocumentVariant> = (0..4)
        .map(|_| {
            press(&mut harness, KeyCode::Tab);
            harness.viewer().current_variant()
        })
        .collect();
    assert_eq!(
        order,
        vec![
            DocumentVariant::Patched,
            DocumentVariant::Resolved,
            DocumentVariant::Raw,
            DocumentVariant::Patched,
        ]
    );
}

#[test]
fn test_node_selection() {
    let mut harness = harness();
    harness.run_query("//ThingDef").unwrap();
    harness.assert_screen_contains("All (3)");

    press(&mut harness, KeyCode::Char(']'));
    harness.assert_screen_contains("<!-- Node 1 / 3 -->");
    harness.assert_screen_not_contains("<!-- Node 2 / 3 -->");
    harness.assert_screen_contains("1 / 3");
    harness.assert_screen_contains("<category>Building</category>");

    press(&mut harness, KeyCode::Char(']'));
    harness.assert_screen_contains("<!-- Node 2 / 3 -->");
    harness.assert_screen_contains("<defName>Wall</defName>");

    // Clamped at the last node
    harness
        .send_key_repeat(KeyCode::Char(']'), KeyModifiers::NONE, 5)
        .unwrap();
    harness.assert_screen_contains("3 / 3");
    harness.assert_screen_contains("<defName>Door</defName>");

    // Back to all results
    harness
        .send_key_repeat(KeyCode::Char('['), KeyModifiers::NONE, 5)
        .unwrap();
    harness.assert_screen_contains("All (3)");
    harness.assert_screen_contains("<!-- Node 1 / 3 -->");
    harness.assert_screen_contains("<!-- Node 3 / 3 -->");
}

#[test]
fn test_selection_is_per_tab() {
    let mut harness = harness();
    harness.run_query("//ThingDef").unwrap();
    press(&mut harness, KeyCode::Char(']'));
    harness.assert_screen_contains("1 / 3");

    press(&mut harness, KeyCode::Char('2'));
    harness.assert_screen_contains("All (1)");

    press(&mut harness, KeyCode::Char('1'));
    harness.assert_screen_contains("1 / 3");
}

#[test]
fn test_scroll_position_is_per_tab() {
    let raw = numbered_defs(100);
    let patched = numbered_defs(50);
    let mut harness = ViewerTestHarness::with_documents(
        80,
        20,
        &[
            (DocumentVariant::Raw, &raw),
            (DocumentVariant::Patched, &patched),
        ],
    )
    .unwrap();
    harness.run_query("/Defs").unwrap();

    harness
        .send_key_repeat(KeyCode::Down, KeyModifiers::NONE, 10)
        .unwrap();
    assert!(harness.get_row_text(1).starts_with("  11"));

    press(&mut harness, KeyCode::Char('2'));
    assert!(harness.get_row_text(1).starts_with("  1  <Defs>"));

    press(&mut harness, KeyCode::Char('1'));
    assert!(harness.get_row_text(1).starts_with("  11"));
}

#[test]
fn test_search_follows_variant_switch() {
    let mut harness = harness();
    harness.run_query("//label").unwrap();
    harness.search("wall").unwrap();
    harness.assert_screen_contains("1 Result(s)");

    // The raw tab had searched, so the patched tab is indexed on arrival
    press(&mut harness, KeyCode::Char('2'));
    harness.assert_screen_contains("1 Result(s)");
    assert_eq!(harness.viewer().tabs().current().search.matches().len(), 1);

    press(&mut harness, KeyCode::Char('n'));
    harness.assert_screen_contains("1 / 1");
}

#[test]
fn test_new_query_resets_selection() {
    let mut harness = harness();
    harness.run_query("//ThingDef").unwrap();
    press(&mut harness, KeyCode::Char(']'));
    press(&mut harness, KeyCode::Char(']'));
    harness.assert_screen_contains("2 / 3");

    harness.run_query("//defName").unwrap();
    harness.assert_screen_contains("All (2)");
}
