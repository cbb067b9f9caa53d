//! Live search: reindexing, navigation, highlights and scrollbar markers

use crate::common::fixtures::{numbered_defs, DEFS_RAW};
use crate::common::harness::ViewerTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::style::{Color, Modifier};
use xmlview::model::document::DocumentVariant;

const BACKGROUND: Color = Color::Rgb(30, 30, 30);

fn defs_harness() -> ViewerTestHarness {
    let mut harness =
        ViewerTestHarness::with_documents(80, 20, &[(DocumentVariant::Raw, DEFS_RAW)]).unwrap();
    harness.run_query("//ThingDef").unwrap();
    harness
}

fn numbered_harness(count: usize) -> ViewerTestHarness {
    let xml = numbered_defs(count);
    let mut harness =
        ViewerTestHarness::with_documents(80, 20, &[(DocumentVariant::Raw, &xml)]).unwrap();
    harness.run_query("/Defs").unwrap();
    harness
}

fn press(harness: &mut ViewerTestHarness, c: char) {
    harness
        .send_key(KeyCode::Char(c), KeyModifiers::NONE)
        .unwrap();
}

#[test]
fn test_first_enter_counts_then_n_steps() {
    let mut harness = defs_harness();
    harness.search("defname").unwrap();

    // Opening and closing tags of Wall and Door
    harness.assert_screen_contains("4 Result(s)");
    assert!(!harness.viewer().tabs().current().jump.is_pending());

    press(&mut harness, 'n');
    harness.assert_screen_contains("1 / 4");
    press(&mut harness, 'n');
    harness.assert_screen_contains("2 / 4");

    press(&mut harness, 'N');
    press(&mut harness, 'N');
    harness.assert_screen_contains("4 / 4");
}

#[test]
fn test_new_needle_recounts_before_moving() {
    let mut harness = defs_harness();
    harness.search("wall").unwrap();
    press(&mut harness, 'n');
    harness.assert_screen_contains("1 / ");

    // Confirming a new needle recounts without moving
    harness.search("door").unwrap();
    harness.assert_screen_contains("2 Result(s)");
    press(&mut harness, 'n');
    harness.assert_screen_contains("1 / 2");
}

#[test]
fn test_matches_are_highlighted() {
    let mut harness = defs_harness();
    harness.search("defName").unwrap();
    press(&mut harness, 'n');

    let row = harness.find_row("<defName>Wall</defName>").unwrap();
    let text = harness.get_row_text(row);
    let first = text.find("defName").unwrap() as u16;
    let second = text.rfind("defName").unwrap() as u16;

    let active = harness.get_cell_style(first, row).unwrap();
    assert!(matches!(active.bg, Some(Color::Rgb(..))));
    assert_ne!(active.bg, Some(BACKGROUND));
    assert!(active.add_modifier.contains(Modifier::BOLD));

    let other = harness.get_cell_style(second, row).unwrap();
    assert_ne!(other.bg, Some(BACKGROUND));
    assert!(!other.add_modifier.contains(Modifier::BOLD));

    // Text outside a match keeps the panel background
    let plain = harness.get_cell_style(first - 2, row).unwrap();
    assert_eq!(plain.bg, Some(BACKGROUND));
}

#[test]
fn test_search_is_case_insensitive() {
    let mut harness = defs_harness();
    harness.search("THINGDEF").unwrap();
    // Opening and closing tag of each of the three nodes
    harness.assert_screen_contains("6 Result(s)");
}

#[test]
fn test_next_scrolls_far_match_into_view() {
    let mut harness = numbered_harness(100);
    harness.search("Item 900").unwrap();
    harness.assert_screen_contains("0 Result(s)");

    harness.search("item 90").unwrap();
    harness.assert_screen_not_contains("<Item>Item 90</Item>");
    press(&mut harness, 'n');
    harness.assert_screen_contains("<Item>Item 90</Item>");
    harness.assert_screen_contains("1 / 1");
}

#[test]
fn test_scrollbar_markers_drawn() {
    let mut harness = numbered_harness(100);
    harness.search("Item 5").unwrap();
    // Item 5 and Item 50 to Item 59
    harness.assert_screen_contains("11 Result(s)");

    let marked = (1..19)
        .filter_map(|y| harness.get_cell_style(79, y))
        .filter(|style| matches!(style.bg, Some(Color::Rgb(..))) && style.bg != Some(BACKGROUND))
        .count();
    assert!(marked >= 2, "expected markers in the scrollbar column");
}

#[test]
fn test_escape_clears_search() {
    let mut harness = defs_harness();
    harness.search("wall").unwrap();
    press(&mut harness, 'n');
    harness
        .send_key(KeyCode::Esc, KeyModifiers::NONE)
        .unwrap();
    harness.assert_screen_not_contains("Result(s)");
    harness.assert_screen_not_contains("1 / 5");
    assert!(harness.viewer().tabs().current().search.matches().is_empty());
}

#[test]
fn test_no_matches_does_nothing() {
    let mut harness = defs_harness();
    harness.search("zzz").unwrap();
    harness.assert_screen_contains("0 Result(s)");
    press(&mut harness, 'n');
    harness.assert_screen_contains("0 Result(s)");
}
