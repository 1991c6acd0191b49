use imagegrabber::selection::*;

mod common;
use common::urls;

#[test]
fn state_follows_individual_toggles() {
    let visible = urls(&["a", "b", "c"]);
    let mut selection = Selection::new();
    assert_eq!(selection.state(&visible), SelectionState::None);
    selection.toggle("b");
    assert_eq!(selection.state(&visible), SelectionState::Partial);
    selection.toggle("a");
    selection.toggle("c");
    assert_eq!(selection.state(&visible), SelectionState::All);
    selection.toggle("c");
    assert_eq!(selection.state(&visible), SelectionState::Partial);
}

#[test]
fn toggling_each_item_equals_select_all() {
    let visible = urls(&["a", "b", "c"]);
    let mut one_by_one = Selection::new();
    for url in &visible {
        one_by_one.toggle(url);
    }
    let mut all = Selection::new();
    all.set_all(&visible, true);
    assert_eq!(one_by_one.state(&visible), all.state(&visible));
    assert_eq!(all.state(&visible), SelectionState::All);

    all.set_all(&visible, false);
    assert_eq!(all.state(&visible), SelectionState::None);
}

#[test]
fn checked_urls_follow_visible_order() {
    let visible = urls(&["a", "b", "c", "d"]);
    let mut selection = Selection::new();
    selection.toggle("d");
    selection.toggle("b");
    assert_eq!(selection.checked_in_order(&visible), urls(&["b", "d"]));
}

#[test]
fn empty_rendering_has_no_selection() {
    let mut selection = Selection::new();
    selection.toggle("gone");
    assert_eq!(selection.state(&[]), SelectionState::None);
    selection.clear();
    assert!(!selection.is_checked("gone"));
}
