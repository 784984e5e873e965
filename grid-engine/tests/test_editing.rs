//! FILENAME: grid-engine/tests/test_editing.rs
//! PURPOSE: Integration tests for tree indexing, edit reconciliation and
//! editors.

mod common;

use std::collections::BTreeMap;

use common::{sample_config, tree_rows, GridHarness};
use grid_engine::tree::{flat_index_of, flat_len, resolve};
use grid_engine::{
    normalize_currency, Column, ColumnType, CommitPayload, EditChangeSet, EditConfig, EditField,
    EditorDescriptor, EditorInput, GridConfig, GridEvent, Row, RowPatch, TreeChange, TreeCoord,
    Value,
};

fn patch(field: &str, value: impl Into<Value>) -> RowPatch {
    let mut p = BTreeMap::new();
    p.insert(field.to_string(), value.into());
    p
}

fn tree_config(child_counts: &[usize]) -> GridConfig {
    let mut config = GridConfig::new(
        vec![Column::new("id", "Id"), Column::new("note", "Note")],
        tree_rows(child_counts),
    );
    config.is_tree_data = true;
    config.allow_editing = true;
    config
}

// ============================================================================
// UNIT TESTS - TREE INDEX
// ============================================================================

#[test]
fn test_flat_index_five_resolves_to_second_child_of_second_parent() {
    let rows = tree_rows(&[2, 3]);
    assert_eq!(resolve(&rows, 5).unwrap(), TreeCoord::child(1, 1));
    assert_eq!(resolve(&rows, 3).unwrap(), TreeCoord::parent(1));
}

#[test]
fn test_resolution_agrees_with_flattened_ids() {
    let rows = tree_rows(&[0, 2, 1, 0, 4]);
    for t in 0..flat_len(&rows) {
        let coord = resolve(&rows, t).unwrap();
        let row = coord.locate(&rows).unwrap();
        assert_eq!(row.get("id"), &Value::Number(t as f64), "flat index {}", t);
        assert_eq!(flat_index_of(&rows, coord), Some(t));
    }
    assert!(resolve(&rows, flat_len(&rows)).is_err());
}

// ============================================================================
// UNIT TESTS - COMMIT RECONCILIATION
// ============================================================================

#[test]
fn test_tree_commit_reports_tree_coordinates() {
    let mut harness = GridHarness::new(tree_config(&[2, 3]));
    harness.dispatch(GridEvent::CommitChanges(EditChangeSet::changed(5, patch("note", "x"))));

    let commits = harness.recorder.commits.lock().unwrap().clone();
    assert_eq!(
        commits,
        vec![CommitPayload::Tree(TreeChange {
            target_index: TreeCoord::child(1, 1),
            changed: patch("note", "x"),
        })]
    );
}

#[test]
fn test_tree_commit_with_several_rows_yields_one_change_each() {
    let mut harness = GridHarness::new(tree_config(&[2, 3]));
    let mut changes = EditChangeSet::changed(4, patch("note", "b"));
    changes.changed.insert(0, patch("note", "a"));
    changes.changed.insert(99, patch("note", "lost"));
    harness.dispatch(GridEvent::CommitChanges(changes));

    let targets: Vec<TreeCoord> = harness
        .recorder
        .commits
        .lock()
        .unwrap()
        .iter()
        .filter_map(|p| match p {
            CommitPayload::Tree(change) => Some(change.target_index),
            CommitPayload::Flat(_) => None,
        })
        .collect();
    assert_eq!(targets, vec![TreeCoord::parent(0), TreeCoord::child(1, 0)]);
}

#[test]
fn test_flat_commit_forwarded_verbatim() {
    let mut config = sample_config();
    config.allow_creating = true;
    config.allow_editing = true;
    let mut harness = GridHarness::new(config);

    let changes = EditChangeSet::changed(1, patch("name", "Bobby"));
    harness.dispatch(GridEvent::CommitChanges(changes.clone()));
    harness.dispatch(GridEvent::CommitChanges(EditChangeSet::default()));

    assert_eq!(
        *harness.recorder.commits.lock().unwrap(),
        vec![CommitPayload::Flat(changes)]
    );
}

#[test]
fn test_editing_inactive_without_commit_handler() {
    let mut config = sample_config();
    config.allow_editing = true;
    let mut harness = GridHarness::without_callbacks(config);

    assert!(!harness.grid.capabilities().editing_active());
    let effects = harness.dispatch(GridEvent::CommitChanges(EditChangeSet::changed(0, patch("name", "z"))));
    assert!(effects.is_empty());
    assert!(harness.view().editing.is_none());
}

// ============================================================================
// UNIT TESTS - DELETE CONFIRMATION
// ============================================================================

fn deleting_config() -> GridConfig {
    let mut config = sample_config();
    config.allow_deleting = true;
    config.show_delete_confirmation = true;
    config
}

#[test]
fn test_delete_waits_for_confirmation() {
    let mut harness = GridHarness::new(deleting_config());
    let deletion = EditChangeSet::deleted(vec![2]);

    harness.dispatch(GridEvent::CommitChanges(deletion.clone()));
    assert_eq!(harness.recorder.commit_count(), 0);
    let pending = harness.view().confirmation.expect("confirmation shown");
    assert_eq!(pending.payload, deletion);
    assert_eq!(pending.message, grid_engine::definition::DEFAULT_DELETE_CONFIRMATION_MESSAGE);

    harness.dispatch(GridEvent::ConfirmPending);
    assert_eq!(
        *harness.recorder.commits.lock().unwrap(),
        vec![CommitPayload::Flat(deletion)]
    );
    assert!(harness.view().confirmation.is_none());
}

#[test]
fn test_cancelled_delete_is_never_committed() {
    let mut config = deleting_config();
    config.delete_confirmation_message = Some("Sure?".into());
    let mut harness = GridHarness::new(config);

    harness.dispatch(GridEvent::CommitChanges(EditChangeSet::deleted(vec![0, 1])));
    assert_eq!(harness.view().confirmation.unwrap().message, "Sure?");

    harness.dispatch(GridEvent::CancelPending);
    harness.dispatch(GridEvent::ConfirmPending);
    assert_eq!(harness.recorder.commit_count(), 0);
}

#[test]
fn test_delete_without_confirmation_commits_immediately() {
    let mut config = deleting_config();
    config.show_delete_confirmation = false;
    let mut harness = GridHarness::new(config);

    harness.dispatch(GridEvent::CommitChanges(EditChangeSet::deleted(vec![0])));
    assert_eq!(harness.recorder.commit_count(), 1);
}

// ============================================================================
// UNIT TESTS - EDITORS
// ============================================================================

#[test]
fn test_currency_normalization_is_idempotent() {
    for draft in ["12", "12.3", "12.", ".5", "0012.345", "-3.1", "7.00", "abc", ""] {
        let once = normalize_currency(draft);
        let twice = once.as_deref().and_then(normalize_currency);
        assert_eq!(once, twice, "draft {:?}", draft);
    }
    assert_eq!(normalize_currency("12.3").as_deref(), Some("12.30"));
    assert_eq!(normalize_currency(".5").as_deref(), Some("0.50"));
}

#[test]
fn test_edit_fields_decide_editability() {
    let edit_config = EditConfig::default()
        .with_field("salary", EditField::tagged(ColumnType::Currency))
        .with_field("name", EditField::tagged(ColumnType::Text));
    let mut config = sample_config().with_edit_config(edit_config);
    config.allow_editing = true;
    let harness = GridHarness::new(config);

    let pipeline = harness.grid.pipeline();
    assert!(pipeline.is_editable("salary"));
    assert!(pipeline.is_editable("name"));
    assert!(!pipeline.is_editable("dept"));

    let editing = harness.view().editing.unwrap();
    assert!(editing.non_editable_columns.contains(&"dept".to_string()));
    assert!(!editing.non_editable_columns.contains(&"salary".to_string()));
}

#[test]
fn test_currency_editor_commits_numbers() {
    let editor = EditorDescriptor::Currency;
    assert!(editor.accepts_draft("12.3"));
    assert!(!editor.accepts_draft("12.345"));
    assert_eq!(editor.commit(&EditorInput::Text("12.349".into())), Value::Number(12.34));
    assert_eq!(editor.commit(&EditorInput::Text("".into())), Value::Null);
}

#[test]
fn test_cell_edit_format_marks_leaf_rows_inline_editable() {
    let mut edit_config = EditConfig::default();
    edit_config.edit_format = grid_engine::EditFormat::Cell;
    let mut config = tree_config(&[1]).with_edit_config(edit_config);
    config.rows = std::sync::Arc::new(vec![
        Row::new().with("id", 0i64).with_children(vec![Row::new().with("id", 1i64)]),
        Row::new().with("id", 2i64),
    ]);
    let mut harness = GridHarness::new(config);
    harness.dispatch(GridEvent::ToggleTreeRow(0));

    let flags: Vec<bool> = harness.view().data_rows().map(|r| r.inline_editable).collect();
    assert_eq!(flags, vec![false, true, true]);
    assert!(harness.view().editing.unwrap().inline_cell_editing.is_some());
}
