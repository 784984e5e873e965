//! FILENAME: grid-engine/src/editing.rs
//! Editing Reconciler.
//!
//! Turns a committed change set into the payload(s) handed to
//! `onCommitChanges`. Deletions can be held back behind a confirmation
//! step. Tree data has its `changed` entries rewritten from flat indices to
//! tree coordinates. The reconciler never applies changes to rows.

use std::collections::BTreeMap;

use grid_model::{CommitPayload, EditChangeSet, Row, TreeChange};
use serde::Serialize;

use crate::capabilities::EditingCaps;
use crate::tree;
use crate::{log_debug, log_warn};

/// A commit waiting for the user to confirm a deletion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingConfirmation {
    pub payload: EditChangeSet,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditPhase {
    #[default]
    Idle,
    AwaitingConfirmation(PendingConfirmation),
}

impl EditPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, EditPhase::AwaitingConfirmation(_))
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        match self {
            EditPhase::AwaitingConfirmation(pending) => Some(pending),
            EditPhase::Idle => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    Commit(EditChangeSet),
    Confirm,
    Cancel,
}

/// Inputs the reconciler needs besides the event.
#[derive(Debug, Clone, Copy)]
pub struct EditContext<'a> {
    pub caps: Option<&'a EditingCaps>,
    /// Row set when the grid shows tree data.
    pub tree_rows: Option<&'a [Row]>,
    pub confirmation_message: &'a str,
}

/// Edit-change reducer: returns the next phase and the payloads to forward.
pub fn reduce(phase: EditPhase, event: &EditEvent, ctx: &EditContext<'_>) -> (EditPhase, Vec<CommitPayload>) {
    let Some(caps) = ctx.caps else {
        log_debug!("EDIT", "editing inactive, ignoring {:?}", event);
        return (phase, Vec::new());
    };

    match event {
        EditEvent::Commit(changes) => {
            if changes.is_empty() {
                return (phase, Vec::new());
            }
            if changes.has_deletions() && caps.confirm_deletes {
                log_debug!("EDIT", "holding {} deletions for confirmation", changes.deleted.len());
                let pending = PendingConfirmation {
                    payload: changes.clone(),
                    message: ctx.confirmation_message.to_string(),
                };
                return (EditPhase::AwaitingConfirmation(pending), Vec::new());
            }
            let payloads = match ctx.tree_rows {
                Some(rows) => translate_tree_changes(changes, rows),
                None => vec![CommitPayload::Flat(changes.clone())],
            };
            (phase, payloads)
        }
        EditEvent::Confirm => match phase {
            EditPhase::AwaitingConfirmation(pending) => {
                log_debug!("EDIT", "deletion confirmed");
                (EditPhase::Idle, vec![CommitPayload::Flat(pending.payload)])
            }
            EditPhase::Idle => (EditPhase::Idle, Vec::new()),
        },
        EditEvent::Cancel => {
            if phase.is_active() {
                log_debug!("EDIT", "deletion cancelled");
            }
            (EditPhase::Idle, Vec::new())
        }
    }
}

/// Rewrite `changed` entries of a tree-data change set as one `TreeChange`
/// per key, in ascending key order. Empty patches are skipped, and so are
/// keys outside the flattened tree. Added and deleted rows are forwarded as
/// received.
pub fn translate_tree_changes(changes: &EditChangeSet, rows: &[Row]) -> Vec<CommitPayload> {
    let mut payloads = Vec::new();

    for (&flat_index, patch) in &changes.changed {
        if patch.is_empty() {
            continue;
        }
        match tree::resolve(rows, flat_index) {
            Ok(target_index) => payloads.push(CommitPayload::Tree(TreeChange {
                target_index,
                changed: patch.clone(),
            })),
            Err(err) => log_warn!("EDIT", "skipping tree edit: {}", err),
        }
    }

    if !changes.added.is_empty() || !changes.deleted.is_empty() {
        payloads.push(CommitPayload::Flat(EditChangeSet {
            added: changes.added.clone(),
            changed: BTreeMap::new(),
            deleted: changes.deleted.clone(),
        }));
    }
    payloads
}
