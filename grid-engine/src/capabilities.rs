//! FILENAME: grid-engine/src/capabilities.rs
//! The capability matrix: every feature flag the engine consults, computed
//! once per configuration. Derivation code reads these flags instead of
//! re-checking raw options.

use serde::Serialize;

use crate::definition::GridConfig;

/// Whether a concern is owned by the engine or delegated to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Integrated: the engine owns the state and derives the result locally.
    Local,
    /// The caller owns the state; the engine only emits change effects.
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingCaps {
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub confirm_deletes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub tree: bool,
    pub filtering: bool,
    /// Grouping column, when grouping is active.
    pub grouping: Option<String>,
    pub group_count: bool,
    pub summaries: bool,
    pub selection: bool,
    pub selection_cascade: bool,
    pub select_all: bool,
    pub select_by_row_click: bool,
    /// `None` when editing is inactive.
    pub editing: Option<EditingCaps>,
    /// `None` when the paging panel is hidden.
    pub paging: Option<Mode>,
    /// `None` when sorting is unavailable.
    pub sorting: Option<Mode>,
    pub column_reorder: bool,
    pub row_detail: bool,
    pub refresh: bool,
    pub export: bool,
    pub total_count: bool,
}

impl Capabilities {
    pub fn from_config(config: &GridConfig) -> Self {
        let has_rows = !config.rows.is_empty();
        let callbacks = &config.callbacks;

        let grouping = config
            .grouping
            .as_ref()
            .filter(|g| config.allow_grouping && !g.is_empty() && !config.is_tree_data)
            .cloned();
        let selection_cascade = config.allow_selections && grouping.is_some() && config.select_by_group;

        let any_edit = config.allow_creating || config.allow_editing || config.allow_deleting;
        let editing = (any_edit && callbacks.on_commit_changes.is_some()).then(|| EditingCaps {
            can_create: config.allow_creating,
            can_edit: config.allow_editing,
            can_delete: config.allow_deleting,
            confirm_deletes: config.allow_deleting && config.show_delete_confirmation,
        });

        let paging = (config.show_paging_panel != Some(false)).then(|| {
            if config.allow_remote_paging {
                Mode::Remote
            } else {
                Mode::Local
            }
        });
        let sorting = (config.allow_sorting && has_rows).then(|| {
            if config.allow_remote_sorting {
                Mode::Remote
            } else {
                Mode::Local
            }
        });

        Capabilities {
            tree: config.is_tree_data,
            filtering: config.allow_filtering,
            group_count: grouping.is_some() && config.show_group_count,
            summaries: config.allow_summarizing && !config.summary_items.is_empty(),
            selection: config.allow_selections && (selection_cascade || has_rows),
            select_all: config.allow_selections && !selection_cascade && config.show_select_all,
            select_by_row_click: config.allow_selections && !selection_cascade && config.select_by_row_click,
            selection_cascade,
            grouping,
            editing,
            paging,
            sorting,
            column_reorder: config.allow_column_reorder,
            row_detail: config.allow_row_detail && callbacks.row_detail_content.is_some(),
            refresh: config.allow_refreshing && has_rows,
            export: config.allow_exporting && has_rows,
            total_count: config.show_total_count != Some(false),
        }
    }

    pub fn editing_active(&self) -> bool {
        self.editing.is_some()
    }

    pub fn toolbar(&self) -> bool {
        self.refresh || self.export || self.total_count || self.filtering
    }
}
