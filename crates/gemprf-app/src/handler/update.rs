//! Main update function - handles state transitions (TEA pattern)
//!
//! List mutations live in `lists`.

use gemprf_core::prelude::*;
use gemprf_core::{limit_words, DESCRIPTION_MAX_WORDS, STIMULUS_MAX_WORDS};

use crate::actions::export_artifact;
use crate::document::assemble;
use crate::form::{field_spec, FieldKind, FieldValue};
use crate::message::{Message, PasteTarget};
use crate::state::AppState;

use super::{lists, UpdateAction, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        // ─────────────────────────────────────────────────────────
        // Scalar Fields
        // ─────────────────────────────────────────────────────────
        Message::SetField { id, value } => handle_set_field(state, &id, value),
        Message::ToggleFlag { id } => handle_toggle_flag(state, &id),
        Message::ClearField { id } => handle_clear_field(state, &id),

        // ─────────────────────────────────────────────────────────
        // Mode Selectors
        // ─────────────────────────────────────────────────────────
        Message::SetDataSource(mode) => {
            debug!("Data source -> {}", mode.as_str());
            state.form.set_data_source(mode);
            state.mark_dirty();
            UpdateResult::none()
        }

        Message::SetBidsRunType(mode) => {
            debug!("BIDS run type -> {}", mode.as_str());
            state.form.set_bids_run(mode);
            state.mark_dirty();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Dynamic Lists
        // ─────────────────────────────────────────────────────────
        Message::AddListRow(list) => lists::handle_add(state, list),
        Message::RemoveListRow { list, index } => lists::handle_remove(state, list, index),
        Message::ClearListRow { list, index } => lists::handle_clear(state, list, index),
        Message::SetListRow { list, index, value } => {
            lists::handle_set_row(state, list, index, value)
        }
        Message::SetConcatField { index, part, value } => {
            lists::handle_set_concat_field(state, index, part, value)
        }
        Message::ReplaceConcatItems { description } => {
            lists::handle_replace_concat(state, &description)
        }

        // ─────────────────────────────────────────────────────────
        // Clipboard / Export
        // ─────────────────────────────────────────────────────────
        Message::PasteInto(target) => handle_paste_into(state, target),

        Message::PasteResolved { target, text } => match target {
            PasteTarget::Field { id } => UpdateResult::message(Message::SetField {
                id,
                value: FieldValue::Text(text),
            }),
            PasteTarget::ListRow { list, index } => {
                UpdateResult::message(Message::SetListRow {
                    list,
                    index,
                    value: text,
                })
            }
        },

        Message::CopyField { id } => match state.form.get(&id) {
            Some(value) => UpdateResult::action(UpdateAction::CopyToClipboard {
                text: value.as_text(),
            }),
            None => reject(state, Error::unknown_field(id)),
        },

        // Exports always assemble fresh, never from the cached preview
        Message::CopyDocument => UpdateResult::action(UpdateAction::CopyToClipboard {
            text: assemble(&state.form),
        }),

        Message::DownloadDocument => {
            UpdateResult::action(UpdateAction::Download(export_artifact(&state.form)))
        }
    }
}

/// Record a rejected edit; the form is left as it was
pub(super) fn reject(state: &mut AppState, err: Error) -> UpdateResult {
    warn!("Rejected edit: {}", err);
    state.reject(err.to_string());
    UpdateResult::none()
}

fn handle_set_field(state: &mut AppState, id: &str, value: FieldValue) -> UpdateResult {
    let value = match (id, value) {
        ("filename_stimulus", FieldValue::Text(text)) => {
            FieldValue::Text(limit_words(&text, STIMULUS_MAX_WORDS))
        }
        ("filename_description", FieldValue::Text(text)) => {
            FieldValue::Text(limit_words(&text, DESCRIPTION_MAX_WORDS))
        }
        (_, value) => value,
    };

    if let Err(e) = state.form.set(id, value) {
        return reject(state, e);
    }

    debug!("Field {} updated", id);
    state.refresh_finding(id);
    state.mark_dirty();
    UpdateResult::none()
}

fn handle_toggle_flag(state: &mut AppState, id: &str) -> UpdateResult {
    let Some(spec) = field_spec(id) else {
        return reject(state, Error::unknown_field(id));
    };
    if spec.kind != FieldKind::Flag {
        return reject(
            state,
            Error::invalid_choice(id, spec.kind.label(), &[FieldKind::Flag.label()]),
        );
    }

    let current = state.form.flag(id);
    handle_set_field(state, id, FieldValue::Flag(!current))
}

fn handle_clear_field(state: &mut AppState, id: &str) -> UpdateResult {
    let Some(spec) = field_spec(id) else {
        return reject(state, Error::unknown_field(id));
    };
    let cleared = match spec.kind {
        FieldKind::Flag => FieldValue::Flag(false),
        FieldKind::Choice(_) => FieldValue::from(spec.default),
        FieldKind::Text | FieldKind::Number => FieldValue::Text(String::new()),
    };
    handle_set_field(state, id, cleared)
}

fn handle_paste_into(state: &mut AppState, target: PasteTarget) -> UpdateResult {
    match &target {
        PasteTarget::Field { id } => {
            if field_spec(id).is_none() {
                return reject(state, Error::unknown_field(id.as_str()));
            }
        }
        PasteTarget::ListRow { list, index } => {
            let len = state.form.list_len(*list);
            if *index >= len {
                return reject(state, Error::list_index(list.as_str(), *index, len));
            }
        }
    }
    UpdateResult::action(UpdateAction::ReadClipboard { target })
}
