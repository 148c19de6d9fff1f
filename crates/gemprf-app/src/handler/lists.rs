//! Dynamic list handlers

use gemprf_core::prelude::*;

use crate::form::{ConcatPart, ListId};
use crate::state::AppState;

use super::update::reject;
use super::UpdateResult;

/// Bookkeeping after any successful list mutation
fn list_changed(state: &mut AppState, list: ListId) {
    if list == ListId::ConcatItems {
        state.set_concat_parse_error(None);
    }
    state.mark_dirty();
}

fn finish(state: &mut AppState, list: ListId, result: Result<()>) -> UpdateResult {
    match result {
        Ok(()) => {
            list_changed(state, list);
            UpdateResult::none()
        }
        Err(e) => reject(state, e),
    }
}

pub(crate) fn handle_add(state: &mut AppState, list: ListId) -> UpdateResult {
    let index = match list {
        ListId::DataPaths => state.form.data_paths.add(),
        ListId::Gpus => state.form.gpus.add(),
        ListId::ConcatItems => state.form.concat_items.add(),
    };
    debug!("Added row {} to {}", index, list);
    list_changed(state, list);
    UpdateResult::none()
}

pub(crate) fn handle_remove(state: &mut AppState, list: ListId, index: usize) -> UpdateResult {
    let result = match list {
        ListId::DataPaths => state.form.data_paths.remove_at(index).map(|_| ()),
        ListId::Gpus => state.form.gpus.remove_at(index).map(|_| ()),
        ListId::ConcatItems => state.form.concat_items.remove_at(index).map(|_| ()),
    };
    finish(state, list, result)
}

pub(crate) fn handle_clear(state: &mut AppState, list: ListId, index: usize) -> UpdateResult {
    let result = match list {
        ListId::DataPaths => state.form.data_paths.clear_at(index),
        ListId::Gpus => state.form.gpus.clear_at(index),
        ListId::ConcatItems => state.form.concat_items.clear_at(index),
    };
    finish(state, list, result)
}

pub(crate) fn handle_set_row(
    state: &mut AppState,
    list: ListId,
    index: usize,
    value: String,
) -> UpdateResult {
    let result = match list {
        ListId::DataPaths => state.form.data_paths.set_at(index, value),
        ListId::Gpus => state.form.gpus.set_at(index, value),
        // Concatenation rows are records, edited one column at a time
        ListId::ConcatItems => Err(Error::invalid_choice(
            list.as_str(),
            value,
            &["ses", "task", "run"],
        )),
    };
    finish(state, list, result)
}

pub(crate) fn handle_set_concat_field(
    state: &mut AppState,
    index: usize,
    part: ConcatPart,
    value: String,
) -> UpdateResult {
    let result = state
        .form
        .concat_items
        .get_mut(index)
        .map(|item| *item.part_mut(part) = value);
    finish(state, ListId::ConcatItems, result)
}

/// Bulk replacement never fails: an unparsable description leaves a single
/// placeholder row and a warning finding on `concat_items`.
pub(crate) fn handle_replace_concat(state: &mut AppState, description: &str) -> UpdateResult {
    match state.form.concat_items.replace_from_description(description) {
        Ok(count) => {
            debug!("Replaced concatenation list with {} rows", count);
            state.set_concat_parse_error(None);
        }
        Err(e) => {
            state.set_concat_parse_error(Some(format!(
                "Unparsable description, placeholder row used ({})",
                e
            )));
        }
    }
    state.mark_dirty();
    UpdateResult::none()
}
