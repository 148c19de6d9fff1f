//! Preset files: stored field values applied to a fresh form
//!
//! A preset never writes to the model directly. It is turned into the same
//! [`Message`]s a user edit would produce, so every value goes through the
//! normal validation and rejection path.

use std::collections::BTreeMap;
use std::path::Path;

use gemprf_core::prelude::*;
use serde::Deserialize;

use crate::form::{ConcatPart, FieldValue, FormModel, ListId};
use crate::message::Message;

/// Parsed preset file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormPreset {
    #[serde(default)]
    pub fields: BTreeMap<String, toml::Value>,

    #[serde(default)]
    pub lists: PresetLists,
}

/// `[lists]` table of a preset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PresetLists {
    #[serde(default)]
    pub data_paths: Option<Vec<toml::Value>>,

    #[serde(default)]
    pub gpus: Option<Vec<toml::Value>>,

    #[serde(default)]
    pub concat_items: Option<Vec<PresetConcatItem>>,

    /// JSON description, used when `concat_items` is absent
    #[serde(default)]
    pub concat_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresetConcatItem {
    pub ses: toml::Value,
    pub task: toml::Value,
    pub run: toml::Value,
}

/// Load a preset file
pub fn load_preset(path: &Path) -> Result<FormPreset> {
    if !path.exists() {
        return Err(Error::config_not_found(path));
    }
    let content = std::fs::read_to_string(path)?;
    let preset: FormPreset = toml::from_str(&content)?;
    debug!(
        "Loaded preset {:?} ({} fields)",
        path,
        preset.fields.len()
    );
    Ok(preset)
}

/// Split a command-line `ID=VALUE` assignment
pub fn parse_assignment(input: &str) -> Result<(String, String)> {
    let (id, value) = input
        .split_once('=')
        .ok_or_else(|| Error::assignment(input))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::assignment(input));
    }
    Ok((id.to_string(), value.to_string()))
}

/// Text form of a scalar TOML value; tables and arrays have none
fn scalar_text(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(n) => Some(n.to_string()),
        toml::Value::Float(f) => Some(float_text(*f)),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A TOML float always has a fraction or exponent; keep `10.0` from
/// collapsing to `10`
fn float_text(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

/// Numbers keep the form they were written in, like typed input
fn field_value(value: &toml::Value) -> Option<FieldValue> {
    match value {
        toml::Value::Boolean(b) => Some(FieldValue::Flag(*b)),
        other => scalar_text(other).map(FieldValue::Text),
    }
}

impl FormPreset {
    /// Overlay a single `ID=VALUE` assignment.
    ///
    /// List identifiers take a comma separated row list (`data_paths`,
    /// `gpus`) or a JSON description (`concat_items`).
    pub fn assign(&mut self, id: &str, value: &str) {
        match ListId::parse(id) {
            Some(ListId::ConcatItems) => {
                self.lists.concat_items = None;
                self.lists.concat_description = Some(value.to_string());
            }
            Some(list) => {
                let rows = value
                    .split(',')
                    .map(|row| toml::Value::String(row.trim().to_string()))
                    .collect();
                match list {
                    ListId::DataPaths => self.lists.data_paths = Some(rows),
                    _ => self.lists.gpus = Some(rows),
                }
            }
            None => {
                self.fields
                    .insert(id.to_string(), toml::Value::String(value.to_string()));
            }
        }
    }

    /// Messages that reproduce this preset on `model`.
    ///
    /// Values that cannot be expressed as a field value (arrays, tables) are
    /// returned as errors and skipped; every other problem surfaces when the
    /// messages are processed.
    pub fn to_messages(&self, model: &FormModel) -> (Vec<Message>, Vec<Error>) {
        let mut messages = Vec::new();
        let mut errors = Vec::new();

        // Mode selectors first so the remaining values land in a settled form
        let mut ordered: Vec<(&String, &toml::Value)> = self.fields.iter().collect();
        ordered.sort_by_key(|(id, _)| !matches!(id.as_str(), "data_type" | "bids_run_type"));

        for (id, value) in ordered {
            match field_value(value) {
                Some(value) => messages.push(Message::SetField {
                    id: id.clone(),
                    value,
                }),
                None => errors.push(Error::invalid_choice(
                    id.as_str(),
                    value.to_string(),
                    &["string", "number", "boolean"],
                )),
            }
        }

        if let Some(rows) = &self.lists.data_paths {
            replace_rows(&mut messages, &mut errors, model, ListId::DataPaths, rows);
        }
        if let Some(rows) = &self.lists.gpus {
            replace_rows(&mut messages, &mut errors, model, ListId::Gpus, rows);
        }

        if let Some(items) = &self.lists.concat_items {
            clear_list(&mut messages, model, ListId::ConcatItems);
            for (index, item) in items.iter().enumerate() {
                messages.push(Message::AddListRow(ListId::ConcatItems));
                for (part, value) in [
                    (ConcatPart::Ses, &item.ses),
                    (ConcatPart::Task, &item.task),
                    (ConcatPart::Run, &item.run),
                ] {
                    match scalar_text(value) {
                        Some(text) => messages.push(Message::SetConcatField {
                            index,
                            part,
                            value: text,
                        }),
                        None => errors.push(Error::invalid_choice(
                            ListId::ConcatItems.as_str(),
                            value.to_string(),
                            &["string", "integer"],
                        )),
                    }
                }
            }
        } else if let Some(description) = &self.lists.concat_description {
            messages.push(Message::ReplaceConcatItems {
                description: description.clone(),
            });
        }

        (messages, errors)
    }
}

/// Remove every existing row, last first
fn clear_list(messages: &mut Vec<Message>, model: &FormModel, list: ListId) {
    for index in (0..model.list_len(list)).rev() {
        messages.push(Message::RemoveListRow { list, index });
    }
}

fn replace_rows(
    messages: &mut Vec<Message>,
    errors: &mut Vec<Error>,
    model: &FormModel,
    list: ListId,
    rows: &[toml::Value],
) {
    clear_list(messages, model, list);
    let mut index = 0;
    for row in rows {
        match scalar_text(row) {
            Some(value) => {
                messages.push(Message::AddListRow(list));
                messages.push(Message::SetListRow { list, index, value });
                index += 1;
            }
            None => errors.push(Error::invalid_choice(
                list.as_str(),
                row.to_string(),
                &["string", "integer"],
            )),
        }
    }
}
