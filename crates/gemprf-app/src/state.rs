//! Application state (Model in TEA pattern)

use std::collections::BTreeMap;

use gemprf_core::ValidationFinding;

use crate::config::Settings;
use crate::form::{validated_fields, FormModel, ListId};
use crate::preview::PreviewDriver;

/// Complete application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Every field value
    pub form: FormModel,

    /// Latest rendered document
    pub preview: PreviewDriver,

    /// Settings the session was started with
    pub settings: Settings,

    /// Most recent finding per validated field
    findings: BTreeMap<&'static str, ValidationFinding>,

    /// Set when the last concatenation description failed to parse
    concat_parse_error: Option<String>,

    /// The form changed since the last render
    dirty: bool,

    /// Rejected edits waiting to be reported
    rejections: Vec<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        let mut state = Self {
            form: FormModel::new(),
            preview: PreviewDriver::new(settings.preview.enabled),
            settings,
            findings: BTreeMap::new(),
            concat_parse_error: None,
            dirty: true,
            rejections: Vec::new(),
        };
        state.refresh_all_findings();
        state
    }

    /// Finding for a field or a `data_paths[i]` row; anything without a rule
    /// reads as `ok`
    pub fn finding(&self, id: &str) -> ValidationFinding {
        if id == ListId::ConcatItems.as_str() {
            return match &self.concat_parse_error {
                Some(message) => ValidationFinding::warning(message.clone()),
                None => ValidationFinding::ok(),
            };
        }
        if let Some(index) = data_path_index(id) {
            return self
                .form
                .data_path_finding(index)
                .unwrap_or_else(ValidationFinding::ok);
        }
        self.findings
            .get(id)
            .cloned()
            .unwrap_or_else(ValidationFinding::ok)
    }

    /// Every tracked finding: fields in id order, then one per data path row
    pub fn findings(&self) -> Vec<(String, ValidationFinding)> {
        let mut all: Vec<(String, ValidationFinding)> = self
            .findings
            .iter()
            .map(|(id, finding)| (id.to_string(), finding.clone()))
            .collect();
        all.push((
            ListId::ConcatItems.as_str().to_string(),
            self.finding(ListId::ConcatItems.as_str()),
        ));
        all.sort_by(|(a, _), (b, _)| a.cmp(b));

        // Derived from the list on every call
        all.extend((0..self.form.data_paths.len()).filter_map(|index| {
            self.form
                .data_path_finding(index)
                .map(|finding| (data_path_id(index), finding))
        }));
        all
    }

    /// Re-evaluate one field; no-op for fields without a path rule
    pub fn refresh_finding(&mut self, id: &str) {
        if let Some(spec) = validated_fields().find(|spec| spec.id == id) {
            if let Some(finding) = self.form.finding(spec.id) {
                self.findings.insert(spec.id, finding);
            }
        }
    }

    pub fn refresh_all_findings(&mut self) {
        for spec in validated_fields() {
            if let Some(finding) = self.form.finding(spec.id) {
                self.findings.insert(spec.id, finding);
            }
        }
    }

    pub fn set_concat_parse_error(&mut self, message: Option<String>) {
        self.concat_parse_error = message;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Re-render the preview if anything changed since the last render
    pub fn render_if_dirty(&mut self) -> bool {
        if !std::mem::take(&mut self.dirty) {
            return false;
        }
        self.preview.on_model_changed(&self.form)
    }

    pub fn reject(&mut self, message: impl Into<String>) {
        self.rejections.push(message.into());
    }

    pub fn take_rejections(&mut self) -> Vec<String> {
        std::mem::take(&mut self.rejections)
    }
}

/// Finding id of a data path row, e.g. `data_paths[2]`
pub fn data_path_id(index: usize) -> String {
    format!("{}[{}]", ListId::DataPaths.as_str(), index)
}

fn data_path_index(id: &str) -> Option<usize> {
    id.strip_prefix(ListId::DataPaths.as_str())?
        .strip_prefix('[')?
        .strip_suffix(']')?
        .parse()
        .ok()
}
