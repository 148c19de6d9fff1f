//! The form model: the single source of truth for every field's value

use std::collections::BTreeMap;

use gemprf_core::prelude::*;
use gemprf_core::{build_filename, validate_path, PathKind, ValidationFinding};
use serde::{Deserialize, Serialize};

use super::fields::{
    field_spec, FieldDefault, FieldKind, FieldSpec, BIDS_RUN_CHOICES, DATA_SOURCE_CHOICES, FIELDS,
};
use super::lists::{ConcatItem, ConcatList, DynamicList, ListId};

/// Current value of a scalar field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Render the value as it appears in the document
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.clone(),
            FieldValue::Flag(flag) => flag.to_string(),
            FieldValue::Number(n) => n.to_string(),
        }
    }

    /// Interpret the value as a checkbox state
    pub fn as_flag(&self) -> bool {
        match self {
            FieldValue::Flag(flag) => *flag,
            FieldValue::Number(n) => *n != 0.0,
            FieldValue::Text(text) => parse_flag(text).unwrap_or(false),
        }
    }
}

impl From<FieldDefault> for FieldValue {
    fn from(default: FieldDefault) -> Self {
        match default {
            FieldDefault::Text(text) => FieldValue::Text(text.to_string()),
            FieldDefault::Flag(flag) => FieldValue::Flag(flag),
            FieldDefault::Number(n) => FieldValue::Number(n),
        }
    }
}

/// Parse checkbox-ish text (`true`, `on`, `1`, ...)
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "checked" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mode selectors
// ─────────────────────────────────────────────────────────────────────────────

/// Where the measured data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceMode {
    #[default]
    Bids,
    FixedPaths,
}

impl DataSourceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceMode::Bids => "bids",
            DataSourceMode::FixedPaths => "fixed_paths",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "bids" => Ok(DataSourceMode::Bids),
            "fixed_paths" => Ok(DataSourceMode::FixedPaths),
            other => Err(Error::invalid_choice("data_type", other, DATA_SOURCE_CHOICES)),
        }
    }
}

/// How BIDS runs are analysed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidsRunMode {
    #[default]
    Individual,
    Concatenated,
}

impl BidsRunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidsRunMode::Individual => "individual",
            BidsRunMode::Concatenated => "concatenated",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "individual" => Ok(BidsRunMode::Individual),
            "concatenated" => Ok(BidsRunMode::Concatenated),
            other => Err(Error::invalid_choice("bids_run_type", other, BIDS_RUN_CHOICES)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Form model
// ─────────────────────────────────────────────────────────────────────────────

/// Every field of the form, both mode branches always allocated.
///
/// Switching a mode selector only changes which branch the assembler emits;
/// values entered in the inactive branch stay here untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FormModel {
    values: BTreeMap<&'static str, FieldValue>,
    data_source: DataSourceMode,
    bids_run: BidsRunMode,
    pub data_paths: DynamicList<String>,
    pub gpus: DynamicList<String>,
    pub concat_items: ConcatList,
}

impl Default for FormModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FormModel {
    /// Create a model populated with every built-in default
    pub fn new() -> Self {
        let values = FIELDS
            .iter()
            .filter(|spec| !is_mode_selector(spec.id))
            .map(|spec| (spec.id, FieldValue::from(spec.default)))
            .collect();

        Self {
            values,
            data_source: DataSourceMode::default(),
            bids_run: BidsRunMode::default(),
            data_paths: DynamicList::new(ListId::DataPaths, vec![String::new()]),
            gpus: DynamicList::new(ListId::Gpus, Vec::new()),
            concat_items: ConcatList::new(
                ListId::ConcatItems,
                vec![
                    ConcatItem::new("01", "bar", "1"),
                    ConcatItem::new("01", "bar", "2"),
                ],
            ),
        }
    }

    pub fn data_source(&self) -> DataSourceMode {
        self.data_source
    }

    pub fn set_data_source(&mut self, mode: DataSourceMode) {
        self.data_source = mode;
    }

    pub fn bids_run(&self) -> BidsRunMode {
        self.bids_run
    }

    pub fn set_bids_run(&mut self, mode: BidsRunMode) {
        self.bids_run = mode;
    }

    /// Current value of a field; `None` for unknown identifiers
    pub fn get(&self, id: &str) -> Option<FieldValue> {
        match id {
            "data_type" => Some(FieldValue::text(self.data_source.as_str())),
            "bids_run_type" => Some(FieldValue::text(self.bids_run.as_str())),
            _ => self.values.get(id).cloned(),
        }
    }

    /// Field value as text; unknown identifiers read as an empty string
    pub fn text(&self, id: &str) -> String {
        self.get(id).map(|v| v.as_text()).unwrap_or_default()
    }

    /// Field value as a checkbox state; unknown identifiers read as unchecked
    pub fn flag(&self, id: &str) -> bool {
        self.get(id).map(|v| v.as_flag()).unwrap_or(false)
    }

    /// Assign a field, checking the value against the field's kind.
    ///
    /// Rejected assignments leave the model unchanged.
    pub fn set(&mut self, id: &str, value: FieldValue) -> Result<()> {
        let spec = field_spec(id).ok_or_else(|| Error::unknown_field(id))?;

        match id {
            "data_type" => {
                self.data_source = DataSourceMode::parse(&value.as_text())?;
                return Ok(());
            }
            "bids_run_type" => {
                self.bids_run = BidsRunMode::parse(&value.as_text())?;
                return Ok(());
            }
            _ => {}
        }

        let value = coerce(spec, value)?;
        self.values.insert(spec.id, value);
        Ok(())
    }

    /// Re-classify a path field; `None` for fields without a path rule
    pub fn finding(&self, id: &str) -> Option<ValidationFinding> {
        let rule = field_spec(id)?.rule?;
        Some(validate_path(&self.text(id), rule.kind, rule.required_extension))
    }

    /// Classify one data path row; every row must name a file
    pub fn data_path_finding(&self, index: usize) -> Option<ValidationFinding> {
        self.data_paths
            .get(index)
            .map(|row| validate_path(row, PathKind::File, None))
    }

    /// Filename the document is downloaded under
    pub fn config_filename(&self) -> String {
        build_filename(
            &self.text("filename_datasrc"),
            &self.text("filename_stimulus"),
            &self.text("filename_description"),
        )
    }

    pub fn list_len(&self, list: ListId) -> usize {
        match list {
            ListId::DataPaths => self.data_paths.len(),
            ListId::Gpus => self.gpus.len(),
            ListId::ConcatItems => self.concat_items.len(),
        }
    }
}

fn is_mode_selector(id: &str) -> bool {
    matches!(id, "data_type" | "bids_run_type")
}

/// Normalize a value to the field's kind
fn coerce(spec: &FieldSpec, value: FieldValue) -> Result<FieldValue> {
    match spec.kind {
        FieldKind::Flag => match value {
            FieldValue::Flag(_) => Ok(value),
            FieldValue::Number(n) => Ok(FieldValue::Flag(n != 0.0)),
            FieldValue::Text(ref text) => parse_flag(text)
                .map(FieldValue::Flag)
                .ok_or_else(|| Error::invalid_choice(spec.id, text.as_str(), &["true", "false"])),
        },
        FieldKind::Choice(options) => {
            let text = value.as_text();
            if options.contains(&text.as_str()) {
                Ok(FieldValue::Text(text))
            } else {
                Err(Error::invalid_choice(spec.id, text, options))
            }
        }
        // Numbers stay exactly as typed so partial input like "0." survives
        FieldKind::Number | FieldKind::Text => match value {
            FieldValue::Flag(flag) => Ok(FieldValue::Text(flag.to_string())),
            other => Ok(other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gemprf_core::ValidationStatus;

    #[test]
    fn test_new_model_has_every_field() {
        let model = FormModel::new();
        for spec in FIELDS {
            assert!(model.get(spec.id).is_some(), "{} missing", spec.id);
        }
    }

    #[test]
    fn test_defaults_render_as_text() {
        let model = FormModel::new();
        assert_eq!(model.text("visual_field"), "13.5");
        assert_eq!(model.text("stim_width"), "101");
        assert_eq!(model.text("data_type"), "bids");
        assert_eq!(model.text("bids_run_type"), "individual");
        assert!(model.flag("refine_enable"));
        assert!(!model.flag("binarization_enable"));
    }

    #[test]
    fn test_unknown_field_reads_as_empty() {
        let model = FormModel::new();
        assert_eq!(model.text("does_not_exist"), "");
        assert!(!model.flag("does_not_exist"));
    }

    #[test]
    fn test_set_unknown_field_is_rejected() {
        let mut model = FormModel::new();
        let err = model.set("stim_dirr", FieldValue::text("/x")).unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_set_mode_selectors() {
        let mut model = FormModel::new();
        model
            .set("data_type", FieldValue::text("fixed_paths"))
            .unwrap();
        model
            .set("bids_run_type", FieldValue::text("concatenated"))
            .unwrap();
        assert_eq!(model.data_source(), DataSourceMode::FixedPaths);
        assert_eq!(model.bids_run(), BidsRunMode::Concatenated);
    }

    #[test]
    fn test_invalid_mode_leaves_model_unchanged() {
        let mut model = FormModel::new();
        let before = model.clone();
        assert!(model.set("data_type", FieldValue::text("csv")).is_err());
        assert!(model.set("bids_extension", FieldValue::text(".mgz")).is_err());
        assert_eq!(model, before);
    }

    #[test]
    fn test_flag_coercion() {
        let mut model = FormModel::new();
        model.set("refine_enable", FieldValue::text("off")).unwrap();
        assert!(!model.flag("refine_enable"));
        model.set("refine_enable", FieldValue::Number(1.0)).unwrap();
        assert!(model.flag("refine_enable"));
        assert!(model
            .set("refine_enable", FieldValue::text("maybe"))
            .is_err());
    }

    #[test]
    fn test_number_kept_as_typed() {
        let mut model = FormModel::new();
        model.set("visual_field", FieldValue::text("10.")).unwrap();
        assert_eq!(model.text("visual_field"), "10.");
    }

    #[test]
    fn test_finding_for_path_fields_only() {
        let mut model = FormModel::new();
        assert_eq!(
            model.finding("stim_dir").map(|f| f.status),
            Some(ValidationStatus::Empty)
        );
        model
            .set("stim_dir", FieldValue::text("/data/stimuli"))
            .unwrap();
        assert_eq!(
            model.finding("stim_dir").map(|f| f.status),
            Some(ValidationStatus::Ok)
        );
        assert!(model.finding("visual_field").is_none());
    }

    #[test]
    fn test_data_path_rows_are_classified_as_files() {
        let mut model = FormModel::new();
        assert_eq!(
            model.data_path_finding(0).map(|f| f.status),
            Some(ValidationStatus::Empty)
        );
        model
            .data_paths
            .set_at(0, "/data/sub-01/bold".to_string())
            .unwrap();
        assert_eq!(
            model.data_path_finding(0).map(|f| f.status),
            Some(ValidationStatus::Warning)
        );
        model
            .data_paths
            .set_at(0, "/data/sub-01_bold.nii.gz".to_string())
            .unwrap();
        assert_eq!(
            model.data_path_finding(0).map(|f| f.status),
            Some(ValidationStatus::Ok)
        );
        assert!(model.data_path_finding(1).is_none());
    }

    #[test]
    fn test_config_filename_uses_filename_fields() {
        let mut model = FormModel::new();
        assert_eq!(model.config_filename(), "config-gemprf.xml");
        model
            .set("filename_datasrc", FieldValue::text("NYU"))
            .unwrap();
        assert_eq!(model.config_filename(), "config-gemprf_data-NYU.xml");
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("perhaps"), None);
    }
}
