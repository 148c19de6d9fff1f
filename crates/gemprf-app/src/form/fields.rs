//! Field registry: every form control with its kind, default and help text

use gemprf_core::PathKind;

/// How a field's value is entered and interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Checkbox
    Flag,
    /// Numeric input (kept verbatim as typed)
    Number,
    /// Drop-down / radio group with a fixed set of options
    Choice(&'static [&'static str]),
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Flag => "flag",
            FieldKind::Number => "number",
            FieldKind::Choice(_) => "choice",
        }
    }
}

/// Built-in default of a field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Text(&'static str),
    Flag(bool),
    Number(f64),
}

/// Validation applied to path-like fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathRule {
    pub kind: PathKind,
    pub required_extension: Option<&'static str>,
}

impl PathRule {
    const fn directory() -> Self {
        Self {
            kind: PathKind::Directory,
            required_extension: None,
        }
    }

    const fn file(required_extension: Option<&'static str>) -> Self {
        Self {
            kind: PathKind::File,
            required_extension,
        }
    }
}

/// Static description of one form control
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub id: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
    pub rule: Option<PathRule>,
    pub help: &'static str,
}

pub const DATA_SOURCE_CHOICES: &[&str] = &["bids", "fixed_paths"];
pub const BIDS_RUN_CHOICES: &[&str] = &["individual", "concatenated"];
pub const BIDS_EXTENSION_CHOICES: &[&str] = &[".nii.gz", ".gii", "both"];
pub const VERSION_CHOICES: &[&str] = &["1.0"];
pub const PRF_MODEL_CHOICES: &[&str] = &["2d_gaussian"];

const fn text(id: &'static str, default: &'static str, help: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        kind: FieldKind::Text,
        default: FieldDefault::Text(default),
        rule: None,
        help,
    }
}

const fn path(
    id: &'static str,
    default: &'static str,
    rule: PathRule,
    help: &'static str,
) -> FieldSpec {
    FieldSpec {
        id,
        kind: FieldKind::Text,
        default: FieldDefault::Text(default),
        rule: Some(rule),
        help,
    }
}

const fn flag(id: &'static str, default: bool, help: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        kind: FieldKind::Flag,
        default: FieldDefault::Flag(default),
        rule: None,
        help,
    }
}

const fn number(id: &'static str, default: f64, help: &'static str) -> FieldSpec {
    FieldSpec {
        id,
        kind: FieldKind::Number,
        default: FieldDefault::Number(default),
        rule: None,
        help,
    }
}

const fn choice(
    id: &'static str,
    options: &'static [&'static str],
    default: &'static str,
    help: &'static str,
) -> FieldSpec {
    FieldSpec {
        id,
        kind: FieldKind::Choice(options),
        default: FieldDefault::Text(default),
        rule: None,
        help,
    }
}

/// Every scalar field of the form, in display order
pub const FIELDS: &[FieldSpec] = &[
    // ─────────────────────────────────────────────────────────
    // Document
    // ─────────────────────────────────────────────────────────
    choice("version", VERSION_CHOICES, "1.0",
        "The version of the GEMpRF configuration file format. This generator only supports the current version."),
    text("filename_datasrc", "",
        "This will be used in the generated filename. Provide a short identifier for your data source (e.g., HCP, NYU, your study name)."),
    text("filename_stimulus", "",
        "This will be used in the generated filename. Provide the type of stimulus/aperture used in your experiment (e.g., 'fixed bar', 'expanding ring'). Limited to 5 words."),
    text("filename_description", "",
        "This will be used in the generated filename. Provide a brief description of your analysis configuration (e.g., 'high res analysis'). Limited to 10 words."),
    // ─────────────────────────────────────────────────────────
    // Refine fitting
    // ─────────────────────────────────────────────────────────
    flag("refine_enable", true,
        "Enable or disable the refine fitting step, which performs optimization on the initial grid search results. If you have limited computational resources, you may choose to disable this step and instead use a sufficiently dense grid search."),
    flag("refine_gpu", true,
        "If enabled, the refine fitting will be executed on GPU (if available) for faster processing. Ensure sufficient GPU memory."),
    // ─────────────────────────────────────────────────────────
    // Stimulus
    // ─────────────────────────────────────────────────────────
    path("stim_dir", "path/to/stimuli/DIR_PATH", PathRule::directory(),
        "Path to the directory containing stimulus files in Nifti format (.nii or .nii.gz). NOTE: This should be a directory, not a single file."),
    number("visual_field", 13.5,
        "The radius of the visual field in degrees. This defines the spatial extent of the stimulus. Check your study paradigm for correct value."),
    number("stim_width", 101.0, "Width of the stimulus in pixels."),
    number("stim_height", 101.0, "Height of the stimulus in pixels."),
    flag("binarization_enable", false,
        "If enabled, the stimulus will be binarized using the specified threshold."),
    number("binarization_threshold", 0.5,
        "Threshold value for binarization. Values above this will be set to 1, below to 0."),
    flag("high_temporal_enable", false,
        "Enable if using high temporal resolution stimulus. The model will compute signals at high resolution then downsample."),
    number("num_frames", 300.0,
        "This should match your fMRI timecourse length. This is the number of frames after downsampling of a high temporal resolution stimulus."),
    number("slice_time_ref", 0.5,
        "Slice timing reference for temporal interpolation (0 to 1). See documentation for details."),
    // ─────────────────────────────────────────────────────────
    // Input data source
    // ─────────────────────────────────────────────────────────
    choice("data_type", DATA_SOURCE_CHOICES, "bids",
        "Choose whether your data is organized in BIDS format or you want to specify fixed file paths directly."),
    choice("bids_run_type", BIDS_RUN_CHOICES, "individual",
        "For BIDS data: choose 'individual' to analyze single runs, or 'concatenated' to combine multiple runs."),
    path("bids_basepath", "Path/to/data/BIDS", PathRule::directory(),
        "Root directory of your BIDS dataset."),
    text("bids_append", "derivatives, fmriprep",
        "Comma-separated subdirectories to append to the base path (e.g., 'derivatives, fmriprep'). These are the subdirectories inside BIDS basepath that could lead to 'analysis' folders."),
    text("results_id", "GEMDataAnalysisResults",
        "Identifier for this analysis run. Results will be saved in 'analysis-{id}' directory. You may choose any name."),
    flag("results_overwrite", false,
        "If disabled then, the existing results with the same analysis ID will be backed up with a timestamp, else the new results will be written in the existing results directory (files will be overwritten if already exist)."),
    text("bids_analysis", "01",
        "Analysis identifier(s). Use comma-separated values or 'all'. If 'all', the program would process all analyses available in the dataset."),
    text("bids_sub", "all",
        "Subject identifier(s). Use comma-separated values or 'all' to process all subjects. If 'all', the program would process all subjects in the current analysis."),
    text("bids_hemi", "all",
        "Hemisphere(s) to process. Use 'L', 'R', comma-separated, or 'all'. If 'all', both hemispheres will be processed."),
    text("bids_space", "fsnative",
        "Coordinate space of the data (e.g., 'fsnative', 'fsaverage', 'T1w'). Use 'all' for all available spaces."),
    choice("bids_extension", BIDS_EXTENSION_CHOICES, ".gii",
        "Input file extension: '.nii.gz' for volumetric, '.gii' for surface, or 'both' to process all available."),
    text("individual_task", "bar",
        "Task name for individual analysis. CAUTION: Only ONE value is allowed."),
    text("individual_ses", "all",
        "Session identifier(s). Use comma-separated values or 'all'. If you choose 'all', the program would process all sessions for the specified subject(s)."),
    text("individual_run", "all",
        "Run identifier(s). Use comma-separated values or 'all'. If you choose 'all', the program would process all runs for the specified session(s)."),
    path("fixed_stim_path", "path/to/stimulus/file.nii.gz", PathRule::file(Some(".nii.gz")),
        "Direct filepath to the stimulus file (.nii.gz format)."),
    path("fixed_results_basepath", "path/to/results/", PathRule::directory(),
        "Directory where results will be saved."),
    text("fixed_filename_postfix", "-sample",
        "Custom text to append to result filenames (e.g., '-sample')."),
    flag("fixed_prepend_date", true,
        "If enabled, current date will be prepended to result filenames."),
    // ─────────────────────────────────────────────────────────
    // Model, batching, devices
    // ─────────────────────────────────────────────────────────
    choice("prf_model", PRF_MODEL_CHOICES, "2d_gaussian",
        "Population receptive field model type. Currently only '2D Gaussian' is available."),
    number("batches", 4.0,
        "Number of batches for processing. Higher values use less memory but may be slower. This value decides how many fMRI voxels/vertices are processed together."),
    number("default_gpu", 0.0,
        "Index of the default GPU to use (typically 0 for the first GPU). Choose the one with the maximum free memory."),
    // ─────────────────────────────────────────────────────────
    // Search space
    // ─────────────────────────────────────────────────────────
    flag("write_debug", false,
        "If enabled, additional debug information will be written during processing. However, this may slow down the analysis."),
    flag("optional_params_enable", false,
        "Enable to use custom HRF, sigmas, and spatial grid from an external file instead of default parameters."),
    path("optional_params_filepath", "path/to/params/file.h5", PathRule::file(Some(".h5")),
        "Path to HDF5 file containing custom analysis parameters."),
    flag("hrf_use_file", false, "Use HRF (Hemodynamic Response Function) values from the parameters file."),
    text("hrf_key", "hrf", "HDF5 key/path to the HRF data in the parameters file."),
    flag("sigmas_use_file", false, "Use pRF size (sigma) values from the parameters file."),
    text("sigmas_key", "sigmas", "HDF5 key/path to the sigma values in the parameters file."),
    flag("spatial_grid_use_file", false, "Use spatial grid (x,y positions) from the parameters file."),
    text("spatial_grid_key", "spatial_grid_xy", "HDF5 key/path to the spatial grid in the parameters file."),
    text("hrf_t", "(0, 45)", "Time range for HRF in seconds (start, end). E.g., (0, 45)."),
    number("hrf_tr", 1.0, "Repetition time (TR) of your fMRI acquisition in seconds."),
    number("hrf_peak_delay", 6.0, "Peak delay parameter for SPM HRF model."),
    number("hrf_under_delay", 16.0, "Undershoot delay parameter for SPM HRF model."),
    number("hrf_peak_disp", 1.0, "Peak dispersion parameter for SPM HRF model."),
    number("hrf_under_disp", 1.0, "Undershoot dispersion parameter for SPM HRF model."),
    number("hrf_peak_to_under", 6.0, "Ratio of peak to undershoot for SPM HRF model."),
    flag("hrf_normalize", true, "If enabled, the HRF will be normalized to have a peak of 1."),
    number("spatial_vf_radius", 13.5, "Visual field radius in degrees for the default spatial grid."),
    number("spatial_num_h", 151.0, "Number of horizontal pRF positions in the grid search."),
    number("spatial_num_v", 151.0, "Number of vertical pRF positions in the grid search."),
    number("num_sigmas", 24.0, "Number of different pRF sizes (sigma values) to test in grid search."),
    number("min_sigma", 0.5, "Minimum pRF size (sigma) in degrees."),
    number("max_sigma", 5.0, "Maximum pRF size (sigma) in degrees."),
    number("ndct_value", 3.0,
        "Number of DCT (Discrete Cosine Transform) bases for modeling low-frequency drift. Generates (2 * nDCT + 1) regressors."),
];

/// Help text for the list-valued fields
pub const LIST_HELP: &[(&str, &str)] = &[
    ("data_paths", "One or more measured-data filepaths (fixed paths mode)."),
    ("gpus", "Indices of additional GPUs available for processing."),
    ("concat_items",
        "JSON array defining which runs to concatenate. Each item should specify ses, task, and run."),
];

/// Look up a field by identifier
pub fn field_spec(id: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.id == id)
}

/// Fields carrying a path validation rule
pub fn validated_fields() -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(|spec| spec.rule.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_ids_are_unique() {
        let mut seen = HashSet::new();
        for spec in FIELDS {
            assert!(seen.insert(spec.id), "duplicate field id {}", spec.id);
        }
    }

    #[test]
    fn test_defaults_match_kind() {
        for spec in FIELDS {
            match (spec.kind, spec.default) {
                (FieldKind::Flag, FieldDefault::Flag(_)) => {}
                (FieldKind::Number, FieldDefault::Number(_)) => {}
                (FieldKind::Text, FieldDefault::Text(_)) => {}
                (FieldKind::Choice(options), FieldDefault::Text(value)) => {
                    assert!(options.contains(&value), "{} default not an option", spec.id);
                }
                _ => panic!("{} default does not match its kind", spec.id),
            }
        }
    }

    #[test]
    fn test_every_field_has_help() {
        for spec in FIELDS {
            assert!(!spec.help.is_empty(), "{} has no help text", spec.id);
        }
    }

    #[test]
    fn test_validated_fields() {
        let ids: Vec<&str> = validated_fields().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                "stim_dir",
                "bids_basepath",
                "fixed_stim_path",
                "fixed_results_basepath",
                "optional_params_filepath"
            ]
        );
    }

    #[test]
    fn test_field_spec_lookup() {
        assert_eq!(
            field_spec("fixed_stim_path").and_then(|s| s.rule),
            Some(PathRule::file(Some(".nii.gz")))
        );
        assert!(field_spec("nope").is_none());
    }
}
