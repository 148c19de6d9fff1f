//! `input_datasrc` section: BIDS or fixed paths
//!
//! Both sub-trees are always written. The active one carries the user's
//! values; the other is filled with fixed illustrative values so the document
//! keeps showing how to switch modes.

use super::writer::XmlWriter;
use super::Fields;
use crate::form::{BidsRunMode, ConcatItem, DataSourceMode, FormModel};

const BIDS_INTRO: &str = "Set to \"True\" if the input data is organized in BIDS format, select \"individual\" or \"concatenated\" run type";
const FIXED_INTRO: &str = "OR, make Bids False and specify directly single/multiple filepaths";
const RUN_TYPE_NOTE: &str = "options are individual/concatenated";
const SPACE_NOTE: &str = "e.g. fsaverage/fsnative/T1w or all";
const EXTENSION_NOTE: &str = "options are .nii.gz/.gii/both";
const MEASURED_DATA_NOTE: &str = "Add one or more measured-data filepaths here. Use a separate filepath block for each entry.";

/// Written when the data path list has no usable rows
pub const PLACEHOLDER_DATA_PATH: &str = "path/to/data/file.nii.gz";

pub(super) fn write(w: &mut XmlWriter, model: &FormModel) {
    match model.data_source() {
        DataSourceMode::Bids => {
            write_bids(w, model);
            write_fixed_paths_illustration(w);
        }
        DataSourceMode::FixedPaths => {
            write_bids_illustration(w);
            write_fixed_paths(w, model);
        }
    }
}

fn write_bids(w: &mut XmlWriter, model: &FormModel) {
    let f = Fields(model);
    let run_type = model.bids_run();

    w.comment(BIDS_INTRO);
    w.open(
        "BIDS",
        &[
            ("enable", "True"),
            ("run_type", run_type.as_str()),
            ("comment", RUN_TYPE_NOTE),
        ],
    );
    w.leaf("basepath", &f.path("bids_basepath"));
    w.leaf("append_to_basepath", &f.path("bids_append"));
    w.blank();
    w.comment("Directory name for results; backups created with timestamp if overwrite=\"True\"");
    w.leaf_with(
        "results_anaylsis_id",
        &[("overwrite", f.py_flag("results_overwrite"))],
        &f.text("results_id"),
        None,
    );
    w.blank();
    w.comment("NOTE: Case sensitive, provide the exact values!!! For analysis, sub, ses, task, run, hemi either provide comma separated values or specify \"all\"");
    w.leaf("analysis", &f.text("bids_analysis"));
    w.leaf("sub", &f.text("bids_sub"));
    w.leaf("hemi", &f.text("bids_hemi"));
    w.leaf_with("space", &[("comment", SPACE_NOTE)], &f.text("bids_space"), None);
    w.blank();
    w.comment("IMPORTANT: volumetric files will be flattend, and only files ending with '_bold.nii.gz' or '_bold.func.gii' will be processed");
    w.leaf_with(
        "input_file_extension",
        &[("comment", EXTENSION_NOTE)],
        &f.text("bids_extension"),
        None,
    );
    w.blank();

    match run_type {
        BidsRunMode::Individual => {
            w.comment("INDIVIDUAL Task/stimulus Analysis");
            w.open("individual", &[]);
            w.leaf_with(
                "task",
                &[],
                &f.text("individual_task"),
                Some("ONLY one value is allowed"),
            );
            w.leaf_with(
                "ses",
                &[],
                &f.text("individual_ses"),
                Some("comma separated values or \"all\""),
            );
            w.leaf_with(
                "run",
                &[],
                &f.text("individual_run"),
                Some("comma separated values or \"all\""),
            );
            w.close("individual");
        }
        BidsRunMode::Concatenated => {
            w.comment("CONCATENATED Analysis");
            w.open("concatenated", &[]);
            let mut rows: Vec<&ConcatItem> = model.concat_items.non_blank().collect();
            let placeholder = ConcatItem::placeholder();
            if rows.is_empty() {
                rows.push(&placeholder);
            }
            for item in rows {
                write_concat_item(w, item);
            }
            w.close("concatenated");
        }
    }

    w.close("BIDS");
    w.blank();
}

fn write_concat_item(w: &mut XmlWriter, item: &ConcatItem) {
    let note = Some("ONLY one value is allowed");
    w.open("concatenate_item", &[]);
    w.leaf_with("ses", &[], &item.ses, note);
    w.leaf_with("task", &[], &item.task, note);
    w.leaf_with("run", &[], &item.run, note);
    w.close("concatenate_item");
}

fn write_fixed_paths(w: &mut XmlWriter, model: &FormModel) {
    let f = Fields(model);

    w.comment(FIXED_INTRO);
    w.open("fixed_paths", &[]);
    w.leaf("stimulus_filepath", &f.path("fixed_stim_path"));
    w.open("measured_data_filepath", &[("comment", MEASURED_DATA_NOTE)]);
    let mut wrote_any = false;
    for path in model.data_paths.non_blank() {
        w.leaf("filepath", &gemprf_core::normalize_separators(path));
        wrote_any = true;
    }
    if !wrote_any {
        w.leaf("filepath", PLACEHOLDER_DATA_PATH);
    }
    w.close("measured_data_filepath");
    w.open("results", &[]);
    w.comment("directory for results");
    w.leaf("basepath", &f.path("fixed_results_basepath"));
    w.comment("Custom result filename postfix");
    w.leaf("custom_filename_postfix", &f.text("fixed_filename_postfix"));
    w.comment("Flag to prepend date");
    w.leaf("prepend_date", f.py_flag("fixed_prepend_date"));
    w.close("results");
    w.close("fixed_paths");
}

/// Disabled BIDS block shown while fixed paths are active
fn write_bids_illustration(w: &mut XmlWriter) {
    w.comment(BIDS_INTRO);
    w.open(
        "BIDS",
        &[
            ("enable", "False"),
            ("run_type", "individual"),
            ("comment", RUN_TYPE_NOTE),
        ],
    );
    w.leaf("basepath", "Path/to/data/BIDS");
    w.leaf("append_to_basepath", "derivatives, fmriprep");
    w.leaf_with(
        "results_anaylsis_id",
        &[("overwrite", "False")],
        "GEMDataAnalysisResults",
        None,
    );
    w.leaf("analysis", "01");
    w.leaf("sub", "all");
    w.leaf("hemi", "all");
    w.leaf_with("space", &[("comment", SPACE_NOTE)], "fsnative", None);
    w.leaf_with(
        "input_file_extension",
        &[("comment", EXTENSION_NOTE)],
        ".gii",
        None,
    );
    w.open("individual", &[]);
    w.leaf("task", "fixedbar");
    w.leaf("ses", "all");
    w.leaf("run", "all");
    w.close("individual");
    w.close("BIDS");
    w.blank();
}

/// Fixed paths block shown while BIDS is active
fn write_fixed_paths_illustration(w: &mut XmlWriter) {
    w.comment(FIXED_INTRO);
    w.open("fixed_paths", &[]);
    w.leaf(
        "stimulus_filepath",
        "D:/GEMpRF-DemoKit/example_data/stimuli/task-bar_apertures.nii.gz",
    );
    w.open("measured_data_filepath", &[("comment", MEASURED_DATA_NOTE)]);
    w.leaf("filepath", PLACEHOLDER_DATA_PATH);
    w.close("measured_data_filepath");
    w.open("results", &[]);
    w.leaf("basepath", "path/to/results/");
    w.leaf("custom_filename_postfix", "-sample");
    w.leaf("prepend_date", "True");
    w.close("results");
    w.close("fixed_paths");
}
