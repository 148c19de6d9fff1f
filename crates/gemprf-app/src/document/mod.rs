//! Document assembler: form model → GEMpRF XML configuration
//!
//! [`assemble`] is pure and total. It reads the model, never mutates it, and
//! produces well-formed output for every reachable model state, however odd
//! the user's text. Sections are emitted in the fixed order the GEMpRF reader
//! expects:
//!
//! 1. `refine_fitting`
//! 2. `stimulus`
//! 3. `input_datasrc` (active branch + illustrative branch)
//! 4. `pRF_model`
//! 5. `measured_data`
//! 6. `gpu`
//! 7. `search_space`

mod datasrc;
mod search_space;
mod writer;

use gemprf_core::{lower_bool, normalize_separators, py_bool};

use crate::form::FormModel;
use writer::XmlWriter;

pub use datasrc::PLACEHOLDER_DATA_PATH;

/// Attribution block at the top of every generated document
pub const ATTRIBUTION: &str = r#"<!--
    "@Author        :   Siddharth Mittal",
    "@Contact       :   siddharth.mittal@meduniwien.ac.at",
    "@License       :   (C)Copyright 2024 - 2025, Medical University of Vienna",
    "@Cite DOI      :   https://doi.org/10.1016/j.media.2025.103891",
    "@Paper Title   :   GPU-Empowered Mapping of Population Receptive Fields for Large-Scale fMRI Analysis"
-->
"#;

/// MIME type of the generated document
pub const DOCUMENT_MIME_TYPE: &str = "application/xml";

/// Compile the whole form into the configuration document
pub fn assemble(model: &FormModel) -> String {
    let mut w = XmlWriter::new();
    let fields = Fields(model);

    w.verbatim(ATTRIBUTION);
    w.blank();
    w.open("root", &[("version", fields.text("version").as_str())]);

    write_refine_fitting(&mut w, &fields);
    w.blank();
    write_stimulus(&mut w, &fields);
    w.blank();

    w.comment("Input Data");
    w.open("input_datasrc", &[]);
    datasrc::write(&mut w, model);
    w.close("input_datasrc");
    w.blank();

    write_model_and_batches(&mut w, &fields);
    w.blank();
    write_gpu(&mut w, model);
    w.blank();
    search_space::write(&mut w, &fields);

    w.close("root");
    w.finish()
}

/// Typed accessors over the model used by every section
pub(crate) struct Fields<'a>(pub(crate) &'a FormModel);

impl Fields<'_> {
    pub(crate) fn text(&self, id: &str) -> String {
        self.0.text(id)
    }

    /// Path-like value with Windows separators normalized
    pub(crate) fn path(&self, id: &str) -> String {
        normalize_separators(&self.0.text(id))
    }

    pub(crate) fn py_flag(&self, id: &str) -> &'static str {
        py_bool(self.0.flag(id))
    }

    pub(crate) fn lower_flag(&self, id: &str) -> &'static str {
        lower_bool(self.0.flag(id))
    }
}

fn write_refine_fitting(w: &mut XmlWriter, f: &Fields<'_>) {
    w.empty(
        "refine_fitting",
        &[
            ("enable", f.py_flag("refine_enable")),
            ("refinefit_on_gpu", f.py_flag("refine_gpu")),
        ],
        Some("Execute refine fitting on GPU if sufficient GPU memory is available"),
    );
}

fn write_stimulus(w: &mut XmlWriter, f: &Fields<'_>) {
    w.comment("Stimulus data");
    w.open("stimulus", &[("comment", "Only in Nifti Format")]);
    w.comment("File path for stimulus directory");
    w.leaf("directory", f.path("stim_dir").as_str());
    w.leaf_with(
        "visual_field",
        &[],
        &f.text("visual_field"),
        Some("Visual field Radius"),
    );
    w.leaf("width", f.text("stim_width").as_str());
    w.leaf("height", f.text("stim_height").as_str());
    w.empty(
        "binarization",
        &[
            ("enable", f.py_flag("binarization_enable")),
            ("threshold", f.text("binarization_threshold").as_str()),
        ],
        Some("stimulus will be binarized if enabled, all values above threshold will be set to 1 and below to 0"),
    );
    w.blank();
    w.comment("Compute model signals with high-res stimulus then downsample");
    w.comment("\"num_frames_downsampled\" = your fMRI timecourse length");
    w.comment("\"slice_time_ref\" for details see https://www.alivelearn.net/?p=1037");
    w.empty(
        "high_temporal_resolution",
        &[
            ("enable", f.lower_flag("high_temporal_enable")),
            ("num_frames_downsampled", f.text("num_frames").as_str()),
            ("slice_time_ref", f.text("slice_time_ref").as_str()),
        ],
        None,
    );
    w.close("stimulus");
}

fn write_model_and_batches(w: &mut XmlWriter, f: &Fields<'_>) {
    w.comment("Analysis Model");
    w.open("pRF_model", &[]);
    w.leaf_with(
        "model",
        &[],
        &f.text("prf_model"),
        Some("2d_gaussian, (DoG, CSS not available at the moment)"),
    );
    w.close("pRF_model");
    w.blank();
    w.comment("Measured data section");
    w.open("measured_data", &[]);
    w.leaf("batches", f.text("batches").as_str());
    w.close("measured_data");
}

fn write_gpu(w: &mut XmlWriter, model: &FormModel) {
    w.comment("GPU configuration");
    w.open("gpu", &[]);
    w.comment("Default GPU");
    w.leaf("default_gpu", &model.text("default_gpu"));
    w.blank();
    w.comment("Additional available GPUs");
    w.open("additional_available_gpus", &[]);
    for index in model.gpus.non_blank() {
        w.leaf("gpu", index);
    }
    w.close("additional_available_gpus");
    w.close("gpu");
}
