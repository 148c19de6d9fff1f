//! `search_space` section: optional parameter file and grid-search defaults

use super::writer::XmlWriter;
use super::Fields;

const NDCT_NOTE: &str =
    "DCT bases to account for low frequency drift. Generate (2 * nDCT + 1) cosine regressors";

pub(super) fn write(w: &mut XmlWriter, f: &Fields<'_>) {
    w.open(
        "search_space",
        &[("write_debug_info", f.lower_flag("write_debug"))],
    );
    w.blank();

    w.comment("(OPTIONAL) Use custom provided HRF/pRF sizes/grid");
    w.open(
        "optional_analysis_params",
        &[
            ("enable", f.py_flag("optional_params_enable")),
            ("filepath", f.path("optional_params_filepath").as_str()),
        ],
    );
    for (tag, use_id, key_id) in [
        ("hrf", "hrf_use_file", "hrf_key"),
        ("sigmas", "sigmas_use_file", "sigmas_key"),
        ("spatial_grid_xy", "spatial_grid_use_file", "spatial_grid_key"),
    ] {
        w.empty(
            tag,
            &[
                ("use_from_file", f.py_flag(use_id)),
                ("key", f.text(key_id).as_str()),
            ],
            None,
        );
    }
    w.close("optional_analysis_params");
    w.blank();

    w.comment("(DEFAULT) parameters when optional_analysis_params=False");
    w.comment("SPM HRF parameters");
    w.empty(
        "default_hrf",
        &[
            ("t", f.text("hrf_t").as_str()),
            ("TR", f.text("hrf_tr").as_str()),
            ("peak_delay", f.text("hrf_peak_delay").as_str()),
            ("under_shoot_delay", f.text("hrf_under_delay").as_str()),
            ("peak_disp", f.text("hrf_peak_disp").as_str()),
            ("under_disp", f.text("hrf_under_disp").as_str()),
            ("peak_to_undershoot", f.text("hrf_peak_to_under").as_str()),
            ("normalize", f.lower_flag("hrf_normalize")),
        ],
        None,
    );
    w.blank();
    w.empty(
        "default_spatial_grid",
        &[
            ("visual_field_radius", f.text("spatial_vf_radius").as_str()),
            ("num_horizontal_prfs", f.text("spatial_num_h").as_str()),
            ("num_vertical_prfs", f.text("spatial_num_v").as_str()),
        ],
        None,
    );
    w.blank();
    w.empty(
        "default_sigmas",
        &[
            ("num_sigmas", f.text("num_sigmas").as_str()),
            ("min_sigma", f.text("min_sigma").as_str()),
            ("max_sigma", f.text("max_sigma").as_str()),
        ],
        None,
    );
    w.empty(
        "nDCT",
        &[
            ("value", f.text("ndct_value").as_str()),
            ("comment", NDCT_NOTE),
        ],
        None,
    );
    w.blank();
    w.close("search_space");
    w.blank();
}
