//! Form state: field registry, model, and repeatable lists

pub mod fields;
pub mod lists;
pub mod model;

pub use fields::{
    field_spec, validated_fields, FieldDefault, FieldKind, FieldSpec, PathRule, FIELDS, LIST_HELP,
};
pub use lists::{ConcatItem, ConcatList, ConcatPart, DynamicList, ListId};
pub use model::{parse_flag, BidsRunMode, DataSourceMode, FieldValue, FormModel};
