//! The serialized datamodel description the internal data model is built from.
//!
//! ```json
//! {
//!   "models": [
//!     {
//!       "name": "Cat",
//!       "fields": [
//!         { "name": "name", "type": "String" },
//!         { "name": "owner", "type": "ForeignKey", "to": "User", "relatedName": "cats" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Models without a `primaryKey` field get an autoincrementing `id`.

use crate::{DefaultGenerator, OnDelete};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datamodel {
    #[serde(default)]
    pub models: Vec<ModelDescription>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescription {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescription>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescription {
    pub name: String,

    /// A scalar type name or one of `ForeignKey`, `OneToOne`, `ManyToMany`.
    #[serde(rename = "type")]
    pub field_type: String,

    /// Target model of a relation. `self` points at the declaring model.
    #[serde(default)]
    pub to: Option<String>,

    /// Name of the reverse accessor on the target model. `+` suppresses it.
    #[serde(default)]
    pub related_name: Option<String>,

    #[serde(default)]
    pub null: bool,

    #[serde(default)]
    pub blank: bool,

    #[serde(default)]
    pub default: Option<DefaultDescription>,

    /// `[value, label]` pairs.
    #[serde(default)]
    pub choices: Option<Vec<(serde_json::Value, String)>>,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub autoincrement: bool,

    #[serde(default = "default_editable")]
    pub editable: bool,

    #[serde(default)]
    pub on_delete: OnDelete,

    #[serde(default)]
    pub help_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DefaultDescription {
    Generator { generator: DefaultGenerator },
    Value { value: serde_json::Value },
}

fn default_editable() -> bool {
    true
}
