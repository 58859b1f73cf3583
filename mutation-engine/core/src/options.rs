//! Declarative options of generated mutations.

use cud_schema::{to_camel_case, to_snake_case, IdentifierType};
use indexmap::IndexMap;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    Create,
    Update,
    Patch,
    Delete,
    BatchCreate,
    BatchUpdate,
    BatchPatch,
    BatchDelete,
    FilterDelete,
    FilterUpdate,
}

impl MutationKind {
    pub fn pascal_name(self) -> &'static str {
        match self {
            MutationKind::Create => "Create",
            MutationKind::Update => "Update",
            MutationKind::Patch => "Patch",
            MutationKind::Delete => "Delete",
            MutationKind::BatchCreate => "BatchCreate",
            MutationKind::BatchUpdate => "BatchUpdate",
            MutationKind::BatchPatch => "BatchPatch",
            MutationKind::BatchDelete => "BatchDelete",
            MutationKind::FilterDelete => "FilterDelete",
            MutationKind::FilterUpdate => "FilterUpdate",
        }
    }

    pub fn snake_name(self) -> &'static str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Patch => "patch",
            MutationKind::Delete => "delete",
            MutationKind::BatchCreate => "batch_create",
            MutationKind::BatchUpdate => "batch_update",
            MutationKind::BatchPatch => "batch_patch",
            MutationKind::BatchDelete => "batch_delete",
            MutationKind::FilterDelete => "filter_delete",
            MutationKind::FilterUpdate => "filter_update",
        }
    }

    /// Batch writes return a list of records under a plural return field.
    pub fn is_batch_write(self) -> bool {
        matches!(
            self,
            MutationKind::BatchCreate | MutationKind::BatchUpdate | MutationKind::BatchPatch
        )
    }

    /// Kinds whose data input makes every field optional.
    pub fn is_partial(self) -> bool {
        matches!(
            self,
            MutationKind::Patch | MutationKind::BatchPatch | MutationKind::FilterUpdate
        )
    }

    /// Kinds writing fields from an input object.
    pub fn has_data_input(self) -> bool {
        !matches!(
            self,
            MutationKind::Delete | MutationKind::BatchDelete | MutationKind::FilterDelete
        )
    }

    /// Identifier of the generated data input type of a kind.
    pub fn input_identifier(self, model: &str) -> Option<IdentifierType> {
        let model = model.to_owned();

        match self {
            MutationKind::Create => Some(IdentifierType::CreateInput(model)),
            MutationKind::Update => Some(IdentifierType::UpdateInput(model)),
            MutationKind::Patch => Some(IdentifierType::PatchInput(model)),
            MutationKind::BatchCreate => Some(IdentifierType::BatchCreateInput(model)),
            MutationKind::BatchUpdate => Some(IdentifierType::BatchUpdateInput(model)),
            MutationKind::BatchPatch => Some(IdentifierType::BatchPatchInput(model)),
            MutationKind::FilterDelete => Some(IdentifierType::FilterDeleteInput(model)),
            MutationKind::FilterUpdate => Some(IdentifierType::FilterUpdateDataInput(model)),
            MutationKind::Delete | MutationKind::BatchDelete => None,
        }
    }
}

/// What a relation operation field does to the related set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationOperation {
    Add,
    Remove,
    Exact,
}

impl FromStr for RelationOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(RelationOperation::Add),
            "remove" => Ok(RelationOperation::Remove),
            "exact" => Ok(RelationOperation::Exact),
            _ => Err(format!("`{s}` is not a relation operation.")),
        }
    }
}

/// Options shaping a generated input object. Nested inputs of relation extras take the
/// same options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputOptions {
    pub only_fields: Option<Vec<String>>,
    pub exclude_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    pub required_fields: Vec<String>,
    /// GraphQL type overrides in SDL notation, e.g. `[ID!]!`.
    pub field_types: IndexMap<String, String>,
    pub foreign_key_extras: IndexMap<String, ExtraOptions>,
    pub one_to_one_extras: IndexMap<String, ExtraOptions>,
    pub many_to_many_extras: IndexMap<String, IndexMap<String, ExtraEntry>>,
    pub many_to_one_extras: IndexMap<String, IndexMap<String, ExtraEntry>>,
}

impl InputOptions {
    pub fn includes(&self, field: &str) -> bool {
        let listed = self
            .only_fields
            .as_ref()
            .map(|only| only.iter().any(|f| f == field))
            .unwrap_or(true);

        listed && !self.exclude_fields.iter().any(|f| f == field)
    }

    pub fn is_optional(&self, field: &str) -> bool {
        self.optional_fields.iter().any(|f| f == field)
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields.iter().any(|f| f == field)
    }

    fn has_extras(&self) -> bool {
        !self.foreign_key_extras.is_empty()
            || !self.one_to_one_extras.is_empty()
            || !self.many_to_many_extras.is_empty()
            || !self.many_to_one_extras.is_empty()
    }

    /// Every field name the options mention.
    pub fn referenced_fields(&self) -> impl Iterator<Item = &String> {
        self.only_fields
            .iter()
            .flatten()
            .chain(&self.exclude_fields)
            .chain(&self.optional_fields)
            .chain(&self.required_fields)
            .chain(self.field_types.keys())
            .chain(self.foreign_key_extras.keys())
            .chain(self.one_to_one_extras.keys())
            .chain(self.many_to_many_extras.keys())
            .chain(self.many_to_one_extras.keys())
    }
}

/// Options of a relation extra.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtraOptions {
    /// `ID`, `auto` or the name of an existing input type.
    #[serde(rename = "type")]
    pub type_: Option<String>,
    /// Name of the input generated for `type: auto`.
    pub type_name: Option<String>,
    /// Operation of a to-many extra whose key is not an operation name.
    pub operation: Option<RelationOperation>,
    #[serde(flatten)]
    pub input: InputOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtraType {
    Id,
    Auto,
    Named(String),
}

impl ExtraOptions {
    /// Extras without a `type` take ids, unless they configure the nested input.
    pub fn extra_type(&self) -> ExtraType {
        match self.type_.as_deref() {
            Some("ID") => ExtraType::Id,
            Some("auto") => ExtraType::Auto,
            Some(name) => ExtraType::Named(name.to_owned()),
            None if self.input.has_extras() || self.type_name.is_some() => ExtraType::Auto,
            None => ExtraType::Id,
        }
    }
}

/// An entry of a to-many extra: `true` enables the operation with default options.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExtraEntry {
    Enabled(bool),
    Options(ExtraOptions),
}

impl ExtraEntry {
    pub fn options(&self) -> Option<ExtraOptions> {
        match self {
            ExtraEntry::Enabled(true) => Some(ExtraOptions::default()),
            ExtraEntry::Enabled(false) => None,
            ExtraEntry::Options(options) => Some(options.clone()),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Options of one generated mutation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationOptions {
    pub model: String,
    pub kind: MutationKind,
    /// Name of the payload type.
    #[serde(default)]
    pub name: Option<String>,
    /// Name of the root mutation field.
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub login_required: bool,
    #[serde(default)]
    pub return_field_name: Option<String>,
    /// Name of the generated data input type.
    #[serde(default)]
    pub type_name: Option<String>,
    /// Reuse an input type generated for another mutation instead of generating one.
    #[serde(default)]
    pub use_type_name: Option<String>,
    /// Model field -> context key. Context values are written unless the input sets the field.
    #[serde(default)]
    pub auto_context_fields: IndexMap<String, String>,
    /// Filter paths (`field__relation__field__lookup`) of filter mutations.
    #[serde(default)]
    pub filter_fields: Vec<String>,
    #[serde(default = "default_true")]
    pub ignore_primary_key: bool,
    #[serde(flatten)]
    pub input: InputOptions,
}

impl MutationOptions {
    pub fn new(model: impl Into<String>, kind: MutationKind) -> Self {
        MutationOptions {
            model: model.into(),
            kind,
            name: None,
            field_name: None,
            permissions: Vec::new(),
            login_required: false,
            return_field_name: None,
            type_name: None,
            use_type_name: None,
            auto_context_fields: IndexMap::new(),
            filter_fields: Vec::new(),
            ignore_primary_key: true,
            input: InputOptions::default(),
        }
    }

    /// Mutations with permissions always require a login.
    pub fn login_required(&self) -> bool {
        self.login_required || !self.permissions.is_empty()
    }

    pub fn payload_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => IdentifierType::Payload {
                kind: self.kind.pascal_name().to_owned(),
                model: self.model.clone(),
            }
            .name(),
        }
    }

    pub fn field_name(&self, auto_camelcase: bool) -> String {
        if let Some(name) = &self.field_name {
            return name.clone();
        }

        let snake = format!("{}_{}", self.kind.snake_name(), to_snake_case(&self.model));

        if auto_camelcase {
            to_camel_case(&snake)
        } else {
            snake
        }
    }

    pub fn return_field_name(&self) -> String {
        match &self.return_field_name {
            Some(name) => name.clone(),
            None if self.kind.is_batch_write() => format!("{}s", to_snake_case(&self.model)),
            None => to_snake_case(&self.model),
        }
    }

    /// Name of the data input type, `None` for kinds without one.
    pub fn input_type_name(&self) -> Option<String> {
        if let Some(name) = &self.use_type_name {
            return Some(name.clone());
        }

        let identifier = self.kind.input_identifier(&self.model)?;

        Some(self.type_name.clone().unwrap_or_else(|| identifier.name()))
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_login_required(mut self) -> Self {
        self.login_required = true;
        self
    }

    pub fn with_input(mut self, input: InputOptions) -> Self {
        self.input = input;
        self
    }

    pub fn with_filter_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.filter_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_names() {
        let options = MutationOptions::new("CatOwner", MutationKind::BatchDelete);

        assert_eq!(options.field_name(true), "batchDeleteCatOwner");
        assert_eq!(options.field_name(false), "batch_delete_cat_owner");
        assert_eq!(options.payload_name(), "BatchDeleteCatOwnerMutation");
        assert_eq!(options.return_field_name(), "cat_owner");
        assert_eq!(options.input_type_name(), None);

        let options = MutationOptions::new("Cat", MutationKind::BatchPatch);
        assert_eq!(options.return_field_name(), "cats");
        assert_eq!(options.input_type_name().as_deref(), Some("BatchPatchCatInput"));
    }

    #[test]
    fn permissions_imply_login() {
        let options = MutationOptions::new("Cat", MutationKind::Delete);
        assert!(!options.login_required());
        assert!(options.clone().with_permissions(["cats.delete_cat"]).login_required());
        assert!(options.with_login_required().login_required());
    }

    #[test]
    fn extras_deserialize_from_json() {
        let options: MutationOptions = serde_json::from_value(serde_json::json!({
            "model": "Cat",
            "kind": "update",
            "foreignKeyExtras": { "owner": { "type": "auto", "excludeFields": ["cats"] } },
            "manyToManyExtras": {
                "enemies": {
                    "add": { "type": "CreateDogInput" },
                    "add_by_id": { "type": "ID", "operation": "add" },
                    "remove": true
                }
            }
        }))
        .unwrap();

        let owner = &options.input.foreign_key_extras["owner"];
        assert_eq!(owner.extra_type(), ExtraType::Auto);
        assert_eq!(owner.input.exclude_fields, vec!["cats".to_owned()]);

        let enemies = &options.input.many_to_many_extras["enemies"];
        assert_eq!(
            enemies["add"].options().unwrap().extra_type(),
            ExtraType::Named("CreateDogInput".into())
        );
        assert_eq!(
            enemies["add_by_id"].options().unwrap().operation,
            Some(RelationOperation::Add)
        );
        assert_eq!(enemies["remove"].options().unwrap().extra_type(), ExtraType::Id);
        assert!(options.ignore_primary_key);
    }
}
