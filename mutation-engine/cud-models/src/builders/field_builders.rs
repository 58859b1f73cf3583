use crate::{
    Choice, DefaultDescription, DefaultValue, DomainError, Field, OnDelete, RelationField, RelationKind, ScalarField,
    TypeIdentifier,
};
use cud_value::CudValue;

#[derive(Debug)]
pub(crate) enum FieldBuilder {
    Scalar(ScalarFieldBuilder),
    Relation(RelationFieldBuilder),
}

impl FieldBuilder {
    pub fn name(&self) -> &str {
        match self {
            FieldBuilder::Scalar(sf) => &sf.name,
            FieldBuilder::Relation(rf) => &rf.name,
        }
    }

    pub fn build(self, model: &str) -> crate::Result<Field> {
        match self {
            FieldBuilder::Scalar(sf) => sf.build(model).map(Field::Scalar),
            FieldBuilder::Relation(rf) => Ok(Field::Relation(rf.build(model))),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ScalarFieldBuilder {
    pub name: String,
    pub type_identifier: TypeIdentifier,
    pub is_nullable: bool,
    pub is_blank: bool,
    pub default_value: Option<DefaultDescription>,
    pub choices: Option<Vec<(serde_json::Value, String)>>,
    pub is_id: bool,
    pub is_unique: bool,
    pub is_autoincrement: bool,
    pub is_editable: bool,
    pub description: Option<String>,
}

impl ScalarFieldBuilder {
    /// The implicit `id` primary key of models that do not declare one.
    pub fn implicit_id() -> Self {
        ScalarFieldBuilder {
            name: "id".to_owned(),
            type_identifier: TypeIdentifier::Int,
            is_nullable: false,
            is_blank: false,
            default_value: None,
            choices: None,
            is_id: true,
            is_unique: true,
            is_autoincrement: true,
            is_editable: true,
            description: None,
        }
    }

    pub fn build(self, model: &str) -> crate::Result<ScalarField> {
        let typ = self.type_identifier;
        let literal = |value: serde_json::Value| -> crate::Result<CudValue> {
            let value = CudValue::try_from(value).map_err(|err| DomainError::InvalidDatamodel(err.to_string()))?;
            typ.coerce(value)
        };

        let default_value = match self.default_value {
            Some(DefaultDescription::Generator { generator }) => Some(DefaultValue::Generator(generator)),
            Some(DefaultDescription::Value { value }) => Some(DefaultValue::Single(literal(value)?)),
            None => None,
        };

        let choices = self
            .choices
            .map(|choices| {
                choices
                    .into_iter()
                    .map(|(value, label)| -> crate::Result<Choice> { Ok(Choice { value: literal(value)?, label }) })
                    .collect::<crate::Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(ScalarField {
            name: self.name,
            model: model.to_owned(),
            type_identifier: self.type_identifier,
            is_nullable: self.is_nullable,
            is_blank: self.is_blank,
            default_value,
            choices,
            is_id: self.is_id,
            is_unique: self.is_unique || self.is_id,
            is_autoincrement: self.is_autoincrement,
            is_editable: self.is_editable,
            description: self.description,
        })
    }
}

#[derive(Debug)]
pub(crate) struct RelationFieldBuilder {
    pub name: String,
    pub kind: RelationKind,
    pub related_model: String,
    pub related_field: Option<String>,
    pub is_nullable: bool,
    pub is_blank: bool,
    pub is_editable: bool,
    pub on_delete: OnDelete,
    pub description: Option<String>,
}

impl RelationFieldBuilder {
    pub fn build(self, model: &str) -> RelationField {
        RelationField {
            name: self.name,
            model: model.to_owned(),
            kind: self.kind,
            related_model: self.related_model,
            related_field: self.related_field,
            is_nullable: self.is_nullable,
            is_blank: self.is_blank,
            is_editable: self.is_editable,
            on_delete: self.on_delete,
            description: self.description,
        }
    }
}
