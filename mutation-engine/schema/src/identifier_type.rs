use crate::to_pascal_case;

/// Unique names of generated schema types. Mutation inputs are named after the model,
/// nested inputs after the input they are nested in.
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub enum IdentifierType {
    Query,
    Mutation,
    Node,
    CreateInput(String),
    UpdateInput(String),
    PatchInput(String),
    BatchCreateInput(String),
    BatchUpdateInput(String),
    BatchPatchInput(String),
    FilterDeleteInput(String),
    FilterUpdateFilterInput(String),
    FilterUpdateDataInput(String),
    /// Input generated for a relation field of another input, e.g. a foreign key
    /// extra with `type: auto` or a many-to-many `add` operation.
    NestedInput {
        parent: String,
        field: String,
        operation: Option<String>,
    },
    /// Enum of the allowed values of a field with choices.
    ChoiceEnum {
        model: String,
        field: String,
    },
    /// Payload type of a mutation, e.g. `DeleteCatMutation`.
    Payload {
        kind: String,
        model: String,
    },
    Raw(String),
}

impl IdentifierType {
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierType::Raw(s) => f.write_str(s),
            IdentifierType::Query => f.write_str("Query"),
            IdentifierType::Mutation => f.write_str("Mutation"),
            IdentifierType::Node => f.write_str("Node"),
            IdentifierType::CreateInput(model) => write!(f, "Create{model}Input"),
            IdentifierType::UpdateInput(model) => write!(f, "Update{model}Input"),
            IdentifierType::PatchInput(model) => write!(f, "Patch{model}Input"),
            IdentifierType::BatchCreateInput(model) => write!(f, "BatchCreate{model}Input"),
            IdentifierType::BatchUpdateInput(model) => write!(f, "BatchUpdate{model}Input"),
            IdentifierType::BatchPatchInput(model) => write!(f, "BatchPatch{model}Input"),
            IdentifierType::FilterDeleteInput(model) => write!(f, "FilterDelete{model}Input"),
            IdentifierType::FilterUpdateFilterInput(model) => write!(f, "FilterUpdate{model}FilterInput"),
            IdentifierType::FilterUpdateDataInput(model) => write!(f, "FilterUpdate{model}DataInput"),
            IdentifierType::NestedInput {
                parent,
                field,
                operation,
            } => {
                let parent = parent.strip_suffix("Input").unwrap_or(parent);
                let operation = operation.as_deref().map(to_pascal_case).unwrap_or_default();

                write!(f, "{}{}{}Input", parent, to_pascal_case(field), operation)
            }
            IdentifierType::ChoiceEnum { model, field } => write!(f, "{}{}", model, to_pascal_case(field)),
            IdentifierType::Payload { kind, model } => write!(f, "{kind}{model}Mutation"),
        }
    }
}

impl From<String> for IdentifierType {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for IdentifierType {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_input_names() {
        let nested = IdentifierType::NestedInput {
            parent: "CreateCatInput".into(),
            field: "owner".into(),
            operation: None,
        };
        assert_eq!(nested.name(), "CreateCatOwnerInput");

        let nested = IdentifierType::NestedInput {
            parent: "UpdateUserInput".into(),
            field: "best_friends".into(),
            operation: Some("add".into()),
        };
        assert_eq!(nested.name(), "UpdateUserBestFriendsAddInput");
    }

    #[test]
    fn generated_type_names() {
        assert_eq!(IdentifierType::FilterUpdateDataInput("Dog".into()).name(), "FilterUpdateDogDataInput");
        assert_eq!(
            IdentifierType::ChoiceEnum {
                model: "Cat".into(),
                field: "fur_color".into()
            }
            .name(),
            "CatFurColor"
        );
        assert_eq!(
            IdentifierType::Payload {
                kind: "BatchDelete".into(),
                model: "Mouse".into()
            }
            .name(),
            "BatchDeleteMouseMutation"
        );
    }
}
