use super::{ParsedInputMap, ParsedInputValue};
use crate::{CoreError, CoreResult};
use cud_schema::{InputObjectType, OutputField, QuerySchema, ScalarType, TypeRef};
use cud_value::CudValue;
use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::str::FromStr;

/// Validates JSON arguments against the schema.
pub struct ArgumentParser<'a> {
    schema: &'a QuerySchema,
}

impl<'a> ArgumentParser<'a> {
    pub fn new(schema: &'a QuerySchema) -> Self {
        ArgumentParser { schema }
    }

    /// Parses the arguments given to `field`, keyed by argument source name. Missing
    /// optional arguments are left out, explicit nulls are kept.
    pub fn parse_arguments(
        &self,
        field: &OutputField,
        mut given: IndexMap<String, JsonValue>,
    ) -> CoreResult<ParsedInputMap> {
        if let Some(unknown) = given.keys().find(|name| field.find_argument(name).is_none()) {
            return Err(CoreError::input(format!(
                "Unknown argument `{}` on field `{}`.",
                unknown, field.name
            )));
        }

        let mut parsed = IndexMap::with_capacity(field.arguments.len());

        for argument in field.arguments() {
            let path = format!("{}.{}", field.name, argument.name);

            match given.shift_remove(&argument.name) {
                Some(value) => {
                    let value = self.parse_value(&path, &argument.field_type, value)?;
                    parsed.insert(argument.source_name.clone(), value);
                }
                None if argument.is_required() => return Err(CoreError::MissingRequiredValue { path }),
                None => (),
            }
        }

        Ok(parsed)
    }

    fn parse_value(&self, path: &str, type_ref: &TypeRef, value: JsonValue) -> CoreResult<ParsedInputValue> {
        match (type_ref, value) {
            (TypeRef::NonNull(_), JsonValue::Null) => Err(CoreError::MissingRequiredValue { path: path.to_owned() }),
            (TypeRef::NonNull(inner), value) => self.parse_value(path, inner, value),
            (_, JsonValue::Null) => Ok(ParsedInputValue::Single(CudValue::Null)),

            (TypeRef::List(inner), JsonValue::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| self.parse_value(&format!("{path}.{idx}"), inner, item))
                .collect::<CoreResult<Vec<_>>>()
                .map(ParsedInputValue::List),

            // A single value given for a list is a list of one.
            (TypeRef::List(inner), value) => Ok(ParsedInputValue::List(vec![self.parse_value(path, inner, value)?])),

            (TypeRef::Named(name), value) => self.parse_named(path, name, value),
        }
    }

    fn parse_named(&self, path: &str, name: &str, value: JsonValue) -> CoreResult<ParsedInputValue> {
        if let Some(input_object) = self.schema.input_object(name) {
            return self.parse_input_object(path, input_object, value);
        }

        if let Some(enum_type) = self.schema.enum_type(name) {
            return match &value {
                JsonValue::String(s) => enum_type
                    .value_for(s)
                    .cloned()
                    .map(ParsedInputValue::Single)
                    .ok_or_else(|| invalid_value(path, &value, name)),
                _ => Err(invalid_value(path, &value, name)),
            };
        }

        match ScalarType::from_str(name) {
            Ok(scalar) => parse_scalar(path, scalar, value).map(ParsedInputValue::Single),
            Err(_) => Err(CoreError::input(format!("Unknown input type `{name}` at `{path}`."))),
        }
    }

    fn parse_input_object(
        &self,
        path: &str,
        input_object: &InputObjectType,
        value: JsonValue,
    ) -> CoreResult<ParsedInputValue> {
        let JsonValue::Object(mut fields) = value else {
            return Err(invalid_value(path, &value, &input_object.name()));
        };

        if let Some(unknown) = fields.keys().find(|name| input_object.find_field(name).is_none()) {
            return Err(CoreError::input(format!(
                "Field `{}` is not defined by type `{}` at `{}`.",
                unknown,
                input_object.name(),
                path
            )));
        }

        let mut map = IndexMap::with_capacity(fields.len());

        for field in input_object.get_fields() {
            let field_path = format!("{path}.{}", field.name);

            match fields.remove(&field.name) {
                Some(value) => {
                    let value = self.parse_value(&field_path, &field.field_type, value)?;
                    map.insert(field.source_name.clone(), value);
                }
                None if field.is_required() => return Err(CoreError::MissingRequiredValue { path: field_path }),
                None => (),
            }
        }

        Ok(ParsedInputValue::Map(map))
    }
}

/// Checks the JSON shape of a scalar. Typed conversion to the stored representation
/// happens when the value is written.
fn parse_scalar(path: &str, scalar: ScalarType, value: JsonValue) -> CoreResult<CudValue> {
    let parsed = match (scalar, &value) {
        (ScalarType::ID | ScalarType::BigInt, JsonValue::Number(n)) if n.is_i64() => match scalar {
            ScalarType::ID => Some(CudValue::String(n.to_string())),
            _ => n.as_i64().map(CudValue::Int),
        },
        (ScalarType::Int, JsonValue::Number(n)) => n.as_i64().map(CudValue::Int),
        (ScalarType::Float | ScalarType::Decimal, JsonValue::Number(_)) => CudValue::try_from(value.clone()).ok(),
        (ScalarType::Boolean, JsonValue::Bool(b)) => Some(CudValue::Boolean(*b)),
        (ScalarType::Int | ScalarType::Float | ScalarType::Boolean, _) => None,
        (_, JsonValue::String(s)) => Some(CudValue::String(s.clone())),
        _ => None,
    };

    parsed.ok_or_else(|| invalid_value(path, &value, scalar.as_ref()))
}

fn invalid_value(path: &str, value: &JsonValue, expected: &str) -> CoreError {
    CoreError::input(format!("Invalid value {value} at `{path}`, expected {expected}."))
}
