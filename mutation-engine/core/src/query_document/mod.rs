//! Parsed mutation arguments.
//!
//! Arguments arrive as JSON, keyed by GraphQL names. Parsing validates them against the
//! argument and input object types of the schema and re-keys input objects by source
//! name, so the executor and hooks see model field and operation names.

mod parser;

pub use parser::*;

use cud_value::CudValue;
use indexmap::IndexMap;

pub type ParsedInputMap = IndexMap<String, ParsedInputValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedInputValue {
    Single(CudValue),
    List(Vec<ParsedInputValue>),
    Map(ParsedInputMap),
}

impl ParsedInputValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ParsedInputValue::Single(CudValue::Null))
    }

    pub fn as_single(&self) -> Option<&CudValue> {
        match self {
            ParsedInputValue::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_map(self) -> Option<ParsedInputMap> {
        match self {
            ParsedInputValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<Vec<ParsedInputValue>> {
        match self {
            ParsedInputValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// Flattens the value, turning maps into objects.
    pub fn into_value(self) -> CudValue {
        match self {
            ParsedInputValue::Single(value) => value,
            ParsedInputValue::List(values) => {
                CudValue::List(values.into_iter().map(ParsedInputValue::into_value).collect())
            }
            ParsedInputValue::Map(map) => {
                CudValue::Object(map.into_iter().map(|(k, v)| (k, v.into_value())).collect())
            }
        }
    }
}

impl From<CudValue> for ParsedInputValue {
    fn from(value: CudValue) -> Self {
        ParsedInputValue::Single(value)
    }
}
