use crate::{DomainError, Model};
use cud_value::CudValue;
use indexmap::IndexMap;

/// The stored values of one row, keyed by field name. Foreign keys are stored under the
/// relation field's name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: IndexMap<String, CudValue>,
}

impl Record {
    pub fn new(values: IndexMap<String, CudValue>) -> Self {
        Record { values }
    }

    pub fn get(&self, field: &str) -> Option<&CudValue> {
        self.values.get(field)
    }

    /// Missing fields read as null.
    pub fn get_or_null(&self, field: &str) -> CudValue {
        self.values.get(field).cloned().unwrap_or(CudValue::Null)
    }

    pub fn set(&mut self, field: impl Into<String>, value: CudValue) {
        self.values.insert(field.into(), value);
    }

    pub fn values(&self) -> &IndexMap<String, CudValue> {
        &self.values
    }

    pub fn into_values(self) -> IndexMap<String, CudValue> {
        self.values
    }

    pub fn id(&self, model: &Model) -> crate::Result<&CudValue> {
        let pk = &model.primary_key().name;

        self.values.get(pk).ok_or_else(|| DomainError::FieldNotFound {
            name: pk.clone(),
            model: model.name.clone(),
        })
    }
}

impl From<IndexMap<String, CudValue>> for Record {
    fn from(values: IndexMap<String, CudValue>) -> Self {
        Record::new(values)
    }
}
