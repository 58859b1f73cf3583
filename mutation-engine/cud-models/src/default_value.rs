use cud_value::CudValue;
use serde::Deserialize;

/// Value a scalar field receives when a create leaves it unset.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Single(CudValue),
    Generator(DefaultGenerator),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultGenerator {
    Now,
    Today,
    Uuid4,
}

impl DefaultValue {
    pub fn new_single(value: CudValue) -> Self {
        DefaultValue::Single(value)
    }

    pub fn is_generator(&self) -> bool {
        matches!(self, DefaultValue::Generator(_))
    }

    pub fn get(&self) -> CudValue {
        match self {
            DefaultValue::Single(value) => value.clone(),
            DefaultValue::Generator(generator) => generator.generate(),
        }
    }
}

impl DefaultGenerator {
    pub fn generate(&self) -> CudValue {
        match self {
            DefaultGenerator::Now => CudValue::DateTime(chrono::Utc::now().fixed_offset()),
            DefaultGenerator::Today => CudValue::Date(chrono::Utc::now().date_naive()),
            DefaultGenerator::Uuid4 => CudValue::Uuid(uuid::Uuid::new_v4()),
        }
    }
}
