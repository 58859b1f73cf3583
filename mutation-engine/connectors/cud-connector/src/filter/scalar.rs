use cud_value::CudValue;
use std::str::FromStr;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct ScalarFilter {
    pub field: String,
    pub condition: ScalarCondition,
}

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub enum ScalarCondition {
    Equals(CudValue),
    IEquals(CudValue),
    Contains(CudValue),
    IContains(CudValue),
    StartsWith(CudValue),
    IStartsWith(CudValue),
    EndsWith(CudValue),
    IEndsWith(CudValue),
    In(Vec<CudValue>),
    GreaterThan(CudValue),
    GreaterThanOrEquals(CudValue),
    LessThan(CudValue),
    LessThanOrEquals(CudValue),
    IsNull(bool),
}

/// The `__lookup` suffixes a filter path can end with.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum Lookup {
    Exact,
    IExact,
    Contains,
    IContains,
    StartsWith,
    IStartsWith,
    EndsWith,
    IEndsWith,
    In,
    Gt,
    Gte,
    Lt,
    Lte,
    IsNull,
}

impl Lookup {
    pub fn condition(self, value: CudValue) -> ScalarCondition {
        match self {
            Lookup::Exact => ScalarCondition::Equals(value),
            Lookup::IExact => ScalarCondition::IEquals(value),
            Lookup::Contains => ScalarCondition::Contains(value),
            Lookup::IContains => ScalarCondition::IContains(value),
            Lookup::StartsWith => ScalarCondition::StartsWith(value),
            Lookup::IStartsWith => ScalarCondition::IStartsWith(value),
            Lookup::EndsWith => ScalarCondition::EndsWith(value),
            Lookup::IEndsWith => ScalarCondition::IEndsWith(value),
            Lookup::In => ScalarCondition::In(value.into_list().unwrap_or_default()),
            Lookup::Gt => ScalarCondition::GreaterThan(value),
            Lookup::Gte => ScalarCondition::GreaterThanOrEquals(value),
            Lookup::Lt => ScalarCondition::LessThan(value),
            Lookup::Lte => ScalarCondition::LessThanOrEquals(value),
            Lookup::IsNull => ScalarCondition::IsNull(matches!(value, CudValue::Boolean(true))),
        }
    }

    /// Lookups applying to text only.
    pub fn is_textual(self) -> bool {
        matches!(
            self,
            Lookup::IExact
                | Lookup::Contains
                | Lookup::IContains
                | Lookup::StartsWith
                | Lookup::IStartsWith
                | Lookup::EndsWith
                | Lookup::IEndsWith
        )
    }
}

impl FromStr for Lookup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(Lookup::Exact),
            "iexact" => Ok(Lookup::IExact),
            "contains" => Ok(Lookup::Contains),
            "icontains" => Ok(Lookup::IContains),
            "startswith" => Ok(Lookup::StartsWith),
            "istartswith" => Ok(Lookup::IStartsWith),
            "endswith" => Ok(Lookup::EndsWith),
            "iendswith" => Ok(Lookup::IEndsWith),
            "in" => Ok(Lookup::In),
            "gt" => Ok(Lookup::Gt),
            "gte" => Ok(Lookup::Gte),
            "lt" => Ok(Lookup::Lt),
            "lte" => Ok(Lookup::Lte),
            "isnull" => Ok(Lookup::IsNull),
            _ => Err(format!("`{s}` is not a known lookup.")),
        }
    }
}
