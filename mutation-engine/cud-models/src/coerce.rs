use crate::{DomainError, TypeIdentifier};
use bigdecimal::{BigDecimal, FromPrimitive};
use cud_value::{parse_date, parse_datetime, parse_time, CudValue};
use std::str::FromStr;
use uuid::Uuid;

impl TypeIdentifier {
    /// Converts a loosely typed input value into the representation the field is stored with.
    /// Ids arrive as strings, so every type accepts its textual form. Nulls pass through.
    pub fn coerce(&self, value: CudValue) -> crate::Result<CudValue> {
        match (self, value) {
            (_, CudValue::Null) => Ok(CudValue::Null),
            (_, CudValue::List(values)) => values
                .into_iter()
                .map(|v| self.coerce(v))
                .collect::<crate::Result<Vec<_>>>()
                .map(CudValue::List),

            (TypeIdentifier::String | TypeIdentifier::Upload, CudValue::String(s) | CudValue::Enum(s)) => {
                Ok(CudValue::String(s))
            }
            (TypeIdentifier::String, CudValue::Int(i)) => Ok(CudValue::String(i.to_string())),

            (TypeIdentifier::Int, CudValue::Int(i) | CudValue::BigInt(i)) => Ok(CudValue::Int(i)),
            (TypeIdentifier::BigInt, CudValue::Int(i) | CudValue::BigInt(i)) => Ok(CudValue::BigInt(i)),
            (TypeIdentifier::Int, CudValue::String(s)) => parse_int(&s).map(CudValue::Int),
            (TypeIdentifier::BigInt, CudValue::String(s)) => parse_int(&s).map(CudValue::BigInt),

            (TypeIdentifier::Float, CudValue::Float(d) | CudValue::Decimal(d)) => Ok(CudValue::Float(d)),
            (TypeIdentifier::Decimal, CudValue::Float(d) | CudValue::Decimal(d)) => Ok(CudValue::Decimal(d)),
            (TypeIdentifier::Float, CudValue::Int(i)) => Ok(CudValue::Float(int_to_decimal(i)?)),
            (TypeIdentifier::Decimal, CudValue::Int(i)) => Ok(CudValue::Decimal(int_to_decimal(i)?)),
            (TypeIdentifier::Float, CudValue::String(s)) => parse_decimal(&s).map(CudValue::Float),
            (TypeIdentifier::Decimal, CudValue::String(s)) => parse_decimal(&s).map(CudValue::Decimal),

            (TypeIdentifier::Boolean, CudValue::Boolean(b)) => Ok(CudValue::Boolean(b)),
            (TypeIdentifier::Boolean, CudValue::String(s)) => match s.as_str() {
                "true" => Ok(CudValue::Boolean(true)),
                "false" => Ok(CudValue::Boolean(false)),
                _ => Err(DomainError::conversion(s, "Boolean")),
            },

            (TypeIdentifier::Date, CudValue::Date(d)) => Ok(CudValue::Date(d)),
            (TypeIdentifier::Date, CudValue::String(s)) => parse_date(&s)
                .map(CudValue::Date)
                .map_err(|_| DomainError::conversion(s, "Date")),

            (TypeIdentifier::DateTime, CudValue::DateTime(dt)) => Ok(CudValue::DateTime(dt)),
            (TypeIdentifier::DateTime, CudValue::String(s)) => parse_datetime(&s)
                .map(CudValue::DateTime)
                .map_err(|_| DomainError::conversion(s, "DateTime")),

            (TypeIdentifier::Time, CudValue::Time(t)) => Ok(CudValue::Time(t)),
            (TypeIdentifier::Time, CudValue::String(s)) => parse_time(&s)
                .map(CudValue::Time)
                .map_err(|_| DomainError::conversion(s, "Time")),

            (TypeIdentifier::Json, CudValue::Json(s)) => Ok(CudValue::Json(s)),
            (TypeIdentifier::Json, CudValue::String(s)) => match serde_json::from_str::<serde_json::Value>(&s) {
                Ok(_) => Ok(CudValue::Json(s)),
                Err(_) => Err(DomainError::conversion(s, "Json")),
            },
            (TypeIdentifier::Json, value @ CudValue::Object(_)) => serde_json::to_string(&value)
                .map(CudValue::Json)
                .map_err(|_| DomainError::conversion(value, "Json")),

            (TypeIdentifier::Uuid, CudValue::Uuid(u)) => Ok(CudValue::Uuid(u)),
            (TypeIdentifier::Uuid, CudValue::String(s)) => Uuid::parse_str(&s)
                .map(CudValue::Uuid)
                .map_err(|_| DomainError::conversion(s, "Uuid")),

            (typ, value) => Err(DomainError::conversion(value, typ)),
        }
    }
}

fn parse_int(s: &str) -> crate::Result<i64> {
    s.trim().parse::<i64>().map_err(|_| DomainError::conversion(s, "Int"))
}

fn parse_decimal(s: &str) -> crate::Result<BigDecimal> {
    BigDecimal::from_str(s.trim()).map_err(|_| DomainError::conversion(s, "Decimal"))
}

fn int_to_decimal(i: i64) -> crate::Result<BigDecimal> {
    BigDecimal::from_i64(i).ok_or_else(|| DomainError::conversion(i, "Decimal"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ids_given_as_strings_coerce_to_the_primary_key_type() {
        assert_eq!(TypeIdentifier::Int.coerce("42".into()).unwrap(), CudValue::Int(42));
        assert_eq!(
            TypeIdentifier::Uuid
                .coerce("67e55044-10b1-426f-9247-bb680e5fe0c8".into())
                .unwrap(),
            CudValue::Uuid(Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap())
        );
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(TypeIdentifier::Int.coerce("forty".into()).is_err());
        assert!(TypeIdentifier::Date.coerce("2021-13-01".into()).is_err());
        assert!(TypeIdentifier::Boolean.coerce(CudValue::Int(1)).is_err());
    }

    #[test]
    fn lists_and_nulls() {
        assert_eq!(
            TypeIdentifier::Int
                .coerce(CudValue::List(vec!["1".into(), CudValue::Int(2)]))
                .unwrap(),
            CudValue::List(vec![CudValue::Int(1), CudValue::Int(2)])
        );
        assert_eq!(TypeIdentifier::Json.coerce(CudValue::Null).unwrap(), CudValue::Null);
    }

    #[test]
    fn ints_widen_to_floats() {
        assert_eq!(
            TypeIdentifier::Float.coerce(CudValue::Int(3)).unwrap(),
            CudValue::Float(BigDecimal::from(3))
        );
    }
}
