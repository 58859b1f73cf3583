mod error;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bigdecimal::{BigDecimal, FromPrimitive, ToPrimitive};
use chrono::prelude::*;
use serde::ser::SerializeMap;
use serde::{ser::Serializer, Serialize};
use std::{convert::TryFrom, fmt, str::FromStr};
use uuid::Uuid;

pub use error::ConversionFailure;
pub type CudValueResult<T> = std::result::Result<T, ConversionFailure>;
pub type CudListValue = Vec<CudValue>;

/// A value as it flows between the request layer, the executor and the connectors.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, PartialOrd, Ord)]
#[serde(untagged)]
pub enum CudValue {
    String(String),
    Boolean(bool),
    Enum(String),
    Int(i64),
    Uuid(Uuid),
    List(CudListValue),

    #[serde(serialize_with = "serialize_json")]
    Json(String),

    /// A collections of key-value pairs constituting an object.
    #[serde(serialize_with = "serialize_object")]
    Object(Vec<(String, CudValue)>),

    #[serde(serialize_with = "serialize_null")]
    Null,

    #[serde(serialize_with = "serialize_date")]
    Date(NaiveDate),

    #[serde(serialize_with = "serialize_time")]
    Time(NaiveTime),

    #[serde(serialize_with = "serialize_datetime")]
    DateTime(DateTime<FixedOffset>),

    #[serde(serialize_with = "serialize_float")]
    Float(BigDecimal),

    #[serde(serialize_with = "serialize_decimal")]
    Decimal(BigDecimal),

    #[serde(serialize_with = "serialize_bigint")]
    BigInt(i64),

    #[serde(serialize_with = "serialize_bytes")]
    Bytes(Vec<u8>),
}

/// Stringify a date time to the following format
/// 1999-05-01T00:00:00.000Z
pub fn stringify_datetime(datetime: &DateTime<FixedOffset>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 and ISO 8601 date and time string such as 1996-12-19T16:39:57-08:00,
/// then returns a new DateTime with a parsed FixedOffset.
pub fn parse_datetime(datetime: &str) -> chrono::ParseResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(datetime)
}

pub fn parse_date(date: &str) -> chrono::ParseResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
}

pub fn parse_time(time: &str) -> chrono::ParseResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M:%S%.f").or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_bytes(s: &str) -> CudValueResult<Vec<u8>> {
    STANDARD
        .decode(s)
        .map_err(|_| ConversionFailure::new("base64 encoded bytes", "CudValue::Bytes"))
}

impl TryFrom<serde_json::Value> for CudValue {
    type Error = ConversionFailure;

    fn try_from(v: serde_json::Value) -> CudValueResult<Self> {
        match v {
            serde_json::Value::String(s) => Ok(CudValue::String(s)),
            serde_json::Value::Array(v) => {
                let vals: CudValueResult<Vec<CudValue>> = v.into_iter().map(CudValue::try_from).collect();
                Ok(CudValue::List(vals?))
            }
            serde_json::Value::Null => Ok(CudValue::Null),
            serde_json::Value::Bool(b) => Ok(CudValue::Boolean(b)),
            serde_json::Value::Number(num) => match num.as_i64() {
                Some(i) => Ok(CudValue::Int(i)),
                None => num
                    .as_f64()
                    .and_then(BigDecimal::from_f64)
                    .map(|dec| CudValue::Float(dec.normalized()))
                    .ok_or_else(|| ConversionFailure::new("JSON number", "CudValue::Float")),
            },
            serde_json::Value::Object(obj) => {
                let pairs: CudValueResult<Vec<(String, CudValue)>> = obj
                    .into_iter()
                    .map(|(k, v)| CudValue::try_from(v).map(|v| (k, v)))
                    .collect();

                Ok(CudValue::Object(pairs?))
            }
        }
    }
}

fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    date.format("%Y-%m-%d").to_string().serialize(serializer)
}

fn serialize_time<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    time.format("%H:%M:%S%.f").to_string().serialize(serializer)
}

fn serialize_datetime<S>(datetime: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    stringify_datetime(datetime).serialize(serializer)
}

fn serialize_bytes<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    encode_bytes(bytes).serialize(serializer)
}

fn serialize_null<S>(serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Option::<u8>::None.serialize(serializer)
}

fn serialize_bigint<S>(int: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    int.to_string().serialize(serializer)
}

fn serialize_float<S>(float: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match float.to_f64() {
        Some(f) => f.serialize(serializer),
        None => float.to_string().serialize(serializer),
    }
}

fn serialize_decimal<S>(decimal: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    decimal.to_string().serialize(serializer)
}

fn serialize_json<S>(json: &str, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(value) => value.serialize(serializer),
        Err(_) => json.serialize(serializer),
    }
}

fn serialize_object<S>(obj: &[(String, CudValue)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(obj.len()))?;

    for (k, v) in obj {
        map.serialize_entry(k, v)?;
    }

    map.end()
}

impl CudValue {
    pub fn as_enum_value(&self) -> Option<&str> {
        match self {
            CudValue::Enum(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            CudValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            CudValue::Int(i) | CudValue::BigInt(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<&bool> {
        match self {
            CudValue::Boolean(bool) => Some(bool),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[CudValue]> {
        match self {
            CudValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CudValue::Null)
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            CudValue::String(s) => Some(s),
            CudValue::Enum(ev) => Some(ev),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<CudListValue> {
        match self {
            CudValue::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<Vec<(String, CudValue)>> {
        match self {
            CudValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// The textual form used when the value is exposed as a GraphQL `ID`.
    pub fn to_id_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CudValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CudValue::String(x) | CudValue::Enum(x) | CudValue::Json(x) => write!(f, "{x}"),
            CudValue::Float(x) | CudValue::Decimal(x) => write!(f, "{x}"),
            CudValue::Boolean(x) => write!(f, "{x}"),
            CudValue::Date(x) => write!(f, "{}", x.format("%Y-%m-%d")),
            CudValue::Time(x) => write!(f, "{}", x.format("%H:%M:%S%.f")),
            CudValue::DateTime(x) => write!(f, "{}", stringify_datetime(x)),
            CudValue::Int(x) | CudValue::BigInt(x) => write!(f, "{x}"),
            CudValue::Null => write!(f, "null"),
            CudValue::Uuid(x) => write!(f, "{x}"),
            CudValue::List(x) => {
                let joined = x.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
                write!(f, "[{joined}]")
            }
            CudValue::Bytes(b) => write!(f, "{}", encode_bytes(b)),
            CudValue::Object(pairs) => {
                let joined = pairs
                    .iter()
                    .map(|(key, value)| format!(r#""{key}": {value}"#))
                    .collect::<Vec<_>>()
                    .join(", ");

                write!(f, "{{ {joined} }}")
            }
        }
    }
}

impl From<&str> for CudValue {
    fn from(s: &str) -> Self {
        CudValue::from(s.to_string())
    }
}

impl From<String> for CudValue {
    fn from(s: String) -> Self {
        CudValue::String(s)
    }
}

impl TryFrom<f64> for CudValue {
    type Error = ConversionFailure;

    fn try_from(f: f64) -> CudValueResult<CudValue> {
        BigDecimal::from_f64(f)
            .map(CudValue::Float)
            .ok_or_else(|| ConversionFailure::new("f64", "Float"))
    }
}

impl From<bool> for CudValue {
    fn from(b: bool) -> Self {
        CudValue::Boolean(b)
    }
}

impl From<i32> for CudValue {
    fn from(i: i32) -> Self {
        CudValue::Int(i64::from(i))
    }
}

impl From<i64> for CudValue {
    fn from(i: i64) -> Self {
        CudValue::Int(i)
    }
}

impl From<usize> for CudValue {
    fn from(u: usize) -> Self {
        CudValue::Int(u as i64)
    }
}

impl From<Uuid> for CudValue {
    fn from(s: Uuid) -> Self {
        CudValue::Uuid(s)
    }
}

impl From<CudListValue> for CudValue {
    fn from(s: CudListValue) -> Self {
        CudValue::List(s)
    }
}

impl TryFrom<CudValue> for i64 {
    type Error = ConversionFailure;

    fn try_from(value: CudValue) -> CudValueResult<i64> {
        match value {
            CudValue::Int(i) | CudValue::BigInt(i) => Ok(i),
            _ => Err(ConversionFailure::new("CudValue", "i64")),
        }
    }
}

impl TryFrom<CudValue> for String {
    type Error = ConversionFailure;

    fn try_from(value: CudValue) -> CudValueResult<String> {
        match value {
            CudValue::String(s) => Ok(s),
            _ => Err(ConversionFailure::new("CudValue", "String")),
        }
    }
}

impl FromStr for CudValue {
    type Err = ConversionFailure;

    /// Reads a JSON document into a value.
    fn from_str(s: &str) -> CudValueResult<CudValue> {
        let json: serde_json::Value =
            serde_json::from_str(s).map_err(|_| ConversionFailure::new("JSON string", "CudValue"))?;

        CudValue::try_from(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn json_numbers_become_ints_or_floats() {
        assert_eq!(CudValue::try_from(json!(12)).unwrap(), CudValue::Int(12));
        assert_eq!(
            CudValue::try_from(json!(1.5)).unwrap(),
            CudValue::Float(BigDecimal::from_str("1.5").unwrap())
        );
    }

    #[test]
    fn json_objects_keep_key_order() {
        let value = CudValue::try_from(json!({ "b": 1, "a": [true, null] })).unwrap();

        assert_eq!(
            value,
            CudValue::Object(vec![
                ("b".to_owned(), CudValue::Int(1)),
                (
                    "a".to_owned(),
                    CudValue::List(vec![CudValue::Boolean(true), CudValue::Null])
                ),
            ])
        );
    }

    #[test]
    fn serialization_uses_wire_formats() {
        let datetime = parse_datetime("2021-03-01T10:00:00+00:00").unwrap();
        let values = CudValue::List(vec![
            CudValue::DateTime(datetime),
            CudValue::Date(parse_date("2021-03-01").unwrap()),
            CudValue::BigInt(9),
            CudValue::Decimal(BigDecimal::from_str("1.10").unwrap()),
            CudValue::Json(r#"{"a":1}"#.to_owned()),
            CudValue::Bytes(b"hi".to_vec()),
            CudValue::Null,
        ]);

        assert_eq!(
            serde_json::to_value(&values).unwrap(),
            json!(["2021-03-01T10:00:00.000Z", "2021-03-01", "9", "1.10", { "a": 1 }, "aGk=", null])
        );
    }

    #[test]
    fn uuids_serialize_as_hyphenated_strings() {
        let uuid = Uuid::from_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();

        assert_eq!(
            serde_json::to_value(CudValue::from(uuid)).unwrap(),
            json!("67e55044-10b1-426f-9247-bb680e5fe0c8")
        );
        assert_eq!(CudValue::Uuid(uuid).to_id_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn display_renders_the_id_form() {
        assert_eq!(CudValue::Int(7).to_id_string(), "7");
        assert_eq!(CudValue::from("abc").to_id_string(), "abc");
    }

    #[test]
    fn bytes_round_trip_through_base64() {
        assert_eq!(decode_bytes(&encode_bytes(b"cud")).unwrap(), b"cud".to_vec());
        assert!(decode_bytes("%%").is_err());
    }
}
