use crate::store::Store;
use cud_connector::{Filter, RelationFilter, ScalarCondition, ScalarFilter};
use cud_models::{Field, InternalDataModel, Model, ModelRef, Record, RelationField, RelationKind};
use cud_value::CudValue;

pub(crate) fn matches(
    store: &Store,
    datamodel: &InternalDataModel,
    model: &Model,
    record: &Record,
    filter: &Filter,
) -> cud_connector::Result<bool> {
    let result = match filter {
        Filter::BoolFilter(b) => *b,
        Filter::And(filters) => {
            for filter in filters {
                if !matches(store, datamodel, model, record, filter)? {
                    return Ok(false);
                }
            }

            true
        }
        Filter::Or(filters) => {
            for filter in filters {
                if matches(store, datamodel, model, record, filter)? {
                    return Ok(true);
                }
            }

            false
        }
        Filter::Not(filters) => {
            for filter in filters {
                if matches(store, datamodel, model, record, filter)? {
                    return Ok(false);
                }
            }

            true
        }
        Filter::Scalar(sf) => matches_scalar(store, datamodel, model, record, sf)?,
        Filter::Relation(rf) => matches_relation(store, datamodel, model, record, rf)?,
    };

    Ok(result)
}

fn matches_scalar(
    store: &Store,
    datamodel: &InternalDataModel,
    model: &Model,
    record: &Record,
    filter: &ScalarFilter,
) -> cud_connector::Result<bool> {
    match model.field(&filter.field)? {
        Field::Relation(rf) if !rf.is_inlined() => {
            // Conditions on to-many and reverse fields apply to the related ids.
            let (related, records) = related_records(store, datamodel, model, record, rf)?;

            if let ScalarCondition::IsNull(is_null) = filter.condition {
                return Ok(records.is_empty() == is_null);
            }

            let pk = &related.primary_key().name;

            Ok(records
                .iter()
                .any(|r| condition_holds(&r.get_or_null(pk), &filter.condition)))
        }
        _ => Ok(condition_holds(&record.get_or_null(&filter.field), &filter.condition)),
    }
}

fn matches_relation(
    store: &Store,
    datamodel: &InternalDataModel,
    model: &Model,
    record: &Record,
    filter: &RelationFilter,
) -> cud_connector::Result<bool> {
    let rf = model.find_relation_field(&filter.field)?;
    let (related, records) = related_records(store, datamodel, model, record, rf)?;

    for related_record in records {
        if matches(store, datamodel, &related, related_record, &filter.nested)? {
            return Ok(true);
        }
    }

    Ok(false)
}

/// The records `record` is connected to through `field`.
pub(crate) fn related_records<'a>(
    store: &'a Store,
    datamodel: &InternalDataModel,
    model: &Model,
    record: &Record,
    field: &RelationField,
) -> cud_connector::Result<(ModelRef, Vec<&'a Record>)> {
    let related = datamodel.related_model(field)?;
    let related_pk = related.primary_key().name.clone();
    let rows = store.rows(&related.name);

    let records = match field.kind {
        RelationKind::ForeignKey | RelationKind::OneToOne => {
            let value = record.get_or_null(&field.name);

            if value.is_null() {
                Vec::new()
            } else {
                rows.iter().filter(|r| r.get(&related_pk) == Some(&value)).collect()
            }
        }
        RelationKind::ManyToOneRel | RelationKind::OneToOneRel => match &field.related_field {
            Some(back) => {
                let id = record.id(model)?;
                rows.iter().filter(|r| r.get(back) == Some(id)).collect()
            }
            None => Vec::new(),
        },
        RelationKind::ManyToMany | RelationKind::ManyToManyRel => {
            let ids = related_m2m_ids(store, field, record.id(model)?);
            rows.iter()
                .filter(|r| r.get(&related_pk).map(|id| ids.contains(id)).unwrap_or(false))
                .collect()
        }
    };

    Ok((related, records))
}

pub(crate) fn related_m2m_ids(store: &Store, field: &RelationField, id: &CudValue) -> Vec<CudValue> {
    let Some((key, is_forward)) = field.join_table() else {
        return Vec::new();
    };

    store
        .join_rows(&key)
        .iter()
        .filter_map(|(left, right)| match is_forward {
            true if left == id => Some(right.clone()),
            false if right == id => Some(left.clone()),
            _ => None,
        })
        .collect()
}

pub(crate) fn condition_holds(value: &CudValue, condition: &ScalarCondition) -> bool {
    match condition {
        ScalarCondition::Equals(other) => value == other,
        ScalarCondition::IEquals(other) => text_of(value).to_lowercase() == text_of(other).to_lowercase(),
        ScalarCondition::Contains(other) => !value.is_null() && text_of(value).contains(&text_of(other)),
        ScalarCondition::IContains(other) => {
            !value.is_null() && text_of(value).to_lowercase().contains(&text_of(other).to_lowercase())
        }
        ScalarCondition::StartsWith(other) => !value.is_null() && text_of(value).starts_with(&text_of(other)),
        ScalarCondition::IStartsWith(other) => {
            !value.is_null() && text_of(value).to_lowercase().starts_with(&text_of(other).to_lowercase())
        }
        ScalarCondition::EndsWith(other) => !value.is_null() && text_of(value).ends_with(&text_of(other)),
        ScalarCondition::IEndsWith(other) => {
            !value.is_null() && text_of(value).to_lowercase().ends_with(&text_of(other).to_lowercase())
        }
        ScalarCondition::In(values) => values.contains(value),
        ScalarCondition::GreaterThan(other) => !value.is_null() && value > other,
        ScalarCondition::GreaterThanOrEquals(other) => !value.is_null() && value >= other,
        ScalarCondition::LessThan(other) => !value.is_null() && value < other,
        ScalarCondition::LessThanOrEquals(other) => !value.is_null() && value <= other,
        ScalarCondition::IsNull(is_null) => value.is_null() == *is_null,
    }
}

fn text_of(value: &CudValue) -> String {
    match value {
        CudValue::String(s) | CudValue::Enum(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cud_value::CudValue;

    #[test]
    fn textual_conditions() {
        let name = CudValue::from("Garfield");

        assert!(condition_holds(&name, &ScalarCondition::IContains("FIELD".into())));
        assert!(!condition_holds(&name, &ScalarCondition::Contains("FIELD".into())));
        assert!(condition_holds(&name, &ScalarCondition::IStartsWith("gar".into())));
        assert!(condition_holds(&name, &ScalarCondition::IEquals("garfield".into())));
        assert!(!condition_holds(&CudValue::Null, &ScalarCondition::Contains("".into())));
    }

    #[test]
    fn ordering_conditions_skip_nulls() {
        assert!(condition_holds(&CudValue::Int(3), &ScalarCondition::GreaterThan(CudValue::Int(2))));
        assert!(!condition_holds(&CudValue::Null, &ScalarCondition::LessThan(CudValue::Int(2))));
        assert!(condition_holds(
            &CudValue::Int(2),
            &ScalarCondition::In(vec![CudValue::Int(1), CudValue::Int(2)])
        ));
        assert!(condition_holds(&CudValue::Null, &ScalarCondition::IsNull(true)));
    }
}
