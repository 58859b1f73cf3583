use super::coerce_id_value;
use crate::{CoreError, CoreResult, FilterBinding, FilterFieldBinding, ParsedInputMap};
use cud_connector::{Filter, Lookup, RelationFilter, ScalarFilter};
use cud_models::{Field, InternalDataModel, Model};
use cud_value::CudValue;

/// Builds the connector filter of a filter input. Every given field adds a condition,
/// an empty input matches every record.
pub(crate) fn build_filter(
    internal_data_model: &InternalDataModel,
    binding: &FilterBinding,
    input: &ParsedInputMap,
) -> CoreResult<Filter> {
    let mut filters = Vec::with_capacity(input.len());

    for (path, value) in input {
        let field_binding = binding
            .fields
            .get(path)
            .ok_or_else(|| CoreError::input(format!("Unknown filter field `{path}`.")))?;

        let model = internal_data_model.find_model(&field_binding.model)?;
        let value = filter_value(internal_data_model, &model, field_binding, value.clone().into_value())?;

        let mut filter = Filter::from(ScalarFilter {
            field: field_binding.field.clone(),
            condition: field_binding.lookup.condition(value),
        });

        for relation in field_binding.relations.iter().rev() {
            filter = Filter::from(RelationFilter::new(relation.clone(), filter));
        }

        filters.push(filter);
    }

    Ok(Filter::and(filters))
}

/// Converts a filter value to the type of the compared field. Text lookups compare
/// against text, ids of related records are resolved like any other id.
fn filter_value(
    internal_data_model: &InternalDataModel,
    model: &Model,
    binding: &FilterFieldBinding,
    value: CudValue,
) -> CoreResult<CudValue> {
    if value.is_null() || binding.lookup.is_textual() || binding.lookup == Lookup::IsNull {
        return Ok(value);
    }

    match model.field(&binding.field)? {
        Field::Scalar(sf) if sf.is_id => ids(model, value),
        Field::Scalar(sf) => Ok(sf.type_identifier.coerce(value)?),
        Field::Relation(rf) => ids(&*internal_data_model.related_model(rf)?, value),
    }
}

fn ids(model: &Model, value: CudValue) -> CoreResult<CudValue> {
    match value {
        CudValue::List(values) => values
            .into_iter()
            .filter(|v| !v.is_null())
            .map(|v| coerce_id_value(model, v))
            .collect::<CoreResult<Vec<_>>>()
            .map(CudValue::List),
        value => coerce_id_value(model, value),
    }
}
