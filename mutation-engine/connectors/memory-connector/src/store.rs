use cud_connector::error::{ConnectorError, ErrorKind};
use cud_models::{InternalDataModel, Model, Record};
use cud_value::CudValue;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub(crate) struct Store {
    tables: HashMap<String, Table>,
    /// Join rows of forward many-to-many fields, keyed by `Model.field`. Pairs are
    /// `(declaring record id, related record id)`.
    join_tables: HashMap<String, Vec<(CudValue, CudValue)>>,
}

#[derive(Debug)]
pub(crate) struct Table {
    pub rows: Vec<Record>,
    next_id: i64,
}

impl Default for Table {
    fn default() -> Self {
        Table {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl Table {
    pub fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Keeps generated ids ahead of explicitly provided ones.
    pub fn observe_id(&mut self, id: i64) {
        if id >= self.next_id {
            self.next_id = id + 1;
        }
    }

    pub fn find_by_id(&self, model: &Model, id: &CudValue) -> Option<&Record> {
        let pk = &model.primary_key().name;
        self.rows.iter().find(|row| row.get(pk) == Some(id))
    }
}

impl Store {
    pub fn table(&self, model: &str) -> Option<&Table> {
        self.tables.get(model)
    }

    pub fn table_mut(&mut self, model: &str) -> &mut Table {
        self.tables.entry(model.to_owned()).or_default()
    }

    pub fn rows(&self, model: &str) -> &[Record] {
        self.tables.get(model).map(|t| t.rows.as_slice()).unwrap_or(&[])
    }

    pub fn join_rows(&self, key: &str) -> &[(CudValue, CudValue)] {
        self.join_tables.get(key).map(|t| t.as_slice()).unwrap_or(&[])
    }

    pub fn join_rows_mut(&mut self, key: &str) -> &mut Vec<(CudValue, CudValue)> {
        self.join_tables.entry(key.to_owned()).or_default()
    }

    pub fn record_exists(&self, model: &Model, id: &CudValue) -> bool {
        self.table(&model.name)
            .and_then(|t| t.find_by_id(model, id))
            .is_some()
    }

    /// Drops join rows touching any of the deleted records of `model`.
    pub fn remove_join_rows_for(
        &mut self,
        datamodel: &InternalDataModel,
        model: &Model,
        ids: &[CudValue],
    ) -> Result<(), ConnectorError> {
        for rf in model.relation_fields().filter(|rf| rf.kind.is_many_to_many()) {
            let Some((key, is_forward)) = rf.join_table() else { continue };

            // Validates the relation still points somewhere we know.
            datamodel.related_model(rf)?;

            self.join_rows_mut(&key).retain(|(left, right)| {
                let own = if is_forward { left } else { right };
                !ids.contains(own)
            });
        }

        Ok(())
    }
}

pub(crate) fn unique_violation(model: &Model, field: &str) -> ConnectorError {
    ConnectorError::from_kind(ErrorKind::UniqueConstraintViolation {
        field_name: format!("{}.{}", model.name, field),
    })
}

pub(crate) fn null_violation(model: &Model, field: &str) -> ConnectorError {
    ConnectorError::from_kind(ErrorKind::NullConstraintViolation {
        field_name: format!("{}.{}", model.name, field),
    })
}

pub(crate) fn foreign_key_violation(model: &str, field: &str) -> ConnectorError {
    ConnectorError::from_kind(ErrorKind::ForeignKeyConstraintViolation {
        field_name: format!("{model}.{field}"),
    })
}
