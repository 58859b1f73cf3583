use crate::{Filter, WriteArgs};
use async_trait::async_trait;
use cud_models::{Model, Record, RelationField};
use cud_value::CudValue;

#[async_trait]
pub trait Connector: Send + Sync {
    /// Returns a connection to a data source.
    async fn get_connection(&self) -> crate::Result<Box<dyn ConnectionLike>>;

    /// Returns the name of the data source family, used for logging.
    fn name(&self) -> &'static str;
}

/// Marker trait required by the executor to abstract connections into something that is
/// capable of writing to or reading from a data source.
pub trait ConnectionLike: ReadOperations + WriteOperations + Send + Sync {}

#[async_trait]
pub trait ReadOperations {
    /// Gets a single record or `None` back from the data source.
    async fn get_single_record(&mut self, model: &Model, filter: &Filter) -> crate::Result<Option<Record>>;

    /// Gets all records of the model matching the filter, in insertion order.
    async fn get_many_records(&mut self, model: &Model, filter: &Filter) -> crate::Result<Vec<Record>>;

    /// Ids of the records connected to `from_id` through the many-to-many field `from_field`.
    async fn get_related_m2m_record_ids(
        &mut self,
        from_field: &RelationField,
        from_id: &CudValue,
    ) -> crate::Result<Vec<CudValue>>;
}

#[async_trait]
pub trait WriteOperations {
    /// Insert a single record to the data source. Unset fields receive their defaults.
    async fn create_record(&mut self, model: &Model, args: WriteArgs) -> crate::Result<Record>;

    /// Update the records matching the filter, returning them in their new state.
    async fn update_records(&mut self, model: &Model, filter: &Filter, args: WriteArgs) -> crate::Result<Vec<Record>>;

    /// Delete the records matching the filter, applying the on-delete behaviour of fields
    /// referencing them. Returns the number of deleted records of `model`.
    async fn delete_records(&mut self, model: &Model, filter: &Filter) -> crate::Result<usize>;

    /// Connect the children to the parent through a many-to-many field.
    async fn m2m_connect(&mut self, field: &RelationField, parent_id: &CudValue, child_ids: &[CudValue])
        -> crate::Result<()>;

    /// Disconnect the children from the parent through a many-to-many field.
    async fn m2m_disconnect(
        &mut self,
        field: &RelationField,
        parent_id: &CudValue,
        child_ids: &[CudValue],
    ) -> crate::Result<()>;
}
