use crate::{
    operations::{read, write},
    store::Store,
};
use async_trait::async_trait;
use cud_connector::{ConnectionLike, Filter, ReadOperations, WriteArgs, WriteOperations};
use cud_models::{InternalDataModelRef, Model, Record, RelationField};
use cud_value::CudValue;
use parking_lot::Mutex;
use std::sync::Arc;

pub struct InMemoryConnection {
    datamodel: InternalDataModelRef,
    store: Arc<Mutex<Store>>,
}

impl InMemoryConnection {
    pub(crate) fn new(datamodel: InternalDataModelRef, store: Arc<Mutex<Store>>) -> Self {
        InMemoryConnection { datamodel, store }
    }
}

impl ConnectionLike for InMemoryConnection {}

#[async_trait]
impl ReadOperations for InMemoryConnection {
    async fn get_single_record(&mut self, model: &Model, filter: &Filter) -> cud_connector::Result<Option<Record>> {
        let store = self.store.lock();
        read::get_single_record(&store, &self.datamodel, model, filter)
    }

    async fn get_many_records(&mut self, model: &Model, filter: &Filter) -> cud_connector::Result<Vec<Record>> {
        let store = self.store.lock();
        read::get_many_records(&store, &self.datamodel, model, filter)
    }

    async fn get_related_m2m_record_ids(
        &mut self,
        from_field: &RelationField,
        from_id: &CudValue,
    ) -> cud_connector::Result<Vec<CudValue>> {
        let store = self.store.lock();
        Ok(read::get_related_m2m_record_ids(&store, from_field, from_id))
    }
}

#[async_trait]
impl WriteOperations for InMemoryConnection {
    async fn create_record(&mut self, model: &Model, args: WriteArgs) -> cud_connector::Result<Record> {
        let mut store = self.store.lock();
        write::create_record(&mut store, &self.datamodel, model, args)
    }

    async fn update_records(
        &mut self,
        model: &Model,
        filter: &Filter,
        args: WriteArgs,
    ) -> cud_connector::Result<Vec<Record>> {
        let mut store = self.store.lock();
        write::update_records(&mut store, &self.datamodel, model, filter, args)
    }

    async fn delete_records(&mut self, model: &Model, filter: &Filter) -> cud_connector::Result<usize> {
        let mut store = self.store.lock();
        write::delete_records(&mut store, &self.datamodel, model, filter)
    }

    async fn m2m_connect(
        &mut self,
        field: &RelationField,
        parent_id: &CudValue,
        child_ids: &[CudValue],
    ) -> cud_connector::Result<()> {
        let mut store = self.store.lock();
        write::m2m_connect(&mut store, &self.datamodel, field, parent_id, child_ids)
    }

    async fn m2m_disconnect(
        &mut self,
        field: &RelationField,
        parent_id: &CudValue,
        child_ids: &[CudValue],
    ) -> cud_connector::Result<()> {
        let mut store = self.store.lock();
        write::m2m_disconnect(&mut store, field, parent_id, child_ids)
    }
}
