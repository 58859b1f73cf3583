use crate::{connection::InMemoryConnection, store::Store};
use async_trait::async_trait;
use cud_connector::{ConnectionLike, Connector};
use cud_models::{InternalDataModelRef, Record};
use parking_lot::Mutex;
use std::sync::Arc;

/// Connector over records held in process memory. Connections share one store.
#[derive(Debug, Clone)]
pub struct InMemoryConnector {
    datamodel: InternalDataModelRef,
    store: Arc<Mutex<Store>>,
}

impl InMemoryConnector {
    pub fn new(datamodel: InternalDataModelRef) -> Self {
        InMemoryConnector {
            datamodel,
            store: Arc::new(Mutex::new(Store::default())),
        }
    }

    pub fn datamodel(&self) -> &InternalDataModelRef {
        &self.datamodel
    }

    /// Loads records from a JSON document keyed by model name. Many-to-many fields take
    /// a list of related ids. Models are inserted in document order.
    pub fn seed(&self, data: &serde_json::Value) -> cud_connector::Result<()> {
        let mut store = self.store.lock();
        crate::seed::seed(&mut store, &self.datamodel, data)
    }

    /// A snapshot of the records of a model, in insertion order.
    pub fn records(&self, model: &str) -> Vec<Record> {
        self.store.lock().rows(model).to_vec()
    }
}

#[async_trait]
impl Connector for InMemoryConnector {
    async fn get_connection(&self) -> cud_connector::Result<Box<dyn ConnectionLike>> {
        Ok(Box::new(InMemoryConnection::new(
            self.datamodel.clone(),
            self.store.clone(),
        )))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
