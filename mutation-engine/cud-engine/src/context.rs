use crate::{opt::EngineOpt, EngineResult};
use cud_core::{EngineConfig, MutationExecutor, SchemaBuilder};
use memory_connector::InMemoryConnector;
use request_handlers::RequestHandler;
use std::{path::Path, sync::Arc};

/// Formats the engine configuration can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

/// Everything a request needs: the store and a handler over the generated schema.
pub struct EngineContext {
    connector: Arc<InMemoryConnector>,
    handler: RequestHandler,
}

impl EngineContext {
    pub fn load(opts: &EngineOpt) -> EngineResult<Self> {
        let datamodel = std::fs::read_to_string(&opts.datamodel)?;
        let config = std::fs::read_to_string(&opts.config)?;

        Self::new(&datamodel, &config, ConfigFormat::from_path(&opts.config))
    }

    pub fn new(datamodel: &str, config: &str, format: ConfigFormat) -> EngineResult<Self> {
        let internal_data_model = cud_models::convert(datamodel)?;

        let config = match format {
            ConfigFormat::Toml => EngineConfig::from_toml(config)?,
            ConfigFormat::Json => EngineConfig::from_json(config)?,
        };

        let schema = SchemaBuilder::from_config(internal_data_model.clone(), &config)?.build()?;
        let connector = Arc::new(InMemoryConnector::new(internal_data_model));
        let executor = MutationExecutor::new(Arc::new(schema), connector.clone());

        tracing::info!(
            mutations = executor.schema().mutations().count(),
            "mutation engine ready"
        );

        Ok(EngineContext {
            connector,
            handler: RequestHandler::new(Arc::new(executor)),
        })
    }

    pub fn connector(&self) -> &InMemoryConnector {
        &self.connector
    }

    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }
}
