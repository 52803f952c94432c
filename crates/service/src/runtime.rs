//! Composition helpers: open the configured store and bind one CRUD service
//! per configured collection.

use std::sync::Arc;

use tracing::info;

use configs::StoreConfig;
use models::json::JsonModel;
use models::ModelName;

use crate::crud::CrudService;
use crate::errors::ServiceError;
use crate::storage::JsonStore;

/// CRUD service over the bundled JSON store.
pub type JsonCrudService = CrudService<JsonModel, JsonStore>;

fn parse_names(models: &[String]) -> Result<Vec<ModelName>, ServiceError> {
    models.iter().map(|m| ModelName::parse(m).map_err(ServiceError::from)).collect()
}

/// Open the store described by `cfg` with a collection for every name in `models`.
pub async fn open_store(cfg: &StoreConfig, models: &[String]) -> Result<Arc<JsonStore>, ServiceError> {
    let names = parse_names(models)?;
    match cfg.file_path() {
        Some(path) => JsonStore::open(path, names).await,
        None => {
            info!(collections = names.len(), "store_in_memory");
            Ok(JsonStore::in_memory(names))
        }
    }
}

/// One service per configured collection, in configuration order.
pub fn bind_models(store: &Arc<JsonStore>, models: &[String]) -> Result<Vec<JsonCrudService>, ServiceError> {
    let names = parse_names(models)?;
    Ok(names.into_iter().map(|name| CrudService::new(Arc::clone(store), name)).collect())
}
