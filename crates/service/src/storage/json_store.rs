use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{fs, sync::RwLock};
use tracing::{debug, info, warn};

use models::json::{compare_documents, matches, Document, JsonModel, OrderBy};
use models::{CountArgs, CreateArgs, DeleteArgs, FindManyArgs, FindUniqueArgs, ModelName, PersistenceClient, UpdateArgs};

use crate::errors::ServiceError;

const ID_FIELD: &str = "id";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Collection {
    next_id: u64,
    rows: Vec<Document>,
}

impl Collection {
    fn position(&self, filter: &Document) -> Option<usize> {
        self.rows.iter().position(|row| matches(row, filter))
    }

    fn id_taken(&self, id: &Value, except: Option<usize>) -> bool {
        self.rows
            .iter()
            .enumerate()
            .any(|(idx, row)| Some(idx) != except && row.get(ID_FIELD) == Some(id))
    }

    fn assign_id(&mut self) -> Value {
        loop {
            self.next_id += 1;
            let id = Value::from(self.next_id);
            if !self.id_taken(&id, None) {
                return id;
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Snapshot {
    collections: BTreeMap<ModelName, Collection>,
}

/// Document store keeping named collections of JSON objects.
///
/// Optionally persisted to a single JSON file that is replaced after every
/// mutation. A mutation whose save fails is rolled back in memory. Only
/// registered collections can be addressed.
pub struct JsonStore {
    inner: RwLock<BTreeMap<ModelName, Collection>>,
    file_path: Option<PathBuf>,
}

impl JsonStore {
    /// Store without a backing file.
    pub fn in_memory<I>(models: I) -> Arc<Self>
    where
        I: IntoIterator<Item = ModelName>,
    {
        let collections = models.into_iter().map(|m| (m, Collection::default())).collect();
        Arc::new(Self { inner: RwLock::new(collections), file_path: None })
    }

    /// Load the store from `path`, creating the file when missing, and make
    /// sure every name in `models` has a collection.
    pub async fn open<P, I>(path: P, models: I) -> Result<Arc<Self>, ServiceError>
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = ModelName>,
    {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
            }
        }

        let snapshot: Snapshot = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ServiceError::Storage(format!("{}: {}", file_path.display(), e)))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %file_path.display(), "store_file_created");
                Snapshot::default()
            }
            Err(e) => return Err(ServiceError::storage(e)),
        };

        let mut collections = snapshot.collections;
        for model in models {
            collections.entry(model).or_default();
        }
        info!(path = %file_path.display(), collections = collections.len(), "store_opened");

        let store = Self { inner: RwLock::new(collections), file_path: Some(file_path) };
        {
            let collections = store.inner.read().await;
            store.persist(&collections).await?;
        }
        Ok(Arc::new(store))
    }

    /// Add an empty collection; returns false when it already existed.
    pub async fn register(&self, model: ModelName) -> Result<bool, ServiceError> {
        let mut collections = self.inner.write().await;
        if collections.contains_key(&model) {
            return Ok(false);
        }
        collections.insert(model.clone(), Collection::default());
        if let Err(e) = self.persist(&collections).await {
            collections.remove(&model);
            warn!(%model, error = %e, "register_rolled_back");
            return Err(e);
        }
        debug!(%model, "collection_registered");
        Ok(true)
    }

    /// Registered collection names in sorted order.
    pub async fn models(&self) -> Vec<ModelName> {
        self.inner.read().await.keys().cloned().collect()
    }

    async fn persist(&self, collections: &BTreeMap<ModelName, Collection>) -> Result<(), ServiceError> {
        let Some(path) = &self.file_path else { return Ok(()) };
        let data = serde_json::to_vec_pretty(&SnapshotRef { collections }).map_err(ServiceError::storage)?;
        // write a sibling file first so the store file is never half-written
        let staged = staging_path(path);
        fs::write(&staged, data).await.map_err(ServiceError::storage)?;
        if let Err(e) = fs::rename(&staged, path).await {
            let _ = fs::remove_file(&staged).await;
            return Err(ServiceError::storage(e));
        }
        Ok(())
    }

    /// Persist after a change to `model`; on failure put `before` back.
    async fn commit(
        &self,
        collections: &mut BTreeMap<ModelName, Collection>,
        model: &ModelName,
        before: Collection,
    ) -> Result<(), ServiceError> {
        if let Err(e) = self.persist(collections).await {
            collections.insert(model.clone(), before);
            warn!(%model, error = %e, "mutation_rolled_back");
            return Err(e);
        }
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    collections: &'a BTreeMap<ModelName, Collection>,
}

fn collection<'a>(
    collections: &'a BTreeMap<ModelName, Collection>,
    model: &ModelName,
) -> Result<&'a Collection, ServiceError> {
    collections.get(model).ok_or_else(|| ServiceError::UnknownModel(model.clone()))
}

fn collection_mut<'a>(
    collections: &'a mut BTreeMap<ModelName, Collection>,
    model: &ModelName,
) -> Result<&'a mut Collection, ServiceError> {
    collections.get_mut(model).ok_or_else(|| ServiceError::UnknownModel(model.clone()))
}

fn require_filter(filter: &Document) -> Result<(), ServiceError> {
    if filter.is_empty() {
        return Err(ServiceError::Validation("unique filter must contain at least one field".into()));
    }
    Ok(())
}

#[async_trait]
impl PersistenceClient<JsonModel> for JsonStore {
    type Error = ServiceError;

    async fn count(&self, model: &ModelName, criteria: Option<CountArgs<Document>>) -> Result<u64, ServiceError> {
        let collections = self.inner.read().await;
        let rows = &collection(&collections, model)?.rows;
        let n = match criteria.and_then(|c| c.r#where) {
            Some(filter) => rows.iter().filter(|row| matches(row, &filter)).count(),
            None => rows.len(),
        };
        Ok(n as u64)
    }

    async fn find_unique(
        &self,
        model: &ModelName,
        args: FindUniqueArgs<Document>,
    ) -> Result<Option<Document>, ServiceError> {
        require_filter(&args.r#where)?;
        let collections = self.inner.read().await;
        let coll = collection(&collections, model)?;
        Ok(coll.position(&args.r#where).map(|idx| coll.rows[idx].clone()))
    }

    async fn find_many(
        &self,
        model: &ModelName,
        args: FindManyArgs<Document, OrderBy>,
    ) -> Result<Vec<Document>, ServiceError> {
        let collections = self.inner.read().await;
        let rows = &collection(&collections, model)?.rows;

        let mut selected: Vec<&Document> = match &args.r#where {
            Some(filter) => rows.iter().filter(|row| matches(row, filter)).collect(),
            None => rows.iter().collect(),
        };
        if !args.order_by.is_empty() {
            selected.sort_by(|a, b| compare_documents(a, b, &args.order_by));
        }

        let skip = usize::try_from(args.skip.unwrap_or(0)).unwrap_or(usize::MAX);
        let take = args.take.map_or(usize::MAX, |t| usize::try_from(t).unwrap_or(usize::MAX));
        Ok(selected.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn create(&self, model: &ModelName, args: CreateArgs<Document>) -> Result<Document, ServiceError> {
        let mut collections = self.inner.write().await;
        let coll = collection_mut(&mut collections, model)?;
        let before = coll.clone();

        let mut record = args.data;
        match record.get(ID_FIELD).cloned() {
            Some(id) if coll.id_taken(&id, None) => {
                return Err(ServiceError::UniqueConstraint(format!("{model}.{ID_FIELD} = {id}")));
            }
            Some(_) => {}
            None => {
                let id = coll.assign_id();
                record.insert(ID_FIELD.to_string(), id);
            }
        }
        coll.rows.push(record.clone());

        self.commit(&mut collections, model, before).await?;
        debug!(%model, id = ?record.get(ID_FIELD), "record_created");
        Ok(record)
    }

    async fn update(
        &self,
        model: &ModelName,
        args: UpdateArgs<Document, Document>,
    ) -> Result<Document, ServiceError> {
        require_filter(&args.r#where)?;
        let mut collections = self.inner.write().await;
        let coll = collection_mut(&mut collections, model)?;
        let idx = coll.position(&args.r#where).ok_or_else(|| ServiceError::not_found(model))?;
        let before = coll.clone();

        if let Some(id) = args.data.get(ID_FIELD) {
            if coll.id_taken(id, Some(idx)) {
                return Err(ServiceError::UniqueConstraint(format!("{model}.{ID_FIELD} = {id}")));
            }
        }
        let row = &mut coll.rows[idx];
        row.extend(args.data);
        let updated = row.clone();

        self.commit(&mut collections, model, before).await?;
        debug!(%model, id = ?updated.get(ID_FIELD), "record_updated");
        Ok(updated)
    }

    async fn delete(&self, model: &ModelName, args: DeleteArgs<Document>) -> Result<Document, ServiceError> {
        require_filter(&args.r#where)?;
        let mut collections = self.inner.write().await;
        let coll = collection_mut(&mut collections, model)?;
        let idx = coll.position(&args.r#where).ok_or_else(|| ServiceError::not_found(model))?;
        let before = coll.clone();
        let removed = coll.rows.remove(idx);

        self.commit(&mut collections, model, before).await?;
        debug!(%model, id = ?removed.get(ID_FIELD), "record_deleted");
        Ok(removed)
    }
}
