use std::{marker::PhantomData, sync::Arc};

use tracing::instrument;

use models::{CreateArgs, DeleteArgs, FindUniqueArgs, ModelName, ModelTypes, PersistenceClient, UpdateArgs};

/// Generic CRUD service bound to one collection of a persistence client.
///
/// Every operation is a single delegation to the client: arguments are
/// wrapped into the client's argument shape, the result and any error come
/// back untouched.
pub struct CrudService<M, C>
where
    M: ModelTypes,
    C: PersistenceClient<M>,
{
    client: Arc<C>,
    model: ModelName,
    _types: PhantomData<fn() -> M>,
}

impl<M, C> Clone for CrudService<M, C>
where
    M: ModelTypes,
    C: PersistenceClient<M>,
{
    fn clone(&self) -> Self {
        Self { client: Arc::clone(&self.client), model: self.model.clone(), _types: PhantomData }
    }
}

impl<M, C> std::fmt::Debug for CrudService<M, C>
where
    M: ModelTypes,
    C: PersistenceClient<M>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudService").field("model", &self.model).finish_non_exhaustive()
    }
}

impl<M, C> CrudService<M, C>
where
    M: ModelTypes,
    C: PersistenceClient<M>,
{
    pub fn new(client: Arc<C>, model: impl Into<ModelName>) -> Self {
        Self { client, model: model.into(), _types: PhantomData }
    }

    /// Collection this service is bound to.
    pub fn model(&self) -> &ModelName { &self.model }

    pub fn client(&self) -> &Arc<C> { &self.client }

    #[instrument(level = "debug", skip_all, fields(model = %self.model, op = "count"))]
    pub async fn count(&self, criteria: Option<M::CountArgs>) -> Result<u64, C::Error> {
        self.client.count(&self.model, criteria).await
    }

    /// Unique read. `Ok(None)` when the client finds nothing.
    #[instrument(level = "debug", skip_all, fields(model = %self.model, op = "find_one"))]
    pub async fn find_one(&self, filter: M::WhereUnique) -> Result<Option<M::Record>, C::Error> {
        self.client.find_unique(&self.model, FindUniqueArgs { r#where: filter }).await
    }

    #[instrument(level = "debug", skip_all, fields(model = %self.model, op = "find_many"))]
    pub async fn find_many(&self, params: M::FindManyArgs) -> Result<Vec<M::Record>, C::Error> {
        self.client.find_many(&self.model, params).await
    }

    #[instrument(level = "debug", skip_all, fields(model = %self.model, op = "create"))]
    pub async fn create(&self, data: M::Create) -> Result<M::Record, C::Error> {
        self.client.create(&self.model, CreateArgs { data }).await
    }

    #[instrument(level = "debug", skip_all, fields(model = %self.model, op = "update"))]
    pub async fn update(&self, params: UpdateArgs<M::WhereUnique, M::Update>) -> Result<M::Record, C::Error> {
        self.client.update(&self.model, params).await
    }

    /// Returns the record as it was before removal.
    #[instrument(level = "debug", skip_all, fields(model = %self.model, op = "delete"))]
    pub async fn delete(&self, filter: M::WhereUnique) -> Result<M::Record, C::Error> {
        self.client.delete(&self.model, DeleteArgs { r#where: filter }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeError, RecordingClient, TestModel};
    use serde_json::json;

    fn service(client: &Arc<RecordingClient>) -> CrudService<TestModel, RecordingClient> {
        CrudService::new(Arc::clone(client), "$anyModel")
    }

    #[tokio::test]
    async fn count_without_criteria() -> Result<(), anyhow::Error> {
        let client = Arc::new(RecordingClient::default().with_count(10));
        let result = service(&client).count(None).await?;

        assert_eq!(result, 10);
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "count");
        assert_eq!(calls[0].model, "$anyModel");
        assert_eq!(calls[0].args, serde_json::Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn count_forwards_criteria() -> Result<(), anyhow::Error> {
        let client = Arc::new(RecordingClient::default().with_count(3));
        let criteria = json!({ "where": { "active": true } });
        let result = service(&client).count(Some(criteria.clone())).await?;

        assert_eq!(result, 3);
        assert_eq!(client.calls()[0].args, criteria);
        Ok(())
    }

    #[tokio::test]
    async fn find_one_wraps_filter_in_where() -> Result<(), anyhow::Error> {
        let expected = json!({ "id": 1, "name": "Test" });
        let client = Arc::new(RecordingClient::default().with_record(expected.clone()));
        let result = service(&client).find_one(json!({ "id": "1" })).await?;

        assert_eq!(result, Some(expected));
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "find_unique");
        assert_eq!(calls[0].model, "$anyModel");
        assert_eq!(calls[0].args, json!({ "where": { "id": "1" } }));
        Ok(())
    }

    #[tokio::test]
    async fn find_one_passes_absence_through() -> Result<(), anyhow::Error> {
        let client = Arc::new(RecordingClient::default());
        let result = service(&client).find_one(json!({ "id": "missing" })).await?;
        assert!(result.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn find_many_forwards_params_unchanged() -> Result<(), anyhow::Error> {
        let expected = vec![json!({ "id": 1, "name": "Test1" }), json!({ "id": 2, "name": "Test2" })];
        let client = Arc::new(RecordingClient::default().with_records(expected.clone()));
        let params = json!({ "skip": 0, "take": 10 });
        let result = service(&client).find_many(params.clone()).await?;

        assert_eq!(result, expected);
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "find_many");
        assert_eq!(calls[0].model, "$anyModel");
        assert_eq!(calls[0].args, params);
        Ok(())
    }

    #[tokio::test]
    async fn create_wraps_payload_in_data() -> Result<(), anyhow::Error> {
        let expected = json!({ "id": 1, "name": "New Test" });
        let client = Arc::new(RecordingClient::default().with_record(expected.clone()));
        let result = service(&client).create(json!({ "name": "New Test" })).await?;

        assert_eq!(result, expected);
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "create");
        assert_eq!(calls[0].model, "$anyModel");
        assert_eq!(calls[0].args, json!({ "data": { "name": "New Test" } }));
        Ok(())
    }

    #[tokio::test]
    async fn update_forwards_where_and_data() -> Result<(), anyhow::Error> {
        let expected = json!({ "id": 1, "name": "Updated Test" });
        let client = Arc::new(RecordingClient::default().with_record(expected.clone()));
        let params = UpdateArgs { r#where: json!({ "id": "1" }), data: json!({ "name": "Updated Test" }) };
        let result = service(&client).update(params).await?;

        assert_eq!(result, expected);
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "update");
        assert_eq!(calls[0].model, "$anyModel");
        assert_eq!(
            calls[0].args,
            json!({ "where": { "id": "1" }, "data": { "name": "Updated Test" } })
        );
        Ok(())
    }

    #[tokio::test]
    async fn delete_wraps_filter_in_where() -> Result<(), anyhow::Error> {
        let expected = json!({ "id": 1, "name": "Test" });
        let client = Arc::new(RecordingClient::default().with_record(expected.clone()));
        let result = service(&client).delete(json!({ "id": "1" })).await?;

        assert_eq!(result, expected);
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "delete");
        assert_eq!(calls[0].model, "$anyModel");
        assert_eq!(calls[0].args, json!({ "where": { "id": "1" } }));
        Ok(())
    }

    #[tokio::test]
    async fn client_errors_propagate_unchanged() {
        let client = Arc::new(RecordingClient::default().failing("connection refused"));
        let svc = service(&client);

        let err = svc.create(json!({ "name": "x" })).await.unwrap_err();
        assert_eq!(err, FakeError("connection refused".into()));
        let err = svc.count(None).await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
        // one attempt per call, no retries
        assert_eq!(client.calls().len(), 2);
    }

    #[tokio::test]
    async fn clones_share_client_and_binding() -> Result<(), anyhow::Error> {
        let client = Arc::new(RecordingClient::default().with_count(1));
        let a = service(&client);
        let b = a.clone();
        a.count(None).await?;
        b.count(None).await?;

        assert_eq!(b.model().as_str(), "$anyModel");
        assert!(Arc::ptr_eq(a.client(), b.client()));
        assert_eq!(client.calls().len(), 2);
        Ok(())
    }
}
