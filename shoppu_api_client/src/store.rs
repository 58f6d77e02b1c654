//! Client-side mirrors of the records served by the API.
//!
//! A [`RecordStore`] caches the full records (`items`), their
//! `{value, text}` projections (`options`), one page of records
//! (`paginated_items`) and at most one selected record. Reads replace
//! the cached lists; creating or updating a record marks the store
//! [`Freshness::Stale`] and refetches both lists, while destroying one
//! filters it out of the cached lists locally.
//!
//! A failed refetch after a successful create or update does not undo
//! the mutation: the record is still returned and the store stays stale.

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};
use shoppu_core::{
    api_models::{Category, CountResponse, Product, SelectOption},
    id::{CategoryId, ProductId},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::transport::{RecordTransport, TransportError, TransportResult};


/// A record type that can be mirrored by a [`RecordStore`].
pub trait StoredRecord: Serialize + DeserializeOwned + Clone + Debug {
    type Id: Copy + Eq + Debug + Into<Uuid>;

    /// Key the record's fields are wrapped in when creating or updating,
    /// e.g. `{"category": {...}}`.
    const MODEL_NAME: &'static str;

    /// Collection path, e.g. `/api/categories`.
    const BASE_PATH: &'static str;

    fn id(&self) -> Self::Id;

    fn display_name(&self) -> &str;
}

impl StoredRecord for Category {
    type Id = CategoryId;

    const MODEL_NAME: &'static str = "category";
    const BASE_PATH: &'static str = "/api/categories";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl StoredRecord for Product {
    type Id = ProductId;

    const MODEL_NAME: &'static str = "product";
    const BASE_PATH: &'static str = "/api/products";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }
}


/// Whether the cached lists reflect the last mutation made through the store.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Freshness {
    Fresh,

    /// A mutation succeeded and the lists have not (yet) been refetched.
    Stale,
}


pub struct RecordStore<R, T>
where
    R: StoredRecord,
    T: RecordTransport,
{
    transport: T,

    is_loading: bool,

    items: Vec<R>,

    options: Vec<SelectOption>,

    paginated_items: Vec<R>,

    /// Total number of records on the server, as of the last count.
    num_items: u64,

    selected_item: Option<R>,

    selected_item_is_dirty: bool,

    freshness: Freshness,
}

pub type CategoryStore<T> = RecordStore<Category, T>;
pub type ProductStore<T> = RecordStore<Product, T>;


fn options_path<R: StoredRecord>() -> String {
    format!("{}/options", R::BASE_PATH)
}

fn count_path<R: StoredRecord>() -> String {
    format!("{}/count", R::BASE_PATH)
}

/// Wraps `fields` as `{<model name>: fields}`.
fn wrap_in_model_name<R, F>(fields: F) -> TransportResult<serde_json::Value>
where
    R: StoredRecord,
    F: Serialize,
{
    let fields = serde_json::to_value(fields)
        .map_err(|error| TransportError::RequestBodySerializationError { error })?;

    let mut body = serde_json::Map::with_capacity(1);
    body.insert(R::MODEL_NAME.to_string(), fields);

    Ok(serde_json::Value::Object(body))
}

/// Takes only the named (camelCase) fields from the serialized record.
fn partial_fields<R>(record: &R, field_names: &[&str]) -> TransportResult<serde_json::Value>
where
    R: StoredRecord,
{
    let serialized_record = serde_json::to_value(record)
        .map_err(|error| TransportError::RequestBodySerializationError { error })?;

    let mut fields = serde_json::Map::with_capacity(field_names.len());

    if let serde_json::Value::Object(record_fields) = serialized_record {
        for (field_name, value) in record_fields {
            if field_names.contains(&field_name.as_str()) {
                fields.insert(field_name, value);
            }
        }
    }

    Ok(serde_json::Value::Object(fields))
}


impl<R, T> RecordStore<R, T>
where
    R: StoredRecord,
    T: RecordTransport,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            is_loading: false,
            items: Vec::new(),
            options: Vec::new(),
            paginated_items: Vec::new(),
            num_items: 0,
            selected_item: None,
            selected_item_is_dirty: false,
            freshness: Freshness::Fresh,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn paginated_items(&self) -> &[R] {
        &self.paginated_items
    }

    pub fn num_items(&self) -> u64 {
        self.num_items
    }

    pub fn selected_item(&self) -> Option<&R> {
        self.selected_item.as_ref()
    }

    pub fn selected_item_is_dirty(&self) -> bool {
        self.selected_item_is_dirty
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }


    /* SELECTED ITEM */

    /// Fetches a single record and selects it.
    pub async fn get_selected_item(&mut self, id: R::Id) -> TransportResult<()> {
        debug!(model = R::MODEL_NAME, ?id, "Fetching record.");

        self.is_loading = true;
        let result = self
            .transport
            .get_by_id::<R>(R::BASE_PATH, id.into())
            .await;
        self.is_loading = false;

        self.set_selected_item(Some(result?));
        Ok(())
    }

    /// Replaces the selection and clears the dirty flag.
    pub fn set_selected_item(&mut self, item: Option<R>) {
        self.selected_item = item;
        self.selected_item_is_dirty = false;
    }

    pub fn clear_selected_item(&mut self) {
        self.set_selected_item(None);
    }

    /// Flags the selected item as locally edited.
    pub fn mark_selected_item_dirty(&mut self) {
        if self.selected_item.is_some() {
            self.selected_item_is_dirty = true;
        }
    }

    pub fn selected_item_id(&self) -> Option<R::Id> {
        self.selected_item.as_ref().map(StoredRecord::id)
    }

    /// Display name of the selected item, or an empty string if nothing is selected.
    pub fn selected_item_display_name(&self) -> &str {
        self.selected_item
            .as_ref()
            .map(StoredRecord::display_name)
            .unwrap_or("")
    }

    pub fn has_item_selected(&self) -> bool {
        self.selected_item.is_some()
    }


    /* LISTS */

    /// Replaces `items` with all records (in server order).
    /// On failure, `items` are left as they were.
    pub async fn get_items(&mut self) -> TransportResult<()> {
        debug!(model = R::MODEL_NAME, "Fetching all records.");

        self.is_loading = true;
        let result = self.transport.list::<Vec<R>>(R::BASE_PATH).await;
        self.is_loading = false;

        self.items = result?;
        Ok(())
    }

    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    /// Replaces `options` with the `{value, text}` pairs of all records.
    pub async fn get_options(&mut self) -> TransportResult<()> {
        debug!(model = R::MODEL_NAME, "Fetching options.");

        self.is_loading = true;
        let result = self
            .transport
            .list::<Vec<SelectOption>>(&options_path::<R>())
            .await;
        self.is_loading = false;

        self.options = result?;
        Ok(())
    }

    /// Updates `num_items` with the number of records on the server.
    pub async fn get_num_items(&mut self) -> TransportResult<()> {
        self.is_loading = true;
        let result = self
            .transport
            .list::<CountResponse>(&count_path::<R>())
            .await;
        self.is_loading = false;

        self.num_items = result?.count;
        Ok(())
    }

    /// Replaces `paginated_items` with one page of (optionally filtered) records.
    pub async fn get_paginated_items(
        &mut self,
        page: u32,
        per_page: u32,
        query: Option<&str>,
    ) -> TransportResult<()> {
        debug!(
            model = R::MODEL_NAME,
            page,
            per_page,
            query,
            "Fetching a page of records."
        );

        self.is_loading = true;
        let result = self
            .transport
            .list_page::<Vec<R>>(R::BASE_PATH, page, per_page, query)
            .await;
        self.is_loading = false;

        self.paginated_items = result?;
        Ok(())
    }

    /// Refetches `items` and `options`, then marks the store fresh.
    /// If either request fails, the store stays [`Freshness::Stale`].
    pub async fn refresh(&mut self) -> TransportResult<()> {
        self.freshness = Freshness::Stale;

        self.get_items().await?;
        self.get_options().await?;

        self.freshness = Freshness::Fresh;
        Ok(())
    }


    /* MUTATIONS */

    fn resolve_target(&self, item: Option<&R>) -> Option<R> {
        item.or(self.selected_item.as_ref()).cloned()
    }

    async fn refresh_after_mutation(&mut self) {
        if let Err(error) = self.refresh().await {
            warn!(
                model = R::MODEL_NAME,
                error = ?error,
                "Failed to refresh records after a mutation, store is stale."
            );
        }
    }

    /// Creates a record from `fields` (sent as `{<model name>: fields}`),
    /// selects the created record and refreshes the lists.
    ///
    /// Only a failed create is an error. If the refresh fails,
    /// the store is left [`Freshness::Stale`].
    pub async fn create_item<F>(&mut self, fields: F) -> TransportResult<R>
    where
        F: Serialize,
    {
        let body = wrap_in_model_name::<R, _>(fields)?;

        debug!(model = R::MODEL_NAME, %body, "Creating record.");

        self.is_loading = true;
        let result = self.transport.create::<_, R>(R::BASE_PATH, &body).await;
        self.is_loading = false;

        let created_item = result?;
        self.set_selected_item(Some(created_item.clone()));

        self.refresh_after_mutation().await;

        Ok(created_item)
    }

    /// Sends the fields named in `field_names`, taken from `item`
    /// (or the selected item, if `item` is `None`), as an update.
    /// On success, clears the selection and refreshes the lists
    /// (a failed refresh leaves the store [`Freshness::Stale`]).
    ///
    /// Returns `Ok(None)` without making a request if there is no target.
    pub async fn update_item(
        &mut self,
        field_names: &[&str],
        item: Option<&R>,
    ) -> TransportResult<Option<R>> {
        let Some(target) = self.resolve_target(item) else {
            return Ok(None);
        };

        let body = wrap_in_model_name::<R, _>(partial_fields(&target, field_names)?)?;

        debug!(
            model = R::MODEL_NAME,
            id = ?target.id(),
            %body,
            "Updating record."
        );

        self.is_loading = true;
        let result = self
            .transport
            .update::<_, R>(R::BASE_PATH, target.id().into(), &body)
            .await;
        self.is_loading = false;

        let updated_item = result?;
        self.clear_selected_item();

        self.refresh_after_mutation().await;

        Ok(Some(updated_item))
    }

    /// Deletes `item` (or the selected item, if `item` is `None`) and removes
    /// it from the cached lists. On failure, the selection is kept.
    ///
    /// Returns `Ok(None)` without making a request if there is no target.
    pub async fn destroy_item(&mut self, item: Option<&R>) -> TransportResult<Option<R>> {
        let Some(target) = self.resolve_target(item) else {
            return Ok(None);
        };

        if item.is_some() {
            self.set_selected_item(Some(target.clone()));
        }

        let target_id = target.id();

        debug!(model = R::MODEL_NAME, id = ?target_id, "Destroying record.");

        self.is_loading = true;
        let result = self
            .transport
            .delete::<R>(R::BASE_PATH, target_id.into())
            .await;
        self.is_loading = false;

        let deleted_item = result?;

        let target_uuid: Uuid = target_id.into();
        self.items.retain(|item| item.id() != target_id);
        self.paginated_items.retain(|item| item.id() != target_id);
        self.options.retain(|option| option.value != target_uuid);

        self.clear_selected_item();
        Ok(Some(deleted_item))
    }
}



#[cfg(test)]
pub(crate) mod test {
    use std::{cell::RefCell, collections::VecDeque, str::FromStr};

    use reqwest::StatusCode;
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;


    #[derive(Clone, PartialEq, Eq, Debug)]
    pub(crate) struct RecordedRequest {
        pub(crate) method: &'static str,
        pub(crate) path: String,
        pub(crate) id: Option<Uuid>,
        pub(crate) body: Option<serde_json::Value>,
    }

    /// Answers requests with pre-scripted responses, in order.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        responses: RefCell<VecDeque<TransportResult<serde_json::Value>>>,
        requests: RefCell<Vec<RecordedRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn respond_with(self, value: serde_json::Value) -> Self {
            self.responses.borrow_mut().push_back(Ok(value));
            self
        }

        pub(crate) fn fail_with(self, error: TransportError) -> Self {
            self.responses.borrow_mut().push_back(Err(error));
            self
        }

        pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.borrow().clone()
        }

        fn answer<V>(
            &self,
            method: &'static str,
            path: &str,
            id: Option<Uuid>,
            body: Option<serde_json::Value>,
        ) -> TransportResult<V>
        where
            V: DeserializeOwned,
        {
            self.requests.borrow_mut().push(RecordedRequest {
                method,
                path: path.to_string(),
                id,
                body,
            });

            let response = self
                .responses
                .borrow_mut()
                .pop_front()
                .expect("no scripted response left");

            serde_json::from_value(response?)
                .map_err(|error| TransportError::ResponseJsonBodyError { error })
        }
    }

    impl RecordTransport for ScriptedTransport {
        async fn list<V>(&self, path: &str) -> TransportResult<V>
        where
            V: DeserializeOwned,
        {
            self.answer("GET", path, None, None)
        }

        async fn list_page<V>(
            &self,
            path: &str,
            page: u32,
            per_page: u32,
            query: Option<&str>,
        ) -> TransportResult<V>
        where
            V: DeserializeOwned,
        {
            let path = format!(
                "{}?page={}&per_page={}&query={}",
                path,
                page,
                per_page,
                query.unwrap_or_default()
            );

            self.answer("GET", &path, None, None)
        }

        async fn get_by_id<V>(&self, path: &str, id: Uuid) -> TransportResult<V>
        where
            V: DeserializeOwned,
        {
            self.answer("GET", path, Some(id), None)
        }

        async fn create<B, V>(&self, path: &str, body: &B) -> TransportResult<V>
        where
            B: Serialize,
            V: DeserializeOwned,
        {
            let body = serde_json::to_value(body).expect("body should serialize");
            self.answer("POST", path, None, Some(body))
        }

        async fn update<B, V>(&self, path: &str, id: Uuid, body: &B) -> TransportResult<V>
        where
            B: Serialize,
            V: DeserializeOwned,
        {
            let body = serde_json::to_value(body).expect("body should serialize");
            self.answer("PUT", path, Some(id), Some(body))
        }

        async fn delete<V>(&self, path: &str, id: Uuid) -> TransportResult<V>
        where
            V: DeserializeOwned,
        {
            self.answer("DELETE", path, Some(id), None)
        }
    }


    pub(crate) fn sample_category(id: u128, name: &str) -> Category {
        Category {
            id: CategoryId::new(Uuid::from_u128(id)),
            name: name.to_string(),
            display_name: name.to_string(),
            parent_id: None,
            parent_name: None,
            products_count: 0,
        }
    }

    pub(crate) fn sample_product(id: u128, name: &str, currency: &str, display_currency: &str) -> Product {
        Product {
            id: ProductId::new(Uuid::from_u128(id)),
            name: name.to_string(),
            currency: currency.to_string(),
            price: Some(Decimal::from_str("10.00").unwrap()),
            display_name: name.to_string(),
            category_id: CategoryId::new(Uuid::from_u128(1)),
            category_name: "Shoes".to_string(),
            display_currency: display_currency.to_string(),
            display_price: None,
        }
    }

    fn as_json<S: Serialize>(value: S) -> serde_json::Value {
        serde_json::to_value(value).unwrap()
    }

    fn option_of(category: &Category) -> serde_json::Value {
        json!({ "value": category.id.into_uuid(), "text": category.name })
    }

    fn not_found() -> TransportError {
        TransportError::unsuccessful_response(
            StatusCode::NOT_FOUND,
            br#"{"notification":{"level":"error","message":"Cannot destroy category: record not found!"}}"#,
        )
    }


    #[tokio::test]
    async fn get_items_replaces_items_in_server_order() {
        let shoes = sample_category(1, "Shoes");
        let hats = sample_category(2, "Hats");

        let transport = ScriptedTransport::default()
            .respond_with(as_json(vec![&shoes, &hats]));
        let mut store = CategoryStore::new(transport);

        store.get_items().await.unwrap();

        assert_eq!(store.items(), &[shoes, hats]);
        assert!(!store.is_loading());
        assert_eq!(
            store.transport().requests()[0].path,
            "/api/categories"
        );
    }

    #[tokio::test]
    async fn failed_get_items_keeps_items_and_clears_loading() {
        let shoes = sample_category(1, "Shoes");

        let transport = ScriptedTransport::default()
            .respond_with(as_json(vec![&shoes]))
            .fail_with(TransportError::network_error("connection reset"));
        let mut store = CategoryStore::new(transport);

        store.get_items().await.unwrap();
        let error = store.get_items().await.unwrap_err();

        assert!(error.is_retryable());
        assert_eq!(store.items(), &[shoes]);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn options_and_count_use_their_sub_paths() {
        let shoes = sample_category(1, "Shoes");

        let transport = ScriptedTransport::default()
            .respond_with(json!([option_of(&shoes)]))
            .respond_with(json!({ "count": 7 }));
        let mut store = CategoryStore::new(transport);

        store.get_options().await.unwrap();
        store.get_num_items().await.unwrap();

        assert_eq!(
            store.options(),
            &[SelectOption {
                value: shoes.id.into_uuid(),
                text: "Shoes".to_string()
            }]
        );
        assert_eq!(store.num_items(), 7);

        let paths: Vec<String> = store
            .transport()
            .requests()
            .into_iter()
            .map(|request| request.path)
            .collect();
        assert_eq!(
            paths,
            vec!["/api/categories/options", "/api/categories/count"]
        );
    }

    #[tokio::test]
    async fn paginated_items_are_requested_with_page_parameters() {
        let hats = sample_category(2, "Hats");

        let transport = ScriptedTransport::default().respond_with(as_json(vec![&hats]));
        let mut store = CategoryStore::new(transport);

        store.get_paginated_items(2, 1, Some("at")).await.unwrap();

        assert_eq!(store.paginated_items(), &[hats]);
        assert_eq!(
            store.transport().requests()[0].path,
            "/api/categories?page=2&per_page=1&query=at"
        );
    }

    #[tokio::test]
    async fn selecting_an_item_clears_the_dirty_flag() {
        let shoes = sample_category(1, "Shoes");
        let mut store = CategoryStore::new(ScriptedTransport::default());

        assert!(!store.has_item_selected());
        assert_eq!(store.selected_item_display_name(), "");

        store.set_selected_item(Some(shoes.clone()));
        store.mark_selected_item_dirty();
        assert!(store.selected_item_is_dirty());

        store.set_selected_item(Some(shoes.clone()));
        assert!(!store.selected_item_is_dirty());
        assert_eq!(store.selected_item_id(), Some(shoes.id));
        assert_eq!(store.selected_item_display_name(), "Shoes");

        store.clear_selected_item();
        assert!(!store.has_item_selected());
    }

    #[tokio::test]
    async fn get_selected_item_fetches_and_selects() {
        let shoes = sample_category(1, "Shoes");

        let transport = ScriptedTransport::default().respond_with(as_json(&shoes));
        let mut store = CategoryStore::new(transport);

        store.get_selected_item(shoes.id).await.unwrap();

        assert_eq!(store.selected_item(), Some(&shoes));
        assert_eq!(
            store.transport().requests()[0].id,
            Some(shoes.id.into_uuid())
        );
    }

    #[tokio::test]
    async fn destroy_removes_the_item_locally_and_is_a_no_op_afterwards() {
        let shoes = sample_category(1, "Shoes");
        let hats = sample_category(2, "Hats");

        let transport = ScriptedTransport::default()
            .respond_with(as_json(vec![&shoes, &hats]))
            .respond_with(json!([option_of(&shoes), option_of(&hats)]))
            .respond_with(as_json(&shoes));
        let mut store = CategoryStore::new(transport);

        store.refresh().await.unwrap();
        store.set_selected_item(Some(shoes.clone()));

        let deleted = store.destroy_item(None).await.unwrap();

        assert_eq!(deleted, Some(shoes.clone()));
        assert_eq!(store.items(), &[hats.clone()]);
        assert_eq!(store.options().len(), 1);
        assert_eq!(store.options()[0].value, hats.id.into_uuid());
        assert!(!store.has_item_selected());

        // Nothing is selected anymore, so there is nothing to destroy.
        let second_attempt = store.destroy_item(None).await.unwrap();

        assert_eq!(second_attempt, None);
        assert_eq!(store.items(), &[hats]);
        assert_eq!(store.transport().requests().len(), 3);
    }

    #[tokio::test]
    async fn failed_destroy_keeps_the_selection() {
        let shoes = sample_category(1, "Shoes");

        let transport = ScriptedTransport::default().fail_with(not_found());
        let mut store = CategoryStore::new(transport);

        let error = store.destroy_item(Some(&shoes)).await.unwrap_err();

        assert_eq!(error.status_code(), Some(StatusCode::NOT_FOUND));
        assert_eq!(
            error.notification().message,
            "Cannot destroy category: record not found!"
        );
        assert_eq!(store.selected_item(), Some(&shoes));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn update_sends_only_the_named_fields_then_refreshes() {
        let mut shoes = sample_category(1, "Shoes");
        shoes.name = "Footwear".to_string();

        let transport = ScriptedTransport::default()
            .respond_with(as_json(&shoes))
            .respond_with(as_json(vec![&shoes]))
            .respond_with(json!([option_of(&shoes)]));
        let mut store = CategoryStore::new(transport);

        store.set_selected_item(Some(shoes.clone()));

        let updated = store
            .update_item(&["name", "parentId"], None)
            .await
            .unwrap();

        assert_eq!(updated, Some(shoes.clone()));
        assert_eq!(store.freshness(), Freshness::Fresh);
        assert_eq!(store.items(), &[shoes.clone()]);
        assert!(!store.has_item_selected());

        let requests = store.transport().requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].id, Some(shoes.id.into_uuid()));
        assert_eq!(
            requests[0].body,
            Some(json!({ "category": { "name": "Footwear", "parentId": null } }))
        );
        assert_eq!(requests[1].path, "/api/categories");
        assert_eq!(requests[2].path, "/api/categories/options");
    }

    #[tokio::test]
    async fn update_without_a_target_does_nothing() {
        let mut store = CategoryStore::new(ScriptedTransport::default());

        assert_eq!(store.update_item(&["name"], None).await.unwrap(), None);
        assert!(store.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn create_wraps_fields_refreshes_and_selects_the_result() {
        let shoes = sample_category(1, "Shoes");

        let transport = ScriptedTransport::default()
            .respond_with(as_json(&shoes))
            .respond_with(as_json(vec![&shoes]))
            .respond_with(json!([option_of(&shoes)]));
        let mut store = CategoryStore::new(transport);

        let created = store
            .create_item(json!({ "name": "Shoes" }))
            .await
            .unwrap();

        assert_eq!(created, shoes);
        assert_eq!(store.selected_item(), Some(&shoes));
        assert_eq!(store.items(), &[shoes]);
        assert_eq!(store.freshness(), Freshness::Fresh);
        assert_eq!(
            store.transport().requests()[0].body,
            Some(json!({ "category": { "name": "Shoes" } }))
        );
    }

    #[tokio::test]
    async fn failed_refresh_after_create_keeps_the_created_record() {
        let shoes = sample_category(1, "Shoes");

        let transport = ScriptedTransport::default()
            .respond_with(as_json(&shoes))
            .fail_with(TransportError::unsuccessful_response(
                StatusCode::SERVICE_UNAVAILABLE,
                b"",
            ));
        let mut store = CategoryStore::new(transport);

        let created = store
            .create_item(json!({ "name": "Shoes" }))
            .await
            .unwrap();

        assert_eq!(created, shoes);
        assert_eq!(store.selected_item(), Some(&shoes));
        assert_eq!(store.freshness(), Freshness::Stale);
        assert!(store.items().is_empty());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn failed_refresh_after_update_keeps_the_updated_record() {
        let mut shoes = sample_category(1, "Shoes");
        shoes.name = "Footwear".to_string();

        let transport = ScriptedTransport::default()
            .respond_with(as_json(&shoes))
            .respond_with(as_json(vec![&shoes]))
            .fail_with(TransportError::unsuccessful_response(
                StatusCode::BAD_GATEWAY,
                b"",
            ));
        let mut store = CategoryStore::new(transport);

        store.set_selected_item(Some(shoes.clone()));

        let updated = store.update_item(&["name"], None).await.unwrap();

        assert_eq!(updated, Some(shoes.clone()));
        assert!(!store.has_item_selected());
        assert_eq!(store.items(), &[shoes]);
        assert!(store.options().is_empty());
        assert_eq!(store.freshness(), Freshness::Stale);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn failed_create_selects_nothing() {
        let transport = ScriptedTransport::default().fail_with(
            TransportError::unsuccessful_response(StatusCode::NOT_ACCEPTABLE, b""),
        );
        let mut store = CategoryStore::new(transport);

        let error = store
            .create_item(json!({ "name": "" }))
            .await
            .unwrap_err();

        assert_eq!(error.status_code(), Some(StatusCode::NOT_ACCEPTABLE));
        assert!(!store.has_item_selected());
        assert_eq!(store.freshness(), Freshness::Fresh);
        assert_eq!(store.transport().requests().len(), 1);
    }
}
