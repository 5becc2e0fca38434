//! # Remote data gateway
//!
//! A thin, typed view of the hosted table API. Every remote read and write in the
//! crate goes through the [`Gateway`] trait, so the same recipe logic runs against
//! the hosted PostgREST endpoint ([`RestGateway`]) or in-process tables
//! ([`MemoryGateway`]) in tests.
//!
//! ## Queries
//!
//! A [`Query`] names a table and carries a column projection, filters, ordering
//! and a row limit. Build one fluently with [`Gateway::from`]:
//!
//! ```ignore
//! let ingredients: Vec<Ingredient> = gateway
//!     .from("ingredients")
//!     .eq("recipe_id", id)
//!     .order("sort_order", true)
//!     .fetch()
//!     .await?;
//! ```
//!
//! | Terminal | Result |
//! |----------|--------|
//! | [`fetch`](QueryBuilder::fetch) | every matching row |
//! | [`single`](QueryBuilder::single) | first row, [`ApiError::NotFound`] when none match |
//! | [`maybe_single`](QueryBuilder::maybe_single) | first row or `None` |
//! | [`count`](QueryBuilder::count) | number of matching rows |
//! | [`insert`](QueryBuilder::insert) / [`insert_many`](QueryBuilder::insert_many) | inserted representation |
//! | [`update`](QueryBuilder::update) | patches every matching row |
//! | [`delete`](QueryBuilder::delete) | deletes every matching row |

mod memory;
mod rest;

pub use memory::MemoryGateway;
pub use rest::{AccessToken, RestGateway};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    /// Case-insensitive pattern with `%` wildcards.
    ILike(String, String),
    IsNull(String),
    In(String, Vec<Value>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub table: String,
    /// Column projection; `None` selects every column.
    pub columns: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: None,
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }
}

/// Request/response access to the hosted tables and remote procedures.
pub trait Gateway {
    fn select(&self, query: &Query) -> impl std::future::Future<Output = ApiResult<Vec<Value>>>;
    /// Insert rows and return their stored representation.
    fn insert(
        &self,
        table: &str,
        rows: Vec<Value>,
    ) -> impl std::future::Future<Output = ApiResult<Vec<Value>>>;
    fn update(
        &self,
        query: &Query,
        patch: Value,
    ) -> impl std::future::Future<Output = ApiResult<Vec<Value>>>;
    fn delete(&self, query: &Query) -> impl std::future::Future<Output = ApiResult<()>>;
    fn count(&self, query: &Query) -> impl std::future::Future<Output = ApiResult<usize>>;
    fn rpc(&self, name: &str, args: Value) -> impl std::future::Future<Output = ApiResult<Value>>;

    fn from(&self, table: &str) -> QueryBuilder<'_, Self>
    where
        Self: Sized,
    {
        QueryBuilder {
            gateway: self,
            query: Query::new(table),
        }
    }
}

pub struct QueryBuilder<'a, G: Gateway> {
    gateway: &'a G,
    query: Query,
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> ApiResult<Vec<T>> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(ApiError::from))
        .collect()
}

impl<'a, G: Gateway> QueryBuilder<'a, G> {
    pub fn select(mut self, columns: &str) -> Self {
        self.query.columns = Some(columns.to_string());
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.query.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    pub fn ilike(mut self, column: &str, pattern: &str) -> Self {
        self.query
            .filters
            .push(Filter::ILike(column.to_string(), pattern.to_string()));
        self
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.query.filters.push(Filter::IsNull(column.to_string()));
        self
    }

    pub fn in_list<V: Into<Value>>(mut self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.query.filters.push(Filter::In(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.query.order.push(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.query.limit = Some(n);
        self
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub async fn fetch<T: DeserializeOwned>(self) -> ApiResult<Vec<T>> {
        decode_rows(self.gateway.select(&self.query).await?)
    }

    pub async fn single<T: DeserializeOwned>(self) -> ApiResult<T> {
        self.maybe_single().await?.ok_or(ApiError::NotFound)
    }

    pub async fn maybe_single<T: DeserializeOwned>(mut self) -> ApiResult<Option<T>> {
        self.query.limit = Some(1);
        let rows = self.gateway.select(&self.query).await?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    pub async fn count(self) -> ApiResult<usize> {
        self.gateway.count(&self.query).await
    }

    /// Insert one row and decode the stored representation.
    pub async fn insert<T: Serialize, R: DeserializeOwned>(self, row: &T) -> ApiResult<R> {
        let rows = self
            .gateway
            .insert(&self.query.table, vec![serde_json::to_value(row)?])
            .await?;
        let first = rows
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::Decode("insert returned no representation".into()))?;
        Ok(serde_json::from_value(first)?)
    }

    pub async fn insert_many<T: Serialize, R: DeserializeOwned>(self, rows: &[T]) -> ApiResult<Vec<R>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let values = rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        decode_rows(self.gateway.insert(&self.query.table, values).await?)
    }

    pub async fn update<T: Serialize>(self, patch: &T) -> ApiResult<usize> {
        let rows = self
            .gateway
            .update(&self.query, serde_json::to_value(patch)?)
            .await?;
        Ok(rows.len())
    }

    pub async fn delete(self) -> ApiResult<()> {
        self.gateway.delete(&self.query).await
    }
}
