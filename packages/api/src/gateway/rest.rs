//! PostgREST implementation of [`Gateway`] over `reqwest`.
//!
//! Every request carries the project `apikey` header and a bearer token: the
//! signed-in user's access token when one is set on the shared [`AccessToken`],
//! otherwise the API key itself. Row-level security on the server does the rest.

use std::sync::{Arc, RwLock};

use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use super::{Filter, Gateway, Query};
use crate::config::BackendConfig;
use crate::error::{error_message, ApiError, ApiResult};

/// Access token shared between the auth client and the gateway.
pub type AccessToken = Arc<RwLock<Option<String>>>;

#[derive(Clone, Debug)]
pub struct RestGateway {
    client: reqwest::Client,
    config: BackendConfig,
    api_key: String,
    token: AccessToken,
}

impl RestGateway {
    pub fn new(config: BackendConfig) -> Self {
        let api_key = config.anon_key.clone();
        Self {
            client: reqwest::Client::new(),
            config,
            api_key,
            token: AccessToken::default(),
        }
    }

    /// Privileged gateway that bypasses row-level security. Server only.
    pub fn with_service_role(config: BackendConfig, service_role_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_key: service_role_key,
            token: AccessToken::default(),
        }
    }

    /// Handle to the bearer token, for wiring into the auth client.
    pub fn access_token(&self) -> AccessToken {
        self.token.clone()
    }

    fn bearer(&self) -> String {
        let token = self.token.read().unwrap_or_else(|e| e.into_inner());
        token.clone().unwrap_or_else(|| self.api_key.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.config.endpoint(path))
            .header("apikey", &self.api_key)
            .bearer_auth(self.bearer())
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Translate a [`Query`] into PostgREST query-string parameters.
pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(columns) = &query.columns {
        params.push(("select".to_string(), columns.clone()));
    }
    for filter in &query.filters {
        let (column, expr) = match filter {
            Filter::Eq(col, v) => (col, format!("eq.{}", render_value(v))),
            Filter::ILike(col, pattern) => (col, format!("ilike.{pattern}")),
            Filter::IsNull(col) => (col, "is.null".to_string()),
            Filter::In(col, values) => {
                let list: Vec<String> = values.iter().map(render_value).collect();
                (col, format!("in.({})", list.join(",")))
            }
        };
        params.push((column.clone(), expr));
    }
    if !query.order.is_empty() {
        let order: Vec<String> = query
            .order
            .iter()
            .map(|o| format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" }))
            .collect();
        params.push(("order".to_string(), order.join(",")));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

/// Total from a `Content-Range` header such as `0-24/312` or `*/0`.
pub(crate) fn parse_content_range(header: &str) -> Option<usize> {
    header.rsplit('/').next()?.trim().parse().ok()
}

async fn check(resp: Response) -> ApiResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

async fn rows(resp: Response) -> ApiResult<Vec<Value>> {
    let text = check(resp).await?.text().await?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&text)?)
}

fn table_path(table: &str) -> String {
    format!("rest/v1/{table}")
}

impl Gateway for RestGateway {
    async fn select(&self, query: &Query) -> ApiResult<Vec<Value>> {
        let resp = self
            .request(Method::GET, &table_path(&query.table))
            .query(&query_params(query))
            .send()
            .await?;
        rows(resp).await
    }

    async fn insert(&self, table: &str, rows_in: Vec<Value>) -> ApiResult<Vec<Value>> {
        let resp = self
            .request(Method::POST, &table_path(table))
            .header("Prefer", "return=representation")
            .json(&rows_in)
            .send()
            .await?;
        rows(resp).await
    }

    async fn update(&self, query: &Query, patch: Value) -> ApiResult<Vec<Value>> {
        let resp = self
            .request(Method::PATCH, &table_path(&query.table))
            .header("Prefer", "return=representation")
            .query(&query_params(query))
            .json(&patch)
            .send()
            .await?;
        rows(resp).await
    }

    async fn delete(&self, query: &Query) -> ApiResult<()> {
        let resp = self
            .request(Method::DELETE, &table_path(&query.table))
            .query(&query_params(query))
            .send()
            .await?;
        check(resp).await?;
        Ok(())
    }

    async fn count(&self, query: &Query) -> ApiResult<usize> {
        let resp = self
            .request(Method::HEAD, &table_path(&query.table))
            .header("Prefer", "count=exact")
            .query(&query_params(query))
            .send()
            .await?;
        let resp = check(resp).await?;
        resp.headers()
            .get("content-range")
            .and_then(|h| h.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| ApiError::Decode("missing Content-Range on count".into()))
    }

    async fn rpc(&self, name: &str, args: Value) -> ApiResult<Value> {
        let resp = self
            .request(Method::POST, &format!("rest/v1/rpc/{name}"))
            .json(&args)
            .send()
            .await?;
        let text = check(resp).await?.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::Order;

    #[test]
    fn test_query_params_encoding() {
        let mut query = Query::new("households");
        query.columns = Some("id,name".into());
        query.filters = vec![
            Filter::Eq("owner_id".into(), Value::from("u1")),
            Filter::ILike("name".into(), "%smith%".into()),
            Filter::IsNull("instruction_id".into()),
            Filter::In("id".into(), vec![Value::from("a"), Value::from("b")]),
        ];
        query.order = vec![
            Order { column: "created_at".into(), ascending: false },
            Order { column: "name".into(), ascending: true },
        ];
        query.limit = Some(20);

        let params = query_params(&query);
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "id,name".to_string()),
                ("owner_id".to_string(), "eq.u1".to_string()),
                ("name".to_string(), "ilike.%smith%".to_string()),
                ("instruction_id".to_string(), "is.null".to_string()),
                ("id".to_string(), "in.(a,b)".to_string()),
                ("order".to_string(), "created_at.desc,name.asc".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-24/312"), Some(312));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-0/*"), None);
    }

    #[test]
    fn test_bearer_falls_back_to_api_key() {
        let gateway = RestGateway::new(BackendConfig::new("https://x.supabase.co", "anon"));
        assert_eq!(gateway.bearer(), "anon");

        *gateway.access_token().write().unwrap() = Some("user-jwt".into());
        assert_eq!(gateway.bearer(), "user-jwt");
    }
}
