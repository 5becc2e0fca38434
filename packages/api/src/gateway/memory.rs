//! In-process [`Gateway`] holding JSON tables, for tests and local demos.
//!
//! Filters, ordering and limits are evaluated here the way PostgREST would.
//! Inserted rows get an `id` (UUID v4) and `created_at` (RFC 3339) when the
//! caller leaves them out. Row-level security is not modelled.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{json, Map, Value};

use super::{Filter, Gateway, Order, Query};
use crate::error::{ApiError, ApiResult};

#[derive(Clone, Debug, Default)]
pub struct MemoryGateway {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with [`ApiError::Network`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, AtomicOrdering::SeqCst);
    }

    /// Snapshot of every row currently in `table`.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables().get(table).cloned().unwrap_or_default()
    }

    fn tables(&self) -> MutexGuard<'_, HashMap<String, Vec<Value>>> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_online(&self) -> ApiResult<()> {
        if self.offline.load(AtomicOrdering::SeqCst) {
            return Err(ApiError::Network("connection unavailable".into()));
        }
        Ok(())
    }

    fn matching(&self, query: &Query) -> Vec<Value> {
        let tables = self.tables();
        let mut rows: Vec<Value> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| matches(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        sort_rows(&mut rows, &query.order);
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        rows
    }

    fn shared_recipe(&self, token: &str) -> Value {
        let share = self.first("recipe_shares", |row| row["token"] == json!(token));
        let Some(recipe_id) = share.as_ref().and_then(|s| s["recipe_id"].as_str()) else {
            return Value::Null;
        };
        let Some(mut recipe) = self.first("recipes", |row| row["id"] == json!(recipe_id)) else {
            return Value::Null;
        };

        let author = recipe
            .get("author_id")
            .and_then(Value::as_str)
            .and_then(|author_id| self.first("users", |row| row["id"] == json!(author_id)))
            .map(|user| json!({ "id": user["id"], "display_name": user["display_name"] }))
            .unwrap_or(Value::Null);

        let by_recipe = |table: &str, order: &str| {
            let mut q = Query::new(table);
            q.filters.push(Filter::Eq("recipe_id".into(), json!(recipe_id)));
            q.order.push(Order {
                column: order.to_string(),
                ascending: true,
            });
            Value::Array(self.matching(&q))
        };

        if let Value::Object(fields) = &mut recipe {
            fields.insert("author".into(), author);
            fields.insert("images".into(), by_recipe("recipe_images", "order_index"));
            fields.insert("ingredients".into(), by_recipe("ingredients", "sort_order"));
            fields.insert("instructions".into(), by_recipe("instructions", "step_number"));
        }
        recipe
    }

    fn first(&self, table: &str, pred: impl Fn(&Value) -> bool) -> Option<Value> {
        self.tables()
            .get(table)
            .and_then(|rows| rows.iter().find(|row| pred(row)).cloned())
    }
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn values_equal(a: Option<&Value>, b: &Value) -> bool {
    match a {
        Some(a) => a == b || (render(a).is_some() && render(a) == render(b)),
        None => b.is_null(),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Token {
    Any,
    One,
    Char(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => Token::Any,
            '_' => Token::One,
            '\\' => Token::Char(chars.next().unwrap_or('\\')),
            c => Token::Char(c),
        });
    }
    tokens
}

/// SQL `ILIKE`: `%` matches any run, `_` exactly one character, and `\` escapes
/// the next character.
pub(crate) fn ilike(pattern: &str, text: &str) -> bool {
    let pattern = tokenize(&pattern.to_lowercase());
    let text: Vec<char> = text.to_lowercase().chars().collect();

    let (mut p, mut t) = (0, 0);
    // Position of the last `%` and the text index it is currently covering up to.
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some(Token::Any) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(Token::One) => {
                p += 1;
                t += 1;
            }
            Some(Token::Char(c)) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, covered)) => {
                    p = star + 1;
                    t = covered + 1;
                    backtrack = Some((star, covered + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|token| *token == Token::Any)
}

fn matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq(col, v) => values_equal(row.get(col), v),
        Filter::ILike(col, pattern) => row
            .get(col)
            .and_then(Value::as_str)
            .is_some_and(|s| ilike(pattern, s)),
        Filter::IsNull(col) => row.get(col).map_or(true, Value::is_null),
        Filter::In(col, values) => values.iter().any(|v| values_equal(row.get(col), v)),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => render(x).cmp(&render(y)),
    }
}

fn sort_rows(rows: &mut [Value], order: &[Order]) {
    rows.sort_by(|a, b| {
        for o in order {
            let ord = compare(a.get(&o.column), b.get(&o.column));
            let ord = if o.ascending { ord } else { ord.reverse() };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

impl Gateway for MemoryGateway {
    async fn select(&self, query: &Query) -> ApiResult<Vec<Value>> {
        self.ensure_online()?;
        Ok(self.matching(query))
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> ApiResult<Vec<Value>> {
        self.ensure_online()?;
        let now = chrono::Utc::now().to_rfc3339();
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(mut fields) = row else {
                return Err(ApiError::Validation("row must be a JSON object".into()));
            };
            if !fields.get("id").is_some_and(|v| !v.is_null()) {
                fields.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));
            }
            if !fields.get("created_at").is_some_and(|v| !v.is_null()) {
                fields.insert("created_at".into(), json!(now));
            }
            stored.push(Value::Object(fields));
        }
        self.tables()
            .entry(table.to_string())
            .or_default()
            .extend(stored.iter().cloned());
        Ok(stored)
    }

    async fn update(&self, query: &Query, patch: Value) -> ApiResult<Vec<Value>> {
        self.ensure_online()?;
        let Value::Object(patch) = patch else {
            return Err(ApiError::Validation("patch must be a JSON object".into()));
        };
        let mut tables = self.tables();
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(&query.table) {
            for row in rows.iter_mut() {
                if !query.filters.iter().all(|f| matches(row, f)) {
                    continue;
                }
                if let Value::Object(fields) = row {
                    merge(fields, &patch);
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, query: &Query) -> ApiResult<()> {
        self.ensure_online()?;
        if let Some(rows) = self.tables().get_mut(&query.table) {
            rows.retain(|row| !query.filters.iter().all(|f| matches(row, f)));
        }
        Ok(())
    }

    async fn count(&self, query: &Query) -> ApiResult<usize> {
        self.ensure_online()?;
        let mut unbounded = query.clone();
        unbounded.limit = None;
        Ok(self.matching(&unbounded).len())
    }

    async fn rpc(&self, name: &str, args: Value) -> ApiResult<Value> {
        self.ensure_online()?;
        match name {
            "get_shared_recipe" => {
                let token = args["token_input"].as_str().unwrap_or_default();
                Ok(self.shared_recipe(token))
            }
            other => Err(ApiError::Status {
                status: 404,
                message: format!("function {other} does not exist"),
            }),
        }
    }
}

fn merge(fields: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (k, v) in patch {
        fields.insert(k.clone(), v.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        id: String,
        name: String,
    }

    #[test]
    fn test_ilike_patterns() {
        assert!(ilike("%smith%", "The Smith Family"));
        assert!(ilike("smith%", "Smithsonian"));
        assert!(!ilike("smith%", "The Smiths"));
        assert!(ilike("%ily", "Family"));
        assert!(ilike("a%c%e", "abcde"));
        assert!(!ilike("a%c%e", "abdef"));
        assert!(ilike("exact", "EXACT"));
        assert!(!ilike("exact", "exactly"));
        assert!(ilike("a%a", "aa"));
        assert!(!ilike("a%a", "a"));
    }

    #[test]
    fn test_ilike_single_char_wildcard() {
        assert!(ilike("sm_th", "Smith"));
        assert!(ilike("sm_th", "SMYTH"));
        assert!(!ilike("sm_th", "Smth"));
        assert!(!ilike("sm_th", "Smiith"));
        assert!(ilike("%_ousehold", "The Household"));
        assert!(ilike("_", "é"));
        assert!(!ilike("_", ""));
        assert!(ilike("%", ""));
        assert!(ilike("100\\%", "100%"));
        assert!(!ilike("100\\%", "1000"));
        assert!(ilike("a\\_b", "a_b"));
        assert!(!ilike("a\\_b", "axb"));
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_created_at() {
        let gateway = MemoryGateway::new();
        let row: Value = gateway
            .from("households")
            .insert(&json!({ "name": "Oak House" }))
            .await
            .unwrap();
        assert!(row["id"].as_str().is_some_and(|s| !s.is_empty()));
        assert!(row["created_at"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_filters_order_and_limit() {
        let gateway = MemoryGateway::new();
        let rows = vec![
            json!({ "id": "1", "name": "Birch", "rank": 3, "owner": null }),
            json!({ "id": "2", "name": "Aspen", "rank": 1, "owner": "u1" }),
            json!({ "id": "3", "name": "Cedar", "rank": 2 }),
        ];
        gateway.insert("trees", rows).await.unwrap();

        let ordered: Vec<Row> = gateway.from("trees").order("rank", false).fetch().await.unwrap();
        let names: Vec<&str> = ordered.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Birch", "Cedar", "Aspen"]);

        let no_owner: Vec<Row> = gateway
            .from("trees")
            .is_null("owner")
            .order("name", true)
            .limit(1)
            .fetch()
            .await
            .unwrap();
        assert_eq!(no_owner.len(), 1);
        assert_eq!(no_owner[0].id, "1");

        let picked = gateway.from("trees").in_list("id", ["1", "3"]).count().await.unwrap();
        assert_eq!(picked, 2);

        let missing = gateway.from("trees").eq("id", "9").single::<Row>().await;
        assert!(matches!(missing, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let gateway = MemoryGateway::new();
        gateway
            .insert("trees", vec![json!({ "id": "1", "name": "Birch" })])
            .await
            .unwrap();

        let n = gateway
            .from("trees")
            .eq("id", "1")
            .update(&json!({ "name": "Silver Birch" }))
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(gateway.rows("trees")[0]["name"], "Silver Birch");

        gateway.from("trees").eq("id", "1").delete().await.unwrap();
        assert!(gateway.rows("trees").is_empty());
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let gateway = MemoryGateway::new();
        gateway.set_offline(true);
        let result = gateway.from("recipes").fetch::<Value>().await;
        assert!(matches!(result, Err(ApiError::Network(_))));

        gateway.set_offline(false);
        assert!(gateway.from("recipes").fetch::<Value>().await.unwrap().is_empty());
    }
}
