//! # Store
//!
//! Read-only REST client for the remote relational backend.
//!
//! All durable state lives server-side; this crate only issues narrow
//! queries against the generated REST surface (`/rest/v1/<table>` with
//! PostgREST-style parameters). Writes never go through here — every
//! mutation is delegated to the workflow webhooks by the main crate.
//!
//! ## Queries
//!
//! - Recent rows of a table, ordered by a stamp column, bounded.
//! - Identifier sample matching a prefix (`ilike prefix%`, descending,
//!   bounded to 20 rows) for sequence derivation.
//! - Single row by field equality, used for history lookups.
//! - Session token for a user, used by the duplicate-session guard.

use anyhow::Error;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const SESSION_TABLE: &str = "smo_sessoes";
pub const SESSION_USER_FIELD: &str = "usuario";
pub const SESSION_TOKEN_FIELD: &str = "token";

pub struct Store {
    base_url: String,
    api_key: String,
    client: Client,
}

impl Store {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: Client::new(),
        }
    }

    fn read(&self, table: &str) -> RequestBuilder {
        self.client
            .get(table_url(&self.base_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    pub async fn list_recent<T: DeserializeOwned>(
        &self,
        table: &str,
        order_by: &str,
        descending: bool,
        limit: usize,
    ) -> Result<Vec<T>, Error> {
        let rows = self
            .read(table)
            .query(&[
                ("select", "*".to_string()),
                ("order", order_param(order_by, descending)),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(rows)
    }

    pub async fn list_ids_like(
        &self,
        table: &str,
        id_field: &str,
        prefix: &str,
        limit: usize,
    ) -> Result<Vec<String>, Error> {
        let rows: Vec<Value> = self
            .read(table)
            .query(&[
                ("select", id_field.to_string()),
                (id_field, like_pattern(prefix)),
                ("order", order_param(id_field, true)),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(rows
            .iter()
            .filter_map(|row| row.get(id_field).and_then(Value::as_str))
            .map(str::to_string)
            .collect())
    }

    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<T>, Error> {
        let rows: Vec<T> = self
            .read(table)
            .query(&[
                ("select", "*".to_string()),
                (field, format!("eq.{value}")),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(rows.into_iter().next())
    }

    pub async fn session_token(&self, user: &str) -> Result<Option<String>, Error> {
        let row: Option<Value> = self
            .get_by_id(SESSION_TABLE, SESSION_USER_FIELD, user)
            .await?;

        Ok(row
            .and_then(|row| {
                row.get(SESSION_TOKEN_FIELD)
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .filter(|token| !token.is_empty()))
    }
}

fn table_url(base_url: &str, table: &str) -> String {
    format!("{base_url}/rest/v1/{table}")
}

fn order_param(field: &str, descending: bool) -> String {
    let direction = if descending { "desc" } else { "asc" };
    format!("{field}.{direction}")
}

fn like_pattern(prefix: &str) -> String {
    format!("ilike.{prefix}%")
}

#[cfg(test)]
mod tests {
    use super::{like_pattern, order_param, table_url};

    #[test]
    fn test_table_url() {
        assert_eq!(
            table_url("http://localhost:54321", "smo_manifestos"),
            "http://localhost:54321/rest/v1/smo_manifestos"
        );
    }

    #[test]
    fn test_order_param() {
        assert_eq!(order_param("carimbo", true), "carimbo.desc");
        assert_eq!(order_param("manifesto", false), "manifesto.asc");
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("MAO-25"), "ilike.MAO-25%");
    }
}
