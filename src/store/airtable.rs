use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::api::RecordStore;
use super::types::{DecisionFields, DecisionRecord, OrderFields, OrderRecord, Record};
use crate::config::AirtableConfig;

/// Airtable-backed record store. Decision records live in the news table,
/// order records in the orders table, both under one base.
pub struct AirtableStore {
    http_client: Client,
    host: String,
    api_key: String,
    base_id: String,
    news_table: String,
    orders_table: String,
}

#[derive(Debug, serde::Deserialize)]
struct ListResponse<T> {
    records: Vec<Record<T>>,
}

impl AirtableStore {
    pub fn new(config: &AirtableConfig) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            host: config.host.clone(),
            api_key: config.api_key.clone(),
            base_id: config.base_id.clone(),
            news_table: config.news_table.clone(),
            orders_table: config.orders_table.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/v0/{}/{}", self.host, self.base_id, table)
    }

    /// Equality-filtered read against one table.
    async fn list<T: DeserializeOwned>(&self, table: &str, formula: &str) -> Result<Vec<Record<T>>> {
        debug!("Listing {} with formula {}", table, formula);

        let resp = self
            .http_client
            .get(self.table_url(table))
            .query(&[("filterByFormula", formula)])
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("Airtable list on {} returned status {}", table, resp.status());
        }

        let body: ListResponse<T> = resp.json().await?;
        Ok(body.records)
    }

    async fn insert<T: Serialize + DeserializeOwned>(
        &self,
        table: &str,
        fields: &T,
    ) -> Result<Record<T>> {
        let resp = self
            .http_client
            .post(self.table_url(table))
            .bearer_auth(&self.api_key)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!(
                "Airtable insert into {} returned status {}",
                table,
                resp.status()
            );
        }

        Ok(resp.json().await?)
    }

    async fn update_fields(
        &self,
        table: &str,
        record_id: &str,
        fields: serde_json::Value,
    ) -> Result<()> {
        let resp = self
            .http_client
            .patch(format!("{}/{}", self.table_url(table), record_id))
            .bearer_auth(&self.api_key)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!(
                "Airtable update of {}/{} returned status {}",
                table,
                record_id,
                resp.status()
            );
        }

        Ok(())
    }

    /// Build a `{Column}='value'` equality formula, escaping embedded quotes.
    fn equals_formula(column: &str, value: &str) -> String {
        format!("{{{}}}='{}'", column, value.replace('\'', "\\'"))
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    async fn find_decisions_by_url(&self, url: &str) -> Result<Vec<DecisionRecord>> {
        self.list(&self.news_table, &Self::equals_formula("URL", url))
            .await
    }

    async fn insert_decision(&self, fields: &DecisionFields) -> Result<DecisionRecord> {
        self.insert(&self.news_table, fields).await
    }

    async fn pending_decisions(&self) -> Result<Vec<DecisionRecord>> {
        self.list(&self.news_table, "NOT({Processed})").await
    }

    async fn mark_decision_processed(&self, record_id: &str) -> Result<()> {
        self.update_fields(&self.news_table, record_id, json!({ "Processed": true }))
            .await
    }

    async fn insert_order(&self, fields: &OrderFields) -> Result<OrderRecord> {
        self.insert(&self.orders_table, fields).await
    }

    async fn open_orders(&self) -> Result<Vec<OrderRecord>> {
        self.list(&self.orders_table, "NOT({Closed})").await
    }

    async fn mark_order_closed(&self, record_id: &str) -> Result<()> {
        self.update_fields(&self.orders_table, record_id, json!({ "Closed": true }))
            .await
    }
}
