pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::models::Event;

pub use http::HttpStore;
pub use memory::MemoryStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub q: Option<String>,
    pub categoria: Option<String>,
    pub destacado: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn featured() -> Self {
        Self {
            destacado: Some(true),
            ..Default::default()
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(categoria) = self.categoria.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("categoria", categoria.to_string()));
        }
        if let Some(destacado) = self.destacado {
            pairs.push(("destacado", destacado.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("_page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("_limit", limit.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorePage {
    pub events: Vec<Event>,
    pub total: u64,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<StorePage, StoreError>;
    async fn get(&self, id: &str) -> Result<Event, StoreError>;
    async fn create(&self, event: &Event) -> Result<Event, StoreError>;
    /// Shallow merge of `body` into the stored record.
    async fn patch(&self, id: &str, body: &Value) -> Result<Event, StoreError>;
}
