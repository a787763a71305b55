use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{EventStore, ListQuery, StorePage};
use crate::error::StoreError;
use crate::models::Event;

const DEFAULT_PAGE_LIMIT: u32 = 10;

/// In-process store mirroring json-server: full-text `q`, exact field
/// filters, `_page`/`_limit` paging and shallow-merge PATCH.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Result<Self, StoreError> {
        let records = events
            .iter()
            .map(to_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn to_record(event: &Event) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(event) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Decode(format!("event is not an object: {other}"))),
        Err(err) => Err(StoreError::Decode(err.to_string())),
    }
}

fn from_record(record: &Map<String, Value>) -> Result<Event, StoreError> {
    serde_json::from_value(Value::Object(record.clone()))
        .map_err(|err| StoreError::Decode(err.to_string()))
}

fn record_id(record: &Map<String, Value>) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(text) => text.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|item| contains_text(item, needle)),
        Value::Object(map) => map.values().any(|item| contains_text(item, needle)),
        _ => false,
    }
}

fn matches(record: &Map<String, Value>, query: &ListQuery) -> bool {
    if let Some(q) = query.q.as_deref().filter(|q| !q.is_empty()) {
        let needle = q.to_lowercase();
        if !record.values().any(|value| contains_text(value, &needle)) {
            return false;
        }
    }
    if let Some(categoria) = query.categoria.as_deref().filter(|c| !c.is_empty()) {
        if record.get("categoria").and_then(Value::as_str) != Some(categoria) {
            return false;
        }
    }
    if let Some(destacado) = query.destacado {
        let stored = record
            .get("destacado")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if stored != destacado {
            return false;
        }
    }
    true
}

fn not_found() -> StoreError {
    StoreError::Status {
        status: 404,
        text: "Not Found".to_string(),
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list(&self, query: &ListQuery) -> Result<StorePage, StoreError> {
        let records = self.records.read().await;
        let matching: Vec<&Map<String, Value>> =
            records.iter().filter(|record| matches(record, query)).collect();
        let total = matching.len() as u64;

        let window: Vec<&Map<String, Value>> = if query.page.is_some() || query.limit.is_some() {
            let limit = query.limit.unwrap_or(DEFAULT_PAGE_LIMIT).max(1) as usize;
            let page = query.page.unwrap_or(1).max(1) as usize;
            matching
                .into_iter()
                .skip((page - 1) * limit)
                .take(limit)
                .collect()
        } else {
            matching
        };

        let events = window
            .into_iter()
            .map(from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StorePage { events, total })
    }

    async fn get(&self, id: &str) -> Result<Event, StoreError> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|record| record_id(record) == Some(id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
            .and_then(from_record)
    }

    async fn create(&self, event: &Event) -> Result<Event, StoreError> {
        let record = to_record(event)?;
        let mut records = self.records.write().await;
        if records.iter().any(|existing| record_id(existing) == Some(event.id.as_str())) {
            return Err(StoreError::Status {
                status: 500,
                text: "Internal Server Error".to_string(),
            });
        }
        let created = from_record(&record)?;
        records.push(record);
        Ok(created)
    }

    async fn patch(&self, id: &str, body: &Value) -> Result<Event, StoreError> {
        let Value::Object(changes) = body else {
            return Err(StoreError::Status {
                status: 400,
                text: "Bad Request".to_string(),
            });
        };
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record_id(record) == Some(id))
            .ok_or_else(not_found)?;

        let mut merged = record.clone();
        for (key, value) in changes {
            if key != "id" {
                merged.insert(key.clone(), value.clone());
            }
        }
        let updated = from_record(&merged)?;
        *record = merged;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::event;
    use serde_json::json;

    fn seeded() -> MemoryStore {
        let mut featured = event("b", "21/06/2030", "18:00");
        featured.destacado = true;
        featured.titulo = "Concierto de Jazz".to_string();
        let events = vec![
            event("a", "20/06/2030", "18:00"),
            featured,
            event("c", "22/06/2030", "18:00"),
        ];
        MemoryStore::with_events(events).expect("seed")
    }

    #[tokio::test]
    async fn filters_and_pages_like_json_server() {
        let store = seeded();

        let page = store
            .list(&ListQuery {
                q: Some("JAZZ".to_string()),
                ..Default::default()
            })
            .await
            .expect("search");
        assert_eq!(page.total, 1);
        assert_eq!(page.events[0].id, "b");

        let featured = store.list(&ListQuery::featured()).await.expect("featured");
        assert_eq!(featured.total, 1);

        let second = store
            .list(&ListQuery {
                page: Some(2),
                limit: Some(2),
                ..Default::default()
            })
            .await
            .expect("page two");
        assert_eq!(second.total, 3);
        assert_eq!(second.events.len(), 1);
        assert_eq!(second.events[0].id, "c");
    }

    #[tokio::test]
    async fn patch_merges_top_level_fields() {
        let store = seeded();
        let updated = store
            .patch("a", &json!({ "aforo": 250, "id": "hijack" }))
            .await
            .expect("patch");
        assert_eq!(updated.id, "a");
        assert_eq!(updated.aforo, 250);
        assert_eq!(updated.titulo, "Evento a");
        assert_eq!(store.get("a").await.expect("get").aforo, 250);
    }

    #[tokio::test]
    async fn unknown_ids_fail() {
        let store = seeded();
        assert_eq!(
            store.get("zzz").await.unwrap_err(),
            StoreError::NotFound("zzz".to_string())
        );
        assert!(matches!(
            store.patch("zzz", &json!({})).await.unwrap_err(),
            StoreError::Status { status: 404, .. }
        ));
        let duplicate = event("a", "20/06/2030", "18:00");
        assert!(store.create(&duplicate).await.is_err());
        assert_eq!(store.len().await, 3);
    }
}
