use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::audit;
use crate::auth::Role;
use crate::config::AppConfig;
use crate::error::{ServiceError, StoreError, ValidationErrors};
use crate::lifecycle;
use crate::models::{Category, Event, EventFunction, EventPatch, EventStatus, NewEvent};
use crate::search::SearchFilters;
use crate::store::{EventStore, HttpStore, ListQuery};
use crate::validation;

pub type ServiceResult<T> = Result<T, ServiceError>;

const DEFAULT_PAGE_LIMIT: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSearchParams {
    pub query: Option<String>,
    pub categoria: Option<Category>,
    pub destacado: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(limit.max(1)));
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

pub struct EventService<S> {
    store: S,
    default_limit: u32,
}

impl EventService<HttpStore> {
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        Ok(Self::new(HttpStore::from_config(config)?).with_default_limit(config.page_size))
    }
}

impl<S: EventStore> EventService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list(&self, params: &EventSearchParams) -> ServiceResult<Paginated<Event>> {
        let query = ListQuery {
            q: params.query.clone(),
            categoria: params.categoria.map(|c| c.label().to_string()),
            destacado: params.destacado,
            page: params.page,
            limit: params.limit,
        };
        let page = self.store.list(&query).await?;
        let pagination = Pagination::new(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(self.default_limit),
            page.total,
        );
        Ok(Paginated {
            data: page.events,
            pagination,
        })
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<Event> {
        Ok(self.store.get(id).await?)
    }

    pub async fn featured(&self) -> ServiceResult<Vec<Event>> {
        Ok(self.store.list(&ListQuery::featured()).await?.events)
    }

    pub async fn by_category(&self, categoria: Category) -> ServiceResult<Vec<Event>> {
        let query = ListQuery {
            categoria: Some(categoria.label().to_string()),
            ..Default::default()
        };
        Ok(self.store.list(&query).await?.events)
    }

    pub async fn search(&self, text: &str) -> ServiceResult<Vec<Event>> {
        let query = ListQuery {
            q: Some(text.to_string()),
            ..Default::default()
        };
        Ok(self.store.list(&query).await?.events)
    }

    pub async fn home(&self, role: Role) -> ServiceResult<Vec<Event>> {
        let all = self.store.list(&ListQuery::default()).await?.events;
        Ok(lifecycle::home_listing(&all, role))
    }

    pub async fn browse(&self, filters: &SearchFilters, role: Role) -> ServiceResult<Vec<Event>> {
        let all = self.store.list(&ListQuery::default()).await?.events;
        let visible = lifecycle::visible_to(&all, role);
        if filters.is_empty() {
            return Ok(visible);
        }
        Ok(filters.apply(&visible, role))
    }

    /// Advisory only: the answer can be stale by the time a toggle lands.
    pub async fn can_highlight_event(&self) -> bool {
        match self.featured().await {
            Ok(featured) => lifecycle::can_highlight(featured.len()),
            Err(err) => {
                tracing::warn!("unable to check featured events: {err}");
                false
            }
        }
    }

    pub async fn create(&self, new_event: NewEvent) -> ServiceResult<Event> {
        validation::validate_new_event(&new_event)?;
        let event = build_event(new_event, generate_id(), &timestamp());
        let created = self.store.create(&event).await?;
        tracing::info!(id = %created.id, titulo = %created.titulo, "event created");
        Ok(created)
    }

    // Read then write with no concurrency token; concurrent edits can
    // drop each other's history records.
    pub async fn update(&self, id: &str, patch: EventPatch, edited_by: &str) -> ServiceResult<Event> {
        require_identity("edited_by", edited_by)?;
        validation::validate_patch(&patch)?;

        let current = self.store.get(id).await?;
        let now = timestamp();
        let record = audit::edit_record(&current, &patch, edited_by, &now);
        let changed = record.changed_fields.clone();
        let history = audit::append_record(current.history(), record);

        let mut body = patch_body(&patch)?;
        body.insert("updated_at".to_string(), json!(now));
        body.insert("last_edited_by".to_string(), json!(edited_by));
        body.insert("last_edited_at".to_string(), json!(now));
        body.insert("edit_history".to_string(), to_json(&history)?);

        let updated = self.store.patch(id, &Value::Object(body)).await?;
        tracing::info!(id, edited_by, ?changed, "event updated");
        Ok(updated)
    }

    /// Cancellation is recorded in its own fields, not in the edit history.
    pub async fn cancel(&self, id: &str, cancelled_by: &str) -> ServiceResult<Event> {
        require_identity("cancelled_by", cancelled_by)?;
        let now = timestamp();
        let body = json!({
            "status": EventStatus::Cancelled,
            "cancelled_at": now,
            "cancelled_by": cancelled_by,
            "updated_at": now,
        });
        let cancelled = self.store.patch(id, &body).await?;
        tracing::info!(id, cancelled_by, "event cancelled");
        Ok(cancelled)
    }

    pub async fn toggle_featured(&self, id: &str) -> ServiceResult<Event> {
        let current = self.store.get(id).await?;
        let body = json!({
            "destacado": !current.destacado,
            "updated_at": timestamp(),
        });
        let updated = self.store.patch(id, &body).await?;
        tracing::info!(id, destacado = updated.destacado, "featured flag toggled");
        Ok(updated)
    }

    pub async fn cancel_function(
        &self,
        id: &str,
        numero_funcion: u32,
        cancelled_by: &str,
    ) -> ServiceResult<Event> {
        require_identity("cancelled_by", cancelled_by)?;
        let current = self.store.get(id).await?;
        let now = timestamp();

        let mut funciones = current.functions().to_vec();
        let function = funciones
            .iter_mut()
            .find(|function| function.numero_funcion == numero_funcion)
            .ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.add("funciones", "La función seleccionada no existe");
                errors
            })?;
        function.status = Some(EventStatus::Cancelled);
        function.cancelled_at = Some(now.clone());
        function.cancelled_by = Some(cancelled_by.to_string());

        let body = json!({
            "funciones": to_json(&funciones)?,
            "updated_at": now,
        });
        let updated = self.store.patch(id, &body).await?;
        tracing::info!(id, numero_funcion, cancelled_by, "function cancelled");
        Ok(updated)
    }
}

fn require_identity(field: &str, identity: &str) -> Result<(), ValidationErrors> {
    if identity.trim().is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add(field, "Se requiere un usuario autenticado");
        return Err(errors);
    }
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, StoreError> {
    serde_json::to_value(value).map_err(|err| StoreError::Decode(err.to_string()))
}

fn patch_body(patch: &EventPatch) -> Result<Map<String, Value>, StoreError> {
    match to_json(patch)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Decode(format!("patch is not an object: {other}"))),
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Base-36 milliseconds followed by a random base-36 suffix. Unlikely to
/// collide, not meant to be unguessable.
pub fn generate_id() -> String {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let suffix: u64 = rand::rng().random();
    format!("{}{}", to_base36(millis), to_base36(suffix))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

fn build_event(new_event: NewEvent, id: String, now: &str) -> Event {
    let first_function = EventFunction {
        numero_funcion: 1,
        fecha: new_event.fecha.clone(),
        horario: new_event.horario.clone(),
        status: Some(EventStatus::Published),
        cancelled_at: None,
        cancelled_by: None,
    };
    Event {
        id,
        titulo: new_event.titulo,
        descripcion: new_event.descripcion,
        fecha: new_event.fecha,
        horario: new_event.horario,
        funciones: Some(vec![first_function]),
        ubicacion: new_event.ubicacion,
        categoria: new_event.categoria,
        modalidad: new_event.modalidad,
        aforo: new_event.aforo,
        destacado: new_event.destacado,
        valor_ingreso: new_event.valor_ingreso,
        organizador: new_event.organizador,
        imagen_caratula: new_event.imagen_caratula,
        servicios_adicionales: new_event.servicios_adicionales,
        status: EventStatus::Published,
        created_at: now.to_string(),
        updated_at: now.to_string(),
        created_by: new_event.created_by,
        updated_by: None,
        cancelled_at: None,
        cancelled_by: None,
        last_edited_by: None,
        last_edited_at: None,
        edit_history: None,
    }
}
