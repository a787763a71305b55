use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::datetime;
use crate::models::Event;

const ALL_SENTINEL: &str = "all";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SearchFilters {
    pub busqueda: String,
    pub categoria: String,
    pub fecha: String,
    pub status: String,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        self.busqueda.trim().is_empty()
            && is_disabled(&self.categoria)
            && self.fecha.trim().is_empty()
            && is_disabled(&self.status)
    }

    pub fn apply(&self, events: &[Event], role: Role) -> Vec<Event> {
        let mut filtered: Vec<Event> = events.to_vec();

        let query = self.busqueda.trim().to_lowercase();
        if !query.is_empty() {
            filtered.retain(|event| matches_text(event, &query));
        }

        if !is_disabled(&self.categoria) {
            filtered.retain(|event| event.categoria.label() == self.categoria);
        }

        let fecha = self.fecha.trim();
        if !fecha.is_empty() {
            filtered.retain(|event| datetime::compare_dates(&event.fecha, fecha));
        }

        if role == Role::Admin && !is_disabled(&self.status) {
            filtered.retain(|event| event.status.as_str() == self.status);
        }

        filtered
    }
}

fn is_disabled(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL)
}

fn matches_text(event: &Event, query: &str) -> bool {
    [
        &event.titulo,
        &event.descripcion,
        &event.organizador.nombre,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(query))
}
