pub mod audit;
pub mod auth;
pub mod config;
pub mod datetime;
pub mod error;
pub mod format;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod search;
pub mod service;
pub mod store;
pub mod trends;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use auth::{AuthSession, Role, User};
pub use config::{AppConfig, ConfigStore};
pub use error::{ServiceError, StoreError, ValidationErrors};
pub use models::{
    AdditionalService, AdmissionFee, Category, EditRecord, Event, EventFunction, EventPatch,
    EventStatus, FieldChange, Location, Modality, NewEvent, Organizer,
};
pub use search::SearchFilters;
pub use service::{EventSearchParams, EventService, Paginated, Pagination};
pub use store::{EventStore, HttpStore, ListQuery, MemoryStore};
pub use trends::TrendsReport;
