use chrono::DateTime;
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::datetime;
use crate::error::ValidationErrors;
use crate::models::{AdmissionFee, EventPatch, Location, NewEvent, Organizer};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^3[0-9]{9}$").expect("valid phone regex"));
static COMUNA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)comuna\s+\d+").expect("valid comuna regex"));

const MAX_AFORO: u32 = 100_000;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Ten digits starting with 3. Spaces are ignored.
pub fn is_valid_colombian_phone(phone: &str) -> bool {
    let compact: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE_RE.is_match(&compact)
}

pub fn is_valid_url(value: &str) -> bool {
    reqwest::Url::parse(value).is_ok()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn check_length(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    min: usize,
    max: Option<usize>,
    message: &str,
) {
    let len = char_len(value);
    if len < min || max.is_some_and(|max| len > max) {
        errors.add(field, message);
    }
}

fn check_titulo(errors: &mut ValidationErrors, titulo: &str) {
    check_length(
        errors,
        "titulo",
        titulo,
        5,
        Some(100),
        "El título debe tener entre 5 y 100 caracteres",
    );
}

fn check_descripcion(errors: &mut ValidationErrors, descripcion: &str) {
    check_length(
        errors,
        "descripcion",
        descripcion,
        20,
        Some(1000),
        "La descripción debe tener entre 20 y 1000 caracteres",
    );
}

fn check_fecha(errors: &mut ValidationErrors, fecha: &str) {
    if !datetime::is_valid_date_format(fecha) {
        errors.add("fecha", "Formato de fecha inválido (dd/mm/yyyy)");
    }
}

fn check_horario(errors: &mut ValidationErrors, horario: &str) {
    if !datetime::is_valid_time_format(horario) {
        errors.add("horario", "Formato de hora inválido (HH:mm)");
    }
}

fn check_aforo(errors: &mut ValidationErrors, aforo: u32) {
    if aforo < 1 {
        errors.add("aforo", "El aforo debe ser mayor a 0");
    } else if aforo > MAX_AFORO {
        errors.add("aforo", "El aforo no puede exceder 100,000 personas");
    }
}

fn check_valor(errors: &mut ValidationErrors, valor: &AdmissionFee) {
    if let AdmissionFee::Amount(amount) = valor {
        if !amount.is_finite() || *amount < 0.0 {
            errors.add("valor_ingreso", "El valor no puede ser negativo");
        }
    }
}

pub fn validate_location(errors: &mut ValidationErrors, ubicacion: &Location) {
    if char_len(&ubicacion.direccion_completa) < 10 {
        errors.add(
            "ubicacion.direccion_completa",
            "La dirección debe incluir al menos comuna y nombre del lugar",
        );
    }
    if !COMUNA_RE.is_match(&ubicacion.direccion_completa) {
        errors.add(
            "ubicacion.direccion_completa",
            "La dirección debe incluir la comuna",
        );
    }
    check_length(
        errors,
        "ubicacion.comuna_barrio",
        &ubicacion.comuna_barrio,
        3,
        None,
        "Ingrese la comuna o barrio",
    );
    check_length(
        errors,
        "ubicacion.direccion_detallada",
        &ubicacion.direccion_detallada,
        5,
        None,
        "Ingrese la dirección completa",
    );
    if let Some(enlace) = ubicacion.enlace_mapa.as_deref() {
        if !enlace.is_empty() && !is_valid_url(enlace) {
            errors.add("ubicacion.enlace_mapa", "Ingrese una URL válida");
        }
    }
}

pub fn validate_organizer(errors: &mut ValidationErrors, organizador: &Organizer) {
    let nombre_len = char_len(&organizador.nombre);
    if nombre_len < 5 {
        errors.add(
            "organizador.nombre",
            "El nombre debe tener al menos 5 caracteres",
        );
    } else if nombre_len > 100 {
        errors.add(
            "organizador.nombre",
            "El nombre no puede exceder 100 caracteres",
        );
    }
    if !is_valid_colombian_phone(&organizador.celular) {
        errors.add(
            "organizador.celular",
            "Ingrese un número de celular válido (10 dígitos, iniciando con 3)",
        );
    }
    let id_len = char_len(&organizador.identificacion);
    if id_len < 6 {
        errors.add(
            "organizador.identificacion",
            "La identificación debe tener al menos 6 caracteres",
        );
    } else if id_len > 20 {
        errors.add(
            "organizador.identificacion",
            "La identificación no puede exceder 20 caracteres",
        );
    }
    if !is_valid_email(&organizador.email) {
        errors.add("organizador.email", "Ingrese un correo electrónico válido");
    }
}

fn check_future(errors: &mut ValidationErrors, fecha: &str, horario: &str, now: &DateTime<Tz>) {
    if !datetime::is_future_date_time_at(fecha, horario, now) {
        errors.add("fecha", "La fecha y hora del evento debe ser futura");
    }
}

pub fn validate_new_event(event: &NewEvent) -> Result<(), ValidationErrors> {
    validate_new_event_at(event, &datetime::now())
}

pub fn validate_new_event_at(event: &NewEvent, now: &DateTime<Tz>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    check_titulo(&mut errors, &event.titulo);
    check_descripcion(&mut errors, &event.descripcion);
    check_fecha(&mut errors, &event.fecha);
    check_horario(&mut errors, &event.horario);
    validate_location(&mut errors, &event.ubicacion);
    check_aforo(&mut errors, event.aforo);
    check_valor(&mut errors, &event.valor_ingreso);
    validate_organizer(&mut errors, &event.organizador);
    if !errors.has("fecha") && !errors.has("horario") {
        check_future(&mut errors, &event.fecha, &event.horario, now);
    }
    errors.into_result()
}

/// Applies the form rules to the fields present in a partial update. The
/// future-date rule runs only when both date and time are being changed.
pub fn validate_patch(patch: &EventPatch) -> Result<(), ValidationErrors> {
    validate_patch_at(patch, &datetime::now())
}

pub fn validate_patch_at(patch: &EventPatch, now: &DateTime<Tz>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if let Some(titulo) = &patch.titulo {
        check_titulo(&mut errors, titulo);
    }
    if let Some(descripcion) = &patch.descripcion {
        check_descripcion(&mut errors, descripcion);
    }
    if let Some(fecha) = &patch.fecha {
        check_fecha(&mut errors, fecha);
    }
    if let Some(horario) = &patch.horario {
        check_horario(&mut errors, horario);
    }
    if let Some(ubicacion) = &patch.ubicacion {
        validate_location(&mut errors, ubicacion);
    }
    if let Some(aforo) = patch.aforo {
        check_aforo(&mut errors, aforo);
    }
    if let Some(valor) = &patch.valor_ingreso {
        check_valor(&mut errors, valor);
    }
    if let Some(organizador) = &patch.organizador {
        validate_organizer(&mut errors, organizador);
    }
    if let (Some(fecha), Some(horario)) = (&patch.fecha, &patch.horario) {
        if !errors.has("fecha") && !errors.has("horario") {
            check_future(&mut errors, fecha, horario, now);
        }
    }
    errors.into_result()
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct FilterRange {
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub valor_min: Option<f64>,
    pub valor_max: Option<f64>,
}

pub fn validate_filters(filters: &FilterRange) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (field, value) in [
        ("fecha_inicio", &filters.fecha_inicio),
        ("fecha_fin", &filters.fecha_fin),
    ] {
        if let Some(date) = value.as_deref() {
            if !date.is_empty() && !datetime::is_valid_date_format(date) {
                errors.add(field, "Formato de fecha inválido");
            }
        }
    }
    for (field, value) in [
        ("valor_min", filters.valor_min),
        ("valor_max", filters.valor_max),
    ] {
        if value.is_some_and(|v| v < 0.0) {
            errors.add(field, "El valor no puede ser negativo");
        }
    }
    if let (Some(min), Some(max)) = (filters.valor_min, filters.valor_max) {
        if min > max {
            errors.add("valor_min", "El valor mínimo no puede ser mayor al máximo");
        }
    }
    errors.into_result()
}

pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if char_len(username) < 3 {
        errors.add("username", "El usuario debe tener al menos 3 caracteres");
    }
    if char_len(password) < 6 {
        errors.add("password", "La contraseña debe tener al menos 6 caracteres");
    }
    errors.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Modality};

    fn now() -> DateTime<Tz> {
        datetime::combine_date_and_time("10/06/2025", "12:00").expect("fixed now")
    }

    fn valid_event() -> NewEvent {
        NewEvent {
            titulo: "Noche de Salsa".to_string(),
            descripcion: "Orquesta en vivo y clases para principiantes".to_string(),
            fecha: "20/06/2025".to_string(),
            horario: "20:00".to_string(),
            ubicacion: Location {
                direccion_completa: "Comuna 10 La Candelaria, Teatro Pablo Tobón".to_string(),
                comuna_barrio: "La Candelaria".to_string(),
                direccion_detallada: "Carrera 40 # 51-24".to_string(),
                enlace_mapa: Some(String::new()),
            },
            categoria: Category::Culturales,
            modalidad: Modality::Presencial,
            aforo: 300,
            destacado: false,
            valor_ingreso: AdmissionFee::Amount(30000.0),
            organizador: Organizer {
                nombre: "Salsa al Parque".to_string(),
                celular: "300 123 4567".to_string(),
                identificacion: "1020304050".to_string(),
                email: "info@salsa.co".to_string(),
            },
            imagen_caratula: None,
            servicios_adicionales: Vec::new(),
            created_by: None,
        }
    }

    #[test]
    fn accepts_a_complete_event() {
        assert_eq!(validate_new_event_at(&valid_event(), &now()), Ok(()));
    }

    #[test]
    fn reports_every_broken_field() {
        let mut event = valid_event();
        event.titulo = "Hola".to_string();
        event.ubicacion.direccion_completa = "Centro de la ciudad".to_string();
        event.organizador.celular = "2001234567".to_string();
        event.organizador.email = "sin-arroba".to_string();
        event.aforo = 0;

        let errors = validate_new_event_at(&event, &now()).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                "aforo",
                "organizador.celular",
                "organizador.email",
                "titulo",
                "ubicacion.direccion_completa",
            ]
        );
        assert_eq!(
            errors.get("ubicacion.direccion_completa"),
            Some(&["La dirección debe incluir la comuna".to_string()][..])
        );
    }

    #[test]
    fn past_dates_are_rejected_on_fecha() {
        let mut event = valid_event();
        event.fecha = "01/06/2025".to_string();
        let errors = validate_new_event_at(&event, &now()).unwrap_err();
        assert_eq!(
            errors.get("fecha"),
            Some(&["La fecha y hora del evento debe ser futura".to_string()][..])
        );
    }

    #[test]
    fn malformed_date_skips_the_future_rule() {
        let mut event = valid_event();
        event.fecha = "2025-06-20".to_string();
        let errors = validate_new_event_at(&event, &now()).unwrap_err();
        assert_eq!(errors.get("fecha").map(<[String]>::len), Some(1));
    }

    #[test]
    fn patch_only_checks_present_fields() {
        let patch = EventPatch {
            aforo: Some(500),
            ..Default::default()
        };
        assert!(validate_patch_at(&patch, &now()).is_ok());

        let patch = EventPatch {
            aforo: Some(200_000),
            fecha: Some("01/06/2025".to_string()),
            ..Default::default()
        };
        let errors = validate_patch_at(&patch, &now()).unwrap_err();
        assert!(errors.has("aforo"));
        assert!(!errors.has("fecha"), "past date alone is not checked");
    }

    #[test]
    fn phone_and_email_helpers() {
        assert!(is_valid_colombian_phone("3001234567"));
        assert!(is_valid_colombian_phone("300 123 4567"));
        assert!(!is_valid_colombian_phone("300123456"));
        assert!(!is_valid_colombian_phone("6041234567"));
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.co"));
    }

    #[test]
    fn filter_range_must_be_ordered() {
        let filters = FilterRange {
            fecha_inicio: Some("32/01/2025".to_string()),
            valor_min: Some(50_000.0),
            valor_max: Some(10_000.0),
            ..Default::default()
        };
        let errors = validate_filters(&filters).unwrap_err();
        assert!(errors.has("fecha_inicio"));
        assert!(errors.has("valor_min"));
        assert!(validate_filters(&FilterRange::default()).is_ok());
    }

    #[test]
    fn login_lengths() {
        assert!(validate_login("user1", "secreto").is_ok());
        let errors = validate_login("ab", "123").unwrap_err();
        assert!(errors.has("username"));
        assert!(errors.has("password"));
    }
}
