use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const FREE_MARKER: &str = "gratuito";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Sociales")]
    Sociales,
    #[serde(rename = "Corporativos / Empresariales")]
    Corporativos,
    #[serde(rename = "Académicos")]
    Academicos,
    #[serde(rename = "Culturales y Artísticos")]
    Culturales,
    #[serde(rename = "Deportivos")]
    Deportivos,
    #[serde(rename = "Comerciales y de Marca")]
    Comerciales,
    #[serde(rename = "Comunitarios o Gubernamentales")]
    Comunitarios,
    #[serde(rename = "Religiosos")]
    Religiosos,
    #[serde(rename = "Tecnológicos")]
    Tecnologicos,
    #[serde(rename = "Gastronómicos")]
    Gastronomicos,
    #[serde(rename = "Medioambientales")]
    Medioambientales,
    #[serde(rename = "Políticos")]
    Politicos,
    #[serde(rename = "Virtuales / Híbridos")]
    Virtuales,
    #[serde(rename = "Benéficos / Solidarios")]
    Beneficos,
    #[serde(rename = "Inmobiliarios")]
    Inmobiliarios,
    #[serde(rename = "Turísticos")]
    Turisticos,
    #[serde(rename = "Familiares")]
    Familiares,
    #[serde(rename = "Para adultos")]
    Adultos,
}

impl Category {
    pub const ALL: [Category; 18] = [
        Category::Sociales,
        Category::Corporativos,
        Category::Academicos,
        Category::Culturales,
        Category::Deportivos,
        Category::Comerciales,
        Category::Comunitarios,
        Category::Religiosos,
        Category::Tecnologicos,
        Category::Gastronomicos,
        Category::Medioambientales,
        Category::Politicos,
        Category::Virtuales,
        Category::Beneficos,
        Category::Inmobiliarios,
        Category::Turisticos,
        Category::Familiares,
        Category::Adultos,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Sociales => "Sociales",
            Category::Corporativos => "Corporativos / Empresariales",
            Category::Academicos => "Académicos",
            Category::Culturales => "Culturales y Artísticos",
            Category::Deportivos => "Deportivos",
            Category::Comerciales => "Comerciales y de Marca",
            Category::Comunitarios => "Comunitarios o Gubernamentales",
            Category::Religiosos => "Religiosos",
            Category::Tecnologicos => "Tecnológicos",
            Category::Gastronomicos => "Gastronómicos",
            Category::Medioambientales => "Medioambientales",
            Category::Politicos => "Políticos",
            Category::Virtuales => "Virtuales / Híbridos",
            Category::Beneficos => "Benéficos / Solidarios",
            Category::Inmobiliarios => "Inmobiliarios",
            Category::Turisticos => "Turísticos",
            Category::Familiares => "Familiares",
            Category::Adultos => "Para adultos",
        }
    }

    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdditionalService {
    #[serde(rename = "Sonido")]
    Sonido,
    #[serde(rename = "Iluminación")]
    Iluminacion,
    #[serde(rename = "Escenarios")]
    Escenarios,
    #[serde(rename = "Audiovisuales")]
    Audiovisuales,
    #[serde(rename = "Decoración")]
    Decoracion,
    #[serde(rename = "Mobiliario")]
    Mobiliario,
    #[serde(rename = "Catering")]
    Catering,
    #[serde(rename = "Bebidas")]
    Bebidas,
    #[serde(rename = "Vajilla y mantelería")]
    Vajilla,
    #[serde(rename = "Carpas")]
    Carpas,
    #[serde(rename = "Seguridad")]
    Seguridad,
    #[serde(rename = "Control de acceso")]
    ControlAcceso,
    #[serde(rename = "Ambulancia o servicio médico")]
    Ambulancia,
    #[serde(rename = "Coordinador de eventos")]
    Coordinador,
    #[serde(rename = "DJ")]
    Dj,
    #[serde(rename = "Animadores")]
    Animadores,
    #[serde(rename = "Artistas en vivo")]
    Artistas,
    #[serde(rename = "Generadores eléctricos")]
    Generadores,
    #[serde(rename = "Climatización")]
    Climatizacion,
    #[serde(rename = "Música en vivo")]
    Musica,
    #[serde(rename = "Fotografía")]
    Fotografia,
    #[serde(rename = "Video")]
    Video,
    #[serde(rename = "Transporte de invitados")]
    Transporte,
    #[serde(rename = "Alojamiento")]
    Alojamiento,
    #[serde(rename = "Seguro de responsabilidad civil")]
    Seguro,
    #[serde(rename = "Invitaciones")]
    Invitaciones,
    #[serde(rename = "Branding y señalización")]
    Branding,
    #[serde(rename = "Experiencias inmersivas")]
    Experiencias,
    #[serde(rename = "Actividades interactivas")]
    Actividades,
    #[serde(rename = "Acceso para personas con movilidad reducida")]
    Accesibilidad,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    #[default]
    Published,
    Cancelled,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Published => "published",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    #[default]
    Presencial,
    Virtual,
    Hibrido,
}

/// Entry price: either the `"gratuito"` marker or a non-negative amount in COP.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum AdmissionFee {
    #[default]
    Free,
    Amount(f64),
}

impl AdmissionFee {
    pub fn is_free(&self) -> bool {
        matches!(self, AdmissionFee::Free)
    }
}

impl Serialize for AdmissionFee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AdmissionFee::Free => serializer.serialize_str(FREE_MARKER),
            AdmissionFee::Amount(amount) => serializer.serialize_f64(*amount),
        }
    }
}

impl<'de> Deserialize<'de> for AdmissionFee {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(amount) if amount >= 0.0 => Ok(AdmissionFee::Amount(amount)),
            Raw::Number(amount) => Err(de::Error::custom(format!(
                "valor_ingreso cannot be negative: {amount}"
            ))),
            Raw::Text(text) if text == FREE_MARKER => Ok(AdmissionFee::Free),
            Raw::Text(text) => Err(de::Error::custom(format!(
                "unexpected valor_ingreso marker: {text}"
            ))),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Location {
    pub direccion_completa: String,
    #[serde(default)]
    pub comuna_barrio: String,
    #[serde(default)]
    pub direccion_detallada: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enlace_mapa: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Organizer {
    pub nombre: String,
    pub celular: String,
    #[serde(default)]
    pub identificacion: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EventFunction {
    pub numero_funcion: u32,
    pub fecha: String,
    pub horario: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EventStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FieldChange {
    pub before: Value,
    pub after: Value,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EditRecord {
    pub edited_by: String,
    pub edited_at: String,
    pub changed_fields: Vec<String>,
    #[serde(default)]
    pub changes: BTreeMap<String, FieldChange>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    pub id: String,
    pub titulo: String,
    pub descripcion: String,
    pub fecha: String,
    pub horario: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funciones: Option<Vec<EventFunction>>,
    pub ubicacion: Location,
    pub categoria: Category,
    #[serde(default)]
    pub modalidad: Modality,
    pub aforo: u32,
    #[serde(default)]
    pub destacado: bool,
    pub valor_ingreso: AdmissionFee,
    pub organizador: Organizer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagen_caratula: Option<String>,
    #[serde(default)]
    pub servicios_adicionales: Vec<AdditionalService>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_history: Option<Vec<EditRecord>>,
}

impl Event {
    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }

    pub fn functions(&self) -> &[EventFunction] {
        self.funciones.as_deref().unwrap_or(&[])
    }

    pub fn history(&self) -> &[EditRecord] {
        self.edit_history.as_deref().unwrap_or(&[])
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewEvent {
    pub titulo: String,
    pub descripcion: String,
    pub fecha: String,
    pub horario: String,
    pub ubicacion: Location,
    pub categoria: Category,
    #[serde(default)]
    pub modalidad: Modality,
    pub aforo: u32,
    #[serde(default)]
    pub destacado: bool,
    pub valor_ingreso: AdmissionFee,
    pub organizador: Organizer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagen_caratula: Option<String>,
    #[serde(default)]
    pub servicios_adicionales: Vec<AdditionalService>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ubicacion: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categoria: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modalidad: Option<Modality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aforo: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destacado: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valor_ingreso: Option<AdmissionFee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizador: Option<Organizer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imagen_caratula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servicios_adicionales: Option<Vec<AdditionalService>>,
}
