use crate::models::{
    AdmissionFee, Category, Event, EventFunction, EventStatus, Location, Modality, Organizer,
};

pub fn event(id: &str, fecha: &str, horario: &str) -> Event {
    Event {
        id: id.to_string(),
        titulo: format!("Evento {id}"),
        descripcion: "Una tarde de música en el parque principal".to_string(),
        fecha: fecha.to_string(),
        horario: horario.to_string(),
        funciones: None,
        ubicacion: Location {
            direccion_completa: "Comuna 14 El Poblado, Parque Lleras".to_string(),
            comuna_barrio: "El Poblado".to_string(),
            direccion_detallada: "Calle 10 # 40-20".to_string(),
            enlace_mapa: None,
        },
        categoria: Category::Culturales,
        modalidad: Modality::Presencial,
        aforo: 100,
        destacado: false,
        valor_ingreso: AdmissionFee::Free,
        organizador: Organizer {
            nombre: "Corporación Cultural".to_string(),
            celular: "3001234567".to_string(),
            identificacion: "900123456".to_string(),
            email: "contacto@cultura.co".to_string(),
        },
        imagen_caratula: None,
        servicios_adicionales: Vec::new(),
        status: EventStatus::Published,
        created_at: "2025-01-01T00:00:00Z".to_string(),
        updated_at: "2025-01-01T00:00:00Z".to_string(),
        created_by: None,
        updated_by: None,
        cancelled_at: None,
        cancelled_by: None,
        last_edited_by: None,
        last_edited_at: None,
        edit_history: None,
    }
}

pub fn function(numero: u32, fecha: &str, status: Option<EventStatus>) -> EventFunction {
    EventFunction {
        numero_funcion: numero,
        fecha: fecha.to_string(),
        horario: "18:00".to_string(),
        status,
        cancelled_at: None,
        cancelled_by: None,
    }
}
