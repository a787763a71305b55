use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::{EditRecord, Event, EventPatch, FieldChange};

pub const LABEL_TITULO: &str = "título";
pub const LABEL_DESCRIPCION: &str = "descripción";
pub const LABEL_FECHA: &str = "fecha";
pub const LABEL_HORARIO: &str = "horario";
pub const LABEL_CATEGORIA: &str = "categoría";
pub const LABEL_MODALIDAD: &str = "modalidad";
pub const LABEL_AFORO: &str = "aforo";
pub const LABEL_VALOR: &str = "valor de ingreso";
pub const LABEL_DESTACADO: &str = "destacado";
pub const LABEL_COMUNA: &str = "comuna/barrio";
pub const LABEL_DIRECCION: &str = "dirección";
pub const LABEL_MAPA: &str = "enlace del mapa";
pub const LABEL_ORGANIZADOR_NOMBRE: &str = "nombre del organizador";
pub const LABEL_ORGANIZADOR_EMAIL: &str = "email del organizador";
pub const LABEL_ORGANIZADOR_CELULAR: &str = "celular del organizador";

fn differs<T: PartialEq>(incoming: Option<&T>, stored: &T) -> bool {
    incoming.is_some_and(|value| value != stored)
}

/// Labels of the fields the patch actually changes. Fields missing from the
/// patch are never reported.
pub fn detect_changes(current: &Event, patch: &EventPatch) -> Vec<&'static str> {
    let mut changes = Vec::new();

    let top_level = [
        (differs(patch.titulo.as_ref(), &current.titulo), LABEL_TITULO),
        (
            differs(patch.descripcion.as_ref(), &current.descripcion),
            LABEL_DESCRIPCION,
        ),
        (differs(patch.fecha.as_ref(), &current.fecha), LABEL_FECHA),
        (differs(patch.horario.as_ref(), &current.horario), LABEL_HORARIO),
        (
            differs(patch.categoria.as_ref(), &current.categoria),
            LABEL_CATEGORIA,
        ),
        (
            differs(patch.modalidad.as_ref(), &current.modalidad),
            LABEL_MODALIDAD,
        ),
        (differs(patch.aforo.as_ref(), &current.aforo), LABEL_AFORO),
        (
            differs(patch.valor_ingreso.as_ref(), &current.valor_ingreso),
            LABEL_VALOR,
        ),
        (
            differs(patch.destacado.as_ref(), &current.destacado),
            LABEL_DESTACADO,
        ),
    ];
    changes.extend(
        top_level
            .iter()
            .filter(|(changed, _)| *changed)
            .map(|(_, label)| *label),
    );

    if let Some(ubicacion) = &patch.ubicacion {
        let stored = &current.ubicacion;
        if ubicacion.comuna_barrio != stored.comuna_barrio {
            changes.push(LABEL_COMUNA);
        }
        if ubicacion.direccion_detallada != stored.direccion_detallada {
            changes.push(LABEL_DIRECCION);
        }
        if ubicacion.enlace_mapa != stored.enlace_mapa {
            changes.push(LABEL_MAPA);
        }
    }

    if let Some(organizador) = &patch.organizador {
        let stored = &current.organizador;
        if organizador.nombre != stored.nombre {
            changes.push(LABEL_ORGANIZADOR_NOMBRE);
        }
        if organizador.email != stored.email {
            changes.push(LABEL_ORGANIZADOR_EMAIL);
        }
        if organizador.celular != stored.celular {
            changes.push(LABEL_ORGANIZADOR_CELULAR);
        }
    }

    changes
}

/// Before/after values keyed by field name. Only the text fields titulo,
/// descripcion, fecha and horario carry values; other labels get no entry.
pub fn field_changes(
    current: &Event,
    patch: &EventPatch,
    labels: &[&str],
) -> BTreeMap<String, FieldChange> {
    let mut changes = BTreeMap::new();
    for label in labels {
        let captured = match *label {
            LABEL_TITULO => Some(("titulo", &current.titulo, &patch.titulo)),
            LABEL_DESCRIPCION => Some(("descripcion", &current.descripcion, &patch.descripcion)),
            LABEL_FECHA => Some(("fecha", &current.fecha, &patch.fecha)),
            LABEL_HORARIO => Some(("horario", &current.horario, &patch.horario)),
            _ => None,
        };
        if let Some((key, before, after)) = captured {
            changes.insert(
                key.to_string(),
                FieldChange {
                    before: Value::String(before.clone()),
                    after: after.clone().map(Value::String).unwrap_or(Value::Null),
                },
            );
        }
    }
    changes
}

pub fn edit_record(
    current: &Event,
    patch: &EventPatch,
    edited_by: &str,
    edited_at: &str,
) -> EditRecord {
    let labels = detect_changes(current, patch);
    let changes = field_changes(current, patch, &labels);
    EditRecord {
        edited_by: edited_by.to_string(),
        edited_at: edited_at.to_string(),
        changed_fields: labels.into_iter().map(str::to_string).collect(),
        changes,
    }
}

pub fn append_record(history: &[EditRecord], record: EditRecord) -> Vec<EditRecord> {
    let mut appended = history.to_vec();
    appended.push(record);
    appended
}
