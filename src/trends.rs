use std::collections::{BTreeMap, HashMap};

use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

use crate::datetime;
use crate::lifecycle;
use crate::models::Event;

const TOP_LOCATIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub name: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: String,
    pub events: usize,
}

/// A date that could not be parsed while aggregating. The event is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub event_id: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendsReport {
    pub total_events: usize,
    pub active_events: usize,
    pub popular_categories: Vec<Share>,
    pub top_locations: Vec<Share>,
    pub monthly_growth: Vec<MonthlyCount>,
    pub warnings: Vec<ParseWarning>,
}

impl TrendsReport {
    pub fn from_events(events: &[Event]) -> Self {
        Self::from_events_at(events, &datetime::now())
    }

    pub fn from_events_at(events: &[Event], now: &DateTime<Tz>) -> Self {
        let total_events = events.len();
        let active_events = events
            .iter()
            .filter(|event| lifecycle::is_event_active_at(event, now))
            .count();

        let popular_categories = shares(
            events.iter().map(|event| event.categoria.label().to_string()),
            total_events,
        );

        let mut top_locations = shares(
            events
                .iter()
                .map(|event| event.ubicacion.comuna_barrio.trim().to_string())
                .filter(|name| !name.is_empty()),
            total_events,
        );
        top_locations.truncate(TOP_LOCATIONS);

        let mut months: BTreeMap<String, usize> = BTreeMap::new();
        let mut warnings = Vec::new();
        for event in events {
            match datetime::parse_display_date(&event.fecha) {
                Some(date) => {
                    *months.entry(date.format("%Y-%m").to_string()).or_default() += 1;
                }
                None => {
                    tracing::warn!(event_id = %event.id, fecha = %event.fecha, "skipping unparseable date");
                    warnings.push(ParseWarning {
                        event_id: event.id.clone(),
                        value: event.fecha.clone(),
                    });
                }
            }
        }
        let monthly_growth = months
            .into_iter()
            .map(|(month, events)| MonthlyCount { month, events })
            .collect();

        Self {
            total_events,
            active_events,
            popular_categories,
            top_locations,
            monthly_growth,
            warnings,
        }
    }
}

fn shares(names: impl Iterator<Item = String>, total: usize) -> Vec<Share> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_default() += 1;
    }
    let mut out: Vec<Share> = counts
        .into_iter()
        .map(|(name, count)| Share {
            percentage: percentage(count, total),
            name,
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    out
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 * 100.0 / total as f64;
    (raw * 10.0).round() / 10.0
}
