use chrono::DateTime;
use chrono_tz::Tz;

use crate::auth::Role;
use crate::datetime;
use crate::models::{Event, EventFunction, EventStatus};

pub const FEATURED_CAP: usize = 3;
pub const HOME_LISTING_CAP: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Cancelled,
    Finished,
    Featured,
    Regular,
}

pub fn is_event_active(event: &Event) -> bool {
    is_event_active_at(event, &datetime::now())
}

/// A published event stays active while any of its published functions is
/// still upcoming. Events without functions fall back to their own date.
pub fn is_event_active_at(event: &Event, now: &DateTime<Tz>) -> bool {
    if event.status != EventStatus::Published {
        return false;
    }
    let functions = event.functions();
    if functions.is_empty() {
        return !is_finished_at(event, now);
    }
    functions
        .iter()
        .any(|function| is_function_published(function) && !function_finished_at(function, now))
}

pub fn is_finished_at(event: &Event, now: &DateTime<Tz>) -> bool {
    datetime::is_event_finished_at(&event.fecha, Some(&event.horario), now)
}

fn function_finished_at(function: &EventFunction, now: &DateTime<Tz>) -> bool {
    datetime::is_event_finished_at(&function.fecha, Some(&function.horario), now)
}

// Functions stored before per-function status existed count as published.
fn is_function_published(function: &EventFunction) -> bool {
    matches!(function.status, None | Some(EventStatus::Published))
}

pub fn is_visible_to(event: &Event, role: Role) -> bool {
    match role {
        Role::Admin => true,
        Role::User => matches!(
            event.status,
            EventStatus::Published | EventStatus::Cancelled
        ),
    }
}

pub fn visible_to(events: &[Event], role: Role) -> Vec<Event> {
    events
        .iter()
        .filter(|event| is_visible_to(event, role))
        .cloned()
        .collect()
}

pub fn home_listing(events: &[Event], role: Role) -> Vec<Event> {
    home_listing_at(events, role, &datetime::now())
}

/// Role filter first, then published-and-active or cancelled-but-upcoming,
/// featured events first, capped at [`HOME_LISTING_CAP`].
pub fn home_listing_at(events: &[Event], role: Role, now: &DateTime<Tz>) -> Vec<Event> {
    let (featured, regular): (Vec<Event>, Vec<Event>) = events
        .iter()
        .filter(|event| is_visible_to(event, role))
        .filter(|event| match event.status {
            EventStatus::Published => is_event_active_at(event, now),
            EventStatus::Cancelled => !is_finished_at(event, now),
            _ => false,
        })
        .cloned()
        .partition(|event| event.destacado);

    featured
        .into_iter()
        .chain(regular)
        .take(HOME_LISTING_CAP)
        .collect()
}

pub fn can_highlight(featured_count: usize) -> bool {
    featured_count < FEATURED_CAP
}

pub fn display_state(event: &Event) -> DisplayState {
    display_state_at(event, &datetime::now())
}

pub fn display_state_at(event: &Event, now: &DateTime<Tz>) -> DisplayState {
    if event.is_cancelled() {
        DisplayState::Cancelled
    } else if is_finished_at(event, now) {
        DisplayState::Finished
    } else if event.destacado {
        DisplayState::Featured
    } else {
        DisplayState::Regular
    }
}

pub fn can_cancel_at(event: &Event, now: &DateTime<Tz>) -> bool {
    !event.is_cancelled() && !is_finished_at(event, now)
}

pub fn can_cancel(event: &Event) -> bool {
    can_cancel_at(event, &datetime::now())
}

#[cfg(test)]
mod tests {
    use crate::test_support::{event, function};
    use super::*;

    fn now() -> DateTime<Tz> {
        datetime::combine_date_and_time("10/06/2025", "12:00").expect("fixed now")
    }

    #[test]
    fn draft_events_are_never_active() {
        let mut draft = event("a", "20/06/2025", "18:00");
        draft.status = EventStatus::Draft;
        assert!(!is_event_active_at(&draft, &now()));
    }

    #[test]
    fn event_without_functions_uses_its_own_date() {
        assert!(is_event_active_at(&event("a", "20/06/2025", "18:00"), &now()));
        assert!(!is_event_active_at(&event("b", "01/06/2025", "18:00"), &now()));
    }

    #[test]
    fn any_upcoming_published_function_keeps_event_active() {
        let mut ev = event("a", "01/06/2025", "18:00");
        ev.funciones = Some(vec![
            function(1, "20/06/2025", Some(EventStatus::Published)),
            function(2, "21/06/2025", Some(EventStatus::Cancelled)),
        ]);
        assert!(is_event_active_at(&ev, &now()));

        ev.funciones = Some(vec![
            function(1, "01/06/2025", Some(EventStatus::Published)),
            function(2, "21/06/2025", Some(EventStatus::Cancelled)),
        ]);
        assert!(!is_event_active_at(&ev, &now()));
    }

    #[test]
    fn functions_without_status_count_as_published() {
        let mut ev = event("a", "01/06/2025", "18:00");
        ev.funciones = Some(vec![function(1, "20/06/2025", None)]);
        assert!(is_event_active_at(&ev, &now()));
    }

    #[test]
    fn non_admins_only_see_published_and_cancelled() {
        let mut events = Vec::new();
        for (id, status) in [
            ("draft", EventStatus::Draft),
            ("pub", EventStatus::Published),
            ("can", EventStatus::Cancelled),
            ("done", EventStatus::Completed),
        ] {
            let mut ev = event(id, "20/06/2025", "18:00");
            ev.status = status;
            events.push(ev);
        }
        let ids = |list: Vec<Event>| list.into_iter().map(|e| e.id).collect::<Vec<_>>();
        assert_eq!(ids(visible_to(&events, Role::User)), vec!["pub", "can"]);
        assert_eq!(visible_to(&events, Role::Admin).len(), 4);
    }

    #[test]
    fn home_listing_puts_featured_first_and_drops_finished() {
        let mut featured = event("featured", "25/06/2025", "18:00");
        featured.destacado = true;
        let mut cancelled = event("cancelled", "22/06/2025", "18:00");
        cancelled.status = EventStatus::Cancelled;
        let mut cancelled_past = event("cancelled-past", "01/06/2025", "18:00");
        cancelled_past.status = EventStatus::Cancelled;
        let events = vec![
            event("regular", "20/06/2025", "18:00"),
            event("past", "01/06/2025", "18:00"),
            cancelled,
            cancelled_past,
            featured,
        ];

        let listing = home_listing_at(&events, Role::User, &now());
        let ids: Vec<&str> = listing.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["featured", "regular", "cancelled"]);
    }

    #[test]
    fn home_listing_is_capped() {
        let events: Vec<Event> = (0..20)
            .map(|i| event(&i.to_string(), "20/06/2025", "18:00"))
            .collect();
        assert_eq!(home_listing_at(&events, Role::User, &now()).len(), HOME_LISTING_CAP);
    }

    #[test]
    fn feature_cap_is_three() {
        assert!(can_highlight(0));
        assert!(can_highlight(2));
        assert!(!can_highlight(3));
        assert!(!can_highlight(4));
    }

    #[test]
    fn display_state_prefers_cancelled_then_finished() {
        let mut ev = event("a", "01/06/2025", "18:00");
        ev.destacado = true;
        assert_eq!(display_state_at(&ev, &now()), DisplayState::Finished);
        ev.status = EventStatus::Cancelled;
        assert_eq!(display_state_at(&ev, &now()), DisplayState::Cancelled);

        let mut upcoming = event("b", "20/06/2025", "18:00");
        assert_eq!(display_state_at(&upcoming, &now()), DisplayState::Regular);
        upcoming.destacado = true;
        assert_eq!(display_state_at(&upcoming, &now()), DisplayState::Featured);
        assert!(can_cancel_at(&upcoming, &now()));
        assert!(!can_cancel_at(&ev, &now()));
    }
}
