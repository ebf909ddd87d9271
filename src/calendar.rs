use chrono::{Datelike, NaiveDate};

use crate::types::CalendarEvent;

/// One renderable day in the month grid.
#[derive(Clone, Debug, PartialEq)]
pub struct DayCell {
    pub day: u32,
    pub events: Vec<CalendarEvent>,
    pub is_today: bool,
}

/// A month laid out for a 7-column week grid starting on Sunday.
/// `cells` holds leading `None` padding so day 1 lands in its weekday
/// column, then one `Some` per calendar day. No trailing padding.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<Option<DayCell>>,
}

/// Month under view, navigable without bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    pub fn title(self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Januari",
        2 => "Februari",
        3 => "Mars",
        4 => "April",
        5 => "Maj",
        6 => "Juni",
        7 => "Juli",
        8 => "Augusti",
        9 => "September",
        10 => "Oktober",
        11 => "November",
        12 => "December",
        _ => "?",
    }
}

pub const WEEKDAYS: [&str; 7] = ["Sön", "Mån", "Tis", "Ons", "Tor", "Fre", "Lör"];

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap_or(30)
}

/// Builds the grid for one month. Events land in the cell whose date matches
/// exactly; same-day events keep their input order. `today` comes from the
/// caller since highlighting is a presentation concern.
pub fn build_month_grid(
    cursor: MonthCursor,
    events: &[CalendarEvent],
    today: NaiveDate,
) -> MonthGrid {
    let MonthCursor { year, month } = cursor;

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    let lead = first.weekday().num_days_from_sunday() as usize;

    let mut cells: Vec<Option<DayCell>> = Vec::with_capacity(lead + 31);
    cells.resize(lead, None);

    for day in 1..=days_in_month(year, month) {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(first);
        let day_events: Vec<CalendarEvent> = events
            .iter()
            .filter(|e| e.event_date == date)
            .cloned()
            .collect();
        cells.push(Some(DayCell {
            day,
            events: day_events,
            is_today: date == today,
        }));
    }

    MonthGrid { year, month, cells }
}

/// Events on or after `today`, in input order (callers fetch date-ascending).
pub fn upcoming_events(events: &[CalendarEvent], today: NaiveDate, limit: usize) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter(|e| e.event_date >= today)
        .take(limit)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;

    fn event(id: &str, date: NaiveDate, title: &str) -> CalendarEvent {
        CalendarEvent {
            id: id.into(),
            user_id: "u1".into(),
            title: title.into(),
            description: None,
            event_date: date,
            event_type: EventKind::Program,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_pads_leading_days_and_counts_cells() {
        // November 2023: the 1st is a Wednesday (weekday index 3), 30 days.
        let grid = build_month_grid(MonthCursor::new(2023, 11), &[], day(2023, 11, 15));

        assert_eq!(grid.cells.len(), 3 + 30);
        assert!(grid.cells[..3].iter().all(|c| c.is_none()));
        let days: Vec<u32> = grid.cells[3..]
            .iter()
            .map(|c| c.as_ref().unwrap().day)
            .collect();
        assert_eq!(days, (1..=30).collect::<Vec<_>>());
    }

    #[test]
    fn event_lands_only_in_its_day() {
        let events = vec![event("e1", day(2024, 3, 15), "Tävling")];
        let grid = build_month_grid(MonthCursor::new(2024, 3), &events, day(2024, 3, 1));

        for cell in grid.cells.iter().flatten() {
            if cell.day == 15 {
                assert_eq!(cell.events.len(), 1);
                assert_eq!(cell.events[0].id, "e1");
            } else {
                assert!(cell.events.is_empty());
            }
        }
    }

    #[test]
    fn event_outside_month_is_not_bucketed() {
        let events = vec![event("e1", day(2024, 3, 15), "Tävling")];
        let grid = build_month_grid(MonthCursor::new(2024, 4), &events, day(2024, 4, 1));
        assert!(grid.cells.iter().flatten().all(|c| c.events.is_empty()));
    }

    #[test]
    fn same_day_events_keep_input_order() {
        let events = vec![
            event("first", day(2024, 3, 15), "Fyspass"),
            event("second", day(2024, 3, 15), "Teknikpass"),
        ];
        let grid = build_month_grid(MonthCursor::new(2024, 3), &events, day(2024, 3, 1));

        let cell = grid
            .cells
            .iter()
            .flatten()
            .find(|c| c.day == 15)
            .unwrap();
        let ids: Vec<&str> = cell.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["first", "second"]);
    }

    #[test]
    fn today_flag_matches_exact_date_only() {
        let grid = build_month_grid(MonthCursor::new(2024, 3), &[], day(2024, 3, 15));
        for cell in grid.cells.iter().flatten() {
            assert_eq!(cell.is_today, cell.day == 15);
        }

        // Same day number in another month is not "today".
        let grid = build_month_grid(MonthCursor::new(2024, 4), &[], day(2024, 3, 15));
        assert!(grid.cells.iter().flatten().all(|c| !c.is_today));
    }

    #[test]
    fn leap_february_has_29_cells() {
        let grid = build_month_grid(MonthCursor::new(2024, 2), &[], day(2024, 2, 1));
        assert_eq!(grid.cells.iter().flatten().count(), 29);
    }

    #[test]
    fn cursor_rolls_over_year_boundaries() {
        assert_eq!(MonthCursor::new(2023, 12).next(), MonthCursor::new(2024, 1));
        assert_eq!(
            MonthCursor::new(2024, 1).previous(),
            MonthCursor::new(2023, 12)
        );
        assert_eq!(MonthCursor::new(2024, 6).next(), MonthCursor::new(2024, 7));
    }

    #[test]
    fn upcoming_filters_past_and_limits() {
        let events = vec![
            event("past", day(2024, 3, 1), "Gammalt"),
            event("today", day(2024, 3, 10), "Idag"),
            event("soon", day(2024, 3, 20), "Snart"),
            event("later", day(2024, 4, 2), "Senare"),
        ];
        let up = upcoming_events(&events, day(2024, 3, 10), 2);
        let ids: Vec<&str> = up.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["today", "soon"]);
    }
}
