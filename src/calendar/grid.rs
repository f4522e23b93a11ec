use chrono::{Datelike, Duration, NaiveDate};

use super::event::CalendarEvent;

/// One cell of the month grid; a projection over the event store,
/// recomputed on demand and never stored.
#[derive(Debug, Clone)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub events: Vec<CalendarEvent>,
}

/// Builds the displayed grid for the month containing `reference`.
///
/// The grid spans whole weeks, Sunday through Saturday: from the Sunday on or
/// before the 1st to the Saturday on or after the last day of the month.
/// `today` is passed in rather than read from the clock so callers control it.
pub fn build_grid(
    reference: NaiveDate,
    today: NaiveDate,
    events: &[CalendarEvent],
) -> Vec<DayCell> {
    let year = reference.year();
    let month = reference.month();

    let month_start = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let month_end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)).unwrap();

    let start = month_start
        - Duration::days(month_start.weekday().num_days_from_sunday() as i64);
    let end = month_end
        + Duration::days((6 - month_end.weekday().num_days_from_sunday()) as i64);

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| DayCell {
            date: day,
            is_current_month: day.month() == month && day.year() == year,
            is_today: day == today,
            events: events.iter().filter(|e| e.date == day).cloned().collect(),
        })
        .collect()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .unwrap()
    .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
    .num_days() as u32
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EventCategory;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grid_spans_whole_weeks_for_any_month() {
        for (y, m) in [(2024, 2), (2024, 3), (2024, 12), (2025, 2), (2026, 8)] {
            let grid = build_grid(date(y, m, 1), date(2024, 1, 1), &[]);
            assert_eq!(grid.len() % 7, 0, "{y}-{m}");
            assert_eq!(grid.first().unwrap().date.weekday(), Weekday::Sun);
            assert_eq!(grid.last().unwrap().date.weekday(), Weekday::Sat);
        }
    }

    #[test]
    fn march_2024_grid_shape() {
        // March 1st 2024 is a Friday, so the grid starts on Sunday Feb 25
        // and runs through Saturday April 6.
        let grid = build_grid(date(2024, 3, 1), date(2024, 3, 5), &[]);
        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0].date, date(2024, 2, 25));
        assert!(!grid[0].is_current_month);
        assert_eq!(grid[41].date, date(2024, 4, 6));
        assert!(grid.iter().filter(|c| c.is_current_month).count() == 31);
        assert_eq!(grid.iter().filter(|c| c.is_today).count(), 1);
        assert!(grid.iter().find(|c| c.is_today).unwrap().date == date(2024, 3, 5));
    }

    #[test]
    fn every_event_lands_in_exactly_one_cell() {
        let events = vec![
            CalendarEvent::new("Dinner", date(2024, 3, 15), EventCategory::Personal),
            CalendarEvent::new("Standup", date(2024, 3, 15), EventCategory::Work),
            CalendarEvent::new("Edge", date(2024, 2, 25), EventCategory::Other),
        ];
        let grid = build_grid(date(2024, 3, 1), date(2024, 3, 5), &events);
        for event in &events {
            let holders: Vec<_> = grid
                .iter()
                .filter(|c| c.events.iter().any(|e| e.id == event.id))
                .collect();
            assert_eq!(holders.len(), 1, "{}", event.title);
            assert_eq!(holders[0].date, event.date);
        }
        // store order preserved within a cell
        let cell = grid.iter().find(|c| c.date == date(2024, 3, 15)).unwrap();
        let titles: Vec<_> = cell.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["Dinner", "Standup"]);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }
}
