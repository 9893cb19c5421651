use std::iter::{repeat, successors};
use time::{Date, Month, Weekday};

const DAYS_IN_WEEK: usize = 7;

/// `Weekday::number_days_from_sunday()` value of the weekday shown in the
/// first column
const MONDAY_FIRST_WEEKDAY: u8 = 1;

/// Column headers, Monday first
pub(super) static DAY_LABELS: [&str; DAYS_IN_WEEK] = ["L", "M", "X", "J", "V", "S", "D"];

static MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// A day cannot be booked if it falls on a Sunday or lies in the past
pub(crate) fn is_disabled_date(date: Date, today: Date) -> bool {
    date.weekday() == Weekday::Sunday || date < today
}

/// Render a date as `YYYY-MM-DD`
pub(crate) fn date_key(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub(crate) fn first_of_month(date: Date) -> Date {
    // Day 1 exists in every month, so this cannot fail
    date.replace_day(1).unwrap_or(date)
}

/// Returns the first day of the month `increment` months away from the month
/// containing `date`, or `None` if that falls outside the supported range of
/// dates
pub(crate) fn add_months(date: Date, increment: i32) -> Option<Date> {
    let index = date
        .year()
        .checked_mul(12)?
        .checked_add(i32::from(u8::from(date.month())) - 1)?
        .checked_add(increment)?;
    let year = index.div_euclid(12);
    let month = u8::try_from(index.rem_euclid(12) + 1).ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, 1).ok()
}

/// The layout of one month in a Monday-first grid
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    first: Date,
    days_in_month: u8,
    start_offset: u8,
}

impl MonthGrid {
    pub(crate) fn new(date: Date) -> MonthGrid {
        let first = first_of_month(date);
        // The day before the first of next month; if next month is past the
        // end of time, the last supported month is December.
        let days_in_month = add_months(first, 1)
            .and_then(Date::previous_day)
            .map_or(31, |d| d.day());
        let start_offset =
            (first.weekday().number_days_from_sunday() + 7 - MONDAY_FIRST_WEEKDAY) % 7;
        MonthGrid {
            first,
            days_in_month,
            start_offset,
        }
    }

    pub(crate) fn first(&self) -> Date {
        self.first
    }

    pub(crate) fn last(&self) -> Date {
        self.first
            .replace_day(self.days_in_month())
            .unwrap_or(self.first)
    }

    pub(crate) fn days_in_month(&self) -> u8 {
        self.days_in_month
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        (self.first()..=self.last()).contains(&date)
    }

    /// Month name and year, e.g. "Octubre de 2026"
    pub(crate) fn label(&self) -> String {
        let name = MONTH_NAMES[usize::from(u8::from(self.first.month())) - 1];
        let mut chars = name.chars();
        let capitalized = match chars.next() {
            Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        format!("{capitalized} de {}", self.first.year())
    }

    /// The dates of the month preceded by blanks for the days of the first
    /// week that belong to the previous month
    pub(crate) fn cells(&self) -> impl Iterator<Item = Option<Date>> {
        let days = successors(Some(self.first), |d| d.next_day())
            .take(usize::from(self.days_in_month))
            .map(Some);
        repeat(None)
            .take(usize::from(self.start_offset))
            .chain(days)
    }

    /// The cells grouped into rows of seven.  The final row is padded with
    /// blanks.
    pub(crate) fn weeks(&self) -> Vec<[Option<Date>; DAYS_IN_WEEK]> {
        let mut weeks = Vec::new();
        let mut week = [None; DAYS_IN_WEEK];
        for (i, cell) in self.cells().enumerate() {
            week[i % DAYS_IN_WEEK] = cell;
            if i % DAYS_IN_WEEK == DAYS_IN_WEEK - 1 {
                weeks.push(std::mem::replace(&mut week, [None; DAYS_IN_WEEK]));
            }
        }
        if week.iter().any(Option::is_some) {
            weeks.push(week);
        }
        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_october_2026() {
        let grid = MonthGrid::new(date!(2026 - 10 - 19));
        assert_eq!(grid.first(), date!(2026 - 10 - 01));
        assert_eq!(grid.last(), date!(2026 - 10 - 31));
        assert_eq!(grid.days_in_month(), 31);
        assert_eq!(grid.start_offset, 3);
        assert_eq!(grid.label(), "Octubre de 2026");
        let weeks = grid.weeks();
        assert_eq!(weeks.len(), 5);
        assert_eq!(
            weeks[0],
            [
                None,
                None,
                None,
                Some(date!(2026 - 10 - 01)),
                Some(date!(2026 - 10 - 02)),
                Some(date!(2026 - 10 - 03)),
                Some(date!(2026 - 10 - 04)),
            ]
        );
        assert_eq!(weeks[4][5], Some(date!(2026 - 10 - 31)));
        assert_eq!(weeks[4][6], None);
    }

    #[test]
    fn test_month_starting_on_sunday() {
        let grid = MonthGrid::new(date!(2026 - 11 - 15));
        assert_eq!(grid.start_offset, 6);
        assert_eq!(grid.days_in_month(), 30);
        let weeks = grid.weeks();
        assert_eq!(weeks.len(), 6);
        assert_eq!(weeks[0][6], Some(date!(2026 - 11 - 01)));
        assert_eq!(weeks[5][0], Some(date!(2026 - 11 - 30)));
    }

    #[test]
    fn test_month_starting_on_monday() {
        let grid = MonthGrid::new(date!(2027 - 02 - 10));
        assert_eq!(grid.start_offset, 0);
        assert_eq!(grid.days_in_month(), 28);
        assert_eq!(grid.weeks().len(), 4);
        assert_eq!(grid.label(), "Febrero de 2027");
    }

    #[test]
    fn test_leap_february() {
        let grid = MonthGrid::new(date!(2024 - 02 - 01));
        assert_eq!(grid.days_in_month(), 29);
        assert_eq!(grid.cells().count(), 3 + 29);
    }

    #[test]
    fn test_add_months() {
        assert_eq!(
            add_months(date!(2026 - 10 - 19), 1),
            Some(date!(2026 - 11 - 01))
        );
        assert_eq!(
            add_months(date!(2026 - 12 - 31), 1),
            Some(date!(2027 - 01 - 01))
        );
        assert_eq!(
            add_months(date!(2026 - 01 - 31), -1),
            Some(date!(2025 - 12 - 01))
        );
        assert_eq!(
            add_months(date!(2026 - 10 - 01), -22),
            Some(date!(2024 - 12 - 01))
        );
        assert_eq!(add_months(Date::MAX, 1), None);
    }

    #[test]
    fn test_last_supported_month() {
        let grid = MonthGrid::new(Date::MAX);
        assert_eq!(grid.days_in_month(), 31);
        assert_eq!(grid.cells().last(), Some(Some(Date::MAX)));
    }

    #[test]
    fn test_is_disabled_date() {
        let today = date!(2026 - 10 - 19);
        assert!(!is_disabled_date(today, today));
        assert!(!is_disabled_date(date!(2026 - 10 - 24), today));
        // Sunday
        assert!(is_disabled_date(date!(2026 - 10 - 25), today));
        // Past
        assert!(is_disabled_date(date!(2026 - 10 - 17), today));
    }

    #[test]
    fn test_date_key() {
        assert_eq!(date_key(date!(2026 - 03 - 07)), "2026-03-07");
        assert_eq!(date_key(date!(2026 - 12 - 31)), "2026-12-31");
    }
}
