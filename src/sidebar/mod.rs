mod month;
mod slots;
mod widget;
pub(crate) use self::widget::CartSidebar;
use self::month::{add_months, date_key, first_of_month, is_disabled_date, MonthGrid};
use self::slots::TimeSlot;
use crate::cart::Cart;
use std::fmt;
use thiserror::Error;
use time::{Date, Duration, Weekday};

/// An appointment request handed to the owner of the cart on confirmation
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Booking {
    pub(crate) name: String,
    pub(crate) date: Date,
    pub(crate) time: TimeSlot,
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {} a las {}", self.name, date_key(self.date), self.time)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Field {
    Name,
    Calendar,
    Time,
    Confirm,
    Clear,
}

impl Field {
    fn next(self) -> Field {
        match self {
            Field::Name => Field::Calendar,
            Field::Calendar => Field::Time,
            Field::Time => Field::Confirm,
            Field::Confirm => Field::Clear,
            Field::Clear => Field::Name,
        }
    }

    fn previous(self) -> Field {
        match self {
            Field::Name => Field::Clear,
            Field::Calendar => Field::Name,
            Field::Time => Field::Calendar,
            Field::Confirm => Field::Time,
            Field::Clear => Field::Confirm,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SidebarState {
    open: bool,
    name: String,
    date: Option<Date>,
    time: Option<TimeSlot>,
    // Invariant: Always the first day of a month
    month_cursor: Date,
    // Invariant: Always within the month of `month_cursor`
    day_cursor: Date,
    today: Date,
    focus: Field,
}

impl SidebarState {
    pub(crate) fn new(today: Date) -> SidebarState {
        SidebarState {
            open: false,
            name: String::new(),
            date: None,
            time: None,
            month_cursor: first_of_month(today),
            day_cursor: today,
            today,
            focus: Field::Name,
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn date(&self) -> Option<Date> {
        self.date
    }

    pub(crate) fn time(&self) -> Option<TimeSlot> {
        self.time
    }

    pub(crate) fn focus(&self) -> Field {
        self.focus
    }

    pub(crate) fn day_cursor(&self) -> Date {
        self.day_cursor
    }

    pub(crate) fn month(&self) -> MonthGrid {
        MonthGrid::new(self.month_cursor)
    }

    pub(crate) fn is_current_month(&self) -> bool {
        self.month_cursor == first_of_month(self.today)
    }

    /// Whether the month before the displayed one may be browsed.  Months
    /// before the current one contain no bookable days.
    pub(crate) fn can_go_back(&self) -> bool {
        self.month_cursor > first_of_month(self.today)
    }

    pub(crate) fn is_disabled_date(&self, date: Date) -> bool {
        is_disabled_date(date, self.today)
    }

    /// Move "today" forwards, e.g. when the clock passes midnight.  A
    /// selected date that is now in the past is dropped, and the calendar
    /// leaves any month that has become unbrowsable.
    pub(crate) fn set_today(&mut self, today: Date) {
        if today == self.today {
            return;
        }
        self.today = today;
        let month = first_of_month(today);
        if self.month_cursor < month {
            self.month_cursor = month;
            self.day_cursor = today;
        }
        if self.date.is_some_and(|d| d < today) {
            self.date = None;
        }
        tracing::debug!(today = %date_key(today), "Date changed");
    }

    pub(crate) fn go_to_month(&mut self, increment: i32) -> Result<(), MonthNavError> {
        if increment < 0 && !self.can_go_back() {
            return Err(MonthNavError::BeforeCurrentMonth);
        }
        let target = add_months(self.month_cursor, increment).ok_or(MonthNavError::OutOfRange)?;
        if target < first_of_month(self.today) {
            return Err(MonthNavError::BeforeCurrentMonth);
        }
        self.month_cursor = target;
        self.day_cursor = target.max(self.today);
        if !MonthGrid::new(target).contains(self.day_cursor) {
            self.day_cursor = target;
        }
        tracing::debug!(
            month = %date_key(target),
            current = self.is_current_month(),
            "Browsing calendar month"
        );
        Ok(())
    }

    /// Move the highlighted day by `days`, following it into neighboring
    /// months
    pub(crate) fn move_day_cursor(&mut self, days: i64) -> Result<(), MonthNavError> {
        let target = self
            .day_cursor
            .checked_add(Duration::days(days))
            .ok_or(MonthNavError::OutOfRange)?;
        if target < first_of_month(self.today) {
            return Err(MonthNavError::BeforeCurrentMonth);
        }
        self.day_cursor = target;
        self.month_cursor = first_of_month(target);
        Ok(())
    }

    pub(crate) fn select_date(&mut self, date: Date) -> Result<(), DateError> {
        if date.weekday() == Weekday::Sunday {
            return Err(DateError::Sunday(date));
        }
        if date < self.today {
            return Err(DateError::Past(date));
        }
        self.date = Some(date);
        tracing::debug!(date = %date_key(date), "Selected appointment date");
        Ok(())
    }

    pub(crate) fn set_time(&mut self, time: Option<TimeSlot>) {
        self.time = time;
    }

    pub(crate) fn can_confirm(&self, cart: &Cart) -> bool {
        cart.total() > 0
            && !cart.is_empty()
            && !self.name.is_empty()
            && self.date.is_some()
            && self.time.is_some()
    }

    /// Returns the booking and resets the form if everything has been filled
    /// in, and does nothing otherwise
    pub(crate) fn confirm(&mut self, cart: &Cart) -> Option<Booking> {
        if !self.can_confirm(cart) {
            return None;
        }
        let (Some(date), Some(time)) = (self.date.take(), self.time.take()) else {
            return None;
        };
        let booking = Booking {
            name: std::mem::take(&mut self.name),
            date,
            time,
        };
        self.open = false;
        self.focus = Field::Name;
        Some(booking)
    }

    pub(crate) fn handle_input(&mut self, input: SidebarInput, cart: &Cart) -> SidebarOutput {
        if !self.open {
            return SidebarOutput::Invalid;
        }
        if input == SidebarInput::Close {
            self.close();
            return SidebarOutput::Closed;
        }
        if cart.is_empty() {
            // Only the empty-cart notice is shown, so there is nothing to
            // interact with
            return SidebarOutput::Invalid;
        }
        match (input, self.focus) {
            (SidebarInput::NextField, _) => {
                self.focus = self.focus.next();
                SidebarOutput::Ok
            }
            (SidebarInput::PrevField, _) => {
                self.focus = self.focus.previous();
                SidebarOutput::Ok
            }
            // Outside the name field, '<' and '>' aren't text
            (SidebarInput::PreviousMonth, _)
            | (
                SidebarInput::Char('<'),
                Field::Calendar | Field::Time | Field::Confirm | Field::Clear,
            ) => self.go_to_month(-1).into(),
            (SidebarInput::NextMonth, _)
            | (
                SidebarInput::Char('>'),
                Field::Calendar | Field::Time | Field::Confirm | Field::Clear,
            ) => self.go_to_month(1).into(),
            (SidebarInput::Char(c), Field::Name) => {
                if c.is_control() {
                    SidebarOutput::Invalid
                } else {
                    self.name.push(c);
                    SidebarOutput::Ok
                }
            }
            (SidebarInput::Backspace, Field::Name) => {
                if self.name.pop().is_some() {
                    SidebarOutput::Ok
                } else {
                    SidebarOutput::Invalid
                }
            }
            (SidebarInput::Left, Field::Calendar) => self.move_day_cursor(-1).into(),
            (SidebarInput::Right, Field::Calendar) => self.move_day_cursor(1).into(),
            (SidebarInput::Up, Field::Calendar) => self.move_day_cursor(-7).into(),
            (SidebarInput::Down, Field::Calendar) => self.move_day_cursor(7).into(),
            (SidebarInput::Enter, Field::Calendar) => match self.select_date(self.day_cursor) {
                Ok(()) => SidebarOutput::Ok,
                Err(_) => SidebarOutput::Invalid,
            },
            (SidebarInput::Up | SidebarInput::Left, Field::Time) => {
                self.set_time(slots::cycle_slot(self.time, false));
                SidebarOutput::Ok
            }
            (SidebarInput::Down | SidebarInput::Right | SidebarInput::Enter, Field::Time) => {
                self.set_time(slots::cycle_slot(self.time, true));
                SidebarOutput::Ok
            }
            (SidebarInput::Enter, Field::Name) => {
                self.focus = Field::Calendar;
                SidebarOutput::Ok
            }
            (SidebarInput::Right, Field::Confirm) => {
                self.focus = Field::Clear;
                SidebarOutput::Ok
            }
            (SidebarInput::Left, Field::Clear) => {
                self.focus = Field::Confirm;
                SidebarOutput::Ok
            }
            (SidebarInput::Up, Field::Name | Field::Confirm | Field::Clear) => {
                self.focus = match self.focus {
                    Field::Clear => Field::Time,
                    f => f.previous(),
                };
                SidebarOutput::Ok
            }
            (SidebarInput::Down, Field::Name | Field::Confirm) => {
                self.focus = self.focus.next();
                SidebarOutput::Ok
            }
            (SidebarInput::Enter, Field::Confirm) => match self.confirm(cart) {
                Some(booking) => SidebarOutput::Confirm(booking),
                None => SidebarOutput::Invalid,
            },
            (SidebarInput::Enter, Field::Clear) => SidebarOutput::Clear,
            _ => SidebarOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SidebarInput {
    Close,
    NextField,
    PrevField,
    Left,
    Right,
    Up,
    Down,
    PreviousMonth,
    NextMonth,
    Char(char),
    Backspace,
    Enter,
}

/// What the owner of the sidebar needs to act on after an input
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum SidebarOutput {
    Ok,
    Invalid,
    Closed,
    /// The user asked for the cart to be emptied
    Clear,
    Confirm(Booking),
}

impl<E> From<Result<(), E>> for SidebarOutput {
    fn from(r: Result<(), E>) -> SidebarOutput {
        match r {
            Ok(()) => SidebarOutput::Ok,
            Err(_) => SidebarOutput::Invalid,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum MonthNavError {
    #[error("months before the current one cannot be browsed")]
    BeforeCurrentMonth,
    #[error("reached the end of time")]
    OutOfRange,
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum DateError {
    #[error("{0} is a Sunday")]
    Sunday(Date),
    #[error("{0} is in the past")]
    Past(Date),
}
