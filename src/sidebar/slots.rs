use std::fmt;

/// An appointment starting on the hour
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct TimeSlot {
    hour: u8,
}

impl TimeSlot {
    const fn at(hour: u8) -> TimeSlot {
        TimeSlot { hour }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.hour)
    }
}

/// Bookable hours: mornings from 9 to 13 and evenings from 16 to 20
pub(crate) static TIME_SLOTS: [TimeSlot; 10] = [
    TimeSlot::at(9),
    TimeSlot::at(10),
    TimeSlot::at(11),
    TimeSlot::at(12),
    TimeSlot::at(13),
    TimeSlot::at(16),
    TimeSlot::at(17),
    TimeSlot::at(18),
    TimeSlot::at(19),
    TimeSlot::at(20),
];

/// Step through the choices "no time selected" followed by every slot,
/// wrapping around at either end
pub(super) fn cycle_slot(current: Option<TimeSlot>, forwards: bool) -> Option<TimeSlot> {
    // Position 0 is "no selection"; slot i is at position i + 1
    let choices = TIME_SLOTS.len() + 1;
    let pos = current
        .and_then(|t| TIME_SLOTS.iter().position(|&s| s == t))
        .map_or(0, |i| i + 1);
    let next = if forwards {
        (pos + 1) % choices
    } else {
        (pos + choices - 1) % choices
    };
    next.checked_sub(1).map(|i| TIME_SLOTS[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let shown = TIME_SLOTS.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(
            shown,
            [
                "09:00", "10:00", "11:00", "12:00", "13:00", "16:00", "17:00", "18:00", "19:00",
                "20:00"
            ]
        );
    }

    #[test]
    fn test_cycle_forwards() {
        assert_eq!(cycle_slot(None, true), Some(TIME_SLOTS[0]));
        assert_eq!(cycle_slot(Some(TIME_SLOTS[4]), true), Some(TIME_SLOTS[5]));
        assert_eq!(cycle_slot(Some(TIME_SLOTS[9]), true), None);
    }

    #[test]
    fn test_cycle_backwards() {
        assert_eq!(cycle_slot(None, false), Some(TIME_SLOTS[9]));
        assert_eq!(cycle_slot(Some(TIME_SLOTS[0]), false), None);
        assert_eq!(cycle_slot(Some(TIME_SLOTS[5]), false), Some(TIME_SLOTS[4]));
    }
}
