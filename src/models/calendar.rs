use chrono::NaiveDate;

/// An upcoming company event (earnings, dividend dates). Some events carry a
/// date window; the first date is the one reports display.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub name: String,
    pub dates: Vec<NaiveDate>,
}

impl CalendarEvent {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }
}
