//! Purpose: Map client-facing Spanish month names and calendar weekday names.
//! Exports: `month_from_spanish`, `weekday_name`.
//! Role: Locale seam between the Spanish query surface and `time`'s calendar.
//! Invariants: Month lookup is exact and case-insensitive over twelve names.
//! Invariants: Weekday names stay the calendar's native (English) names,
//! matching the upstream dataset contract; unrecognized day names match nothing.

use time::{Month, Weekday};

const MONTHS: [(&str, Month); 12] = [
    ("enero", Month::January),
    ("febrero", Month::February),
    ("marzo", Month::March),
    ("abril", Month::April),
    ("mayo", Month::May),
    ("junio", Month::June),
    ("julio", Month::July),
    ("agosto", Month::August),
    ("septiembre", Month::September),
    ("octubre", Month::October),
    ("noviembre", Month::November),
    ("diciembre", Month::December),
];

/// Resolve a Spanish month name to its calendar month. `None` means the
/// input is not one of the twelve canonical names (distinct from a zero
/// count). Lookup is exact apart from casing; surrounding whitespace is not
/// stripped.
pub fn month_from_spanish(name: &str) -> Option<Month> {
    let needle = name.to_lowercase();
    MONTHS
        .iter()
        .find(|(spanish, _)| *spanish == needle)
        .map(|(_, month)| *month)
}

/// Lowercased native weekday name, as the source dataset's calendar names days.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "monday",
        Weekday::Tuesday => "tuesday",
        Weekday::Wednesday => "wednesday",
        Weekday::Thursday => "thursday",
        Weekday::Friday => "friday",
        Weekday::Saturday => "saturday",
        Weekday::Sunday => "sunday",
    }
}
