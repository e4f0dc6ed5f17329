//! Shared primitive types used across the entire simulation.

/// One simulation tick = one in-game week.
pub type Week = u32;

/// Identifier of a show (the weekly loop is keyed by show).
pub type ShowId = String;

/// Identifier of a company (player-controlled or simulated).
pub type CompanyId = String;

/// In-game years are 52 weeks; generation counters are scoped per year.
pub const WEEKS_PER_YEAR: Week = 52;

/// The in-game year a week belongs to, starting at year 1.
pub fn year_of_week(week: Week) -> u32 {
    if week == 0 {
        1
    } else {
        (week - 1) / WEEKS_PER_YEAR + 1
    }
}

/// The 1-based position of a week inside its year.
pub fn week_in_year(week: Week) -> Week {
    if week == 0 {
        1
    } else {
        (week - 1) % WEEKS_PER_YEAR + 1
    }
}

/// Round a money amount to cents. All treasury deltas go through this
/// before hitting the store.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
