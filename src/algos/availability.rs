use crate::model::{Period, WeeklyGrid, Weekday};

/// Preference weight of a single slot value.
///
/// Decreases with the number of courses already scheduled in the band. The
/// unavailable marker goes through the same curve and therefore weighs
/// slightly more than a free band.
pub fn slot_weight(value: i32) -> f64 {
    (-f64::from(value) / 8.0).exp()
}

/// Compatibility of two weekly grids (more is better).
///
/// Sums, over every band of every school day present in both grids, the
/// product of both slot weights. Weekends never contribute.
pub fn availability_score(a: &WeeklyGrid, b: &WeeklyGrid) -> f64 {
    let mut score = 0.0;
    for day in Weekday::SCHOOL_DAYS {
        let (Some(day_a), Some(day_b)) = (a.day(day), b.day(day)) else {
            continue;
        };
        for period in Period::ALL {
            let i = period.index();
            score += slot_weight(day_a[i]) * slot_weight(day_b[i]);
        }
    }
    score
}
