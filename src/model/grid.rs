use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of teaching bands in a day.
pub const PERIODS: usize = 7;

/// Slot value meaning the participant cannot attend.
pub const UNAVAILABLE: i32 = -1;

/// Slot value meaning the participant is free.
pub const FREE: i32 = 0;

/// Day of the week, encoded as 0 (Sunday) to 6 (Saturday) in stored
/// availability documents.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    /// Days on which tutoring can take place, in order.
    pub const SCHOOL_DAYS: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sun",
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
        }
    }
}

impl TryFrom<u8> for Weekday {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            6 => Weekday::Saturday,
            other => return Err(format!("invalid weekday code {other}")),
        })
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> u8 {
        day as u8
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Daily teaching band. Every band lasts one hour and a half.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Period {
    M1,
    M2,
    M3,
    A1,
    A2,
    A3,
    A4,
}

impl Period {
    pub const ALL: [Period; PERIODS] = [
        Period::M1,
        Period::M2,
        Period::M3,
        Period::A1,
        Period::A2,
        Period::A3,
        Period::A4,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Start of the band as (hour, minute).
    pub fn start(self) -> (u32, u32) {
        match self {
            Period::M1 => (8, 0),
            Period::M2 => (9, 45),
            Period::M3 => (11, 30),
            Period::A1 => (13, 15),
            Period::A2 => (15, 0),
            Period::A3 => (16, 45),
            Period::A4 => (18, 30),
        }
    }

    /// End of the band as (hour, minute).
    pub fn end(self) -> (u32, u32) {
        let (hour, minute) = self.start();
        let total = hour * 60 + minute + 90;
        (total / 60, total % 60)
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::M1 => "M1",
            Period::M2 => "M2",
            Period::M3 => "M3",
            Period::A1 => "A1",
            Period::A2 => "A2",
            Period::A3 => "A3",
            Period::A4 => "A4",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (sh, sm) = self.start();
        let (eh, em) = self.end();
        write!(f, "{} ({sh:02}:{sm:02}-{eh:02}:{em:02})", self.label())
    }
}

/// Weekly availability of a participant.
///
/// Each present day holds one value per [`Period`]: [`UNAVAILABLE`],
/// [`FREE`], or a positive count of academic courses already scheduled in
/// that band. An absent day means that no data is known for it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct WeeklyGrid {
    days: BTreeMap<Weekday, [i32; PERIODS]>,
}

impl WeeklyGrid {
    pub fn new() -> WeeklyGrid {
        WeeklyGrid::default()
    }

    /// Grid used when a participant has no availability on record: every
    /// school day is present and unavailable.
    pub fn unavailable() -> WeeklyGrid {
        let mut grid = WeeklyGrid::new();
        for day in Weekday::SCHOOL_DAYS {
            grid.set_day(day, [UNAVAILABLE; PERIODS]);
        }
        grid
    }

    pub fn with_day(mut self, day: Weekday, values: [i32; PERIODS]) -> WeeklyGrid {
        self.set_day(day, values);
        self
    }

    pub fn set_day(&mut self, day: Weekday, values: [i32; PERIODS]) {
        self.days.insert(day, values);
    }

    /// Set a single band, creating the day as unavailable if it was absent.
    pub fn set(&mut self, day: Weekday, period: Period, value: i32) {
        self.days.entry(day).or_insert([UNAVAILABLE; PERIODS])[period.index()] = value;
    }

    pub fn day(&self, day: Weekday) -> Option<&[i32; PERIODS]> {
        self.days.get(&day)
    }

    pub fn value(&self, day: Weekday, period: Period) -> Option<i32> {
        self.day(day).map(|values| values[period.index()])
    }

    /// School-day bands where both participants are exactly free.
    pub fn shared_free_periods(&self, other: &WeeklyGrid) -> Vec<(Weekday, Period)> {
        Weekday::SCHOOL_DAYS
            .into_iter()
            .flat_map(|day| Period::ALL.into_iter().map(move |period| (day, period)))
            .filter(|&(day, period)| {
                self.value(day, period) == Some(FREE) && other.value(day, period) == Some(FREE)
            })
            .collect()
    }

    /// Parse a stored availability document such as `{"1": [0, -1, ...]}`.
    pub fn from_json(json: &str) -> Result<WeeklyGrid, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
