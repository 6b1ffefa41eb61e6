use super::{OfferingId, SubjectId, WeeklyGrid};
use std::fmt;

/// Identifier of a tutee registration.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DemandId(pub u64);

/// A tutee's registration for a subject, waiting for a tutor.
#[derive(Clone, Debug)]
pub struct TuteeDemand {
    pub id: DemandId,
    pub tutee: String,
    pub subject: SubjectId,
    pub grid: WeeklyGrid,
    pub assigned: Option<OfferingId>,
}

impl TuteeDemand {
    pub fn new(id: DemandId, tutee: &str, subject: SubjectId, grid: WeeklyGrid) -> TuteeDemand {
        TuteeDemand {
            id,
            tutee: tutee.to_owned(),
            subject,
            grid,
            assigned: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.assigned.is_none()
    }
}

impl fmt::Display for TuteeDemand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (#{})", self.tutee, self.id.0)
    }
}
