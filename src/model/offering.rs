use super::{DemandId, SubjectId, WeeklyGrid};
use std::fmt;

/// Identifier of a tutor's subject offering.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OfferingId(pub u64);

/// A tutor's commitment to teach a subject to at most `quota` tutees.
#[derive(Clone, Debug)]
pub struct TutorOffering {
    pub id: OfferingId,
    pub tutor: String,
    pub subject: SubjectId,
    pub grid: WeeklyGrid,
    pub quota: usize,
    /// Tutees already assigned, including the ones assigned during this run.
    pub filled: usize,
    /// Tutees assigned during this run.
    pub tutees: Vec<DemandId>,
}

impl TutorOffering {
    pub fn new(
        id: OfferingId,
        tutor: &str,
        subject: SubjectId,
        grid: WeeklyGrid,
        quota: usize,
        filled: usize,
    ) -> TutorOffering {
        TutorOffering {
            id,
            tutor: tutor.to_owned(),
            subject,
            grid,
            quota,
            filled,
            tutees: Vec::new(),
        }
    }

    pub fn remaining_capacity(&self) -> usize {
        self.quota.saturating_sub(self.filled)
    }

    pub fn is_over_quota(&self) -> bool {
        self.filled > self.quota
    }
}

impl fmt::Display for TutorOffering {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (#{})", self.tutor, self.id.0)
    }
}

#[test]
fn test_remaining_capacity() {
    let mut offering = TutorOffering::new(
        OfferingId(1),
        "Ada",
        SubjectId(1),
        WeeklyGrid::new(),
        3,
        1,
    );
    assert_eq!(offering.remaining_capacity(), 2);
    offering.filled = 3;
    assert_eq!(offering.remaining_capacity(), 0);
    offering.filled = 5;
    assert_eq!(offering.remaining_capacity(), 0);
    assert!(offering.is_over_quota());
}
