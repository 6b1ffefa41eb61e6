use super::*;

/// Everything the matching engine works on for one teaching period.
#[derive(Clone, Debug, Default)]
pub struct Campaign {
    pub subjects: Vec<Subject>,
    pub demands: Vec<TuteeDemand>,
    pub offerings: Vec<TutorOffering>,
}

impl Campaign {
    pub fn new(
        subjects: Vec<Subject>,
        demands: Vec<TuteeDemand>,
        offerings: Vec<TutorOffering>,
    ) -> Campaign {
        Campaign {
            subjects,
            demands,
            offerings,
        }
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn demand(&self, index: usize) -> &TuteeDemand {
        &self.demands[index]
    }

    pub fn offering(&self, index: usize) -> &TutorOffering {
        &self.offerings[index]
    }

    pub fn demand_by_id(&self, id: DemandId) -> Option<&TuteeDemand> {
        self.demands.iter().find(|d| d.id == id)
    }

    pub fn offering_by_id(&self, id: OfferingId) -> Option<&TutorOffering> {
        self.offerings.iter().find(|o| o.id == id)
    }

    /// Indices of the pending demands for a subject.
    pub fn demands_for(&self, subject: SubjectId) -> Vec<usize> {
        self.filter_demands(|d| d.subject == subject && d.is_pending())
    }

    /// Indices of the offerings for a subject.
    pub fn offerings_for(&self, subject: SubjectId) -> Vec<usize> {
        (0..self.offerings.len())
            .filter(|&o| self.offerings[o].subject == subject)
            .collect()
    }

    pub fn filter_demands<F>(&self, condition: F) -> Vec<usize>
    where
        F: Fn(&TuteeDemand) -> bool,
    {
        (0..self.demands.len())
            .filter(|&d| condition(&self.demands[d]))
            .collect()
    }

    pub fn unassigned_demands(&self) -> Vec<usize> {
        self.filter_demands(TuteeDemand::is_pending)
    }

    /// Attach a demand to an offering and consume one unit of its capacity.
    pub fn assign(&mut self, demand: usize, offering: usize) {
        assert!(
            self.demands[demand].is_pending(),
            "a tutor is already assigned to this demand"
        );
        assert_eq!(
            self.demands[demand].subject, self.offerings[offering].subject,
            "cannot assign a demand to an offering for another subject"
        );
        let offering = &mut self.offerings[offering];
        self.demands[demand].assigned = Some(offering.id);
        offering.tutees.push(self.demands[demand].id);
        offering.filled += 1;
    }

    /// Pairs created since the campaign was loaded, in offering order.
    pub fn newly_assigned(&self) -> Vec<(DemandId, OfferingId)> {
        self.offerings
            .iter()
            .flat_map(|o| o.tutees.iter().map(move |&d| (d, o.id)))
            .collect()
    }

    /// Total remaining capacity for a subject.
    pub fn capacity_for(&self, subject: SubjectId) -> usize {
        self.offerings_for(subject)
            .into_iter()
            .map(|o| self.offerings[o].remaining_capacity())
            .sum()
    }
}
