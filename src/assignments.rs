use crate::algos::{ScoringPolicy, Slot, availability_score, preference_lists, stable_matching};
use crate::checks::find_blocking_pair;
use crate::model::{Campaign, DemandId, OfferingId, SubjectId};
use std::fmt;
use std::iter;
use tracing::{Level, debug, info, instrument, trace, warn};

/// What happened to one subject during an assignment run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubjectOutcome {
    /// No pending demand.
    AlreadySatisfied,
    /// Pending demand but no place left in any offering.
    NoCapacity { demand: usize },
    /// More pending demands than places: nothing is assigned.
    ExcessDemand { demand: usize, capacity: usize },
    Matched {
        demand: usize,
        capacity: usize,
        matched: usize,
    },
}

impl fmt::Display for SubjectOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SubjectOutcome::AlreadySatisfied => write!(f, "-> All requests are already satisfied."),
            SubjectOutcome::NoCapacity { .. } => {
                write!(f, "x No place available for this subject.")
            }
            SubjectOutcome::ExcessDemand { demand, capacity } => write!(
                f,
                "x More requests ({demand}) than available places ({capacity}), adjust the quotas."
            ),
            SubjectOutcome::Matched { matched, .. } => write!(f, "v {matched} assignments made"),
        }
    }
}

/// Result of an assignment run over a whole campaign.
#[derive(Clone, Debug, Default)]
pub struct AssignmentReport {
    pub outcomes: Vec<(SubjectId, SubjectOutcome)>,
    /// Pairs created during the run, subject after subject.
    pub pairs: Vec<(DemandId, OfferingId)>,
    /// Human-readable account of the run, for display only.
    pub trace: Vec<String>,
}

impl AssignmentReport {
    pub fn outcome(&self, subject: SubjectId) -> Option<SubjectOutcome> {
        self.outcomes
            .iter()
            .find(|(s, _)| *s == subject)
            .map(|&(_, outcome)| outcome)
    }
}

#[derive(Clone, Copy, Debug)]
struct DemandIndex(usize);

#[derive(Clone, Copy, Debug)]
struct OfferingIndex(usize);

/// Ranks offerings for a tutee, and tutees for an offering, by how well
/// their weekly grids fit together.
struct AvailabilityPolicy<'a>(&'a Campaign);

impl ScoringPolicy<DemandIndex, OfferingIndex> for AvailabilityPolicy<'_> {
    fn score(&self, &DemandIndex(d): &DemandIndex, &OfferingIndex(o): &OfferingIndex) -> f64 {
        availability_score(&self.0.demand(d).grid, &self.0.offering(o).grid)
    }
}

impl ScoringPolicy<OfferingIndex, DemandIndex> for AvailabilityPolicy<'_> {
    fn score(&self, &OfferingIndex(o): &OfferingIndex, &DemandIndex(d): &DemandIndex) -> f64 {
        availability_score(&self.0.offering(o).grid, &self.0.demand(d).grid)
    }
}

/// Assign pending demands to offerings, one subject at a time, in the order
/// of `c.subjects`. A subject that cannot be handled is reported and skipped
/// without affecting the others.
pub fn assign_campaign(c: &mut Campaign) -> AssignmentReport {
    let mut report = AssignmentReport::default();
    let pending = c.unassigned_demands().len();
    info!(
        pending,
        offerings = c.offerings.len(),
        subjects = c.subjects.len(),
        "starting assignment run"
    );
    report.trace.push(format!(
        "{} pending demands, {} tutor offerings, {} subjects",
        pending,
        c.offerings.len(),
        c.subjects.len()
    ));
    for s in 0..c.subjects.len() {
        let subject = c.subjects[s].id;
        report.trace.push(String::new());
        report.trace.push(c.subjects[s].to_string());
        let (outcome, pairs) = assign_subject(c, subject);
        let (demand, capacity) = match outcome {
            SubjectOutcome::AlreadySatisfied => (0, c.capacity_for(subject)),
            SubjectOutcome::NoCapacity { demand } => (demand, 0),
            SubjectOutcome::ExcessDemand { demand, capacity }
            | SubjectOutcome::Matched {
                demand, capacity, ..
            } => (demand, capacity),
        };
        report
            .trace
            .push(format!("-> {capacity} places, {demand} requests"));
        report.trace.push(outcome.to_string());
        report.outcomes.push((subject, outcome));
        report.pairs.extend(pairs);
    }
    report.trace.push(String::new());
    report
        .trace
        .push(format!("Successful assignments: {}", report.pairs.len()));
    info!(assigned = report.pairs.len(), "assignment run complete");
    report
}

/// Run the stable matching for a single subject and apply its result to the
/// campaign. Tutee slots propose to tutor slots; an offering contributes one
/// slot per remaining place.
#[instrument(skip_all, fields(subject = subject.0))]
pub fn assign_subject(
    c: &mut Campaign,
    subject: SubjectId,
) -> (SubjectOutcome, Vec<(DemandId, OfferingId)>) {
    let mut tutee_slots = c
        .demands_for(subject)
        .into_iter()
        .map(|d| Slot::Real(DemandIndex(d)))
        .collect::<Vec<_>>();
    let tutor_slots = c
        .offerings_for(subject)
        .into_iter()
        .flat_map(|o| {
            iter::repeat_n(
                Slot::Real(OfferingIndex(o)),
                c.offering(o).remaining_capacity(),
            )
        })
        .collect::<Vec<_>>();
    let (demand, capacity) = (tutee_slots.len(), tutor_slots.len());
    debug!(demand, capacity, "slots built");
    if demand == 0 {
        return (SubjectOutcome::AlreadySatisfied, Vec::new());
    }
    if capacity == 0 {
        warn!(demand, "no place available");
        return (SubjectOutcome::NoCapacity { demand }, Vec::new());
    }
    if demand > capacity {
        warn!(demand, capacity, "more requests than places, subject skipped");
        return (SubjectOutcome::ExcessDemand { demand, capacity }, Vec::new());
    }
    tutee_slots.resize(capacity, Slot::Dummy);

    let policy = AvailabilityPolicy(c);
    let tutee_prefs = preference_lists(&tutee_slots, &tutor_slots, &policy);
    let tutor_prefs = preference_lists(&tutor_slots, &tutee_slots, &policy);
    let matching = stable_matching(&tutee_prefs, &tutor_prefs);
    if tracing::enabled!(Level::DEBUG) {
        if let Some((p, r)) = find_blocking_pair(&tutee_prefs, &tutor_prefs, &matching) {
            warn!(tutee_slot = p, tutor_slot = r, "matching is not stable");
        }
    }
    let matched = matching
        .pairs()
        .filter_map(|(r, p)| match (tutee_slots[p], tutor_slots[r]) {
            (Slot::Real(DemandIndex(d)), Slot::Real(OfferingIndex(o))) => Some((d, o)),
            _ => None,
        })
        .collect::<Vec<_>>();

    let mut pairs = Vec::with_capacity(matched.len());
    for (d, o) in matched {
        trace!(tutee = %c.demand(d), tutor = %c.offering(o), "assigning");
        c.assign(d, o);
        pairs.push((c.demand(d).id, c.offering(o).id));
    }
    if pairs.len() < demand {
        warn!(
            unmatched = demand - pairs.len(),
            "some tutees could not be matched"
        );
    }
    (
        SubjectOutcome::Matched {
            demand,
            capacity,
            matched: pairs.len(),
        },
        pairs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::ensure_quotas;
    use crate::model::*;

    const MATHS: SubjectId = SubjectId(1);
    const PHYSICS: SubjectId = SubjectId(2);

    /// Unavailable everywhere except at the given bands.
    fn free_at(bands: &[(Weekday, Period)]) -> WeeklyGrid {
        let mut grid = WeeklyGrid::unavailable();
        for &(day, period) in bands {
            grid.set(day, period, FREE);
        }
        grid
    }

    fn subjects() -> Vec<Subject> {
        vec![
            Subject::new(MATHS, "MA11", "Analysis"),
            Subject::new(PHYSICS, "PH11", "Mechanics"),
        ]
    }

    fn tutee(id: u64, subject: SubjectId, grid: WeeklyGrid) -> TuteeDemand {
        TuteeDemand::new(DemandId(id), &format!("tutee{id}"), subject, grid)
    }

    fn tutor(id: u64, subject: SubjectId, grid: WeeklyGrid, quota: usize) -> TutorOffering {
        TutorOffering::new(OfferingId(id), &format!("tutor{id}"), subject, grid, quota, 0)
    }

    #[test]
    fn test_excess_demand_assigns_nothing() {
        let mut c = Campaign::new(
            subjects(),
            (1..=3).map(|i| tutee(i, MATHS, WeeklyGrid::new())).collect(),
            vec![
                tutor(10, MATHS, WeeklyGrid::new(), 1),
                tutor(11, MATHS, WeeklyGrid::new(), 1),
            ],
        );
        let report = assign_campaign(&mut c);
        assert_eq!(
            report.outcome(MATHS),
            Some(SubjectOutcome::ExcessDemand {
                demand: 3,
                capacity: 2
            })
        );
        assert!(report.pairs.is_empty());
        assert_eq!(c.unassigned_demands().len(), 3);
        assert!(report.trace.iter().any(|l| l.contains("adjust the quotas")));
    }

    #[test]
    fn test_padding_with_dummies() {
        let mut c = Campaign::new(
            subjects(),
            vec![
                tutee(1, MATHS, free_at(&[(Weekday::Friday, Period::A4)])),
                tutee(2, MATHS, free_at(&[(Weekday::Monday, Period::M1)])),
            ],
            vec![
                tutor(10, MATHS, free_at(&[(Weekday::Monday, Period::M2)]), 3),
                tutor(11, MATHS, free_at(&[(Weekday::Tuesday, Period::M3)]), 2),
            ],
        );
        let report = assign_campaign(&mut c);
        assert_eq!(
            report.outcome(MATHS),
            Some(SubjectOutcome::Matched {
                demand: 2,
                capacity: 5,
                matched: 2
            })
        );
        assert_eq!(report.pairs.len(), 2);
        let demands = report.pairs.iter().map(|&(d, _)| d).collect::<Vec<_>>();
        assert!(demands.contains(&DemandId(1)) && demands.contains(&DemandId(2)));
        let filled = c.offerings.iter().map(|o| o.filled).sum::<usize>();
        assert_eq!(filled, 2);
        assert!(ensure_quotas(&c).is_ok());
    }

    #[test]
    fn test_compatible_grids_are_paired() {
        let monday = (Weekday::Monday, Period::M1);
        let tuesday = (Weekday::Tuesday, Period::A1);
        let mut c = Campaign::new(
            subjects(),
            vec![tutee(1, MATHS, free_at(&[monday])), tutee(2, MATHS, free_at(&[tuesday]))],
            vec![
                tutor(10, MATHS, free_at(&[tuesday]), 1),
                tutor(11, MATHS, free_at(&[monday]), 1),
            ],
        );
        let report = assign_campaign(&mut c);
        assert_eq!(
            report.pairs,
            vec![(DemandId(2), OfferingId(10)), (DemandId(1), OfferingId(11))]
        );
        assert_eq!(c.demand(0).assigned, Some(OfferingId(11)));
        assert_eq!(c.demand(1).assigned, Some(OfferingId(10)));
        assert_eq!(c.offering(0).tutees, vec![DemandId(2)]);
    }

    #[test]
    fn test_quota_respected() {
        let monday = (Weekday::Monday, Period::M1);
        let mut c = Campaign::new(
            subjects(),
            (1..=4).map(|i| tutee(i, MATHS, free_at(&[monday]))).collect(),
            vec![
                tutor(10, MATHS, free_at(&[monday]), 2),
                TutorOffering::new(OfferingId(11), "busy", MATHS, WeeklyGrid::new(), 4, 2),
            ],
        );
        let report = assign_campaign(&mut c);
        assert_eq!(report.pairs.len(), 4);
        assert_eq!(c.offering(0).tutees.len(), 2);
        assert_eq!(c.offering(1).tutees.len(), 2);
        assert_eq!(c.offering(1).filled, 4);
        assert!(ensure_quotas(&c).is_ok());
    }

    #[test]
    fn test_subjects_are_independent() {
        let mut assigned = tutee(3, PHYSICS, WeeklyGrid::new());
        assigned.assigned = Some(OfferingId(12));
        let mut c = Campaign::new(
            vec![
                Subject::new(SubjectId(3), "CH11", "Chemistry"),
                Subject::new(MATHS, "MA11", "Analysis"),
                Subject::new(PHYSICS, "PH11", "Mechanics"),
                Subject::new(SubjectId(4), "IN11", "Computing"),
            ],
            vec![
                tutee(1, SubjectId(3), WeeklyGrid::new()),
                tutee(2, MATHS, WeeklyGrid::new()),
                assigned,
                tutee(4, SubjectId(4), WeeklyGrid::new()),
                tutee(5, SubjectId(4), WeeklyGrid::new()),
            ],
            vec![
                tutor(10, SubjectId(3), WeeklyGrid::new(), 0),
                tutor(11, MATHS, WeeklyGrid::new(), 1),
                tutor(12, PHYSICS, WeeklyGrid::new(), 1),
                tutor(13, SubjectId(4), WeeklyGrid::new(), 1),
            ],
        );
        let report = assign_campaign(&mut c);
        assert_eq!(
            report.outcomes,
            vec![
                (SubjectId(3), SubjectOutcome::NoCapacity { demand: 1 }),
                (
                    MATHS,
                    SubjectOutcome::Matched {
                        demand: 1,
                        capacity: 1,
                        matched: 1
                    }
                ),
                (PHYSICS, SubjectOutcome::AlreadySatisfied),
                (
                    SubjectId(4),
                    SubjectOutcome::ExcessDemand {
                        demand: 2,
                        capacity: 1
                    }
                ),
            ]
        );
        assert_eq!(report.pairs, vec![(DemandId(2), OfferingId(11))]);
    }

    #[test]
    fn test_trace() {
        let mut c = Campaign::new(
            subjects(),
            vec![tutee(1, MATHS, WeeklyGrid::new())],
            vec![tutor(10, MATHS, WeeklyGrid::new(), 2)],
        );
        let report = assign_campaign(&mut c);
        assert_eq!(
            report.trace,
            vec![
                "1 pending demands, 1 tutor offerings, 2 subjects",
                "",
                "MA11 - Analysis",
                "-> 2 places, 1 requests",
                "v 1 assignments made",
                "",
                "PH11 - Mechanics",
                "-> 0 places, 0 requests",
                "-> All requests are already satisfied.",
                "",
                "Successful assignments: 1",
            ]
        );
    }

    #[test]
    fn test_deterministic() {
        let grids = [
            free_at(&[(Weekday::Monday, Period::M1), (Weekday::Friday, Period::A2)]),
            free_at(&[(Weekday::Wednesday, Period::M3)]),
            free_at(&[(Weekday::Monday, Period::M1)]),
            WeeklyGrid::new(),
        ];
        let c = Campaign::new(
            subjects(),
            (0..6)
                .map(|i| tutee(i, MATHS, grids[i as usize % 4].clone()))
                .collect(),
            (0..4)
                .map(|i| tutor(10 + i, MATHS, grids[(i as usize + 1) % 4].clone(), 2))
                .collect(),
        );
        let (mut a, mut b) = (c.clone(), c);
        let (ra, rb) = (assign_campaign(&mut a), assign_campaign(&mut b));
        assert_eq!(ra.pairs, rb.pairs);
        assert_eq!(ra.trace, rb.trace);
        assert_eq!(ra.pairs.len(), 6);
        assert!(ensure_quotas(&a).is_ok());
    }
}
