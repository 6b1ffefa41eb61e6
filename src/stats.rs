use crate::algos::availability_score;
use crate::model::Campaign;

/// For every tutee assigned during the run, the rank of the assigned
/// offering among all offerings of the subject, ordered by compatibility
/// (0 when no offering scores strictly higher). Entry `n` counts the tutees
/// who got rank `n`.
pub fn choice_ranks(c: &Campaign) -> Vec<usize> {
    let mut ranks = Vec::new();
    for offering in &c.offerings {
        for &d in &offering.tutees {
            let Some(demand) = c.demand_by_id(d) else {
                continue;
            };
            let assigned = availability_score(&demand.grid, &offering.grid);
            let rank = c
                .offerings_for(demand.subject)
                .into_iter()
                .filter(|&o| availability_score(&demand.grid, &c.offering(o).grid) > assigned)
                .count();
            if ranks.len() <= rank {
                ranks.resize(rank + 1, 0);
            }
            ranks[rank] += 1;
        }
    }
    ranks
}

/// Mean compatibility score of the pairs created during the run.
pub fn mean_score(c: &Campaign) -> Option<f64> {
    let scores = c
        .newly_assigned()
        .into_iter()
        .filter_map(|(d, o)| {
            let demand = c.demand_by_id(d)?;
            let offering = c.offering_by_id(o)?;
            Some(availability_score(&demand.grid, &offering.grid))
        })
        .collect::<Vec<_>>();
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
