use crate::algos::Matching;
use crate::model::Campaign;
use eyre::{Result, bail};
use tracing::warn;

/// Report every demand that is still waiting for a tutor.
pub fn warn_unassigned(c: &Campaign) {
    for d in c.unassigned_demands() {
        let demand = c.demand(d);
        let subject = c
            .subject(demand.subject)
            .map_or_else(|| format!("#{}", demand.subject.0), |s| s.short_name.clone());
        warn!("tutee {} did not get a tutor for {}", demand, subject);
    }
}

/// Check that no offering received more new tutees than it had room for.
pub fn ensure_quotas(c: &Campaign) -> Result<()> {
    for offering in &c.offerings {
        let added = offering.tutees.len();
        let initial = offering.filled - added;
        if added > offering.quota.saturating_sub(initial) {
            bail!(
                "offering {} received {} tutees with only {} places left",
                offering,
                added,
                offering.quota.saturating_sub(initial)
            );
        }
    }
    Ok(())
}

/// Look for a proposer and a receiver who both prefer each other over their
/// partners in `matching`. Being unmatched is worse than any acceptable
/// partner.
pub fn find_blocking_pair(
    proposers: &[Vec<usize>],
    receivers: &[Vec<usize>],
    matching: &Matching,
) -> Option<(usize, usize)> {
    let rank = |prefs: &[usize], target: usize| prefs.iter().position(|&x| x == target);
    for (p, prefs) in proposers.iter().enumerate() {
        let better = match matching.receiver_for(p) {
            Some(r) => rank(prefs, r).unwrap_or(prefs.len()),
            None => prefs.len(),
        };
        for &r in &prefs[..better] {
            let Some(r_prefs) = receivers.get(r) else {
                continue;
            };
            let Some(p_rank) = rank(r_prefs, p) else {
                continue;
            };
            let prefers = match matching.proposer_for(r) {
                Some(current) => rank(r_prefs, current).is_none_or(|c| p_rank < c),
                None => true,
            };
            if prefers {
                return Some((p, r));
            }
        }
    }
    None
}
