use crate::algos::availability_score;
use crate::assignments::AssignmentReport;
use crate::model::Campaign;
use crate::stats;

pub fn display_trace(report: &AssignmentReport) {
    for line in &report.trace {
        println!("{line}");
    }
}

/// List the tutees given to each offering during the run, with the bands
/// where both sides are free.
pub fn display_details(c: &Campaign) {
    let mut offerings = c
        .offerings
        .iter()
        .filter(|o| !o.tutees.is_empty())
        .collect::<Vec<_>>();
    offerings.sort_by_key(|o| {
        (
            c.subject(o.subject).map(|s| s.short_name.clone()),
            o.tutor.clone(),
        )
    });
    for o in offerings {
        let subject = c
            .subject(o.subject)
            .map_or_else(|| format!("#{}", o.subject.0), |s| s.short_name.clone());
        println!("{} / {} ({}/{}):", subject, o, o.filled, o.quota);
        let mut tutees = o
            .tutees
            .iter()
            .filter_map(|&d| c.demand_by_id(d))
            .collect::<Vec<_>>();
        tutees.sort_by_key(|d| d.tutee.clone());
        for d in tutees {
            print!(
                "  - {} (score {:.2})",
                d,
                availability_score(&d.grid, &o.grid)
            );
            let shared = d.grid.shared_free_periods(&o.grid);
            if shared.is_empty() {
                print!(" (no shared free band)");
            } else {
                let bands = shared
                    .iter()
                    .map(|(day, period)| format!("{} {}", day, period.label()))
                    .collect::<Vec<_>>();
                print!(" [{}]", bands.join(", "));
            }
            println!();
        }
        println!();
    }
}

pub fn display_stats(c: &Campaign) {
    let total = c.demands.len();
    let assigned = c.newly_assigned().len();
    let unassigned = c.unassigned_demands().len();
    println!(
        "Demands assigned/unassigned/total: {}/{}/{}",
        assigned, unassigned, total
    );
    if let Some(mean) = stats::mean_score(c) {
        println!("Mean compatibility score: {mean:.2}");
    }
    let ranks = stats::choice_ranks(c);
    let cumul = ranks.iter().scan(0, |s, &r| {
        *s += r;
        Some(*s)
    });
    let total: usize = ranks.iter().sum();
    if total == 0 {
        return;
    }
    println!("Choice ranking:");
    for (rank, (n, upto)) in ranks.iter().zip(cumul).enumerate() {
        if *n != 0 {
            println!(
                "  - rank {}: {} (cumulative {} - {:.2}%)",
                rank + 1,
                n,
                upto,
                100.0 * upto as f32 / total as f32
            );
        }
    }
}

/// Offerings that still have room after the run, by subject.
pub fn display_open_places(c: &Campaign) {
    let mut open = c
        .offerings
        .iter()
        .filter(|o| o.remaining_capacity() > 0)
        .collect::<Vec<_>>();
    open.sort_by_key(|o| (o.subject, o.tutor.clone()));
    if !open.is_empty() {
        println!("Offerings with places left:");
        for o in open {
            let subject = c
                .subject(o.subject)
                .map_or_else(|| format!("#{}", o.subject.0), |s| s.short_name.clone());
            println!("  - {} / {} ({} left)", subject, o, o.remaining_capacity());
        }
    }
}
