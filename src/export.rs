use crate::algos::availability_score;
use crate::model::Campaign;
use eyre::{Result, WrapErr};
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Serialize)]
struct Row<'a> {
    registration_id: u64,
    tutor_subject_id: u64,
    subject: &'a str,
    tutee: &'a str,
    tutor: &'a str,
    score: f64,
}

/// Write the assignments made during the run as CSV, one row per tutee.
pub fn write_csv<W: io::Write>(c: &Campaign, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (d, o) in c.newly_assigned() {
        let (Some(demand), Some(offering)) = (c.demand_by_id(d), c.offering_by_id(o)) else {
            continue;
        };
        let score = availability_score(&demand.grid, &offering.grid);
        wtr.serialize(Row {
            registration_id: d.0,
            tutor_subject_id: o.0,
            subject: c
                .subject(demand.subject)
                .map_or("", |s| s.short_name.as_str()),
            tutee: &demand.tutee,
            tutor: &offering.tutor,
            score: (score * 100.0).round() / 100.0,
        })
        .wrap_err("cannot write assignment")?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(c: &Campaign, path: &Path) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("cannot create {}", path.display()))?;
    write_csv(c, file)
}
