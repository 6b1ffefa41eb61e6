#![allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use crate::model::{
    Campaign, DemandId, OfferingId, Subject, SubjectId, TuteeDemand, TutorOffering, WeeklyGrid,
};
use eyre::{Result, WrapErr};
use sqlx::any::{AnyConnectOptions, AnyRow};
use sqlx::{AnyConnection, Connection, Row};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, info, warn};

pub struct Loader {
    conn: AnyConnection,
}

impl Loader {
    pub async fn new(url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();
        let options = AnyConnectOptions::from_str(url).wrap_err("invalid database url")?;
        Ok(Self {
            conn: AnyConnection::connect_with(&options)
                .await
                .wrap_err("cannot connect to database")?,
        })
    }

    /// Load every subject, the pending tutee registrations and the tutor
    /// offerings of a campaign. Participants without a usable availability
    /// record get [`WeeklyGrid::unavailable`].
    pub async fn load(&mut self, campaign: u64) -> Result<Campaign> {
        let subjects = self.load_subjects().await.wrap_err("cannot load subjects")?;
        let grids = self
            .load_availabilities(campaign)
            .await
            .wrap_err("cannot load availabilities")?;
        let filled = self
            .load_filled_counts(campaign)
            .await
            .wrap_err("cannot count assigned tutees")?;
        let demands = self
            .load_demands(campaign)
            .await
            .wrap_err("cannot load tutee registrations")?
            .into_iter()
            .map(|(id, user, name, subject)| {
                TuteeDemand::new(id, &name, subject, grid_for(&grids, user, &name))
            })
            .collect::<Vec<_>>();
        let offerings = self
            .load_offerings(campaign)
            .await
            .wrap_err("cannot load tutor offerings")?
            .into_iter()
            .map(|(id, user, name, subject, quota)| {
                let filled = filled.get(&id).copied().unwrap_or(0);
                let offering = TutorOffering::new(
                    id,
                    &name,
                    subject,
                    grid_for(&grids, user, &name),
                    quota,
                    filled,
                );
                if offering.is_over_quota() {
                    warn!(
                        tutor = %offering,
                        quota,
                        filled,
                        "offering already has more tutees than its quota"
                    );
                }
                offering
            })
            .collect::<Vec<_>>();
        info!(
            subjects = subjects.len(),
            demands = demands.len(),
            offerings = offerings.len(),
            availabilities = grids.len(),
            "campaign loaded"
        );
        Ok(Campaign::new(subjects, demands, offerings))
    }

    async fn load_subjects(&mut self) -> Result<Vec<Subject>> {
        Ok(
            sqlx::query("SELECT id, short_name, name FROM subjects ORDER BY id")
                .try_map(|row: AnyRow| {
                    Ok(Subject {
                        id: SubjectId(row.try_get::<i64, _>("id")? as u64),
                        short_name: row.try_get("short_name")?,
                        name: row.try_get("name")?,
                    })
                })
                .fetch_all(&mut self.conn)
                .await?,
        )
    }

    /// Parsed availability documents, by user. When a user has several
    /// documents, the first readable one wins.
    async fn load_availabilities(
        &mut self,
        campaign: u64,
    ) -> Result<HashMap<i64, Option<WeeklyGrid>>> {
        let rows = sqlx::query(
            "SELECT user_id, availability_json FROM semester_availabilities \
             WHERE campaign_id = ? ORDER BY id",
        )
        .bind(campaign as i64)
        .try_map(|row: AnyRow| {
            let user = row.try_get::<i64, _>("user_id")?;
            let json = row.try_get::<String, _>("availability_json")?;
            let grid = match WeeklyGrid::from_json(&json) {
                Ok(grid) => Some(grid),
                Err(e) => {
                    warn!(user, error = %e, "unreadable availability document");
                    None
                }
            };
            Ok((user, grid))
        })
        .fetch_all(&mut self.conn)
        .await?;
        Ok(merge_availabilities(rows))
    }

    async fn load_filled_counts(&mut self, campaign: u64) -> Result<HashMap<OfferingId, usize>> {
        Ok(sqlx::query(
            "SELECT tutor_subject_id, COUNT(*) AS tutees FROM tutee_registrations \
             WHERE campaign_id = ? AND tutor_subject_id IS NOT NULL GROUP BY tutor_subject_id",
        )
        .bind(campaign as i64)
        .try_map(|row: AnyRow| {
            Ok((
                OfferingId(row.try_get::<i64, _>("tutor_subject_id")? as u64),
                row.try_get::<i64, _>("tutees")? as usize,
            ))
        })
        .fetch_all(&mut self.conn)
        .await?
        .into_iter()
        .collect())
    }

    async fn load_demands(
        &mut self,
        campaign: u64,
    ) -> Result<Vec<(DemandId, i64, String, SubjectId)>> {
        Ok(sqlx::query(
            "SELECT r.id, r.tutee_id, r.subject_id, u.first_name, u.last_name \
             FROM tutee_registrations r JOIN users u ON u.id = r.tutee_id \
             WHERE r.campaign_id = ? AND r.tutor_subject_id IS NULL ORDER BY r.id",
        )
        .bind(campaign as i64)
        .try_map(|row: AnyRow| {
            Ok((
                DemandId(row.try_get::<i64, _>("id")? as u64),
                row.try_get::<i64, _>("tutee_id")?,
                full_name(&row)?,
                SubjectId(row.try_get::<i64, _>("subject_id")? as u64),
            ))
        })
        .fetch_all(&mut self.conn)
        .await?)
    }

    async fn load_offerings(
        &mut self,
        campaign: u64,
    ) -> Result<Vec<(OfferingId, i64, String, SubjectId, usize)>> {
        Ok(sqlx::query(
            "SELECT t.id, t.tutor_id, t.subject_id, t.max_tutees, u.first_name, u.last_name \
             FROM tutor_subjects t JOIN users u ON u.id = t.tutor_id \
             WHERE t.campaign_id = ? ORDER BY t.id",
        )
        .bind(campaign as i64)
        .try_map(|row: AnyRow| {
            let id = OfferingId(row.try_get::<i64, _>("id")? as u64);
            let quota = row.try_get::<i64, _>("max_tutees")?;
            if quota < 0 {
                warn!(offering = id.0, quota, "negative quota treated as zero");
            }
            Ok((
                id,
                row.try_get::<i64, _>("tutor_id")?,
                full_name(&row)?,
                SubjectId(row.try_get::<i64, _>("subject_id")? as u64),
                quota.max(0) as usize,
            ))
        })
        .fetch_all(&mut self.conn)
        .await?)
    }

    /// Record the tutor offering of each newly matched registration. All
    /// updates happen in one transaction.
    pub async fn save_assignments(&mut self, assignments: &[(DemandId, OfferingId)]) -> Result<()> {
        let mut trans = self.conn.begin().await?;
        for (d, o) in assignments {
            let updated = sqlx::query(
                "UPDATE tutee_registrations SET tutor_subject_id = ? \
                 WHERE id = ? AND tutor_subject_id IS NULL",
            )
            .bind(o.0 as i64)
            .bind(d.0 as i64)
            .execute(&mut *trans)
            .await
            .wrap_err("cannot save assignment")?;
            if updated.rows_affected() == 0 {
                warn!(
                    registration = d.0,
                    "registration was assigned concurrently, leaving it untouched"
                );
            }
        }
        trans
            .commit()
            .await
            .wrap_err("error when committing transaction")?;
        debug!(count = assignments.len(), "assignments saved");
        Ok(())
    }
}

fn full_name(row: &AnyRow) -> Result<String, sqlx::Error> {
    let first = row.try_get::<String, _>("first_name")?;
    let last = row.try_get::<String, _>("last_name")?;
    Ok(format!("{first} {last}"))
}

/// Index availability rows by user. A parsed grid is never replaced, and
/// replaces an earlier unreadable document.
fn merge_availabilities<I>(rows: I) -> HashMap<i64, Option<WeeklyGrid>>
where
    I: IntoIterator<Item = (i64, Option<WeeklyGrid>)>,
{
    let mut grids = HashMap::new();
    for (user, grid) in rows {
        let entry = grids.entry(user).or_insert(None);
        if entry.is_none() {
            *entry = grid;
        }
    }
    grids
}

fn grid_for(grids: &HashMap<i64, Option<WeeklyGrid>>, user: i64, name: &str) -> WeeklyGrid {
    match grids.get(&user) {
        Some(Some(grid)) => grid.clone(),
        Some(None) => WeeklyGrid::unavailable(),
        None => {
            warn!(user = name, "no availability on record, assuming unavailable");
            WeeklyGrid::unavailable()
        }
    }
}
