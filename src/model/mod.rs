pub use self::campaign::Campaign;
pub use self::demand::{DemandId, TuteeDemand};
pub use self::grid::{FREE, PERIODS, Period, UNAVAILABLE, WeeklyGrid, Weekday};
pub use self::offering::{OfferingId, TutorOffering};
pub use self::subject::{Subject, SubjectId};

mod campaign;
mod demand;
mod grid;
mod offering;
mod subject;
