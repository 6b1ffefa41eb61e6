pub use self::availability::{availability_score, slot_weight};
pub use self::gale_shapley::{DeferredAcceptance, Matching, Proposal, stable_matching};
pub use self::preferences::{DUMMY_SCORE, ScoringPolicy, Slot, preference_lists, score_matrix};

mod availability;
mod gale_shapley;
mod preferences;
