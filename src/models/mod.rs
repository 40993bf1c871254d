pub mod biomarkers;
pub mod enums;
pub mod lifestyle;
pub mod recommendation;
pub mod report;

pub use biomarkers::BiomarkerSet;
pub use lifestyle::{DailyChecklist, LifestyleSnapshot, RatedHabits, StoredDailyLog};
pub use recommendation::{Recommendation, RecommendationDraft};
pub use report::{NewReport, StoredReport};
