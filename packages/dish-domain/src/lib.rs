pub mod filter;
pub mod keywords;
pub mod recipe;
pub mod session;

pub use filter::FilterRecord;
pub use recipe::{Candidate, Nutrition, RankedResult};
pub use session::{QueryTurn, Refinement, SessionContext};
