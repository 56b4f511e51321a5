// Ranking: batch scoring, idempotent persistence of match records, and the
// HTTP surface over them. Scoring itself lives in `crate::scoring`.

pub mod handlers;
pub mod orchestrator;
pub mod sink;
pub mod store;
