pub mod engine;

pub use engine::{
    CandidateSource, CycleEngine, CycleOutcome, CyclePlan, plan_cycle, resolve_position,
    select_candidates,
};
