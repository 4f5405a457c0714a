//! Step sequencing and confirmation-tracked execution of multi-transaction
//! financial operations.
//!
//! Each logical user action (lever up, unwind, swap) decomposes into an
//! ordered `StepPlan`. The `StepSequencer` broadcasts one step at a time and
//! waits for on-chain confirmation before the next step, because later steps
//! consume financial quantities that are only authoritative once the prior
//! step is terminal. There is no cross-step atomicity on a blockchain:
//! partial completion is a valid, reportable outcome, never hidden behind an
//! all-or-nothing abstraction.

pub mod engine;
pub mod error;
pub mod plan;
pub mod sequencer;
pub mod types;

pub use engine::{BoostEngine, EngineConfig};
pub use error::{EngineError, FlowFailure, FlowResult};
pub use plan::{
    AmountSource, SequenceFailure, SequenceResult, Step, StepAction, StepKind, StepPlan,
    StepResult, SwapDetail,
};
pub use sequencer::StepSequencer;
pub use types::{
    DeleverageOutcome, DeleverageParams, DeleverageTransactions, LeverageOutcome, LeverageParams,
    LeverageQuote, LeverageTransactions, SwapOutcome, SwapParams,
};
