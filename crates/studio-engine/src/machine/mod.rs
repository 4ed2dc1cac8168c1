//! Per-action request lifecycle.

mod events;
mod states;
mod transitions;

pub use events::ActionEvent;
pub use states::ActionPhase;
pub use transitions::{ActionMachine, StateTransition};
