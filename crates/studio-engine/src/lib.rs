//! studio_engine - Request orchestration for the content studio
//!
//! - `machine` - per-action lifecycle state machine
//! - `requests` - cancellation tokens of in-flight requests
//! - `media` - media handles and their revocation
//! - `studio` - the `Studio` facade exposing every action

pub mod action;
pub mod machine;
pub mod media;
pub mod requests;
pub mod studio;

pub use action::{ActionError, ActionKind, ActionResult, ActionState};
pub use machine::{ActionEvent, ActionMachine, ActionPhase, StateTransition};
pub use media::{MediaSlot, MediaSlots, MediaUrlFactory, TempFileUrls};
pub use requests::RequestRegistry;
pub use studio::{HistoryScope, Studio, StudioBuilder};
