mod caller;
mod policy;
mod state;

pub use caller::{CallTrace, ResilientCaller};
pub use policy::{ErrorClass, Failure, GenerationOutcome, RetryPolicy, TransientKind};
pub use state::{CallEvent, CallState};
