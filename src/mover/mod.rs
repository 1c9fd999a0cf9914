pub mod injector;
pub mod machine;
pub mod supervisor;

pub use injector::{PointerInjector, ScriptedInjector};
pub use machine::{IdleStateMachine, TickOutcome};
pub use supervisor::{StartOutcome, StopOutcome, Supervisor};
