//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod ingress;
pub mod positioner;
pub mod script;
pub mod tick;

pub use ingress::ingress_task;
pub use positioner::positioner_task;
pub use script::script_task;
pub use tick::tick_task;
