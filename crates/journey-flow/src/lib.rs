pub mod errors;
pub mod events;
pub mod executor;
pub mod redact;
pub mod types;

pub use errors::FlowError;
pub use events::{JourneyEvents, NullJourneyEvents, TracingJourneyEvents};
pub use executor::JourneyExecutor;
pub use types::{
    Journey, JourneyReport, JourneyStep, PostCondition, StepAction, StepReport, Verification,
};
