pub mod events;
pub mod fill;
pub mod form;
pub mod model;
pub mod policy;
pub mod scroll;
pub mod waiting;

pub use events::{FormEvents, NullFormEvents, TracingFormEvents};
pub use fill::fill_field;
pub use form::fill_form;
pub use model::{
    FieldKind, FieldOutcome, FieldResult, FieldSpec, FieldValue, FormOutcome, FormPlan, FormReport,
    PlanError,
};
pub use policy::{ScrollPacing, SettlePolicy};
pub use scroll::scroll_to_bottom;
pub use waiting::wait_element_ready;
