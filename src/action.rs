pub mod error_shape;
pub mod model;
pub mod progress;
pub mod runner;
pub mod validation;

pub use model::{ActionOutcome, ActionRequest, SuccessSentinel, UploadRequest};
pub use runner::RemoteActionRunner;
pub use validation::{FieldRule, ValidationFailure};
