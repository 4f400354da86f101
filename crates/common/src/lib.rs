pub mod scheduler;
pub mod structured_logging;

pub use scheduler::{CallSerializer, TaskHandle, TaskOutcome};
pub use structured_logging::{
    init_structured_logging, ExecutionContext, LoggingConfig, OperationTimer, StructuredLogEntry,
};
