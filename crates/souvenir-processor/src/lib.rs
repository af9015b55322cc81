//! Question generation for solved modules.
//!
//! Each supported module type has a [`ModuleHandler`]. The [`Processor`] runs
//! the handler for every module concurrently; a handler reads the module's
//! state through typed accessors, waits for the module to be solved, and
//! queues questions on its [`ModuleContext`]. Completed handlers publish their
//! questions to the shared [`QuestionSink`]; a failing handler abandons only
//! its own module.

pub mod context;
pub mod engine;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod logging;
pub mod question;
pub mod registry;
pub mod sink;

pub use context::{ModuleContext, ModuleInstance};
pub use engine::{ModuleOutcome, Outcome, ProcessReport, Processor};
pub use error::{ProcessError, ProcessResult, RegistryError};
pub use handler::ModuleHandler;
pub use question::QuestionRecord;
pub use registry::HandlerRegistry;
pub use sink::QuestionSink;
