//! The handler trait implemented once per supported module type.

use async_trait::async_trait;

use crate::context::ModuleContext;
use crate::error::ProcessResult;

/// Generates questions for one module type.
///
/// `process` typically reads the module's state up front, waits for the
/// solve, reads again, and queues questions on the context. Returning an
/// error abandons that one module.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModuleHandler: Send + Sync {
    /// The module type id this handler serves.
    fn module_id(&self) -> &'static str;

    async fn process(&self, ctx: &ModuleContext) -> ProcessResult<()>;
}
