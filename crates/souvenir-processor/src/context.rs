//! Per-module processing context.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use souvenir_access::Resolver;
use souvenir_core::HostObject;
use tokio::sync::watch;

use crate::error::{ProcessError, ProcessResult};
use crate::question::QuestionRecord;

/// A live module in the bomb, as handed to the processor.
pub struct ModuleInstance {
    /// Module type id used to pick a handler.
    pub id: String,

    /// Display name used in question text.
    pub name: String,

    pub object: Arc<dyn HostObject>,

    /// Observes `true` once the module is solved.
    pub solved: watch::Receiver<bool>,
}

impl ModuleInstance {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        object: Arc<dyn HostObject>,
        solved: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            object,
            solved,
        }
    }
}

impl std::fmt::Debug for ModuleInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleInstance")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("type_name", &self.object.type_name())
            .finish()
    }
}

/// What a handler sees while processing one module.
///
/// Questions added here are held back until the handler finishes; they only
/// reach the shared sink if the whole handler succeeds.
pub struct ModuleContext {
    module_id: String,
    module_name: String,
    resolver: Resolver,
    solved: watch::Receiver<bool>,
    solve_timeout: Option<Duration>,
    questions: Mutex<Vec<QuestionRecord>>,
}

impl ModuleContext {
    pub fn new(instance: &ModuleInstance, solve_timeout: Option<Duration>) -> Self {
        Self {
            module_id: instance.id.clone(),
            module_name: instance.name.clone(),
            resolver: Resolver::new(instance.object.clone()),
            solved: instance.solved.clone(),
            solve_timeout,
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Slot lookup on the module's host object.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn is_solved(&self) -> bool {
        *self.solved.borrow()
    }

    /// Wait until the module reports itself solved.
    ///
    /// Returns immediately if it already is. Bounded by the configured solve
    /// timeout when there is one.
    pub async fn wait_for_solve(&self) -> ProcessResult<()> {
        let mut solved = self.solved.clone();
        let wait = async move { solved.wait_for(|s| *s).await.map(|_| ()) };

        let result = match self.solve_timeout {
            Some(duration) => tokio::time::timeout(duration, wait).await.map_err(|_| {
                ProcessError::SolveTimeout {
                    module: self.module_name.clone(),
                    duration,
                }
            })?,
            None => wait.await,
        };

        result.map_err(|_| ProcessError::SolveSignalClosed(self.module_name.clone()))?;
        tracing::debug!("Module '{}' solved", self.module_name);
        Ok(())
    }

    /// Queue a question about this module.
    pub fn add_question(
        &self,
        question: impl Into<String>,
        correct: Vec<String>,
        preferred_wrong: Vec<String>,
    ) {
        let record = QuestionRecord::new(
            self.module_id.clone(),
            self.module_name.clone(),
            question,
            correct,
        )
        .with_preferred_wrong(preferred_wrong);
        self.questions.lock().push(record);
    }

    /// Questions queued so far.
    pub fn question_count(&self) -> usize {
        self.questions.lock().len()
    }

    /// Take the queued questions, leaving none behind.
    pub fn take_questions(&self) -> Vec<QuestionRecord> {
        std::mem::take(&mut *self.questions.lock())
    }
}

impl std::fmt::Debug for ModuleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleContext")
            .field("module_id", &self.module_id)
            .field("module_name", &self.module_name)
            .field("solve_timeout", &self.solve_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use souvenir_core::DynamicObject;

    fn instance() -> (watch::Sender<bool>, ModuleInstance) {
        let (tx, rx) = watch::channel(false);
        let object: Arc<dyn HostObject> = Arc::new(DynamicObject::new("TestModule"));
        (tx, ModuleInstance::new("Test", "Test #1", object, rx))
    }

    #[tokio::test]
    async fn test_wait_for_solve() {
        let (tx, instance) = instance();
        let ctx = ModuleContext::new(&instance, None);
        assert!(!ctx.is_solved());

        let solver = async {
            tokio::task::yield_now().await;
            tx.send_replace(true);
        };
        let (result, ()) = tokio::join!(ctx.wait_for_solve(), solver);
        result.unwrap();
        assert!(ctx.is_solved());

        // Already solved: returns straight away.
        ctx.wait_for_solve().await.unwrap();
    }

    #[tokio::test]
    async fn test_solve_timeout() {
        let (_tx, instance) = instance();
        let ctx = ModuleContext::new(&instance, Some(Duration::from_millis(10)));

        let err = ctx.wait_for_solve().await.unwrap_err();
        assert!(matches!(err, ProcessError::SolveTimeout { .. }));
    }

    #[tokio::test]
    async fn test_signal_closed() {
        let (tx, instance) = instance();
        let ctx = ModuleContext::new(&instance, None);
        drop(tx);

        let err = ctx.wait_for_solve().await.unwrap_err();
        assert!(matches!(err, ProcessError::SolveSignalClosed(_)));
    }

    #[test]
    fn test_questions_are_queued() {
        let (_tx, instance) = instance();
        let ctx = ModuleContext::new(&instance, None);

        ctx.add_question("Which?", vec!["A".to_string()], vec!["B".to_string()]);
        assert_eq!(ctx.question_count(), 1);

        let questions = ctx.take_questions();
        assert_eq!(questions[0].module_name, "Test #1");
        assert_eq!(questions[0].preferred_wrong, vec!["B"]);
        assert_eq!(ctx.question_count(), 0);
    }
}
