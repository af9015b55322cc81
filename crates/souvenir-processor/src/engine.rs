//! The processor: runs one handler per module and collects the results.
//!
//! All handlers run concurrently on the caller's task. A handler that fails
//! only abandons its own module; its queued questions are dropped and every
//! other module carries on.

use futures::future::join_all;
use std::sync::Arc;

use souvenir_core::ProcessorConfig;

use crate::context::{ModuleContext, ModuleInstance};
use crate::registry::HandlerRegistry;
use crate::sink::QuestionSink;

/// How processing ended for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler finished and its questions reached the sink.
    Completed { questions: usize },
    /// The handler failed; nothing was added for this module.
    Abandoned { reason: String },
    /// No handler is registered for the module id.
    Unsupported,
    /// The module id is disabled in the config.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutcome {
    pub module_id: String,
    pub module_name: String,
    pub outcome: Outcome,
}

/// Outcomes of a run, in module order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub outcomes: Vec<ModuleOutcome>,
}

impl ProcessReport {
    pub fn completed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Completed { .. }))
    }

    pub fn abandoned(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Abandoned { .. }))
    }

    /// Total questions added across all completed modules.
    pub fn questions(&self) -> usize {
        self.outcomes
            .iter()
            .map(|m| match m.outcome {
                Outcome::Completed { questions } => questions,
                _ => 0,
            })
            .sum()
    }

    /// Outcome for the module with this display name.
    pub fn get(&self, module_name: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|m| m.module_name == module_name)
            .map(|m| &m.outcome)
    }

    fn count(&self, f: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|m| f(&m.outcome)).count()
    }
}

/// Dispatches modules to their handlers.
pub struct Processor {
    registry: Arc<HandlerRegistry>,
    sink: Arc<QuestionSink>,
    config: ProcessorConfig,
}

impl Processor {
    pub fn new(registry: Arc<HandlerRegistry>, config: ProcessorConfig) -> Self {
        Self {
            registry,
            sink: Arc::new(QuestionSink::new()),
            config,
        }
    }

    /// Use an existing sink instead of a fresh one.
    pub fn with_sink(mut self, sink: Arc<QuestionSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn sink(&self) -> Arc<QuestionSink> {
        self.sink.clone()
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Process every module and wait for all of them to finish.
    pub async fn run(&self, modules: &[ModuleInstance]) -> ProcessReport {
        tracing::info!("Processing {} modules", modules.len());

        let outcomes = join_all(modules.iter().map(|m| self.process_module(m))).await;
        let report = ProcessReport { outcomes };

        tracing::info!(
            "Processing finished: {} completed, {} abandoned, {} questions",
            report.completed(),
            report.abandoned(),
            report.questions()
        );
        report
    }

    async fn process_module(&self, module: &ModuleInstance) -> ModuleOutcome {
        let outcome = self.outcome_for(module).await;
        ModuleOutcome {
            module_id: module.id.clone(),
            module_name: module.name.clone(),
            outcome,
        }
    }

    async fn outcome_for(&self, module: &ModuleInstance) -> Outcome {
        if !self.config.is_enabled(&module.id) {
            tracing::info!("Skipping disabled module '{}'", module.name);
            return Outcome::Disabled;
        }

        let Some(handler) = self.registry.get(&module.id) else {
            tracing::debug!("No handler for module '{}' ({})", module.name, module.id);
            return Outcome::Unsupported;
        };

        let ctx = ModuleContext::new(module, self.config.solve_timeout());
        match handler.process(&ctx).await {
            Ok(()) => {
                let questions = ctx.take_questions();
                let count = questions.len();
                self.sink.extend(questions);
                tracing::info!("Module '{}' produced {} questions", module.name, count);
                Outcome::Completed { questions: count }
            }
            Err(e) => {
                tracing::warn!("Abandoning module '{}': {}", module.name, e);
                Outcome::Abandoned {
                    reason: e.to_string(),
                }
            }
        }
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("registry", &self.registry)
            .field("sink", &self.sink)
            .field("config", &self.config)
            .finish()
    }
}
