//! Shared question sink.
//!
//! Every push broadcasts the new question count, so observers never miss
//! a question being added.

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::question::QuestionRecord;

/// Collects the questions produced by all module handlers.
///
/// Uses `parking_lot::RwLock` for storage and `tokio::sync::watch` to
/// broadcast the count after each mutation.
pub struct QuestionSink {
    inner: RwLock<Vec<QuestionRecord>>,
    tx: watch::Sender<usize>,
}

impl QuestionSink {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            inner: RwLock::new(Vec::new()),
            tx,
        }
    }

    /// Add a question and broadcast the new count.
    pub fn push(&self, question: QuestionRecord) {
        let len = {
            let mut inner = self.inner.write();
            tracing::debug!(
                "Added question for {} ({})",
                question.module_name,
                question.module_id
            );
            inner.push(question);
            inner.len()
        };
        self.tx.send_replace(len);
    }

    /// Add several questions with a single broadcast.
    pub fn extend(&self, questions: Vec<QuestionRecord>) {
        if questions.is_empty() {
            return;
        }
        let len = {
            let mut inner = self.inner.write();
            inner.extend(questions);
            tracing::debug!("Question sink now holds {}", inner.len());
            inner.len()
        };
        self.tx.send_replace(len);
    }

    /// Remove and return every question. Broadcasts zero.
    pub fn drain(&self) -> Vec<QuestionRecord> {
        let old = {
            let mut inner = self.inner.write();
            std::mem::take(&mut *inner)
        };
        self.tx.send_replace(0);
        old
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// A copy of the current questions.
    pub fn snapshot(&self) -> Vec<QuestionRecord> {
        self.inner.read().clone()
    }

    /// Subscribe to count changes.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.tx.subscribe()
    }
}

impl Default for QuestionSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QuestionSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionSink")
            .field("len", &self.len())
            .finish()
    }
}
