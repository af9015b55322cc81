//! Countdown: counts down from a starting number, one tick per press.
//!
//! Slots read:
//! - `_start: int`, the number shown at the beginning (1–99)
//! - `_ticks: int[]`, every number shown so far, strictly decreasing

use async_trait::async_trait;

use souvenir_access::Lookup;

use crate::context::ModuleContext;
use crate::error::ProcessResult;
use crate::handler::ModuleHandler;

#[derive(Debug, Clone, Copy, Default)]
pub struct Countdown;

#[async_trait]
impl ModuleHandler for Countdown {
    fn module_id(&self) -> &'static str {
        "Countdown"
    }

    async fn process(&self, ctx: &ModuleContext) -> ProcessResult<()> {
        let resolver = ctx.resolver();
        let start = resolver.int("_start", Lookup::Private)?;
        let ticks = resolver.list::<i64>("_ticks", Lookup::Private)?;

        let start = start.get(Some(1), Some(99))?;

        ctx.wait_for_solve().await?;

        let decreasing = |ticks: &Vec<i64>| {
            if ticks.is_empty() {
                Some("expected at least one tick".to_string())
            } else if !ticks.windows(2).all(|w| w[0] > w[1]) {
                Some("expected strictly decreasing ticks".to_string())
            } else {
                None
            }
        };
        let ticks = ticks.get_whole(Some(&decreasing))?;

        let mut wrong: Vec<String> = ticks
            .iter()
            .filter(|&&t| t != start)
            .map(|t| t.to_string())
            .collect();
        wrong.truncate(5);

        ctx.add_question(
            format!(
                "What number did {} start counting down from?",
                ctx.module_name()
            ),
            vec![start.to_string()],
            wrong,
        );
        ctx.add_question(
            format!("How many numbers did {} show?", ctx.module_name()),
            vec![ticks.len().to_string()],
            Vec::new(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ModuleInstance;
    use crate::error::ProcessError;
    use serde_json::json;
    use souvenir_access::AccessError;
    use souvenir_core::{DynamicObject, HostObject, SlotDecl, SlotType};
    use std::sync::Arc;
    use tokio::sync::watch;

    fn countdown(start: i64, ticks: serde_json::Value) -> (watch::Sender<bool>, ModuleInstance) {
        let obj = DynamicObject::new("CountdownModule")
            .with_slot(SlotDecl::new("_start", SlotType::Int).private(), start)
            .with_slot(
                SlotDecl::new("_ticks", SlotType::sequence_of(SlotType::Int)).private(),
                ticks,
            );
        let (tx, rx) = watch::channel(true);
        let target: Arc<dyn HostObject> = Arc::new(obj);
        (tx, ModuleInstance::new("Countdown", "Countdown #2", target, rx))
    }

    #[tokio::test]
    async fn test_questions() {
        let (_tx, instance) = countdown(7, json!([7, 6, 5, 4]));
        let ctx = ModuleContext::new(&instance, None);
        Countdown.process(&ctx).await.unwrap();

        let questions = ctx.take_questions();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct, vec!["7"]);
        assert_eq!(questions[0].preferred_wrong, vec!["6", "5", "4"]);
        assert_eq!(questions[1].question, "How many numbers did Countdown #2 show?");
        assert_eq!(questions[1].correct, vec!["4"]);
    }

    #[tokio::test]
    async fn test_start_out_of_range() {
        let (_tx, instance) = countdown(120, json!([120]));
        let ctx = ModuleContext::new(&instance, None);

        let err = Countdown.process(&ctx).await.unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"Slot CountdownModule._start with value \"120\" did not pass validity check: expected 1–99"
        );
    }

    #[tokio::test]
    async fn test_ticks_checked_as_a_whole() {
        let (_tx, instance) = countdown(5, json!([5, 6]));
        let ctx = ModuleContext::new(&instance, None);
        let err = Countdown.process(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Access(AccessError::ValidationFailed { .. })
        ));

        let (_tx, instance) = countdown(5, json!([5, null]));
        let ctx = ModuleContext::new(&instance, None);
        let err = Countdown.process(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Access(AccessError::NullElement { index: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_solve_timeout() {
        let (tx, instance) = countdown(5, json!([5]));
        tx.send_replace(false);
        let ctx = ModuleContext::new(&instance, Some(std::time::Duration::from_millis(5)));

        let err = Countdown.process(&ctx).await.unwrap_err();
        assert!(matches!(err, ProcessError::SolveTimeout { .. }));
    }
}
