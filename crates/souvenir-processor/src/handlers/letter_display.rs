//! Letter Display: shows one letter per stage; the display blanks on solve.
//!
//! Slots read:
//! - `_letters: string[]`, exactly one letter per stage
//! - `_stage: int`, current stage index
//! - `_display: string`, the letter currently shown, null once solved

use async_trait::async_trait;

use souvenir_access::{Lookup, Shape};

use crate::context::ModuleContext;
use crate::error::{ProcessError, ProcessResult};
use crate::handler::ModuleHandler;
use crate::handlers::ordinal;

const STAGES: usize = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct LetterDisplay;

#[async_trait]
impl ModuleHandler for LetterDisplay {
    fn module_id(&self) -> &'static str {
        "LetterDisplay"
    }

    async fn process(&self, ctx: &ModuleContext) -> ProcessResult<()> {
        let resolver = ctx.resolver();
        let letters = resolver.list::<String>("_letters", Lookup::Private)?;
        let stage = resolver.int("_stage", Lookup::Private)?;
        let display = resolver.field::<String>("_display", Lookup::Private)?;

        let single_letter = |value: &String| {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => None,
                _ => Some("expected a single letter A–Z".to_string()),
            }
        };

        // The letters are fixed at generation time; read them before the
        // module gets a chance to clear anything.
        let letters = letters.get(Shape::exact(STAGES), Some(&single_letter))?;

        ctx.wait_for_solve().await?;

        let last_stage = stage.get(Some(0), Some(STAGES as i64 - 1))?;
        if last_stage != STAGES as i64 - 1 {
            return Err(ProcessError::Unusable {
                module: ctx.module_name().to_string(),
                message: format!("solved at stage {}", last_stage),
            });
        }

        if let Some(shown) = display.get_nullable(Some(&single_letter))? {
            tracing::debug!("{} still shows '{}' after solve", ctx.module_name(), shown);
        }

        for (i, letter) in letters.iter().enumerate() {
            let others: Vec<String> = letters.iter().filter(|l| *l != letter).cloned().collect();
            ctx.add_question(
                format!(
                    "What was the {} letter shown on {}?",
                    ordinal(i + 1),
                    ctx.module_name()
                ),
                vec![letter.clone()],
                others,
            );
        }
        Ok(())
    }
}
