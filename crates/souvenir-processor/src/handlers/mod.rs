//! Built-in module handlers.

mod countdown;
mod letter_display;

pub use countdown::Countdown;
pub use letter_display::LetterDisplay;

use std::sync::Arc;

use crate::handler::ModuleHandler;

/// Every handler shipped with the processor.
pub fn builtin() -> Vec<Arc<dyn ModuleHandler>> {
    vec![Arc::new(LetterDisplay), Arc::new(Countdown)]
}

/// English ordinal for a 1-based position.
pub(crate) fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}
