//! Deferred effects: modifiers stored now and applied at a later hook.
//!
//! The game loop calls four hooks, each of which consumes what it applies:
//!
//! | Hook | Consumes |
//! |------|----------|
//! | `on_timer_starting` | time bonus and penalty |
//! | `on_question_starting` | skip flag, else answer delegate |
//! | `on_question_type_selecting` | forced question type |
//! | `on_damage_calculating` | damage multiplier |

mod cache;

pub use cache::{DeferredStateCache, DeferredSummary, QuestionStart, QuestionType};
