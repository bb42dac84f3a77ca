//! Category grammars and their registry.
//!
//! [`build`] constructs every category from one [`GrammarContext`]. The
//! classifier list is in declaration order, which is also the tie-break
//! order for paths of exactly equal weight:
//!
//! ```text
//!   whitelist, date, time, money, telephone, decimal, fraction, scientific,
//!   power, ordinal, math, measure, cardinal, serial, word (fallback)
//! ```
//!
//! Within one priority level, each later category pays a small extra cost
//! (see [`DECLARATION_STEP`](crate::priority::DECLARATION_STEP)).
//!
//! Punctuation is kept apart because the tokenizer, not the category union,
//! places it.

#[path = "rules/cardinal.rs"]
mod cardinal;
#[path = "rules/date.rs"]
mod date;
#[path = "rules/decimal.rs"]
mod decimal;
#[path = "rules/fraction.rs"]
mod fraction;
#[path = "rules/math.rs"]
mod math;
#[path = "rules/measure.rs"]
mod measure;
#[path = "rules/money.rs"]
mod money;
#[path = "rules/ordinal.rs"]
mod ordinal;
#[path = "rules/power.rs"]
mod power;
#[path = "rules/punctuation.rs"]
mod punctuation;
#[path = "rules/scientific.rs"]
mod scientific;
#[path = "rules/serial.rs"]
mod serial;
#[path = "rules/telephone.rs"]
mod telephone;
#[path = "rules/time.rs"]
mod time;
#[path = "rules/whitelist.rs"]
mod whitelist;
#[path = "rules/word.rs"]
mod word;

#[cfg(test)]
#[path = "rules/tests.rs"]
mod tests;

pub use cardinal::Cardinal;
pub use date::Date;
pub use decimal::Decimal;
pub use fraction::Fraction;
pub use math::Math;
pub use measure::Measure;
pub use money::Money;
pub use ordinal::Ordinal;
pub use power::Power;
pub use punctuation::{Punctuation, SPACE_AFTER, SPACE_BEFORE, spaced_between};
pub use scientific::Scientific;
pub use serial::Serial;
pub use telephone::Telephone;
pub use time::Time;
pub use whitelist::Whitelist;
pub use word::Word;

use crate::error::Result;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use cardinal::NumberNames;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Every grammar of one configuration.
pub struct Grammars {
    /// Ranked categories in declaration order, fallback last.
    pub classifiers: Vec<Arc<dyn Classifier>>,
    /// One verbalizer per category, punctuation included.
    pub verbalizers: Vec<Arc<dyn Verbalizer>>,
    pub punctuation: Arc<Punctuation>,
    /// Construction time per category, in declaration order.
    pub timings: Vec<(&'static str, Duration)>,
}

/// Builds one grammar that both classifies and verbalizes, and registers it.
fn register<G>(grammars: &mut Grammars, build: impl FnOnce() -> Result<G>) -> Result<()>
where
    G: Classifier + Verbalizer + 'static,
{
    let started = Instant::now();
    let grammar = Arc::new(build()?);
    let name = Classifier::category(&*grammar);
    let elapsed = started.elapsed();
    tracing::debug!(
        category = name,
        states = grammar.classify().num_states(),
        arcs = grammar.classify().num_arcs(),
        ?elapsed,
        "built category grammar"
    );
    grammars.timings.push((name, elapsed));
    grammars.classifiers.push(grammar.clone());
    grammars.verbalizers.push(grammar);
    Ok(())
}

pub fn build(ctx: &GrammarContext) -> Result<Grammars> {
    let punctuation = Arc::new(Punctuation::new(ctx));
    let mut grammars = Grammars {
        classifiers: Vec::new(),
        verbalizers: vec![punctuation.clone()],
        punctuation,
        timings: Vec::new(),
    };

    let started = Instant::now();
    let numbers = NumberNames::new(ctx)?;
    grammars.timings.push(("number_names", started.elapsed()));

    register(&mut grammars, || Whitelist::new(ctx))?;
    register(&mut grammars, || Date::new(ctx, &numbers))?;
    register(&mut grammars, || Time::new(ctx, &numbers))?;
    register(&mut grammars, || Money::new(ctx, &numbers))?;
    register(&mut grammars, || Telephone::new(ctx, &numbers))?;
    register(&mut grammars, || Decimal::new(ctx, &numbers))?;
    register(&mut grammars, || Fraction::new(ctx, &numbers))?;
    register(&mut grammars, || Scientific::new(ctx, &numbers))?;
    register(&mut grammars, || Power::new(ctx, &numbers))?;
    register(&mut grammars, || Ordinal::new(ctx, &numbers))?;
    register(&mut grammars, || Math::new(ctx, &numbers))?;
    register(&mut grammars, || Measure::new(ctx, &numbers))?;
    register(&mut grammars, || Cardinal::new(ctx, &numbers))?;
    register(&mut grammars, || Ok(Serial::new(ctx, &numbers)))?;
    register(&mut grammars, || Ok(Word::new(ctx)))?;

    Ok(grammars)
}
