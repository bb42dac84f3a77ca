//! Arithmetic and symbolic expressions.
//!
//! ```text
//!   binary     1+2         left operator right
//!   extended   1 + 2 * 3   left operator middle operator_two right
//!   idiom      10-2=8      left "from" middle "equals" right   (tight form only)
//!   prefix     √ 2         operator right
//! ```
//!
//! Operands are numbers, decimals, single Latin letters and Greek letters.

use super::cardinal::NumberNames;
use crate::error::Result;
use crate::fst::Fst;
use crate::grammar::{Classifier, GrammarContext, Verbalizer};
use crate::priority::{Priority, prioritized};

#[derive(Debug, Clone)]
pub struct Math {
    classify: Fst,
    verbalize: Fst,
}

impl Math {
    pub(crate) fn new(ctx: &GrammarContext, numbers: &NumberNames) -> Result<Self> {
        let point = ctx.word("point")?;
        let decimal = &numbers.names + Fst::cross(".", &format!(" {point} ")) + &numbers.spelled;
        let letter = ctx.alphabet().class(|c| c.is_ascii_alphabetic());
        let operand = (&numbers.names | decimal | letter | ctx.table("greek")?).optimize();

        let operations = ctx.table("math_operations")?;
        let idioms = ctx.table("math_idioms")?;
        let equals = Fst::accept("=").compose(&operations);
        let gap = ctx.delete_space() + Fst::insert(" ");

        let left = ctx.field("left", &operand);
        let middle = ctx.field("middle", &operand);
        let right = ctx.field("right", &operand);
        let operator = ctx.field("operator", &operations);
        let operator_two = ctx.field("operator_two", &operations);

        let binary = &left + &gap + &operator + &gap + &right;
        let extended = &left + &gap + &operator + &gap + &middle + &gap + &operator_two + &gap + &right;
        let space = Fst::insert(" ");
        let tight_idiom = &left
            + &space
            + ctx.field("operator", &idioms)
            + &space
            + &middle
            + &space
            + ctx.field("operator_two", &equals)
            + &space
            + &right;
        let root = ctx.word("square_root")?;
        let prefix = ctx.field("operator", &Fst::cross("√", &root)) + &gap + &right;

        let classify = prioritized(&[
            (Priority::Generic, binary),
            (Priority::Generic, extended),
            (Priority::SpecialIdiom, tight_idiom),
            (Priority::Generic, prefix),
        ]);

        let space = Fst::accept(" ");
        let verbalize = ((ctx.read_field("left") + &space).optional()
            + ctx.read_field("operator")
            + &space
            + (ctx.read_field("middle") + &space + ctx.read_field("operator_two") + &space).optional()
            + ctx.read_field("right"))
        .optimize();

        Ok(Math { classify, verbalize })
    }
}

impl Classifier for Math {
    fn category(&self) -> &'static str {
        "math"
    }

    fn priority(&self) -> Priority {
        Priority::Generic
    }

    fn classify(&self) -> &Fst {
        &self.classify
    }
}

impl Verbalizer for Math {
    fn category(&self) -> &'static str {
        "math"
    }

    fn verbalize(&self) -> &Fst {
        &self.verbalize
    }

    fn field_order(&self) -> &[&'static str] {
        &["left", "operator", "middle", "operator_two", "right"]
    }
}
