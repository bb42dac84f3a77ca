//! Context-dependent rewriting.
//!
//! - `cdrewrite.rs`: compiles one `τ / λ __ ρ` rule into a transducer that is
//!   the identity outside matches.
//! - `cascade.rs`: the ordered preprocessing rules applied to raw input.
//!
//! A compiled [`Rewrite`] is applied as one deterministic pass: the input
//! string is composed with the rule and the single best output is kept.

#[path = "rewrite/cascade.rs"]
mod cascade;
#[path = "rewrite/cdrewrite.rs"]
mod cdrewrite;

pub use cascade::RewriteCascade;
pub use cdrewrite::{Context, Rewrite, RewriteRule};
