//! # Monomorph — type-specializing source generation
//!
//! Some target languages cannot express a data structure generically over
//! primitive and boxed value kinds without boxing overhead. The usual
//! workaround is to hand-maintain one copy of the source per kind — and the
//! usual failure mode is that the copies drift. Monomorph keeps one
//! canonical, independently compilable implementation written against a
//! reference kind (say, `int`), annotated with inline directives, and
//! regenerates every other kind's copy from it.
//!
//! ## Directive grammar
//!
//! Three forms, recognized at the start of a line after optional
//! whitespace:
//!
//! ```text
//! /* template! <expr> */          replaces the 1 following line
//! /* template(<N>)! <expr> */     replaces the N following lines (N may be 0)
//! /* template_all! [...] */       registers canonical example literals
//! ```
//!
//! Expressions are MiniJinja templates rendered once per variant against
//! that variant's attributes, with `equals`/`cast_unsafe` helpers that
//! switch between object-kind and value-kind spellings. Canonical literals
//! registered by `template_all` are substituted by each variant's own
//! example values on every output line, document-wide.
//!
//! ## Round-trip oracle
//!
//! The generator proves itself lossless before emitting anything: rendering
//! the source with its own reference kind (directive markers retained,
//! substitution a no-op) must reproduce the input byte for byte. Any
//! divergence aborts the run — a broken directive that happens to produce
//! plausible code for real variants would otherwise silently corrupt the
//! reference source's regenerability.
//!
//! ## Quick start
//!
//! ```rust
//! use monomorph::{render_unit, validate_round_trip, JinjaEvaluator, VariantConfig};
//!
//! let source: Vec<String> = r#"/* template_all! [5] */
//! /* template! {{ type }} value = 5; */
//! int value = 5;"#
//!     .lines()
//!     .map(String::from)
//!     .collect();
//!
//! let reference = VariantConfig::new("int", "Int");
//! let long = VariantConfig::new("long", "Long").with_example_values(["5L"]);
//!
//! let evaluator = JinjaEvaluator::new();
//! validate_round_trip(&source, &reference, &evaluator).unwrap();
//!
//! let outputs = render_unit(&source, &[long], &evaluator).unwrap();
//! assert_eq!(outputs[0], ["long value = 5L;"]);
//! ```
//!
//! Every error is fatal to the whole run: a partially wrong variant
//! committed as source is worse than no output at all. See [`Error`] for
//! the taxonomy.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod pipeline;
pub mod scan;
pub mod substitute;

pub use config::VariantConfig;
pub use error::{Error, Result};
pub use evaluate::{register_helpers, Evaluator, JinjaEvaluator, StaticEvaluator};
pub use pipeline::{render_unit, validate_round_trip};
pub use scan::{DirectiveKind, Scanner, Segment};
pub use substitute::LiteralMap;
