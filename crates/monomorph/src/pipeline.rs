//! The generation pipeline: scan, evaluate, substitute, accumulate.
//!
//! One pass over the annotated source produces one output buffer per
//! variant. No state survives the call, and directives never see each
//! other's results — each one is an independent exchange with the
//! evaluator.

use crate::config::VariantConfig;
use crate::error::{Error, Result};
use crate::evaluate::Evaluator;
use crate::scan::{DirectiveKind, Scanner, Segment};
use crate::substitute::LiteralMap;

/// Renders every variant of one annotated unit.
///
/// Returns one output line buffer per config, in config order. Per
/// variant:
///
/// - Plain lines pass through the variant's [`LiteralMap`].
/// - `template_all` directives extend the map; the marker line is kept
///   verbatim (no substitution) when the variant retains directives.
/// - Inline directives trigger one batched evaluator call. The marker line
///   is kept when retained, the replace window is dropped, and the rendered
///   block is spliced in with the directive's indentation reapplied to
///   every non-empty rendered line. Empty rendered lines are skipped, which
///   is how a conditional expression contributes nothing for some kinds.
///   Rendered lines are literal-substituted; retained markers are not.
pub fn render_unit(
    lines: &[String],
    configs: &[VariantConfig],
    evaluator: &dyn Evaluator,
) -> Result<Vec<Vec<String>>> {
    let mut outputs: Vec<Vec<String>> = vec![Vec::new(); configs.len()];
    let mut maps: Vec<LiteralMap> = vec![LiteralMap::new(); configs.len()];

    for segment in Scanner::new(lines) {
        match segment? {
            Segment::Plain { text, .. } => {
                for (out, map) in outputs.iter_mut().zip(&maps) {
                    out.push(map.apply(text));
                }
            }
            Segment::Directive {
                line,
                raw,
                indent,
                kind,
            } => match kind {
                DirectiveKind::LiteralMap { literals } => {
                    for (i, config) in configs.iter().enumerate() {
                        maps[i].register(&literals, &config.example_values);
                        if config.retain_directives {
                            outputs[i].push(raw.to_string());
                        }
                    }
                }
                DirectiveKind::Inline { expr, .. } => {
                    let blocks = evaluator
                        .evaluate(expr, configs)
                        .map_err(|message| Error::Evaluation { line, message })?;
                    if blocks.len() != configs.len() {
                        return Err(Error::Evaluation {
                            line,
                            message: format!(
                                "evaluator returned {} block(s) for {} variant(s)",
                                blocks.len(),
                                configs.len()
                            ),
                        });
                    }
                    for (i, config) in configs.iter().enumerate() {
                        if config.retain_directives {
                            outputs[i].push(raw.to_string());
                        }
                        for rendered in blocks[i].split('\n').filter(|l| !l.is_empty()) {
                            outputs[i].push(maps[i].apply(&format!("{}{}", indent, rendered)));
                        }
                    }
                }
            },
        }
    }
    Ok(outputs)
}

/// Regenerates the unit with the reference kind's identity configuration
/// and asserts the output reproduces the input line for line.
///
/// A divergence means the annotated source and its directives disagree — a
/// bug in the input or the engine, never a property of any target variant —
/// so it must run before any variant file is emitted and block all
/// emission on failure.
pub fn validate_round_trip(
    lines: &[String],
    reference: &VariantConfig,
    evaluator: &dyn Evaluator,
) -> Result<()> {
    let identity = reference.identity();
    let outputs = render_unit(lines, std::slice::from_ref(&identity), evaluator)?;
    let regenerated = &outputs[0];
    for (i, (original, regen)) in lines.iter().zip(regenerated.iter()).enumerate() {
        if original != regen {
            return Err(Error::RoundTrip { line: i + 1 });
        }
    }
    if regenerated.len() != lines.len() {
        return Err(Error::RoundTrip {
            line: lines.len().min(regenerated.len()) + 1,
        });
    }
    Ok(())
}
