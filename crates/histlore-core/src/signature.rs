use std::collections::BTreeMap;

use crate::canon::canonical_hash;
use crate::event::CommandEvent;
use crate::shape::{self, Shape};
use crate::snapshot::PatternSignature;

/// Build the canonical [`PatternSignature`] for an event.
///
/// Flags are sorted ordinally and option values are reduced to shapes, so
/// flag order and literal values never influence identity. Positional
/// argument shapes keep their original order: `cp a b` and `cp b a` only
/// collapse when the shapes happen to match, which is the intended
/// order-sensitive equivalence.
///
/// The returned signature carries `frequency == 0`; the aggregator owns all
/// occurrence bookkeeping.
pub fn build_signature(event: &CommandEvent) -> PatternSignature {
    let mut flags = event.flags.clone();
    flags.sort_unstable();

    let options: BTreeMap<String, Shape> = event
        .options
        .iter()
        .map(|(key, value)| (key.clone(), shape::classify(value)))
        .collect();

    let arg_shapes: Vec<Shape> = event
        .arguments
        .iter()
        .map(|arg| shape::classify(arg))
        .collect();

    let canonical = serde_json::json!({
        "command": event.command,
        "subcommand": event.subcommand,
        "flags": flags,
        "options": options,
        "argShapes": arg_shapes,
    });
    let signature = canonical_hash(&canonical);

    PatternSignature {
        signature,
        subcommand: event.subcommand.clone(),
        flags,
        options,
        arg_shapes,
        frequency: 0,
        representative_example: None,
        first_seen: None,
        last_seen: None,
    }
}
