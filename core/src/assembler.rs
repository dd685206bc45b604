//! Assembler — compiled instructions back to a concrete path
//!
//! Executes the instruction tree built by the compiler against merged
//! parameter values. Translated literals were resolved at compile time, so
//! this walk is pure string building plus the optional-group elision rule.

use std::collections::HashMap;

use crate::compiler::AsmOp;
use crate::{percent, RouteError};

/// Assemble a path from the instruction tree and merged parameter values.
///
/// `merged` is defaults overlaid with explicit values; `defaults` is kept
/// separately because elision compares against it.
pub(crate) fn assemble(
    ops: &[AsmOp],
    merged: &HashMap<String, String>,
    defaults: &HashMap<String, String>,
    has_child: bool,
) -> Result<String, RouteError> {
    build(ops, merged, defaults, false, has_child)
}

/// Build one instruction sequence.
///
/// An optional sequence returns the empty string to signal elision: a group
/// is emitted only when some parameter inside it carries a value different
/// from its default (or has no default at all), or when `has_child` forces
/// emission so a child route's path can be appended. A group containing no
/// parameters is always emitted.
fn build(
    ops: &[AsmOp],
    merged: &HashMap<String, String>,
    defaults: &HashMap<String, String>,
    is_optional: bool,
    has_child: bool,
) -> Result<String, RouteError> {
    let mut path = String::new();
    let mut skip = true;
    let mut skippable = false;

    for op in ops {
        match op {
            AsmOp::Literal(text) => path.push_str(text),
            AsmOp::Parameter(name) => {
                skippable = true;
                match merged.get(name) {
                    None => {
                        if !is_optional || has_child {
                            return Err(RouteError::MissingParameter { name: name.clone() });
                        }
                        return Ok(String::new());
                    }
                    Some(value) => {
                        if !is_optional || has_child || defaults.get(name) != Some(value) {
                            skip = false;
                        }
                        path.push_str(&percent::encode(value));
                    }
                }
            }
            AsmOp::Group(inner) => {
                skippable = true;
                let assembled = build(inner, merged, defaults, true, has_child)?;
                if !assembled.is_empty() {
                    path.push_str(&assembled);
                    skip = false;
                }
            }
        }
    }

    if is_optional && skippable && skip {
        return Ok(String::new());
    }

    Ok(path)
}
