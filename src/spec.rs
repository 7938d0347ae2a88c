//! Argument specifications, the immutable descriptors a grammar is made of.
//!
//! A specification records what a token must look like to match (kind and
//! names) and the declaration-time properties the engine consults while
//! binding. It never holds run state; accumulators do.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::names::Names;

static NEXT_SPEC_ID: AtomicU64 = AtomicU64::new(1);

/// What shape of token a specification matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    /// Boolean argument, present or absent, optionally signed or negated
    Flag,
    /// Named argument taking one value per occurrence
    Option,
    /// Positional argument matched by declaration order
    Operand,
    /// Token expanding into further tokens
    Macro,
    /// Option that additionally matches negative-number tokens
    IntegerOption,
}

/// Immutable descriptor of one declared argument.
///
/// Built once by the declaration surface and shared behind an `Arc` from
/// then on; the `with_*` builders consume the receiver. Each spec carries a
/// process-unique id that the binding engine keys its per-call slots by.
#[derive(Debug)]
pub struct ArgSpec {
    id: u64,
    kind: SpecKind,
    names: Names,
    value_optional: bool,
    negatable: bool,
    description: Option<String>,
}

impl ArgSpec {
    pub(crate) fn new(kind: SpecKind, names: Names) -> ArgSpec {
        ArgSpec {
            id: NEXT_SPEC_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            names,
            value_optional: false,
            negatable: false,
            description: None,
        }
    }

    pub(crate) fn with_value_optional(mut self) -> ArgSpec {
        self.value_optional = true;
        self
    }

    pub(crate) fn with_negatable(mut self) -> ArgSpec {
        self.negatable = true;
        self
    }

    pub(crate) fn with_description(mut self, text: &str) -> ArgSpec {
        self.description = Some(text.to_string());
        self
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> SpecKind {
        self.kind
    }

    pub fn names(&self) -> &Names {
        &self.names
    }

    /// Whether an occurrence without an attached value is valid for this
    /// specification (it then folds its declared fallback).
    pub fn value_optional(&self) -> bool {
        self.value_optional
    }

    /// Whether the `--no-name` form is recognized for this flag.
    pub fn negatable(&self) -> bool {
        self.negatable
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The name used in diagnostics: dashed for flags and options, the
    /// bare label for operands and macros.
    pub fn display_name(&self) -> String {
        match self.kind {
            SpecKind::Operand | SpecKind::Macro => self.names.label(),
            _ => self.names.primary(),
        }
    }
}
