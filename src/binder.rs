//! Composable binders and the two-phase evaluation protocol.
//!
//! A binder is one evaluation closure run in two modes. Inspection walks
//! the composition and collects spec entries in declaration order without
//! touching any run state; production reads each populated accumulator
//! out of the call's slot map exactly once. Both modes traverse the
//! composition in the same order.

use std::collections::HashMap;
use std::sync::Arc;

use crate::accum::Accumulate;
use crate::engine::{self, Strictness};
use crate::error::BindError;
use crate::spec::ArgSpec;

/// One declared leaf: the shared spec plus the factory for its per-call
/// accumulator.
#[derive(Clone)]
pub(crate) struct SpecEntry {
    pub(crate) spec: Arc<ArgSpec>,
    pub(crate) make_accumulator: Arc<dyn Fn() -> Box<dyn Accumulate> + Send + Sync>,
}

/// Accumulators of one bind call, keyed by spec id.
pub(crate) struct SlotMap {
    slots: HashMap<u64, Box<dyn Accumulate>>,
}

impl SlotMap {
    pub(crate) fn new(entries: &[SpecEntry]) -> SlotMap {
        SlotMap {
            slots: entries
                .iter()
                .map(|entry| (entry.spec.id(), (entry.make_accumulator)()))
                .collect(),
        }
    }

    pub(crate) fn slot(&mut self, id: u64) -> Option<&mut Box<dyn Accumulate>> {
        self.slots.get_mut(&id)
    }

    /// Takes the folded value of `spec`'s slot, if an occurrence filled it.
    ///
    /// A missing slot means the specification was never enumerated during
    /// inspection: a dependent grammar changed shape between inspection
    /// and production, which is a defect in the declaration, not in the
    /// input.
    fn take<T: 'static>(&mut self, spec: &ArgSpec) -> Option<T> {
        let Some(slot) = self.slots.get_mut(&spec.id()) else {
            panic!(
                "argument '{}' surfaced outside the inspected grammar; \
                 dependent grammars must declare the same specifications for every input",
                spec.display_name()
            );
        };
        slot.take().map(|boxed| match boxed.downcast::<T>() {
            Ok(value) => *value,
            Err(_) => panic!(
                "argument '{}' produced a value of an unexpected type",
                spec.display_name()
            ),
        })
    }
}

/// Evaluation mode for one traversal of a binder tree.
pub(crate) enum Pass<'a> {
    /// Collect entries in declaration order; leaves yield their defaults.
    Inspect(&'a mut Vec<SpecEntry>),
    /// Read each populated slot once; leaves yield bound or default values.
    Produce(&'a mut SlotMap),
}

type EvalFn<T> = Arc<dyn Fn(&mut Pass<'_>) -> T + Send + Sync>;

/// A composable argument binder producing a `T` from a bind call.
///
/// Binders are immutable and cheap to clone (clones share the same
/// specifications), and a single binder may serve any number of
/// concurrent [`bind`](Binder::bind) calls.
pub struct Binder<T> {
    eval: EvalFn<T>,
}

impl<T> Clone for Binder<T> {
    fn clone(&self) -> Binder<T> {
        Binder {
            eval: Arc::clone(&self.eval),
        }
    }
}

impl<T: 'static> Binder<T> {
    fn from_eval(eval: impl Fn(&mut Pass<'_>) -> T + Send + Sync + 'static) -> Binder<T> {
        Binder {
            eval: Arc::new(eval),
        }
    }

    pub(crate) fn leaf(entry: SpecEntry, default: T) -> Binder<T>
    where
        T: Clone + Send + Sync,
    {
        Binder::from_eval(move |pass| match pass {
            Pass::Inspect(entries) => {
                entries.push(entry.clone());
                default.clone()
            }
            Pass::Produce(slots) => slots
                .take::<T>(&entry.spec)
                .unwrap_or_else(|| default.clone()),
        })
    }

    /// A binder producing a fixed value, declaring nothing.
    pub fn constant(value: T) -> Binder<T>
    where
        T: Clone + Send + Sync,
    {
        Binder::from_eval(move |_| value.clone())
    }

    /// Transforms the bound value; the declared grammar is unchanged.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Binder<U> {
        Binder::from_eval(move |pass| f((self.eval)(pass)))
    }

    /// Dependent composition: the continuation's grammar is appended to
    /// this binder's.
    ///
    /// Inspection evaluates `f` with declared default values, so the
    /// continuation must return a grammar over the same specifications
    /// for every input; the idiomatic shape is declaring the inner binder
    /// once and returning a clone from the closure. A specification that
    /// first surfaces during production panics, naming the argument.
    pub fn and_then<U: 'static>(
        self,
        f: impl Fn(T) -> Binder<U> + Send + Sync + 'static,
    ) -> Binder<U> {
        Binder::from_eval(move |pass| {
            let value = (self.eval)(pass);
            let next = f(value);
            (next.eval)(pass)
        })
    }

    /// Independent composition: both grammars, both values, in order.
    pub fn zip<U: 'static>(self, other: Binder<U>) -> Binder<(T, U)> {
        Binder::from_eval(move |pass| {
            let left = (self.eval)(pass);
            let right = (other.eval)(pass);
            (left, right)
        })
    }

    /// The declared specifications in declaration order, without binding
    /// anything. Safe to call at any time, stable across calls.
    pub fn inspect(&self) -> Vec<Arc<ArgSpec>> {
        self.entries()
            .into_iter()
            .map(|entry| entry.spec)
            .collect()
    }

    pub(crate) fn entries(&self) -> Vec<SpecEntry> {
        let mut entries = Vec::new();
        let _ = (self.eval)(&mut Pass::Inspect(&mut entries));
        entries
    }

    pub(crate) fn produce(&self, slots: &mut SlotMap) -> T {
        (self.eval)(&mut Pass::Produce(slots))
    }

    /// Binds `tokens` against the declared grammar.
    pub fn bind<I, S>(
        &self,
        tokens: I,
        strictness: Strictness,
    ) -> Result<BindResult<T>, BindError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        engine::run(self, tokens.into_iter().map(Into::into).collect(), strictness)
    }

    /// Binds the process arguments, program name skipped.
    pub fn bind_env(&self, strictness: Strictness) -> Result<BindResult<T>, BindError> {
        self.bind(std::env::args().skip(1), strictness)
    }
}

/// Successful bind outcome: the typed value plus the unclaimed tail
/// tokens in their original relative order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindResult<T> {
    pub value: T,
    pub tail: Vec<String>,
}
