//! Declaration surface: flags, options, operands, and macros.
//!
//! Each declaration type is a thin builder over an [`ArgSpec`]. A
//! finisher (`single`, `counted`, `list`, `nullable`, …) fixes the result
//! type and fold behavior and turns the declaration into a [`Binder`]
//! leaf. Every finisher carries a default, so an absent argument is never
//! an error; requiredness is the caller's policy.

use std::sync::Arc;

use crate::accum::{Accumulator, FoldFn, MacroAccumulator};
use crate::binder::{Binder, SpecEntry};
use crate::error::DeclarationError;
use crate::names::Names;
use crate::spec::{ArgSpec, SpecKind};
use crate::value::ParseValue;

type ParserFn<T> = Arc<dyn Fn(&str) -> Option<T> + Send + Sync>;

fn leaf<T>(spec: ArgSpec, default: T, fold: FoldFn<T>) -> Binder<T>
where
    T: Clone + Send + Sync + 'static,
{
    let entry = SpecEntry {
        spec: Arc::new(spec),
        make_accumulator: Arc::new(move || Box::new(Accumulator::new(Arc::clone(&fold)))),
    };
    Binder::leaf(entry, default)
}

fn sign_value(sign: Option<&str>) -> Option<bool> {
    match sign {
        None | Some("+") => Some(true),
        Some("-") => Some(false),
        Some(_) => None,
    }
}

/// Boolean argument declaration.
///
/// Matches `--name`, `-c`, cluster members, and the sign-suffixed forms
/// (`--name+`, `-c-`); a [`negatable`](Flag::negatable) flag additionally
/// matches `--no-name`.
pub struct Flag {
    spec: ArgSpec,
}

impl Flag {
    /// Declares a flag from up to three name candidates (see
    /// [`Names::guess`]).
    pub fn new(names: &[&str]) -> Result<Flag, DeclarationError> {
        Ok(Flag {
            spec: ArgSpec::new(SpecKind::Flag, Names::guess(names)?),
        })
    }

    /// Recognize the `--no-name` form for this flag.
    pub fn negatable(self) -> Flag {
        Flag {
            spec: self.spec.with_negatable(),
        }
    }

    pub fn describe(self, text: &str) -> Flag {
        Flag {
            spec: self.spec.with_description(text),
        }
    }

    /// Present yields `true` (or the sign's value), absent yields
    /// `false`; the last occurrence wins.
    pub fn single(self) -> Binder<bool> {
        self.finish(false, |_, sign| sign_value(sign))
    }

    /// Occurrence count: plain and `+` occurrences increment, `-`
    /// decrements, saturating at zero. Absent yields zero.
    pub fn counted(self) -> Binder<u32> {
        self.finish(0, |count, sign| {
            let count = count.unwrap_or(0);
            match sign {
                None | Some("+") => Some(count + 1),
                Some("-") => Some(count.saturating_sub(1)),
                Some(_) => None,
            }
        })
    }

    /// One boolean per occurrence, in occurrence order.
    pub fn list(self) -> Binder<Vec<bool>> {
        self.finish(Vec::new(), |values, sign| {
            let mut values = values.unwrap_or_default();
            values.push(sign_value(sign)?);
            Some(values)
        })
    }

    fn finish<T>(
        self,
        default: T,
        fold: impl Fn(Option<T>, Option<&str>) -> Option<T> + Send + Sync + 'static,
    ) -> Binder<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        leaf(self.spec, default, Arc::new(fold))
    }
}

/// Named value-taking argument declaration.
///
/// An occurrence binds exactly one value: attached (`--name=v`, `-cv`) or
/// the following token (`--name v`, `-c v`). A
/// [`value_optional`](Opt::value_optional) declaration never takes the
/// following token; a bare occurrence folds its declared fallback
/// instead.
pub struct Opt<T> {
    spec: ArgSpec,
    parser: ParserFn<T>,
    fallback: Option<T>,
}

impl<T> Opt<T>
where
    T: ParseValue + Clone + Send + Sync + 'static,
{
    /// Declares an option from up to three name candidates (see
    /// [`Names::guess`]).
    pub fn new(names: &[&str]) -> Result<Opt<T>, DeclarationError> {
        Ok(Opt {
            spec: ArgSpec::new(SpecKind::Option, Names::guess(names)?),
            parser: Arc::new(T::parse_value),
            fallback: None,
        })
    }

    /// Replaces the `ParseValue` parser for this declaration.
    pub fn parse_with(
        self,
        parser: impl Fn(&str) -> Option<T> + Send + Sync + 'static,
    ) -> Opt<T> {
        Opt {
            parser: Arc::new(parser),
            ..self
        }
    }

    /// Allow occurrences without a value; each folds `fallback`.
    pub fn value_optional(self, fallback: T) -> Opt<T> {
        Opt {
            spec: self.spec.with_value_optional(),
            parser: self.parser,
            fallback: Some(fallback),
        }
    }

    pub fn describe(self, text: &str) -> Opt<T> {
        let Opt {
            spec,
            parser,
            fallback,
        } = self;
        Opt {
            spec: spec.with_description(text),
            parser,
            fallback,
        }
    }

    /// Absent yields `None`; the last occurrence wins.
    pub fn nullable(self) -> Binder<Option<T>> {
        let Opt {
            spec,
            parser,
            fallback,
        } = self;
        leaf(
            spec,
            None,
            Arc::new(move |_, input| occurrence(&parser, &fallback, input).map(Some)),
        )
    }

    /// Absent yields `value`; the last occurrence wins.
    pub fn default_value(self, value: T) -> Binder<T> {
        let Opt {
            spec,
            parser,
            fallback,
        } = self;
        leaf(
            spec,
            value,
            Arc::new(move |_, input| occurrence(&parser, &fallback, input)),
        )
    }

    /// One parsed value per occurrence, in occurrence order.
    pub fn list(self) -> Binder<Vec<T>> {
        let Opt {
            spec,
            parser,
            fallback,
        } = self;
        leaf(
            spec,
            Vec::new(),
            Arc::new(move |values, input| {
                let mut values = values.unwrap_or_default();
                values.push(occurrence(&parser, &fallback, input)?);
                Some(values)
            }),
        )
    }
}

impl Opt<i64> {
    /// Declares an integer option. Besides the ordinary option forms it
    /// matches negative-number tokens (`-123`), binding their digits.
    pub fn integer(names: &[&str]) -> Result<Opt<i64>, DeclarationError> {
        Ok(Opt {
            spec: ArgSpec::new(SpecKind::IntegerOption, Names::guess(names)?),
            parser: Arc::new(i64::parse_value),
            fallback: None,
        })
    }
}

fn occurrence<T: Clone>(
    parser: &ParserFn<T>,
    fallback: &Option<T>,
    input: Option<&str>,
) -> Option<T> {
    match input {
        Some(text) => parser(text),
        None => fallback.clone(),
    }
}

/// Positional argument declaration. Matched by declaration order, one
/// bare token each.
pub struct Operand<T> {
    spec: ArgSpec,
    parser: ParserFn<T>,
}

impl<T> Operand<T>
where
    T: ParseValue + Clone + Send + Sync + 'static,
{
    /// Declares an operand; `label` names it in diagnostics.
    pub fn new(label: &str) -> Result<Operand<T>, DeclarationError> {
        Ok(Operand {
            spec: ArgSpec::new(SpecKind::Operand, Names::guess(&[label])?),
            parser: Arc::new(T::parse_value),
        })
    }

    /// Replaces the `ParseValue` parser for this declaration.
    pub fn parse_with(
        self,
        parser: impl Fn(&str) -> Option<T> + Send + Sync + 'static,
    ) -> Operand<T> {
        Operand {
            spec: self.spec,
            parser: Arc::new(parser),
        }
    }

    pub fn describe(self, text: &str) -> Operand<T> {
        Operand {
            spec: self.spec.with_description(text),
            parser: self.parser,
        }
    }

    /// Unmatched yields `None`.
    pub fn nullable(self) -> Binder<Option<T>> {
        let Operand { spec, parser } = self;
        leaf(
            spec,
            None,
            Arc::new(move |_, input| input.and_then(|text| parser(text)).map(Some)),
        )
    }

    /// Unmatched yields `value`.
    pub fn default_value(self, value: T) -> Binder<T> {
        let Operand { spec, parser } = self;
        leaf(
            spec,
            value,
            Arc::new(move |_, input| input.and_then(|text| parser(text))),
        )
    }
}

/// How a macro token expands into replacement tokens.
///
/// Implemented for free by `Fn(&str) -> Vec<String>` closures; `name` is
/// the token text after the `@`.
pub trait ExpandMacro: Send + Sync {
    fn expand(&self, name: &str) -> Vec<String>;
}

impl<F> ExpandMacro for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn expand(&self, name: &str) -> Vec<String> {
        self(name)
    }
}

/// One recorded macro occurrence: the invoked name and the tokens it
/// expanded into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroCall {
    pub name: String,
    pub tokens: Vec<String>,
}

/// Macro declaration.
///
/// Any `@name` token is handled by the first declared macro: its
/// expansion tokens are spliced into the stream for ordinary processing
/// and the call is recorded. `label` names the declaration in
/// diagnostics; it does not participate in matching.
pub struct Macro {
    spec: ArgSpec,
    expand: Arc<dyn ExpandMacro>,
}

impl Macro {
    pub fn new(
        label: &str,
        expand: impl ExpandMacro + 'static,
    ) -> Result<Macro, DeclarationError> {
        Ok(Macro {
            spec: ArgSpec::new(SpecKind::Macro, Names::guess(&[label])?),
            expand: Arc::new(expand),
        })
    }

    pub fn describe(self, text: &str) -> Macro {
        Macro {
            spec: self.spec.with_description(text),
            expand: self.expand,
        }
    }

    /// The recorded calls, in occurrence order. Absent yields an empty
    /// list.
    pub fn calls(self) -> Binder<Vec<MacroCall>> {
        let Macro { spec, expand } = self;
        let entry = SpecEntry {
            spec: Arc::new(spec),
            make_accumulator: Arc::new(move || {
                Box::new(MacroAccumulator::new(Arc::clone(&expand)))
            }),
        };
        Binder::leaf(entry, Vec::new())
    }
}
