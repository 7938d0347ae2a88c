//! Declarative command-line argument binding.
//!
//! A grammar is declared once from composable pieces and bound any number
//! of times against raw token sequences:
//!
//! ```text
//! Tokens → Classify → Resolve → Accumulate → Produce → (value, tail)
//! ```
//!
//! Flags, options, operands, and macros are declared through [`Flag`],
//! [`Opt`], [`Operand`], and [`Macro`]; a finisher turns the declaration
//! into a typed [`Binder`], and binders compose with [`Binder::zip`],
//! [`Binder::and_then`], and [`Binder::map`]. Binding walks the tokens
//! once, honoring long and short names, attached values, sign suffixes,
//! short clusters, negative-number integers, and macro expansion;
//! unmatched tokens either abort the call or land in the tail, depending
//! on [`Strictness`].
//!
//! ```
//! use argbind::{Flag, Opt, Strictness};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grammar = Flag::new(&["v", "verbose"])?
//!     .counted()
//!     .zip(Opt::<String>::new(&["name"])?.default_value("anon".to_string()));
//!
//! let bound = grammar.bind(["-vv", "--name=rex"], Strictness::Strict)?;
//! assert_eq!(bound.value, (2, "rex".to_string()));
//! assert!(bound.tail.is_empty());
//! # Ok(())
//! # }
//! ```

mod accum;
mod args;
mod binder;
mod engine;
mod error;
mod names;
mod reader;
mod spec;
mod value;

pub use args::{ExpandMacro, Flag, Macro, MacroCall, Operand, Opt};
pub use binder::{BindResult, Binder};
pub use engine::Strictness;
pub use error::{BindError, DeclarationError};
pub use names::Names;
pub use spec::{ArgSpec, SpecKind};
pub use value::ParseValue;
