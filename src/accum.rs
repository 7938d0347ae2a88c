//! Sticky-failure accumulators, the per-call folding state of each slot.
//!
//! An accumulator belongs to exactly one specification for the duration of
//! one bind call. Occurrences fold into it one at a time; the first
//! rejected occurrence moves it to `Errored` permanently, and no
//! transition leaves `Errored`.

use std::any::Any;
use std::sync::Arc;

use crate::args::{ExpandMacro, MacroCall};
use crate::reader::{Token, TokenReader};

/// Folding state of one slot.
#[derive(Debug)]
enum AccState<T> {
    Empty,
    Filled { value: T, count: u32 },
    Errored,
}

impl<T> AccState<T> {
    /// Folds one occurrence through `fold`, feeding it the running value.
    /// Rejection leaves the state `Errored`.
    fn fold_occurrence(&mut self, fold: impl FnOnce(Option<T>) -> Option<T>) -> bool {
        let (previous, count) = match std::mem::replace(self, AccState::Errored) {
            AccState::Empty => (None, 0),
            AccState::Filled { value, count } => (Some(value), count),
            AccState::Errored => return false,
        };
        match fold(previous) {
            Some(value) => {
                *self = AccState::Filled {
                    value,
                    count: count + 1,
                };
                true
            }
            None => false,
        }
    }

    /// The folded value, if any occurrence succeeded and none failed.
    /// `Errored` stays `Errored`.
    fn take_value(&mut self) -> Option<T> {
        match self {
            AccState::Errored => None,
            _ => match std::mem::replace(self, AccState::Empty) {
                AccState::Filled { value, .. } => Some(value),
                _ => None,
            },
        }
    }
}

/// One occurrence folded into the running value. `current` is `None` on
/// the first occurrence; `input` is `None` on the zero-token default path
/// (bare flags, optional-value options without an attached value).
/// Returning `None` rejects the occurrence.
pub(crate) type FoldFn<T> =
    Arc<dyn Fn(Option<T>, Option<&str>) -> Option<T> + Send + Sync>;

/// Type-erased slot interface the engine drives.
pub(crate) trait Accumulate: Send {
    /// Reads this slot's tokens from the stream and folds them in;
    /// `false` errors the slot permanently.
    fn read(&mut self, reader: &mut TokenReader) -> bool;

    /// Folds an occurrence that carries no token.
    fn read_default(&mut self) -> bool;

    /// The folded value, if at least one read succeeded. Consumes it.
    fn take(&mut self) -> Option<Box<dyn Any>>;
}

/// Accumulator for value and flag slots: one text token (or none) per
/// occurrence, folded through the declaration's fold function.
pub(crate) struct Accumulator<T> {
    state: AccState<T>,
    fold: FoldFn<T>,
}

impl<T> Accumulator<T> {
    pub(crate) fn new(fold: FoldFn<T>) -> Accumulator<T> {
        Accumulator {
            state: AccState::Empty,
            fold,
        }
    }
}

#[cfg(test)]
impl<T> Accumulator<T> {
    fn occurrences(&self) -> u32 {
        match self.state {
            AccState::Filled { count, .. } => count,
            _ => 0,
        }
    }

    fn is_errored(&self) -> bool {
        matches!(self.state, AccState::Errored)
    }
}

impl<T: Send + 'static> Accumulate for Accumulator<T> {
    fn read(&mut self, reader: &mut TokenReader) -> bool {
        if matches!(self.state, AccState::Errored) {
            return false;
        }
        let Some(text) = reader.read_text() else {
            self.state = AccState::Errored;
            return false;
        };
        let fold = &self.fold;
        self.state
            .fold_occurrence(|previous| fold(previous, Some(&text)))
    }

    fn read_default(&mut self) -> bool {
        let fold = &self.fold;
        self.state.fold_occurrence(|previous| fold(previous, None))
    }

    fn take(&mut self) -> Option<Box<dyn Any>> {
        self.state
            .take_value()
            .map(|value| Box::new(value) as Box<dyn Any>)
    }
}

/// Accumulator for macro slots.
///
/// Reads the macro name, runs the expansion, pushes the expansion tokens
/// back onto the reader for ordinary reclassification, and records the
/// call.
pub(crate) struct MacroAccumulator {
    state: AccState<Vec<MacroCall>>,
    expand: Arc<dyn ExpandMacro>,
}

impl MacroAccumulator {
    pub(crate) fn new(expand: Arc<dyn ExpandMacro>) -> MacroAccumulator {
        MacroAccumulator {
            state: AccState::Empty,
            expand,
        }
    }
}

impl Accumulate for MacroAccumulator {
    fn read(&mut self, reader: &mut TokenReader) -> bool {
        if matches!(self.state, AccState::Errored) {
            return false;
        }
        let Some(name) = reader.read_text() else {
            self.state = AccState::Errored;
            return false;
        };
        let tokens = self.expand.expand(&name);
        for token in tokens.iter().rev() {
            reader.unread(Token::Text(token.clone()));
        }
        let call = MacroCall { name, tokens };
        self.state.fold_occurrence(|previous| {
            let mut calls = previous.unwrap_or_default();
            calls.push(call);
            Some(calls)
        })
    }

    fn read_default(&mut self) -> bool {
        // A macro occurrence always carries its name token.
        self.state = AccState::Errored;
        false
    }

    fn take(&mut self) -> Option<Box<dyn Any>> {
        self.state
            .take_value()
            .map(|value| Box::new(value) as Box<dyn Any>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(tokens: &[&str]) -> TokenReader {
        TokenReader::new(tokens.iter().map(|t| t.to_string()))
    }

    fn int_accumulator() -> Accumulator<i64> {
        // Last occurrence wins.
        Accumulator::new(Arc::new(|_, input| input.and_then(|t| t.parse().ok())))
    }

    #[test]
    fn test_successful_reads_fold_and_count() {
        let mut acc = int_accumulator();
        let mut r = reader(&["7", "9"]);
        assert!(acc.read(&mut r));
        assert!(acc.read(&mut r));
        assert_eq!(acc.occurrences(), 2);
        let value = acc.take().unwrap().downcast::<i64>().unwrap();
        assert_eq!(*value, 9);
    }

    #[test]
    fn test_empty_slot_takes_nothing() {
        let mut acc = int_accumulator();
        assert!(acc.take().is_none());
    }

    #[test]
    fn test_failed_read_is_permanent() {
        let mut acc = int_accumulator();
        let mut r = reader(&["7", "oops", "8"]);
        assert!(acc.read(&mut r));
        assert!(!acc.read(&mut r));
        // "8" is a valid token, but the slot is already errored.
        assert!(!acc.read(&mut r));
        assert!(!acc.read_default());
        assert!(acc.is_errored());
        assert!(acc.take().is_none());
        // Taking does not reset the error.
        assert!(acc.is_errored());
        assert!(acc.take().is_none());
    }

    #[test]
    fn test_read_at_end_of_input_errors() {
        let mut acc = int_accumulator();
        let mut r = reader(&[]);
        assert!(!acc.read(&mut r));
        assert!(acc.is_errored());
    }

    #[test]
    fn test_default_path_folds_without_token() {
        let mut acc: Accumulator<u32> = Accumulator::new(Arc::new(|count, input| {
            match input {
                None => Some(count.unwrap_or(0) + 1),
                Some(_) => None,
            }
        }));
        assert!(acc.read_default());
        assert!(acc.read_default());
        let value = acc.take().unwrap().downcast::<u32>().unwrap();
        assert_eq!(*value, 2);
    }

    #[test]
    fn test_macro_accumulator_expands_and_records() {
        let mut acc = MacroAccumulator::new(Arc::new(|name: &str| {
            vec![format!("--{name}"), "next".to_string()]
        }));
        let mut r = reader(&["greet", "later"]);
        assert!(acc.read(&mut r));

        // Expansion tokens come back in order, ahead of the rest.
        assert_eq!(r.read_text(), Some("--greet".to_string()));
        assert_eq!(r.read_text(), Some("next".to_string()));
        assert_eq!(r.read_text(), Some("later".to_string()));

        let calls = acc.take().unwrap().downcast::<Vec<MacroCall>>().unwrap();
        assert_eq!(
            *calls,
            vec![MacroCall {
                name: "greet".to_string(),
                tokens: vec!["--greet".to_string(), "next".to_string()],
            }]
        );
    }
}
