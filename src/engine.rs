//! The binding engine: classify, resolve, accumulate.
//!
//! One pass over the token stream. Each raw token is classified by shape,
//! resolved against the declared specifications in declaration order, and
//! handed to its slot's accumulator. Composite shapes (attached values,
//! sign suffixes, short clusters, macro expansions) are split apart and
//! pushed back through the reader so every piece takes the same path as a
//! plain token.

use crate::binder::{BindResult, Binder, SlotMap, SpecEntry};
use crate::error::BindError;
use crate::reader::{Token, TokenReader};
use crate::spec::SpecKind;

/// How unmatched tokens are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Unmatched options and bare tokens abort the bind
    Strict,
    /// Unmatched tokens become tail entries
    Tolerant,
}

pub(crate) fn run<T: 'static>(
    binder: &Binder<T>,
    tokens: Vec<String>,
    strictness: Strictness,
) -> Result<BindResult<T>, BindError> {
    let entries = binder.entries();
    tracing::debug!(
        "binding {} tokens against {} specifications ({:?})",
        tokens.len(),
        entries.len(),
        strictness
    );

    let mut scan = Scan {
        slots: SlotMap::new(&entries),
        entries: &entries,
        reader: TokenReader::new(tokens),
        tail: Vec::new(),
        strictness,
        operand_cursor: 0,
    };
    scan.consume_all()?;

    let Scan {
        mut slots, tail, ..
    } = scan;
    let value = binder.produce(&mut slots);
    tracing::debug!("bind complete, {} tail tokens", tail.len());
    Ok(BindResult { value, tail })
}

struct Scan<'e> {
    entries: &'e [SpecEntry],
    slots: SlotMap,
    reader: TokenReader,
    tail: Vec<String>,
    strictness: Strictness,
    operand_cursor: usize,
}

impl Scan<'_> {
    fn consume_all(&mut self) -> Result<(), BindError> {
        while let Some(token) = self.reader.read() {
            match token {
                Token::Text(raw) => self.classify(raw)?,
                Token::Attached => {
                    panic!("attached-value marker escaped the specification that injected it")
                }
            }
        }
        Ok(())
    }

    fn classify(&mut self, raw: String) -> Result<(), BindError> {
        let entries = self.entries;

        if raw.starts_with('@') {
            if let Some(entry) = resolve_macro(entries) {
                tracing::trace!("expanding macro token '{}'", raw);
                self.reader.unread(Token::Text(raw[1..].to_string()));
                return self.apply(entry);
            }
            return self.bare(raw);
        }

        if let Some(body) = raw.strip_prefix("--") {
            if !body.is_empty() {
                return self.long_option(&raw, body);
            }
            return self.unmatched_option(&raw);
        }

        if is_negative_number(&raw) {
            return self.negative_number(raw);
        }

        let mut chars = raw.chars();
        if chars.next() == Some('-') {
            if let Some(short) = chars.next() {
                return if chars.next().is_some() {
                    self.unbundle(&raw)
                } else {
                    self.single_short(&raw, short)
                };
            }
        }

        self.bare(raw)
    }

    /// Drives one resolved specification's accumulator.
    ///
    /// An `Attached` marker at the front of the stream forces a value
    /// read; otherwise flags and optional-value options take their
    /// zero-token path and everything else reads the next text token.
    fn apply(&mut self, entry: &SpecEntry) -> Result<(), BindError> {
        let spec = &entry.spec;
        let attached = matches!(self.reader.peek(), Some(Token::Attached));
        if attached {
            let _ = self.reader.read();
        }
        let zero_token = spec.kind() == SpecKind::Flag || spec.value_optional();

        let slot = self
            .slots
            .slot(spec.id())
            .expect("every inspected specification has a slot");

        if attached || !zero_token {
            let pending = match self.reader.peek() {
                Some(Token::Text(text)) => Some(text.clone()),
                _ => None,
            };
            if !slot.read(&mut self.reader) {
                return Err(BindError::InvalidValue {
                    option: spec.display_name(),
                    value: pending,
                });
            }
        } else if !slot.read_default() {
            return Err(BindError::InvalidValue {
                option: spec.display_name(),
                value: None,
            });
        }
        Ok(())
    }

    fn long_option(&mut self, raw: &str, body: &str) -> Result<(), BindError> {
        let entries = self.entries;

        if let Some((name, value)) = body.split_once('=') {
            if let Some(entry) = resolve_long(entries, name) {
                self.reader.unread(Token::Text(value.to_string()));
                self.reader.unread(Token::Attached);
                return self.apply(entry);
            }
            return self.unmatched_option(raw);
        }

        if let Some(entry) = resolve_long(entries, body) {
            return self.apply(entry);
        }

        // Trailing sign, recognized on flags only.
        if let Some(sign) = body.chars().last().filter(|c| matches!(*c, '+' | '-')) {
            let name = &body[..body.len() - 1];
            if let Some(entry) = resolve_long(entries, name) {
                if entry.spec.kind() == SpecKind::Flag {
                    self.reader.unread(Token::Text(sign.to_string()));
                    self.reader.unread(Token::Attached);
                    return self.apply(entry);
                }
            }
        }

        // The negated form, recognized on negatable flags only.
        if let Some(name) = body.strip_prefix("no-") {
            if let Some(entry) = resolve_long(entries, name) {
                if entry.spec.kind() == SpecKind::Flag && entry.spec.negatable() {
                    self.reader.unread(Token::Text("-".to_string()));
                    self.reader.unread(Token::Attached);
                    return self.apply(entry);
                }
            }
        }

        self.unmatched_option(raw)
    }

    fn single_short(&mut self, raw: &str, short: char) -> Result<(), BindError> {
        match resolve_short(self.entries, short) {
            Some(entry) => self.apply(entry),
            None => self.unmatched_option(raw),
        }
    }

    /// Splits a short cluster into per-specification pieces and pushes
    /// them back for reclassification.
    ///
    /// Every character walked must resolve to a short name; a flag may
    /// consume a following sign character, and a value-bearing option
    /// takes the whole non-empty remainder as its attached value, ending
    /// the walk. Resolution happens before any piece is injected, so a
    /// malformed cluster has no partial effect.
    fn unbundle(&mut self, raw: &str) -> Result<(), BindError> {
        let entries = self.entries;
        let chars: Vec<char> = raw[1..].chars().collect();
        let mut pieces: Vec<Token> = Vec::new();
        let mut index = 0;

        while index < chars.len() {
            let short = chars[index];
            let Some(entry) = resolve_short(entries, short) else {
                return Err(BindError::InvalidOption {
                    token: raw.to_string(),
                    unbundled: short,
                });
            };
            pieces.push(Token::Text(format!("-{short}")));
            match entry.spec.kind() {
                SpecKind::Flag => {
                    match chars.get(index + 1) {
                        Some(&sign) if sign == '+' || sign == '-' => {
                            pieces.push(Token::Attached);
                            pieces.push(Token::Text(sign.to_string()));
                            index += 2;
                        }
                        _ => index += 1,
                    }
                }
                _ => {
                    let remainder: String = chars[index + 1..].iter().collect();
                    if !remainder.is_empty() {
                        pieces.push(Token::Attached);
                        pieces.push(Token::Text(remainder));
                    }
                    index = chars.len();
                }
            }
        }

        tracing::trace!("unbundled '{}' into {} pieces", raw, pieces.len());
        for piece in pieces.into_iter().rev() {
            self.reader.unread(piece);
        }
        Ok(())
    }

    fn negative_number(&mut self, raw: String) -> Result<(), BindError> {
        match resolve_integer(self.entries) {
            Some(entry) => {
                self.reader.unread(Token::Text(raw[1..].to_string()));
                self.reader.unread(Token::Attached);
                self.apply(entry)
            }
            None => {
                // Unclaimed in both modes: the shape is a number, not an
                // option, so strictness does not apply.
                tracing::trace!("negative number '{}' goes to tail", raw);
                self.tail.push(raw);
                Ok(())
            }
        }
    }

    fn bare(&mut self, raw: String) -> Result<(), BindError> {
        if let Some(index) = self.next_operand_index() {
            self.reader.unread(Token::Text(raw));
            let entry = &self.entries[index];
            return self.apply(entry);
        }
        match self.strictness {
            Strictness::Strict => Err(BindError::UnknownArgument { argument: raw }),
            Strictness::Tolerant => {
                tracing::trace!("bare token '{}' goes to tail", raw);
                self.tail.push(raw);
                Ok(())
            }
        }
    }

    /// The next unsatisfied operand slot, advancing past it.
    fn next_operand_index(&mut self) -> Option<usize> {
        let offset = self.entries[self.operand_cursor..]
            .iter()
            .position(|entry| entry.spec.kind() == SpecKind::Operand)?;
        let index = self.operand_cursor + offset;
        self.operand_cursor = index + 1;
        Some(index)
    }

    fn unmatched_option(&mut self, raw: &str) -> Result<(), BindError> {
        match self.strictness {
            Strictness::Strict => Err(BindError::UnknownOption {
                option: raw.to_string(),
            }),
            Strictness::Tolerant => {
                tracing::trace!("unmatched option '{}' goes to tail", raw);
                self.tail.push(raw.to_string());
                Ok(())
            }
        }
    }
}

fn resolvable(kind: SpecKind) -> bool {
    matches!(
        kind,
        SpecKind::Flag | SpecKind::Option | SpecKind::IntegerOption
    )
}

fn resolve_long<'e>(entries: &'e [SpecEntry], name: &str) -> Option<&'e SpecEntry> {
    entries
        .iter()
        .find(|entry| resolvable(entry.spec.kind()) && entry.spec.names().matches_long(name))
}

fn resolve_short(entries: &[SpecEntry], short: char) -> Option<&SpecEntry> {
    entries
        .iter()
        .find(|entry| resolvable(entry.spec.kind()) && entry.spec.names().matches_short(short))
}

fn resolve_macro(entries: &[SpecEntry]) -> Option<&SpecEntry> {
    entries
        .iter()
        .find(|entry| entry.spec.kind() == SpecKind::Macro)
}

fn resolve_integer(entries: &[SpecEntry]) -> Option<&SpecEntry> {
    entries
        .iter()
        .find(|entry| entry.spec.kind() == SpecKind::IntegerOption)
}

fn is_negative_number(token: &str) -> bool {
    match token.strip_prefix('-') {
        Some(rest) => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_number_shape() {
        assert!(is_negative_number("-1"));
        assert!(is_negative_number("-123"));
        assert!(!is_negative_number("-"));
        assert!(!is_negative_number("-1a"));
        assert!(!is_negative_number("-a1"));
        assert!(!is_negative_number("123"));
        assert!(!is_negative_number("--1"));
    }
}
