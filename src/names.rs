//! Name candidates and the guessing rules that classify them.
//!
//! A specification is declared with up to three name candidates. Guessing
//! sorts them into roles: a single-character candidate becomes the short
//! name, the longer of the multi-character candidates becomes the long
//! name, and the shorter one its abbreviation. Conflicting candidates are
//! rejected at declaration time, never at bind time.

use std::fmt;

use crate::error::DeclarationError;

/// The resolved names of one specification.
///
/// At least one of `long` / `short` is always present for anything built
/// through [`Names::guess`]. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    long: Option<String>,
    short: Option<char>,
    abbreviated: Option<String>,
}

impl Names {
    /// Classify up to three candidate strings into long, short, and
    /// abbreviated names.
    ///
    /// Rules: a one-character candidate is the short name and must be
    /// ASCII alphabetic (digits would collide with negative-number
    /// tokens, and sign characters with the suffix grammar); of two
    /// multi-character candidates the longer is the long name and the
    /// shorter its abbreviation. Anything else is a [`DeclarationError`]
    /// naming the offending candidate list.
    pub fn guess(candidates: &[&str]) -> Result<Names, DeclarationError> {
        if candidates.is_empty() {
            return Err(DeclarationError::NoNames);
        }
        let joined = candidates.join(", ");

        for (i, candidate) in candidates.iter().enumerate() {
            if candidate.is_empty() {
                return Err(DeclarationError::EmptyName { names: joined });
            }
            if candidates[..i].contains(candidate) {
                return Err(DeclarationError::DuplicateName {
                    names: joined,
                    name: (*candidate).to_string(),
                });
            }
        }

        let mut short = None;
        let mut longs: Vec<&str> = Vec::new();
        for &candidate in candidates {
            let mut chars = candidate.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => {
                    if !ch.is_ascii_alphabetic() {
                        return Err(DeclarationError::InvalidShortName {
                            names: joined,
                            short: ch,
                        });
                    }
                    if short.is_some() {
                        return Err(DeclarationError::TooManyShortNames { names: joined });
                    }
                    short = Some(ch);
                }
                _ => longs.push(candidate),
            }
        }

        let (long, abbreviated) = match longs.as_slice() {
            [] => (None, None),
            [only] => (Some((*only).to_string()), None),
            [first, second] => {
                let first_len = first.chars().count();
                let second_len = second.chars().count();
                if first_len == second_len {
                    return Err(DeclarationError::AmbiguousLength { names: joined });
                }
                let (longer, shorter) = if first_len > second_len {
                    (first, second)
                } else {
                    (second, first)
                };
                (Some((*longer).to_string()), Some((*shorter).to_string()))
            }
            _ => return Err(DeclarationError::TooManyLongNames { names: joined }),
        };

        Ok(Names {
            long,
            short,
            abbreviated,
        })
    }

    pub fn long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    pub fn short(&self) -> Option<char> {
        self.short
    }

    pub fn abbreviated(&self) -> Option<&str> {
        self.abbreviated.as_deref()
    }

    /// Whether `name` (without dashes) matches the long or abbreviated
    /// name exactly.
    pub fn matches_long(&self, name: &str) -> bool {
        self.long.as_deref() == Some(name) || self.abbreviated.as_deref() == Some(name)
    }

    pub fn matches_short(&self, ch: char) -> bool {
        self.short == Some(ch)
    }

    /// The dashed form used in diagnostics: the long name when present,
    /// otherwise the short one.
    pub fn primary(&self) -> String {
        match (&self.long, self.short) {
            (Some(long), _) => format!("--{long}"),
            (None, Some(short)) => format!("-{short}"),
            (None, None) => String::new(),
        }
    }

    /// The bare label without dashes, for operands and macros.
    pub fn label(&self) -> String {
        if let Some(long) = &self.long {
            long.clone()
        } else if let Some(short) = self.short {
            short.to_string()
        } else {
            String::new()
        }
    }
}

impl fmt::Display for Names {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.primary())
    }
}
