use crate::regex::ast::{Quantifier, Regex, Token, TokenId, TokenKind};
use crate::regex::error::Error;
use crate::regex::validate::{find_closing, validate};
use crate::region::{AllocFlags, Region};

/// Region size used when none is given.
pub const DEFAULT_CAPACITY: usize = 4096;

pub fn compile(pattern: &[u8]) -> Result<Regex, Error> {
    Compiler::new().compile(pattern)
}

#[derive(Debug, Clone, Copy)]
pub struct Compiler {
    capacity: usize,
    flags: AllocFlags,
}

impl Default for Compiler {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            flags: AllocFlags::FATAL,
        }
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(mut self, bytes: usize) -> Self {
        self.capacity = bytes;
        self
    }

    /// Report region exhaustion as an error instead of aborting.
    pub fn soft_fail(mut self, yes: bool) -> Self {
        self.flags.soft_fail = yes;
        self
    }

    pub fn compile(&self, pattern: &[u8]) -> Result<Regex, Error> {
        let region = Region::new(self.capacity)?;
        self.compile_in(pattern, region)
    }

    /// Compiles into a caller-supplied region. The returned [`Regex`] owns it.
    pub fn compile_in(&self, pattern: &[u8], region: Region) -> Result<Regex, Error> {
        if !validate(pattern) {
            return Err(Error::InvalidPattern);
        }

        let mut builder = Builder {
            region,
            tokens: Vec::new(),
            flags: self.flags,
        };
        let first = builder.chain(pattern)?;
        let root = builder.push(Token {
            kind: TokenKind::Sequence(first),
            quantifier: Quantifier::One,
            next: None,
        })?;

        log::debug!(
            "compiled `{}` into {} tokens, {}/{} bytes used",
            pattern.escape_ascii(),
            builder.tokens.len(),
            builder.region.used(),
            builder.region.capacity()
        );

        Ok(Regex {
            tokens: builder.tokens,
            region: builder.region,
            root,
        })
    }
}

struct Builder {
    region: Region,
    tokens: Vec<Token>,
    flags: AllocFlags,
}

impl Builder {
    fn push(&mut self, token: Token) -> Result<TokenId, Error> {
        self.region.alloc(1, size_of::<Token>(), align_of::<Token>(), self.flags)?;
        let id = TokenId(self.tokens.len());
        self.tokens.push(token);
        Ok(id)
    }

    /// Compiles one slice into a sibling chain and returns its first token.
    ///
    /// Lexemes are collected first and allocated back to front so every
    /// token is created with its final `next`.
    fn chain(&mut self, p: &[u8]) -> Result<Option<TokenId>, Error> {
        let mut lexemes = Vec::new();
        let mut i = 0;

        while i < p.len() {
            let kind = match p[i] {
                open @ (b'(' | b'[') => {
                    let close = find_closing(p, i).ok_or(Error::InvalidPattern)?;
                    let first = self.chain(&p[i + 1..close])?;
                    i = close;
                    if open == b'(' {
                        TokenKind::Sequence(first)
                    } else {
                        TokenKind::Alternatives(first)
                    }
                }
                b'|' => TokenKind::AlternationMarker,
                b'.' => TokenKind::Wildcard,
                b => {
                    if b == b'\\' {
                        i += 1;
                    }
                    let lo = *p.get(i).ok_or(Error::InvalidPattern)?;
                    match (p.get(i + 1), p.get(i + 2)) {
                        (Some(b'-'), Some(&hi)) => {
                            i += 2;
                            TokenKind::Range {
                                low: lo.min(hi),
                                high: lo.max(hi),
                            }
                        }
                        _ => TokenKind::Literal(lo),
                    }
                }
            };

            let quantifier = match p.get(i + 1).copied().and_then(Quantifier::from_byte) {
                Some(q) => {
                    i += 1;
                    q
                }
                None => Quantifier::One,
            };

            lexemes.push((kind, quantifier));
            i += 1;
        }

        let mut next = None;
        for (kind, quantifier) in lexemes.into_iter().rev() {
            next = Some(self.push(Token {
                kind,
                quantifier,
                next,
            })?);
        }
        Ok(next)
    }
}
