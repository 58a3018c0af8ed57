use std::collections::HashMap;

use crate::regex::ast::{Quantifier, Regex, Token, TokenId, TokenKind};

/// True when the whole of `input` is consumed by the pattern.
pub fn match_full(regex: &Regex, input: &[u8]) -> bool {
    Matcher::new(regex, input).match_at(regex.root(), 0) == Some(input.len())
}

/// Result of matching one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Advanced(usize),
    /// The token and everything after it in its branch reached the end of
    /// the input.
    Finished,
}

/// Where a branch gave up: the cursor it had reached and the marker that
/// opens the next branch, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Failed {
    cursor: usize,
    next: Option<TokenId>,
}

/// Walks a compiled tree over one input.
///
/// Quantifier lookaheads are memoized per (first token of the remainder,
/// cursor); the tree itself is never touched.
pub struct Matcher<'a> {
    regex: &'a Regex,
    input: &'a [u8],
    reaches_end: HashMap<(TokenId, usize), bool>,
}

impl<'a> Matcher<'a> {
    pub fn new(regex: &'a Regex, input: &'a [u8]) -> Self {
        Self {
            regex,
            input,
            reaches_end: HashMap::new(),
        }
    }

    /// Matches `id` starting at `cursor` and returns the offset just past
    /// what it consumed.
    pub fn match_at(&mut self, id: TokenId, cursor: usize) -> Option<usize> {
        if cursor > self.input.len() {
            return None;
        }
        let rest = self.rest_of_branch(self.regex.token(id));
        match self.step(id, cursor, rest)? {
            Step::Advanced(n) => Some(n),
            Step::Finished => Some(self.input.len()),
        }
    }

    fn rest_of_branch(&self, token: &Token) -> Option<TokenId> {
        token.next.filter(|&n| !self.regex.token(n).is_marker())
    }

    fn step(&mut self, id: TokenId, start: usize, rest: Option<TokenId>) -> Option<Step> {
        let token = *self.regex.token(id);
        let end = self.input.len();

        match token.quantifier {
            Quantifier::One => self.base(&token, start).map(Step::Advanced),
            Quantifier::ZeroOrOne => Some(Step::Advanced(self.base(&token, start).unwrap_or(start))),
            Quantifier::ZeroOrMore => {
                let mut cursor = start;
                while cursor < end {
                    if self.rest_reaches_end(rest, cursor) {
                        return Some(Step::Finished);
                    }
                    match self.base(&token, cursor) {
                        Some(n) if n > cursor => cursor = n,
                        _ => break,
                    }
                }
                Some(Step::Advanced(cursor))
            }
            Quantifier::OneOrMore => {
                let mut cursor = start;
                while cursor < end {
                    match self.base(&token, cursor) {
                        Some(n) if n > cursor => cursor = n,
                        _ => break,
                    }
                    if self.rest_reaches_end(rest, cursor) {
                        return Some(Step::Finished);
                    }
                }
                (cursor > start).then_some(Step::Advanced(cursor))
            }
        }
    }

    /// Can the branch remainder starting at `rest` consume exactly
    /// `[cursor, end)`?
    fn rest_reaches_end(&mut self, rest: Option<TokenId>, cursor: usize) -> bool {
        let Some(first) = rest else {
            return false;
        };
        if let Some(&hit) = self.reaches_end.get(&(first, cursor)) {
            return hit;
        }

        let hit = self.branch(Some(first), cursor) == Ok(self.input.len());
        if hit {
            log::trace!("remainder at token {} reaches the end from {cursor}", first.index());
        }
        self.reaches_end.insert((first, cursor), hit);
        hit
    }

    fn base(&mut self, token: &Token, cursor: usize) -> Option<usize> {
        let byte = self.input.get(cursor).copied();
        match token.kind {
            TokenKind::Literal(b) => (byte? == b).then_some(cursor + 1),
            TokenKind::Wildcard => byte.map(|_| cursor + 1),
            TokenKind::Range { low, high } => (low..=high).contains(&byte?).then_some(cursor + 1),
            TokenKind::Sequence(first) => self.sequence(first, cursor),
            TokenKind::Alternatives(first) => self.alternatives(first, cursor),
            TokenKind::AlternationMarker => None,
        }
    }

    /// Tries each `|`-separated branch in turn; the first one to match wins.
    ///
    /// A failed branch hands its cursor to the next one, so bytes it
    /// consumed before failing stay consumed.
    fn sequence(&mut self, first: Option<TokenId>, start: usize) -> Option<usize> {
        let mut branch = first;
        let mut cursor = start;
        loop {
            match self.branch(branch, cursor) {
                Ok(end) => return Some(end),
                Err(Failed {
                    cursor: reached,
                    next: Some(marker),
                }) => {
                    branch = self.regex.token(marker).next;
                    cursor = reached;
                }
                Err(Failed { next: None, .. }) => return None,
            }
        }
    }

    /// Matches one branch, stopping at the first marker.
    fn branch(&mut self, first: Option<TokenId>, start: usize) -> Result<usize, Failed> {
        let regex = self.regex;
        let mut cursor = start;

        for id in regex.chain(first) {
            let token = regex.token(id);
            if token.is_marker() {
                return Ok(cursor);
            }
            match self.step(id, cursor, self.rest_of_branch(token)) {
                Some(Step::Advanced(n)) => cursor = n,
                Some(Step::Finished) => return Ok(self.input.len()),
                None => {
                    return Err(Failed {
                        cursor,
                        next: regex.chain(token.next).find(|&n| regex.token(n).is_marker()),
                    });
                }
            }
        }

        Ok(cursor)
    }

    fn alternatives(&mut self, first: Option<TokenId>, cursor: usize) -> Option<usize> {
        let regex = self.regex;
        let end = self.input.len();
        regex
            .chain(first)
            .filter(|&id| !regex.token(id).is_marker())
            .find_map(|id| match self.step(id, cursor, None)? {
                Step::Advanced(n) => Some(n),
                Step::Finished => Some(end),
            })
    }
}
