use std::fmt;

use crate::region::Region;

/// Index of a token inside its [`Regex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub(crate) usize);

impl TokenId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Literal(u8),
    Wildcard,                      // .
    Range { low: u8, high: u8 },   // a-z, low <= high
    Sequence(Option<TokenId>),     // (...) and the root, first child
    Alternatives(Option<TokenId>), // [...], first child
    AlternationMarker,             // |
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quantifier {
    #[default]
    One,
    ZeroOrMore, // *
    OneOrMore,  // +
    ZeroOrOne,  // ?
}

impl Quantifier {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'*' => Some(Self::ZeroOrMore),
            b'+' => Some(Self::OneOrMore),
            b'?' => Some(Self::ZeroOrOne),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub quantifier: Quantifier,
    pub next: Option<TokenId>,
}

impl Token {
    pub fn is_marker(&self) -> bool {
        self.kind == TokenKind::AlternationMarker
    }
}

/// A compiled pattern: the token arena, the region that accounts for it,
/// and the synthetic root sequence.
#[derive(Debug)]
pub struct Regex {
    pub(crate) tokens: Vec<Token>,
    pub(crate) region: Region,
    pub(crate) root: TokenId,
}

impl Regex {
    pub fn root(&self) -> TokenId {
        self.root
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    /// Walks a sibling chain starting at `first`.
    pub fn chain(&self, first: Option<TokenId>) -> Chain<'_> {
        Chain {
            regex: self,
            cursor: first,
        }
    }

    pub fn is_match(&self, input: &[u8]) -> bool {
        crate::regex::match_full(self, input)
    }

    fn fmt_chain(
        &self,
        f: &mut fmt::Formatter<'_>,
        first: Option<TokenId>,
        depth: usize,
    ) -> fmt::Result {
        for id in self.chain(first) {
            self.fmt_token(f, id, depth)?;
        }
        Ok(())
    }

    fn fmt_token(&self, f: &mut fmt::Formatter<'_>, id: TokenId, depth: usize) -> fmt::Result {
        let token = self.token(id);
        let indent = "  ".repeat(depth);
        let suffix = match token.quantifier {
            Quantifier::One => "",
            Quantifier::ZeroOrMore => " *",
            Quantifier::OneOrMore => " +",
            Quantifier::ZeroOrOne => " ?",
        };
        match token.kind {
            TokenKind::Literal(b) => writeln!(f, "{indent}'{}'{suffix}", b.escape_ascii()),
            TokenKind::Wildcard => writeln!(f, "{indent}any{suffix}"),
            TokenKind::Range { low, high } => writeln!(
                f,
                "{indent}range('{}'..='{}'){suffix}",
                low.escape_ascii(),
                high.escape_ascii()
            ),
            TokenKind::AlternationMarker => writeln!(f, "{indent}or"),
            TokenKind::Sequence(first) | TokenKind::Alternatives(first) => {
                let name = if matches!(token.kind, TokenKind::Sequence(_)) {
                    "all"
                } else {
                    "any of"
                };
                writeln!(f, "{indent}{name} {{")?;
                self.fmt_chain(f, first, depth + 1)?;
                writeln!(f, "{indent}}}{suffix}")
            }
        }
    }
}

/// Prints the tree, one token per line.
impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_token(f, self.root, 0)
    }
}

pub struct Chain<'a> {
    regex: &'a Regex,
    cursor: Option<TokenId>,
}

impl Iterator for Chain<'_> {
    type Item = TokenId;

    fn next(&mut self) -> Option<TokenId> {
        let id = self.cursor?;
        self.cursor = self.regex.token(id).next;
        Some(id)
    }
}
