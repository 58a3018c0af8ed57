/// Deepest group nesting a pattern may use. Validation, compilation and
/// matching all recurse once per level.
pub const MAX_NESTING: usize = 256;

/// Where a slice of the pattern sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    TopLevel,
    Parens,
    Brackets,
}

pub fn validate(pattern: &[u8]) -> bool {
    validate_in(pattern, Context::TopLevel)
}

/// Checks `pattern` as if it were the body of a `context` group.
pub fn validate_in(pattern: &[u8], context: Context) -> bool {
    match check(pattern, context, 0) {
        Ok(()) => true,
        Err(reason) => {
            log::debug!(
                "rejecting `{}` ({context:?}): {reason}",
                pattern.escape_ascii()
            );
            false
        }
    }
}

fn check(p: &[u8], context: Context, depth: usize) -> Result<(), String> {
    if depth > MAX_NESTING {
        return Err(format!("groups nested deeper than {MAX_NESTING}"));
    }
    let last = p.len().saturating_sub(1);
    let mut after_quantifier = false;
    let mut i = 0;

    while i < p.len() {
        let quantifier = matches!(p[i], b'*' | b'+' | b'?');
        match p[i] {
            b'(' | b'[' => {
                let close = find_closing(p, i)
                    .ok_or_else(|| format!("unclosed {:?} at {i}", p[i] as char))?;
                let inner = if p[i] == b'(' {
                    Context::Parens
                } else {
                    Context::Brackets
                };
                check(&p[i + 1..close], inner, depth + 1)?;
                i = close;
            }
            b'\\' => {
                if i == last {
                    return Err(format!("dangling escape at {i}"));
                }
                i += 1;
            }
            b'*' | b'+' | b'?' => {
                if context == Context::Brackets {
                    return Err(format!("quantifier inside brackets at {i}"));
                }
                if i == 0 {
                    return Err("quantifier binds to nothing".into());
                }
                if after_quantifier {
                    return Err(format!("stacked quantifier at {i}"));
                }
            }
            b'-' => {
                if i == 0 || i == last {
                    return Err(format!("range missing an endpoint at {i}"));
                }
                let (lo, hi) = (p[i - 1], p[i + 1]);
                let letters = lo.is_ascii_alphabetic() && hi.is_ascii_alphabetic();
                let digits = lo.is_ascii_digit() && hi.is_ascii_digit();
                if !letters && !digits {
                    return Err(format!("mixed range endpoints at {i}"));
                }
            }
            b'|' => {
                if i == 0 || i == last {
                    return Err(format!("alternation missing a branch at {i}"));
                }
            }
            _ => {}
        }
        after_quantifier = quantifier;
        i += 1;
    }

    Ok(())
}

/// Finds the delimiter closing the group opened at `open`, honoring escapes
/// and nested groups of the same kind.
pub(crate) fn find_closing(p: &[u8], open: usize) -> Option<usize> {
    let (opener, closer) = match p[open] {
        b'(' => (b'(', b')'),
        b'[' => (b'[', b']'),
        _ => return None,
    };
    let mut depth = 0usize;
    let mut i = open;
    while i < p.len() {
        match p[i] {
            b'\\' => i += 1,
            b if b == opener => depth += 1,
            b if b == closer => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(pattern: &str) -> bool {
        validate(pattern.as_bytes())
    }

    #[test]
    fn accepts_plain_patterns() {
        assert!(ok(""));
        assert!(ok("abc"));
        assert!(ok("a.c"));
        assert!(ok("a*b+c?"));
        assert!(ok("(ab|cd)+"));
        assert!(ok("[a-c]+"));
        assert!(ok(".*s"));
    }

    #[test]
    fn rejects_leading_quantifier() {
        assert!(!ok("*abc"));
        assert!(!ok("+"));
        assert!(!ok("(?a)"));
    }

    #[test]
    fn rejects_stacked_quantifiers_unless_escaped() {
        assert!(!ok("a**"));
        assert!(!ok("a+?"));
        assert!(ok(r"a\**"));
        assert!(ok(r"\++"));
    }

    #[test]
    fn rejects_quantifier_inside_brackets() {
        assert!(!ok("[a*]"));
        assert!(!ok("[(ab)+]"));
    }

    #[test]
    fn groups_must_close() {
        assert!(!ok("(abc"));
        assert!(!ok("[abc"));
        assert!(!ok("ab)c("));
        assert!(ok("((a)b)"));
        assert!(ok("[[ab]c]"));
        assert!(ok("()"));
    }

    #[test]
    fn escaped_delimiters_do_not_close_groups() {
        assert!(ok(r"(\))"));
        assert!(ok(r"[\]]"));
        assert!(!ok(r"(\)"));
    }

    #[test]
    fn escape_needs_a_byte() {
        assert!(!ok("\\"));
        assert!(!ok("ab\\"));
        assert!(!ok("(a\\)"));
        assert!(ok("\\\\"));
    }

    #[test]
    fn ranges_need_matching_classes() {
        assert!(ok("a-z"));
        assert!(ok("Z-a"));
        assert!(ok("0-9"));
        assert!(!ok("1-a"));
        assert!(!ok("a-1"));
        assert!(!ok("-a"));
        assert!(!ok("a-"));
        assert!(!ok("[a-]"));
        assert!(!ok("!-~"));
    }

    #[test]
    fn alternation_needs_both_sides() {
        assert!(ok("a|b"));
        assert!(!ok("|a"));
        assert!(!ok("a|"));
        assert!(!ok("(a|)"));
    }

    #[test]
    fn nesting_is_bounded() {
        let nested = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        assert!(ok(&nested(MAX_NESTING)));
        assert!(!ok(&nested(MAX_NESTING + 1)));
        assert!(!ok(&nested(60_000)));
        assert!(!ok(&format!("[{}]", nested(MAX_NESTING))));
    }

    #[test]
    fn contexts_apply_to_the_given_slice() {
        assert!(validate_in(b"a*", Context::Parens));
        assert!(!validate_in(b"a*", Context::Brackets));
    }
}
