//! Ant-style path patterns.
//!
//! Supported syntax:
//! - `?` matches exactly one character inside a segment
//! - `*` matches zero or more characters inside a segment
//! - `{name}` is a template variable and matches like `*`
//! - `**` as a whole segment matches zero or more complete segments
//!
//! Everything else is literal and compared case-sensitively. Patterns are
//! compiled once into segments and matched by walking pattern and path
//! segments in lockstep, backtracking only at `**`. The walk remembers every
//! `(pattern segment, path segment)` pair it has decided, which keeps patterns
//! with several `**` segments polynomial in the path length.

use std::fmt;

const SEPARATOR: char = '/';

/// A compiled Ant-style pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AntPattern {
    source: String,
    segments: Vec<Segment>,
    absolute: bool,
    trailing_separator: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**`
    AnyPath,
    Literal(String),
    Glob(Vec<GlobToken>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GlobToken {
    Char(char),
    /// `?`
    One,
    /// `*` or `{name}`
    Many,
}

impl AntPattern {
    /// Compile a pattern. Compilation never fails: unbalanced braces are
    /// treated as literal characters.
    pub fn new(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let mut segments: Vec<Segment> = Vec::new();

        for part in source.split(SEPARATOR).filter(|s| !s.is_empty()) {
            let segment = Segment::compile(part);
            // `/**/**` is the same as `/**`
            if segment == Segment::AnyPath && segments.last() == Some(&Segment::AnyPath) {
                continue;
            }
            segments.push(segment);
        }

        Self {
            absolute: source.starts_with(SEPARATOR),
            trailing_separator: source.len() > 1 && source.ends_with(SEPARATOR),
            source,
            segments,
        }
    }

    /// The pattern text as declared.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether `path` matches this pattern in full.
    pub fn matches(&self, path: &str) -> bool {
        if path.starts_with(SEPARATOR) != self.absolute {
            return false;
        }

        let parts: Vec<&str> = path.split(SEPARATOR).filter(|s| !s.is_empty()).collect();
        if !match_segments(&self.segments, &parts) {
            return false;
        }

        if self.segments.last() == Some(&Segment::AnyPath) {
            return true;
        }
        let path_trailing = path.len() > 1 && path.ends_with(SEPARATOR);
        path_trailing == self.trailing_separator
    }
}

impl fmt::Display for AntPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Match `path` against `pattern` without keeping the compiled form.
pub fn matches(pattern: &str, path: &str) -> bool {
    AntPattern::new(pattern).matches(path)
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    let mut walk = SegmentWalk {
        pattern,
        path,
        width: path.len() + 1,
        memo: vec![None; (pattern.len() + 1) * (path.len() + 1)],
    };
    walk.matches_from(0, 0)
}

/// Pattern/path walk memoized on `(pattern index, path index)`, so each pair
/// is decided at most once however many `**` segments backtrack over it.
struct SegmentWalk<'a> {
    pattern: &'a [Segment],
    path: &'a [&'a str],
    width: usize,
    memo: Vec<Option<bool>>,
}

impl SegmentWalk<'_> {
    fn matches_from(&mut self, p: usize, s: usize) -> bool {
        let slot = p * self.width + s;
        if let Some(known) = self.memo[slot] {
            return known;
        }

        let (pattern, path) = (self.pattern, self.path);
        let result = match pattern.get(p) {
            None => s == path.len(),
            // Trailing `**` takes whatever is left.
            Some(Segment::AnyPath) if p + 1 == pattern.len() => true,
            // Zero segments first, then absorb one more on every retry.
            Some(Segment::AnyPath) => (s..=path.len()).any(|k| self.matches_from(p + 1, k)),
            Some(segment) => {
                s < path.len() && segment.matches(path[s]) && self.matches_from(p + 1, s + 1)
            }
        };

        self.memo[slot] = Some(result);
        result
    }
}

impl Segment {
    fn compile(part: &str) -> Self {
        if part == "**" {
            return Segment::AnyPath;
        }
        if !part.contains(['*', '?', '{']) {
            return Segment::Literal(part.to_string());
        }

        let mut tokens = Vec::with_capacity(part.len());
        let mut chars = part.char_indices().peekable();
        while let Some((idx, c)) = chars.next() {
            match c {
                '?' => tokens.push(GlobToken::One),
                '*' => push_many(&mut tokens),
                '{' => match part[idx..].find('}') {
                    Some(len) => {
                        push_many(&mut tokens);
                        let end = idx + len;
                        while chars.next_if(|&(i, _)| i <= end).is_some() {}
                    }
                    None => tokens.push(GlobToken::Char(c)),
                },
                other => tokens.push(GlobToken::Char(other)),
            }
        }
        Segment::Glob(tokens)
    }

    fn matches(&self, part: &str) -> bool {
        match self {
            Segment::AnyPath => true,
            Segment::Literal(lit) => lit == part,
            Segment::Glob(tokens) => glob_match(tokens, part),
        }
    }
}

fn push_many(tokens: &mut Vec<GlobToken>) {
    if tokens.last() != Some(&GlobToken::Many) {
        tokens.push(GlobToken::Many);
    }
}

/// Single-segment wildcard match with star backtracking.
fn glob_match(tokens: &[GlobToken], value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    let (mut t_idx, mut v_idx) = (0usize, 0usize);
    let (mut star_idx, mut match_idx) = (None, 0usize);

    while v_idx < chars.len() {
        match tokens.get(t_idx) {
            Some(GlobToken::Many) => {
                star_idx = Some(t_idx);
                match_idx = v_idx;
                t_idx += 1;
                continue;
            }
            Some(GlobToken::One) => {
                t_idx += 1;
                v_idx += 1;
                continue;
            }
            Some(GlobToken::Char(c)) if *c == chars[v_idx] => {
                t_idx += 1;
                v_idx += 1;
                continue;
            }
            _ => {}
        }

        match star_idx {
            Some(star) => {
                t_idx = star + 1;
                match_idx += 1;
                v_idx = match_idx;
            }
            None => return false,
        }
    }

    tokens[t_idx..].iter().all(|t| *t == GlobToken::Many)
}
