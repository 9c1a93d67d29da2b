//! Route pattern compilation.
//!
//! Patterns are paths with named placeholders:
//!
//! ```ignore
//!  Syntax            Matches
//!  {name}            one path segment ([^/]+)
//!  {name:[0-9]+}     the given regex
//!  {name:number}     a registered matcher alias, rewritten to {name:[0-9]+}
//! ```
//!
//! Aliases are rewritten before compilation, so `{id:number}` and
//! `{id:[0-9]+}` compile to the same regex. Placeholder regexes may contain
//! braces (`{year:[0-9]{4}}`) and capture groups; the compiler uses named
//! groups internally so user groups never shift parameter positions.

use super::core::ParamVec;
use crate::error::RouteError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::warn;

/// Regex used for `{name}` placeholders without an explicit constraint.
pub const DEFAULT_PLACEHOLDER_REGEX: &str = "[^/]+";

#[allow(clippy::expect_used)]
static PLACEHOLDER_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_-]*$").expect("placeholder name regex is valid")
});

/// One alias rewrite rule: `{param:name}` → `{param:fragment}`.
#[derive(Debug, Clone)]
struct MatcherRule {
    name: String,
    fragment: String,
    rule: Regex,
    replacement: String,
}

/// Ordered set of placeholder type aliases.
///
/// Starts with `number`, `word` and `alphanum_dash`.
#[derive(Debug, Clone)]
pub struct PatternMatchers {
    rules: Vec<MatcherRule>,
}

impl Default for PatternMatchers {
    fn default() -> Self {
        let mut matchers = Self { rules: Vec::new() };
        for (name, fragment) in [
            ("number", "[0-9]+"),
            ("word", "[a-zA-Z]+"),
            ("alphanum_dash", "[a-zA-Z0-9-_]+"),
        ] {
            if let Err(e) = matchers.add(name, fragment) {
                warn!(matcher = %name, error = %e, "Built-in pattern matcher rejected");
            }
        }
        matchers
    }
}

impl PatternMatchers {
    /// An empty rule set, without the built-in aliases.
    #[must_use]
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register (or replace) an alias.
    ///
    /// The name must be an identifier and the fragment a valid regex.
    pub fn add(&mut self, name: &str, fragment: &str) -> Result<(), RouteError> {
        let invalid = |reason: String| RouteError::InvalidPattern {
            pattern: format!("{{param:{name}}}"),
            reason,
        };

        if !PLACEHOLDER_NAME.is_match(name) {
            return Err(invalid(format!("matcher name `{name}` is not an identifier")));
        }
        Regex::new(fragment).map_err(|e| invalid(e.to_string()))?;

        let rule = Regex::new(&format!(
            r"\{{\s*([a-zA-Z_][a-zA-Z0-9_-]*)\s*:\s*{}\s*\}}",
            regex::escape(name)
        ))
        .map_err(|e| invalid(e.to_string()))?;
        let replacement = format!("{{${{1}}:{}}}", fragment.replace('$', "$$"));

        let entry = MatcherRule {
            name: name.to_string(),
            fragment: fragment.to_string(),
            rule,
            replacement,
        };
        match self.rules.iter_mut().find(|r| r.name == name) {
            Some(existing) => *existing = entry,
            None => self.rules.push(entry),
        }
        Ok(())
    }

    /// The regex fragment registered for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.fragment.as_str())
    }

    /// `(name, fragment)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules
            .iter()
            .map(|r| (r.name.as_str(), r.fragment.as_str()))
    }

    /// `(rule regex, replacement template)` pairs in registration order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules
            .iter()
            .map(|r| (r.rule.as_str(), r.replacement.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite every aliased placeholder in `pattern`.
    #[must_use]
    pub fn apply<'a>(&self, pattern: &'a str) -> Cow<'a, str> {
        let mut out = Cow::Borrowed(pattern);
        for rule in &self.rules {
            let rewritten = match rule.rule.replace_all(&out, rule.replacement.as_str()) {
                Cow::Owned(rewritten) => Some(rewritten),
                Cow::Borrowed(_) => None,
            };
            if let Some(rewritten) = rewritten {
                out = Cow::Owned(rewritten);
            }
        }
        out
    }
}

/// A pattern ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Pattern after alias expansion
    expanded: String,
    /// `None` for static patterns, which match by string equality
    regex: Option<Regex>,
    param_names: Vec<Arc<str>>,
}

impl CompiledPattern {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.regex.is_none()
    }

    /// Placeholder names in declaration order.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    /// The pattern after alias rewriting.
    #[must_use]
    pub fn expanded(&self) -> &str {
        &self.expanded
    }

    /// Match `path`, returning the parameters in declaration order.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<ParamVec> {
        let Some(regex) = &self.regex else {
            return (self.expanded == path).then(ParamVec::new);
        };
        let caps = regex.captures(path)?;
        let mut params = ParamVec::new();
        for (idx, name) in self.param_names.iter().enumerate() {
            let value = caps.name(&group_name(idx))?.as_str();
            params.push((Arc::clone(name), value.to_string()));
        }
        Some(params)
    }
}

fn group_name(idx: usize) -> String {
    format!("p{idx}")
}

/// Compile `pattern`, expanding aliases from `matchers` first.
pub fn compile(pattern: &str, matchers: &PatternMatchers) -> Result<CompiledPattern, RouteError> {
    let invalid = |reason: String| RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        reason,
    };

    if pattern.is_empty() {
        return Err(invalid("pattern is empty".into()));
    }
    if !pattern.starts_with('/') {
        return Err(invalid("pattern must begin with '/'".into()));
    }

    let expanded = matchers.apply(pattern).into_owned();

    let mut source = String::with_capacity(expanded.len() + 16);
    source.push('^');
    let mut param_names: Vec<Arc<str>> = Vec::new();
    let mut literal = String::new();
    let mut chars = expanded.char_indices();

    while let Some((start, c)) = chars.next() {
        match c {
            '{' => {
                source.push_str(&regex::escape(&literal));
                literal.clear();

                let mut depth = 1usize;
                let mut end = None;
                for (idx, c) in chars.by_ref() {
                    match c {
                        '{' => depth += 1,
                        '}' => {
                            depth -= 1;
                            if depth == 0 {
                                end = Some(idx);
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let end = end.ok_or_else(|| invalid(format!("unclosed placeholder at byte {start}")))?;
                let inner = &expanded[start + 1..end];
                let (name, constraint) = match inner.split_once(':') {
                    Some((name, constraint)) => (name.trim(), constraint.trim()),
                    None => (inner.trim(), DEFAULT_PLACEHOLDER_REGEX),
                };

                if !PLACEHOLDER_NAME.is_match(name) {
                    return Err(invalid(format!("placeholder name `{name}` is not an identifier")));
                }
                if constraint.is_empty() {
                    return Err(invalid(format!("placeholder `{name}` has an empty constraint")));
                }
                if param_names.iter().any(|n| n.as_ref() == name) {
                    return Err(invalid(format!("placeholder `{name}` is used twice")));
                }

                source.push_str("(?P<");
                source.push_str(&group_name(param_names.len()));
                source.push('>');
                source.push_str(constraint);
                source.push(')');
                param_names.push(Arc::from(name));
            }
            '}' => return Err(invalid(format!("unmatched '}}' at byte {start}"))),
            _ => literal.push(c),
        }
    }

    if param_names.is_empty() {
        return Ok(CompiledPattern {
            expanded,
            regex: None,
            param_names,
        });
    }

    source.push_str(&regex::escape(&literal));
    source.push('$');
    let regex = Regex::new(&source).map_err(|e| invalid(e.to_string()))?;

    Ok(CompiledPattern {
        expanded,
        regex: Some(regex),
        param_names,
    })
}
