//! Route Patterns - Compile route strings into guard predicates.
//!
//! Syntax:
//! - literal text: `/users/list`
//! - `:name` matches one segment: `/users/:id`
//! - modifiers after a parameter: `?` optional, `*` zero or more segments,
//!   `+` one or more segments: `/files/:path+`
//! - a bare `*` matches anything and is keyed by position: `/static/*`
//! - `\` escapes the next character
//!
//! Matching is exact (the whole path) or prefix (up to a segment boundary),
//! case-insensitive and trailing-slash tolerant unless [`MatchFlags`] say
//! otherwise.
//!
//! # Example
//!
//! ```ignore
//! let pattern = RoutePattern::compile("/users/:id", MatchFlags::empty())?;
//! let matched = pattern.matches("/users/42/edit").unwrap();
//! assert_eq!(matched.url, "/users/42");
//! assert_eq!(matched.params["id"], "42");
//! assert!(!matched.is_exact);
//! ```

use regex::Regex;

use crate::error::PatternError;
use crate::types::Params;

// =============================================================================
// Flags
// =============================================================================

bitflags::bitflags! {
    /// Options controlling how a pattern matches a path.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MatchFlags: u8 {
        /// The whole path must match, not just a prefix.
        const EXACT = 1 << 0;
        /// A trailing slash is significant.
        const STRICT = 1 << 1;
        /// Literal text is compared case-sensitively.
        const SENSITIVE = 1 << 2;
    }
}

// =============================================================================
// Match Result
// =============================================================================

/// A successful match of a pattern against a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// The pattern that matched.
    pub path: String,
    /// The matched portion of the path.
    pub url: String,
    /// The pattern consumed the whole path.
    pub is_exact: bool,
    pub params: Params,
}

// =============================================================================
// Tokens
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param(ParamToken),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParamToken {
    name: String,
    /// Preceded by `/`, which belongs to the parameter.
    prefixed: bool,
    optional: bool,
    repeat: bool,
    wildcard: bool,
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut unnamed = 0usize;
    let mut chars = pattern.char_indices().peekable();

    while let Some((position, ch)) = chars.next() {
        match ch {
            '\\' => {
                if let Some((_, escaped)) = chars.next() {
                    literal.push(escaped);
                }
            }
            ':' => {
                let mut name = String::new();
                while let Some(&(_, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName {
                        pattern: pattern.to_string(),
                        position,
                    });
                }
                if let Some(&(group, '(')) = chars.peek() {
                    return Err(PatternError::UnsupportedGroup {
                        pattern: pattern.to_string(),
                        position: group,
                    });
                }
                let modifier = match chars.peek() {
                    Some(&(_, m @ ('?' | '*' | '+'))) => {
                        chars.next();
                        Some(m)
                    }
                    _ => None,
                };
                let prefixed = take_prefix(&mut literal);
                flush_literal(&mut tokens, &mut literal);
                tokens.push(Token::Param(ParamToken {
                    name,
                    prefixed,
                    optional: matches!(modifier, Some('?' | '*')),
                    repeat: matches!(modifier, Some('*' | '+')),
                    wildcard: false,
                }));
            }
            '*' => {
                let prefixed = take_prefix(&mut literal);
                flush_literal(&mut tokens, &mut literal);
                tokens.push(Token::Param(ParamToken {
                    name: unnamed.to_string(),
                    prefixed,
                    optional: false,
                    repeat: false,
                    wildcard: true,
                }));
                unnamed += 1;
            }
            '(' => {
                return Err(PatternError::UnsupportedGroup {
                    pattern: pattern.to_string(),
                    position,
                });
            }
            other => literal.push(other),
        }
    }
    flush_literal(&mut tokens, &mut literal);
    Ok(tokens)
}

fn take_prefix(literal: &mut String) -> bool {
    if literal.ends_with('/') {
        literal.pop();
        true
    } else {
        false
    }
}

fn flush_literal(tokens: &mut Vec<Token>, literal: &mut String) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

// =============================================================================
// Compilation
// =============================================================================

const SEGMENT: &str = "[^/]+?";

fn param_source(param: &ParamToken) -> String {
    let unit = if param.wildcard { ".*" } else { SEGMENT };
    let capture = if param.repeat {
        format!("{unit}(?:/{unit})*")
    } else {
        unit.to_string()
    };
    let prefix = if param.prefixed { "/" } else { "" };

    if param.optional {
        format!("(?:{prefix}({capture}))?")
    } else {
        format!("{prefix}({capture})")
    }
}

fn build_regex(tokens: &[Token], flags: MatchFlags) -> String {
    let mut body = String::new();
    for token in tokens {
        match token {
            Token::Literal(text) => body.push_str(&regex::escape(text)),
            Token::Param(param) => body.push_str(&param_source(param)),
        }
    }

    let strict = flags.contains(MatchFlags::STRICT);
    let ends_with_slash = matches!(tokens.last(), Some(Token::Literal(text)) if text.ends_with('/'));
    if !strict && ends_with_slash {
        body.pop();
    }

    let tail = match (flags.contains(MatchFlags::EXACT), strict) {
        (true, true) => "$",
        (true, false) => "/?$",
        (false, true) if ends_with_slash => ".*$",
        (false, _) => "(?:/.*)?$",
    };
    let case = if flags.contains(MatchFlags::SENSITIVE) { "" } else { "(?i)" };

    // Group 1 is the matched url; parameters start at group 2.
    format!("{case}^({body}){tail}")
}

// =============================================================================
// RoutePattern
// =============================================================================

#[derive(Debug, Clone)]
enum Matcher {
    /// Empty pattern: matches every path.
    Always,
    Regex(Regex),
    /// Pattern that failed to compile.
    Never,
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    flags: MatchFlags,
    keys: Vec<String>,
    matcher: Matcher,
}

impl RoutePattern {
    /// Compile a pattern.
    pub fn compile(source: &str, flags: MatchFlags) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Ok(Self {
                source: String::new(),
                flags,
                keys: Vec::new(),
                matcher: Matcher::Always,
            });
        }

        let tokens = tokenize(source)?;
        let mut keys: Vec<String> = Vec::new();
        for token in &tokens {
            if let Token::Param(param) = token {
                if keys.contains(&param.name) {
                    return Err(PatternError::DuplicateParam {
                        pattern: source.to_string(),
                        name: param.name.clone(),
                    });
                }
                keys.push(param.name.clone());
            }
        }

        let regex = Regex::new(&build_regex(&tokens, flags)).map_err(|err| PatternError::Regex {
            pattern: source.to_string(),
            source: err,
        })?;

        Ok(Self {
            source: source.to_string(),
            flags,
            keys,
            matcher: Matcher::Regex(regex),
        })
    }

    /// A pattern that never matches. Stands in for one that failed to compile.
    pub fn never(source: &str, flags: MatchFlags) -> Self {
        Self {
            source: source.to_string(),
            flags,
            keys: Vec::new(),
            matcher: Matcher::Never,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> MatchFlags {
        self.flags
    }

    pub fn is_exact(&self) -> bool {
        self.flags.contains(MatchFlags::EXACT)
    }

    /// Parameter names in pattern order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Match `pathname` against this pattern.
    pub fn matches(&self, pathname: &str) -> Option<RouteMatch> {
        let regex = match &self.matcher {
            Matcher::Never => return None,
            Matcher::Always => {
                return Some(RouteMatch {
                    path: self.source.clone(),
                    url: "/".to_string(),
                    is_exact: pathname == "/",
                    params: Params::new(),
                });
            }
            Matcher::Regex(regex) => regex,
        };

        let captures = regex.captures(pathname)?;
        let whole = captures.get(1)?;
        let mut url = whole.as_str().to_string();
        // A lone trailing slash after the match belongs to it.
        if &pathname[whole.end()..] == "/" {
            url.push('/');
        }
        let is_exact = url == pathname;
        if url.is_empty() {
            url.push('/');
        }

        let params = self
            .keys
            .iter()
            .enumerate()
            .filter_map(|(i, key)| {
                captures
                    .get(i + 2)
                    .map(|value| (key.clone(), value.as_str().to_string()))
            })
            .collect();

        Some(RouteMatch {
            path: self.source.clone(),
            url,
            is_exact,
            params,
        })
    }

    /// `true` if `pathname` matches.
    pub fn is_match(&self, pathname: &str) -> bool {
        match &self.matcher {
            Matcher::Never => false,
            Matcher::Always => true,
            Matcher::Regex(regex) => regex.is_match(pathname),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(source: &str) -> RoutePattern {
        RoutePattern::compile(source, MatchFlags::EXACT).unwrap()
    }

    fn prefix(source: &str) -> RoutePattern {
        RoutePattern::compile(source, MatchFlags::empty()).unwrap()
    }

    #[test]
    fn test_root_prefix_matches_everything() {
        let root = prefix("/");
        assert!(root.is_match("/"));
        assert!(root.is_match("/a"));
        assert!(root.is_match("/users/42"));

        let matched = root.matches("/b").unwrap();
        assert_eq!(matched.url, "/");
        assert!(!matched.is_exact);
    }

    #[test]
    fn test_root_exact_matches_only_root() {
        let root = exact("/");
        assert!(root.is_match("/"));
        assert!(!root.is_match("/a"));
        assert!(root.matches("/").unwrap().is_exact);
    }

    #[test]
    fn test_prefix_stops_at_segment_boundary() {
        let users = prefix("/users");
        assert!(users.is_match("/users"));
        assert!(users.is_match("/users/"));
        assert!(users.is_match("/users/42"));
        assert!(!users.is_match("/usersx"));
        assert!(!users.is_match("/"));

        let matched = users.matches("/users/42").unwrap();
        assert_eq!(matched.url, "/users");
        assert!(!matched.is_exact);
    }

    #[test]
    fn test_exact_tolerates_trailing_slash() {
        let users = exact("/users");
        assert!(users.is_match("/users"));
        assert!(users.is_match("/users/"));
        assert!(!users.is_match("/users/42"));

        let matched = users.matches("/users/").unwrap();
        assert_eq!(matched.url, "/users/");
        assert!(matched.is_exact);
    }

    #[test]
    fn test_strict_trailing_slash() {
        let pattern = RoutePattern::compile("/users/", MatchFlags::EXACT | MatchFlags::STRICT).unwrap();
        assert!(pattern.is_match("/users/"));
        assert!(!pattern.is_match("/users"));

        let pattern = RoutePattern::compile("/users", MatchFlags::EXACT | MatchFlags::STRICT).unwrap();
        assert!(pattern.is_match("/users"));
        assert!(!pattern.is_match("/users/"));
    }

    #[test]
    fn test_case_sensitivity() {
        assert!(exact("/Users").is_match("/users"));

        let sensitive = RoutePattern::compile("/Users", MatchFlags::EXACT | MatchFlags::SENSITIVE).unwrap();
        assert!(sensitive.is_match("/Users"));
        assert!(!sensitive.is_match("/users"));
    }

    #[test]
    fn test_named_params() {
        let pattern = exact("/users/:id/posts/:post_id");
        let matched = pattern.matches("/users/7/posts/hello-world").unwrap();
        assert_eq!(matched.params["id"], "7");
        assert_eq!(matched.params["post_id"], "hello-world");
        assert_eq!(pattern.keys(), ["id".to_string(), "post_id".to_string()]);

        assert!(!pattern.is_match("/users/7/posts"));
        assert!(!pattern.is_match("/users//posts/x"));
    }

    #[test]
    fn test_optional_param() {
        let pattern = exact("/users/:id?");
        assert!(pattern.is_match("/users"));
        assert!(pattern.matches("/users").unwrap().params.is_empty());
        assert_eq!(pattern.matches("/users/3").unwrap().params["id"], "3");
        assert!(!pattern.is_match("/users/3/4"));
    }

    #[test]
    fn test_repeated_params() {
        let zero_or_more = exact("/files/:path*");
        assert!(zero_or_more.is_match("/files"));
        assert_eq!(zero_or_more.matches("/files/a/b/c").unwrap().params["path"], "a/b/c");

        let one_or_more = exact("/files/:path+");
        assert!(!one_or_more.is_match("/files"));
        assert_eq!(one_or_more.matches("/files/a/b").unwrap().params["path"], "a/b");
    }

    #[test]
    fn test_wildcard() {
        let pattern = exact("/static/*");
        let matched = pattern.matches("/static/css/site.css").unwrap();
        assert_eq!(matched.params["0"], "css/site.css");
        assert!(!pattern.is_match("/other/x"));
    }

    #[test]
    fn test_escaped_and_regex_chars_are_literal() {
        let pattern = exact("/a.b/\\:literal");
        assert!(pattern.is_match("/a.b/:literal"));
        assert!(!pattern.is_match("/axb/:literal"));
    }

    #[test]
    fn test_empty_pattern_always_matches() {
        let pattern = exact("");
        assert!(pattern.is_match("/anything"));
        let matched = pattern.matches("/").unwrap();
        assert_eq!(matched.url, "/");
        assert!(matched.is_exact);
    }

    #[test]
    fn test_never_pattern() {
        let pattern = RoutePattern::never("/(bad", MatchFlags::EXACT);
        assert!(!pattern.is_match("/(bad"));
        assert!(pattern.matches("/").is_none());
        assert_eq!(pattern.source(), "/(bad");
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(
            RoutePattern::compile("/users/:", MatchFlags::empty()),
            Err(PatternError::EmptyParamName { position: 7, .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/users/:id(\\d+)", MatchFlags::empty()),
            Err(PatternError::UnsupportedGroup { .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/(foo)", MatchFlags::empty()),
            Err(PatternError::UnsupportedGroup { position: 1, .. })
        ));
        assert!(matches!(
            RoutePattern::compile("/:id/:id", MatchFlags::empty()),
            Err(PatternError::DuplicateParam { .. })
        ));
    }
}
