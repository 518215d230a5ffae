//! Argument parser for glob-accept call sites.
//!
//! Parses the raw statement slice of one call-site into a descriptor. The
//! token layer is a logos lexer over a small JS-expression token set; on
//! top of it a recursive-descent pass validates the call shape, digs the
//! `glob` property out of the first argument, and records the second
//! argument's offsets without interpreting it.
//!
//! Classification is deliberately three-way: a call that merely does not
//! look like a glob-accept call (first argument not an object literal, no
//! ident-keyed `glob` property, or no string globs) is `NotOurs` and
//! silently skipped, so unrelated overloads of `accept` keep working. A
//! call that clearly *is* ours but is written wrong fails hard.

use std::ops::Range;

use logos::Logos;

use crate::error::TransformError;
use crate::scanner::CallSiteMatch;

/// Upper bound on parser steps for one call-site. Bounds pathological
/// inputs the way a wall-clock parse timeout would, but deterministically;
/// exhausting it reports the site as malformed.
const PARSE_FUEL: usize = 65_536;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
enum Tok {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("...")]
    Spread,
    #[token("?.")]
    Optional,
    #[token(".")]
    Dot,
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    #[regex(r#"'([^'\\\n]|\\[^\n])*'"#)]
    Str,
    #[regex(r"`([^`\\]|\\[\s\S])*`")]
    Template,
    #[regex(r"[0-9][0-9a-zA-Z_.]*")]
    Number,
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,
    #[regex(r".", priority = 1)]
    Other,
}

/// Offsets of the second call argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackDescriptor {
    /// Start of the callback expression (inside the spread, if any).
    pub start: usize,
    /// End of the callback expression.
    pub end: usize,
    /// Offset of the `...` token when the argument was a spread element.
    pub spread_start: Option<usize>,
}

/// Structured description of one glob-accept call-site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobDescriptor {
    /// Glob strings in source order. Never empty.
    pub raw_globs: Vec<String>,
    /// True iff every raw glob begins with `.` or `!`. Governs specifier
    /// style, not matching semantics.
    pub is_relative_style: bool,
    /// Start of the first argument (the object literal).
    pub arg_start: usize,
    /// End of the first argument.
    pub arg_end: usize,
    /// Second argument, when present.
    pub callback: Option<CallbackDescriptor>,
}

/// Outcome of classifying one candidate call-site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// Not a glob-accept call; skip silently.
    NotOurs,
    /// A well-formed glob-accept call.
    Valid(GlobDescriptor),
}

/// Parse and classify the statement slice of one call-site.
///
/// All offsets in the result (and in errors) are absolute within `code`.
pub fn parse_call_site(code: &str, site: CallSiteMatch) -> Result<Classified, TransformError> {
    let src = &code[site.start..site.end];
    let mut parser = Parser {
        src,
        toks: lex(src),
        pos: 0,
        base: site.start,
        fuel: PARSE_FUEL,
    };
    parser.parse()
}

fn lex(src: &str) -> Vec<(Tok, Range<usize>)> {
    let mut lexer = Tok::lexer(src);
    let mut toks = Vec::new();
    while let Some(tok) = lexer.next() {
        // The catch-all arm makes the token set total; anything the lexer
        // still rejects is carried as an opaque single char.
        toks.push((tok.unwrap_or(Tok::Other), lexer.span()));
    }
    toks
}

struct Parser<'a> {
    src: &'a str,
    toks: Vec<(Tok, Range<usize>)>,
    pos: usize,
    base: usize,
    fuel: usize,
}

impl<'a> Parser<'a> {
    fn parse(&mut self) -> Result<Classified, TransformError> {
        self.parse_callee()?;

        // First argument must be an object literal, or this call simply
        // is not ours.
        if self.peek() != Some(Tok::LBrace) {
            return Ok(Classified::NotOurs);
        }
        let (obj_span, raw_globs) = self.parse_object()?;
        if raw_globs.is_empty() {
            return Ok(Classified::NotOurs);
        }

        let callback = self.parse_callback_arg()?;

        match self.peek() {
            Some(Tok::RParen) => {
                self.bump()?;
            }
            _ => return Err(self.malformed("close parenthesis not found")),
        }

        let is_relative_style = raw_globs
            .iter()
            .all(|g| g.starts_with('.') || g.starts_with('!'));

        Ok(Classified::Valid(GlobDescriptor {
            raw_globs,
            is_relative_style,
            arg_start: self.base + obj_span.start,
            arg_end: self.base + obj_span.end,
            callback,
        }))
    }

    /// Consume the identifier access chain up to and including the opening
    /// parenthesis, unwrapping optional chaining along the way.
    fn parse_callee(&mut self) -> Result<(), TransformError> {
        match self.bump()? {
            (Tok::Ident, _) => {}
            (_, span) => return Err(self.shape_err(&span)),
        }
        loop {
            match self.peek() {
                Some(Tok::Dot) | Some(Tok::Optional) => {
                    self.bump()?;
                    match self.bump()? {
                        (Tok::Ident, _) => {}
                        (_, span) => return Err(self.shape_err(&span)),
                    }
                }
                Some(Tok::LParen) => {
                    self.bump()?;
                    return Ok(());
                }
                Some(_) => {
                    let span = self.toks[self.pos].1.clone();
                    return Err(self.shape_err(&span));
                }
                None => return Err(self.malformed("unexpected end of call")),
            }
        }
    }

    /// Parse the object literal of the first argument, collecting glob
    /// strings from an ident-keyed `glob` property. Returns the object's
    /// slice-relative span and the collected globs (possibly none).
    fn parse_object(&mut self) -> Result<(Range<usize>, Vec<String>), TransformError> {
        let (_, open) = self.bump()?;
        let mut globs = Vec::new();
        let mut seen_glob = false;
        loop {
            match self.peek() {
                None => return Err(self.malformed("unexpected end of object literal")),
                Some(Tok::RBrace) => {
                    let (_, close) = self.bump()?;
                    return Ok((open.start..close.end, globs));
                }
                Some(Tok::Comma) => {
                    self.bump()?;
                }
                // only the first glob property counts
                Some(Tok::Ident)
                    if !seen_glob
                        && self.token_text(self.pos) == "glob"
                        && self.tok_at(self.pos + 1) == Some(Tok::Colon) =>
                {
                    seen_glob = true;
                    self.bump()?;
                    self.bump()?;
                    self.parse_glob_value(&mut globs)?;
                }
                Some(_) => {
                    // spread, shorthand, computed key, method, other props
                    self.skip_expression()?;
                }
            }
        }
    }

    /// Parse the value of the `glob` property: a string, a
    /// no-interpolation template, or an array of such. Any other value
    /// shape is skipped, leaving the glob list empty.
    fn parse_glob_value(&mut self, globs: &mut Vec<String>) -> Result<(), TransformError> {
        match self.peek() {
            Some(Tok::Str) => {
                let (_, span) = self.bump()?;
                globs.push(cook_string(self.text(&span)));
            }
            Some(Tok::Template) => {
                let (_, span) = self.bump()?;
                globs.push(self.template_raw(&span)?);
            }
            Some(Tok::Number) => {
                return Err(self.glob_err("expected glob to be a string, but got \"number\""))
            }
            Some(Tok::Ident) if self.literal_type_name(self.pos).is_some() => {
                let name = self.literal_type_name(self.pos).unwrap_or("object");
                return Err(
                    self.glob_err(&format!("expected glob to be a string, but got \"{}\"", name))
                );
            }
            Some(Tok::LBracket) => {
                self.bump()?;
                loop {
                    match self.peek() {
                        None => return Err(self.malformed("unexpected end of glob array")),
                        Some(Tok::RBracket) => {
                            self.bump()?;
                            break;
                        }
                        Some(Tok::Comma) => {
                            self.bump()?;
                        }
                        Some(Tok::Str) => {
                            let (_, span) = self.bump()?;
                            globs.push(cook_string(self.text(&span)));
                        }
                        Some(Tok::Template) => {
                            let (_, span) = self.bump()?;
                            globs.push(self.template_raw(&span)?);
                        }
                        Some(Tok::Number) => {
                            return Err(self.glob_err(
                                "expected glob to be a string, but got \"number\"",
                            ))
                        }
                        Some(Tok::Ident) if self.literal_type_name(self.pos).is_some() => {
                            let name = self.literal_type_name(self.pos).unwrap_or("object");
                            return Err(self.glob_err(&format!(
                                "expected glob to be a string, but got \"{}\"",
                                name
                            )));
                        }
                        Some(_) => {
                            // non-literal elements are ignored, not errors
                            self.skip_expression()?;
                        }
                    }
                }
            }
            _ => {
                self.skip_expression()?;
            }
        }
        Ok(())
    }

    /// Parse the optional second argument, capturing its offsets. Extra
    /// arguments past the second are skipped and left untouched.
    fn parse_callback_arg(&mut self) -> Result<Option<CallbackDescriptor>, TransformError> {
        if self.peek() != Some(Tok::Comma) {
            return Ok(None);
        }
        self.bump()?;

        let callback = match self.peek() {
            Some(Tok::RParen) | None => None,
            Some(Tok::Spread) => {
                let (_, spread) = self.bump()?;
                let span = self.skip_expression()?;
                Some(CallbackDescriptor {
                    start: self.base + span.start,
                    end: self.base + span.end,
                    spread_start: Some(self.base + spread.start),
                })
            }
            Some(_) => {
                let span = self.skip_expression()?;
                Some(CallbackDescriptor {
                    start: self.base + span.start,
                    end: self.base + span.end,
                    spread_start: None,
                })
            }
        };

        while self.peek() == Some(Tok::Comma) {
            self.bump()?;
            if matches!(self.peek(), Some(Tok::RParen) | None) {
                break;
            }
            self.skip_expression()?;
        }

        Ok(callback)
    }

    /// Consume one balanced expression: tokens up to (not including) a
    /// top-level `,`, `)`, `]`, or `}`. Returns its slice-relative span.
    fn skip_expression(&mut self) -> Result<Range<usize>, TransformError> {
        let mut depth = 0usize;
        let mut span: Option<Range<usize>> = None;
        loop {
            let tok = match self.peek() {
                Some(t) => t,
                None => break,
            };
            if depth == 0
                && matches!(tok, Tok::Comma | Tok::RParen | Tok::RBracket | Tok::RBrace)
            {
                break;
            }
            let (t, s) = self.bump()?;
            match t {
                Tok::LParen | Tok::LBrace | Tok::LBracket => depth += 1,
                Tok::RParen | Tok::RBrace | Tok::RBracket => depth -= 1,
                _ => {}
            }
            span = Some(match span {
                None => s,
                Some(prev) => prev.start..s.end,
            });
        }
        span.ok_or_else(|| self.malformed("expected expression"))
    }

    fn peek(&self) -> Option<Tok> {
        self.tok_at(self.pos)
    }

    fn tok_at(&self, pos: usize) -> Option<Tok> {
        self.toks.get(pos).map(|(t, _)| *t)
    }

    fn token_text(&self, pos: usize) -> &str {
        self.toks
            .get(pos)
            .map(|(_, s)| &self.src[s.clone()])
            .unwrap_or("")
    }

    /// JS `typeof` name for keyword literals, as the diagnostics report
    /// them (`typeof null` is famously `"object"`).
    fn literal_type_name(&self, pos: usize) -> Option<&'static str> {
        match self.token_text(pos) {
            "true" | "false" => Some("boolean"),
            "null" => Some("object"),
            _ => None,
        }
    }

    fn text(&self, span: &Range<usize>) -> &str {
        &self.src[span.clone()]
    }

    /// Template raw content, rejecting interpolation.
    fn template_raw(&self, span: &Range<usize>) -> Result<String, TransformError> {
        let inner = &self.src[span.start + 1..span.end - 1];
        let mut chars = inner.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    chars.next();
                }
                '$' if chars.peek() == Some(&'{') => {
                    return Err(
                        self.glob_err("expected glob to be a string, but got dynamic template literal")
                    );
                }
                _ => {}
            }
        }
        Ok(inner.to_string())
    }

    fn bump(&mut self) -> Result<(Tok, Range<usize>), TransformError> {
        if self.fuel == 0 {
            return Err(TransformError::MalformedCall {
                pos: self.base,
                reason: "parse budget exceeded".into(),
            });
        }
        self.fuel -= 1;
        match self.toks.get(self.pos) {
            Some((t, s)) => {
                let result = (*t, s.clone());
                self.pos += 1;
                Ok(result)
            }
            None => Err(self.malformed("unexpected end of call")),
        }
    }

    fn malformed(&self, reason: &str) -> TransformError {
        TransformError::MalformedCall {
            pos: self.base,
            reason: reason.into(),
        }
    }

    fn shape_err(&self, span: &Range<usize>) -> TransformError {
        TransformError::InvalidCallShape {
            pos: self.base,
            found: format!("\"{}\"", &self.src[span.clone()]),
        }
    }

    fn glob_err(&self, reason: &str) -> TransformError {
        TransformError::InvalidGlobValue {
            pos: self.base,
            reason: reason.into(),
        }
    }
}

/// Cooked value of a quoted string token (quotes stripped, escapes
/// interpreted the way JS does, unknown escapes dropping the backslash).
fn cook_string(raw: &str) -> String {
    let inner: Vec<char> = raw[1..raw.len() - 1].chars().collect();
    let mut out = String::with_capacity(inner.len());
    let mut i = 0;
    while i < inner.len() {
        let c = inner[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }
        i += 1;
        let Some(&esc) = inner.get(i) else { break };
        i += 1;
        match esc {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' => out.push('\0'),
            'x' => {
                if let Some(ch) = hex_escape(&inner, &mut i, 2) {
                    out.push(ch);
                }
            }
            'u' => {
                if inner.get(i) == Some(&'{') {
                    let close = inner[i..].iter().position(|&c| c == '}');
                    if let Some(rel) = close {
                        let digits: String = inner[i + 1..i + rel].iter().collect();
                        if let Some(ch) =
                            u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32)
                        {
                            out.push(ch);
                        }
                        i += rel + 1;
                    }
                } else if let Some(ch) = hex_escape(&inner, &mut i, 4) {
                    out.push(ch);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn hex_escape(chars: &[char], i: &mut usize, len: usize) -> Option<char> {
    if *i + len > chars.len() {
        return None;
    }
    let digits: String = chars[*i..*i + len].iter().collect();
    let value = u32::from_str_radix(&digits, 16).ok()?;
    *i += len;
    char::from_u32(value)
}
