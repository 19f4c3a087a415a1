//! Restricted literal parser for planner-supplied data.
//!
//! Planner output embeds small data structures written in a loose
//! Python/JSON style, for example
//! `{target_location: "dining table", items_needed: {'plate': 2}}`.
//! This module parses that text into a [`serde_json::Value`] without ever
//! evaluating it: only literals are accepted.
//!
//! Accepted forms:
//! - mappings `{k: v, ...}` whose keys are quoted strings, numbers, or bare
//!   identifiers (a bare key is taken as its own name)
//! - lists `[...]` and tuples `(a, b)` (both become JSON arrays)
//! - single- or double-quoted strings with the usual backslash escapes
//! - integers and floats with an optional sign
//! - `True`/`False`/`None` and `true`/`false`/`null`
//!
//! Anything else (identifiers in value position, calls, operators,
//! comprehensions) is rejected with [`EsmError::GoalLiteral`].
//!
//! # Example
//!
//! ```
//! use esmrs::literal::parse_literal;
//!
//! let value = parse_literal("{items_needed: {'plate': 2,}, 'done': False}").unwrap();
//! assert_eq!(value["items_needed"]["plate"], 2);
//! assert_eq!(value["done"], false);
//!
//! assert!(parse_literal("{'x': __import__('os')}").is_err());
//! ```

use serde_json::{Map, Number, Value};

use crate::{EsmError, Result};

/// Nesting limit for mappings and sequences.
const MAX_DEPTH: usize = 32;

/// Parses `source` as a single literal value.
///
/// Leading and trailing whitespace is ignored; any other trailing text is an
/// error.
pub fn parse_literal(source: &str) -> Result<Value> {
    let mut parser = LiteralParser::new(source);
    parser.skip_whitespace();
    let value = parser.parse_value(0)?;
    parser.skip_whitespace();
    if let Some(c) = parser.peek() {
        return Err(parser.error(format!("unexpected trailing character '{}'", c)));
    }
    Ok(value)
}

struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(match self.peek() {
                Some(c) => format!("expected '{}', found '{}'", expected, c),
                None => format!("expected '{}', found end of input", expected),
            }))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> EsmError {
        EsmError::GoalLiteral {
            position: self.pos,
            message: message.into(),
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value> {
        if depth > MAX_DEPTH {
            return Err(self.error("literal nested too deeply"));
        }
        match self.peek() {
            Some('{') => self.parse_mapping(depth),
            Some('[') => self.parse_sequence(depth, ']'),
            Some('(') => self.parse_parenthesized(depth),
            Some('"') | Some('\'') => self.parse_string().map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                self.parse_number()
            }
            Some(c) if is_identifier_start(c) => {
                let start = self.pos;
                let word = self.parse_identifier();
                match word {
                    "True" | "true" => Ok(Value::Bool(true)),
                    "False" | "false" => Ok(Value::Bool(false)),
                    "None" | "null" => Ok(Value::Null),
                    other => Err(EsmError::GoalLiteral {
                        position: start,
                        message: format!("identifier '{}' is not a literal", other),
                    }),
                }
            }
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_mapping(&mut self, depth: usize) -> Result<Value> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            let key = self.parse_key()?;
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value(depth + 1)?;
            map.insert(key, value);
            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            self.expect('}')?;
            return Ok(Value::Object(map));
        }
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek() {
            Some('"') | Some('\'') => self.parse_string(),
            Some(c) if c == '-' || c.is_ascii_digit() => match self.parse_number()? {
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(self.error("invalid numeric key")),
            },
            Some(c) if is_identifier_start(c) => Ok(self.parse_identifier().to_string()),
            Some(c) => Err(self.error(format!("unexpected character '{}' in key", c))),
            None => Err(self.error("unexpected end of input in mapping")),
        }
    }

    fn parse_sequence(&mut self, depth: usize, close: char) -> Result<Value> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat(close) {
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            self.expect(close)?;
            return Ok(Value::Array(items));
        }
    }

    /// `(x)` is a grouped value, `()` and `(x,)` are tuples.
    fn parse_parenthesized(&mut self, depth: usize) -> Result<Value> {
        self.expect('(')?;
        self.skip_whitespace();
        if self.eat(')') {
            return Ok(Value::Array(Vec::new()));
        }
        let first = self.parse_value(depth + 1)?;
        self.skip_whitespace();
        if self.eat(')') {
            return Ok(first);
        }
        self.expect(',')?;
        let mut items = vec![first];
        loop {
            self.skip_whitespace();
            if self.eat(')') {
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            if self.eat(',') {
                continue;
            }
            self.expect(')')?;
            return Ok(Value::Array(items));
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        let quote = match self.bump() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("expected a quoted string")),
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('0') => '\0',
                        Some('\\') => '\\',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some('u') => self.parse_unicode_escape()?,
                        Some(other) => {
                            out.push('\\');
                            other
                        }
                        None => return Err(self.error("unterminated string")),
                    };
                    out.push(escaped);
                }
                Some('\n') => return Err(self.error("newline in string literal")),
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_unicode_escape(&mut self) -> Result<char> {
        let start = self.pos;
        let digits = self
            .src
            .get(start..start + 4)
            .ok_or_else(|| self.error("truncated \\u escape"))?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.error(format!("invalid \\u escape '{}'", digits)));
        }
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| self.error(format!("invalid \\u escape '{}'", digits)))?;
        self.pos += 4;
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid code point {:x}", code)))
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if matches!(self.peek(), Some('-') | Some('+')) {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('-') | Some('+')) {
                        self.bump();
                    }
                    continue;
                }
                _ => break,
            }
            self.bump();
        }
        let text: String = self.src[start..self.pos].chars().filter(|c| *c != '_').collect();
        let invalid = || EsmError::GoalLiteral {
            position: start,
            message: format!("invalid number '{}'", &text),
        };
        if is_float {
            let parsed: f64 = text.parse().map_err(|_| invalid())?;
            Number::from_f64(parsed).map(Value::Number).ok_or_else(invalid)
        } else if let Ok(parsed) = text.parse::<i64>() {
            Ok(Value::from(parsed))
        } else {
            let parsed: u64 = text.parse().map_err(|_| invalid())?;
            Ok(Value::from(parsed))
        }
    }

    fn parse_identifier(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '_' || c.is_alphanumeric() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_python_style_mapping() {
        let value =
            parse_literal("{'target_location': 'dining_table', 'items_needed': {'plate': 2}}")
                .unwrap();
        assert_eq!(
            value,
            json!({"target_location": "dining_table", "items_needed": {"plate": 2}})
        );
    }

    #[test]
    fn test_parse_bare_keys_and_trailing_commas() {
        let value = parse_literal("{target_location: \"x\", items_needed: {\"a\": 1,},}").unwrap();
        assert_eq!(value, json!({"target_location": "x", "items_needed": {"a": 1}}));
    }

    #[test]
    fn test_parse_keywords_and_numbers() {
        let value = parse_literal("[True, False, None, null, -3, 2.5, 1e3, 1_000]").unwrap();
        assert_eq!(value, json!([true, false, null, null, -3, 2.5, 1000.0, 1000]));
    }

    #[test]
    fn test_parse_integers_beyond_i64() {
        let value = parse_literal("{'plate': 10000000000000000000}").unwrap();
        assert_eq!(value["plate"].as_u64(), Some(10_000_000_000_000_000_000));
        assert!(parse_literal("[-10000000000000000000]").is_err());
        assert!(parse_literal("[100000000000000000000]").is_err());
    }

    #[test]
    fn test_parse_tuples_and_grouping() {
        assert_eq!(parse_literal("(1, 2)").unwrap(), json!([1, 2]));
        assert_eq!(parse_literal("(1,)").unwrap(), json!([1]));
        assert_eq!(parse_literal("()").unwrap(), json!([]));
        assert_eq!(parse_literal("(7)").unwrap(), json!(7));
    }

    #[test]
    fn test_parse_string_escapes() {
        let value = parse_literal(r#"'it\'s "fine"\né'"#).unwrap();
        assert_eq!(value, json!("it's \"fine\"\né"));
    }

    #[test]
    fn test_unicode_escape_needs_four_hex_digits() {
        assert_eq!(parse_literal(r"'\u0041'").unwrap(), json!("A"));
        assert!(parse_literal(r"'\u+041'").is_err());
        assert!(parse_literal(r"'\u-041'").is_err());
        assert!(parse_literal(r"'\u 041'").is_err());
        assert!(parse_literal(r"'\u04'").is_err());
    }

    #[test]
    fn test_parse_unicode_content() {
        let value = parse_literal("{'皿': 2}").unwrap();
        assert_eq!(value["皿"], 2);
    }

    #[test]
    fn test_rejects_calls_and_identifiers() {
        assert!(parse_literal("{'a': open('x')}").is_err());
        assert!(parse_literal("{'a': os}").is_err());
        assert!(parse_literal("__import__('os').system('ls')").is_err());
        assert!(parse_literal("{'a': 1 + 2}").is_err());
    }

    #[test]
    fn test_rejects_unterminated_input() {
        assert!(parse_literal("{'a': 1").is_err());
        assert!(parse_literal("{'a: 1}").is_err());
        assert!(parse_literal("").is_err());
    }

    #[test]
    fn test_rejects_deep_nesting() {
        let deep = format!("{}{}", "[".repeat(100), "]".repeat(100));
        let err = parse_literal(&deep).unwrap_err();
        assert!(matches!(err, EsmError::GoalLiteral { .. }));
    }

    #[test]
    fn test_error_reports_position() {
        match parse_literal("{'a': bad}") {
            Err(EsmError::GoalLiteral { position, message }) => {
                assert_eq!(position, 6);
                assert!(message.contains("bad"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
