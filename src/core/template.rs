//! Message template parsing, binding and rendering
//!
//! A template is literal text interspersed with `{name}` or `{@name}`
//! references. The `@` prefix marks a destructured reference: its argument is
//! captured as a structured value instead of being stringified. Parsing,
//! binding and rendering are pure and safe to call concurrently.

use super::error::{LoggerError, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Rendered compound values are capped at this length; anything longer is
/// cut and terminated with [`TRUNCATION_MARKER`].
const MAX_RENDERED_VALUE_LEN: usize = 70;
const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal text copied through verbatim
    Text(String),
    /// A property reference such as `{age}` or `{@person}`
    Property {
        name: String,
        destructure: bool,
        /// Original token text, rendered as-is when the property is unbound
        raw: String,
    },
}

#[derive(Debug, Clone)]
pub struct MessageTemplate {
    raw: String,
    tokens: Vec<Token>,
}

impl MessageTemplate {
    /// Parse a raw format string into a template.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidTemplate`] if the format string is empty.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(LoggerError::template("message template may not be empty"));
        }
        Ok(Self {
            raw: raw.to_string(),
            tokens: tokenize(raw),
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Bind positional arguments to the template's property references.
    ///
    /// Arguments are consumed in the order references first appear in the raw
    /// string. A destructured reference stores its argument as-is; a plain
    /// reference stringifies compound arguments at capture time. Arguments
    /// left over once every reference is bound get synthetic keys `a{N}`,
    /// where N is the argument's original position in the full argument list.
    pub fn bind_properties(&self, args: &[Value]) -> HashMap<String, Value> {
        let mut properties = HashMap::new();
        let mut next_arg = 0;

        for token in &self.tokens {
            if next_arg >= args.len() {
                break;
            }
            if let Token::Property { name, destructure, .. } = token {
                properties.insert(name.clone(), capture(&args[next_arg], *destructure));
                next_arg += 1;
            }
        }

        while next_arg < args.len() {
            properties.insert(format!("a{}", next_arg), capture(&args[next_arg], false));
            next_arg += 1;
        }

        properties
    }

    /// Render the template against a property mapping.
    ///
    /// A reference whose property is absent renders as its original token
    /// text (e.g. `{@person}`), so the raw template doubles as a
    /// human-readable fallback.
    pub fn render(&self, properties: Option<&HashMap<String, Value>>) -> String {
        let mut out = String::with_capacity(self.raw.len());
        for token in &self.tokens {
            match token {
                Token::Text(text) => out.push_str(text),
                Token::Property { name, raw, .. } => {
                    match properties.and_then(|p| p.get(name)) {
                        Some(value) => out.push_str(&render_value(value)),
                        None => out.push_str(raw),
                    }
                }
            }
        }
        out
    }
}

fn tokenize(raw: &str) -> Vec<Token> {
    let bytes = raw.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'{' {
            if let Some((name, destructure, end)) = match_property(raw, i) {
                if literal_start < i {
                    tokens.push(Token::Text(raw[literal_start..i].to_string()));
                }
                tokens.push(Token::Property {
                    name,
                    destructure,
                    raw: raw[i..end].to_string(),
                });
                i = end;
                literal_start = i;
                continue;
            }
        }
        i += 1;
    }

    if literal_start < raw.len() {
        tokens.push(Token::Text(raw[literal_start..].to_string()));
    }
    tokens
}

/// Try to match `{@?name}` starting at the `{` byte; a non-match leaves the
/// brace as literal text.
fn match_property(raw: &str, start: usize) -> Option<(String, bool, usize)> {
    let bytes = raw.as_bytes();
    let mut i = start + 1;

    let destructure = bytes.get(i) == Some(&b'@');
    if destructure {
        i += 1;
    }

    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
    }

    if i == name_start || bytes.get(i) != Some(&b'}') {
        return None;
    }
    Some((raw[name_start..i].to_string(), destructure, i + 1))
}

fn capture(value: &Value, destructure: bool) -> Value {
    if destructure {
        return value.clone();
    }
    match value {
        Value::Object(_) | Value::Array(_) => Value::String(value.to_string()),
        other => other.clone(),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(_) | Value::Array(_) => {
            let mut s = value.to_string();
            if s.len() > MAX_RENDERED_VALUE_LEN {
                let mut cut = MAX_RENDERED_VALUE_LEN - TRUNCATION_MARKER.len();
                while !s.is_char_boundary(cut) {
                    cut -= 1;
                }
                s.truncate(cut);
                s.push_str(TRUNCATION_MARKER);
            }
            s
        }
    }
}
