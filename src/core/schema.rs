//! Field-schema expressions and parameter classification.
//!
//! A route record carries a textual constraint expression such as
//! `{id: required number, note: optional string}`. It is parsed into a
//! structured [`SchemaExpr`] of tagged field variants, then the top-level
//! fields are partitioned into required/optional parameter lists with
//! declaration order preserved inside each partition.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::core::error;

/// Parse failure of a schema expression, positioned by byte offset
#[derive(Debug, Error)]
#[error("at offset {pos}: {message}")]
pub struct SchemaParseError {
    pub pos: usize,
    pub message: String,
}

impl SchemaParseError {
    fn new(pos: usize, message: impl Into<String>) -> Self {
        Self {
            pos,
            message: message.into(),
        }
    }
}

/// Presence flag of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Required,
    Optional,
}

/// Tagged value constraint of a schema field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "fields")]
pub enum FieldKind {
    Any,
    String,
    Number,
    Boolean,
    Object(Vec<FieldSpec>),
}

/// One named field with its constraint and presence flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub presence: Presence,
}

/// Structural schema description: an ordered list of top-level fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaExpr {
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LBrace,
    RBrace,
    Colon,
    Comma,
    Word(String),
}

fn tokenize(expr: &str) -> Result<Vec<(usize, Token)>, SchemaParseError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => {
                chars.next();
            }
            '{' => {
                chars.next();
                tokens.push((pos, Token::LBrace));
            }
            '}' => {
                chars.next();
                tokens.push((pos, Token::RBrace));
            }
            ':' => {
                chars.next();
                tokens.push((pos, Token::Colon));
            }
            ',' => {
                chars.next();
                tokens.push((pos, Token::Comma));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((pos, Token::Word(word)));
            }
            other => {
                return Err(SchemaParseError::new(
                    pos,
                    format!("unexpected character '{other}'"),
                ));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    index: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), SchemaParseError> {
        match self.next() {
            Some((_, token)) if token == expected => Ok(()),
            Some((pos, _)) => Err(SchemaParseError::new(pos, format!("expected {what}"))),
            None => Err(SchemaParseError::new(self.end, format!("expected {what}"))),
        }
    }

    /// Parse `{ field, field, ... }` with an optional trailing comma
    fn object(&mut self) -> Result<Vec<FieldSpec>, SchemaParseError> {
        self.expect(Token::LBrace, "'{'")?;
        let mut fields = Vec::new();

        loop {
            match self.peek() {
                Some((_, Token::RBrace)) => {
                    self.next();
                    return Ok(fields);
                }
                Some((_, Token::Word(_))) => {
                    fields.push(self.field()?);
                    match self.next() {
                        Some((_, Token::Comma)) => continue,
                        Some((_, Token::RBrace)) => return Ok(fields),
                        Some((pos, _)) => {
                            return Err(SchemaParseError::new(pos, "expected ',' or '}'"));
                        }
                        None => return Err(SchemaParseError::new(self.end, "expected '}'")),
                    }
                }
                Some((pos, _)) => {
                    return Err(SchemaParseError::new(*pos, "expected field name or '}'"));
                }
                None => return Err(SchemaParseError::new(self.end, "unterminated object")),
            }
        }
    }

    /// Parse `name: [required|optional] [type]` with the modifier and type
    /// keyword accepted in either order
    fn field(&mut self) -> Result<FieldSpec, SchemaParseError> {
        let (name_pos, name) = match self.next() {
            Some((pos, Token::Word(word))) => (pos, word),
            Some((pos, _)) => return Err(SchemaParseError::new(pos, "expected field name")),
            None => return Err(SchemaParseError::new(self.end, "expected field name")),
        };
        self.expect(Token::Colon, "':' after field name")?;

        let mut presence: Option<Presence> = None;
        let mut kind: Option<FieldKind> = None;
        let mut saw_annotation = false;

        while let Some((pos, Token::Word(word))) = self.peek().cloned() {
            self.next();
            saw_annotation = true;
            match word.as_str() {
                "required" | "optional" => {
                    if presence.is_some() {
                        return Err(SchemaParseError::new(pos, "duplicate presence modifier"));
                    }
                    presence = Some(if word == "required" {
                        Presence::Required
                    } else {
                        Presence::Optional
                    });
                }
                "string" | "number" | "boolean" | "object" => {
                    if kind.is_some() {
                        return Err(SchemaParseError::new(pos, "duplicate type keyword"));
                    }
                    kind = Some(match word.as_str() {
                        "string" => FieldKind::String,
                        "number" => FieldKind::Number,
                        "boolean" => FieldKind::Boolean,
                        _ => {
                            // nested shape is optional after `object`
                            if matches!(self.peek(), Some((_, Token::LBrace))) {
                                FieldKind::Object(self.object()?)
                            } else {
                                FieldKind::Object(Vec::new())
                            }
                        }
                    });
                }
                other => {
                    return Err(SchemaParseError::new(
                        pos,
                        format!("unknown constraint keyword '{other}'"),
                    ));
                }
            }
        }

        if !saw_annotation {
            return Err(SchemaParseError::new(
                name_pos,
                format!("field '{name}' has no constraint"),
            ));
        }

        Ok(FieldSpec {
            name,
            kind: kind.unwrap_or(FieldKind::Any),
            presence: presence.unwrap_or(Presence::Optional),
        })
    }
}

impl SchemaExpr {
    /// Parse a textual schema expression.
    ///
    /// The expression must evaluate to an object; anything else (including a
    /// bare type keyword) is a parse failure.
    pub fn parse(expr: &str) -> Result<Self, SchemaParseError> {
        let tokens = tokenize(expr)?;
        let end = expr.len();
        if !matches!(tokens.first(), Some((_, Token::LBrace))) {
            return Err(SchemaParseError::new(
                0,
                "schema must evaluate to an object",
            ));
        }

        let mut parser = Parser { tokens, index: 0, end };
        let fields = parser.object()?;
        if let Some((pos, _)) = parser.peek() {
            return Err(SchemaParseError::new(*pos, "trailing input after '}'"));
        }
        Ok(SchemaExpr { fields })
    }

    /// Render the schema as a validator-builder expression for generated
    /// JavaScript stubs.
    pub fn to_js(&self, indent: usize) -> String {
        render_object(&self.fields, indent)
    }
}

fn render_object(fields: &[FieldSpec], indent: usize) -> String {
    if fields.is_empty() {
        return "validator.object().keys({})".to_string();
    }

    let pad = " ".repeat(indent + 2);
    let close_pad = " ".repeat(indent);
    let body = fields
        .iter()
        .map(|f| format!("{pad}{}: {}", f.name, render_field(f, indent + 2)))
        .collect::<Vec<_>>()
        .join(",\n");

    format!("validator.object().keys({{\n{body}\n{close_pad}}})")
}

fn render_field(field: &FieldSpec, indent: usize) -> String {
    let base = match &field.kind {
        FieldKind::Any => "validator.any()".to_string(),
        FieldKind::String => "validator.string()".to_string(),
        FieldKind::Number => "validator.number()".to_string(),
        FieldKind::Boolean => "validator.boolean()".to_string(),
        FieldKind::Object(fields) => render_object(fields, indent),
    };
    match field.presence {
        Presence::Required => format!("{base}.required()"),
        Presence::Optional => format!("{base}.optional()"),
    }
}

/// Top-level fields partitioned by presence, declaration order preserved
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassifiedParams {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

impl ClassifiedParams {
    pub fn from_schema(schema: &SchemaExpr) -> Self {
        let mut params = ClassifiedParams::default();
        for field in &schema.fields {
            match field.presence {
                Presence::Required => params.required.push(field.name.clone()),
                Presence::Optional => params.optional.push(field.name.clone()),
            }
        }
        params
    }

    /// Final parameter order: required then optional, each in declaration order
    pub fn ordered(&self) -> Vec<String> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .cloned()
            .collect()
    }

    /// [`ordered`](Self::ordered) with the synthetic `token` parameter
    /// appended last when JWT is enabled
    pub fn ordered_with_token(&self, enable_jwt: bool) -> Vec<String> {
        let mut params = self.ordered();
        if enable_jwt {
            params.push("token".to_string());
        }
        params
    }
}

/// Parse and classify a record's schema.
///
/// Parse failures surface as [`error::Error::SchemaEval`], tagged with the
/// record's name.
pub fn classify(name: &str, expr: &str) -> error::Result<(SchemaExpr, ClassifiedParams)> {
    let schema =
        SchemaExpr::parse(expr).map_err(|e| error::Error::schema_eval(name, e.to_string()))?;
    let params = ClassifiedParams::from_schema(&schema);
    Ok((schema, params))
}

/// [`classify`] with the skip-and-continue policy applied: on failure the
/// record proceeds with an empty parameter set.
pub fn classify_with_fallback(name: &str, expr: &str) -> (SchemaExpr, ClassifiedParams) {
    match classify(name, expr) {
        Ok(classified) => classified,
        Err(e) => {
            warn!(
                record = %name,
                error = %e,
                "schema evaluation failed; continuing with empty parameter set"
            );
            (SchemaExpr::default(), ClassifiedParams::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_required_field() {
        let schema = SchemaExpr::parse("{id: required number}").unwrap();
        assert_eq!(schema.fields.len(), 1);
        assert_eq!(schema.fields[0].name, "id");
        assert_eq!(schema.fields[0].kind, FieldKind::Number);
        assert_eq!(schema.fields[0].presence, Presence::Required);
    }

    #[test]
    fn test_parse_modifier_and_type_in_either_order() {
        let a = SchemaExpr::parse("{id: required number}").unwrap();
        let b = SchemaExpr::parse("{id: number required}").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_defaults() {
        let schema = SchemaExpr::parse("{note: string, flag: required}").unwrap();
        assert_eq!(schema.fields[0].presence, Presence::Optional);
        assert_eq!(schema.fields[1].kind, FieldKind::Any);
    }

    #[test]
    fn test_parse_nested_object() {
        let schema =
            SchemaExpr::parse("{meta: optional object {depth: number, tags: string}}").unwrap();
        match &schema.fields[0].kind {
            FieldKind::Object(inner) => {
                assert_eq!(inner.len(), 2);
                assert_eq!(inner[0].name, "depth");
            }
            other => panic!("expected object kind, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_empty_object() {
        let schema = SchemaExpr::parse("{}").unwrap();
        assert!(schema.fields.is_empty());
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(SchemaExpr::parse("string").is_err());
        assert!(SchemaExpr::parse("").is_err());
        assert!(SchemaExpr::parse("{id: number} trailing").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(SchemaExpr::parse("{id required}").is_err());
        assert!(SchemaExpr::parse("{id: banana}").is_err());
        assert!(SchemaExpr::parse("{id: required required}").is_err());
        assert!(SchemaExpr::parse("{id: number").is_err());
    }

    #[test]
    fn test_classify_single_required() {
        let schema = SchemaExpr::parse("{id: required}").unwrap();
        let params = ClassifiedParams::from_schema(&schema);
        assert_eq!(params.required, vec!["id"]);
        assert!(params.optional.is_empty());
        assert_eq!(params.ordered(), vec!["id"]);
    }

    #[test]
    fn test_classify_preserves_declaration_order() {
        // declared optional-first; concatenation is required ++ optional,
        // each preserving declaration order rather than lexical order
        let schema = SchemaExpr::parse("{b: optional, a: required}").unwrap();
        let params = ClassifiedParams::from_schema(&schema);
        assert_eq!(params.required, vec!["a"]);
        assert_eq!(params.optional, vec!["b"]);
        assert_eq!(params.ordered(), vec!["a", "b"]);

        let schema = SchemaExpr::parse("{z: required, y: required, m: optional, k: optional}")
            .unwrap();
        let params = ClassifiedParams::from_schema(&schema);
        assert_eq!(params.ordered(), vec!["z", "y", "m", "k"]);
    }

    #[test]
    fn test_token_appended_last() {
        let schema = SchemaExpr::parse("{id: required, note: optional}").unwrap();
        let params = ClassifiedParams::from_schema(&schema);
        assert_eq!(
            params.ordered_with_token(true),
            vec!["id", "note", "token"]
        );
        assert_eq!(params.ordered_with_token(false), vec!["id", "note"]);
    }

    #[test]
    fn test_classify_tags_failure_with_record_name() {
        let err = classify("user-fetch", "not an object").unwrap_err();
        match err {
            error::Error::SchemaEval { name, reason } => {
                assert_eq!(name, "user-fetch");
                assert!(reason.contains("schema must evaluate to an object"));
            }
            other => panic!("expected SchemaEval, got {other:?}"),
        }
    }

    #[test]
    fn test_fallback_yields_empty_params() {
        let (schema, params) = classify_with_fallback("bad-record", "not an object");
        assert!(schema.fields.is_empty());
        assert!(params.ordered().is_empty());
    }

    #[test]
    fn test_to_js_round_trip_shape() {
        let schema = SchemaExpr::parse("{id: required number, note: optional string}").unwrap();
        let js = schema.to_js(4);
        assert!(js.starts_with("validator.object().keys({"));
        assert!(js.contains("id: validator.number().required()"));
        assert!(js.contains("note: validator.string().optional()"));
    }

    #[test]
    fn test_to_js_empty() {
        assert_eq!(SchemaExpr::default().to_js(0), "validator.object().keys({})");
    }
}
