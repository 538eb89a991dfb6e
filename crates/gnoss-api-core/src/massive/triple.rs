//! RDF triples in N-Triples form

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TripleObject {
    Uri(String),
    Literal {
        value: String,
        language: Option<String>,
    },
    TypedLiteral {
        value: String,
        datatype: String,
    },
}

impl TripleObject {
    pub fn uri(uri: impl Into<String>) -> Self {
        Self::Uri(uri.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
        }
    }

    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: Some(language.into()),
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::TypedLiteral {
            value: value.into(),
            datatype: datatype.into(),
        }
    }
}

impl fmt::Display for TripleObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri(uri) => write!(f, "<{}>", escape_uri(uri)),
            Self::Literal {
                value,
                language: None,
            } => write!(f, "\"{}\"", escape_literal(value)),
            Self::Literal {
                value,
                language: Some(lang),
            } => write!(f, "\"{}\"@{}", escape_literal(value), lang),
            Self::TypedLiteral { value, datatype } => {
                write!(f, "\"{}\"^^<{}>", escape_literal(value), escape_uri(datatype))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: TripleObject,
}

impl Triple {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: TripleObject) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    /// One N-Triples line, without the trailing newline
    pub fn to_ntriples(&self) -> String {
        format!(
            "<{}> <{}> {} .",
            escape_uri(&self.subject),
            escape_uri(&self.predicate),
            self.object
        )
    }
}

fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Characters not allowed inside `<...>` become `\u` escapes
fn escape_uri(uri: &str) -> String {
    let mut escaped = String::with_capacity(uri.len());
    for c in uri.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                escaped.push_str(&format!("\\u{:04X}", c as u32))
            }
            c if c <= ' ' => escaped.push_str(&format!("\\u{:04X}", c as u32)),
            _ => escaped.push(c),
        }
    }
    escaped
}
