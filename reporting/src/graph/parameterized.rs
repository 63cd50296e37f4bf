// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Parameterized SPARQL query strings
//!
//! A query template contains `@name` placeholders. Bindings are typed so that
//! URIs, literals and `VALUES` lists are rendered with the right syntax.
//! Placeholders are replaced as whole words: binding `@distribution` never
//! touches `@distributionEndpoints`. Unbound placeholders are left as they are.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder pattern is valid"));

/// Prefixes prepended to every rendered query
pub const STANDARD_PREFIXES: &str = "PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX sh: <http://www.w3.org/ns/shacl#>
PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
";

/// A value bound to a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// Rendered as `<uri>`
    Uri(String),
    /// Inserted verbatim (FROM clauses, pre-rendered fragments)
    PlainLiteral(String),
    /// Rendered as a quoted, escaped string with an optional language tag
    Literal {
        value: String,
        language: Option<String>,
    },
    /// Rendered as `"value"^^<datatype>`
    TypedLiteral { value: String, datatype: String },
    /// Rendered as a whitespace separated list of `<uri>` for VALUES clauses
    UriList(Vec<String>),
}

impl Binding {
    fn render(&self) -> String {
        match self {
            Binding::Uri(uri) => render_uri(uri),
            Binding::PlainLiteral(text) => text.clone(),
            Binding::Literal { value, language } => match language {
                Some(lang) => format!("\"{}\"@{}", escape_literal(value), lang),
                None => format!("\"{}\"", escape_literal(value)),
            },
            Binding::TypedLiteral { value, datatype } => {
                format!("\"{}\"^^{}", escape_literal(value), render_uri(datatype))
            }
            Binding::UriList(uris) => join_as_values_list(uris),
        }
    }
}

/// A SPARQL command text plus its bindings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterizedQuery {
    command_text: String,
    bindings: HashMap<String, Binding>,
}

impl ParameterizedQuery {
    pub fn new(command_text: impl Into<String>) -> Self {
        Self {
            command_text: command_text.into(),
            bindings: HashMap::new(),
        }
    }

    pub fn command_text(&self) -> &str {
        &self.command_text
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn bindings(&self) -> &HashMap<String, Binding> {
        &self.bindings
    }

    pub fn set(&mut self, name: &str, binding: Binding) -> &mut Self {
        self.bindings.insert(name.to_string(), binding);
        self
    }

    pub fn set_uri(&mut self, name: &str, uri: impl AsRef<str>) -> &mut Self {
        self.set(name, Binding::Uri(uri.as_ref().to_string()))
    }

    pub fn set_plain_literal(&mut self, name: &str, text: impl Into<String>) -> &mut Self {
        self.set(name, Binding::PlainLiteral(text.into()))
    }

    pub fn set_literal(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.set(
            name,
            Binding::Literal {
                value: value.into(),
                language: None,
            },
        )
    }

    pub fn set_typed_literal(
        &mut self,
        name: &str,
        value: impl Into<String>,
        datatype: impl Into<String>,
    ) -> &mut Self {
        self.set(
            name,
            Binding::TypedLiteral {
                value: value.into(),
                datatype: datatype.into(),
            },
        )
    }

    pub fn set_uri_list<I, S>(&mut self, name: &str, uris: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let uris = uris.into_iter().map(|u| u.as_ref().to_string()).collect();
        self.set(name, Binding::UriList(uris))
    }

    /// Render the final query text, including the standard prefixes
    pub fn render(&self) -> String {
        let body = PLACEHOLDER.replace_all(&self.command_text, |caps: &Captures| {
            match self.bindings.get(&caps[1]) {
                Some(binding) => binding.render(),
                None => caps[0].to_string(),
            }
        });
        format!("{}{}", STANDARD_PREFIXES, body)
    }
}

/// Render a URI, percent-encoding characters that may not appear in an IRI reference
pub fn render_uri(uri: &str) -> String {
    let mut out = String::with_capacity(uri.len() + 2);
    out.push('<');
    for c in uri.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                out.push_str(&format!("%{:02X}", c as u32))
            }
            c if c.is_whitespace() => out.push_str(&format!("%{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('>');
    out
}

/// Join URIs into the body of a VALUES clause
pub fn join_as_values_list<S: AsRef<str>>(uris: &[S]) -> String {
    uris.iter()
        .map(|u| render_uri(u.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(query: &ParameterizedQuery) -> String {
        query.render()[STANDARD_PREFIXES.len()..].to_string()
    }

    #[test]
    fn test_uri_binding() {
        let mut query = ParameterizedQuery::new("SELECT * WHERE { ?s @predicate ?o }");
        query.set_uri("predicate", "http://example.org/p");
        assert_eq!(body(&query), "SELECT * WHERE { ?s <http://example.org/p> ?o }");
    }

    #[test]
    fn test_placeholders_match_whole_words() {
        let mut query =
            ParameterizedQuery::new("?r @distribution ?o . FILTER(?g != @distributionEndpoints)");
        query.set_uri("distribution", "http://ex/d");
        query.set_uri("distributionEndpoints", "http://ex/de");
        assert_eq!(
            body(&query),
            "?r <http://ex/d> ?o . FILTER(?g != <http://ex/de>)"
        );
    }

    #[test]
    fn test_unbound_placeholders_are_kept() {
        let query = ParameterizedQuery::new("FILTER(lang(?l) = \"x\"@en) @missing");
        assert_eq!(body(&query), "FILTER(lang(?l) = \"x\"@en) @missing");
    }

    #[test]
    fn test_literals_are_escaped() {
        let mut query = ParameterizedQuery::new("?s ?p @value");
        query.set_literal("value", "say \"hi\"\n\\");
        assert_eq!(body(&query), "?s ?p \"say \\\"hi\\\"\\n\\\\\"");
    }

    #[test]
    fn test_typed_literal_and_plain_literal() {
        let mut query = ParameterizedQuery::new("@from WHERE { ?t @abstract @yes }");
        query.set_plain_literal("from", "FROM <http://g/1>");
        query.set_uri("abstract", "http://ex/isAbstract");
        query.set_typed_literal("yes", "true", "http://www.w3.org/2001/XMLSchema#boolean");
        assert_eq!(
            body(&query),
            "FROM <http://g/1> WHERE { ?t <http://ex/isAbstract> \"true\"^^<http://www.w3.org/2001/XMLSchema#boolean> }"
        );
    }

    #[test]
    fn test_uri_list_renders_values_body() {
        let mut query = ParameterizedQuery::new("VALUES ?type { @types }");
        query.set_uri_list("types", ["http://ex/A", "http://ex/B"]);
        assert_eq!(body(&query), "VALUES ?type { <http://ex/A> <http://ex/B> }");
    }

    #[test]
    fn test_bound_values_are_not_rescanned() {
        let mut query = ParameterizedQuery::new("?s ?p @email");
        query.set_literal("email", "someone@example.org");
        query.set_uri("example", "http://should/not/appear");
        assert_eq!(body(&query), "?s ?p \"someone@example.org\"");
    }

    #[test]
    fn test_render_uri_encodes_forbidden_characters() {
        assert_eq!(render_uri("http://ex/a b>"), "<http://ex/a%20b%3E>");
    }
}
