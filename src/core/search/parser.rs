//! Query parsing.
//!
//! A query is one or more clauses joined by `&`. A clause starts with a key
//! prefix followed by an operator (`type=dragon`, `cr>10`), is a bare boolean
//! key (`legendary`), or is free text searched by name.
//!
//! A key is recognised only when the clause continues the way that key
//! requires: `=` for text keys, `>`, `<` or `=` for `cr`, and nothing at all
//! for boolean keys. Anything else is a name search, so `crab`, `typewriter`
//! and `legendary dragon` look for monsters with those words in their name
//! rather than being read as `cr`, `type` or `legendary` clauses.

use super::key::{Operator, SearchKey, SearchValueType};

/// One parsed `(key, operator, value)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchClause {
    pub key: SearchKey,
    pub operator: Operator,
    pub value: String,
}

impl SearchClause {
    pub fn new(key: SearchKey, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            key,
            operator,
            value: value.into(),
        }
    }

    fn name(text: &str) -> Self {
        Self::new(SearchKey::Name, Operator::Eq, text)
    }

    /// Value prefixed with its operator symbol, e.g. `">10"`.
    pub fn value_with_operator(&self) -> String {
        format!("{}{}", self.operator.symbol(), self.value)
    }
}

/// Split `query` into clauses, preserving input order. Empty clauses are dropped.
pub fn parse_query(query: &str) -> Vec<SearchClause> {
    query
        .split('&')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(parse_clause)
        .collect()
}

fn parse_clause(clause: &str) -> SearchClause {
    SearchKey::ALL
        .into_iter()
        .find_map(|key| parse_keyed(key, clause))
        .unwrap_or_else(|| SearchClause::name(clause))
}

fn parse_keyed(key: SearchKey, clause: &str) -> Option<SearchClause> {
    let rest = strip_prefix_ignore_case(clause, key.prefix())?.trim_start();

    match key.value_type() {
        SearchValueType::Boolean => rest
            .is_empty()
            .then(|| SearchClause::new(key, Operator::Eq, "true")),
        SearchValueType::String => {
            let value = rest.strip_prefix('=')?;
            Some(SearchClause::new(key, Operator::Eq, value.trim()))
        }
        SearchValueType::Float => {
            // The clause must continue with an operator, otherwise "crab"
            // would be read as a CR query.
            rest.chars().next().and_then(Operator::from_symbol)?;
            let operator = if rest.contains('>') {
                Operator::Gt
            } else if rest.contains('<') {
                Operator::Lt
            } else {
                Operator::Eq
            };
            let value = rest.rsplit(operator.symbol()).next().unwrap_or_default();
            Some(SearchClause::new(key, operator, value.trim()))
        }
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}
