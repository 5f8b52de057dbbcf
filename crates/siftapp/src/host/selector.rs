//! Selector parsing and matching for the in-memory document.
//!
//! Supports the subset of selector syntax that filter markup uses in
//! practice:
//!
//! - type (`div`), universal (`*`), id (`#grid`), class (`.card`)
//! - attributes: `[attr]`, `[attr=v]`, `[attr~=v]`, `[attr^=v]`, `[attr$=v]`,
//!   `[attr*=v]`, with bare or quoted values
//! - descendant (whitespace) and child (`>`) combinators
//! - comma-separated selector lists
//!
//! Complex selectors keep their subject compound separately and the rest of
//! the chain right-to-left, so matching starts at the candidate node and
//! walks up through its ancestors.

use crate::error::{Result, SiftError};
use crate::model::NodeId;
use std::str::FromStr;

/// Read access a selector needs from a node tree.
pub trait SelectorTarget {
    fn tag(&self, node: NodeId) -> Option<&str>;
    fn attr(&self, node: NodeId, name: &str) -> Option<&str>;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: ancestor descendant
    Descendant,
    /// `>`: parent > child
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr=val]`
    Eq,
    /// `[attr~=val]`
    Includes,
    /// `[attr^=val]`
    Prefix,
    /// `[attr$=val]`
    Suffix,
    /// `[attr*=val]`
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Type(String),
    Universal,
    Id(String),
    Class(String),
    Attribute {
        name: String,
        op: AttrOp,
        value: String,
    },
}

/// Simple selectors with no combinator between them (`div.card[data-x]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// A chain of compound selectors.
///
/// `ancestors[0]` is the compound nearest to the subject, paired with the
/// combinator that links it to the compound on its right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    pub subject: CompoundSelector,
    pub ancestors: Vec<(Combinator, CompoundSelector)>,
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input)
            .parse_list()
            .map(|selectors| Self { selectors })
            .map_err(|reason| SiftError::InvalidSelector {
                selector: input.to_string(),
                reason,
            })
    }

    pub fn selectors(&self) -> &[ComplexSelector] {
        &self.selectors
    }

    /// Whether `node` matches any selector in the list.
    pub fn matches<T: SelectorTarget + ?Sized>(&self, target: &T, node: NodeId) -> bool {
        self.selectors.iter().any(|s| matches_complex(target, node, s))
    }
}

impl FromStr for SelectorList {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn matches_complex<T: SelectorTarget + ?Sized>(target: &T, node: NodeId, selector: &ComplexSelector) -> bool {
    matches_compound(target, node, &selector.subject) && matches_chain(target, node, &selector.ancestors)
}

fn matches_chain<T: SelectorTarget + ?Sized>(
    target: &T,
    node: NodeId,
    chain: &[(Combinator, CompoundSelector)],
) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };

    match combinator {
        Combinator::Child => match target.parent(node) {
            Some(parent) => matches_compound(target, parent, compound) && matches_chain(target, parent, rest),
            None => false,
        },
        Combinator::Descendant => {
            let mut ancestor = target.parent(node);
            while let Some(anc) = ancestor {
                if matches_compound(target, anc, compound) && matches_chain(target, anc, rest) {
                    return true;
                }
                ancestor = target.parent(anc);
            }
            false
        }
    }
}

fn matches_compound<T: SelectorTarget + ?Sized>(target: &T, node: NodeId, compound: &CompoundSelector) -> bool {
    let Some(tag) = target.tag(node) else {
        return false;
    };
    compound.simples.iter().all(|simple| match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(t) => tag.eq_ignore_ascii_case(t),
        SimpleSelector::Id(id) => target.attr(node, "id") == Some(id.as_str()),
        SimpleSelector::Class(class) => target
            .attr(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class)),
        SimpleSelector::Attribute { name, op, value } => match target.attr(node, name) {
            Some(actual) => matches_attribute(actual, *op, value),
            None => false,
        },
    })
}

fn matches_attribute(actual: &str, op: AttrOp, value: &str) -> bool {
    match op {
        AttrOp::Exists => true,
        AttrOp::Eq => actual == value,
        AttrOp::Includes => actual.split_whitespace().any(|word| word == value),
        AttrOp::Prefix => !value.is_empty() && actual.starts_with(value),
        AttrOp::Suffix => !value.is_empty() && actual.ends_with(value),
        AttrOp::Substring => !value.is_empty() && actual.contains(value),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    /// Skips whitespace and reports whether any was skipped.
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn expect(&mut self, expected: char) -> std::result::Result<(), String> {
        match self.bump() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(format!("expected '{}', found '{}'", expected, ch)),
            None => Err(format!("expected '{}', found end of input", expected)),
        }
    }

    fn parse_list(&mut self) -> std::result::Result<Vec<ComplexSelector>, String> {
        let mut selectors = Vec::new();
        loop {
            self.skip_ws();
            selectors.push(self.parse_complex()?);
            self.skip_ws();
            match self.bump() {
                None => return Ok(selectors),
                Some(',') => continue,
                Some(ch) => return Err(format!("unexpected '{}'", ch)),
            }
        }
    }

    fn parse_complex(&mut self) -> std::result::Result<ComplexSelector, String> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    combinators.push(Combinator::Child);
                }
                Some(ch) if had_ws && ch != ',' => combinators.push(Combinator::Descendant),
                _ => break,
            }
            compounds.push(self.parse_compound()?);
        }

        let subject = compounds.pop().ok_or("empty selector")?;
        let ancestors = combinators.into_iter().rev().zip(compounds.into_iter().rev()).collect();
        Ok(ComplexSelector { subject, ancestors })
    }

    fn parse_compound(&mut self) -> std::result::Result<CompoundSelector, String> {
        let mut simples = Vec::new();

        match self.peek() {
            Some('*') => {
                self.bump();
                simples.push(SimpleSelector::Universal);
            }
            Some(ch) if is_ident_char(ch) => {
                simples.push(SimpleSelector::Type(self.parse_ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    simples.push(SimpleSelector::Id(self.parse_ident()?));
                }
                Some('.') => {
                    self.bump();
                    simples.push(SimpleSelector::Class(self.parse_ident()?));
                }
                Some('[') => simples.push(self.parse_attribute()?),
                _ => break,
            }
        }

        if simples.is_empty() {
            return Err(match self.peek() {
                Some(ch) => format!("expected a selector, found '{}'", ch),
                None => "expected a selector, found end of input".to_string(),
            });
        }
        Ok(CompoundSelector { simples })
    }

    fn parse_ident(&mut self) -> std::result::Result<String, String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err("expected an identifier".to_string());
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_attribute(&mut self) -> std::result::Result<SimpleSelector, String> {
        self.expect('[')?;
        self.skip_ws();
        let name = self.parse_ident()?;
        self.skip_ws();

        let op = match self.peek() {
            Some(']') => {
                self.bump();
                return Ok(SimpleSelector::Attribute {
                    name,
                    op: AttrOp::Exists,
                    value: String::new(),
                });
            }
            Some('=') => AttrOp::Eq,
            Some('~') => AttrOp::Includes,
            Some('^') => AttrOp::Prefix,
            Some('$') => AttrOp::Suffix,
            Some('*') => AttrOp::Substring,
            Some(ch) => return Err(format!("unexpected '{}' in attribute selector", ch)),
            None => return Err("unterminated attribute selector".to_string()),
        };
        self.bump();
        if op != AttrOp::Eq {
            self.expect('=')?;
        }
        self.skip_ws();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.expect(quote)?;
                value
            }
            _ => self.parse_ident()?,
        };

        self.skip_ws();
        self.expect(']')?;
        Ok(SimpleSelector::Attribute { name, op, value })
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}
