//! Selector Parser
//!
//! Hand-written recursive descent over the selector text.

use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};
use crate::SelectorError;

/// Selector parser over a single input string
pub struct SelectorParser<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            pos: 0,
        }
    }

    /// Parse a comma-separated selector list, consuming all input
    pub fn parse_list(&mut self) -> Result<SelectorList, SelectorError> {
        if self.input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                None => break,
                Some(found) => return Err(self.unexpected(found)),
            }
        }
        Ok(SelectorList(selectors))
    }

    /// Parse a single compound selector, consuming all input (`:not()` argument)
    pub fn parse_compound_only(&mut self) -> Result<CompoundSelector, SelectorError> {
        self.skip_whitespace();
        let compound = self.parse_compound()?;
        self.skip_whitespace();
        match self.peek() {
            None => Ok(compound),
            Some(found) => Err(self.unexpected(found)),
        }
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(found) => return Err(self.unexpected(found)),
            };
            let combinator_offset = self.offset();
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_whitespace();
            }

            match self.peek() {
                None | Some(',') | Some('>') | Some('+') | Some('~') => {
                    return Err(SelectorError::DanglingCombinator(combinator_offset));
                }
                _ => {}
            }
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();

        match self.peek() {
            Some('*') => {
                self.pos += 1;
                components.push(SelectorComponent::Universal);
            }
            Some(c) if is_ident_start(c) => {
                components.push(SelectorComponent::Type(self.parse_ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }

        while let Some(c) = self.peek() {
            let component = match c {
                '#' => {
                    self.pos += 1;
                    SelectorComponent::Id(self.parse_ident()?)
                }
                '.' => {
                    self.pos += 1;
                    SelectorComponent::Class(self.parse_ident()?)
                }
                '[' => SelectorComponent::Attribute(self.parse_attribute()?),
                ':' => SelectorComponent::PseudoClass(self.parse_pseudo_class()?),
                _ => break,
            };
            components.push(component);
        }

        if components.is_empty() {
            return Err(match self.peek() {
                Some(found) => self.unexpected(found),
                None => SelectorError::UnexpectedEnd,
            });
        }
        Ok(CompoundSelector { components })
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.expect('[')?;
        self.skip_whitespace();
        let name = self.parse_ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.eat(']') {
            return Ok(AttributeSelector { name, matcher: None, case_insensitive: false });
        }

        let op = match self.peek() {
            Some('=') => None,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.pos += 1;
                Some(c)
            }
            Some(found) => return Err(self.unexpected(found)),
            None => return Err(SelectorError::UnexpectedEnd),
        };
        self.expect('=')?;
        self.skip_whitespace();
        let value = self.parse_attribute_value()?;
        self.skip_whitespace();

        let case_insensitive = match self.peek() {
            Some('i' | 'I') => {
                self.pos += 1;
                self.skip_whitespace();
                true
            }
            Some('s' | 'S') => {
                self.pos += 1;
                self.skip_whitespace();
                false
            }
            _ => false,
        };
        self.expect(']')?;

        let matcher = match op {
            None => AttributeMatcher::Exact(value),
            Some('~') => AttributeMatcher::Contains(value),
            Some('|') => AttributeMatcher::DashMatch(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            Some(_) => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector { name, matcher: Some(matcher), case_insensitive })
    }

    fn parse_attribute_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.offset();
                while let Some(c) = self.peek() {
                    if c == quote {
                        let value = self.input[start..self.offset()].to_string();
                        self.pos += 1;
                        return Ok(value);
                    }
                    self.pos += 1;
                }
                Err(SelectorError::UnexpectedEnd)
            }
            _ => self.parse_ident(),
        }
    }

    fn parse_pseudo_class(&mut self) -> Result<PseudoClass, SelectorError> {
        self.expect(':')?;
        if self.eat(':') {
            return Err(SelectorError::UnsupportedPseudoElement(self.parse_ident()?));
        }
        let name = self.parse_ident()?.to_ascii_lowercase();
        let argument = if self.eat('(') { Some(self.parse_parenthesized()?) } else { None };

        let nth = |arg: &str| NthExpression::parse(arg).ok_or_else(|| SelectorError::InvalidNth(arg.to_string()));

        match (name.as_str(), argument.as_deref()) {
            ("root", None) => Ok(PseudoClass::Root),
            ("empty", None) => Ok(PseudoClass::Empty),
            ("first-child", None) => Ok(PseudoClass::FirstChild),
            ("last-child", None) => Ok(PseudoClass::LastChild),
            ("only-child", None) => Ok(PseudoClass::OnlyChild),
            ("nth-child", Some(arg)) => Ok(PseudoClass::NthChild(nth(arg)?)),
            ("nth-last-child", Some(arg)) => Ok(PseudoClass::NthLastChild(nth(arg)?)),
            ("not", Some(arg)) => {
                let inner = SelectorParser::new(arg).parse_compound_only()?;
                Ok(PseudoClass::Not(Box::new(inner)))
            }
            _ => Err(SelectorError::UnsupportedPseudoClass(name.clone())),
        }
    }

    /// Text up to the matching `)`, which is consumed
    fn parse_parenthesized(&mut self) -> Result<String, SelectorError> {
        let start = self.offset();
        let mut depth = 1;
        while let Some(c) = self.peek() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        let arg = self.input[start..self.offset()].to_string();
                        self.pos += 1;
                        return Ok(arg);
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(SelectorError::UnexpectedEnd)
    }

    fn parse_ident(&mut self) -> Result<String, SelectorError> {
        let start = self.offset();
        match self.peek() {
            Some('-') => {
                // A leading hyphen must be followed by a name character
                match self.chars.get(self.pos + 1).map(|&(_, c)| c) {
                    Some(c) if is_ident_start(c) || c == '-' => {}
                    _ => return Err(SelectorError::ExpectedIdentifier(start)),
                }
            }
            Some(c) if is_ident_start(c) => {}
            _ => return Err(SelectorError::ExpectedIdentifier(start)),
        }
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        Ok(self.input[start..self.offset()].to_string())
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos != start
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    /// Byte offset of the current position
    fn offset(&self) -> usize {
        self.chars.get(self.pos).map_or(self.input.len(), |&(i, _)| i)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(found) => Err(self.unexpected(found)),
            None => Err(SelectorError::UnexpectedEnd),
        }
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::UnexpectedChar { found, offset: self.offset() }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}
