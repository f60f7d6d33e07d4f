//! Single-pass scanner over a path string.

use super::{PathGrammar, PathSyntaxError};
use std::iter::Peekable;
use std::str::CharIndices;

pub(super) struct Scanner<'a> {
    path: &'a str,
    grammar: PathGrammar,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Scanner<'a> {
    pub(super) fn new(path: &'a str, grammar: PathGrammar) -> Self {
        Self {
            path,
            grammar,
            chars: path.char_indices().peekable(),
        }
    }

    pub(super) fn run(mut self) -> Result<(), PathSyntaxError> {
        if self.path.is_empty() {
            return Err(error("path is empty", 0));
        }

        self.root()?;

        while let Some(&(offset, ch)) = self.chars.peek() {
            self.chars.next();
            match ch {
                '.' => self.dot_step(offset)?,
                '[' => self.bracket_step(offset)?,
                other => {
                    return Err(error(format!("unexpected character '{other}'"), offset));
                }
            }
        }

        Ok(())
    }

    fn restricted(&self) -> bool {
        self.grammar == PathGrammar::ReferencePath
    }

    fn end_offset(&mut self) -> usize {
        self.chars
            .peek()
            .map_or(self.path.len(), |&(offset, _)| offset)
    }

    fn root(&mut self) -> Result<(), PathSyntaxError> {
        if !matches!(self.chars.next(), Some((_, '$'))) {
            return Err(error("path must start with '$'", 0));
        }
        // `$$` addresses the context object instead of the state input
        if matches!(self.chars.peek(), Some(&(_, '$'))) {
            self.chars.next();
        }
        Ok(())
    }

    fn dot_step(&mut self, start: usize) -> Result<(), PathSyntaxError> {
        if matches!(self.chars.peek(), Some(&(_, '.'))) {
            if self.restricted() {
                return Err(error(
                    "recursive descent is not allowed in a reference path",
                    start,
                ));
            }
            self.chars.next();
            if let Some(&(offset, '[')) = self.chars.peek() {
                self.chars.next();
                return self.bracket_step(offset);
            }
        }

        if let Some(&(offset, '*')) = self.chars.peek() {
            if self.restricted() {
                return Err(error(
                    "wildcards are not allowed in a reference path",
                    offset,
                ));
            }
            self.chars.next();
            return Ok(());
        }

        let mut length = 0;
        while let Some(&(_, ch)) = self.chars.peek() {
            if !is_member_char(ch) {
                break;
            }
            self.chars.next();
            length += 1;
        }

        if length == 0 {
            return Err(error("expected a member name after '.'", start));
        }
        Ok(())
    }

    fn bracket_step(&mut self, start: usize) -> Result<(), PathSyntaxError> {
        self.skip_whitespace();
        let Some(&(offset, ch)) = self.chars.peek() else {
            return Err(error("unterminated '['", start));
        };

        match ch {
            '\'' | '"' => self.quoted_members()?,
            '*' => {
                if self.restricted() {
                    return Err(error(
                        "wildcards are not allowed in a reference path",
                        offset,
                    ));
                }
                self.chars.next();
            }
            '?' => {
                if self.restricted() {
                    return Err(error(
                        "filter expressions are not allowed in a reference path",
                        offset,
                    ));
                }
                self.chars.next();
                match self.chars.peek() {
                    Some(&(_, '(')) => self.expression()?,
                    _ => {
                        let offset = self.end_offset();
                        return Err(error("expected '(' after '?'", offset));
                    }
                }
            }
            '(' => {
                if self.restricted() {
                    return Err(error(
                        "script expressions are not allowed in a reference path",
                        offset,
                    ));
                }
                self.expression()?;
            }
            c if c.is_ascii_digit() || c == '-' || c == ':' => self.index_selectors(offset)?,
            other => {
                return Err(error(
                    format!("unexpected character '{other}' in brackets"),
                    offset,
                ));
            }
        }

        self.skip_whitespace();
        self.expect(']')
    }

    fn quoted_members(&mut self) -> Result<(), PathSyntaxError> {
        loop {
            self.quoted_string()?;
            self.skip_whitespace();
            match self.chars.peek() {
                Some(&(offset, ',')) => {
                    if self.restricted() {
                        return Err(error("unions are not allowed in a reference path", offset));
                    }
                    self.chars.next();
                    self.skip_whitespace();
                }
                _ => return Ok(()),
            }
        }
    }

    fn quoted_string(&mut self) -> Result<(), PathSyntaxError> {
        let (start, quote) = match self.chars.next() {
            Some((offset, ch @ ('\'' | '"'))) => (offset, ch),
            Some((offset, _)) => return Err(error("expected a quoted member name", offset)),
            None => return Err(error("expected a quoted member name", self.path.len())),
        };

        let mut length = 0;
        while let Some((_, ch)) = self.chars.next() {
            if ch == quote {
                if length == 0 {
                    return Err(error("member name is empty", start));
                }
                return Ok(());
            }
            if ch == '\\' && self.chars.next().is_none() {
                break;
            }
            length += 1;
        }

        Err(error("unterminated string literal", start))
    }

    fn index_selectors(&mut self, start: usize) -> Result<(), PathSyntaxError> {
        let mut selectors = 0;
        let mut slice = false;
        let mut negative = false;

        loop {
            self.skip_whitespace();
            let first = self.integer()?;
            if matches!(self.chars.peek(), Some(&(_, ':'))) {
                self.chars.next();
                self.integer()?;
                if matches!(self.chars.peek(), Some(&(_, ':'))) {
                    self.chars.next();
                    self.integer()?;
                }
                slice = true;
            } else {
                match first {
                    Some(is_negative) => negative |= is_negative,
                    None => {
                        let offset = self.end_offset();
                        return Err(error("expected an array index", offset));
                    }
                }
            }
            selectors += 1;

            self.skip_whitespace();
            if matches!(self.chars.peek(), Some(&(_, ','))) {
                self.chars.next();
            } else {
                break;
            }
        }

        if self.restricted() {
            if slice {
                return Err(error("slices are not allowed in a reference path", start));
            }
            if selectors > 1 {
                return Err(error("unions are not allowed in a reference path", start));
            }
            if negative {
                return Err(error(
                    "negative indexes are not allowed in a reference path",
                    start,
                ));
            }
        }
        Ok(())
    }

    /// Consumes an optionally signed integer. Returns whether it was negative,
    /// or `None` when no integer starts here.
    fn integer(&mut self) -> Result<Option<bool>, PathSyntaxError> {
        let negative = match self.chars.peek() {
            Some(&(_, '-')) => {
                self.chars.next();
                true
            }
            _ => false,
        };

        let mut digits = 0;
        while let Some(&(_, ch)) = self.chars.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            self.chars.next();
            digits += 1;
        }

        match (digits, negative) {
            (0, true) => {
                let offset = self.end_offset();
                Err(error("expected digits after '-'", offset))
            }
            (0, false) => Ok(None),
            _ => Ok(Some(negative)),
        }
    }

    /// Consumes a parenthesised expression, honouring nesting and quotes.
    fn expression(&mut self) -> Result<(), PathSyntaxError> {
        let start = self.end_offset();
        let mut depth = 0usize;
        let mut content = 0usize;

        while let Some((offset, ch)) = self.chars.next() {
            match ch {
                '(' => {
                    depth += 1;
                    if depth > 1 {
                        content += 1;
                    }
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        if content == 0 {
                            return Err(error("expression is empty", start));
                        }
                        return Ok(());
                    }
                    content += 1;
                }
                '\'' | '"' => {
                    self.skip_quoted(ch, offset)?;
                    content += 1;
                }
                _ => content += 1,
            }
        }

        Err(error("unbalanced parentheses", start))
    }

    fn skip_quoted(&mut self, quote: char, start: usize) -> Result<(), PathSyntaxError> {
        while let Some((_, ch)) = self.chars.next() {
            if ch == quote {
                return Ok(());
            }
            if ch == '\\' {
                self.chars.next();
            }
        }
        Err(error("unterminated string literal", start))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some(&(_, ch)) if ch == ' ') {
            self.chars.next();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), PathSyntaxError> {
        match self.chars.next() {
            Some((_, ch)) if ch == expected => Ok(()),
            Some((offset, ch)) => Err(error(
                format!("expected '{expected}' but found '{ch}'"),
                offset,
            )),
            None => Err(error(format!("expected '{expected}'"), self.path.len())),
        }
    }
}

fn is_member_char(ch: char) -> bool {
    !ch.is_whitespace()
        && !matches!(
            ch,
            '.' | '[' | ']' | '(' | ')' | '\'' | '"' | '*' | ',' | '?' | '@' | '$'
        )
}

fn error(reason: impl Into<String>, offset: usize) -> PathSyntaxError {
    PathSyntaxError {
        reason: reason.into(),
        offset,
    }
}
