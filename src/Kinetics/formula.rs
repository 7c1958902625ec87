//! # Formula Tree
//!
//! ## Purpose
//! Symbolic expression tree used by every rate law. Laws are built as trees and rendered
//! twice: an infix text formula (the model-facing form, readable back by `Formula::parse`)
//! and a typeset LaTeX form for reports.
//!
//! ## Key Features
//! - **Builders** that collapse trivial cases (`x^1`, products with one factor, empty sums)
//! - **Infix renderer** with precedence-aware parenthesization
//! - **Typeset renderer** with `\frac`, `\cdot`, `\sqrt` and species in square brackets
//! - **Recursive descent parser** for existing law formulas
//! - **Numeric evaluation** for checking laws against reference values
use crate::Kinetics::kinetic_error::KineticError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Formula {
    Number(f64),
    /// concentration of a species, by species key
    Species(String),
    Parameter(String),
    Sum(Vec<Formula>),
    Difference(Box<Formula>, Box<Formula>),
    Product(Vec<Formula>),
    Quotient(Box<Formula>, Box<Formula>),
    Power(Box<Formula>, Box<Formula>),
    Sqrt(Box<Formula>),
    Negation(Box<Formula>),
    Call { name: String, args: Vec<Formula> },
}

// binding strength used by both renderers
const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_UNARY: u8 = 3;
const PREC_POWER: u8 = 4;
const PREC_ATOM: u8 = 5;

impl Formula {
    pub fn num(value: f64) -> Formula {
        Formula::Number(value)
    }

    pub fn species(key: &str) -> Formula {
        Formula::Species(key.to_string())
    }

    pub fn param(name: &str) -> Formula {
        Formula::Parameter(name.to_string())
    }

    pub fn one() -> Formula {
        Formula::Number(1.0)
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Formula::Number(v) if *v == 1.0)
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Formula::Number(v) if *v == 0.0)
    }

    /// Sum of the terms. Zero terms are dropped, an empty sum is `0`.
    pub fn sum(terms: Vec<Formula>) -> Formula {
        let mut flat = Vec::with_capacity(terms.len());
        for term in terms {
            match term {
                Formula::Sum(inner) => flat.extend(inner),
                t if t.is_zero() => {}
                t => flat.push(t),
            }
        }
        match flat.len() {
            0 => Formula::Number(0.0),
            1 => flat.remove(0),
            _ => Formula::Sum(flat),
        }
    }

    /// Product of the factors. Unit factors are dropped, an empty product is `1`.
    pub fn product(factors: Vec<Formula>) -> Formula {
        let mut flat = Vec::with_capacity(factors.len());
        for factor in factors {
            match factor {
                Formula::Product(inner) => flat.extend(inner),
                f if f.is_one() => {}
                f => flat.push(f),
            }
        }
        match flat.len() {
            0 => Formula::one(),
            1 => flat.remove(0),
            _ => Formula::Product(flat),
        }
    }

    pub fn diff(left: Formula, right: Formula) -> Formula {
        if right.is_zero() {
            return left;
        }
        Formula::Difference(Box::new(left), Box::new(right))
    }

    pub fn frac(numerator: Formula, denominator: Formula) -> Formula {
        if denominator.is_one() {
            return numerator;
        }
        Formula::Quotient(Box::new(numerator), Box::new(denominator))
    }

    /// `base^exponent` with a numeric exponent; `x^1 = x`, `x^0 = 1`.
    pub fn pow(base: Formula, exponent: f64) -> Formula {
        if exponent == 1.0 {
            base
        } else if exponent == 0.0 {
            Formula::one()
        } else {
            Formula::Power(Box::new(base), Box::new(Formula::Number(exponent)))
        }
    }

    pub fn pow_expr(base: Formula, exponent: Formula) -> Formula {
        match exponent {
            Formula::Number(e) => Formula::pow(base, e),
            e => Formula::Power(Box::new(base), Box::new(e)),
        }
    }

    pub fn sqrt(inner: Formula) -> Formula {
        Formula::Sqrt(Box::new(inner))
    }

    pub fn neg(inner: Formula) -> Formula {
        Formula::Negation(Box::new(inner))
    }

    fn precedence(&self) -> u8 {
        match self {
            Formula::Sum(_) | Formula::Difference(_, _) => PREC_SUM,
            Formula::Product(_) | Formula::Quotient(_, _) => PREC_PRODUCT,
            Formula::Negation(_) => PREC_UNARY,
            Formula::Number(v) if *v < 0.0 => PREC_UNARY,
            Formula::Power(_, _) => PREC_POWER,
            _ => PREC_ATOM,
        }
    }

    ///////////////////////////////////INFIX TEXT////////////////////////////////////////////

    /// Infix formula, the form stored in the model.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text_child(&self, out: &mut String, parenthesize: bool) {
        if parenthesize {
            out.push('(');
            self.write_text(out);
            out.push(')');
        } else {
            self.write_text(out);
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Formula::Number(v) => out.push_str(&format_number(*v)),
            Formula::Species(s) | Formula::Parameter(s) => out.push_str(s),
            Formula::Sum(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        out.push('+');
                    }
                    term.write_text_child(out, term.precedence() < PREC_SUM);
                }
            }
            Formula::Difference(left, right) => {
                left.write_text(out);
                out.push('-');
                right.write_text_child(out, right.precedence() <= PREC_SUM);
            }
            Formula::Product(factors) => {
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        out.push('*');
                    }
                    factor.write_text_child(out, factor.precedence() < PREC_PRODUCT);
                }
            }
            Formula::Quotient(num, den) => {
                num.write_text_child(out, num.precedence() < PREC_PRODUCT);
                out.push('/');
                den.write_text_child(out, den.precedence() <= PREC_PRODUCT);
            }
            Formula::Power(base, exponent) => {
                base.write_text_child(out, base.precedence() <= PREC_POWER);
                out.push('^');
                exponent.write_text_child(out, exponent.precedence() < PREC_ATOM);
            }
            Formula::Sqrt(inner) => {
                out.push_str("sqrt(");
                inner.write_text(out);
                out.push(')');
            }
            Formula::Negation(inner) => {
                out.push('-');
                inner.write_text_child(out, inner.precedence() <= PREC_UNARY);
            }
            Formula::Call { name, args } => {
                out.push_str(name);
                out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.write_text(out);
                }
                out.push(')');
            }
        }
    }

    ///////////////////////////////////TYPESET////////////////////////////////////////////////

    /// LaTeX rendering with species keys as labels.
    pub fn to_typeset(&self) -> String {
        self.to_typeset_with(&|key: &str| key.to_string())
    }

    /// LaTeX rendering; `label` maps a species key to the label shown inside the brackets.
    pub fn to_typeset_with(&self, label: &dyn Fn(&str) -> String) -> String {
        let mut out = String::new();
        self.write_typeset(&mut out, label);
        out
    }

    fn write_typeset_child(
        &self,
        out: &mut String,
        label: &dyn Fn(&str) -> String,
        parenthesize: bool,
    ) {
        if parenthesize {
            out.push_str("\\left(");
            self.write_typeset(out, label);
            out.push_str("\\right)");
        } else {
            self.write_typeset(out, label);
        }
    }

    fn write_typeset(&self, out: &mut String, label: &dyn Fn(&str) -> String) {
        match self {
            Formula::Number(v) => out.push_str(&format_number(*v)),
            Formula::Species(s) => {
                out.push_str("[\\mathrm{");
                out.push_str(&escape_tex(&label(s)));
                out.push_str("}]");
            }
            Formula::Parameter(p) => out.push_str(&typeset_parameter(p)),
            Formula::Sum(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" + ");
                    }
                    term.write_typeset_child(out, label, term.precedence() < PREC_SUM);
                }
            }
            Formula::Difference(left, right) => {
                left.write_typeset(out, label);
                out.push_str(" - ");
                right.write_typeset_child(out, label, right.precedence() <= PREC_SUM);
            }
            Formula::Product(factors) => {
                for (i, factor) in factors.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" \\cdot ");
                    }
                    factor.write_typeset_child(out, label, factor.precedence() < PREC_PRODUCT);
                }
            }
            Formula::Quotient(num, den) => {
                out.push_str("\\frac{");
                num.write_typeset(out, label);
                out.push_str("}{");
                den.write_typeset(out, label);
                out.push('}');
            }
            Formula::Power(base, exponent) => {
                base.write_typeset_child(out, label, base.precedence() <= PREC_POWER);
                out.push_str("^{");
                exponent.write_typeset(out, label);
                out.push('}');
            }
            Formula::Sqrt(inner) => {
                out.push_str("\\sqrt{");
                inner.write_typeset(out, label);
                out.push('}');
            }
            Formula::Negation(inner) => {
                out.push('-');
                inner.write_typeset_child(out, label, inner.precedence() <= PREC_UNARY);
            }
            Formula::Call { name, args } => {
                out.push_str("\\mathrm{");
                out.push_str(&escape_tex(name));
                out.push_str("}\\left(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.write_typeset(out, label);
                }
                out.push_str("\\right)");
            }
        }
    }

    ///////////////////////////////////INSPECTION///////////////////////////////////////////////

    fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a Formula)) {
        f(self);
        match self {
            Formula::Sum(items) | Formula::Product(items) => {
                items.iter().for_each(|item| item.visit(f))
            }
            Formula::Call { args, .. } => args.iter().for_each(|item| item.visit(f)),
            Formula::Difference(a, b) | Formula::Quotient(a, b) | Formula::Power(a, b) => {
                a.visit(f);
                b.visit(f);
            }
            Formula::Sqrt(a) | Formula::Negation(a) => a.visit(f),
            Formula::Number(_) | Formula::Species(_) | Formula::Parameter(_) => {}
        }
    }

    pub fn species_symbols(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        self.visit(&mut |node| {
            if let Formula::Species(s) = node {
                found.insert(s.clone());
            }
        });
        found
    }

    pub fn parameter_symbols(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        self.visit(&mut |node| {
            if let Formula::Parameter(p) = node {
                found.insert(p.clone());
            }
        });
        found
    }

    /// Numeric value for the given symbol values. `None` if a symbol is unbound
    /// or an unknown function is called.
    pub fn evaluate(&self, values: &HashMap<String, f64>) -> Option<f64> {
        let value = match self {
            Formula::Number(v) => *v,
            Formula::Species(s) | Formula::Parameter(s) => *values.get(s)?,
            Formula::Sum(items) => {
                let mut acc = 0.0;
                for item in items {
                    acc += item.evaluate(values)?;
                }
                acc
            }
            Formula::Product(items) => {
                let mut acc = 1.0;
                for item in items {
                    acc *= item.evaluate(values)?;
                }
                acc
            }
            Formula::Difference(a, b) => a.evaluate(values)? - b.evaluate(values)?,
            Formula::Quotient(a, b) => a.evaluate(values)? / b.evaluate(values)?,
            Formula::Power(a, b) => a.evaluate(values)?.powf(b.evaluate(values)?),
            Formula::Sqrt(a) => a.evaluate(values)?.sqrt(),
            Formula::Negation(a) => -a.evaluate(values)?,
            Formula::Call { name, args } => {
                let first = args.first()?.evaluate(values)?;
                match name.as_str() {
                    "exp" => first.exp(),
                    "ln" | "log" => first.ln(),
                    "abs" => first.abs(),
                    _ => return None,
                }
            }
        };
        Some(value)
    }

    ///////////////////////////////////PARSER////////////////////////////////////////////////////

    /// Reads an infix formula back into a tree. Identifiers for which `is_species`
    /// returns true become species references, all others become parameters.
    pub fn parse(text: &str, is_species: &dyn Fn(&str) -> bool) -> Result<Formula, KineticError> {
        let tokens = tokenize(text).map_err(|reason| KineticError::FormulaParse {
            formula: text.to_string(),
            reason,
        })?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            is_species,
        };
        let result = parser.expr().and_then(|formula| {
            if parser.pos < parser.tokens.len() {
                Err(format!("unexpected token {:?}", parser.tokens[parser.pos]))
            } else {
                Ok(formula)
            }
        });
        result.map_err(|reason| KineticError::FormulaParse {
            formula: text.to_string(),
            reason,
        })
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

pub(crate) fn escape_tex(s: &str) -> String {
    s.replace('_', "\\_")
}

/// `kM_r1_S` is set as `\mathrm{kM}_{\mathrm{r1\_S}}`
fn typeset_parameter(name: &str) -> String {
    match name.split_once('_') {
        Some((kind, rest)) if !kind.is_empty() && !rest.is_empty() => format!(
            "\\mathrm{{{}}}_{{\\mathrm{{{}}}}}",
            kind,
            escape_tex(rest)
        ),
        _ => format!("\\mathrm{{{}}}", escape_tex(name)),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Comma,
}

fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                i += 1;
            }
            // scientific notation
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let literal: String = chars[start..i].iter().collect();
            let value = literal
                .parse::<f64>()
                .map_err(|_| format!("invalid number {}", literal))?;
            tokens.push(Token::Number(value));
        } else if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
        } else {
            let token = match c {
                '+' | '-' | '*' | '/' | '^' => Token::Op(c),
                '(' => Token::LParen,
                ')' => Token::RParen,
                ',' => Token::Comma,
                other => return Err(format!("unexpected character '{}'", other)),
            };
            tokens.push(token);
            i += 1;
        }
    }
    if tokens.is_empty() {
        return Err("empty formula".to_string());
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    is_species: &'a dyn Fn(&str) -> bool,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), String> {
        match self.next() {
            Some(ref t) if *t == expected => Ok(()),
            Some(t) => Err(format!("expected {:?}, found {:?}", expected, t)),
            None => Err(format!("expected {:?}, found end of formula", expected)),
        }
    }

    fn expr(&mut self) -> Result<Formula, String> {
        let mut left = self.term()?;
        while let Some(Token::Op(op)) = self.peek() {
            let op = *op;
            if op != '+' && op != '-' {
                break;
            }
            self.pos += 1;
            let right = self.term()?;
            left = if op == '+' {
                match left {
                    Formula::Sum(mut terms) => {
                        terms.push(right);
                        Formula::Sum(terms)
                    }
                    other => Formula::Sum(vec![other, right]),
                }
            } else {
                Formula::Difference(Box::new(left), Box::new(right))
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Formula, String> {
        let mut left = self.unary()?;
        while let Some(Token::Op(op)) = self.peek() {
            let op = *op;
            if op != '*' && op != '/' {
                break;
            }
            self.pos += 1;
            let right = self.unary()?;
            left = if op == '*' {
                match left {
                    Formula::Product(mut factors) => {
                        factors.push(right);
                        Formula::Product(factors)
                    }
                    other => Formula::Product(vec![other, right]),
                }
            } else {
                Formula::Quotient(Box::new(left), Box::new(right))
            };
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Formula, String> {
        match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                Ok(Formula::Negation(Box::new(self.unary()?)))
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    // right associative: a^b^c = a^(b^c)
    fn power(&mut self) -> Result<Formula, String> {
        let base = self.atom()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Formula::Power(Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Formula, String> {
        match self.next() {
            Some(Token::Number(v)) => Ok(Formula::Number(v)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if let Some(Token::LParen) = self.peek() {
                    self.pos += 1;
                    let args = self.arguments()?;
                    return call(name, args);
                }
                if (self.is_species)(&name) {
                    Ok(Formula::Species(name))
                } else {
                    Ok(Formula::Parameter(name))
                }
            }
            Some(t) => Err(format!("unexpected token {:?}", t)),
            None => Err("unexpected end of formula".to_string()),
        }
    }

    fn arguments(&mut self) -> Result<Vec<Formula>, String> {
        let mut args = Vec::new();
        if let Some(Token::RParen) = self.peek() {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                Some(t) => return Err(format!("unexpected token {:?} in argument list", t)),
                None => return Err("unclosed argument list".to_string()),
            }
        }
    }
}

fn call(name: String, mut args: Vec<Formula>) -> Result<Formula, String> {
    let arity = args.len();
    if name == "sqrt" {
        if arity != 1 {
            return Err(format!("sqrt expects 1 argument, got {}", arity));
        }
        return Ok(Formula::Sqrt(Box::new(args.remove(0))));
    }
    if name == "pow" {
        if arity != 2 {
            return Err(format!("pow expects 2 arguments, got {}", arity));
        }
        let exponent = args.remove(1);
        let base = args.remove(0);
        return Ok(Formula::Power(Box::new(base), Box::new(exponent)));
    }
    Ok(Formula::Call { name, args })
}
