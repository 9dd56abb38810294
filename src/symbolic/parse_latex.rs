//! # LaTeX front end
//!
//! Reads the subset of LaTeX math that people type for a function of one variable and
//! builds the same [`Expr`] tree as the arithmetic parser.
//!
//! Supported: numbers, single-letter symbols (`e` is Euler's number), `+ - * /`, `\cdot`,
//! `\times`, `\div`, `^{..}` and one-character exponents, `\frac{..}{..}`, `\sqrt{..}`,
//! `\sqrt[n]{..}`, `\left( .. \right)`, `|..|`, `\pi`, the trigonometric family, `\ln`,
//! `\log` (optionally `\log_{b}`), `\exp`, and implicit multiplication such as `2x`,
//! `x\sin(x)` or `(x+1)(x-1)`. Function arguments may be braced, bracketed or bare
//! (`\sin x`, `\sin 2x`).
//!
//! Anything else (spacing macros, `\mathrm`, `\displaystyle`, ...) is refused here; the
//! evaluator retries with [`relax_latex`] applied.

use crate::symbolic::parse_expr::{MAX_NESTING_DEPTH, apply_function};
use crate::symbolic::symbolic_engine::Expr;
use regex::Regex;
use std::f64::consts::{E, PI};
use std::sync::LazyLock;

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(String),
    /// single letter symbol
    Letter(char),
    /// `\name` or `\` followed by one non-letter character
    Command(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Underscore,
    LPar,
    RPar,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Pipe,
}

/// Splits a LaTeX string into tokens.
pub fn tokenize(s: &str) -> Result<Vec<Tok>, String> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() || c == '.' {
            let start = i;
            let mut seen_dot = false;
            while i < chars.len() && (chars[i].is_ascii_digit() || (chars[i] == '.' && !seen_dot)) {
                seen_dot |= chars[i] == '.';
                i += 1;
            }
            let literal: String = chars[start..i].iter().collect();
            if literal == "." {
                return Err("unexpected '.'".to_string());
            }
            out.push(Tok::Num(literal));
            continue;
        }
        if c.is_ascii_alphabetic() {
            out.push(Tok::Letter(c));
            i += 1;
            continue;
        }
        if c == '\\' {
            i += 1;
            let start = i;
            while i < chars.len() && chars[i].is_ascii_alphabetic() {
                i += 1;
            }
            if i == start {
                // control symbol such as \, or \{
                let Some(symbol) = chars.get(i) else {
                    return Err("dangling '\\' at the end of the expression".to_string());
                };
                out.push(Tok::Command(symbol.to_string()));
                i += 1;
            } else {
                out.push(Tok::Command(chars[start..i].iter().collect()));
            }
            continue;
        }
        let tok = match c {
            '+' => Tok::Plus,
            '-' => Tok::Minus,
            '*' => Tok::Star,
            '/' => Tok::Slash,
            '^' => Tok::Caret,
            '_' => Tok::Underscore,
            '(' => Tok::LPar,
            ')' => Tok::RPar,
            '{' => Tok::LBrace,
            '}' => Tok::RBrace,
            '[' => Tok::LBracket,
            ']' => Tok::RBracket,
            '|' => Tok::Pipe,
            other => return Err(format!("unexpected character '{}'", other)),
        };
        out.push(tok);
        i += 1;
    }
    Ok(out)
}

/// function commands and the name understood by `apply_function`
fn function_name(command: &str) -> Option<&'static str> {
    let name = match command {
        "sin" => "sin",
        "cos" => "cos",
        "tan" | "tg" => "tan",
        "cot" | "ctg" => "cot",
        "sec" => "sec",
        "csc" => "csc",
        "arcsin" => "asin",
        "arccos" => "acos",
        "arctan" | "arctg" => "atan",
        "arccot" => "acot",
        "ln" => "ln",
        "log" => "log",
        "exp" => "exp",
        _ => return None,
    };
    Some(name)
}

struct LatexParser {
    tokens: Vec<Tok>,
    pos: usize,
    abs_depth: usize,
    /// operands and signs open on the current path, bounds the depth of the tree
    depth: usize,
}

impl LatexParser {
    fn new(tokens: Vec<Tok>) -> Self {
        Self {
            tokens,
            pos: 0,
            abs_depth: 0,
            depth: 0,
        }
    }

    fn descend(&mut self) -> Result<(), String> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err("expression nested too deeply".to_string());
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: Tok) -> Result<(), String> {
        match self.next() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(format!("expected {:?}, found {:?}", expected, tok)),
            None => Err(format!("expected {:?}, found end of expression", expected)),
        }
    }

    /// `\left` and `\right` only size the delimiter that follows them
    fn skip_sizing(&mut self) {
        while matches!(self.peek(), Some(Tok::Command(c)) if c == "left" || c == "right") {
            self.pos += 1;
        }
    }

    fn is_command(&self, names: &[&str]) -> bool {
        matches!(self.peek(), Some(Tok::Command(c)) if names.contains(&c.as_str()))
    }

    // expr := term (('+'|'-') term)*
    fn parse_sum(&mut self) -> Result<Expr, String> {
        let entry = self.depth;
        self.descend()?;
        let mut acc = self.parse_product()?;
        loop {
            match self.peek() {
                Some(Tok::Plus) => {
                    self.pos += 1;
                    self.descend()?;
                    acc = acc + self.parse_product()?;
                }
                Some(Tok::Minus) => {
                    self.pos += 1;
                    self.descend()?;
                    acc = acc - self.parse_product()?;
                }
                _ => {
                    self.depth = entry;
                    return Ok(acc);
                }
            }
        }
    }

    // term := unary (('*'|'/'|\cdot|\times|\div|implicit) unary)*
    fn parse_product(&mut self) -> Result<Expr, String> {
        let entry = self.depth;
        let mut acc = self.parse_unary()?;
        loop {
            if matches!(self.peek(), Some(Tok::Star)) || self.is_command(&["cdot", "times"]) {
                self.pos += 1;
                self.descend()?;
                acc = acc * self.parse_unary()?;
            } else if matches!(self.peek(), Some(Tok::Slash)) || self.is_command(&["div"]) {
                self.pos += 1;
                self.descend()?;
                acc = acc / self.parse_unary()?;
            } else if self.starts_atom() {
                self.descend()?;
                acc = acc * self.parse_power(true)?;
            } else {
                self.depth = entry;
                return Ok(acc);
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        let entry = self.depth;
        let expr = match self.peek() {
            Some(Tok::Minus) => {
                self.pos += 1;
                self.descend()?;
                -self.parse_unary()?
            }
            Some(Tok::Plus) => {
                self.pos += 1;
                self.descend()?;
                self.parse_unary()?
            }
            _ => self.parse_power(true)?,
        };
        self.depth = entry;
        Ok(expr)
    }

    /// true if the next token can begin an operand of an implicit product
    fn starts_atom(&self) -> bool {
        match self.peek() {
            Some(Tok::Num(_)) | Some(Tok::Letter(_)) | Some(Tok::LPar) | Some(Tok::LBrace) => true,
            Some(Tok::Pipe) => self.abs_depth == 0,
            Some(Tok::Command(c)) => match c.as_str() {
                "left" => !matches!(self.tokens.get(self.pos + 1), Some(Tok::Pipe)) || self.abs_depth == 0,
                "right" | "cdot" | "times" | "div" => false,
                _ => true,
            },
            _ => false,
        }
    }

    // power := atom ('^' exponent)?
    fn parse_power(&mut self, allow_functions: bool) -> Result<Expr, String> {
        let base = self.parse_atom(allow_functions)?;
        if matches!(self.peek(), Some(Tok::Caret)) {
            self.pos += 1;
            let exponent = self.parse_exponent()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    /// `^{...}`, `^2`, `^x`, `^-1`, `^\pi`; a bare number exponent takes one digit: x^23 = x^2*3
    fn parse_exponent(&mut self) -> Result<Expr, String> {
        match self.peek() {
            Some(Tok::Minus) => {
                self.pos += 1;
                let entry = self.depth;
                self.descend()?;
                let exponent = -self.parse_exponent()?;
                self.depth = entry;
                Ok(exponent)
            }
            Some(Tok::Num(literal)) if literal.chars().count() > 1 => {
                let literal = literal.clone();
                let mut chars = literal.chars();
                let first = chars.next().unwrap_or('0');
                let rest: String = chars.collect();
                self.tokens[self.pos] = Tok::Num(rest);
                first
                    .to_digit(10)
                    .map(|d| Expr::Const(d as f64))
                    .ok_or_else(|| format!("invalid exponent '{}'", literal))
            }
            _ => self.parse_atom(false),
        }
    }

    /// A braced group, or a single token used as a macro argument (`\frac12`).
    fn parse_group_argument(&mut self) -> Result<Expr, String> {
        match self.peek() {
            Some(Tok::LBrace) => {
                self.pos += 1;
                let inner = self.parse_sum()?;
                self.expect(Tok::RBrace)?;
                Ok(inner)
            }
            Some(Tok::Num(literal)) if literal.chars().count() > 1 => self.parse_exponent(),
            _ => self.parse_atom(false),
        }
    }

    /// Argument of `\sin`, `\ln`, ...: a delimited group, or a bare product of
    /// non-function atoms (`\sin 2x + 1` is `sin(2x) + 1`).
    fn parse_function_argument(&mut self) -> Result<Expr, String> {
        self.skip_sizing();
        match self.peek() {
            Some(Tok::LPar) | Some(Tok::LBrace) | Some(Tok::LBracket) => self.parse_atom(false),
            Some(Tok::Minus) => {
                self.pos += 1;
                let entry = self.depth;
                self.descend()?;
                let argument = -self.parse_function_argument()?;
                self.depth = entry;
                Ok(argument)
            }
            None => Err("missing function argument".to_string()),
            _ => {
                let entry = self.depth;
                let mut acc = self.parse_power(false)?;
                while matches!(self.peek(), Some(Tok::Num(_)) | Some(Tok::Letter(_)))
                    || self.is_command(&["pi"])
                {
                    self.descend()?;
                    acc = acc * self.parse_power(false)?;
                }
                self.depth = entry;
                Ok(acc)
            }
        }
    }

    fn parse_delimited(&mut self, close: Tok) -> Result<Expr, String> {
        let inner = self.parse_sum()?;
        self.skip_sizing();
        self.expect(close)?;
        Ok(inner)
    }

    fn parse_atom(&mut self, allow_functions: bool) -> Result<Expr, String> {
        let entry = self.depth;
        self.descend()?;
        let atom = self.parse_token(allow_functions)?;
        self.depth = entry;
        Ok(atom)
    }

    fn parse_token(&mut self, allow_functions: bool) -> Result<Expr, String> {
        self.skip_sizing();
        let Some(tok) = self.next() else {
            return Err("unexpected end of expression".to_string());
        };
        match tok {
            Tok::Num(literal) => literal
                .parse::<f64>()
                .map(Expr::Const)
                .map_err(|_| format!("invalid number '{}'", literal)),
            Tok::Letter('e') => Ok(Expr::Const(E)),
            Tok::Letter(c) => Ok(Expr::Var(c.to_string())),
            Tok::LPar => self.parse_delimited(Tok::RPar),
            Tok::LBrace => self.parse_delimited(Tok::RBrace),
            Tok::LBracket => self.parse_delimited(Tok::RBracket),
            Tok::Pipe => {
                self.abs_depth += 1;
                let inner = self.parse_sum();
                self.abs_depth -= 1;
                let inner = inner?;
                self.skip_sizing();
                self.expect(Tok::Pipe)?;
                Ok(Expr::Abs(inner.boxed()))
            }
            Tok::Command(name) => self.parse_command(&name, allow_functions),
            other => Err(format!("unexpected token {:?}", other)),
        }
    }

    fn parse_command(&mut self, name: &str, allow_functions: bool) -> Result<Expr, String> {
        match name {
            "pi" => Ok(Expr::Const(PI)),
            "frac" | "dfrac" | "tfrac" => {
                let numerator = self.parse_group_argument()?;
                let denominator = self.parse_group_argument()?;
                Ok(numerator / denominator)
            }
            "sqrt" => {
                let index = if matches!(self.peek(), Some(Tok::LBracket)) {
                    self.pos += 1;
                    let index = self.parse_sum()?;
                    self.expect(Tok::RBracket)?;
                    Some(index)
                } else {
                    None
                };
                let radicand = self.parse_group_argument()?;
                Ok(match index {
                    Some(index) => radicand.pow(Expr::Const(1.0) / index),
                    None => radicand.pow(Expr::Const(0.5)),
                })
            }
            _ => match function_name(name) {
                Some(function) if allow_functions || matches!(self.peek(), Some(Tok::LBrace) | Some(Tok::LPar)) => {
                    self.parse_function(name, function)
                }
                Some(_) => Err(format!("function \\{} needs a delimited argument here", name)),
                None => Err(format!("unsupported LaTeX command \\{}", name)),
            },
        }
    }

    /// `\sin^{2}(x)` is `sin(x)^2`; `\log_{b}(x)` is `ln(x)/ln(b)`
    fn parse_function(&mut self, command: &str, function: &str) -> Result<Expr, String> {
        let mut base = None;
        if command == "log" && matches!(self.peek(), Some(Tok::Underscore)) {
            self.pos += 1;
            base = Some(self.parse_group_argument()?);
        }
        let mut power = None;
        if matches!(self.peek(), Some(Tok::Caret)) {
            self.pos += 1;
            power = Some(self.parse_exponent()?);
        }
        let argument = self.parse_function_argument()?;
        let mut value = apply_function(function, argument)?;
        if let Some(base) = base {
            value = value / Expr::Ln(base.boxed());
        }
        if let Some(power) = power {
            value = value.pow(power);
        }
        Ok(value)
    }
}

/// Parses a LaTeX math string into an expression tree.
pub fn parse_latex(input: &str) -> Result<Expr, String> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err("empty LaTeX expression".to_string());
    }
    let mut parser = LatexParser::new(tokens);
    let expr = parser.parse_sum()?;
    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(format!("unexpected token {:?} after a complete expression", tok)),
    }
}

static E_POWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^A-Za-z\\])e\s*\^\s*\{([^}]*)\}").expect("e^{...} pattern is a valid regex")
});

/// `e^{...}` → `\exp{...}`. The letter must not end a longer word or a command name.
pub fn normalize_exponential(input: &str) -> String {
    E_POWER.replace_all(input, r"${1}\exp{${2}}").into_owned()
}

static SPACING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:[,;:!]|quad\b|qquad\b|displaystyle\b|textstyle\b)")
        .expect("spacing pattern is a valid regex")
});
static WRAPPERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(?:mathrm|operatorname|text|mathit)\{([A-Za-z]+)\}")
        .expect("wrapper pattern is a valid regex")
});
static TRAILING_DX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:\\,)?\s*(?:\\mathrm\{d\}|d)\s*x\s*$").expect("dx pattern is a valid regex")
});

/// Lenient clean-up used for the last parsing attempt: drops math-mode dollars, spacing and
/// style macros, unwraps `\mathrm{sin}`-like names into commands and strips a trailing `dx`.
pub fn relax_latex(input: &str) -> String {
    let without_dollars = input.replace('$', "");
    let without_dx = TRAILING_DX.replace(&without_dollars, "");
    let unwrapped = WRAPPERS.replace_all(&without_dx, r"\${1} ");
    SPACING.replace_all(&unwrapped, " ").trim().to_string()
}
