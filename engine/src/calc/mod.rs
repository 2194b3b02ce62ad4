//! Sandboxed arithmetic expression evaluator
//!
//! Turns a spoken expression ("2 to the power of 10") into a number without
//! ever touching a general-purpose eval facility. The grammar is closed:
//! literals, `+ - * / **` and unary minus, nothing else. Input originates
//! from transcribed speech, so everything outside that whitelist is rejected
//! rather than interpreted.
//!
//! Pipeline: word-operator substitution, letter/whitespace stripping, a
//! single-literal fast path, then a recursive-descent parse into `ExprNode`
//! and bottom-up evaluation.

use thiserror::Error;

/// Errors produced by the evaluator
#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    /// Malformed syntax (unbalanced parens, dangling operator, empty input)
    #[error("malformed expression: {0}")]
    Parse(String),

    /// A construct outside the closed grammar. Always rejected, never
    /// coerced or skipped.
    #[error("unsupported construct: {0}")]
    UnsupportedOperation(String),

    #[error("division by zero")]
    DivisionByZero,
}

/// Binary operators of the closed grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Unary operators of the closed grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

/// Node of the restricted expression tree. Immutable once built; the
/// evaluator can only ever see these three shapes, which is what keeps the
/// component incapable of calling out to host functionality.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    Literal(f64),
    Binary {
        op: BinaryOp,
        lhs: Box<ExprNode>,
        rhs: Box<ExprNode>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<ExprNode>,
    },
}

/// Evaluate a spoken or typed arithmetic expression.
pub fn evaluate(text: &str) -> Result<f64, CalcError> {
    let cleaned = normalize_expression(text);
    if cleaned.is_empty() {
        return Err(CalcError::Parse("empty expression".to_string()));
    }

    // Fast path: a single signed literal needs no tree. Post-normalization
    // the text contains no letters, so this cannot match "inf"/"nan".
    if let Ok(value) = cleaned.parse::<f64>() {
        return Ok(value);
    }

    let tokens = tokenize(&cleaned)?;
    let tree = Parser { tokens, pos: 0 }.parse()?;
    eval_node(&tree)
}

/// Replace word-form operators with symbols, then strip remaining letters
/// and whitespace.
///
/// Longer phrases are substituted before their substrings ("divided by"
/// before "divide", "to the power of" before "power"). The letter strip is
/// blunt: an exponent literal like `1e3` comes out as `13`. Known
/// limitation, kept deliberately.
pub fn normalize_expression(text: &str) -> String {
    let mut expr = text.to_lowercase();
    for (word, symbol) in [
        ("plus", "+"),
        ("minus", "-"),
        ("times", "*"),
        ("multiply", "*"),
        ("divided by", "/"),
        ("divide", "/"),
        ("to the power of", "**"),
        ("power", "**"),
    ] {
        expr = expr.replace(word, symbol);
    }

    expr.chars()
        .filter(|c| !c.is_ascii_alphabetic() && !c.is_whitespace())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Pow,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| CalcError::Parse(format!("invalid number '{}'", text)))?;
                tokens.push(Token::Number(value));
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Pow);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            // Anything else is outside the whitelist. Rejecting here is the
            // security boundary, not an input-cleanup nicety.
            other => {
                return Err(CalcError::UnsupportedOperation(format!(
                    "character '{}'",
                    other
                )));
            }
        }
    }

    Ok(tokens)
}

/// Recursive-descent parser over the closed grammar:
///
/// ```text
/// Expr   := Term (('+'|'-') Term)*
/// Term   := Factor (('*'|'/') Factor)*
/// Factor := ('-')? (Number | '(' Expr ')') ('**' Factor)?
/// ```
///
/// Exponent is right-associative; unary minus binds tighter than any binary
/// operator, so `-2**2` is `(-2)**2`.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn parse(mut self) -> Result<ExprNode, CalcError> {
        let node = self.expr()?;
        if self.pos != self.tokens.len() {
            return Err(CalcError::Parse("trailing input after expression".to_string()));
        }
        Ok(node)
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expr(&mut self) -> Result<ExprNode, CalcError> {
        let mut node = self.term()?;
        while let Some(tok) = self.peek() {
            let op = match tok {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.term()?;
            node = ExprNode::Binary {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
            };
        }
        Ok(node)
    }

    fn term(&mut self) -> Result<ExprNode, CalcError> {
        let mut node = self.factor()?;
        while let Some(tok) = self.peek() {
            let op = match tok {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.factor()?;
            node = ExprNode::Binary {
                op,
                lhs: Box::new(node),
                rhs: Box::new(rhs),
            };
        }
        Ok(node)
    }

    fn factor(&mut self) -> Result<ExprNode, CalcError> {
        let negated = if self.peek() == Some(Token::Minus) {
            self.advance();
            true
        } else {
            false
        };

        let mut node = match self.advance() {
            Some(Token::Number(value)) => ExprNode::Literal(value),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.advance() {
                    Some(Token::RParen) => inner,
                    _ => return Err(CalcError::Parse("expected ')'".to_string())),
                }
            }
            Some(other) => {
                return Err(CalcError::Parse(format!("unexpected token {:?}", other)));
            }
            None => return Err(CalcError::Parse("unexpected end of expression".to_string())),
        };

        if negated {
            node = ExprNode::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(node),
            };
        }

        if self.peek() == Some(Token::Pow) {
            self.advance();
            let exponent = self.factor()?;
            node = ExprNode::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(node),
                rhs: Box::new(exponent),
            };
        }

        Ok(node)
    }
}

/// Evaluate the restricted tree bottom-up.
///
/// The match is exhaustive over the closed node/operator set; there is no
/// escape hatch to dispatch anything else.
fn eval_node(node: &ExprNode) -> Result<f64, CalcError> {
    match node {
        ExprNode::Literal(value) => Ok(*value),
        ExprNode::Unary {
            op: UnaryOp::Neg,
            operand,
        } => Ok(-eval_node(operand)?),
        ExprNode::Binary { op, lhs, rhs } => {
            let left = eval_node(lhs)?;
            let right = eval_node(rhs)?;
            match op {
                BinaryOp::Add => Ok(left + right),
                BinaryOp::Sub => Ok(left - right),
                BinaryOp::Mul => Ok(left * right),
                BinaryOp::Div => {
                    if right == 0.0 {
                        Err(CalcError::DivisionByZero)
                    } else {
                        Ok(left / right)
                    }
                }
                BinaryOp::Pow => Ok(left.powf(right)),
            }
        }
    }
}

/// Format a result for speech: integers read without a trailing ".0".
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
