use super::SyntaxError;
use super::ast::{BinaryOp, Expr, UnaryOp};
use super::lexer::{Spanned, Token};

/// Recursive descent parser over a token list.
pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    end: usize,
}

const RESERVED: &[&str] = &[
    "and", "or", "not", "eq", "ne", "lt", "le", "gt", "ge", "div", "mod", "empty", "size",
    "true", "false", "null",
];

impl Parser {
    pub const fn new(tokens: Vec<Spanned>, source_len: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            end: source_len,
        }
    }

    /// Statements separated by `;`; empty statements are skipped.
    pub fn script(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut statements = Vec::new();
        loop {
            while self.eat_symbol(";") {}
            if self.peek().is_none() {
                return Ok(statements);
            }
            statements.push(self.expression()?);
            if self.peek().is_some() && !self.eat_symbol(";") {
                return Err(self.unexpected());
            }
        }
    }

    fn expression(&mut self) -> Result<Expr, SyntaxError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr, SyntaxError> {
        let target = self.conditional()?;
        if self.eat_symbol("=") {
            let value = self.assignment()?;
            return Ok(Expr::Binary(BinaryOp::Assign, Box::new(target), Box::new(value)));
        }
        Ok(target)
    }

    fn conditional(&mut self) -> Result<Expr, SyntaxError> {
        let condition = self.binary(0)?;
        if !self.eat_symbol("?") {
            return Ok(condition);
        }
        if self.eat_symbol(":") {
            let fallback = self.conditional()?;
            return Ok(Expr::Elvis(Box::new(condition), Box::new(fallback)));
        }
        let then = self.conditional()?;
        self.expect_symbol(":")?;
        let otherwise = self.conditional()?;
        Ok(Expr::Ternary(
            Box::new(condition),
            Box::new(then),
            Box::new(otherwise),
        ))
    }

    /// Precedence climbing over the binary operator levels.
    fn binary(&mut self, level: usize) -> Result<Expr, SyntaxError> {
        if level >= LEVELS.len() {
            return self.unary();
        }
        let mut lhs = self.binary(level + 1)?;
        while let Some(op) = self.binary_operator(LEVELS[level]) {
            let rhs = self.binary(level + 1)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn binary_operator(&mut self, candidates: &[(&str, BinaryOp)]) -> Option<BinaryOp> {
        let text = match &self.peek()?.token {
            Token::Symbol(symbol) => *symbol,
            Token::Ident(word) => word.as_str(),
            _ => return None,
        };
        let op = candidates
            .iter()
            .find(|(spelling, _)| *spelling == text)
            .map(|(_, op)| *op)?;
        self.pos += 1;
        Some(op)
    }

    fn unary(&mut self) -> Result<Expr, SyntaxError> {
        let op = match self.peek().map(|t| &t.token) {
            Some(Token::Symbol("!")) => Some(UnaryOp::Not),
            Some(Token::Symbol("-")) => Some(UnaryOp::Negate),
            Some(Token::Symbol("~")) => Some(UnaryOp::Complement),
            Some(Token::Ident(word)) => match word.as_str() {
                "not" => Some(UnaryOp::Not),
                "empty" => Some(UnaryOp::Empty),
                "size" => Some(UnaryOp::Size),
                _ => None,
            },
            _ => None,
        };
        match op {
            Some(op) => {
                self.pos += 1;
                let operand = self.unary()?;
                Ok(Expr::Unary(op, Box::new(operand)))
            }
            None => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Expr, SyntaxError> {
        let mut expr = self.primary()?;
        loop {
            if self.eat_symbol(".") {
                let name = self.identifier()?;
                expr = Expr::Member(Box::new(expr), name);
            } else if self.eat_symbol("[") {
                let index = self.expression()?;
                self.expect_symbol("]")?;
                expr = Expr::Index(Box::new(expr), Box::new(index));
            } else if self.eat_symbol("(") {
                let args = self.list(")")?;
                expr = Expr::Call(Box::new(expr), args);
            } else {
                return Ok(expr);
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, SyntaxError> {
        let Some(spanned) = self.tokens.get(self.pos).cloned() else {
            return Err(SyntaxError::new(self.end, "unexpected end of expression"));
        };
        self.pos += 1;
        match spanned.token {
            Token::Number(text) => Ok(Expr::Number(text)),
            Token::Str(text) => Ok(Expr::Str(text)),
            Token::Ident(word) => match word.as_str() {
                "true" => Ok(Expr::Bool(true)),
                "false" => Ok(Expr::Bool(false)),
                "null" => Ok(Expr::Null),
                reserved if RESERVED.contains(&reserved) => {
                    self.pos -= 1;
                    Err(self.unexpected())
                }
                _ => Ok(Expr::Ident(word)),
            },
            Token::Symbol("(") => {
                let inner = self.expression()?;
                self.expect_symbol(")")?;
                Ok(inner)
            }
            Token::Symbol("[") => Ok(Expr::Array(self.list("]")?)),
            Token::Symbol(_) => {
                self.pos -= 1;
                Err(self.unexpected())
            }
        }
    }

    fn list(&mut self, close: &str) -> Result<Vec<Expr>, SyntaxError> {
        let mut items = Vec::new();
        if self.eat_symbol(close) {
            return Ok(items);
        }
        loop {
            items.push(self.expression()?);
            if self.eat_symbol(close) {
                return Ok(items);
            }
            self.expect_symbol(",")?;
        }
    }

    fn identifier(&mut self) -> Result<String, SyntaxError> {
        match self.peek().map(|t| &t.token) {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.pos += 1;
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn eat_symbol(&mut self, symbol: &str) -> bool {
        let found = matches!(self.peek(), Some(Spanned { token: Token::Symbol(s), .. }) if *s == symbol);
        if found {
            self.pos += 1;
        }
        found
    }

    fn expect_symbol(&mut self, symbol: &str) -> Result<(), SyntaxError> {
        if self.eat_symbol(symbol) {
            Ok(())
        } else {
            Err(SyntaxError::new(
                self.peek().map_or(self.end, |t| t.position),
                format!("expected '{symbol}'"),
            ))
        }
    }

    fn unexpected(&self) -> SyntaxError {
        self.peek().map_or_else(
            || SyntaxError::new(self.end, "unexpected end of expression"),
            |t| SyntaxError::new(t.position, format!("unexpected token {:?}", t.token)),
        )
    }
}

/// Binary operators from lowest to highest precedence, with word aliases.
const LEVELS: &[&[(&str, BinaryOp)]] = &[
    &[("||", BinaryOp::Or), ("or", BinaryOp::Or)],
    &[("&&", BinaryOp::And), ("and", BinaryOp::And)],
    &[("|", BinaryOp::BitOr)],
    &[("^", BinaryOp::BitXor)],
    &[("&", BinaryOp::BitAnd)],
    &[
        ("==", BinaryOp::Eq),
        ("eq", BinaryOp::Eq),
        ("!=", BinaryOp::Ne),
        ("ne", BinaryOp::Ne),
        ("=~", BinaryOp::Matches),
        ("!~", BinaryOp::NotMatches),
    ],
    &[
        ("<", BinaryOp::Lt),
        ("lt", BinaryOp::Lt),
        ("<=", BinaryOp::Le),
        ("le", BinaryOp::Le),
        (">", BinaryOp::Gt),
        ("gt", BinaryOp::Gt),
        (">=", BinaryOp::Ge),
        ("ge", BinaryOp::Ge),
    ],
    &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)],
    &[
        ("*", BinaryOp::Mul),
        ("/", BinaryOp::Div),
        ("div", BinaryOp::Div),
        ("%", BinaryOp::Mod),
        ("mod", BinaryOp::Mod),
    ],
];
