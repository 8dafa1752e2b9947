use crate::filter::{
    Filter, FilterNode, FilterOp, Literal, ParseError,
    lexer::{Token, lex},
};

/// Maximum nesting depth the parser accepts before failing fast. Bounds
/// recursion against adversarially deep input.
pub const MAX_NESTING_DEPTH: u32 = 64;

/// Parse a filter expression string into its abstract syntax tree.
///
/// Grammar (RFC 7644 §3.4.2.2), precedence lowest to highest:
///
/// ```text
/// filter      := expression
/// expression  := and_expr ( OR and_expr )*
/// and_expr    := not_expr ( AND not_expr )*
/// not_expr    := NOT not_expr | atom
/// atom        := '(' expression ')' | PATH 'pr' | PATH op literal
/// ```
///
/// Keywords and operator tokens are case-insensitive.
pub fn parse_filter(input: &str) -> Result<Filter, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let tokens = lex(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let root = parser.expression(0)?;

    if let Some(token) = parser.peek() {
        return Err(ParseError::TrailingInput {
            token: token_text(token),
        });
    }

    Ok(Filter { root })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(word)) if word.eq_ignore_ascii_case(keyword))
    }

    const fn guard(depth: u32) -> Result<(), ParseError> {
        if depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::DepthExceeded {
                limit: MAX_NESTING_DEPTH,
            });
        }
        Ok(())
    }

    fn expression(&mut self, depth: u32) -> Result<FilterNode, ParseError> {
        Self::guard(depth)?;

        let mut node = self.and_expression(depth + 1)?;

        while self.peek_keyword("or") {
            self.advance();
            let rhs = self.and_expression(depth + 1)?;
            node = FilterNode::Or(Box::new(node), Box::new(rhs));
        }

        Ok(node)
    }

    fn and_expression(&mut self, depth: u32) -> Result<FilterNode, ParseError> {
        Self::guard(depth)?;

        let mut node = self.not_expression(depth + 1)?;

        while self.peek_keyword("and") {
            self.advance();
            let rhs = self.not_expression(depth + 1)?;
            node = FilterNode::And(Box::new(node), Box::new(rhs));
        }

        Ok(node)
    }

    fn not_expression(&mut self, depth: u32) -> Result<FilterNode, ParseError> {
        Self::guard(depth)?;

        if self.peek_keyword("not") {
            self.advance();
            let inner = self.not_expression(depth + 1)?;
            return Ok(FilterNode::Not(Box::new(inner)));
        }

        self.atom(depth + 1)
    }

    fn atom(&mut self, depth: u32) -> Result<FilterNode, ParseError> {
        Self::guard(depth)?;

        match self.advance() {
            Some(Token::LParen) => {
                let inner = self.expression(depth + 1)?;
                match self.advance() {
                    Some(Token::RParen) => Ok(FilterNode::Group(Box::new(inner))),
                    Some(token) => Err(ParseError::UnexpectedToken {
                        token: token_text(&token),
                    }),
                    None => Err(ParseError::UnexpectedEnd),
                }
            }
            Some(Token::Word(path)) => self.attribute_expression(path),
            Some(token) => Err(ParseError::UnexpectedToken {
                token: token_text(&token),
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// `PATH 'pr'` or `PATH op literal`, with the path token already consumed.
    fn attribute_expression(&mut self, path: String) -> Result<FilterNode, ParseError> {
        let op_token = match self.advance() {
            Some(Token::Word(word)) => word,
            Some(token) => {
                return Err(ParseError::UnexpectedToken {
                    token: token_text(&token),
                });
            }
            None => return Err(ParseError::UnexpectedEnd),
        };

        if op_token.eq_ignore_ascii_case("pr") {
            return Ok(FilterNode::Present { path });
        }

        let op = FilterOp::from_token(&op_token).ok_or(ParseError::UnknownOperator {
            token: op_token,
        })?;
        let literal = self.literal()?;

        Ok(FilterNode::Compare { path, op, literal })
    }

    fn literal(&mut self) -> Result<Literal, ParseError> {
        match self.advance() {
            Some(Token::Str(value)) => Ok(Literal::Str(value)),
            Some(Token::Word(word)) => {
                if word.eq_ignore_ascii_case("true") {
                    Ok(Literal::Bool(true))
                } else if word.eq_ignore_ascii_case("false") {
                    Ok(Literal::Bool(false))
                } else if word.eq_ignore_ascii_case("null") {
                    Ok(Literal::Null)
                } else if word.parse::<f64>().is_ok() {
                    Ok(Literal::Number(word))
                } else {
                    Err(ParseError::UnexpectedToken { token: word })
                }
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                token: token_text(&token),
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

fn token_text(token: &Token) -> String {
    match token {
        Token::LParen => "(".to_string(),
        Token::RParen => ")".to_string(),
        Token::Str(value) => format!("\"{value}\""),
        Token::Word(word) => word.clone(),
    }
}
