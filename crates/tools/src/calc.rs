use async_trait::async_trait;
use serde_json::Value;

use agentlink_llm::tool::{ToolCallError, ToolContext, ToolT};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("wrong number of arguments for {0}")]
    Arity(String),

    #[error("result out of range")]
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Comma,
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                tokens.push(Token::Slash);
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        literal.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let number = literal
                    .parse::<f64>()
                    .map_err(|_| CalcError::Syntax(format!("bad number: {literal}")))?;
                tokens.push(Token::Number(number));
            }
            c if c.is_ascii_alphabetic() => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            c => return Err(CalcError::Syntax(format!("unexpected character: {c}"))),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> Result<(), CalcError> {
        match self.next() {
            Some(token) if token == *expected => Ok(()),
            Some(token) => Err(CalcError::Syntax(format!("unexpected token: {token:?}"))),
            None => Err(CalcError::Syntax("unexpected end of expression".to_string())),
        }
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Plus => {
                    self.next();
                    value += self.term()?;
                }
                Token::Minus => {
                    self.next();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // term := unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        while let Some(op) = self.peek().cloned() {
            match op {
                Token::Star => {
                    self.next();
                    value *= self.unary()?;
                }
                Token::Slash => {
                    self.next();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= divisor;
                }
                Token::Percent => {
                    self.next();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value %= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    // unary := '-' unary | primary
    fn unary(&mut self) -> Result<f64, CalcError> {
        if self.peek() == Some(&Token::Minus) {
            self.next();
            return Ok(-self.unary()?);
        }
        self.primary()
    }

    // primary := number | ident '(' args ')' | '(' expr ')'
    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.next() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(value)
            }
            Some(Token::Ident(name)) => {
                self.expect(&Token::LParen)?;
                let mut args = vec![self.expr()?];
                while self.peek() == Some(&Token::Comma) {
                    self.next();
                    args.push(self.expr()?);
                }
                self.expect(&Token::RParen)?;
                apply_function(&name, &args)
            }
            Some(token) => Err(CalcError::Syntax(format!("unexpected token: {token:?}"))),
            None => Err(CalcError::Syntax("unexpected end of expression".to_string())),
        }
    }
}

/// Whitelisted functions only; anything else is rejected.
fn apply_function(name: &str, args: &[f64]) -> Result<f64, CalcError> {
    match name {
        "abs" => match args {
            [value] => Ok(value.abs()),
            _ => Err(CalcError::Arity(name.to_string())),
        },
        "round" => match args {
            [value] => Ok(value.round()),
            _ => Err(CalcError::Arity(name.to_string())),
        },
        "min" => {
            if args.len() < 2 {
                return Err(CalcError::Arity(name.to_string()));
            }
            Ok(args.iter().copied().fold(f64::INFINITY, f64::min))
        }
        "max" => {
            if args.len() < 2 {
                return Err(CalcError::Arity(name.to_string()));
            }
            Ok(args.iter().copied().fold(f64::NEG_INFINITY, f64::max))
        }
        "pow" => match args {
            [base, exponent] => Ok(base.powf(*exponent)),
            _ => Err(CalcError::Arity(name.to_string())),
        },
        _ => Err(CalcError::UnknownFunction(name.to_string())),
    }
}

/// Evaluate a restricted arithmetic expression.
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalcError::Syntax("empty expression".to_string()));
    }

    let mut parser = Parser::new(tokens);
    let value = parser.expr()?;
    if parser.peek().is_some() {
        return Err(CalcError::Syntax("trailing input".to_string()));
    }
    if !value.is_finite() {
        return Err(CalcError::OutOfRange);
    }
    Ok(value)
}

/// Render integral results without a decimal point.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Restricted arithmetic evaluation as a tool.
#[derive(Debug, Default)]
pub struct Calculate;

#[async_trait]
impl ToolT for Calculate {
    fn name(&self) -> &'static str {
        "calculate"
    }

    fn description(&self) -> &'static str {
        "Evaluate an arithmetic expression, e.g. \"1 + 2 * 3\". Supports + - * / %, parentheses and abs/round/min/max/pow."
    }

    fn args_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "The arithmetic expression to evaluate"
                }
            },
            "required": ["expression"]
        })
    }

    async fn run(&self, args: Value, _ctx: &mut ToolContext) -> Result<Value, ToolCallError> {
        let expression = args["expression"]
            .as_str()
            .ok_or_else(|| ToolCallError::InvalidArguments("expression is required".into()))?;

        let value = evaluate(expression)
            .map_err(|e| ToolCallError::RuntimeError(Box::new(e)))?;

        Ok(Value::String(format!(
            "{} = {}",
            expression.trim(),
            format_number(value)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_precedence() {
        assert_eq!(evaluate("1 + 2 * 3").unwrap(), 7.0);
        assert_eq!(evaluate("(1 + 2) * 3").unwrap(), 9.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(evaluate("8 / 2 / 2").unwrap(), 2.0);
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(evaluate("-3 + 5").unwrap(), 2.0);
        assert_eq!(evaluate("--4").unwrap(), 4.0);
        assert_eq!(evaluate("2 * -3").unwrap(), -6.0);
    }

    #[test]
    fn test_remainder() {
        assert_eq!(evaluate("10 % 3").unwrap(), 1.0);
    }

    #[test]
    fn test_decimal_numbers() {
        assert_eq!(evaluate("0.5 + 0.25").unwrap(), 0.75);
    }

    #[test]
    fn test_functions() {
        assert_eq!(evaluate("abs(-5)").unwrap(), 5.0);
        assert_eq!(evaluate("round(2.6)").unwrap(), 3.0);
        assert_eq!(evaluate("min(3, 1, 2)").unwrap(), 1.0);
        assert_eq!(evaluate("max(3, 1, 2)").unwrap(), 3.0);
        assert_eq!(evaluate("pow(2, 10)").unwrap(), 1024.0);
        assert_eq!(evaluate("pow(2, min(3, 4))").unwrap(), 8.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate("1 / 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("1 % 0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("1 / (2 - 2)"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_malformed_expressions() {
        assert!(matches!(evaluate(""), Err(CalcError::Syntax(_))));
        assert!(matches!(evaluate("1 +"), Err(CalcError::Syntax(_))));
        assert!(matches!(evaluate("(1 + 2"), Err(CalcError::Syntax(_))));
        assert!(matches!(evaluate("1 2"), Err(CalcError::Syntax(_))));
        assert!(matches!(evaluate("1..5"), Err(CalcError::Syntax(_))));
        assert!(matches!(evaluate("2 $ 3"), Err(CalcError::Syntax(_))));
    }

    #[test]
    fn test_names_outside_whitelist_rejected() {
        assert_eq!(
            evaluate("exec(1)"),
            Err(CalcError::UnknownFunction("exec".to_string()))
        );
        // A bare identifier is not an expression either
        assert!(matches!(evaluate("pi"), Err(CalcError::Syntax(_))));
    }

    #[test]
    fn test_function_arity() {
        assert_eq!(
            evaluate("abs(1, 2)"),
            Err(CalcError::Arity("abs".to_string()))
        );
        assert_eq!(evaluate("min(1)"), Err(CalcError::Arity("min".to_string())));
        assert_eq!(evaluate("pow(2)"), Err(CalcError::Arity("pow".to_string())));
    }

    #[test]
    fn test_overflow_is_out_of_range() {
        assert_eq!(evaluate("pow(10, 1000)"), Err(CalcError::OutOfRange));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-6.0), "-6");
        assert_eq!(format_number(0.75), "0.75");
    }

    #[tokio::test]
    async fn test_tool_output_format() {
        let tool = Calculate;
        let mut ctx = ToolContext::new();

        let result = tool
            .run(serde_json::json!({"expression": "123 * 456"}), &mut ctx)
            .await
            .unwrap();
        assert_eq!(result, serde_json::json!("123 * 456 = 56088"));
    }

    #[tokio::test]
    async fn test_tool_surfaces_calc_errors() {
        let tool = Calculate;
        let mut ctx = ToolContext::new();

        let error = tool
            .run(serde_json::json!({"expression": "1 / 0"}), &mut ctx)
            .await
            .unwrap_err();
        assert!(error.to_string().contains("division by zero"));
    }

    #[tokio::test]
    async fn test_tool_requires_expression() {
        let tool = Calculate;
        let mut ctx = ToolContext::new();

        let error = tool.run(serde_json::json!({}), &mut ctx).await.unwrap_err();
        assert!(matches!(error, ToolCallError::InvalidArguments(_)));
    }
}
