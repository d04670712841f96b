//! Calculator tool: arithmetic expression evaluation.
//!
//! A small recursive-descent evaluator over `+ - * / %`, parentheses, and
//! unary minus. Safe to run on model-chosen input, unlike handing the model
//! an interpreter.

use super::Tool;
use doctalk_core::{AppError, AppResult};

const DESCRIPTION: &str = "Useful for when you need to perform mathematical calculations. \
     The input should be a plain arithmetic expression, e.g. 17 * 23.";

pub struct CalculatorTool;

impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn invoke(&self, input: &str) -> AppResult<String> {
        let value = evaluate(input).map_err(|message| AppError::Tool {
            name: "calculator".to_string(),
            message,
        })?;

        Ok(format_number(value))
    }
}

/// Evaluate an arithmetic expression.
fn evaluate(input: &str) -> Result<f64, String> {
    let mut parser = Parser::new(input);
    let value = parser.expression()?;

    if let Some(c) = parser.peek() {
        return Err(format!("Unexpected character '{}'", c));
    }

    Ok(value)
}

/// Integral results print without a fractional part.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

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

    /// Next non-whitespace character without consuming it.
    fn peek(&mut self) -> Option<char> {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
        self.chars.get(self.pos).copied()
    }

    fn expression(&mut self) -> Result<f64, String> {
        let mut value = self.term()?;

        while let Some(op) = self.peek() {
            match op {
                '+' => {
                    self.pos += 1;
                    value += self.term()?;
                }
                '-' => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }

        Ok(value)
    }

    fn term(&mut self) -> Result<f64, String> {
        let mut value = self.unary()?;

        while let Some(op) = self.peek() {
            match op {
                '*' => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                '/' => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err("Division by zero".to_string());
                    }
                    value /= divisor;
                }
                '%' => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err("Division by zero".to_string());
                    }
                    value %= divisor;
                }
                _ => break,
            }
        }

        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, String> {
        if self.peek() == Some('-') {
            self.pos += 1;
            return Ok(-self.unary()?);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<f64, String> {
        match self.peek() {
            Some('(') => {
                self.pos += 1;
                let value = self.expression()?;
                if self.peek() != Some(')') {
                    return Err("Expected closing parenthesis".to_string());
                }
                self.pos += 1;
                Ok(value)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(format!("Unexpected character '{}'", c)),
            None => Err("Unexpected end of expression".to_string()),
        }
    }

    fn number(&mut self) -> Result<f64, String> {
        let start = self.pos;

        while self.pos < self.chars.len()
            && (self.chars[self.pos].is_ascii_digit() || self.chars[self.pos] == '.')
        {
            self.pos += 1;
        }

        let literal: String = self.chars[start..self.pos].iter().collect();
        literal
            .parse::<f64>()
            .map_err(|_| format!("Invalid number '{}'", literal))
    }
}
