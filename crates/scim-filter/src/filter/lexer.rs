use crate::filter::ParseError;
use std::{iter::Peekable, str::Chars};

///
/// Token
///
/// Lexical units of the filter grammar. Words cover attribute paths,
/// operator tokens, keywords, and bare literals; quoted strings arrive
/// with their JSON escapes already resolved.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) enum Token {
    LParen,
    RParen,
    Str(String),
    Word(String),
}

pub(super) fn lex(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&ch) = chars.peek() {
        match ch {
            _ if ch.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '"' => {
                chars.next();
                tokens.push(Token::Str(lex_string(&mut chars)?));
            }
            _ => tokens.push(Token::Word(lex_word(&mut chars))),
        }
    }

    Ok(tokens)
}

fn lex_word(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut word = String::new();

    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() || matches!(ch, '(' | ')' | '"') {
            break;
        }
        word.push(ch);
        chars.next();
    }

    word
}

/// Consume a double-quoted string body, resolving JSON escape sequences.
/// The opening quote has already been consumed.
fn lex_string(chars: &mut Peekable<Chars<'_>>) -> Result<String, ParseError> {
    let mut out = String::new();

    loop {
        let Some(ch) = chars.next() else {
            return Err(ParseError::UnterminatedString);
        };

        match ch {
            '"' => return Ok(out),
            '\\' => out.push(lex_escape(chars)?),
            other => out.push(other),
        }
    }
}

fn lex_escape(chars: &mut Peekable<Chars<'_>>) -> Result<char, ParseError> {
    let Some(esc) = chars.next() else {
        return Err(ParseError::UnterminatedString);
    };

    match esc {
        '"' => Ok('"'),
        '\\' => Ok('\\'),
        '/' => Ok('/'),
        'b' => Ok('\u{0008}'),
        'f' => Ok('\u{000c}'),
        'n' => Ok('\n'),
        'r' => Ok('\r'),
        't' => Ok('\t'),
        'u' => lex_unicode_escape(chars),
        other => Err(ParseError::InvalidEscape {
            sequence: format!("\\{other}"),
        }),
    }
}

/// Resolve a `\uXXXX` escape, pairing UTF-16 surrogates when needed.
fn lex_unicode_escape(chars: &mut Peekable<Chars<'_>>) -> Result<char, ParseError> {
    let high = hex4(chars)?;

    if (0xDC00..=0xDFFF).contains(&high) {
        return Err(ParseError::InvalidEscape {
            sequence: format!("\\u{high:04X}"),
        });
    }

    if (0xD800..=0xDBFF).contains(&high) {
        if chars.next() != Some('\\') || chars.next() != Some('u') {
            return Err(ParseError::InvalidEscape {
                sequence: format!("\\u{high:04X}"),
            });
        }
        let low = hex4(chars)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(ParseError::InvalidEscape {
                sequence: format!("\\u{high:04X}\\u{low:04X}"),
            });
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(code).ok_or(ParseError::InvalidEscape {
            sequence: format!("\\u{high:04X}\\u{low:04X}"),
        });
    }

    char::from_u32(high).ok_or(ParseError::InvalidEscape {
        sequence: format!("\\u{high:04X}"),
    })
}

fn hex4(chars: &mut Peekable<Chars<'_>>) -> Result<u32, ParseError> {
    let mut digits = String::with_capacity(4);

    for _ in 0..4 {
        let Some(ch) = chars.next() else {
            return Err(ParseError::UnterminatedString);
        };
        digits.push(ch);
    }

    u32::from_str_radix(&digits, 16).map_err(|_| ParseError::InvalidEscape {
        sequence: format!("\\u{digits}"),
    })
}
