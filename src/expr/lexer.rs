use super::SyntaxError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(String),
    Str(String),
    Ident(String),
    /// Operator or punctuation, e.g. `<=`, `(`, `,`.
    Symbol(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Longest symbols first so `<=` wins over `<`.
const SYMBOLS: &[&str] = &[
    "==", "!=", "<=", ">=", "=~", "!~", "&&", "||", "<", ">", "=", "+", "-", "*", "/", "%", "!",
    "~", "&", "|", "^", "(", ")", "[", "]", ",", ".", ";", "?", ":",
];

pub fn tokenize(source: &str) -> Result<Vec<Spanned>, SyntaxError> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let rest = &source[position..];
        if rest.starts_with("//") || rest.starts_with("##") {
            while i < chars.len() && chars[i].1 != '\n' {
                i += 1;
            }
            continue;
        }
        if rest.starts_with("/*") {
            let end = rest
                .find("*/")
                .ok_or_else(|| SyntaxError::new(position, "unterminated comment"))?;
            let stop = position + end + 2;
            while i < chars.len() && chars[i].0 < stop {
                i += 1;
            }
            continue;
        }

        if c.is_ascii_digit() {
            let (text, next) = number(&chars, i)?;
            tokens.push(Spanned {
                token: Token::Number(text),
                position,
            });
            i = next;
            continue;
        }

        if c == '\'' || c == '"' {
            let (text, next) = string(&chars, i)?;
            tokens.push(Spanned {
                token: Token::Str(text),
                position,
            });
            i = next;
            continue;
        }

        if is_ident_start(c) {
            let start = i;
            while i < chars.len() && is_ident_part(chars[i].1) {
                i += 1;
            }
            let ident: String = chars[start..i].iter().map(|(_, ch)| ch).collect();
            tokens.push(Spanned {
                token: Token::Ident(ident),
                position,
            });
            continue;
        }

        let Some(symbol) = SYMBOLS.iter().copied().find(|s| rest.starts_with(s)) else {
            return Err(SyntaxError::new(
                position,
                format!("unexpected character '{c}'"),
            ));
        };
        tokens.push(Spanned {
            token: Token::Symbol(symbol),
            position,
        });
        i += symbol.chars().count();
    }

    Ok(tokens)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn number(chars: &[(usize, char)], start: usize) -> Result<(String, usize), SyntaxError> {
    let mut i = start;
    let mut text = String::new();
    let digits = |i: &mut usize, text: &mut String| {
        while *i < chars.len() && chars[*i].1.is_ascii_digit() {
            text.push(chars[*i].1);
            *i += 1;
        }
    };

    digits(&mut i, &mut text);
    if i + 1 < chars.len() && chars[i].1 == '.' && chars[i + 1].1.is_ascii_digit() {
        text.push('.');
        i += 1;
        digits(&mut i, &mut text);
    }
    if i < chars.len() && matches!(chars[i].1, 'e' | 'E') {
        let mut j = i + 1;
        if j < chars.len() && matches!(chars[j].1, '+' | '-') {
            j += 1;
        }
        if j < chars.len() && chars[j].1.is_ascii_digit() {
            text.extend(chars[i..j].iter().map(|(_, c)| *c));
            i = j;
            digits(&mut i, &mut text);
        }
    }
    if i < chars.len() && matches!(chars[i].1, 'l' | 'L' | 'f' | 'F' | 'd' | 'D' | 'b' | 'B' | 'h' | 'H') {
        text.push(chars[i].1.to_ascii_uppercase());
        i += 1;
    }
    if i < chars.len() && is_ident_part(chars[i].1) {
        return Err(SyntaxError::new(chars[start].0, "malformed number"));
    }
    Ok((text, i))
}

fn string(chars: &[(usize, char)], start: usize) -> Result<(String, usize), SyntaxError> {
    let quote = chars[start].1;
    let mut text = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i].1;
        if c == quote {
            return Ok((text, i + 1));
        }
        if c == '\\' {
            i += 1;
            let Some(&(_, escaped)) = chars.get(i) else {
                break;
            };
            text.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
        } else {
            text.push(c);
        }
        i += 1;
    }
    Err(SyntaxError::new(chars[start].0, "unterminated string"))
}
