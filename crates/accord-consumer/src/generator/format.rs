//! Portable calendar-format token translation.
//!
//! Contract documents carry date/time formats in the conventional calendar
//! token language (`yyyy-MM-dd'T'HH:mm:ss.SSS`), not chrono's `%`-tokens, so
//! the same format string means the same thing to every engine that replays
//! the contract. Local example generation translates to a chrono format
//! string on demand.
//!
//! Quoted sections (`'T'`) are emitted verbatim; `''` is an escaped single
//! quote. Unrecognized pattern letters are rejected rather than guessed at.

use crate::error::GenerationError;

/// Translate a calendar-format pattern to a chrono `strftime` format string.
pub fn to_chrono_format(pattern: &str) -> Result<String, GenerationError> {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\'' {
            // Quoted literal run; '' is a literal quote, both inside and
            // outside a run.
            if chars.peek() == Some(&'\'') {
                chars.next();
                out.push('\'');
                continue;
            }
            loop {
                match chars.next() {
                    None => break,
                    Some('\'') => {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            push_literal(&mut out, '\'');
                        } else {
                            break;
                        }
                    }
                    Some(lit) => push_literal(&mut out, lit),
                }
            }
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            continue;
        }

        let mut count = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            count += 1;
        }
        out.push_str(translate_token(c, count)?);
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

fn translate_token(letter: char, count: usize) -> Result<&'static str, GenerationError> {
    let translated = match (letter, count) {
        ('y', 2) => "%y",
        ('y', _) => "%Y",
        ('M', 1) => "%-m",
        ('M', 2) => "%m",
        ('M', 3) => "%b",
        ('M', _) => "%B",
        ('d', 1) => "%-d",
        ('d', _) => "%d",
        ('D', _) => "%j",
        ('E', 4) => "%A",
        ('E', _) => "%a",
        ('H', 1) => "%-H",
        ('H', _) => "%H",
        ('h', 1) => "%-I",
        ('h', _) => "%I",
        ('m', 1) => "%-M",
        ('m', _) => "%M",
        ('s', 1) => "%-S",
        ('s', _) => "%S",
        ('S', _) => "%3f",
        ('a', _) => "%p",
        ('Z', _) => "%z",
        ('z', _) => "%Z",
        ('X', 1) => "%:z",
        ('X', 2) => "%z",
        ('X', _) => "%:z",
        (other, n) => {
            return Err(GenerationError::UnsupportedFormatToken(
                other.to_string().repeat(n),
            ))
        }
    };
    Ok(translated)
}
