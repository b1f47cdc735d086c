use std::cmp::Ordering;

use jiff::{Timestamp, civil::Date, tz::TimeZone};

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::error::ValidationError;

/// Current date in UTC, the calendar used for record dates
pub fn today() -> Date {
    today_at(Timestamp::now())
}

pub fn today_at(now: Timestamp) -> Date {
    now.to_zoned(TimeZone::UTC).date()
}

/// Start of `date` as an instant, the way an ISO date string is read
pub fn midnight_utc(date: Date) -> Option<Timestamp> {
    date.to_zoned(TimeZone::UTC).ok().map(|z| z.timestamp())
}

pub fn parse_date(value: &str) -> Result<Date, ValidationError> {
    value
        .trim()
        .parse::<Date>()
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Locale style comparison for display names, in three levels:
/// base letters (accents and case stripped, spaces and punctuation before
/// digits before letters), then accents, then lowercase before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let primary = collation_key(a).cmp(collation_key(b));
    if primary != Ordering::Equal {
        return primary;
    }
    let accents = a
        .nfd()
        .flat_map(char::to_lowercase)
        .cmp(b.nfd().flat_map(char::to_lowercase));
    if accents != Ordering::Equal {
        return accents;
    }
    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            return match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => x.cmp(&y),
            };
        }
    }
    a.len().cmp(&b.len())
}

fn collation_key(s: &str) -> impl Iterator<Item = (u8, char)> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| (char_rank(c), c))
}

fn char_rank(c: char) -> u8 {
    if c.is_whitespace() {
        0
    } else if c.is_numeric() {
        2
    } else if c.is_alphabetic() {
        3
    } else {
        1
    }
}

/// Natural sort comparison of two strings
/// So that "file2" < "file10"
/// Split into number and string tokens
/// Compare number tokens numerically, string tokens lexicographically
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let tokens_a = get_tokens(a);
    let tokens_b = get_tokens(b);

    for (a, b) in tokens_a.iter().zip(tokens_b.iter()) {
        let or = match (a, b) {
            (Token::Number(a), Token::Number(b)) => a.cmp(b),
            (Token::Number(_), Token::String(_)) => Ordering::Less,
            (Token::String(_), Token::Number(_)) => Ordering::Greater,
            (Token::String(a), Token::String(b)) => a.cmp(b),
        };
        if or != Ordering::Equal {
            return or;
        }
    }
    tokens_a.len().cmp(&tokens_b.len()) //in case different length but equal up to the shortest
}
enum Token {
    Number(u64),
    String(String),
}
fn get_tokens(s: &str) -> Vec<Token> {
    let mut tokens = vec![];
    let mut it = s.chars().peekable();
    loop {
        let Some(c) = it.next() else {
            break;
        };

        if c.is_numeric() {
            let mut s = String::from(c);
            while let Some(n) = it.peek() {
                if n.is_numeric() {
                    s.push(*n);
                    it.next();
                } else {
                    break;
                }
            }
            match s.parse::<u64>() {
                Ok(num) => tokens.push(Token::Number(num)),
                Err(_) => tokens.push(Token::String(s)),
            }
        } else {
            let mut s = String::from(c);
            while let Some(c) = it.peek() {
                if !c.is_numeric() {
                    s.push(*c);
                    it.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::String(s));
        }
    }

    tokens
}
