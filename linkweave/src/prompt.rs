// Interactive collection of the seed URL and max depth

use colored::Colorize;
use linkweave_core::budget::MAX_DEPTH_LIMIT;
use linkweave_core::normalize::normalize_absolute;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not an http(s) link")]
    NotALink(String),

    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("{0} is deeper than the limit of {max}", max = MAX_DEPTH_LIMIT)]
    TooDeep(u64),
}

/// Accept a seed only if it mentions `http` and parses as an http(s) URL.
pub fn parse_seed_url(input: &str) -> Result<String, InputError> {
    let input = input.trim();
    if !input.contains("http") || normalize_absolute(input).is_none() {
        return Err(InputError::NotALink(input.to_string()));
    }
    Ok(input.to_string())
}

/// Accept a max depth made only of ASCII digits, no larger than the limit.
pub fn parse_max_depth(input: &str) -> Result<u8, InputError> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::NotANumber(input.to_string()));
    }

    // Digits only, so the only possible parse failure is overflow.
    let depth = input.parse::<u64>().unwrap_or(u64::MAX);
    if depth > u64::from(MAX_DEPTH_LIMIT) {
        return Err(InputError::TooDeep(depth));
    }
    Ok(depth as u8)
}

fn read_answer<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before a valid answer was given",
        ));
    }
    Ok(line)
}

/// Ask for `question` until `parse` accepts the answer.
fn ask<R, W, T, F>(
    input: &mut R,
    output: &mut W,
    question: &str,
    retry: &str,
    parse: F,
) -> io::Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Result<T, InputError>,
{
    loop {
        writeln!(output, "{}", question.bright_cyan().bold())?;
        output.flush()?;

        let answer = read_answer(input)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::debug!("Rejected input: {}", e);
                writeln!(output, "{}", retry.yellow())?;
            }
        }
    }
}

pub fn prompt_seed_url<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    ask(input, output, "Enter a link:", "Try again.", parse_seed_url)
}

pub fn prompt_max_depth<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<u8> {
    let question = format!(
        "Enter the graph depth. The value must be no more than {}.",
        MAX_DEPTH_LIMIT
    );
    ask(
        input,
        output,
        &question,
        "Invalid input. Try again.",
        parse_max_depth,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_max_depth_bounds() {
        assert_eq!(parse_max_depth("0"), Ok(0));
        assert_eq!(parse_max_depth("20"), Ok(20));
        assert_eq!(parse_max_depth("21"), Err(InputError::TooDeep(21)));
    }

    #[test]
    fn test_parse_max_depth_huge_number() {
        assert_eq!(
            parse_max_depth("99999999999999999999999"),
            Err(InputError::TooDeep(u64::MAX))
        );
    }

    #[test]
    fn test_parse_max_depth_rejects_signs_and_decimals() {
        assert!(matches!(parse_max_depth("-1"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_max_depth("+3"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_max_depth("2.5"), Err(InputError::NotANumber(_))));
        assert!(matches!(parse_max_depth(""), Err(InputError::NotANumber(_))));
    }

    #[test]
    fn test_parse_seed_url() {
        assert_eq!(
            parse_seed_url(" https://example.com \n"),
            Ok("https://example.com".to_string())
        );
        assert!(parse_seed_url("example.com").is_err());
        assert!(parse_seed_url("http").is_err());
        assert!(parse_seed_url("ftp://http.example.com/").is_err());
    }
}
