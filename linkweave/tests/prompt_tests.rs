use linkweave::prompt::*;
use std::io::{Cursor, ErrorKind};

fn run_depth(input: &str) -> (std::io::Result<u8>, String) {
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut output = Vec::new();
    let result = prompt_max_depth(&mut reader, &mut output);
    (result, String::from_utf8_lossy(&output).into_owned())
}

fn run_seed(input: &str) -> (std::io::Result<String>, String) {
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut output = Vec::new();
    let result = prompt_seed_url(&mut reader, &mut output);
    (result, String::from_utf8_lossy(&output).into_owned())
}

#[test]
fn test_depth_accepted_first_time() {
    let (result, output) = run_depth("3\n");

    assert_eq!(result.unwrap(), 3);
    assert!(output.contains("no more than 20"));
    assert!(!output.contains("Invalid input"));
}

#[test]
fn test_depth_over_limit_and_non_numeric_reprompt() {
    let (result, output) = run_depth("25\nabc\n7\n");

    assert_eq!(result.unwrap(), 7);
    assert_eq!(output.matches("Invalid input. Try again.").count(), 2);
    assert_eq!(output.matches("Enter the graph depth").count(), 3);
}

#[test]
fn test_depth_zero_and_twenty_accepted() {
    assert_eq!(run_depth("0\n").0.unwrap(), 0);
    assert_eq!(run_depth("20\n").0.unwrap(), 20);
}

#[test]
fn test_depth_eof_is_an_error() {
    let (result, _) = run_depth("abc\n");
    assert_eq!(result.unwrap_err().kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn test_seed_reprompts_until_http_link() {
    let (result, output) = run_seed("example.com\nwww.example.com\nhttp://example.com\n");

    assert_eq!(result.unwrap(), "http://example.com");
    assert_eq!(output.matches("Try again.").count(), 2);
}

#[test]
fn test_seed_eof_is_an_error() {
    let (result, _) = run_seed("");
    assert_eq!(result.unwrap_err().kind(), ErrorKind::UnexpectedEof);
}

#[test]
fn test_parse_errors_describe_the_input() {
    assert_eq!(
        parse_max_depth("25").unwrap_err().to_string(),
        "25 is deeper than the limit of 20"
    );
    assert_eq!(
        parse_max_depth("abc").unwrap_err().to_string(),
        "'abc' is not a whole number"
    );
    assert_eq!(
        parse_seed_url("ftp://files").unwrap_err().to_string(),
        "'ftp://files' is not an http(s) link"
    );
}
