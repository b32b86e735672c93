/*!
 * Shell Commands
 * Parsing of ';'-separated command lines
 */

use crate::core::errors::CommandError;
use crate::process::types::ProcessClass;
use std::str::FromStr;

/// One parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the given text
    Echo(String),
    /// Greatest common divisor of two integers
    Gcd(u64, u64),
    /// Count the primes up to the bound
    Prime(u64),
    /// Sum 1..=n, reported modulo 1_000_000
    Sum(u64),
    /// Admit `count` background no-op processes
    Dummy(u32),
    /// Admit one process of the given class and duration
    Admit { class: ProcessClass, duration: u32 },
}

/// Split a line on ';' and parse each non-empty segment
pub fn parse_line(line: &str) -> Vec<Result<Command, CommandError>> {
    line.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_command)
        .collect()
}

/// Parse a single whitespace-tokenized command
pub fn parse_command(input: &str) -> Result<Command, CommandError> {
    let mut tokens = input.split_whitespace();
    let name = match tokens.next() {
        Some(name) => name,
        None => return Err(CommandError::Unknown(String::new())),
    };

    match name {
        "echo" => Ok(Command::Echo(tokens.collect::<Vec<_>>().join(" "))),
        "gcd" => {
            let x = parse_arg(tokens.next(), "gcd", "x")?;
            let y = parse_arg(tokens.next(), "gcd", "y")?;
            Ok(Command::Gcd(x, y))
        }
        "prime" => Ok(Command::Prime(parse_arg(tokens.next(), "prime", "bound")?)),
        "sum" => Ok(Command::Sum(parse_arg(tokens.next(), "sum", "n")?)),
        "dummy" => Ok(Command::Dummy(parse_arg(tokens.next(), "dummy", "count")?)),
        "admit" => {
            let class = match tokens.next() {
                Some("fg") => ProcessClass::Foreground,
                Some("bg") => ProcessClass::Background,
                Some(other) => {
                    return Err(CommandError::bad_arguments(
                        "admit",
                        format!("expected fg or bg, got {other}"),
                    ))
                }
                None => return Err(CommandError::bad_arguments("admit", "missing class")),
            };
            let duration = parse_arg(tokens.next(), "admit", "duration")?;
            Ok(Command::Admit { class, duration })
        }
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_arg<T: FromStr>(
    token: Option<&str>,
    command: &str,
    arg: &str,
) -> Result<T, CommandError> {
    let token =
        token.ok_or_else(|| CommandError::bad_arguments(command, format!("missing {arg}")))?;
    token
        .parse()
        .map_err(|_| CommandError::bad_arguments(command, format!("{arg} must be an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_echo_keeps_trailing_words() {
        assert_eq!(
            parse_command("echo hello scheduler"),
            Ok(Command::Echo("hello scheduler".to_string()))
        );
    }

    #[test]
    fn test_parse_gcd() {
        assert_eq!(parse_command("gcd 12 30"), Ok(Command::Gcd(12, 30)));
    }

    #[test]
    fn test_parse_admit() {
        assert_eq!(
            parse_command("admit fg 5"),
            Ok(Command::Admit {
                class: ProcessClass::Foreground,
                duration: 5
            })
        );
        assert_eq!(
            parse_command("admit bg 2"),
            Ok(Command::Admit {
                class: ProcessClass::Background,
                duration: 2
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_class() {
        assert!(matches!(
            parse_command("admit sideways 5"),
            Err(CommandError::BadArguments { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_missing_args() {
        assert!(matches!(
            parse_command("gcd 12"),
            Err(CommandError::BadArguments { .. })
        ));
        assert!(matches!(
            parse_command("sum twelve"),
            Err(CommandError::BadArguments { .. })
        ));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse_command("frobnicate 1"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn test_parse_line_splits_on_semicolons() {
        let parsed = parse_line("echo hi; gcd 4 6 ;; prime 10");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], Ok(Command::Echo("hi".to_string())));
        assert_eq!(parsed[1], Ok(Command::Gcd(4, 6)));
        assert_eq!(parsed[2], Ok(Command::Prime(10)));
    }

    #[test]
    fn test_parse_line_skips_blank_input() {
        assert!(parse_line("   ;  ; ").is_empty());
    }
}
