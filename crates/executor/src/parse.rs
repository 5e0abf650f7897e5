//! Line tokenizer: text → [`Request`].
//!
//! Rules:
//! - leading and inter-token whitespace is skipped
//! - the first token is the verb, matched case-insensitively
//! - a token starting with `"` runs to the closing quote, honouring `\"`
//!   and `\\`; any other escape is kept literally
//! - every other token runs to the next whitespace
//!
//! The parser never executes side effects: it yields a [`Request`] (with
//! [`Action::Unknown`] for unrecognised verbs, so the executor produces
//! the error reply) or a [`CommandError`] for lines that do not tokenize.

use coral_core::{CommandError, CommandResult};

use crate::request::{Action, Arg, Request};

/// Parse one command line (no trailing newline) into a request.
pub fn parse_line(line: &str) -> CommandResult<Request> {
    let tokens = tokenize(line)?;
    let Some((verb, rest)) = tokens.split_first() else {
        return Err(CommandError::UnknownCommand);
    };
    let action = Action::from_verb(verb);
    let args = rest.iter().map(|t| Arg::Str(t.clone())).collect();
    Ok(Request::new(action, args))
}

fn tokenize(line: &str) -> CommandResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else { break };

        if first == '"' {
            chars.next();
            let mut token = String::new();
            loop {
                match chars.next() {
                    None => return Err(CommandError::WrongArguments),
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('"') => token.push('"'),
                        Some('\\') => token.push('\\'),
                        Some(other) => {
                            token.push('\\');
                            token.push(other);
                        }
                        None => return Err(CommandError::WrongArguments),
                    },
                    Some(ch) => token.push(ch),
                }
            }
            tokens.push(token);
        } else {
            let mut token = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
            tokens.push(token);
        }
    }

    Ok(tokens)
}
