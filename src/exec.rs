//! The closed automation vocabulary behind `exec`.
//!
//! Free-form code evaluation is deliberately not offered; the surface is a
//! fixed set of instructions dispatched through a tagged enum, and the
//! capability set is exactly the page wrapper's operations.

use crate::error::{Error, Result};
use crate::page::Page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Goto(String),
    Click(String),
    Fill { selector: String, text: String },
    Press(String),
    Wait(String),
    Eval(String),
}

/// Parse an instruction batch: statements split on `;` and newlines, each
/// shaped `verb args...`. Empty statements are skipped.
pub fn parse(code: &str) -> Result<Vec<Instruction>> {
    let mut instructions = Vec::new();
    for statement in code.split(|c| c == ';' || c == '\n') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        let (verb, rest) = match statement.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (statement, ""),
        };
        instructions.push(parse_one(verb, rest)?);
    }
    Ok(instructions)
}

fn parse_one(verb: &str, rest: &str) -> Result<Instruction> {
    let require = |what: &'static str| -> Result<String> {
        if rest.is_empty() {
            Err(Error::InvalidArgument {
                what,
                value: format!("{verb} needs an argument"),
            })
        } else {
            Ok(rest.to_string())
        }
    };

    match verb {
        "goto" => Ok(Instruction::Goto(require("url")?)),
        "click" => Ok(Instruction::Click(require("selector")?)),
        "wait" => Ok(Instruction::Wait(require("selector")?)),
        "press" => Ok(Instruction::Press(require("key")?)),
        "eval" => Ok(Instruction::Eval(require("expression")?)),
        "fill" => {
            let (selector, text) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                Error::InvalidArgument {
                    what: "fill arguments",
                    value: "fill needs a selector and text".to_string(),
                }
            })?;
            Ok(Instruction::Fill {
                selector: selector.to_string(),
                text: text.trim().to_string(),
            })
        }
        _ => Err(Error::UnknownInstruction {
            verb: verb.to_string(),
        }),
    }
}

/// Run a batch sequentially against the page; the first failure aborts.
/// `eval` results are printed as they arrive.
pub async fn run(page: &Page, instructions: &[Instruction]) -> Result<()> {
    for instruction in instructions {
        match instruction {
            Instruction::Goto(url) => page.goto(url).await?,
            Instruction::Click(selector) => page.click(selector).await?,
            Instruction::Fill { selector, text } => page.fill(selector, text).await?,
            Instruction::Press(key) => page.press_key(key).await?,
            Instruction::Wait(selector) => {
                page.wait_for_selector(selector).await?;
            }
            Instruction::Eval(expression) => {
                let value = page.evaluate(expression).await?;
                println!("{value}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_semicolon_batch() {
        let batch = parse("click #login; fill input[name=q] hello world; press Enter").unwrap();
        assert_eq!(
            batch,
            vec![
                Instruction::Click("#login".into()),
                Instruction::Fill {
                    selector: "input[name=q]".into(),
                    text: "hello world".into(),
                },
                Instruction::Press("Enter".into()),
            ]
        );
    }

    #[test]
    fn newlines_also_separate_statements() {
        let batch = parse("goto https://example.com\nwait h1").unwrap();
        assert_eq!(
            batch,
            vec![
                Instruction::Goto("https://example.com".into()),
                Instruction::Wait("h1".into()),
            ]
        );
    }

    #[test]
    fn eval_keeps_the_rest_of_the_statement_verbatim() {
        let batch = parse("eval document.title + ' ok'").unwrap();
        assert_eq!(batch, vec![Instruction::Eval("document.title + ' ok'".into())]);
    }

    #[test]
    fn empty_statements_are_skipped() {
        let batch = parse("click a;;  \n press Enter;").unwrap();
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn unknown_verbs_are_usage_errors() {
        let err = parse("explode #button").unwrap_err();
        assert!(matches!(err, Error::UnknownInstruction { verb } if verb == "explode"));
    }

    #[test]
    fn missing_arguments_are_rejected() {
        assert!(parse("click").is_err());
        assert!(parse("fill #only-selector").is_err());
        assert!(parse("press").is_err());
    }
}
