//! Human-readable rendering of a validation tree.
//!
//! ```text
//! /items/2: expected number, got string "x"
//! /shape: none of 2 alternatives matched
//!   #0 /shape: expected constant 1, got true
//!   #1 /shape: expected constant "x", got true
//! ```
use std::fmt;

use colored::Colorize;

use crate::validation::{Path, Segment, Validation};

pub struct Report<'a> {
    validation: &'a Validation,
    colored: bool,
}

impl<'a> Report<'a> {
    pub fn new(validation: &'a Validation) -> Self {
        Self { validation, colored: false }
    }

    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn line(&self, f: &mut fmt::Formatter<'_>, depth: usize, label: &str, path: &Path, message: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        let path = path.to_string();
        if self.colored {
            writeln!(f, "{indent}{label}{}: {}", path.dimmed(), message.red())
        } else {
            writeln!(f, "{indent}{label}{path}: {message}")
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, validation: &Validation, base: &Path, depth: usize, label: &str) -> fmt::Result {
        for (relative, failure) in validation.failures() {
            let mut path = base.clone();
            path.0.extend(relative.0);
            let message = failure.message().unwrap_or_default();
            self.line(f, depth, label, &path, &message)?;
            match failure {
                Validation::UnionOfValidations { validations } => {
                    for (i, branch) in validations.iter().enumerate() {
                        self.render(f, branch, &path, depth + 1, &format!("#{i} "))?;
                    }
                }
                Validation::DiscriminantInvalid { key, validation } => {
                    let at = path.join(Segment::Key(key.clone()));
                    self.render(f, validation, &at, depth + 1, "")?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.validation.is_valid() {
            return writeln!(f, "valid");
        }
        self.render(f, self.validation, &Path::default(), 0, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{Claim, Field};
    use crate::lookup::Lookup;
    use crate::validate::validate;
    use crate::value::Value;
    use serde_json::json;

    fn report(claim: &Claim, value: serde_json::Value) -> String {
        let v = validate(claim, &Value::from(value), &Lookup::new()).unwrap();
        Report::new(&v).to_string()
    }

    #[test]
    fn valid_is_one_word() {
        assert_eq!(report(&Claim::unknown(), json!(1)), "valid\n");
    }

    #[test]
    fn one_line_per_located_failure() {
        let claim = Claim::record([
            Field::regular("items", Claim::array(Claim::integer())),
            Field::regular("name", Claim::any_string()),
        ]);
        let text = report(&claim, json!({"items": [1, 2, "x"]}));
        assert_eq!(text, "/items/2: expected number, got string \"x\"\n/name: missing\n");
    }

    #[test]
    fn unions_list_their_alternatives() {
        let claim = Claim::or([Claim::constant(1), Claim::constant("x")]);
        let text = report(&claim, json!(true));
        assert_eq!(
            text,
            "(root): none of 2 alternatives matched\n  #0 (root): expected constant 1, got true\n  #1 (root): expected constant \"x\", got true\n"
        );
    }

    #[test]
    fn discriminant_failures_show_the_cause() {
        let claim = Claim::record([Field::discriminant("kind", Claim::constant("circle"))]);
        let text = report(&claim, json!({"kind": "square"}));
        assert_eq!(
            text,
            "(root): discriminant `kind` rejected the record\n  /kind: expected constant \"circle\", got \"square\"\n"
        );
    }
}
