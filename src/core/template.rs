use crate::core::{Letter, Record};
use crate::domain::model::{
    COLUMN_COMPANY, COLUMN_EMAIL, COLUMN_JOINING_DATE, COLUMN_NAME, COLUMN_POSITION,
};

/// A letter whose lines may reference record fields as `{Column Name}`.
#[derive(Debug, Clone, Copy)]
pub struct LetterTemplate {
    pub heading: &'static str,
    pub salutation: &'static str,
    pub body: &'static [&'static str],
    pub closing: &'static [&'static str],
}

pub const WELCOME_LETTER: LetterTemplate = LetterTemplate {
    heading: "Welcome to Your New Role!",
    salutation: "Dear {Name},",
    body: &[
        "We are delighted to welcome you as our new {Position} at {Company Name}. Your joining date is {Joining Date}.",
        "We are confident that you will make a significant contribution to our team.",
    ],
    closing: &["Best regards,", "Human Resources"],
};

impl Default for LetterTemplate {
    fn default() -> Self {
        WELCOME_LETTER
    }
}

impl LetterTemplate {
    pub fn render(&self, record: &Record) -> Letter {
        Letter {
            heading: substitute(self.heading, record),
            salutation: substitute(self.salutation, record),
            body: self.body.iter().map(|line| substitute(line, record)).collect(),
            closing: self
                .closing
                .iter()
                .map(|line| substitute(line, record))
                .collect(),
        }
    }
}

fn field<'a>(record: &'a Record, column: &str) -> Option<&'a str> {
    match column {
        COLUMN_NAME => Some(&record.name),
        COLUMN_EMAIL => Some(&record.email),
        COLUMN_COMPANY => Some(&record.company),
        COLUMN_POSITION => Some(&record.position),
        COLUMN_JOINING_DATE => Some(&record.joining_date),
        _ => None,
    }
}

/// Single pass over `text`; substituted values are never scanned again.
fn substitute(text: &str, record: &Record) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match field(record, key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
