use crate::core::Record;
use crate::domain::model::{RecordFields, JOINING_DATE_FORMAT};
use crate::shell::command::EntryArgs;
use crate::utils::error::{DocGenError, Result};
use chrono::NaiveDate;

/// Prompts shown by the manual entry form, in order.
pub const FORM_PROMPTS: [&str; 5] = [
    "Name",
    "Email",
    "Company Name",
    "Position",
    "Joining Date (YYYY-MM-DD, blank for today)",
];

/// Blank means `today`; anything else must be a calendar date.
pub fn parse_joining_date(input: &str, today: NaiveDate) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(today.format(JOINING_DATE_FORMAT).to_string());
    }

    NaiveDate::parse_from_str(input, JOINING_DATE_FORMAT)
        .map(|date| date.format(JOINING_DATE_FORMAT).to_string())
        .map_err(|_| DocGenError::ValidationError {
            message: format!("'{}' is not a date in YYYY-MM-DD format", input),
        })
}

/// Builds a record from form input, applying the usual field defaults.
pub fn record_from_entry(entry: EntryArgs, today: NaiveDate) -> Result<Record> {
    let joining_date = parse_joining_date(entry.date.as_deref().unwrap_or(""), today)?;

    Ok(Record::from_fields(RecordFields {
        name: entry.name,
        email: entry.email,
        company: entry.company,
        position: entry.position,
        joining_date: Some(joining_date),
    }))
}

/// Maps answers given in [`FORM_PROMPTS`] order onto entry fields.
pub fn entry_from_answers(answers: Vec<String>) -> EntryArgs {
    let mut answers = answers.into_iter().map(|a| Some(a.trim().to_string()));
    EntryArgs {
        name: answers.next().flatten(),
        email: answers.next().flatten(),
        company: answers.next().flatten(),
        position: answers.next().flatten(),
        date: answers.next().flatten(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_blank_date_is_today() {
        assert_eq!(parse_joining_date("  ", today()).unwrap(), "2026-10-18");
    }

    #[test]
    fn test_date_is_validated() {
        assert_eq!(parse_joining_date("2024-01-10", today()).unwrap(), "2024-01-10");
        assert!(parse_joining_date("2024-13-40", today()).is_err());
        assert!(parse_joining_date("next monday", today()).is_err());
    }

    #[test]
    fn test_blank_form_uses_defaults() {
        let entry = entry_from_answers(vec![String::new(); 5]);
        let record = record_from_entry(entry, today()).unwrap();

        assert_eq!(record.name, "Employee");
        assert_eq!(record.email, "");
        assert_eq!(record.company, "our company");
        assert_eq!(record.position, "your position");
        assert_eq!(record.joining_date, "2026-10-18");
    }

    #[test]
    fn test_answers_map_to_fields_in_order() {
        let entry = entry_from_answers(
            ["Jane Doe", "jane@acme.test", "Acme", "Engineer", "2024-01-10"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        let record = record_from_entry(entry, today()).unwrap();

        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.email, "jane@acme.test");
        assert_eq!(record.company, "Acme");
        assert_eq!(record.position, "Engineer");
        assert_eq!(record.joining_date, "2024-01-10");
    }
}
