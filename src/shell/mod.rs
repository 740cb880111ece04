//! Line-oriented interactive front end.
//!
//! Every command runs to completion before the next prompt is shown, so the
//! [`Session`] is only ever touched by one handler at a time.

pub mod command;
pub mod form;
pub mod session;

pub use command::{EntryArgs, ShellCommand, ShellLine, Toggle};
pub use session::{InputMode, Session};

use crate::core::engine::DocumentEngine;
use crate::core::sources::{ManualEntries, SpreadsheetFile};
use crate::core::{RecordSource, Storage};
use crate::domain::model::{ExportFormats, GenerationReport, Notice, OutputFormat};
use crate::utils::error::Result;
use clap::Parser;
use form::{entry_from_answers, record_from_entry, FORM_PROMPTS};
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<S: Storage> {
    engine: DocumentEngine<S>,
    session: Session,
    output_dir: String,
}

impl<S: Storage> Shell<S> {
    pub fn new(engine: DocumentEngine<S>, formats: ExportFormats, output_dir: impl Into<String>) -> Self {
        Self {
            engine,
            session: Session::new(formats),
            output_dir: output_dir.into(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn run<R, W>(&mut self, mut input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_line(
            &mut output,
            "📝 Personalized Document Generator\nGenerate personalized Word or PDF documents based on employee data.\nType `help` for the list of commands.",
        )
        .await?;

        loop {
            write_prompt(&mut output, &format!("docgen [{}]> ", self.session.mode())).await?;
            let Some(line) = read_line(&mut input, &mut output).await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let tokens = match command::tokenize(line) {
                Ok(tokens) => tokens,
                Err(e) => {
                    write_line(&mut output, &format!("❌ {}", e)).await?;
                    continue;
                }
            };

            let command = match ShellLine::try_parse_from(tokens) {
                Ok(parsed) => parsed.command,
                Err(e) => {
                    write_line(&mut output, e.render().to_string().trim_end()).await?;
                    continue;
                }
            };

            tracing::debug!("Shell command: {:?}", command);
            if self.handle(command, &mut input, &mut output).await? == Flow::Quit {
                break;
            }
        }

        tracing::debug!("Shell session ended");
        Ok(())
    }

    async fn handle<R, W>(
        &mut self,
        command: ShellCommand,
        input: &mut R,
        output: &mut W,
    ) -> Result<Flow>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        match command {
            ShellCommand::Mode { mode } => {
                self.session.set_mode(mode);
                write_line(output, &format!("Input method: {}", mode)).await?;
            }
            ShellCommand::Pdf { state } => {
                self.session.set_format(OutputFormat::Pdf, state.enabled());
                write_line(output, &self.status()).await?;
            }
            ShellCommand::Word { state } => {
                self.session.set_format(OutputFormat::Word, state.enabled());
                write_line(output, &self.status()).await?;
            }
            ShellCommand::Status => write_line(output, &self.status()).await?,
            ShellCommand::Upload { files } => {
                if self.require_mode(InputMode::Upload, "upload", output).await? {
                    let count = files.len();
                    self.session.select_uploads(files);
                    write_line(output, &format!("📁 {} file(s) selected", count)).await?;
                }
            }
            ShellCommand::Add(entry) => {
                if self.require_mode(InputMode::Manual, "add", output).await? {
                    self.add_entry(entry, input, output).await?;
                }
            }
            ShellCommand::List => {
                if self.require_mode(InputMode::Manual, "list", output).await? {
                    write_line(output, &format_entries(&self.session)).await?;
                }
            }
            ShellCommand::Clear => {
                if self.require_mode(InputMode::Manual, "clear", output).await? {
                    self.session.clear_entries();
                    write_line(output, "🧹 All entries cleared").await?;
                }
            }
            ShellCommand::Generate => {
                let report = self.generate().await;
                write_line(output, &format_report(&report, &self.output_dir)).await?;
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn require_mode<W>(&self, mode: InputMode, command: &str, output: &mut W) -> Result<bool>
    where
        W: AsyncWrite + Unpin,
    {
        if self.session.mode() == mode {
            return Ok(true);
        }
        write_line(
            output,
            &format!(
                "❌ `{}` is only available in {} mode (run `mode {}`)",
                command, mode, mode
            ),
        )
        .await?;
        Ok(false)
    }

    async fn add_entry<R, W>(
        &mut self,
        entry: EntryArgs,
        input: &mut R,
        output: &mut W,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let entry = if entry.is_empty() {
            let mut answers = Vec::with_capacity(FORM_PROMPTS.len());
            for prompt in FORM_PROMPTS {
                write_prompt(output, &format!("  {}: ", prompt)).await?;
                match read_line(input, output).await? {
                    Some(answer) => answers.push(answer),
                    None => {
                        write_line(output, "\n❌ Entry cancelled").await?;
                        return Ok(());
                    }
                }
            }
            entry_from_answers(answers)
        } else {
            entry
        };

        let today = chrono::Local::now().date_naive();
        match record_from_entry(entry, today) {
            Ok(record) => {
                tracing::debug!("Manual entry added: {:?}", record);
                let count = self.session.add_entry(record);
                write_line(
                    output,
                    &format!("✅ Entry added successfully! ({} in total)", count),
                )
                .await?;
            }
            Err(e) => {
                write_line(output, &format!("❌ {}", e.user_friendly_message())).await?;
            }
        }
        Ok(())
    }

    /// Runs the engine over whatever the current mode has collected.
    pub async fn generate(&self) -> GenerationReport {
        let formats = self.session.formats();
        match self.session.mode() {
            InputMode::Upload => {
                if self.session.uploads().is_empty() {
                    return report_with(Notice::error(
                        "No spreadsheet files selected. Use `upload <FILE>...` first.",
                    ));
                }
                let files: Vec<SpreadsheetFile> = self
                    .session
                    .uploads()
                    .iter()
                    .map(SpreadsheetFile::new)
                    .collect();
                let sources: Vec<&dyn RecordSource> =
                    files.iter().map(|f| f as &dyn RecordSource).collect();
                self.engine.run(&sources, formats).await
            }
            InputMode::Manual => {
                if self.session.entries().is_empty() {
                    return report_with(Notice::error(
                        "No entries to generate. Use `add` first.",
                    ));
                }
                let entries = ManualEntries::new(self.session.entries());
                self.engine.run(&[&entries], formats).await
            }
        }
    }

    fn status(&self) -> String {
        let formats = self.session.formats();
        format!(
            "Mode: {} | Word: {} | PDF: {} | Selected files: {} | Entries: {}",
            self.session.mode(),
            on_off(formats.word),
            on_off(formats.pdf),
            self.session.uploads().len(),
            self.session.entries().len()
        )
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn report_with(notice: Notice) -> GenerationReport {
    let mut report = GenerationReport::default();
    report.push(notice);
    report
}

/// Human readable summary of a generation run.
pub fn format_report(report: &GenerationReport, output_dir: &str) -> String {
    let mut out = String::new();
    for notice in &report.notices {
        let _ = writeln!(out, "{}", notice);
    }

    if report.has_files() {
        let _ = writeln!(out, "✅ Documents generated successfully!");
        let _ = writeln!(out, "Files saved in the `{}/` folder:", output_dir.trim_end_matches('/'));
        for file in &report.files {
            let _ = writeln!(out, "- {}", file.display());
        }
    } else {
        let _ = writeln!(out, "❌ No documents were generated.");
    }
    out.trim_end().to_string()
}

fn format_entries(session: &Session) -> String {
    if session.entries().is_empty() {
        return "No entries yet. Use `add` to create one.".to_string();
    }

    let header = ["#", "Name", "Email", "Company Name", "Position", "Joining Date"];
    let rows: Vec<[String; 6]> = session
        .entries()
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                (i + 1).to_string(),
                r.name.clone(),
                r.email.clone(),
                r.company.clone(),
                r.position.clone(),
                r.joining_date.clone(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::from("### Current Entries\n");
    let render = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    out.push_str(render(header.to_vec()).trim_end());
    for row in &rows {
        out.push('\n');
        out.push_str(render(row.iter().map(String::as_str).collect()).trim_end());
    }
    out
}

/// Next input line without its line ending, or `None` at end of input.
///
/// Lines that are not valid UTF-8 are reported and skipped.
async fn read_line<R, W>(input: &mut R, output: &mut W) -> Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let mut buf = Vec::new();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }

        match String::from_utf8(buf) {
            Ok(line) => return Ok(Some(line)),
            Err(e) => {
                tracing::warn!("⚠️ Ignoring input line: {}", e);
                write_line(output, "❌ Input is not valid UTF-8, line ignored").await?;
            }
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

async fn write_prompt<W: AsyncWrite + Unpin>(output: &mut W, prompt: &str) -> Result<()> {
    output.write_all(prompt.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Record, RecordFields};
    use std::path::PathBuf;

    #[test]
    fn test_format_report_lists_files() {
        let report = GenerationReport {
            files: vec![PathBuf::from("output/Jane_Doe_Acme.docx")],
            notices: vec![Notice::warning("Could not add logo")],
        };

        let text = format_report(&report, "output");

        assert!(text.starts_with("⚠️ Could not add logo"));
        assert!(text.contains("✅ Documents generated successfully!"));
        assert!(text.contains("Files saved in the `output/` folder:"));
        assert!(text.ends_with("- output/Jane_Doe_Acme.docx"));
    }

    #[test]
    fn test_format_report_without_files() {
        let text = format_report(&GenerationReport::default(), "output");
        assert_eq!(text, "❌ No documents were generated.");
    }

    #[test]
    fn test_format_entries_table() {
        let mut session = Session::new(ExportFormats::default());
        assert!(format_entries(&session).starts_with("No entries yet"));

        session.add_entry(Record::from_fields(RecordFields {
            name: Some("Jane Doe".to_string()),
            ..Default::default()
        }));
        let table = format_entries(&session);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "### Current Entries");
        assert!(lines[1].starts_with("# | Name"));
        assert!(lines[2].contains("Jane Doe"));
        assert!(lines[2].contains("our company"));
    }
}
