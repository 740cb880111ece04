use crate::core::emitter::{emitter_for, output_file_name, Emitter, Logo};
use crate::core::template::{LetterTemplate, WELCOME_LETTER};
use crate::core::{Letter, Record, RecordSource, Storage};
use crate::domain::model::{ExportFormats, GenerationReport, LogoSettings, Notice};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::collections::HashSet;
use std::path::PathBuf;

/// Runs records from one or more sources through the selected emitters.
///
/// Sources, records and emitters are processed strictly one after another.
/// Failures never abort the run: they are turned into notices on the
/// returned [`GenerationReport`] and the next item is processed.
pub struct DocumentEngine<S: Storage> {
    storage: S,
    template: LetterTemplate,
    logo: LogoSettings,
    monitor: SystemMonitor,
}

impl<S: Storage> DocumentEngine<S> {
    pub fn new(storage: S, logo: LogoSettings) -> Self {
        Self::new_with_monitoring(storage, logo, false)
    }

    pub fn new_with_monitoring(storage: S, logo: LogoSettings, monitor_enabled: bool) -> Self {
        Self {
            storage,
            template: WELCOME_LETTER,
            logo,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(
        &self,
        sources: &[&dyn RecordSource],
        formats: ExportFormats,
    ) -> GenerationReport {
        let mut report = GenerationReport::default();

        if formats.is_empty() {
            tracing::warn!("No output format selected");
            report.push(Notice::warning(
                "No output format selected. Enable Word and/or PDF export.",
            ));
            return report;
        }

        let emitters: Vec<Box<dyn Emitter>> = formats
            .selected()
            .into_iter()
            .map(|format| emitter_for(format, &self.logo))
            .collect();
        let logo = self.load_logo(&mut report).await;
        let mut written = HashSet::new();

        for source in sources {
            let label = source.label();
            let records = match source.extract().await {
                Ok(records) => records,
                Err(e) => {
                    tracing::error!("❌ {}: {} (Category: {:?})", label, e, e.category());
                    report.push(Notice::error(format!(
                        "{}: {}",
                        label,
                        e.user_friendly_message()
                    )));
                    continue;
                }
            };
            tracing::info!("Extracted {} records from {}", records.len(), label);

            for record in &records {
                let letter = self.template.render(record);
                for emitter in &emitters {
                    self.emit(
                        emitter.as_ref(),
                        record,
                        &letter,
                        logo.as_ref(),
                        &mut written,
                        &mut report,
                    )
                    .await;
                }
            }

            self.monitor.log_stats(&format!("After {}", label));
        }

        self.monitor.log_final_stats();
        report
    }

    async fn load_logo(&self, report: &mut GenerationReport) -> Option<Logo> {
        let path = &self.logo.path;
        match Logo::load(path).await {
            Ok(Some(logo)) => {
                tracing::debug!(
                    "Loaded logo {} ({}x{})",
                    path.display(),
                    logo.width(),
                    logo.height()
                );
                Some(logo)
            }
            Ok(None) => {
                tracing::debug!("No logo at {}, continuing without", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("⚠️ Could not load logo {}: {}", path.display(), e);
                report.push(Notice::warning(format!(
                    "Could not add logo {}: {}",
                    path.display(),
                    e
                )));
                None
            }
        }
    }

    async fn emit(
        &self,
        emitter: &dyn Emitter,
        record: &Record,
        letter: &Letter,
        logo: Option<&Logo>,
        written: &mut HashSet<PathBuf>,
        report: &mut GenerationReport,
    ) {
        let format = emitter.format();
        let file_name = output_file_name(record, format);

        match self.write_document(emitter, letter, logo, &file_name).await {
            Ok(path) => {
                if written.insert(path.clone()) {
                    tracing::info!("📄 Generated {}", path.display());
                    report.files.push(path);
                } else {
                    // 同名同公司：後寫入者覆蓋
                    tracing::warn!("⚠️ Overwrote {}", path.display());
                    report.push(Notice::warning(format!(
                        "{} was overwritten by another record with the same Name and Company Name",
                        path.display()
                    )));
                }
            }
            Err(e) => {
                tracing::error!(
                    "❌ Error generating {} document for {}: {}",
                    format,
                    record.name,
                    e
                );
                report.push(Notice::error(format!(
                    "Error generating {} document for {}: {}",
                    format, record.name, e
                )));
            }
        }
    }

    async fn write_document(
        &self,
        emitter: &dyn Emitter,
        letter: &Letter,
        logo: Option<&Logo>,
        file_name: &str,
    ) -> Result<PathBuf> {
        let bytes = emitter.render(letter, logo)?;
        tracing::debug!("Writing {} ({} bytes)", file_name, bytes.len());
        self.storage.write_file(file_name, &bytes).await
    }
}
