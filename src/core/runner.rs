use crate::core::report::Report;
use crate::core::session::BlendSession;
use crate::domain::model::Calculation;
use crate::domain::ports::{ReportSettings, Storage};
use crate::utils::error::{BlendError, Result};

/// Which of the two blend queries to run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalculationRequest {
    Strength,
    Dilution { target_strength: f64 },
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub calculation: Calculation,
    pub report: Report,
    /// Paths of the written files, relative to the storage root.
    pub written: Vec<String>,
}

/// Runs one calculation against a session and writes the report through `Storage`.
pub struct BlendRunner<S: Storage> {
    storage: S,
}

impl<S: Storage> BlendRunner<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn run<R: ReportSettings>(
        &self,
        session: &mut BlendSession,
        request: CalculationRequest,
        settings: &R,
        write_report: bool,
    ) -> Result<RunOutcome> {
        tracing::info!(
            "Calculating {:?} for {} components",
            request,
            session.components().len()
        );

        let calculation = match request {
            CalculationRequest::Strength => {
                if !session.blend().has_volume() {
                    tracing::warn!("No volume entered, final strength is undefined");
                    return Err(BlendError::ZeroVolumeBlend);
                }
                Calculation::Strength(session.calculate_strength()?)
            }
            CalculationRequest::Dilution { target_strength } => {
                Calculation::Dilution(session.calculate_dilution(target_strength)?)
            }
        };

        let report = session
            .report(settings.title(), settings.number_style())
            .ok_or(BlendError::NoCalculation)?;

        let written = if write_report {
            self.write_report(&report, settings).await?
        } else {
            Vec::new()
        };

        Ok(RunOutcome {
            calculation,
            report,
            written,
        })
    }

    /// Writes each configured format, or a single ZIP when compression is on.
    pub async fn write_report<R: ReportSettings>(
        &self,
        report: &Report,
        settings: &R,
    ) -> Result<Vec<String>> {
        let stem = settings.file_stem();

        if settings.compress() {
            let name = format!("{}.zip", stem);
            let data = report.bundle(stem, settings.formats())?;
            tracing::debug!("Writing ZIP report ({} bytes)", data.len());
            self.storage.write_file(&name, &data).await?;
            tracing::info!("Report saved to {}/{}", settings.output_path(), name);
            return Ok(vec![name]);
        }

        let mut written = Vec::new();
        for (name, data) in report.outputs(stem, settings.formats())? {
            self.storage.write_file(&name, &data).await?;
            tracing::info!("Report saved to {}/{}", settings.output_path(), name);
            written.push(name);
        }
        Ok(written)
    }
}
