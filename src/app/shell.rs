//! Line-oriented editor for a blend session.
//!
//! Rows are numbered from 1 for the operator. Every command error is printed
//! and the loop carries on; only I/O failures end it.

use crate::config::job::ReportOptions;
use crate::core::runner::BlendRunner;
use crate::core::session::BlendSession;
use crate::domain::ports::{ReportSettings, Storage};
use crate::utils::error::{BlendError, Result};
use crate::utils::format::{
    format_degrees, format_liters, format_number, format_whole_liters, NumberStyle,
};
use crate::utils::validation::{parse_component_row, parse_quantity, ValidationPolicy};
use std::io::{BufRead, Write};

const HELP: &str = "\
Commands:
  list                               show the blend table and totals
  add <name>;<volume>;<strength>     append a component
  edit <row> <name>;<volume>;<strength>
  remove <row>                       delete a component
  clear                              delete every component
  strength                           final strength of the blend (Cf)
  target <degrees>                   set the dilution target
  dilute [degrees]                   water needed to reach the target (Va)
  report                             print the report of the last calculation
  export                             write the report files
  help                               show this text
  quit                               leave";

enum Flow {
    Continue,
    Quit,
}

pub struct BlendShell<S: Storage> {
    session: BlendSession,
    policy: ValidationPolicy,
    report: ReportOptions,
    runner: BlendRunner<S>,
}

impl<S: Storage> BlendShell<S> {
    pub fn new(
        session: BlendSession,
        policy: ValidationPolicy,
        report: ReportOptions,
        storage: S,
    ) -> Self {
        Self {
            session,
            policy,
            report,
            runner: BlendRunner::new(storage),
        }
    }

    pub fn session(&self) -> &BlendSession {
        &self.session
    }

    fn style(&self) -> NumberStyle {
        self.report.number_style()
    }

    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        writeln!(output, "{}", self.report.title().to_uppercase())?;
        writeln!(output, "Type 'help' for commands.")?;
        self.print_table(&mut output)?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            tracing::debug!(command = line, "shell command");

            match self.execute(line, &mut output).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(BlendError::IoError(e)) => return Err(BlendError::IoError(e)),
                Err(e) => {
                    writeln!(output, "! {}", e.user_friendly_message())?;
                    writeln!(output, "  {}", e.recovery_suggestion())?;
                }
            }
        }
        Ok(())
    }

    async fn execute<W: Write>(&mut self, line: &str, output: &mut W) -> Result<Flow> {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_ascii_lowercase().as_str() {
            "help" | "?" => writeln!(output, "{}", HELP)?,
            "list" | "ls" => self.print_table(output)?,
            "add" => {
                let row = self.session.components().len() + 1;
                let component = parse_component_row(rest, row, self.policy, self.style())?;
                self.session.add_component(component);
                self.print_table(output)?;
            }
            "edit" => {
                let (row, fields) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                    BlendError::invalid_component("row", rest, "expected <row> <name;volume;strength>")
                })?;
                let index = self.row_index(row)?;
                let component =
                    parse_component_row(fields.trim(), index + 1, self.policy, self.style())?;
                self.session.update_component(index, component)?;
                self.print_table(output)?;
            }
            "remove" | "rm" => {
                let index = self.row_index(rest)?;
                let removed = self.session.remove_component(index)?;
                writeln!(output, "Removed {}", removed.name())?;
                self.print_table(output)?;
            }
            "clear" => {
                self.session.clear();
                writeln!(output, "Blend cleared")?;
            }
            "strength" | "cf" => {
                if !self.session.blend().has_volume() {
                    return Err(BlendError::ZeroVolumeBlend);
                }
                let result = self.session.calculate_strength()?;
                let style = self.style();
                writeln!(output, "Final strength (Cf): {}", format_degrees(result.final_strength, style))?;
                writeln!(output, "Total LAA: {}", format_number(result.total_pure_alcohol, 2, style))?;
            }
            "target" => {
                let target = parse_quantity("target_strength", rest, self.style())?;
                crate::utils::validation::validate_target_strength(target)?;
                self.session.set_target_strength(target);
                writeln!(output, "Target strength: {}", format_degrees(target, self.style()))?;
            }
            "dilute" | "va" => {
                let target = if rest.is_empty() {
                    self.session.target_strength()
                } else {
                    parse_quantity("target_strength", rest, self.style())?
                };
                crate::utils::validation::validate_target_strength(target)?;
                let result = self.session.calculate_dilution(target)?;
                let style = self.style();
                writeln!(output, "Water to add (Va): {}", format_liters(result.water_to_add, style))?;
                writeln!(output, "Final volume (Vf): {}", format_liters(result.final_volume_needed, style))?;
                if !result.is_reachable() {
                    writeln!(
                        output,
                        "! The blend is already at or below {}; adding water cannot reach it",
                        format_degrees(target, style)
                    )?;
                }
            }
            "report" => {
                let report = self
                    .session
                    .report(self.report.title(), self.style())
                    .ok_or(BlendError::NoCalculation)?;
                write!(output, "{}", report.render_text())?;
            }
            "export" => {
                let report = self
                    .session
                    .report(self.report.title(), self.style())
                    .ok_or(BlendError::NoCalculation)?;
                // a failed write is reported; only the shell's own I/O ends the loop
                match self.runner.write_report(&report, &self.report).await {
                    Ok(names) => {
                        for name in names {
                            writeln!(output, "Saved {}/{}", self.report.output_path(), name)?;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Report export failed: {}", e);
                        writeln!(
                            output,
                            "! Could not write the report: {}",
                            e.user_friendly_message()
                        )?;
                        writeln!(output, "  {}", e.recovery_suggestion())?;
                    }
                }
            }
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            other => {
                writeln!(output, "Unknown command '{}'. Type 'help' for commands.", other)?;
            }
        }
        Ok(Flow::Continue)
    }

    fn row_index(&self, text: &str) -> Result<usize> {
        let len = self.session.components().len();
        let row: usize = text
            .trim()
            .parse()
            .map_err(|_| BlendError::invalid_component("row", text, "not a row number"))?;
        if row == 0 || row > len {
            return Err(BlendError::RowNotFound { row, len });
        }
        Ok(row - 1)
    }

    fn print_table<W: Write>(&self, output: &mut W) -> Result<()> {
        let style = self.style();
        writeln!(
            output,
            "{:>3}  {:<28}{:>14}{:>14}{:>14}",
            "#", "Component", "Volume (L)", "Grade (GL)", "LAA"
        )?;
        for (i, c) in self.session.components().iter().enumerate() {
            writeln!(
                output,
                "{:>3}  {:<28}{:>14}{:>14}{:>14}",
                i + 1,
                c.name(),
                format_number(c.volume(), 2, style),
                format_number(c.strength(), 2, style),
                format_number(c.pure_alcohol_content(), 2, style),
            )?;
        }
        let blend = self.session.blend();
        writeln!(
            output,
            "TOTAL VOLUME (L): {}   TOTAL LAA: {}",
            format_whole_liters(blend.total_volume(), style),
            format_whole_liters(blend.total_pure_alcohol(), style),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::local_storage::LocalStorage;
    use tempfile::TempDir;

    async fn transcript(commands: &str) -> (String, BlendSession) {
        let dir = TempDir::new().unwrap();
        let mut shell = BlendShell::new(
            BlendSession::default(),
            ValidationPolicy::Reject,
            ReportOptions::default(),
            LocalStorage::new(dir.path()),
        );
        let mut out = Vec::new();
        shell.run(commands.as_bytes(), &mut out).await.unwrap();
        (String::from_utf8(out).unwrap(), shell.session().clone())
    }

    #[tokio::test]
    async fn test_initial_table_shows_seed_totals() {
        let (out, _) = transcript("quit\n").await;
        assert!(out.contains("Base alcohol"));
        assert!(out.contains("TOTAL VOLUME (L): 1,000   TOTAL LAA: 960"));
    }

    #[tokio::test]
    async fn test_add_then_strength() {
        let (out, session) = transcript("add Water;1000;0\nstrength\n").await;
        assert_eq!(session.components().len(), 3);
        assert!(out.contains("Final strength (Cf): 48.00 °GL"));
    }

    #[tokio::test]
    async fn test_dilute_uses_session_target() {
        let (out, session) = transcript("target 48\ndilute\n").await;
        assert!(out.contains("Water to add (Va): 1,000.00 L"));
        assert!(out.contains("Final volume (Vf): 2,000.00 L"));
        assert_eq!(session.target_strength(), 48.0);
    }

    #[tokio::test]
    async fn test_unreachable_dilution_warns() {
        let (out, _) = transcript("dilute 97\n").await;
        assert!(out.contains("Water to add (Va): 0.00 L"));
        assert!(out.contains("adding water cannot reach it"));
    }

    #[tokio::test]
    async fn test_errors_do_not_stop_the_shell() {
        let (out, session) =
            transcript("remove 9\nadd Bad;10;140\nedit 1 Water;-1;0\ndilute 0\nreport\nremove 1\n")
                .await;
        assert!(out.contains("There is no row 9"));
        assert!(out.contains("between 0 and 100"));
        assert!(out.contains("Nothing has been calculated yet"));
        assert!(out.contains("Removed Water"));
        assert_eq!(session.components().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_volume_reports_advisory() {
        let (out, session) = transcript("clear\nstrength\n").await;
        assert!(out.contains("No volume entered"));
        assert!(session.last_calculation().is_none());
    }

    #[tokio::test]
    async fn test_report_after_calculation() {
        let (out, _) = transcript("dilute 40\nreport\n").await;
        assert!(out.contains("RESULTS:"));
        assert!(out.contains("Water to add: 1,400.00 L"));
    }

    #[tokio::test]
    async fn test_export_writes_report_file() {
        let dir = TempDir::new().unwrap();
        let mut shell = BlendShell::new(
            BlendSession::default(),
            ValidationPolicy::Reject,
            ReportOptions::default(),
            LocalStorage::new(dir.path()),
        );
        let mut out = Vec::new();
        shell
            .run("strength\nexport\n".as_bytes(), &mut out)
            .await
            .unwrap();

        assert!(dir.path().join("blend_report.txt").exists());
        assert!(String::from_utf8(out).unwrap().contains("Saved ./output/blend_report.txt"));
    }

    #[tokio::test]
    async fn test_failed_export_keeps_the_session_running() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"").unwrap();

        let mut shell = BlendShell::new(
            BlendSession::default(),
            ValidationPolicy::Reject,
            ReportOptions::default(),
            LocalStorage::new(blocker.join("reports")),
        );
        let mut out = Vec::new();
        shell
            .run("strength\nexport\nadd Water;1000;0\nlist\n".as_bytes(), &mut out)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("! Could not write the report"));
        assert_eq!(shell.session().components().len(), 3);
        assert!(out.contains("TOTAL VOLUME (L): 2,000   TOTAL LAA: 960"));
    }

    #[tokio::test]
    async fn test_thousands_input_follows_number_style() {
        let (out, session) = transcript("clear\nadd Base alcohol;1,000;96\n").await;
        assert_eq!(session.components()[0].volume(), 1000.0);
        assert!(out.contains("Blend cleared"));

        let dir = TempDir::new().unwrap();
        let report = ReportOptions {
            number_style: NumberStyle::Localized,
            ..ReportOptions::default()
        };
        let mut shell = BlendShell::new(
            BlendSession::new(crate::domain::model::Blend::new()),
            ValidationPolicy::Reject,
            report,
            LocalStorage::new(dir.path()),
        );
        let mut out = Vec::new();
        shell
            .run("add Base alcohol;1.000;96,5\n".as_bytes(), &mut out)
            .await
            .unwrap();
        assert_eq!(shell.session().components()[0].volume(), 1000.0);
        assert_eq!(shell.session().components()[0].strength(), 96.5);
        assert!(String::from_utf8(out).unwrap().contains("TOTAL VOLUME (L): 1.000"));
    }
}
