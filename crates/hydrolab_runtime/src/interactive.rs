//! Interactive sample intake.
//!
//! Asks the observation questions, the environmental questions and the
//! parameter readings, runs the analysis, prints the report and offers a
//! booking. Ctrl+C or Ctrl+D at any prompt abandons the intake.

use std::io::Write;

use hydrolab_engine::water::{Observation, Parameter};
use hydrolab_engine::{Evidence, RuleBase};
use hydrolab_foundation::{Error, Result};
use hydrolab_scheduler::{Assignment, book};

use crate::analysis::{Oracles, Report, Sample, analyze};
use crate::config::RuntimeConfig;
use crate::editor::{Console, Prompter};

/// Answer to one question.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Reply<T> {
    Answer(T),
    Skip,
    Quit,
}

/// Result of a completed intake.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The collected sample.
    pub sample: Sample,
    /// The analysis.
    pub report: Report,
    /// The slot the user booked, if any.
    pub booking: Option<Assignment>,
}

/// The questionnaire driver.
pub struct Intake<'a, P: Prompter = Console> {
    terminal: P,
    rules: &'a RuleBase,
    oracles: Oracles<'a>,
    config: &'a RuntimeConfig,
    trace: bool,
}

impl<'a> Intake<'a, Console> {
    /// Creates an intake on the terminal.
    ///
    /// # Errors
    /// Returns an error if the line editor cannot be initialized.
    pub fn new(
        rules: &'a RuleBase,
        oracles: Oracles<'a>,
        config: &'a RuntimeConfig,
    ) -> Result<Self> {
        Ok(Self::with_prompter(Console::new()?, rules, oracles, config))
    }
}

impl<'a, P: Prompter> Intake<'a, P> {
    /// Creates an intake over a custom prompter.
    pub fn with_prompter(
        terminal: P,
        rules: &'a RuleBase,
        oracles: Oracles<'a>,
        config: &'a RuntimeConfig,
    ) -> Self {
        Self {
            terminal,
            rules,
            oracles,
            config,
            trace: false,
        }
    }

    /// Builder method to include derivation traces in the report.
    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Runs the questionnaire, writing prompts' feedback and the report to
    /// `out`. Returns `None` if the user quit before the analysis.
    ///
    /// # Errors
    /// Returns an error on terminal failure or a runaway rule base.
    pub fn run(&mut self, out: &mut dyn Write) -> Result<Option<Outcome>> {
        let Some(sample) = self.collect(out)? else {
            emit(out, "Intake abandoned.")?;
            return Ok(None);
        };

        let report = analyze(self.rules, &sample, &self.oracles, self.config, self.trace)?;
        emit(out, "")?;
        write!(out, "{report}").map_err(Error::io)?;

        let booking = if report.schedule.is_empty() {
            None
        } else {
            self.choose_slot(out, &report.schedule)?
        };

        Ok(Some(Outcome {
            sample,
            report,
            booking,
        }))
    }

    fn collect(&mut self, out: &mut dyn Write) -> Result<Option<Sample>> {
        emit(out, "Water sample intake. Ctrl+D to quit.")?;
        let mut sample = Sample::new();

        emit(out, "")?;
        emit(out, "Observations")?;
        for observation in Observation::ALL {
            match self.ask_yes_no(out, observation.question())? {
                Reply::Answer(true) => sample.observations.push(observation),
                Reply::Answer(false) | Reply::Skip => {}
                Reply::Quit => return Ok(None),
            }
        }

        emit(out, "")?;
        emit(out, "Environment")?;
        let mut evidence = Evidence::default();
        for (question, flag) in [
            ("Are there industrial sites nearby?", &mut evidence.industry_nearby),
            ("Has there been heavy rain recently?", &mut evidence.heavy_rain),
        ] {
            match self.ask_yes_no(out, question)? {
                Reply::Answer(answer) => *flag = answer,
                Reply::Skip => {}
                Reply::Quit => return Ok(None),
            }
        }
        sample.evidence = evidence;

        emit(out, "")?;
        emit(out, "Readings (blank to skip)")?;
        for param in Parameter::ALL {
            let prompt = if param.unit().is_empty() {
                format!("{}: ", param.display_name())
            } else {
                format!("{} ({}): ", param.display_name(), param.unit())
            };
            match self.ask_number(out, &prompt)? {
                Reply::Answer(value) => sample.readings.push((param, value)),
                Reply::Skip => {}
                Reply::Quit => return Ok(None),
            }
        }

        Ok(Some(sample))
    }

    fn choose_slot(
        &mut self,
        out: &mut dyn Write,
        slots: &[Assignment],
    ) -> Result<Option<Assignment>> {
        let prompt = format!("Book a slot (1-{}, blank to skip): ", slots.len());
        loop {
            let reply = match self.terminal.prompt(&prompt, &[])? {
                None => Reply::Quit,
                Some(line) if line.is_empty() => Reply::Skip,
                Some(line) => match line.parse::<usize>() {
                    Ok(slot) => Reply::Answer(slot),
                    Err(_) => {
                        emit(out, "Please enter a slot number.")?;
                        continue;
                    }
                },
            };
            match reply {
                Reply::Answer(slot) => match book(slots, slot) {
                    Some(assignment) => {
                        emit(out, &format!("Booked: {assignment}"))?;
                        tracing::info!(%assignment, "slot booked");
                        return Ok(Some(assignment.clone()));
                    }
                    None => emit(out, &format!("No slot {slot}."))?,
                },
                Reply::Skip | Reply::Quit => return Ok(None),
            }
        }
    }

    fn ask_yes_no(&mut self, out: &mut dyn Write, question: &str) -> Result<Reply<bool>> {
        let prompt = format!("{question} [yes/no] ");
        loop {
            let Some(line) = self.terminal.prompt(&prompt, &["yes", "no"])? else {
                return Ok(Reply::Quit);
            };
            match parse_yes_no(&line) {
                Some(answer) => return Ok(Reply::Answer(answer)),
                None if line.is_empty() => return Ok(Reply::Skip),
                None => emit(out, "Please answer yes or no.")?,
            }
        }
    }

    fn ask_number(&mut self, out: &mut dyn Write, prompt: &str) -> Result<Reply<f64>> {
        loop {
            let Some(line) = self.terminal.prompt(prompt, &[])? else {
                return Ok(Reply::Quit);
            };
            if line.is_empty() {
                return Ok(Reply::Skip);
            }
            match line.replace(',', ".").parse::<f64>() {
                Ok(value) if value.is_finite() => return Ok(Reply::Answer(value)),
                _ => emit(out, &format!("Not a number: {line}"))?,
            }
        }
    }
}

fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

fn emit(out: &mut dyn Write, line: &str) -> Result<()> {
    writeln!(out, "{line}").map_err(Error::io)
}
