//! `formguard check`: validate a document against a bundled schema.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, ValueEnum};
use formguard_validator::{Candidate, EvalContext, Outcome};

use crate::config::CliConfig;
use crate::{input, schemas};

/// Exit code for a document that fails validation.
pub const EXIT_INVALID: u8 = 1;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Bundled schema name (see `formguard schemas`).
    pub schema: String,

    /// JSON document to validate.
    pub input: PathBuf,

    /// Evaluate with this stage instead of the default one.
    #[arg(long)]
    pub stage: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `valid`, or one `key: message` line per error
    Text,
    /// The serialized outcome
    Json,
}

/// Runs the check and prints the outcome to stdout.
///
/// Returns 0 when the document is valid and [`EXIT_INVALID`] otherwise.
/// Faults such as cancellation or a failing probe are errors.
pub async fn run_check(args: &CheckArgs, config: &CliConfig) -> anyhow::Result<u8> {
    let schema = schemas::build(&args.schema, &config.validator)?;
    let candidate = input::load(&args.input)?;

    let mut ctx = EvalContext::new();
    if let Some(stage) = &args.stage {
        ctx = ctx.with_stage(stage);
    }
    tracing::info!(schema = %args.schema, input = %args.input.display(), stage = ?args.stage, "checking");

    let outcome = schema
        .evaluate_safe(candidate, &ctx)
        .await
        .with_context(|| format!("evaluation of {} aborted", args.input.display()))?;

    let stdout = std::io::stdout();
    render(&outcome, args.format, &mut stdout.lock())?;

    Ok(if outcome.is_valid() { 0 } else { EXIT_INVALID })
}

fn render(outcome: &Outcome<Candidate>, format: OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, outcome)?;
            writeln!(out)?;
        }
        OutputFormat::Text => match outcome {
            Outcome::Valid(_) => writeln!(out, "valid")?,
            Outcome::Invalid(errors) => {
                for (key, message) in errors.iter() {
                    writeln!(out, "{key}: {message}")?;
                }
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use formguard_validator::FieldErrors;

    fn rendered(outcome: &Outcome<Candidate>, format: OutputFormat) -> String {
        let mut out = Vec::new();
        render(outcome, format, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_lists_errors_in_order() {
        let outcome = Outcome::Invalid(FieldErrors::from_iter([
            ("username", "Must be at least 3 characters"),
            ("form", "Passwords do not match"),
        ]));
        assert_eq!(
            rendered(&outcome, OutputFormat::Text),
            "username: Must be at least 3 characters\nform: Passwords do not match\n"
        );
    }

    #[test]
    fn text_valid() {
        let outcome = Outcome::Valid(Candidate::from("ok"));
        assert_eq!(rendered(&outcome, OutputFormat::Text), "valid\n");
    }

    #[test]
    fn json_is_tagged() {
        let outcome: Outcome<Candidate> = Outcome::invalid("email", "Enter a valid email address");
        let json: serde_json::Value =
            serde_json::from_str(&rendered(&outcome, OutputFormat::Json)).unwrap();
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["data"]["email"], "Enter a valid email address");
    }
}
