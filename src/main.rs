use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use hrms_onboarding::config::OnboardingConfig;
use hrms_onboarding::identity::StaticIdentity;
use hrms_onboarding::onboarding::{
    EducationField, FlowSnapshot, FormField, GENDER_OPTIONS, OnboardingFlow, OnboardingStep, Role,
    SubmissionState, SubmitOutcome, ValidationErrors,
};

const HELP: &str = "\
Commands:
  show                          print the form and wizard state
  set <field> <value>           e.g. set fullName Asha Rao
  role employee|admin
  same on|off                   permanent address same as current
  edu add
  edu set <n> <field> <value>   field: degree|university|year|specialisation
  edu rm <n>
  next | back                   next validates the current step
  submit | reset
  quit";

/// One line of terminal input.
#[derive(Debug, PartialEq)]
enum Command {
    Show,
    Set(FormField, String),
    Role(Role),
    Same(bool),
    EduAdd,
    EduSet(usize, EducationField, String),
    EduRemove(usize),
    Next,
    Back,
    Submit,
    Reset,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.trim().splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default().trim();

    let command = match verb {
        "show" => Command::Show,
        "next" => Command::Next,
        "back" => Command::Back,
        "submit" => Command::Submit,
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "set" => {
            let (name, value) = rest.split_once(' ').unwrap_or((rest, ""));
            let field: FormField = name.parse().map_err(|e| format!("{e}"))?;
            Command::Set(field, value.trim().to_string())
        }
        "role" => match rest.to_ascii_lowercase().as_str() {
            "employee" => Command::Role(Role::Employee),
            "admin" => Command::Role(Role::Admin),
            other => return Err(format!("Unknown role: {other}")),
        },
        "same" => match rest {
            "on" => Command::Same(true),
            "off" => Command::Same(false),
            other => return Err(format!("Expected on|off, got '{other}'")),
        },
        "edu" => parse_edu(rest)?,
        "" => return Err("Empty command".to_string()),
        other => return Err(format!("Unknown command: {other}")),
    };
    Ok(command)
}

fn parse_edu(rest: &str) -> Result<Command, String> {
    let mut parts = rest.splitn(4, char::is_whitespace);
    let sub = parts.next().unwrap_or_default();
    let index = |raw: Option<&str>| -> Result<usize, String> {
        raw.and_then(|n| n.parse::<usize>().ok())
            .filter(|n| *n >= 1)
            .ok_or_else(|| "Expected a 1-based item number".to_string())
    };

    match sub {
        "add" => Ok(Command::EduAdd),
        "rm" => Ok(Command::EduRemove(index(parts.next())?)),
        "set" => {
            let n = index(parts.next())?;
            let field: EducationField = parts
                .next()
                .unwrap_or_default()
                .parse()
                .map_err(|e| format!("{e}"))?;
            let value = parts.next().unwrap_or_default().trim().to_string();
            Ok(Command::EduSet(n, field, value))
        }
        other => Err(format!("Unknown edu command: {other}")),
    }
}

fn step_line(step: OnboardingStep) -> String {
    format!(
        "Step {}/{}: {}",
        step.number(),
        OnboardingStep::COUNT,
        step.title()
    )
}

fn required_line(errors: &ValidationErrors) -> String {
    let list: Vec<&str> = errors.iter().map(String::as_str).collect();
    format!("Required: {}", list.join(", "))
}

fn print_snapshot(snapshot: &FlowSnapshot) {
    println!("{}", step_line(snapshot.state.current_step));
    match serde_json::to_string_pretty(snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to render state: {e}"),
    }
}

async fn education_id(flow: &OnboardingFlow, n: usize) -> Option<String> {
    flow.form()
        .await
        .educational_history
        .get(n - 1)
        .map(|item| item.id.clone())
}

/// Apply a command. Returns false when the session should end.
async fn run_command(flow: &OnboardingFlow, command: Command) -> bool {
    match command {
        Command::Show => print_snapshot(&flow.snapshot().await),
        Command::Set(field, value) => {
            if field == FormField::Gender && !GENDER_OPTIONS.contains(&value.as_str()) {
                eprintln!("Gender must be one of: {}", GENDER_OPTIONS.join(", "));
                return true;
            }
            flow.update_field(field, value).await;
        }
        Command::Role(role) => flow.set_role(role).await,
        Command::Same(is_same) => flow.toggle_same_as_current(is_same).await,
        Command::EduAdd => {
            let item = flow.add_education_item().await;
            let count = flow.form().await.educational_history.len();
            println!("Added education item {count} ({})", item.id);
        }
        Command::EduSet(n, field, value) => match education_id(flow, n).await {
            Some(id) => {
                if let Err(e) = flow.update_education_field(&id, field, value).await {
                    eprintln!("{e}");
                }
            }
            None => eprintln!("No education item {n}"),
        },
        Command::EduRemove(n) => {
            let form = flow.form().await;
            let Some(item) = form.educational_history.get(n - 1) else {
                eprintln!("No education item {n}");
                return true;
            };
            if flow.remove_education_item(item).await {
                println!("Removed education item {n}");
            } else {
                eprintln!("At least one education item is required");
            }
        }
        Command::Next => {
            if flow.current_step().await.is_last() {
                println!("Last step reached; use 'submit'");
            } else if flow.advance().await {
                println!("{}", step_line(flow.current_step().await));
            } else {
                let state = flow.state().await;
                if state.has_errors() {
                    eprintln!("{}", required_line(&state.validation_errors));
                }
            }
        }
        Command::Back => println!("{}", step_line(flow.previous_step().await)),
        Command::Submit => {
            if !flow.spawn_submit() {
                eprintln!("A submission is already running");
                return true;
            }
            match flow.wait_for_submission().await {
                Some(SubmitOutcome::Blocked(errors)) => eprintln!("{}", required_line(&errors)),
                Some(SubmitOutcome::InProgress) => eprintln!("A submission is already running"),
                // Success and failure are reported by the snapshot watcher.
                Some(SubmitOutcome::Finished(_)) | None => {}
            }
        }
        Command::Reset => flow.reset_submission().await,
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
    }
    true
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = OnboardingConfig::from_env().context("Invalid HRMS_* configuration")?;

    let identity = Arc::new(StaticIdentity::from(config.user_id.clone()));
    let flow = OnboardingFlow::open_local(identity, config.clone())
        .await
        .with_context(|| format!("Failed to open database at {}", config.db_path.display()))?;

    eprintln!("HRMS onboarding v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Database: {}", config.db_path.display());
    eprintln!(
        "   User: {}",
        config.user_id.as_deref().unwrap_or("(not logged in)")
    );
    eprintln!("   Type 'help' for commands.\n");

    // Report submission transitions as they are published.
    let mut rx = flow.subscribe();
    let watcher = tokio::spawn(async move {
        let mut last = SubmissionState::Idle;
        loop {
            match rx.recv().await {
                Ok(snapshot) => {
                    if snapshot.state.submission != last {
                        match &snapshot.state.submission {
                            SubmissionState::Loading => eprintln!("Submitting..."),
                            SubmissionState::Success => eprintln!("Onboarding complete."),
                            SubmissionState::Error(message) => {
                                eprintln!("Submission failed: {message}")
                            }
                            SubmissionState::Idle => {}
                        }
                        last = snapshot.state.submission;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Snapshot watcher lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprint!("> ");
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    eprint!("> ");
                    continue;
                }
                match parse_command(&line) {
                    Ok(command) => {
                        if !run_command(&flow, command).await {
                            break;
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
                eprint!("> ");
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                break;
            }
        }
    }

    drop(flow);
    let _ = watcher.await;
    Ok(())
}
