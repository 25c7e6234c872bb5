//! PMBOK Exec console entry point.
//!
//! Reads commands from stdin. Plain lines go to the assistant; lines starting
//! with `/` are console commands.

use pmexec_core::{DashboardView, LeadershipLogEntry, Resource};
use pmexec_llm::GeminiGateway;
use pmexec_session::{init_tracing, ConsoleConfig, ConsoleError, Session, SessionError, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

const HELP: &str = "\
Commands:
  /filter <term>  show tables matching <term> (empty term shows all)
  /view           show the dashboard with the current filter
  /quit           exit
Anything else is sent to the assistant.";

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    let config = ConsoleConfig::load()?;
    init_tracing(&config.logging)?;

    let gateway = GeminiGateway::new(config.gemini_config()?)?;
    tracing::info!(model = gateway.model(), "Console started");
    let mut session = Session::new(gateway);

    let mut out = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut term = String::new();

    print_last_message(&mut out, &session).await?;
    write(&mut out, HELP).await?;

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed == "/quit" {
            break;
        } else if trimmed == "/help" {
            write(&mut out, HELP).await?;
        } else if trimmed == "/view" {
            print_dashboard(&mut out, &session.view(&term)).await?;
        } else if let Some(rest) = line
            .trim_start()
            .strip_prefix("/filter")
            .filter(|rest| rest.is_empty() || rest.starts_with(' '))
        {
            term = rest.strip_prefix(' ').unwrap_or(rest).to_string();
            print_dashboard(&mut out, &session.view(&term)).await?;
        } else {
            match session.submit(&line).await {
                Ok(SubmitOutcome::Applied(report)) => {
                    print_last_message(&mut out, &session).await?;
                    for warning in &report.warnings {
                        write(&mut out, &format!("  note: {}", warning)).await?;
                    }
                    for adjustment in &report.kpi_adjustments {
                        let msg = format!(
                            "  note: {} {} adjusted to {}",
                            adjustment.field, adjustment.proposed, adjustment.applied
                        );
                        write(&mut out, &msg).await?;
                    }
                    if report.added_count() > 0 {
                        print_dashboard(&mut out, &session.view(&term)).await?;
                    }
                }
                Ok(SubmitOutcome::Failed(err)) => {
                    tracing::debug!(error = %err, "Submission failed");
                    print_last_message(&mut out, &session).await?;
                }
                Err(SessionError::EmptyInput) => {}
                Err(err) => return Err(err.into()),
            }
        }
    }

    tracing::info!(
        resources = session.state().resources.len(),
        logs = session.state().logs.len(),
        "Console stopped"
    );
    Ok(())
}

async fn write(out: &mut Stdout, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

async fn print_last_message<G>(out: &mut Stdout, session: &Session<G>) -> std::io::Result<()>
where
    G: pmexec_llm::AssistantGateway,
{
    if let Some(message) = session.conversation().last() {
        let line = format!("[{}] {}: {}", message.display_time(), message.role, message.content);
        write(out, &line).await?;
    }
    Ok(())
}

async fn print_dashboard(out: &mut Stdout, view: &DashboardView<'_>) -> std::io::Result<()> {
    let kpis = view.summary.kpis;
    let mut text = format!(
        "Active Team: {}  Inventory: {}  Active Issues: {}\n\
         On-time Completion: {:.1}%  Issue Resolution: {:.1}h  Utilization: {:.1}%\n",
        view.summary.active_team,
        view.summary.inventory,
        kpis.active_issues_count,
        kpis.on_time_completion_rate,
        kpis.issue_resolution_time,
        kpis.resource_utilization,
    );

    text.push_str("-- Team --\n");
    for resource in &view.team {
        text.push_str(&team_row(resource));
    }
    text.push_str("-- Logistics --\n");
    for resource in &view.logistics {
        text.push_str(&logistics_row(resource));
    }
    text.push_str("-- Ledger --\n");
    for entry in &view.ledger {
        text.push_str(&ledger_row(entry));
    }
    write(out, text.trim_end()).await
}

fn team_row(resource: &Resource) -> String {
    format!(
        "  {} | {} | {} | {} | {}\n",
        resource.name,
        resource.role().unwrap_or("-"),
        resource.source,
        resource.assignment_status().map(|s| s.as_str()).unwrap_or("-"),
        resource.assigned_date,
    )
}

fn logistics_row(resource: &Resource) -> String {
    format!(
        "  {} | {} | {} | {}\n",
        resource.name,
        resource.source,
        resource.delivery_status().map(|s| s.as_str()).unwrap_or("-"),
        resource.assigned_date,
    )
}

fn ledger_row(entry: &LeadershipLogEntry) -> String {
    let mut row = format!(
        "  [{}] {} | {} | {} | {}\n",
        entry.effective_severity(),
        entry.kind,
        entry.description,
        entry.strategy,
        entry.timestamp.format("%Y-%m-%d %H:%M"),
    );
    if let Some(plan) = &entry.mitigation_plan {
        row.push_str(&format!("    plan: {}\n", plan));
    }
    row
}
