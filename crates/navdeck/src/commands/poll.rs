//! `navdeck poll <url>`: qBittorrent transfer status.

use tabled::Tabled;

use navdeck_core::{ControlPlaneEnvelope, ItemSummary, PollError, ProbeTarget, StatusService};

use crate::cli::{GlobalOpts, OutputFormat, PollArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TorrentRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Down")]
    down: String,
    #[tabled(rename = "Up")]
    up: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&ItemSummary> for TorrentRow {
    fn from(t: &ItemSummary) -> Self {
        Self {
            name: t.name.clone(),
            progress: format!("{:.1}%", t.progress_fraction * 100.0),
            down: output::human_rate(t.download_rate_bps),
            up: output::human_rate(t.upload_rate_bps),
            state: t.state.clone(),
        }
    }
}

pub async fn handle(
    args: PollArgs,
    service: &StatusService,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = ProbeTarget::parse(args.url.trim()).map_err(|e| CliError::InvalidTarget {
        reason: e.to_string(),
    })?;

    let envelope = service.poll_target(target).await;

    let rendered = match global.output {
        OutputFormat::Table => table(&envelope),
        OutputFormat::Plain => envelope
            .status
            .items
            .iter()
            .map(|t| format!("{}\t{}\t{}", t.id, t.state, t.name))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => output::render_single(&global.output, &envelope, table, |_| String::new()),
    };
    output::print_output(&rendered, global.quiet);

    let target = envelope.target.to_string();
    match envelope.status.error {
        None => Ok(()),
        Some(ref e @ PollError::Authentication { .. }) => Err(CliError::AuthFailed {
            target,
            reason: e.to_string(),
        }),
        Some(ref e) => Err(CliError::Incomplete {
            target,
            reason: e.to_string(),
        }),
    }
}

fn table(envelope: &ControlPlaneEnvelope) -> String {
    let c = &envelope.status.counters;
    let header = output::detail_block(&[
        ("Target", envelope.target.to_string()),
        (
            "Rate",
            format!(
                "down {}  up {}",
                output::human_rate(c.download_rate_bps),
                output::human_rate(c.upload_rate_bps)
            ),
        ),
        (
            "Session",
            format!(
                "down {}  up {}",
                output::human_bytes(c.downloaded_total_bytes),
                output::human_bytes(c.uploaded_total_bytes)
            ),
        ),
    ]);

    if envelope.status.items.is_empty() {
        return header;
    }
    let rows: Vec<TorrentRow> = envelope.status.items.iter().map(TorrentRow::from).collect();
    format!("{header}\n\n{}", output::render_table(&rows))
}
