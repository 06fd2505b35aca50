//! `navdeck sweep`: one pass over the service catalog.

use tabled::Tabled;

use navdeck_config::Config;
use navdeck_core::{Monitor, StatusReport, SweepEntry};

use crate::cli::{GlobalOpts, SweepArgs};
use crate::commands::build_service;
use crate::error::CliError;
use crate::output;
use crate::services::ServicesFile;

#[derive(Tabled)]
struct SweepRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
    #[tabled(rename = "Target")]
    target: String,
}

fn to_row(entry: &SweepEntry, color: bool) -> SweepRow {
    let detail = match &entry.report {
        StatusReport::Health(h) => {
            let code = h
                .outcome
                .status_code()
                .map_or_else(|| "-".to_owned(), |c| c.to_string());
            format!("{} {code} in {}ms", h.outcome.method, h.outcome.elapsed_millis())
        }
        StatusReport::ControlPlane(c) => format!(
            "{} torrents, down {}",
            c.status.items.len(),
            output::human_rate(c.status.counters.download_rate_bps)
        ),
    };
    SweepRow {
        category: entry.category.clone(),
        name: entry.name.clone(),
        status: output::up_down(entry.report.is_up(), color),
        detail: entry.report.error_message().unwrap_or(detail),
        target: entry.report.target().to_string(),
    }
}

pub async fn handle(args: SweepArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let path = args.services.unwrap_or_else(|| cfg.server.services_path.clone());
    let catalog = ServicesFile::new(path).read_for_cli().await?;

    let service = build_service(cfg, global)?;
    let monitor = Monitor::new(service, cfg.monitor.concurrency);
    let snapshot = monitor.sweep(&catalog).await;

    let color = output::should_color(&global.color);
    let rendered = output::render_list(
        &global.output,
        &snapshot.entries,
        |e| to_row(e, color),
        |e| {
            format!(
                "{}\t{}\t{}",
                output::up_down(e.report.is_up(), false),
                e.name,
                e.report.target()
            )
        },
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}
