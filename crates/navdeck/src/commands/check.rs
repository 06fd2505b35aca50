//! `navdeck check <url>`

use navdeck_core::{HealthEnvelope, ProbeTarget, StatusService};

use crate::cli::{CheckArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    args: CheckArgs,
    service: &StatusService,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = ProbeTarget::parse(args.url.trim()).map_err(|e| CliError::InvalidTarget {
        reason: e.to_string(),
    })?;

    let envelope = service.check_target(target, args.method.into()).await;
    let color = output::should_color(&global.color);

    let rendered = output::render_single(
        &global.output,
        &envelope,
        |e| detail(e, color),
        |e| {
            format!(
                "{}\t{}",
                output::up_down(e.outcome.succeeded(), false),
                e.target
            )
        },
    );
    output::print_output(&rendered, global.quiet);

    if envelope.outcome.succeeded() {
        Ok(())
    } else {
        Err(CliError::TargetDown {
            target: envelope.target.to_string(),
            reason: envelope
                .outcome
                .error_message()
                .unwrap_or("no response")
                .to_owned(),
        })
    }
}

fn detail(e: &HealthEnvelope, color: bool) -> String {
    let mut pairs = vec![
        ("Target", e.target.to_string()),
        ("Status", output::up_down(e.outcome.succeeded(), color)),
        ("Method", e.outcome.method.to_string()),
        ("Elapsed", format!("{}ms", e.outcome.elapsed_millis())),
    ];
    if let Some(code) = e.outcome.status_code() {
        pairs.push(("HTTP", code.to_string()));
    }
    if let Some(message) = e.outcome.error_message() {
        pairs.push(("Error", message.to_owned()));
    }
    output::detail_block(&pairs)
}
