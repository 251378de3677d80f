use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use hashlink_archive::{ArchiveResolver, HttpProbe, Probe, Taxonomy};
use hashlink_core::{HashEntry, classify_labels, exclusion};
use hashlink_pipeline::Settings;

use crate::error::CliError;
use crate::marks::{emphasis, fail_mark, ok_mark};

/// Print the ordered candidate URLs for `file_name`, optionally probing them.
pub(crate) async fn run_plan(
    settings: &Settings,
    console: &str,
    labels: &[String],
    file_name: &str,
    probe: bool,
) -> Result<(), CliError> {
    let group = classify_labels(labels).ok_or_else(|| {
        CliError::other(format!("No dump group matches labels [{}]", labels.join(",")))
    })?;

    let mut entry = HashEntry::new("", file_name);
    entry.labels = labels.to_vec();
    if let Some(reason) = exclusion(&entry, console, &settings.archive.exclusion_rules()) {
        log::warn!("A run would skip this file: {reason}");
    }

    let taxonomy = Taxonomy::load_or_builtin(settings.archive.taxonomy_path.as_deref())?;
    let http = HttpProbe::new(settings.archive.probe_timeout())
        .map_err(|e| CliError::runtime(format!("Failed to build HTTP client: {e}")))?;
    let resolver = ArchiveResolver::new(taxonomy, settings.archive.layout(), http);

    let plan = resolver.plan(group, console, file_name);
    log::info!(
        "{} candidates for {} ({group}, {console})",
        plan.urls.len(),
        emphasis(file_name),
    );
    for (i, url) in plan.urls.iter().enumerate() {
        let tag = if i < plan.priority_count { "priority" } else { "folder" };
        println!(
            "{:>3}. {} {}",
            i + 1,
            url,
            format!("[{tag}]").if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    if !probe {
        return Ok(());
    }

    for url in &plan.urls {
        if resolver.probe().exists(url).await {
            let trusted = resolver.layout().is_trusted(url);
            log::info!(
                "{} Found{}",
                ok_mark(),
                if trusted { "" } else { " (untrusted host, a run would record it as missing)" },
            );
            println!("{url}");
            return Ok(());
        }
    }
    log::warn!("{} No candidate is served by the archive", fail_mark());
    Ok(())
}
