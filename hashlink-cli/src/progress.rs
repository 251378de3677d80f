//! Progress bar for the per-game loop, driven by batch events.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use hashlink_pipeline::BatchEvent;

pub(crate) struct RunProgress {
    pb: ProgressBar,
    linked: usize,
    missing: usize,
}

impl RunProgress {
    /// Create a bar for `total` games. When `quiet` is true nothing is drawn.
    pub(crate) fn new(total: usize, quiet: bool) -> Self {
        let pb = ProgressBar::new(total as u64);
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
        .tick_chars("/-\\|");
        pb.set_style(style);
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        Self {
            pb,
            linked: 0,
            missing: 0,
        }
    }

    pub(crate) fn handle(&mut self, event: BatchEvent) {
        match event {
            BatchEvent::GameStarted { id, .. } => {
                self.pb.set_message(format!("game {id}: fetching"));
            }
            BatchEvent::GameSkipped { id, reason } => {
                log::debug!("Game {id} skipped: {reason}");
                self.pb.inc(1);
            }
            BatchEvent::GameFetched {
                id,
                console,
                entries,
            } => {
                self.pb
                    .set_message(format!("game {id} ({console}): probing {entries} files"));
            }
            BatchEvent::GameFinished {
                resolved, missing, ..
            } => {
                self.linked += resolved;
                self.missing += missing;
                self.pb.inc(1);
                self.pb.set_message(format!(
                    "{} linked, {} missing",
                    self.linked, self.missing
                ));
            }
            BatchEvent::Done { .. } => {
                self.pb.disable_steady_tick();
                self.pb.finish_and_clear();
            }
        }
    }

    /// Clear the bar even if the batch never reported `Done`.
    pub(crate) fn finish(&self) {
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}
