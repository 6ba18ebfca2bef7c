use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use sacred_numbers::{Progress, ProgressEvent};

/// Bar resolution; phases report fractions, not unit counts
const STEPS: u64 = 1000;

/// Terminal progress bar on stderr
pub(crate) struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub(crate) fn new(hidden: bool) -> Self {
        let bar = ProgressBar::new(STEPS);
        if hidden {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {percent:>3}% {msg} ({elapsed})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }
}

impl Progress for BarProgress {
    fn event(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase { label, .. } => {
                self.bar.reset();
                self.bar.set_message(label);
            }
            ProgressEvent::Update { label, fraction } => {
                if let Some(label) = label {
                    self.bar.set_message(label);
                }
                let position = (fraction.clamp(0.0, 1.0) * STEPS as f64).round() as u64;
                self.bar.set_position(position);
            }
        }
    }
}

impl Drop for BarProgress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
