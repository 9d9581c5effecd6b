//! Terminal bar mirroring the simulated audit stages.

use indicatif::{ProgressBar, ProgressStyle};
#[cfg(test)]
use indicatif::ProgressDrawTarget;
use uxaudit_core::{Outcome, Phase, ProgressState, STATUS_STAGES};

const BAR_TEMPLATE: &str = "{bar:7.cyan/blue} {pos}/{len} {msg}";

pub(crate) struct StageBar {
    bar: ProgressBar,
}

impl StageBar {
    /// A bar drawn on stderr. indicatif hides it when stderr is not a terminal.
    #[must_use]
    pub(crate) fn stderr() -> Self {
        Self::styled(ProgressBar::new(stage_count()))
    }

    fn styled(bar: ProgressBar) -> Self {
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar }
    }

    /// Copies the stage position and label from `progress`. A settled run
    /// finishes the bar on success and abandons it on failure.
    pub(crate) fn sync(&self, progress: &ProgressState) {
        self.bar.set_position(progress.bar_position());
        self.bar.set_message(progress.status_label());
        match progress.phase() {
            Phase::Settled {
                outcome: Outcome::Success,
                ..
            } => self.bar.finish(),
            Phase::Settled { .. } => self.bar.abandon(),
            Phase::Idle | Phase::Running { .. } => {}
        }
    }
}

#[cfg(test)]
impl StageBar {
    /// A bar that tracks state without drawing anything.
    pub(crate) fn hidden() -> Self {
        Self::styled(ProgressBar::with_draw_target(
            Some(stage_count()),
            ProgressDrawTarget::hidden(),
        ))
    }

    pub(crate) fn position(&self) -> u64 {
        self.bar.position()
    }

    pub(crate) fn message(&self) -> String {
        self.bar.message()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }
}

fn stage_count() -> u64 {
    STATUS_STAGES.len() as u64
}
