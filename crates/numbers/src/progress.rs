use crate::error::{NumbersError, Result};

/// Coarse progress notification emitted by long-running passes
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// A new phase starts, `total` work units long
    Phase { label: String, total: u64 },

    /// Completed fraction of the current phase, optionally relabelled
    Update { label: Option<String>, fraction: f64 },
}

/// Receiver of progress events.
///
/// Passes call [`Progress::is_cancelled`] at the same batch boundaries where
/// they report, and stop with [`NumbersError::Cancelled`] when it returns
/// `true`.
pub trait Progress {
    fn event(&mut self, event: ProgressEvent);

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Silent sink
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn event(&mut self, _event: ProgressEvent) {}
}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn event(&mut self, event: ProgressEvent) {
        (**self).event(event);
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Fires once every `every` work units
#[derive(Debug, Clone)]
pub struct Milestones {
    every: u64,
    next: u64,
}

impl Milestones {
    #[must_use]
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            next: 0,
        }
    }

    /// True when `count` reached the next milestone; arms the following one
    pub fn due(&mut self, count: u64) -> bool {
        if count < self.next {
            return false;
        }
        self.next = count + self.every;
        true
    }
}

pub(crate) fn phase<P: Progress + ?Sized>(progress: &mut P, label: String, total: u64) {
    log::debug!("{label}");
    progress.event(ProgressEvent::Phase { label, total });
}

/// Report `done / total` and honour cancellation
pub fn checkpoint<P: Progress + ?Sized>(
    progress: &mut P,
    phase: &str,
    done: u64,
    total: u64,
) -> Result<()> {
    let fraction = if total == 0 {
        1.0
    } else {
        done as f64 / total as f64
    };
    progress.event(ProgressEvent::Update {
        label: None,
        fraction,
    });
    if progress.is_cancelled() {
        return Err(NumbersError::Cancelled {
            phase: phase.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn finish<P: Progress + ?Sized>(progress: &mut P) {
    progress.event(ProgressEvent::Update {
        label: None,
        fraction: 1.0,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestones_fire_on_batch_boundaries() {
        let mut milestones = Milestones::new(4);
        let fired: Vec<u64> = (0..10).filter(|&i| milestones.due(i)).collect();
        assert_eq!(fired, vec![0, 4, 8]);
    }

    #[test]
    fn zero_sized_batches_still_progress() {
        let mut milestones = Milestones::new(0);
        assert!(milestones.due(0));
        assert!(milestones.due(1));
    }

    struct Cancelling;

    impl Progress for Cancelling {
        fn event(&mut self, _event: ProgressEvent) {}

        fn is_cancelled(&self) -> bool {
            true
        }
    }

    #[test]
    fn checkpoint_reports_cancellation() {
        let err = checkpoint(&mut Cancelling, "Sum", 1, 2).unwrap_err();
        assert!(matches!(err, NumbersError::Cancelled { ref phase } if phase == "Sum"));
        assert!(checkpoint(&mut NoProgress, "Sum", 1, 2).is_ok());
    }
}
