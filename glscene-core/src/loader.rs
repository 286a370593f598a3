/// Completion counting for a scene's resource batch
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// No batch has been started.
    Idle,
    Loading,
    /// Every resource has reported back. Terminal.
    Complete,
}

/// Result of feeding the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadProgress {
    Loading { completed: usize, total: usize },
    /// Returned exactly once per batch, on the call that finished it.
    Complete,
    /// The batch had already completed before this call.
    AlreadyComplete,
}

impl LoadProgress {
    /// Whether this step is the one that completed the batch.
    pub fn just_completed(&self) -> bool {
        matches!(self, LoadProgress::Complete)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadState {
    pub total: usize,
    pub completed: usize,
    pub is_complete: bool,
}

/// Counts completions of a fixed-size batch, success and failure alike.
#[derive(Debug, Clone)]
pub struct LoadCoordinator {
    phase: LoadPhase,
    total: usize,
    completed: usize,
}

impl Default for LoadCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadCoordinator {
    pub fn new() -> Self {
        Self {
            phase: LoadPhase::Idle,
            total: 0,
            completed: 0,
        }
    }

    /// Start tracking a batch of `total` resources. An empty batch is
    /// complete immediately, since no completion will ever arrive for it.
    pub fn begin(&mut self, total: usize) -> LoadProgress {
        if self.phase != LoadPhase::Idle {
            warn!("load batch already started, ignoring begin({total})");
            return self.progress();
        }

        self.total = total;
        self.completed = 0;

        if total == 0 {
            info!("empty resource batch, load complete");
            self.phase = LoadPhase::Complete;
            LoadProgress::Complete
        } else {
            self.phase = LoadPhase::Loading;
            self.progress()
        }
    }

    /// Record one finished resource.
    pub fn record_completion(&mut self) -> LoadProgress {
        match self.phase {
            LoadPhase::Idle => {
                warn!("completion recorded before any batch started");
                self.progress()
            }
            LoadPhase::Complete => {
                warn!("completion recorded after the batch finished, ignoring");
                LoadProgress::AlreadyComplete
            }
            LoadPhase::Loading => {
                self.completed += 1;
                if self.completed == self.total {
                    info!("all {} resources loaded", self.total);
                    self.phase = LoadPhase::Complete;
                    LoadProgress::Complete
                } else {
                    self.progress()
                }
            }
        }
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn is_complete(&self) -> bool {
        self.phase == LoadPhase::Complete
    }

    pub fn state(&self) -> LoadState {
        LoadState {
            total: self.total,
            completed: self.completed,
            is_complete: self.is_complete(),
        }
    }

    fn progress(&self) -> LoadProgress {
        match self.phase {
            LoadPhase::Complete => LoadProgress::AlreadyComplete,
            _ => LoadProgress::Loading {
                completed: self.completed,
                total: self.total,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_on_last_event_only() {
        let mut coordinator = LoadCoordinator::new();
        assert_eq!(coordinator.phase(), LoadPhase::Idle);
        assert_eq!(
            coordinator.begin(3),
            LoadProgress::Loading {
                completed: 0,
                total: 3
            }
        );

        assert!(!coordinator.record_completion().just_completed());
        assert!(!coordinator.record_completion().just_completed());
        assert!(!coordinator.is_complete());
        assert!(coordinator.record_completion().just_completed());
        assert!(coordinator.is_complete());
        assert_eq!(
            coordinator.state(),
            LoadState {
                total: 3,
                completed: 3,
                is_complete: true
            }
        );
    }

    #[test]
    fn test_empty_batch_completes_at_begin() {
        let mut coordinator = LoadCoordinator::new();
        assert_eq!(coordinator.begin(0), LoadProgress::Complete);
        assert!(coordinator.is_complete());
        assert_eq!(coordinator.record_completion(), LoadProgress::AlreadyComplete);
    }

    #[test]
    fn test_extra_completions_do_not_refire() {
        let mut coordinator = LoadCoordinator::new();
        coordinator.begin(1);
        assert_eq!(coordinator.record_completion(), LoadProgress::Complete);
        assert_eq!(coordinator.record_completion(), LoadProgress::AlreadyComplete);
        assert_eq!(coordinator.completed(), 1);
    }

    #[test]
    fn test_completion_before_begin_is_ignored() {
        let mut coordinator = LoadCoordinator::new();
        assert_eq!(
            coordinator.record_completion(),
            LoadProgress::Loading {
                completed: 0,
                total: 0
            }
        );
        assert_eq!(coordinator.phase(), LoadPhase::Idle);
    }

    #[test]
    fn test_begin_is_one_shot() {
        let mut coordinator = LoadCoordinator::new();
        coordinator.begin(2);
        coordinator.record_completion();
        coordinator.begin(5);
        assert_eq!(coordinator.total(), 2);
        assert_eq!(coordinator.completed(), 1);
    }

    #[test]
    fn test_counter_is_monotonic() {
        let mut coordinator = LoadCoordinator::new();
        coordinator.begin(10);
        let mut last = 0;
        for _ in 0..10 {
            coordinator.record_completion();
            assert_eq!(coordinator.completed(), last + 1);
            last = coordinator.completed();
        }
    }
}
