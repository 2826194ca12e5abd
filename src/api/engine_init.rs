use tracing::debug;

use crate::error::ViewportResult;
use crate::interaction::{Clock, NavigationGuard, SystemClock};
use crate::layout::LayoutTree;

use super::validation::validate_engine_config;
use super::{OcclusionProvider, ScrollAnimator, ScrollDebouncer, ViewportEngine, ViewportEngineConfig};

impl<T: LayoutTree> ViewportEngine<T> {
    /// Creates an engine driven by the monotonic system clock.
    pub fn new(tree: T, config: ViewportEngineConfig) -> ViewportResult<Self> {
        Self::with_clock(tree, SystemClock::new(), config)
    }

    /// Creates an engine with an injected clock (tests, replay, custom hosts).
    pub fn with_clock(
        tree: T,
        clock: impl Clock + 'static,
        config: ViewportEngineConfig,
    ) -> ViewportResult<Self> {
        validate_engine_config(config)?;

        let mut occlusion = OcclusionProvider::default();
        occlusion.recompute(&tree);
        debug!(
            granularity = ?config.initial_granularity,
            occlusion_px = occlusion.current_occlusion(),
            "viewport engine initialized"
        );

        Ok(Self {
            tree,
            clock: Box::new(clock),
            config,
            frame: 0,
            granularity: config.initial_granularity,
            period: None,
            selection: None,
            guard: NavigationGuard::new(config.guard_window_ms),
            occlusion,
            animator: ScrollAnimator::new(config.animation_epsilon_px),
            debouncer: ScrollDebouncer::default(),
            pending: None,
            follow_pass: None,
            plugins: Vec::new(),
        })
    }
}
