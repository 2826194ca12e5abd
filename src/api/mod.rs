mod axis_controller;
mod engine;
mod engine_config;
mod engine_init;
mod engine_snapshot;
mod json_contract;
mod navigation_coordinator;
mod occlusion_provider;
mod plugin_registry;
mod scroll_animator;
mod scroll_debouncer;
mod scroll_executor;
mod scroll_handle;
mod selection_follow;
mod target_resolver;
mod validation;

pub use axis_controller::{AxisController, ScrollIssue, ScrollMotion};
pub use engine::ViewportEngine;
pub use engine_config::ViewportEngineConfig;
pub use engine_snapshot::EngineSnapshot;
pub use json_contract::{
    ENGINE_CONFIG_JSON_SCHEMA_V1, ENGINE_SNAPSHOT_JSON_SCHEMA_V1, EngineConfigJsonContractV1,
    EngineSnapshotJsonContractV1,
};
pub use navigation_coordinator::{DocumentRef, DocumentSelection};
pub use occlusion_provider::{OcclusionProvider, OcclusionState, measure_occlusion};
pub use scroll_animator::{AnimationFrame, AnimationPhase, AnimationSession, ScrollAnimator};
pub use scroll_debouncer::{DebounceDecision, DebounceSlot, ScrollDebouncer};
pub use scroll_executor::{
    AxisCorrection, CorrectionMotion, CorrectionPlan, NavigationOutcome, SkipReason,
};
pub use scroll_handle::{ScrollHandle, SharedViewportEngine};
pub use target_resolver::{
    Locate, PendingLocate, ReadinessWait, ResolvedTarget, TargetResolver, WaitStatus,
};
