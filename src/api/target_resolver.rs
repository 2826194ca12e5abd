use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Millis, Rect, TargetDescriptor};
use crate::layout::{LayoutTree, NodeId, NodeQuery};

/// Outcome of one poll of a bounded wait.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitStatus<T> {
    Ready(T),
    Pending,
    TimedOut,
}

/// Bounded readiness wait shared by every lookup that may race a re-render.
///
/// The wait itself never sleeps: callers poll it once per display refresh and
/// it resolves to `TimedOut` no earlier than `timeout_ms` after it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessWait {
    pub started_at: Millis,
    pub timeout_ms: Millis,
}

impl ReadinessWait {
    #[must_use]
    pub fn new(now: Millis, timeout_ms: Millis) -> Self {
        Self {
            started_at: now,
            timeout_ms,
        }
    }

    #[must_use]
    pub fn deadline(self) -> Millis {
        self.started_at.saturating_add(self.timeout_ms)
    }

    pub fn poll<T>(self, now: Millis, probe: impl FnOnce() -> Option<T>) -> WaitStatus<T> {
        if let Some(value) = probe() {
            return WaitStatus::Ready(value);
        }
        if now >= self.deadline() {
            return WaitStatus::TimedOut;
        }
        WaitStatus::Pending
    }
}

/// Node found in the rendered tree together with its current geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedTarget {
    pub node: NodeId,
    pub bounds: Rect,
}

/// Result of a locate call: either resolved now, or a wait to poll.
#[derive(Debug, Clone, PartialEq)]
pub enum Locate {
    Found(ResolvedTarget),
    Waiting(PendingLocate),
    /// The descriptor names nothing to look for.
    Unresolvable,
}

/// In-flight lookup polled once per tick until found or timed out.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLocate {
    pub query: NodeQuery,
    pub wait: ReadinessWait,
}

impl PendingLocate {
    pub fn poll<T: LayoutTree>(&self, tree: &T, now: Millis) -> WaitStatus<ResolvedTarget> {
        self.wait.poll(now, || TargetResolver::lookup(tree, &self.query))
    }
}

/// Finds scroll targets in the rendered tree by stable identifier.
pub struct TargetResolver;

impl TargetResolver {
    /// Query for a descriptor; a selection id wins over a period key.
    #[must_use]
    pub fn query_for(descriptor: &TargetDescriptor) -> Option<NodeQuery> {
        if let Some(id) = &descriptor.selection_id {
            return Some(NodeQuery::Document(id.clone()));
        }
        descriptor.period_key.map(NodeQuery::Column)
    }

    /// Present *and* laid out: mounted nodes without geometry are not targets yet.
    #[must_use]
    pub fn is_ready(bounds: Rect) -> bool {
        bounds.is_finite() && bounds.has_area()
    }

    /// Immediate lookup without waiting.
    pub fn lookup<T: LayoutTree>(tree: &T, query: &NodeQuery) -> Option<ResolvedTarget> {
        let node = tree.find_node(query)?;
        let bounds = tree.node_bounds(node)?;
        if !Self::is_ready(bounds) {
            trace!(?query, "node present but not laid out");
            return None;
        }
        Some(ResolvedTarget { node, bounds })
    }

    pub fn locate<T: LayoutTree>(
        tree: &T,
        descriptor: &TargetDescriptor,
        now: Millis,
        timeout_ms: Millis,
    ) -> Locate {
        match Self::query_for(descriptor) {
            Some(query) => Self::locate_query(tree, query, now, timeout_ms),
            None => Locate::Unresolvable,
        }
    }

    pub fn locate_query<T: LayoutTree>(
        tree: &T,
        query: NodeQuery,
        now: Millis,
        timeout_ms: Millis,
    ) -> Locate {
        match Self::lookup(tree, &query) {
            Some(target) => Locate::Found(target),
            None => Locate::Waiting(PendingLocate {
                query,
                wait: ReadinessWait::new(now, timeout_ms),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Locate, ReadinessWait, TargetResolver, WaitStatus};
    use crate::core::{PeriodKey, Rect, TargetDescriptor};
    use crate::layout::{MemoryLayoutTree, NodeQuery};

    fn tree_with_doc() -> MemoryLayoutTree {
        let mut tree = MemoryLayoutTree::new("timeline", Rect::new(0.0, 0.0, 800.0, 400.0));
        let june = PeriodKey::month(2021, 6).expect("month");
        tree.push_column(june, 200.0);
        tree.push_item(
            june,
            "doc-a",
            NaiveDate::from_ymd_opt(2021, 6, 15).expect("date"),
            60.0,
        )
        .expect("item");
        tree
    }

    #[test]
    fn readiness_wait_times_out_no_earlier_than_deadline() {
        let wait = ReadinessWait::new(1_000, 2_000);
        assert_eq!(wait.poll::<u8>(1_000, || None), WaitStatus::Pending);
        assert_eq!(wait.poll::<u8>(2_999, || None), WaitStatus::Pending);
        assert_eq!(wait.poll::<u8>(3_000, || None), WaitStatus::TimedOut);
        assert_eq!(wait.poll(3_500, || Some(7)), WaitStatus::Ready(7));
    }

    #[test]
    fn selection_id_takes_precedence_over_period() {
        let descriptor = TargetDescriptor {
            selection_id: Some("doc-a".to_owned()),
            period_key: Some(PeriodKey::year(2021)),
        };
        assert_eq!(
            TargetResolver::query_for(&descriptor),
            Some(NodeQuery::Document("doc-a".to_owned()))
        );
        assert_eq!(TargetResolver::query_for(&TargetDescriptor::default()), None);
    }

    #[test]
    fn unmeasured_node_waits_until_laid_out() {
        let mut tree = tree_with_doc();
        tree.set_item_laid_out("doc-a", false);
        let pending = match TargetResolver::locate(&tree, &TargetDescriptor::selection("doc-a"), 0, 2_000)
        {
            Locate::Waiting(pending) => pending,
            other => panic!("expected waiting locate, got {other:?}"),
        };
        assert_eq!(pending.poll(&tree, 16), WaitStatus::Pending);

        tree.set_item_laid_out("doc-a", true);
        assert!(matches!(pending.poll(&tree, 32), WaitStatus::Ready(_)));
    }

    #[test]
    fn missing_node_resolves_to_timeout() {
        let tree = tree_with_doc();
        let Locate::Waiting(pending) =
            TargetResolver::locate(&tree, &TargetDescriptor::selection("missing"), 0, 2_000)
        else {
            panic!("expected waiting locate");
        };
        assert_eq!(pending.poll(&tree, 1_999), WaitStatus::Pending);
        assert_eq!(pending.poll(&tree, 2_000), WaitStatus::TimedOut);
    }
}
