//! Reconstructing request nesting from a stream of diagnostic events.
//!
//! The core guarantees LIFO discipline for request start/end events within
//! one operation, so the nesting tree can be rebuilt from pairing alone.
//! This builder is the reference consumer of that guarantee; rendering the
//! tree to text is left to callers.

use super::{events, DiagnosticEvent, Outcome};
use uuid::Uuid;

/// One resolved request and the nested requests it triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceNode {
    /// Display form of the resolved service.
    pub descriptor: String,
    /// How the request ended, if its end event was observed.
    pub outcome: Option<Outcome>,
    /// Requests resolved while this one was on the stack.
    pub children: Vec<TraceNode>,
}

/// The completed picture of one resolve operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationTrace {
    /// The operation the trace describes.
    pub operation_id: Uuid,
    /// Root requests, in execution order. A well-formed operation has
    /// exactly one.
    pub roots: Vec<TraceNode>,
    /// The operation outcome, if its end event was observed.
    pub outcome: Option<Outcome>,
}

struct OpenNode {
    descriptor: String,
    children: Vec<TraceNode>,
}

/// Rebuilds the nesting structure of one operation from its events.
///
/// Feed it every event (it ignores those for other operations and all
/// stage-boundary events) and call [`OperationTraceBuilder::finish`].
pub struct OperationTraceBuilder {
    operation_id: Uuid,
    open: Vec<OpenNode>,
    roots: Vec<TraceNode>,
    outcome: Option<Outcome>,
}

impl OperationTraceBuilder {
    /// Creates a builder tracking `operation_id`.
    #[must_use]
    pub const fn new(operation_id: Uuid) -> Self {
        Self {
            operation_id,
            open: Vec::new(),
            roots: Vec::new(),
            outcome: None,
        }
    }

    /// Observes one published event.
    pub fn observe(&mut self, event: &DiagnosticEvent) {
        if event.payload.operation_id != self.operation_id {
            return;
        }

        match event.name {
            events::REQUEST_STARTED => {
                self.open.push(OpenNode {
                    descriptor: event.payload.request_descriptor.clone(),
                    children: Vec::new(),
                });
            }
            events::REQUEST_COMPLETED => {
                if let Some(open) = self.open.pop() {
                    let node = TraceNode {
                        descriptor: open.descriptor,
                        outcome: event.payload.outcome.clone(),
                        children: open.children,
                    };
                    match self.open.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => self.roots.push(node),
                    }
                }
            }
            events::OPERATION_COMPLETED => {
                self.outcome = event.payload.outcome.clone();
            }
            _ => {}
        }
    }

    /// Finishes the trace.
    ///
    /// Requests still open (start observed, end not) are closed with no
    /// outcome so a partial stream still yields a readable tree.
    #[must_use]
    pub fn finish(mut self) -> OperationTrace {
        while let Some(open) = self.open.pop() {
            let node = TraceNode {
                descriptor: open.descriptor,
                outcome: None,
                children: open.children,
            };
            match self.open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => self.roots.push(node),
            }
        }
        OperationTrace {
            operation_id: self.operation_id,
            roots: self.roots,
            outcome: self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticPayload;
    use crate::registry::ServiceDescriptor;

    struct Root;
    struct Dep;
    struct Leaf;

    fn event(
        operation_id: Uuid,
        name: &'static str,
        service: ServiceDescriptor,
        outcome: Option<Outcome>,
    ) -> DiagnosticEvent {
        let mut payload = DiagnosticPayload::new(operation_id, service);
        payload.outcome = outcome;
        DiagnosticEvent { name, payload }
    }

    #[test]
    fn test_rebuilds_nesting_from_pairing() {
        let id = Uuid::new_v4();
        let root = ServiceDescriptor::of::<Root>();
        let dep = ServiceDescriptor::of::<Dep>();
        let leaf = ServiceDescriptor::of::<Leaf>();

        let mut builder = OperationTraceBuilder::new(id);
        builder.observe(&event(id, events::OPERATION_STARTED, root, None));
        builder.observe(&event(id, events::REQUEST_STARTED, root, None));
        builder.observe(&event(id, events::REQUEST_STARTED, dep, None));
        builder.observe(&event(id, events::REQUEST_STARTED, leaf, None));
        builder.observe(&event(id, events::REQUEST_COMPLETED, leaf, Some(Outcome::Success)));
        builder.observe(&event(id, events::REQUEST_COMPLETED, dep, Some(Outcome::Success)));
        builder.observe(&event(id, events::REQUEST_COMPLETED, root, Some(Outcome::Success)));
        builder.observe(&event(id, events::OPERATION_COMPLETED, root, Some(Outcome::Success)));

        let trace = builder.finish();
        assert_eq!(trace.outcome, Some(Outcome::Success));
        assert_eq!(trace.roots.len(), 1);

        let root_node = &trace.roots[0];
        assert_eq!(root_node.descriptor, "Root");
        assert_eq!(root_node.children.len(), 1);
        assert_eq!(root_node.children[0].descriptor, "Dep");
        assert_eq!(root_node.children[0].children[0].descriptor, "Leaf");
    }

    #[test]
    fn test_ignores_other_operations() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let root = ServiceDescriptor::of::<Root>();

        let mut builder = OperationTraceBuilder::new(id);
        builder.observe(&event(other, events::REQUEST_STARTED, root, None));
        builder.observe(&event(id, events::REQUEST_STARTED, root, None));
        builder.observe(&event(id, events::REQUEST_COMPLETED, root, Some(Outcome::Success)));

        let trace = builder.finish();
        assert_eq!(trace.roots.len(), 1);
    }

    #[test]
    fn test_finish_closes_open_requests() {
        let id = Uuid::new_v4();
        let root = ServiceDescriptor::of::<Root>();
        let dep = ServiceDescriptor::of::<Dep>();

        let mut builder = OperationTraceBuilder::new(id);
        builder.observe(&event(id, events::REQUEST_STARTED, root, None));
        builder.observe(&event(id, events::REQUEST_STARTED, dep, None));

        let trace = builder.finish();
        assert_eq!(trace.roots.len(), 1);
        assert_eq!(trace.roots[0].descriptor, "Root");
        assert_eq!(trace.roots[0].children[0].descriptor, "Dep");
        assert_eq!(trace.roots[0].outcome, None);
    }
}
