//! Per-edge mismatch detection and latency redistribution.

use tessera_graph::{Edge, Graph};

/// The bridging a single edge needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgePlan {
    /// Endpoints agree; the edge stays as it is.
    Keep,
    /// One clock converter, two hops.
    Clock,
    /// One width converter, two hops.
    Width,
    /// A clock converter followed by a width converter, three hops.
    ClockThenWidth,
}

impl BridgePlan {
    /// Short description used in reports.
    pub fn reason(self) -> &'static str {
        match self {
            BridgePlan::Keep => "no mismatch",
            BridgePlan::Clock => "clock domain crossing",
            BridgePlan::Width => "width mismatch",
            BridgePlan::ClockThenWidth => "clock domain crossing and width mismatch",
        }
    }

    /// Number of hops the edge becomes.
    pub fn hops(self) -> usize {
        match self {
            BridgePlan::Keep => 1,
            BridgePlan::Clock | BridgePlan::Width => 2,
            BridgePlan::ClockThenWidth => 3,
        }
    }
}

/// The result of checking one edge against its endpoints.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeCheck {
    /// The (upstream, downstream) clock domains when both are declared and
    /// they differ.
    pub clock_crossing: Option<(String, String)>,
    /// Neither endpoint is a width converter, both resolved widths are known,
    /// and the edge width differs from at least one of them.
    pub needs_width_bridge: bool,
    /// Resolved width of the upstream node.
    pub src_width: Option<u32>,
    /// Resolved width of the downstream node.
    pub dst_width: Option<u32>,
}

impl EdgeCheck {
    /// Checks `edge`; returns `None` if either endpoint is missing.
    pub fn of(graph: &Graph, edge: &Edge) -> Option<Self> {
        let src = graph.node(edge.src)?;
        let dst = graph.node(edge.dst)?;

        let clock_crossing = match (&src.clock_domain, &dst.clock_domain) {
            (Some(a), Some(b)) if a != b => Some((a.clone(), b.clone())),
            _ => None,
        };

        let src_width = src.resolved_width();
        let dst_width = dst.resolved_width();
        let touches_wc = src.kind.is_width_converter() || dst.kind.is_width_converter();
        let needs_width_bridge = !touches_wc
            && match (src_width, dst_width) {
                (Some(s), Some(d)) => edge.width != s || edge.width != d,
                _ => false,
            };

        Some(Self {
            clock_crossing,
            needs_width_bridge,
            src_width,
            dst_width,
        })
    }

    /// Returns `true` if the endpoints sit in different clock domains.
    pub fn needs_clock_bridge(&self) -> bool {
        self.clock_crossing.is_some()
    }

    /// The rewrite this edge needs.
    pub fn plan(&self) -> BridgePlan {
        match (self.needs_clock_bridge(), self.needs_width_bridge) {
            (true, true) => BridgePlan::ClockThenWidth,
            (true, false) => BridgePlan::Clock,
            (false, true) => BridgePlan::Width,
            (false, false) => BridgePlan::Keep,
        }
    }
}

/// Splits `latency` over two hops: `max(1, L/2)` then `max(1, L - L/2)`.
pub fn split_latency_two(latency: u32) -> [u32; 2] {
    let first = latency / 2;
    [first.max(1), (latency - first).max(1)]
}

/// Splits `latency` over three hops: `max(1, L/3)` twice, then the
/// remainder, floored at 1.
pub fn split_latency_three(latency: u32) -> [u32; 3] {
    let third = latency / 3;
    [third.max(1), third.max(1), (latency - 2 * third).max(1)]
}
