//! Specification types deserialized from a high-level interconnect description.

use serde::{Deserialize, Serialize};
use tessera_common::{ClockDomain, Flow, Frequency};

/// The top-level specification consumed by the crossbar generator.
///
/// Contains the endpoint declarations, the required traffic flows, the
/// structural constraints, and the optimizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecDocument {
    /// Traffic-originating components.
    #[serde(default, alias = "initiators")]
    pub sources: Vec<SourceSpec>,
    /// Memory and peripheral components receiving traffic.
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
    /// Required point-to-point flows.
    #[serde(default)]
    pub traffic_flows: Vec<Flow>,
    /// Structural constraints (widths, clock domains, arbitration).
    #[serde(default)]
    pub constraints: SpecConstraints,
    /// Optimizer weights and policies.
    #[serde(default)]
    pub optimization: OptimizationConfig,
}

impl SpecDocument {
    /// Returns the source with the given name, if declared.
    pub fn source(&self, name: &str) -> Option<&SourceSpec> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Returns the target with the given name, if declared.
    pub fn target(&self, name: &str) -> Option<&TargetSpec> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Returns the largest `max_latency` over all declared flows.
    pub fn max_flow_latency(&self) -> Option<u32> {
        self.traffic_flows.iter().map(|f| f.max_latency).max()
    }
}

/// A traffic-originating component (CPU, accelerator, DMA engine, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Unique component name.
    pub name: String,
    /// Free-form component kind, e.g. `"CPU"`.
    #[serde(alias = "type", default)]
    pub kind: String,
    /// Average throughput in GB/s.
    pub avg_throughput: f64,
    /// Peak throughput in GB/s; drives width and clock selection.
    pub max_throughput: f64,
    /// Latency requirement in cycles.
    #[serde(alias = "latency_req", default)]
    pub latency_requirement: u32,
    /// Relative priority.
    #[serde(default)]
    pub priority: u32,
}

/// A memory or peripheral target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Unique component name.
    pub name: String,
    /// Free-form component kind, e.g. `"DDR"`.
    #[serde(alias = "type", default)]
    pub kind: String,
    /// Peak bandwidth in GB/s; drives width and clock selection.
    pub max_bandwidth: f64,
    /// Access latency in cycles.
    #[serde(default)]
    pub latency: u32,
    /// Capacity in GB.
    #[serde(default)]
    pub size: f64,
}

/// Structural constraints applied while generating the topology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecConstraints {
    /// Width used when no endpoint drives the switch width.
    #[serde(default = "default_data_width")]
    pub default_data_width: u32,
    /// Frequency assumed for clock domains missing from the table.
    #[serde(default = "default_frequency")]
    pub default_frequency: Frequency,
    /// Named clock domains and their frequencies.
    #[serde(default)]
    pub clock_domains: Vec<ClockDomain>,
    /// Maximum number of sources batched behind one arbiter.
    #[serde(default = "default_max_arbiter_inputs")]
    pub max_arbiter_inputs: usize,
}

impl SpecConstraints {
    /// Returns the frequency of the named domain, or the default frequency.
    pub fn frequency_of(&self, domain: &str) -> Frequency {
        self.clock_domains
            .iter()
            .find(|cd| cd.name == domain)
            .map_or(self.default_frequency, |cd| cd.frequency)
    }
}

impl Default for SpecConstraints {
    fn default() -> Self {
        Self {
            default_data_width: default_data_width(),
            default_frequency: default_frequency(),
            clock_domains: Vec::new(),
            max_arbiter_inputs: default_max_arbiter_inputs(),
        }
    }
}

fn default_data_width() -> u32 {
    64
}

fn default_frequency() -> Frequency {
    Frequency::from_mhz(2_000.0)
}

fn default_max_arbiter_inputs() -> usize {
    4
}

/// Settings for the implementation optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Relative weights of the three cost objectives.
    #[serde(default)]
    pub weights: Weights,
    /// Bandwidth ceiling of the shared fabric in GB/s.
    #[serde(default = "default_fabric_capacity")]
    pub fabric_capacity: f64,
    /// What to do when no candidate fits the remaining fabric capacity.
    #[serde(default)]
    pub fallback: FallbackPolicy,
    /// What to do with several flows sharing one (src, dst) key.
    #[serde(default)]
    pub duplicate_flows: DuplicatePolicy,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            fabric_capacity: default_fabric_capacity(),
            fallback: FallbackPolicy::default(),
            duplicate_flows: DuplicatePolicy::default(),
        }
    }
}

fn default_fabric_capacity() -> f64 {
    500.0
}

/// Weights of the throughput, latency, and area objectives.
///
/// Any scale is accepted; [`Weights::normalized`] rescales them to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    /// Weight of the throughput penalty.
    #[serde(default = "default_throughput_weight")]
    pub throughput: f64,
    /// Weight of the latency penalty.
    #[serde(default = "default_latency_weight")]
    pub latency: f64,
    /// Weight of the area penalty.
    #[serde(default = "default_area_weight")]
    pub area: f64,
}

impl Weights {
    /// Creates a weight vector.
    pub fn new(throughput: f64, latency: f64, area: f64) -> Self {
        Self {
            throughput,
            latency,
            area,
        }
    }

    /// Returns the sum of the three weights.
    pub fn total(&self) -> f64 {
        self.throughput + self.latency + self.area
    }

    /// Returns the weights rescaled to sum to 1.
    ///
    /// Returns `None` if any weight is negative or not finite, or if all are zero.
    pub fn normalized(&self) -> Option<Weights> {
        let parts = [self.throughput, self.latency, self.area];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        Some(Weights::new(
            self.throughput / total,
            self.latency / total,
            self.area / total,
        ))
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::new(
            default_throughput_weight(),
            default_latency_weight(),
            default_area_weight(),
        )
    }
}

fn default_throughput_weight() -> f64 {
    0.6
}

fn default_latency_weight() -> f64 {
    0.3
}

fn default_area_weight() -> f64 {
    0.1
}

/// Policy applied when a flow has no candidate fitting the shared fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Assign a dedicated Direct path regardless of bandwidth, and report it.
    #[default]
    ForceDirect,
    /// Collect every such flow and fail with an infeasibility error.
    Strict,
}

/// Policy applied to several input flows sharing one (src, dst) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Sum bandwidths, keep the tightest latency and the highest priority.
    #[default]
    Merge,
    /// Refuse the input and list every duplicated key.
    Reject,
    /// Keep the flow appearing last in the input and report the dropped ones.
    Overwrite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_normalize_any_scale() {
        let w = Weights::new(6.0, 3.0, 1.0).normalized().unwrap();
        assert!((w.throughput - 0.6).abs() < 1e-12);
        assert!((w.latency - 0.3).abs() < 1e-12);
        assert!((w.area - 0.1).abs() < 1e-12);
        assert!((w.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weights_reject_zero_and_negative() {
        assert!(Weights::new(0.0, 0.0, 0.0).normalized().is_none());
        assert!(Weights::new(1.0, -0.5, 0.0).normalized().is_none());
        assert!(Weights::new(f64::NAN, 1.0, 1.0).normalized().is_none());
    }

    #[test]
    fn partial_weights_take_defaults() {
        let w: Weights = serde_json::from_str(r#"{"area": 0.5}"#).unwrap();
        assert_eq!(w, Weights::new(0.6, 0.3, 0.5));
    }

    #[test]
    fn constraint_defaults() {
        let c = SpecConstraints::default();
        assert_eq!(c.default_data_width, 64);
        assert_eq!(c.default_frequency.mhz(), 2_000.0);
        assert_eq!(c.max_arbiter_inputs, 4);
    }

    #[test]
    fn frequency_lookup_falls_back_to_default() {
        let c = SpecConstraints {
            clock_domains: vec![ClockDomain::new("slow", Frequency::from_mhz(800.0))],
            ..SpecConstraints::default()
        };
        assert_eq!(c.frequency_of("slow").mhz(), 800.0);
        assert_eq!(c.frequency_of("fast").mhz(), 2_000.0);
    }

    #[test]
    fn policies_parse_snake_case() {
        let p: FallbackPolicy = serde_json::from_str("\"strict\"").unwrap();
        assert_eq!(p, FallbackPolicy::Strict);
        let p: DuplicatePolicy = serde_json::from_str("\"overwrite\"").unwrap();
        assert_eq!(p, DuplicatePolicy::Overwrite);
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::ForceDirect);
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Merge);
    }
}
