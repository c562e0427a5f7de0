//! Specification file loading and validation.

use crate::error::ConfigError;
use crate::types::SpecDocument;
use std::collections::HashSet;
use std::path::Path;

/// Loads and validates a specification document from a file.
///
/// Files ending in `.json` are parsed as JSON; anything else is parsed as TOML.
pub fn load_spec(path: &Path) -> Result<SpecDocument, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        load_spec_from_json_str(&content)
    } else {
        load_spec_from_str(&content)
    }
}

/// Parses and validates a TOML specification from a string.
pub fn load_spec_from_str(content: &str) -> Result<SpecDocument, ConfigError> {
    let spec: SpecDocument =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_spec(&spec)?;
    Ok(spec)
}

/// Parses and validates a JSON specification from a string.
pub fn load_spec_from_json_str(content: &str) -> Result<SpecDocument, ConfigError> {
    let spec: SpecDocument =
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_spec(&spec)?;
    Ok(spec)
}

/// Checks names, flow endpoints, and numeric ranges.
pub fn validate_spec(spec: &SpecDocument) -> Result<(), ConfigError> {
    let mut names = HashSet::new();
    let endpoint_names = spec
        .sources
        .iter()
        .map(|s| ("sources", &s.name))
        .chain(spec.targets.iter().map(|t| ("targets", &t.name)));
    for (index, (section, name)) in endpoint_names.enumerate() {
        if name.is_empty() {
            return Err(ConfigError::MissingField(format!("{section}[{index}].name")));
        }
        if !names.insert(name.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "component name '{name}' is declared more than once"
            )));
        }
    }

    for flow in &spec.traffic_flows {
        if spec.source(&flow.src).is_none() {
            return Err(ConfigError::UnknownEndpoint {
                flow: flow.key().to_string(),
                name: flow.src.clone(),
            });
        }
        if spec.target(&flow.dst).is_none() {
            return Err(ConfigError::UnknownEndpoint {
                flow: flow.key().to_string(),
                name: flow.dst.clone(),
            });
        }
        if !flow.bandwidth.is_finite() || flow.bandwidth < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "flow {} has invalid bandwidth {}",
                flow.key(),
                flow.bandwidth
            )));
        }
    }

    let constraints = &spec.constraints;
    if constraints.max_arbiter_inputs == 0 {
        return Err(ConfigError::ValidationError(
            "max_arbiter_inputs must be at least 1".to_string(),
        ));
    }
    if !constraints.default_frequency.is_positive() {
        return Err(ConfigError::ValidationError(
            "default_frequency must be positive".to_string(),
        ));
    }
    if let Some(cd) = constraints
        .clock_domains
        .iter()
        .find(|cd| !cd.frequency.is_positive())
    {
        return Err(ConfigError::ValidationError(format!(
            "clock domain '{}' has non-positive frequency",
            cd.name
        )));
    }

    let opt = &spec.optimization;
    if opt.weights.normalized().is_none() {
        return Err(ConfigError::ValidationError(
            "optimization weights must be non-negative with a positive sum".to_string(),
        ));
    }
    if !opt.fabric_capacity.is_finite() || opt.fabric_capacity < 0.0 {
        return Err(ConfigError::ValidationError(
            "fabric_capacity must be a non-negative number".to_string(),
        ));
    }

    Ok(())
}
