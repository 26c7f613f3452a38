use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::TargetConfig;

/// A named, monitored URL. Immutable for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub url: String,
}

/// The static set of monitored targets, loaded once at startup.
///
/// Iteration order is config order; lookup is by unique name. Uniqueness and
/// URL validity are enforced by config validation before this is built.
#[derive(Debug)]
pub struct TargetRegistry {
    targets: Vec<Target>,
    index: HashMap<String, usize>,
}

impl TargetRegistry {
    pub fn new(configs: &[TargetConfig]) -> Self {
        let targets: Vec<Target> = configs
            .iter()
            .map(|t| Target { name: t.name.clone(), url: t.url.clone() })
            .collect();
        let index =
            targets.iter().enumerate().map(|(i, t)| (t.name.clone(), i)).collect();
        Self { targets, index }
    }

    /// All targets, in config order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn get(&self, name: &str) -> Option<&Target> {
        self.index.get(name).map(|&i| &self.targets[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }
}
