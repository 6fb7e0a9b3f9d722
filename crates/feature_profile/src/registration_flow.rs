use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FlowStep {
    pub next: String,
}

/// Maps the page a profile update was submitted from to the route that follows it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct RegistrationFlow {
    steps: BTreeMap<String, FlowStep>,
}

impl Default for RegistrationFlow {
    fn default() -> Self {
        Self::empty()
            .with_step("step1", "/register/step2")
            .with_step("step2", "/register/step3")
            .with_step("step3", "/dashboard")
    }
}

impl RegistrationFlow {
    pub fn empty() -> Self {
        Self { steps: BTreeMap::new() }
    }

    pub fn with_step(mut self, page: impl Into<String>, next: impl Into<String>) -> Self {
        self.steps.insert(page.into(), FlowStep { next: next.into() });
        self
    }

    pub fn next(&self, page: &str) -> Option<&str> {
        self.steps.get(page).map(|s| s.next.as_str())
    }
}
