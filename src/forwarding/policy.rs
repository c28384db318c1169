use crate::domain::{ParseSeverityError, Severity};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Marker selecting every severity.
pub const WILDCARD: &str = "all";

/// Severities whose events are pushed to the search backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardTargets {
    All,
    Severities(BTreeSet<Severity>),
}

impl Default for ForwardTargets {
    fn default() -> Self {
        ForwardTargets::Severities(BTreeSet::from([Severity::Error]))
    }
}

impl ForwardTargets {
    pub fn matches(&self, severity: Severity) -> bool {
        match self {
            ForwardTargets::All => true,
            ForwardTargets::Severities(set) => set.contains(&severity),
        }
    }

    fn from_names<I, S>(names: I) -> Result<Self, ParseSeverityError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if name.eq_ignore_ascii_case(WILDCARD) || name == "*" {
                return Ok(ForwardTargets::All);
            }
            set.insert(name.parse()?);
        }
        Ok(ForwardTargets::Severities(set))
    }

    fn names(&self) -> Vec<String> {
        match self {
            ForwardTargets::All => vec![WILDCARD.to_string()],
            ForwardTargets::Severities(set) => set.iter().map(|s| s.as_str().to_string()).collect(),
        }
    }
}

/// Comma-separated list, e.g. `warning,error` or `all`.
impl FromStr for ForwardTargets {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_names(s.split(','))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TargetsRepr {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for ForwardTargets {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let names = match TargetsRepr::deserialize(deserializer)? {
            TargetsRepr::One(name) => vec![name],
            TargetsRepr::Many(names) => names,
        };
        Self::from_names(names).map_err(serde::de::Error::custom)
    }
}

impl Serialize for ForwardTargets {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.names().serialize(serializer)
    }
}

/// Decide whether one content item of an event is pushed to the backend.
///
/// No targets (forwarding not configured) never forwards, not even when
/// forced. Otherwise `force` bypasses target evaluation entirely.
pub fn should_forward(severity: Severity, targets: Option<&ForwardTargets>, force: bool) -> bool {
    let Some(targets) = targets else {
        return false;
    };
    force || targets.matches(severity)
}
