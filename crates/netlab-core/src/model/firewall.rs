// ── Firewall domain types ──
//
// Rules are display-ordered entries, not an evaluated ruleset: no packet
// filtering happens in the lab. Order matters only for rendering and for
// delete-by-index.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleAction {
    Allow,
    Deny,
}

/// A single firewall rule as the learner wrote it.
///
/// `source` and `dest` are free-text identifiers -- IP literals or VLAN
/// labels -- and `port` is free text too. The curriculum inspects them,
/// nothing routes by them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    pub action: RuleAction,
    pub source: String,
    pub dest: String,
    pub port: String,
}

impl FirewallRule {
    pub fn new(
        action: RuleAction,
        source: impl Into<String>,
        dest: impl Into<String>,
        port: impl Into<String>,
    ) -> Self {
        Self {
            action,
            source: source.into(),
            dest: dest.into(),
            port: port.into(),
        }
    }
}
