//! Protocol catalog entries.

use serde::{Deserialize, Serialize};

use crate::types::{Plan, ProtocolId};

/// An immutable multi-party protocol definition.
///
/// `plans[i]` is the role-bundle executed by the participant at position
/// `i` of a scope, so `plans.len()` is the number of parties required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protocol {
    pub id: ProtocolId,
    pub plans: Vec<Plan>,
}

impl Protocol {
    pub fn new(id: impl Into<ProtocolId>, plans: Vec<Plan>) -> Self {
        Self {
            id: id.into(),
            plans,
        }
    }

    /// Number of participants a scope of this protocol admits.
    pub fn cohort_size(&self) -> usize {
        self.plans.len()
    }
}

/// Build a role-bundle from string literals. Mostly useful for fixtures.
pub fn plan<I, S>(programs: I) -> Plan
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    programs.into_iter().map(Into::into).collect()
}
