use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::SegmentClass;

/// One prohibition entry. `segment_class: None` means the rule applies to
/// every rail between the jurisdiction pair. Absence of any matching rule
/// means the pair is permitted — the manifest is a denylist, not an
/// allowlist, matching the shape of the teacher's `data::load_manifest`
/// (a flat JSON array of records, loaded once at startup).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionRule {
    pub from_jurisdiction: String,
    pub to_jurisdiction: String,
    #[serde(default)]
    pub segment_class: Option<SegmentClass>,
    pub reason: String,
}

/// The regulatory filter consumed by the graph builder (§4.3.1): given a
/// jurisdiction pair tagged on a `RouteSegment`, says whether the edge is
/// admissible.
#[derive(Debug, Clone, Default)]
pub struct RegulatoryConstraints {
    rules: Vec<JurisdictionRule>,
}

impl RegulatoryConstraints {
    pub fn empty() -> Self {
        RegulatoryConstraints { rules: Vec::new() }
    }

    pub fn from_rules(rules: Vec<JurisdictionRule>) -> Self {
        RegulatoryConstraints { rules }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let rules: Vec<JurisdictionRule> = serde_json::from_str(&contents)?;
        Ok(RegulatoryConstraints { rules })
    }

    /// `false` means the pair is prohibited for this segment class and the
    /// edge must be excluded before enumeration (§4.3.1).
    pub fn is_allowed(&self, from_jurisdiction: &str, to_jurisdiction: &str, segment_class: SegmentClass) -> bool {
        !self.rules.iter().any(|rule| {
            rule.from_jurisdiction == from_jurisdiction
                && rule.to_jurisdiction == to_jurisdiction
                && rule.segment_class.map(|c| c == segment_class).unwrap_or(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_pair_is_allowed() {
        let constraints = RegulatoryConstraints::empty();
        assert!(constraints.is_allowed("US", "DE", SegmentClass::Fx));
    }

    #[test]
    fn class_specific_rule_blocks_only_that_class() {
        let constraints = RegulatoryConstraints::from_rules(vec![JurisdictionRule {
            from_jurisdiction: "US".into(),
            to_jurisdiction: "IR".into(),
            segment_class: Some(SegmentClass::BankRail),
            reason: "sanctioned corridor".into(),
        }]);
        assert!(!constraints.is_allowed("US", "IR", SegmentClass::BankRail));
        assert!(constraints.is_allowed("US", "IR", SegmentClass::Crypto));
    }

    #[test]
    fn blanket_rule_blocks_every_class() {
        let constraints = RegulatoryConstraints::from_rules(vec![JurisdictionRule {
            from_jurisdiction: "US".into(),
            to_jurisdiction: "KP".into(),
            segment_class: None,
            reason: "comprehensively sanctioned".into(),
        }]);
        assert!(!constraints.is_allowed("US", "KP", SegmentClass::Fx));
        assert!(!constraints.is_allowed("US", "KP", SegmentClass::Bridge));
    }
}
