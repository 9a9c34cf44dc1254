//! Seed data for new projects: the standard risk catalogue and the
//! default work breakdown skeleton.

use crate::risk::Risk;
use crate::structure::{DevOpsStructure, Epic, Feature, Requirement};

struct RiskSeed {
    id: u32,
    title: &'static str,
    selected: bool,
    category: &'static str,
    probability: u8,
    impact: u8,
    owner: &'static str,
    description: &'static str,
    cause: &'static str,
    consequence: &'static str,
    preventive: &'static str,
    fallback: &'static str,
    trigger: &'static str,
}

const RISK_SEEDS: &[RiskSeed] = &[
    RiskSeed {
        id: 1,
        title: "Staffing and competence",
        selected: true,
        category: "Resources",
        probability: 1,
        impact: 5,
        owner: "Project manager",
        description: "The project lacks the right system-specific competence or enough staff.",
        cause: "Insufficient capacity planning, dependence on key people, unclear competence profile per activity.",
        consequence: "Delays, higher cost, lower quality, more rework.",
        preventive: "Define competence needs per delivery, secure senior key roles, estimate resources per activity.",
        fallback: "Scale scope down to MVP, replan milestones, bring in an external specialist.",
        trigger: "Staffing gaps in the plan, low availability, tasks blocked by missing knowledge.",
    },
    RiskSeed {
        id: 2,
        title: "Tight schedule",
        selected: true,
        category: "Time",
        probability: 1,
        impact: 4,
        owner: "Project manager",
        description: "The schedule is too tight for analysis, build, test and rollout.",
        cause: "Underestimated activities and dependencies, too little buffer, late decisions.",
        consequence: "Delayed milestones or go-live, higher cost, quality issues.",
        preventive: "Baseline the plan with realistic estimates, add buffer and clear decision points.",
        fallback: "Replan go-live, deliver in stages, scale scope down to MVP.",
        trigger: "Repeated delays in sub-activities, many blocked tasks.",
    },
    RiskSeed {
        id: 3,
        title: "Budget",
        selected: true,
        category: "Cost",
        probability: 2,
        impact: 4,
        owner: "Project manager",
        description: "The budget is not enough to deliver the agreed scope and quality.",
        cause: "Underestimates, unclear scope or requirements, too little buffer.",
        consequence: "Budget overrun, reprioritisation or scope reduction.",
        preventive: "Baseline the budget against a clear scope and WBS, follow the burn rate weekly.",
        fallback: "Scale scope down to MVP, move parts to a later phase.",
        trigger: "Actuals above plan two weeks in a row, unfunded change requests.",
    },
    RiskSeed {
        id: 4,
        title: "Unclear scope",
        selected: true,
        category: "Scope",
        probability: 3,
        impact: 5,
        owner: "Project manager",
        description: "The project scope is unclear or interpreted differently.",
        cause: "Weak requirements and acceptance criteria, unclear goals and boundaries.",
        consequence: "Scope creep, more changes and rework, delays.",
        preventive: "Define goals, boundaries and a prioritised requirement list (MoSCoW).",
        fallback: "Freeze scope for the coming release, deliver MVP and move the rest to phase 2.",
        trigger: "Many 'we assumed' discussions, a high share of open questions.",
    },
    RiskSeed {
        id: 5,
        title: "Third-party dependencies",
        selected: false,
        category: "Supplier",
        probability: 2,
        impact: 4,
        owner: "Project manager",
        description: "External parties do not deliver on time or as expected.",
        cause: "Unclear requirements or responsibilities, long lead times, limited third-party support.",
        consequence: "Delays, blocked activities, replanning and higher cost.",
        preventive: "Map all dependencies and owners, secure contact paths and SLAs.",
        fallback: "Use a workaround (mock/stub), deliver in stages, switch supplier if possible.",
        trigger: "Waiting for access or environments more than 3 working days, missing answers.",
    },
    RiskSeed {
        id: 6,
        title: "Integration with new systems",
        selected: false,
        category: "Technology",
        probability: 2,
        impact: 5,
        owner: "Technical lead",
        description: "Integrating with new or unknown systems carries technical uncertainty.",
        cause: "Poor documentation, immature API version, unknown limitations.",
        consequence: "Delays from prototyping and rework, more development and test effort.",
        preventive: "Run an early technical spike (PoC), verify authentication and key flows.",
        fallback: "Build a manual import/export fallback, stage the integration.",
        trigger: "PoC fails, late API changes, recurring errors in test.",
    },
    RiskSeed {
        id: 7,
        title: "Customer collaboration",
        selected: true,
        category: "Stakeholders",
        probability: 2,
        impact: 4,
        owner: "Project manager",
        description: "The customer's key people have no time set aside and communication breaks down.",
        cause: "Customer busy with daily operations, unclear roles and mandates.",
        consequence: "Delays, wrong assumptions and rework, blocked development and test.",
        preventive: "Secure a sponsor and clear roles, book recurring meetings.",
        fallback: "Escalate via sponsor or steering group, pause work that needs customer input.",
        trigger: "No answers for more than 3 working days, cancelled meetings.",
    },
    RiskSeed {
        id: 8,
        title: "Unknown dependencies and hard deadlines",
        selected: false,
        category: "Planning",
        probability: 1,
        impact: 4,
        owner: "Project manager",
        description: "The largest dependencies and hard deadlines are not mapped.",
        cause: "No shared dependency analysis, unclear division of responsibility.",
        consequence: "Unexpected blockers, missed deadlines, extensive replanning.",
        preventive: "Hold a dependency workshop, build a dependency map with owners and dates.",
        fallback: "Replan milestones, deliver in stages, create temporary workarounds.",
        trigger: "Unclear or missing dates for dependencies, recurring blockers.",
    },
    RiskSeed {
        id: 9,
        title: "Information security and access",
        selected: false,
        category: "Security",
        probability: 1,
        impact: 4,
        owner: "Technical lead",
        description: "GDPR requirements and access questions are not handled early.",
        cause: "Unclear data classification, late involvement of IT security or the DPO.",
        consequence: "Blocked development and test, delayed go-live, compliance risk.",
        preventive: "Identify data types and classification early, secure the required agreements.",
        fallback: "Pause data flows until requirements are met, anonymise test data.",
        trigger: "Access delayed more than 5 working days, unclear data owner.",
    },
    RiskSeed {
        id: 10,
        title: "Test/UAT and go-live readiness",
        selected: true,
        category: "Quality",
        probability: 3,
        impact: 5,
        owner: "Test lead",
        description: "Testing, acceptance, training and deployment are not planned well enough.",
        cause: "Too little time for test and UAT, unclear acceptance criteria.",
        consequence: "Delayed go-live, more bugs in production, incidents.",
        preventive: "Define acceptance criteria and test strategy early, plan a UAT window.",
        fallback: "Postpone go-live or stage the release, limit scope to critical flows.",
        trigger: "UAT starts late, many blocked test cases, growing number of critical bugs.",
    },
];

/// The standard risk catalogue.
pub fn default_risks() -> Vec<Risk> {
    RISK_SEEDS
        .iter()
        .map(|s| Risk {
            id: s.id,
            title: s.title.to_string(),
            description: s.description.to_string(),
            cause: s.cause.to_string(),
            consequence: s.consequence.to_string(),
            category: s.category.to_string(),
            probability: s.probability,
            impact: s.impact,
            selected: s.selected,
            owner: s.owner.to_string(),
            strategy: "Reduce".to_string(),
            preventive: s.preventive.to_string(),
            fallback: s.fallback.to_string(),
            trigger: s.trigger.to_string(),
        })
        .collect()
}

/// Default work breakdown skeleton.
///
/// The first epic's title is replaced by the project's main title when the
/// structure is pushed, so its stored title is only a placeholder.
pub fn default_structure() -> DevOpsStructure {
    DevOpsStructure {
        epics: vec![
            Epic::new("Development")
                .with_feature(
                    Feature::new("Startup", 24).with_requirement(Requirement::new("Base setup", 8)),
                )
                .with_feature(Feature::new("Integration flows", 16)),
            Epic::new("Test, verification and deployment")
                .with_feature(
                    Feature::new("Deployment", 16)
                        .with_requirement(Requirement::new("Deploy to production", 8))
                        .with_requirement(Requirement::new("Deploy to test", 8)),
                )
                .with_feature(Feature::new("System and flow tests, fixes", 16)),
            Epic::new("Project administration").with_feature(
                Feature::new("Project administration", 40)
                    .with_requirement(Requirement::new("Project initiation", 8))
                    .with_requirement(Requirement::new("Overall flow and solution work", 8))
                    .with_requirement(Requirement::new("Documentation", 4))
                    .with_requirement(Requirement::new("Project management", 12))
                    .with_requirement(Requirement::new("Weekly meetings", 8)),
            ),
            Epic::new("Future development").with_feature(Feature::new("Out of scope", 0)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_risks() {
        let risks = default_risks();
        assert_eq!(risks.len(), 10);
        assert_eq!(risks.iter().filter(|r| r.selected).count(), 6);

        let ids: Vec<u32> = risks.iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());

        for risk in &risks {
            assert!((1..=5).contains(&risk.probability));
            assert!((1..=5).contains(&risk.impact));
        }
    }

    #[test]
    fn test_default_structure_shape() {
        let structure = default_structure();
        assert_eq!(structure.epics.len(), 4);
        // 4 epics + 6 features + 8 requirements, no tasks
        assert_eq!(structure.item_count(), 18);
        assert_eq!(structure.epics[3].features[0].effort, 0);
    }
}
