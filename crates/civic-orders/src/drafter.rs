//! Work-order draft generation.

use chrono::{DateTime, Utc};
use civic_core::{CivicError, Decision, IssueType, Priority, Severity};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Municipal department responsible for one issue class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Roads & Transport Department")]
    RoadsTransport,
    #[serde(rename = "Electrical Engineering Division")]
    ElectricalEngineering,
    #[serde(rename = "Sanitation & Waste Management")]
    Sanitation,
}

impl Department {
    /// Routing table from issue type to department
    pub fn for_issue(issue_type: IssueType) -> Self {
        match issue_type {
            IssueType::Pothole => Department::RoadsTransport,
            IssueType::Streetlight => Department::ElectricalEngineering,
            IssueType::Garbage => Department::Sanitation,
        }
    }

    /// Official letterhead name
    pub fn title(&self) -> &'static str {
        match self {
            Department::RoadsTransport => "Roads & Transport Department",
            Department::ElectricalEngineering => "Electrical Engineering Division",
            Department::Sanitation => "Sanitation & Waste Management",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Where the crew is being sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    pub lat: f64,
    pub lon: f64,
    /// Street address when the client resolved one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl SiteLocation {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Budget line for the draft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub estimated_inr: f64,
    /// Ten percent buffer, truncated to whole rupees
    pub contingency_fund: i64,
}

/// A fully assembled draft, ready for the PDF and dispatch
/// collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderDraft {
    pub work_order_id: String,
    pub department: Department,
    pub generated_at: DateTime<Utc>,
    pub location: SiteLocation,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub risk_score: f64,
    pub recommended_action: String,
    pub budget: Budget,
    /// True when the decision priority was Critical
    pub critical: bool,
    /// Rendered plain-text directive
    pub directive: String,
    /// `blake3:<hex>` hash of the directive text
    pub content_hash: String,
}

const DIRECTIVE_TEMPLATE: &str = "\
MUNICIPAL CORPORATION - WORK ORDER DRAFT
------------------------------------------------------------
Order ID:       {{work_order_id}}
Date:           {{date}}
Department:     {{department}}
Subject:        URGENT REPAIR - {{priority}} PRIORITY

1. SITE LOCATION
   Coordinates: {{lat}}, {{lon}}
   Approx Addr: {{#if address}}{{address}}{{else}}N/A{{/if}}

2. ISSUE ASSESSMENT
   Type:        {{issue_type}}
   Severity:    {{severity}}
   Risk Score:  {{risk_score}}/100

3. ACTION PLAN
   Recommendation: {{recommended_action}}

4. LOGISTICS ESTIMATES
   Est. Cost:   Rs. {{estimated_cost}}
   Est. Time:   {{repair_time_days}} Days

------------------------------------------------------------
{{disclaimer}}
------------------------------------------------------------
";

const DISCLAIMER: &str = "NOTICE: This is an automatically generated draft Work Order based on \
automated civic assessment. Estimates are algorithmic. Site engineer approval required before \
tendering.";

/// Renders work-order drafts for decisions that warrant one.
pub struct WorkOrderDrafter {
    renderer: Handlebars<'static>,
}

impl WorkOrderDrafter {
    pub fn new() -> Result<Self, CivicError> {
        let mut renderer = Handlebars::new();
        renderer.set_strict_mode(false);
        // Plain-text output; HTML escaping would mangle the
        // department names
        renderer.register_escape_fn(handlebars::no_escape);
        renderer
            .register_template_string("work_order", DIRECTIVE_TEMPLATE)
            .map_err(|e| CivicError::Render(e.to_string()))?;
        Ok(Self { renderer })
    }

    /// Draft a work order, or `None` when the priority does not
    /// warrant one.
    pub fn draft(
        &self,
        report_id: &str,
        location: &SiteLocation,
        decision: &Decision,
    ) -> Result<Option<WorkOrderDraft>, CivicError> {
        if !decision.priority.warrants_work_order() {
            return Ok(None);
        }

        let generated_at = Utc::now();
        let department = Department::for_issue(decision.issue_type);
        let work_order_id = format!(
            "WO-{}-{}",
            generated_at.format("%Y%m%d"),
            report_id.chars().take(6).collect::<String>().to_uppercase()
        );

        let directive = self
            .renderer
            .render(
                "work_order",
                &json!({
                    "work_order_id": work_order_id,
                    "date": generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    "department": department.title(),
                    "priority": decision.priority.to_string().to_uppercase(),
                    "lat": location.lat,
                    "lon": location.lon,
                    "address": location.address,
                    "issue_type": title_case(&decision.issue_type.to_string()),
                    "severity": decision.severity.to_string(),
                    "risk_score": format!("{:.1}", decision.risk_score),
                    "recommended_action": decision.recommended_action,
                    "estimated_cost": format!("{:.0}", decision.estimated_cost),
                    "repair_time_days": format!("{:.1}", decision.repair_time_days),
                    "disclaimer": DISCLAIMER,
                }),
            )
            .map_err(|e| CivicError::Render(e.to_string()))?;

        let content_hash = format!("blake3:{}", blake3::hash(directive.as_bytes()));

        Ok(Some(WorkOrderDraft {
            work_order_id,
            department,
            generated_at,
            location: location.clone(),
            issue_type: decision.issue_type,
            severity: decision.severity,
            risk_score: decision.risk_score,
            recommended_action: decision.recommended_action.clone(),
            budget: Budget {
                estimated_inr: decision.estimated_cost,
                contingency_fund: (decision.estimated_cost * 0.10) as i64,
            },
            critical: decision.priority == Priority::Critical,
            directive,
            content_hash,
        }))
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
