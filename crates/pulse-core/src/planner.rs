//! Intervention recommendations
//!
//! One pure mapping from `(topic, risk)` to a plan, shared by the trained
//! model path and the threshold monitor.

use crate::models::{InterventionPlan, Recommendation};

/// Shown when a topic has no model or no rule
pub const NO_DATA_TEXT: &str = "No data available for this disease.";

/// Recommendation text for a topic
pub fn recommendation_text(topic: &str, recommendation: Recommendation) -> String {
    match recommendation {
        Recommendation::Intervene => format!(
            "Intervention needed for {}: consult a specialist, improve lifestyle.",
            topic
        ),
        Recommendation::Maintain => format!(
            "No immediate intervention for {}. Maintain healthy habits.",
            topic
        ),
        Recommendation::NoData => NO_DATA_TEXT.to_string(),
    }
}

/// Plan for a topic given its predicted risk (`None` when no assessment exists)
pub fn plan(topic: &str, risk: Option<bool>) -> InterventionPlan {
    let recommendation = Recommendation::from_risk(risk);
    InterventionPlan {
        topic: topic.to_string(),
        recommendation,
        text: recommendation_text(topic, recommendation),
    }
}
