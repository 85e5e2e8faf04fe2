//! Cancellation guides and cheaper-alternative suggestions

use log::{debug, error};
use regex::Regex;
use serde_json::{json, Value};

use crate::services::gemini::{GenerationRequest, TextGenerator};
use crate::types::{AlternativeService, Result, SubsleuthError};

const GUIDE_FALLBACK: &str = "No details found.";
const GUIDE_FAILED: &str = "Could not generate cancellation guide.";
const ALTERNATIVES_FAILED: &str = "Failed to find alternatives. Please try again.";

const GUIDE_SYSTEM: &str =
    "You are an expert consumer advocate helping users cancel unwanted services quickly.";
const ALTERNATIVES_SYSTEM: &str =
    "You are a helpful financial assistant dedicated to saving users money on subscriptions.";

pub struct Advisor<G> {
    generator: G,
}

impl<G: TextGenerator> Advisor<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Markdown steps for cancelling `service`
    pub async fn cancellation_guide(&self, service: &str) -> Result<String> {
        let request = GenerationRequest {
            prompt: format!(
                "Provide a concise, step-by-step guide on how to cancel the subscription for {}.\n\
                 Include specific URL links to the cancellation page if they exist (formatted as markdown links).\n\
                 If there are \"dark patterns\" or retention tricks to watch out for, mention them briefly.\n\
                 Format the response in Markdown.",
                service
            ),
            system_instruction: Some(GUIDE_SYSTEM.to_string()),
            ..Default::default()
        };

        match self.generator.generate(&request).await {
            Ok(text) if text.trim().is_empty() => Ok(GUIDE_FALLBACK.to_string()),
            Ok(text) => Ok(text),
            Err(e) => {
                error!("Error fetching guide for {}: {}", service, e);
                Err(SubsleuthError::Generation(GUIDE_FAILED.into()))
            }
        }
    }

    /// Up to three cheaper services, priced in `currency_code`
    pub async fn alternatives(
        &self,
        service: &str,
        currency_code: &str,
    ) -> Result<Vec<AlternativeService>> {
        let request = GenerationRequest {
            prompt: format!(
                "I am currently using {} and it is too expensive.\n\
                 Suggest 3 cheaper or free alternatives.\n\
                 Focus on high value for money.\n\
                 Important: Please provide pricing estimates in {} currency.\n\
                 Return the result in JSON format.",
                service, currency_code
            ),
            system_instruction: Some(ALTERNATIVES_SYSTEM.to_string()),
            response_schema: Some(alternatives_schema()),
            temperature: Some(0.7),
        };

        let text = self.generator.generate(&request).await.map_err(|e| {
            error!("Error fetching alternatives for {}: {}", service, e);
            SubsleuthError::Generation(ALTERNATIVES_FAILED.into())
        })?;

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let alternatives: Vec<AlternativeService> = serde_json::from_str(extract_json(&text))
            .map_err(|e| {
                error!("Unparseable alternatives for {}: {}", service, e);
                SubsleuthError::Generation(ALTERNATIVES_FAILED.into())
            })?;
        debug!("{} alternatives for {}", alternatives.len(), service);
        Ok(alternatives)
    }
}

/// Response schema for alternative suggestions
pub fn alternatives_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": {
                    "type": "STRING",
                    "description": "Name of the alternative service"
                },
                "priceDescription": {
                    "type": "STRING",
                    "description": "Short price description (e.g., '$9.99/mo' or 'Free'). Ensure you use the requested currency symbol."
                },
                "savingsDescription": {
                    "type": "STRING",
                    "description": "Brief text explaining why it is cheaper or better value"
                },
                "keyFeatures": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "List of 3 key features"
                }
            },
            "required": ["name", "priceDescription", "savingsDescription", "keyFeatures"]
        }
    })
}

/// Strip a surrounding markdown code fence, if any
fn extract_json(text: &str) -> &str {
    let re = Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("valid regex");
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or_else(|| text.trim())
}
