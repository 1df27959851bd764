//! schema.org `FAQPage` structured data for search engines.

use serde::{Deserialize, Serialize};

use crate::content::ContentSpec;
use crate::sanitize::escape_json_for_script;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqSchema {
    #[serde(rename = "@context")]
    pub context: String,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "mainEntity")]
    pub main_entity: Vec<SchemaQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaQuestion {
    #[serde(rename = "@type")]
    pub kind: String,
    pub name: String,
    #[serde(rename = "acceptedAnswer")]
    pub accepted_answer: SchemaAnswer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaAnswer {
    #[serde(rename = "@type")]
    pub kind: String,
    pub text: String,
}

impl FaqSchema {
    /// One `Question` per item, in content order. Blank text stays blank so
    /// every item is present.
    pub fn from_content(content: &ContentSpec) -> Self {
        Self {
            context: "https://schema.org".to_string(),
            kind: "FAQPage".to_string(),
            main_entity: content
                .items
                .iter()
                .map(|item| SchemaQuestion {
                    kind: "Question".to_string(),
                    name: item.question.clone(),
                    accepted_answer: SchemaAnswer {
                        kind: "Answer".to_string(),
                        text: item.answer.clone(),
                    },
                })
                .collect(),
        }
    }

    /// Compact JSON.
    pub fn to_json(&self) -> String {
        // Plain strings and vectors only; serialisation cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// `<script type="application/ld+json">` element, safe to place in HTML.
    pub fn script_tag(&self) -> String {
        format!(
            "<script type=\"application/ld+json\">{}</script>",
            escape_json_for_script(&self.to_json())
        )
    }
}
