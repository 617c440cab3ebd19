// Résumé export. PDF typesetting happens outside the service; this module
// produces the text/markdown rendition per template.

pub mod text;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;

pub use text::TextRenderer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    /// Skills up front, markdown headers. Tech and creative roles.
    #[default]
    Modern,
    /// Single column, uppercase headers, plain bullets. Maximum ATS compatibility.
    Classic,
    /// Headline and core competencies first. Senior roles.
    Executive,
}

impl TemplateId {
    pub const ALL: [TemplateId; 3] = [TemplateId::Modern, TemplateId::Classic, TemplateId::Executive];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Classic => "classic",
            TemplateId::Executive => "executive",
        }
    }
}

impl FromStr for TemplateId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "Unknown template '{wanted}' (expected modern, classic or executive)"
                ))
            })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedResume {
    pub template: TemplateId,
    pub content_type: &'static str,
    pub body: String,
}

pub trait ResumeRenderer: Send + Sync {
    fn render(&self, doc: &ResumeDocument, template: TemplateId) -> RenderedResume;
}
