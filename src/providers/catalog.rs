use std::fmt;
use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::errors::AgentError;

/// The models that can be selected for a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub enum GroqModel {
    #[default]
    Llama3_8b,
    Llama31_70b,
    Llama31_8b,
    Mixtral8x7b,
    Gemma2_9b,
    Llava15_7b,
}

impl GroqModel {
    /// Human readable label shown in model pickers
    pub fn label(&self) -> &'static str {
        match self {
            GroqModel::Llama3_8b => "Llama 3 8B",
            GroqModel::Llama31_70b => "Llama 3.1 70B",
            GroqModel::Llama31_8b => "Llama 3.1 8B",
            GroqModel::Mixtral8x7b => "Mixtral 8x7B",
            GroqModel::Gemma2_9b => "Gemma 2 9B",
            GroqModel::Llava15_7b => "LLaVA 1.5 7B",
        }
    }

    /// Model identifier sent to the completion endpoint
    pub fn id(&self) -> &'static str {
        match self {
            GroqModel::Llama3_8b => "llama3-8b-8192",
            GroqModel::Llama31_70b => "llama-3.1-70b-versatile",
            GroqModel::Llama31_8b => "llama-3.1-8b-instant",
            GroqModel::Mixtral8x7b => "mixtral-8x7b-32768",
            GroqModel::Gemma2_9b => "gemma2-9b-it",
            GroqModel::Llava15_7b => "llava-v1.5-7b-4096-preview",
        }
    }
}

impl fmt::Display for GroqModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.id())
    }
}

impl FromStr for GroqModel {
    type Err = AgentError;

    /// Accepts either the label (any case) or the exact model id
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        GroqModel::iter()
            .find(|m| m.id() == s || m.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let known: Vec<&str> = GroqModel::iter().map(|m| m.label()).collect();
                AgentError::InvalidParameters(format!(
                    "Unknown model '{}', expected one of: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}
