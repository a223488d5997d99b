//! Decides how a request is answered.
//!
//! The four toggles are independent switches, but only one of them governs a request.
//! [`Mode::select`] resolves them with a fixed precedence, first match wins:
//!
//! 1. email reply persona
//! 2. web search
//! 3. planet mass tool
//! 4. calculate tool
//! 5. general conversational agent (nothing toggled)
use crate::errors::{AgentError, AgentResult};
use crate::prompt::{EMAIL_REPLY_PROMPT, GENERAL_AGENT_PROMPT};
use crate::providers::catalog::GroqModel;
use crate::providers::serpapi;
use crate::tools::{calculate, planet};

pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Toggle state as supplied by the front-end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Toggles {
    pub email_reply: bool,
    pub web_search: bool,
    pub planet_mass: bool,
    pub calculate: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    EmailReply,
    WebSearch,
    PlanetMass,
    Calculate,
    GeneralAgent,
}

/// The single input a mode needs from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputField {
    pub name: &'static str,
    pub label: &'static str,
    /// Shown when the field is submitted blank
    pub missing: &'static str,
}

impl Mode {
    pub fn select(toggles: &Toggles) -> Self {
        if toggles.email_reply {
            Mode::EmailReply
        } else if toggles.web_search {
            Mode::WebSearch
        } else if toggles.planet_mass {
            Mode::PlanetMass
        } else if toggles.calculate {
            Mode::Calculate
        } else {
            Mode::GeneralAgent
        }
    }

    pub fn system_prompt(&self) -> Option<&'static str> {
        match self {
            Mode::EmailReply => Some(EMAIL_REPLY_PROMPT),
            Mode::GeneralAgent => Some(GENERAL_AGENT_PROMPT),
            _ => None,
        }
    }

    pub fn input_field(&self) -> InputField {
        match self {
            Mode::EmailReply => InputField {
                name: "email",
                label: "Enter email here (Subject: and Body:)",
                missing: "Please enter an email.",
            },
            Mode::WebSearch => InputField {
                name: "query",
                label: "Enter your search query...",
                missing: "Please enter a search query.",
            },
            Mode::PlanetMass => InputField {
                name: "planet",
                label: "Enter a planet name...",
                missing: "Please enter a planet name.",
            },
            Mode::Calculate => InputField {
                name: "expression",
                label: "Enter an arithmetic expression...",
                missing: "Please enter an expression.",
            },
            Mode::GeneralAgent => InputField {
                name: "query",
                label: "Enter your query here...",
                missing: "Please enter a query.",
            },
        }
    }

    /// Registry name of the tool answering this mode
    pub fn tool_name(&self) -> Option<&'static str> {
        match self {
            Mode::PlanetMass => Some(planet::TOOL_NAME),
            Mode::Calculate => Some(calculate::TOOL_NAME),
            _ => None,
        }
    }

    pub fn requires_completion(&self) -> bool {
        matches!(self, Mode::EmailReply | Mode::GeneralAgent)
    }

    pub fn requires_search(&self) -> bool {
        matches!(self, Mode::WebSearch)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::EmailReply => "Email Reply Agent",
            Mode::WebSearch => "Web Search",
            Mode::PlanetMass => "Get Planet Mass Tool",
            Mode::Calculate => "Calculate Tool",
            Mode::GeneralAgent => "General Agent",
        }
    }
}

/// Everything needed to answer one request. Built fresh for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeConfig {
    pub mode: Mode,
    /// Every toggled tool, the search backend included, in toggle order
    pub enabled_tools: Vec<&'static str>,
    pub model: GroqModel,
    pub temperature: f64,
}

impl ModeConfig {
    pub fn resolve(toggles: &Toggles, model: GroqModel, temperature: f64) -> AgentResult<Self> {
        if !(0.0..=1.0).contains(&temperature) {
            return Err(AgentError::InvalidParameters(format!(
                "Temperature must be between 0 and 1, got {}",
                temperature
            )));
        }

        let mut enabled_tools = Vec::new();
        if toggles.web_search {
            enabled_tools.push(serpapi::TOOL_NAME);
        }
        if toggles.planet_mass {
            enabled_tools.push(planet::TOOL_NAME);
        }
        if toggles.calculate {
            enabled_tools.push(calculate::TOOL_NAME);
        }

        Ok(Self {
            mode: Mode::select(toggles),
            enabled_tools,
            model,
            temperature,
        })
    }

    pub fn system_prompt(&self) -> Option<&'static str> {
        self.mode.system_prompt()
    }
}
