use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::agent::Agent;
use crate::errors::{AgentError, AgentResult};
use crate::mode::{Mode, ModeConfig};
use crate::models::conversation::Conversation;
use crate::providers::base::{CompletionProvider, SearchProvider, SearchResult};
use crate::providers::configs::Settings;
use crate::providers::groq::GroqProvider;
use crate::providers::serpapi::SerpApiProvider;
use crate::tools::ToolRegistry;

/// The answer to one request, ready for display
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    PlanetMass { planet: String, mass: f64 },
    Calculation { expression: String, value: f64 },
    SearchResults(Vec<SearchResult>),
}

/// Shortest round-trip float text: a trailing `.0` on integral values, and a signed,
/// two-digit exponent at or above 1e16 and below 1e-4 (`5.972e+24`, `1e-05`)
pub fn format_float(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() {
        format!("{}", value)
    } else if magnitude >= 1e16 || (magnitude != 0.0 && magnitude < 1e-4) {
        let text = format!("{:e}", value);
        match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text,
        }
    } else if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Calculator output: integral results print as integers, everything else as
/// [`format_float`]
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{}", value as i64)
    } else {
        format_float(value)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Text(text) => write!(f, "{}", text),
            Reply::PlanetMass { mass, .. } => write!(f, "Planet Mass: {}", format_float(*mass)),
            Reply::Calculation { value, .. } => {
                write!(f, "Calculation Result: {}", format_number(*value))
            }
            Reply::SearchResults(results) if results.is_empty() => write!(f, "No results found."),
            Reply::SearchResults(results) => {
                for (i, result) in results.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(
                        f,
                        "{}. {}\n   {}\n   {}",
                        i + 1,
                        result.title,
                        result.link,
                        result.snippet
                    )?;
                }
                Ok(())
            }
        }
    }
}

/// One front-end session: the configured backends, the tools, and the conversation the
/// model-backed modes share while their persona stays the same.
pub struct Session {
    completion: Option<Arc<dyn CompletionProvider>>,
    search: Option<Arc<dyn SearchProvider>>,
    tools: ToolRegistry,
    conversation: Option<Conversation>,
    history_window: Option<usize>,
    stateless: bool,
}

impl Session {
    pub fn new(tools: ToolRegistry) -> Self {
        Self {
            completion: None,
            search: None,
            tools,
            conversation: None,
            history_window: None,
            stateless: false,
        }
    }

    /// Build a session with the built-in tools and whichever backends have credentials
    pub fn from_settings(settings: &Settings) -> AgentResult<Self> {
        let mut session = Self::new(ToolRegistry::with_builtins());
        if let Some(config) = &settings.groq {
            session = session.with_completion(Arc::new(GroqProvider::new(config.clone())?));
        }
        if let Some(config) = &settings.serpapi {
            session = session.with_search(Arc::new(SerpApiProvider::new(config.clone())?));
        }
        Ok(session)
    }

    pub fn with_completion(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.completion = Some(provider);
        self
    }

    pub fn with_search(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(provider);
        self
    }

    /// Bound the retained history; windows smaller than one turn are raised to one turn
    pub fn with_history_window(mut self, max_messages: Option<usize>) -> Self {
        self.history_window = max_messages;
        self
    }

    /// Answer every request from a fresh conversation
    pub fn stateless(mut self, stateless: bool) -> Self {
        self.stateless = stateless;
        self
    }

    pub fn has_completion(&self) -> bool {
        self.completion.is_some()
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    pub fn reset(&mut self) {
        self.conversation = None;
    }

    /// Answer one request. Failures come back as values and never end the session.
    pub fn handle(&mut self, config: &ModeConfig, input: &str) -> AgentResult<Reply> {
        info!(mode = ?config.mode, model = config.model.id(), "handling request");
        let result = self.dispatch(config, input);
        if let Err(err) = &result {
            warn!(mode = ?config.mode, error = %err, "request failed");
        }
        result
    }

    fn dispatch(&mut self, config: &ModeConfig, input: &str) -> AgentResult<Reply> {
        let field = config.mode.input_field();
        if input.trim().is_empty() {
            return Err(AgentError::EmptyInput(field.missing.to_string()));
        }

        match config.mode {
            Mode::WebSearch => {
                let search = self.search.as_ref().ok_or_else(|| {
                    AgentError::Config("Cannot search because SERPAPI_API_KEY is missing.".to_string())
                })?;
                Ok(Reply::SearchResults(search.search(input.trim())?))
            }
            Mode::PlanetMass | Mode::Calculate => {
                let tool = config
                    .mode
                    .tool_name()
                    .ok_or_else(|| AgentError::ToolNotFound(format!("{:?}", config.mode)))?;
                let argument = input.trim().to_string();

                let mut args = Map::new();
                args.insert(field.name.to_string(), Value::String(argument.clone()));
                let value = self.tools.invoke(tool, &Value::Object(args))?;
                let number = value.as_f64().ok_or_else(|| {
                    AgentError::InvalidParameters(format!("{} did not return a number", tool))
                })?;

                Ok(match config.mode {
                    Mode::PlanetMass => Reply::PlanetMass {
                        planet: argument,
                        mass: number,
                    },
                    _ => Reply::Calculation {
                        expression: argument,
                        value: number,
                    },
                })
            }
            Mode::EmailReply | Mode::GeneralAgent => {
                let provider = Arc::clone(self.completion.as_ref().ok_or_else(|| {
                    AgentError::Config("Cannot send query because GROQ_API_KEY is missing.".to_string())
                })?);

                let conversation = self.conversation_for(config.system_prompt());
                let agent = Agent::new(provider.as_ref(), config.model.id(), config.temperature);
                agent.turn(conversation, input).map(Reply::Text)
            }
        }
    }

    /// The conversation for `system_prompt`, replacing the current one on a persona change
    fn conversation_for(&mut self, system_prompt: Option<&str>) -> &mut Conversation {
        let stale = self.stateless
            || self
                .conversation
                .as_ref()
                .map_or(true, |c| c.system_prompt() != system_prompt);
        if stale {
            self.conversation = None;
        }

        let window = self.history_window;
        self.conversation.get_or_insert_with(|| {
            let conversation = Conversation::new(system_prompt);
            match window {
                Some(max_messages) => conversation.with_window(max_messages),
                None => conversation,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Toggles;
    use crate::models::message::{Message, Role};
    use crate::prompt::{EMAIL_REPLY_PROMPT, GENERAL_AGENT_PROMPT};
    use crate::providers::catalog::GroqModel;
    use crate::providers::mock::{MockProvider, MockSearch};

    fn config(toggles: Toggles) -> ModeConfig {
        ModeConfig::resolve(&toggles, GroqModel::default(), 0.7).unwrap()
    }

    fn general() -> ModeConfig {
        config(Toggles::default())
    }

    fn email() -> ModeConfig {
        config(Toggles {
            email_reply: true,
            ..Default::default()
        })
    }

    fn session_with(provider: &Arc<MockProvider>) -> Session {
        Session::new(ToolRegistry::with_builtins()).with_completion(provider.clone())
    }

    #[test]
    fn test_general_agent_turns_share_conversation() -> AgentResult<()> {
        let provider = Arc::new(MockProvider::new(vec![
            Ok("first".to_string()),
            Ok("second".to_string()),
        ]));
        let mut session = session_with(&provider);

        assert_eq!(session.handle(&general(), "hi")?, Reply::Text("first".to_string()));
        assert_eq!(session.handle(&general(), "again")?, Reply::Text("second".to_string()));

        let conversation = session.conversation().unwrap();
        assert_eq!(conversation.len(), 5);
        assert_eq!(conversation.messages()[0], Message::system(GENERAL_AGENT_PROMPT));

        let (model, temperature, _) = &provider.requests()[0];
        assert_eq!(model, "llama3-8b-8192");
        assert_eq!(*temperature, 0.7);
        Ok(())
    }

    #[test]
    fn test_persona_switch_starts_new_conversation() -> AgentResult<()> {
        let provider = Arc::new(MockProvider::new(vec![]));
        let mut session = session_with(&provider);

        session.handle(&general(), "hi")?;
        session.handle(&email(), "Subject: Lunch\nBody: Are you free?")?;

        let conversation = session.conversation().unwrap();
        assert_eq!(conversation.system_prompt(), Some(EMAIL_REPLY_PROMPT));
        assert_eq!(conversation.len(), 3);
        Ok(())
    }

    #[test]
    fn test_stateless_session_forgets_history() -> AgentResult<()> {
        let provider = Arc::new(MockProvider::new(vec![]));
        let mut session = session_with(&provider).stateless(true);

        session.handle(&general(), "one")?;
        session.handle(&general(), "two")?;

        assert_eq!(session.conversation().unwrap().len(), 3);
        assert_eq!(provider.requests()[1].2.len(), 2);
        Ok(())
    }

    #[test]
    fn test_history_window_applies() -> AgentResult<()> {
        let provider = Arc::new(MockProvider::new(vec![]));
        let mut session = session_with(&provider).with_history_window(Some(2));

        for _ in 0..3 {
            session.handle(&general(), "hello")?;
        }
        assert_eq!(session.conversation().unwrap().len(), 3);
        Ok(())
    }

    #[test]
    fn test_tiny_history_window_keeps_last_turn() -> AgentResult<()> {
        let provider = Arc::new(MockProvider::new(vec![
            Ok("one".to_string()),
            Ok("two".to_string()),
        ]));
        let mut session = session_with(&provider).with_history_window(Some(1));

        session.handle(&general(), "first")?;
        session.handle(&general(), "second")?;

        let contents: Vec<&str> = session
            .conversation()
            .unwrap()
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec![GENERAL_AGENT_PROMPT, "second", "two"]);

        let (_, _, sent) = &provider.requests()[1];
        assert_eq!(sent.len(), 4);
        Ok(())
    }

    #[test]
    fn test_email_precedence_over_search() -> AgentResult<()> {
        let provider = Arc::new(MockProvider::new(vec![Ok("Dear Sam,".to_string())]));
        let search = Arc::new(MockSearch::new(Ok(vec![])));
        let mut session = session_with(&provider).with_search(search.clone());

        let both = config(Toggles {
            email_reply: true,
            web_search: true,
            ..Default::default()
        });
        assert_eq!(both.mode, Mode::EmailReply);
        assert_eq!(session.handle(&both, "Subject: hi")?, Reply::Text("Dear Sam,".to_string()));
        assert!(search.queries().is_empty());
        Ok(())
    }

    #[test]
    fn test_tool_modes_need_no_completion_key() -> AgentResult<()> {
        let mut session = Session::new(ToolRegistry::with_builtins());

        let planet = config(Toggles {
            planet_mass: true,
            calculate: true,
            ..Default::default()
        });
        let reply = session.handle(&planet, "  Earth ")?;
        assert_eq!(
            reply,
            Reply::PlanetMass {
                planet: "Earth".to_string(),
                mass: 5.972e24
            }
        );
        assert_eq!(reply.to_string(), "Planet Mass: 5.972e+24");

        let calc = config(Toggles {
            calculate: true,
            ..Default::default()
        });
        let reply = session.handle(&calc, "2 + 3 * 4")?;
        assert_eq!(reply.to_string(), "Calculation Result: 14");
        Ok(())
    }

    #[test]
    fn test_tool_errors_are_values() {
        let mut session = Session::new(ToolRegistry::with_builtins());
        let calc = config(Toggles {
            calculate: true,
            ..Default::default()
        });

        let err = session.handle(&calc, "__import__('os')").unwrap_err();
        assert!(matches!(err, AgentError::InvalidExpression(_)));
        assert!(err.to_string().starts_with("Error in calculation:"));
    }

    #[test]
    fn test_missing_completion_key() {
        let mut session = Session::new(ToolRegistry::with_builtins());
        let err = session.handle(&general(), "hello").unwrap_err();
        assert!(matches!(err, AgentError::Config(_)));
        assert!(session.conversation().is_none());
    }

    #[test]
    fn test_missing_search_key() {
        let provider = Arc::new(MockProvider::new(vec![]));
        let mut session = session_with(&provider);
        let search = config(Toggles {
            web_search: true,
            ..Default::default()
        });

        assert!(session.has_completion());
        assert!(!session.has_search());

        let err = session.handle(&search, "rust").unwrap_err();
        assert!(err.to_string().contains("SERPAPI_API_KEY"));
        assert!(provider.requests().is_empty());
    }

    #[test]
    fn test_search_results_and_errors() -> AgentResult<()> {
        let hit = SearchResult {
            title: "Rust".to_string(),
            link: "https://www.rust-lang.org".to_string(),
            snippet: "A language".to_string(),
        };
        let search_mode = config(Toggles {
            web_search: true,
            ..Default::default()
        });

        let search = Arc::new(MockSearch::new(Ok(vec![hit.clone()])));
        let mut session = Session::new(ToolRegistry::new()).with_search(search.clone());
        let reply = session.handle(&search_mode, " rust ")?;
        assert_eq!(reply, Reply::SearchResults(vec![hit]));
        assert_eq!(search.queries(), vec!["rust".to_string()]);
        assert_eq!(
            reply.to_string(),
            "1. Rust\n   https://www.rust-lang.org\n   A language"
        );

        let failing = Arc::new(MockSearch::new(Err(AgentError::Search { status_code: 500 })));
        let mut session = Session::new(ToolRegistry::new()).with_search(failing);
        let err = session.handle(&search_mode, "rust").unwrap_err();
        assert_eq!(err, AgentError::Search { status_code: 500 });
        Ok(())
    }

    #[test]
    fn test_blank_input_is_rejected_before_dispatch() {
        let provider = Arc::new(MockProvider::new(vec![]));
        let mut session = session_with(&provider);

        let err = session.handle(&email(), "   ").unwrap_err();
        assert_eq!(err, AgentError::EmptyInput("Please enter an email.".to_string()));
        assert!(provider.requests().is_empty());
    }

    #[test]
    fn test_upstream_failure_keeps_history() -> AgentResult<()> {
        let provider = Arc::new(MockProvider::new(vec![
            Ok("ok".to_string()),
            Err(AgentError::Upstream("Request timed out".to_string())),
        ]));
        let mut session = session_with(&provider);

        session.handle(&general(), "first")?;
        let err = session.handle(&general(), "second").unwrap_err();

        assert!(matches!(err, AgentError::Upstream(_)));
        let conversation = session.conversation().unwrap();
        assert_eq!(conversation.len(), 3);
        assert_eq!(conversation.messages()[2].role, Role::Assistant);
        Ok(())
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(5.972e24), "5.972e+24");
        assert_eq!(format_float(1.898e27), "1.898e+27");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(6.0), "6.0");
        assert_eq!(format_float(3.5), "3.5");
        assert_eq!(format_float(0.00001), "1e-05");
        assert_eq!(format_float(-1.5e-7), "-1.5e-07");
        assert_eq!(format_float(1e16), "1e+16");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-4.0), "-4");
        assert_eq!(format_number(5.972e24), "5.972e+24");
        assert_eq!(format_number(0.00001), "1e-05");
    }

    #[test]
    fn test_planet_mass_display() {
        let unknown = Reply::PlanetMass {
            planet: "pluto".to_string(),
            mass: 0.0,
        };
        assert_eq!(unknown.to_string(), "Planet Mass: 0.0");
    }

    #[test]
    fn test_empty_search_display() {
        assert_eq!(Reply::SearchResults(vec![]).to_string(), "No results found.");
    }
}
