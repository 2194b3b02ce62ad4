//! Intent routing
//!
//! Maps a normalized utterance to one of a fixed set of intents with
//! extracted parameters. Routing is deterministic rule matching: the router
//! holds a statically ordered rule table and the first rule whose predicate
//! matches wins, with no scoring and no backtracking. Declaration order is
//! load-bearing: broad triggers (the bare "open <x>" fallback) come after
//! the narrow ones they would otherwise shadow, and explicitly exclude them.
//!
//! The router only classifies. Extractors never perform I/O; an intent with
//! a missing field carries `None` and the handler runs the clarifying
//! prompt.

mod rules;

use sdk::types::SystemApp;

/// A normalized utterance: lower-cased, trimmed, immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance(String);

impl Utterance {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn contains(&self, phrase: &str) -> bool {
        self.0.contains(phrase)
    }

    fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

/// Parameters of a recognized unit conversion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub value: String,
    pub from_unit: String,
    pub to_unit: String,
}

/// A smart-home command; the device phrase is resolved against the config
/// device registry by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmartAction {
    TurnOn { device_phrase: String },
    TurnOff { device_phrase: String },
    SetBrightness { device_phrase: String, level: Option<u8> },
}

/// The classified action derived from an utterance.
///
/// `None` fields are missing parameters the handler must prompt for, in
/// fixed field order (text, then time).
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Encyclopedia lookup ("wikipedia rust language")
    Knowledge { topic: Option<String> },
    /// Open a well-known or named URL
    OpenUrl { url: String, spoken: String },
    /// Search-engine query
    WebSearch { query: Option<String> },
    /// Open an arbitrary website by name
    OpenWebsite { site: Option<String> },
    /// Speak the current time
    CurrentTime,
    /// Launch a known system application
    OpenApp { app: SystemApp },
    /// Current-weather lookup
    Weather { city: Option<String> },
    /// Top news headlines
    News,
    /// Queue a reminder
    SetReminder {
        text: Option<String>,
        delay_secs: Option<i64>,
    },
    /// Schedule a task announcement
    ScheduleTask { description: Option<String> },
    /// Speak host resource usage
    SystemInfo,
    Joke,
    Quote,
    /// Evaluate an arithmetic expression
    Calculate { expression: Option<String> },
    /// Unit conversion; `None` when the phrase did not fit the
    /// `convert <value> <from> [to] <to>` shape
    Convert { conversion: Option<Conversion> },
    Screenshot,
    /// Smart-home light control
    SmartHome { action: SmartAction },
    /// Search files by name keyword
    SearchFiles { keyword: Option<String> },
    /// Open a file with the default application
    OpenFile { path: Option<String> },
    /// List directory contents
    ListDirectory { path: Option<String> },
    /// Power off the machine (handler asks for confirmation)
    Shutdown,
    /// Reboot the machine (handler asks for confirmation)
    Restart,
    /// End the session
    Exit,
    /// No rule matched
    Unrecognized,
}

/// An ordered routing rule: a predicate over the utterance plus an
/// extractor producing the intent. Earlier rules have higher priority.
pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&Utterance) -> bool,
    pub extract: fn(&Utterance) -> Intent,
}

/// The intent router: an ordered rule table evaluated top to bottom.
pub struct IntentRouter {
    rules: Vec<Rule>,
}

impl IntentRouter {
    pub fn new() -> Self {
        Self {
            rules: rules::rule_table(),
        }
    }

    /// Classify an utterance. The first rule whose predicate matches wins;
    /// if none does, the result is [`Intent::Unrecognized`].
    pub fn route(&self, utterance: &Utterance) -> Intent {
        for rule in &self.rules {
            if (rule.matches)(utterance) {
                tracing::debug!("Utterance matched rule '{}'", rule.name);
                return (rule.extract)(utterance);
            }
        }
        Intent::Unrecognized
    }

    /// Name of the first matching rule, for diagnostics and precedence
    /// tests.
    pub fn matching_rule(&self, utterance: &Utterance) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|r| (r.matches)(utterance))
            .map(|r| r.name)
    }
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new()
    }
}
