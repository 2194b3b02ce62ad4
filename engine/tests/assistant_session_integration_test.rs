//! Integration tests for the interpreter loop
//!
//! Drives `AssistantCore` with a scripted speech frontend and asserts on
//! everything the session speaks, including clarifying-prompt exchanges.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use aria_engine::assistant::AssistantCore;
use aria_engine::capabilities::CapabilityRegistry;
use aria_engine::config::Config;
use sdk::capability::{Result as CapResult, SpeechCapture, SpeechOutput};

/// Capture that replays a fixed list of answers.
struct ScriptedCapture {
    answers: Mutex<VecDeque<String>>,
}

impl ScriptedCapture {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
        }
    }
}

#[async_trait]
impl SpeechCapture for ScriptedCapture {
    async fn listen(&self) -> CapResult<Option<String>> {
        Ok(self.answers.lock().unwrap().pop_front())
    }
}

/// Output that records every spoken line.
#[derive(Clone)]
struct RecordedSpeech {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordedSpeech {
    fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl SpeechOutput for RecordedSpeech {
    fn say(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

fn test_config(temp: &TempDir) -> Config {
    let path = temp.path().join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[core]\ndata_dir = \"{}\"\n",
            temp.path().join("data").display()
        ),
    )
    .unwrap();
    Config::load_from_path(&path).unwrap()
}

fn session(answers: &[&str]) -> (AssistantCore, RecordedSpeech, TempDir) {
    let temp = TempDir::new().unwrap();
    let config = test_config(&temp);
    let speech = RecordedSpeech::new();
    let core = AssistantCore::new(
        &config,
        CapabilityRegistry::empty(),
        Box::new(ScriptedCapture::new(answers)),
        Box::new(speech.clone()),
    );
    (core, speech, temp)
}

#[tokio::test]
async fn test_inline_calculation_speaks_the_answer() {
    let (mut core, speech, _temp) = session(&[]);

    assert!(core.interpret("calculate 5 plus 3 times 2").await);

    assert_eq!(speech.lines(), vec!["That's 11."]);
}

#[tokio::test]
async fn test_calculation_prompts_for_missing_expression() {
    let (mut core, speech, _temp) = session(&["2 ** 10"]);

    assert!(core.interpret("calculate").await);

    let lines = speech.lines();
    assert_eq!(lines[0], "What should I calculate?");
    assert_eq!(lines[1], "That's 1024.");
}

#[tokio::test]
async fn test_conversion_end_to_end() {
    let (mut core, speech, _temp) = session(&[]);

    assert!(core.interpret("convert 100 celsius to fahrenheit").await);

    assert_eq!(speech.lines(), vec!["100 celsius is 212 fahrenheit."]);
}

#[tokio::test]
async fn test_division_by_zero_is_spoken_not_fatal() {
    let (mut core, speech, _temp) = session(&[]);

    assert!(core.interpret("calculate 1 / 0").await);
    assert!(core.interpret("calculate 1 + 1").await);

    let lines = speech.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].to_lowercase().contains("zero"));
    assert_eq!(lines[1], "That's 2.");
}

#[tokio::test]
async fn test_conversational_reminder_prompts_in_order() {
    let (mut core, speech, _temp) = session(&["check the oven", "90"]);

    assert!(core.interpret("set a reminder").await);

    let lines = speech.lines();
    assert_eq!(lines[0], "What should I remind you about?");
    assert_eq!(lines[1], "In how many seconds should I remind you?");
    assert!(lines[2].contains("check the oven"));
    assert!(lines[2].contains("90 seconds"));
}

#[tokio::test]
async fn test_reminder_with_unusable_time_is_an_error_message() {
    let (mut core, speech, _temp) = session(&["soonish"]);

    assert!(core.interpret("set reminder for tomorrow").await);

    // The inline form carried text but no delay, so the session asks for a
    // time; "soonish" has no number and the failure is spoken.
    let lines = speech.lines();
    assert_eq!(lines[0], "In how many seconds should I remind you?");
    assert_eq!(lines.len(), 2);
}

#[tokio::test]
async fn test_exit_ends_the_session() {
    let (mut core, speech, _temp) = session(&[]);

    assert!(!core.interpret("goodbye").await);
    assert_eq!(speech.lines(), vec!["Goodbye!"]);
}

#[tokio::test]
async fn test_unavailable_capability_is_reported_and_loop_survives() {
    let (mut core, speech, _temp) = session(&[]);

    assert!(core.interpret("tell me the news").await);
    assert!(core.interpret("what time is it").await);

    let lines = speech.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("It's "));
}

#[tokio::test]
async fn test_unknown_utterance_is_gentle() {
    let (mut core, speech, _temp) = session(&[]);

    assert!(core.interpret("flibbertigibbet").await);
    assert!(speech.lines()[0].contains("not sure"));
}

#[tokio::test]
async fn test_smalltalk_needs_no_capabilities() {
    let (mut core, speech, _temp) = session(&[]);

    assert!(core.interpret("tell me a joke").await);
    assert!(core.interpret("give me a quote").await);

    assert_eq!(speech.lines().len(), 2);
}

#[tokio::test]
async fn test_empty_utterance_says_nothing() {
    let (mut core, speech, _temp) = session(&[]);

    assert!(core.interpret("   ").await);
    assert!(speech.lines().is_empty());
}
