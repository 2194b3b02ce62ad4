//! The interpreter loop.
//!
//! `AssistantCore` owns the collaborators a session needs: the intent
//! router, the capability registry, the reminder scheduler, and the speech
//! frontends. Each loop iteration delivers due reminders, listens for one
//! utterance, routes it, and speaks exactly one response. Handler failures
//! never tear the loop down; the error is logged and its user hint spoken.

mod smalltalk;

use chrono::{Duration, Local, Timelike, Utc};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use sdk::capability::{SpeechCapture, SpeechOutput};
use sdk::errors::{AriaErrorExt, AssistantError};

use crate::calc::{self, CalcError};
use crate::capabilities::CapabilityRegistry;
use crate::config::Config;
use crate::intent::{Conversion, Intent, IntentRouter, SmartAction, Utterance};
use crate::scheduler::Scheduler;
use crate::units::{self, ConvertError};

type Result<T> = std::result::Result<T, AssistantError>;

pub struct AssistantCore {
    name: String,
    router: IntentRouter,
    registry: CapabilityRegistry,
    scheduler: Scheduler,
    capture: Box<dyn SpeechCapture>,
    speech: Box<dyn SpeechOutput>,
    devices: HashMap<String, u8>,
    search_root: std::path::PathBuf,
    data_dir: std::path::PathBuf,
}

impl AssistantCore {
    pub fn new(
        config: &Config,
        registry: CapabilityRegistry,
        capture: Box<dyn SpeechCapture>,
        speech: Box<dyn SpeechOutput>,
    ) -> Self {
        Self {
            name: config.core.assistant_name.clone(),
            router: IntentRouter::new(),
            registry,
            scheduler: Scheduler::new(),
            capture,
            speech,
            devices: config.smart_home.devices.clone(),
            search_root: config.files.search_root.clone(),
            data_dir: config.core.data_dir.clone(),
        }
    }

    /// Run the interactive session until an exit intent or Ctrl-C.
    pub async fn run(&mut self) -> Result<()> {
        let greeting = format!(
            "{} I'm {}. How can I help you?",
            greeting_for_hour(Local::now().hour()),
            self.name
        );
        self.speech.say(&greeting);

        loop {
            self.deliver_due();

            let heard = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received");
                    self.speech.say("Goodbye!");
                    return Ok(());
                }
                heard = self.capture.listen() => heard,
            };

            let text = match heard {
                Ok(Some(text)) => text,
                Ok(None) => continue,
                Err(e) => {
                    warn!("capture failed: {}", e);
                    self.speech.say(e.user_hint());
                    continue;
                }
            };

            if !self.interpret(&text).await {
                return Ok(());
            }
        }
    }

    /// Interpret one utterance. Returns false when the session should end.
    pub async fn interpret(&mut self, text: &str) -> bool {
        let utterance = Utterance::new(text);
        if utterance.is_empty() {
            return true;
        }

        let intent = self.router.route(&utterance);
        debug!(?intent, "dispatching");

        match self.respond(intent).await {
            Ok(Some(message)) => {
                self.speech.say(&message);
                true
            }
            Ok(None) => {
                self.speech.say("Goodbye!");
                false
            }
            Err(e) => {
                warn!("handler failed: {}", e);
                self.speech.say(e.user_hint());
                true
            }
        }
    }

    /// Speak any reminders or tasks that have come due. Runs at the top of
    /// every loop iteration; one-shot runs call it once after the utterance.
    pub fn deliver_due(&mut self) {
        let now = Utc::now();
        for reminder in self.scheduler.due_reminders(now) {
            self.speech.say(&format!("Reminder: {}", reminder.text));
        }
        for task in self.scheduler.due_tasks(now) {
            self.speech.say(&format!("It's time to: {}", task.description));
        }
    }

    /// Produce the spoken response for an intent. `Ok(None)` ends the
    /// session.
    async fn respond(&mut self, intent: Intent) -> Result<Option<String>> {
        let message = match intent {
            Intent::Knowledge { topic } => {
                let topic = self
                    .fill(topic, "What should I look up?")
                    .await?;
                let knowledge = self
                    .registry
                    .knowledge
                    .as_ref()
                    .ok_or_else(|| unavailable("knowledge lookups"))?;
                knowledge.summarize(&topic).await?
            }

            Intent::OpenUrl { url, spoken } => {
                open_url(&url).await?;
                format!("Opening {}.", spoken)
            }

            Intent::WebSearch { query } => {
                let query = self
                    .fill(query, "What should I search for?")
                    .await?;
                let (url, engine, terms) = search_url(&query);
                open_url(&url).await?;
                format!("Searching {} for {}.", engine, terms)
            }

            Intent::OpenWebsite { site } => {
                let site = self
                    .fill(site, "Which website should I open?")
                    .await?;
                let url = normalize_website(&site);
                open_url(&url).await?;
                format!("Opening {}.", site)
            }

            Intent::CurrentTime => {
                format!("It's {}.", Local::now().format("%H:%M:%S"))
            }

            Intent::OpenApp { app } => {
                let process = self
                    .registry
                    .process
                    .as_ref()
                    .ok_or_else(|| unavailable("app launching"))?;
                process.open_app(app).await?;
                format!("Opening {}.", app.spoken_name())
            }

            Intent::Weather { city } => {
                let city = self
                    .fill(city, "Which city do you want the weather for?")
                    .await?;
                let weather = self
                    .registry
                    .weather
                    .as_ref()
                    .ok_or_else(|| unavailable("weather lookups"))?;
                weather.fetch(&city).await?.spoken()
            }

            Intent::News => {
                let news = self
                    .registry
                    .news
                    .as_ref()
                    .ok_or_else(|| unavailable("news lookups"))?;
                let headlines = news.fetch().await?;
                if headlines.is_empty() {
                    "No headlines right now.".to_string()
                } else {
                    let mut lines = vec!["Here are the top headlines.".to_string()];
                    for (i, headline) in headlines.iter().enumerate() {
                        let source = headline
                            .source
                            .as_deref()
                            .map(|s| format!(" ({})", s))
                            .unwrap_or_default();
                        lines.push(format!("{}. {}{}", i + 1, headline.title, source));
                    }
                    lines.join(" ")
                }
            }

            Intent::SetReminder { text, delay_secs } => {
                let text = self
                    .fill(text, "What should I remind you about?")
                    .await?;
                let delay_secs = match delay_secs {
                    Some(secs) => secs,
                    None => {
                        let answer = self
                            .prompt("In how many seconds should I remind you?")
                            .await?;
                        parse_first_number(&answer).ok_or_else(|| {
                            AssistantError::Parse(format!("not a number of seconds: '{}'", answer))
                        })?
                    }
                };
                self.scheduler
                    .add_reminder(&text, Duration::seconds(delay_secs));
                format!(
                    "Okay, I'll remind you about {} in {}.",
                    text,
                    spoken_delay(delay_secs)
                )
            }

            Intent::ScheduleTask { description } => {
                let description = self
                    .fill(description, "What task should I schedule?")
                    .await?;
                let answer = self.prompt("When should I do it?").await?;
                // Unparseable times fall back to five minutes from now.
                let delay = parse_delay(&answer)
                    .unwrap_or_else(|| Duration::minutes(5));
                let due = Utc::now() + delay;
                self.scheduler.add_task(&description, due);
                format!(
                    "Scheduled: {} in {}.",
                    description,
                    spoken_delay(delay.num_seconds())
                )
            }

            Intent::SystemInfo => {
                let monitor = self
                    .registry
                    .monitor
                    .as_ref()
                    .ok_or_else(|| unavailable("system monitoring"))?;
                monitor.snapshot()?.spoken()
            }

            Intent::Joke => smalltalk::random_joke().to_string(),

            Intent::Quote => smalltalk::random_quote().to_string(),

            Intent::Calculate { expression } => {
                let expression = self
                    .fill(expression, "What should I calculate?")
                    .await?;
                let value = calc::evaluate(&expression).map_err(calc_error)?;
                format!("That's {}.", calc::format_result(value))
            }

            Intent::Convert { conversion } => match conversion {
                None => {
                    "Say something like: convert 10 meters to feet.".to_string()
                }
                Some(Conversion {
                    value,
                    from_unit,
                    to_unit,
                }) => {
                    let result =
                        units::convert_text(&value, &from_unit, &to_unit).map_err(convert_error)?;
                    format!(
                        "{} {} is {} {}.",
                        value,
                        from_unit,
                        units::round2(result),
                        to_unit
                    )
                }
            },

            Intent::Screenshot => {
                let screen = self
                    .registry
                    .screen
                    .as_ref()
                    .ok_or_else(|| unavailable("screenshots"))?;
                let filename = format!(
                    "screenshot_{}.png",
                    Local::now().format("%Y%m%d_%H%M%S")
                );
                let saved = screen.capture(&self.data_dir.join(filename)).await?;
                format!("Screenshot saved to {}.", saved.display())
            }

            Intent::SmartHome { action } => {
                let bridge = self
                    .registry
                    .smart_home
                    .as_ref()
                    .ok_or_else(|| unavailable("smart home control"))?;
                match action {
                    SmartAction::TurnOn { device_phrase } => {
                        let (name, id) = resolve_device(&self.devices, &device_phrase)?;
                        bridge.set_light(id, true).await?;
                        format!("Turned on the {}.", name)
                    }
                    SmartAction::TurnOff { device_phrase } => {
                        let (name, id) = resolve_device(&self.devices, &device_phrase)?;
                        bridge.set_light(id, false).await?;
                        format!("Turned off the {}.", name)
                    }
                    SmartAction::SetBrightness {
                        device_phrase,
                        level,
                    } => {
                        let (name, id) = resolve_device(&self.devices, &device_phrase)?;
                        let level = level.ok_or_else(|| {
                            AssistantError::Parse("no brightness level given".to_string())
                        })?;
                        bridge.set_brightness(id, level).await?;
                        format!("Set the {} to brightness {}.", name, level)
                    }
                }
            }

            Intent::SearchFiles { keyword } => {
                let keyword = self
                    .fill(keyword, "What filename should I search for?")
                    .await?;
                let files = self
                    .registry
                    .files
                    .as_ref()
                    .ok_or_else(|| unavailable("file access"))?;
                let hits = files.search_by_name(&keyword, &self.search_root).await?;
                if hits.is_empty() {
                    format!("No files matching '{}'.", keyword)
                } else {
                    // Speak at most the first five hits.
                    let names: Vec<String> = hits
                        .iter()
                        .take(5)
                        .filter_map(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .collect();
                    format!(
                        "Found {} file(s): {}.",
                        hits.len(),
                        names.join(", ")
                    )
                }
            }

            Intent::OpenFile { path } => {
                let path = self
                    .fill(path, "Which file should I open?")
                    .await?;
                let files = self
                    .registry
                    .files
                    .as_ref()
                    .ok_or_else(|| unavailable("file access"))?;
                let opened = files.open(&path).await?;
                format!("Opened {}.", opened.display())
            }

            Intent::ListDirectory { path } => {
                let files = self
                    .registry
                    .files
                    .as_ref()
                    .ok_or_else(|| unavailable("file access"))?;
                let target = match path {
                    Some(p) => std::path::PathBuf::from(p),
                    None => self.search_root.clone(),
                };
                let names = files.list(&target).await?;
                if names.is_empty() {
                    format!("{} is empty.", target.display())
                } else {
                    // Speak at most the first ten entries.
                    let spoken: Vec<&str> =
                        names.iter().take(10).map(String::as_str).collect();
                    format!(
                        "{} contains {} entries: {}.",
                        target.display(),
                        names.len(),
                        spoken.join(", ")
                    )
                }
            }

            Intent::Shutdown => {
                if !self.confirm("Are you sure you want to shut down?").await? {
                    "Okay, cancelled.".to_string()
                } else {
                    let process = self
                        .registry
                        .process
                        .as_ref()
                        .ok_or_else(|| unavailable("power control"))?;
                    process.shutdown().await?;
                    "Shutting down.".to_string()
                }
            }

            Intent::Restart => {
                if !self.confirm("Are you sure you want to restart?").await? {
                    "Okay, cancelled.".to_string()
                } else {
                    let process = self
                        .registry
                        .process
                        .as_ref()
                        .ok_or_else(|| unavailable("power control"))?;
                    process.restart().await?;
                    "Restarting.".to_string()
                }
            }

            Intent::Exit => return Ok(None),

            Intent::Unrecognized => {
                "I'm not sure how to help with that.".to_string()
            }
        };

        Ok(Some(message))
    }

    /// Use the extracted value, or ask the user for it.
    async fn fill(&self, value: Option<String>, question: &str) -> Result<String> {
        match value {
            Some(value) => Ok(value),
            None => self.prompt(question).await,
        }
    }

    /// Ask a clarifying question and wait for one answer.
    async fn prompt(&self, question: &str) -> Result<String> {
        self.speech.say(question);
        match self.capture.listen().await? {
            Some(answer) => Ok(answer),
            None => Err(AssistantError::Recognition(
                "no answer heard".to_string(),
            )),
        }
    }

    /// Ask a yes/no question; anything but an affirmative counts as no.
    async fn confirm(&self, question: &str) -> Result<bool> {
        let answer = self.prompt(question).await?;
        Ok(answer.contains("yes") || answer.trim() == "y")
    }
}

fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good morning!",
        12..=17 => "Good afternoon!",
        _ => "Good evening!",
    }
}

fn unavailable(what: &str) -> AssistantError {
    AssistantError::CapabilityUnavailable(what.to_string())
}

fn calc_error(e: CalcError) -> AssistantError {
    match e {
        CalcError::Parse(detail) => AssistantError::Parse(detail),
        CalcError::UnsupportedOperation(op) => AssistantError::UnsupportedOperation(op),
        CalcError::DivisionByZero => AssistantError::DivisionByZero,
    }
}

fn convert_error(e: ConvertError) -> AssistantError {
    match e {
        ConvertError::Parse(detail) => AssistantError::Parse(detail),
        ConvertError::UnsupportedConversion { from, to } => {
            AssistantError::UnsupportedConversion { from, to }
        }
    }
}

/// Find the configured device whose name appears in the spoken phrase.
/// The longest matching name wins on overlaps.
fn resolve_device<'a>(
    devices: &'a HashMap<String, u8>,
    phrase: &str,
) -> Result<(&'a str, u8)> {
    devices
        .iter()
        .filter(|(name, _)| phrase.contains(name.as_str()))
        .max_by_key(|(name, _)| name.len())
        .map(|(name, id)| (name.as_str(), *id))
        .ok_or_else(|| AssistantError::NotFound("that device".to_string()))
}

/// Build a search-engine URL from the spoken query. A trailing
/// "on bing" or "on duckduckgo" picks the engine; google is the default.
fn search_url(query: &str) -> (String, &'static str, String) {
    let (engine, terms) = if let Some(terms) = query.strip_suffix(" on bing") {
        ("bing", terms)
    } else if let Some(terms) = query.strip_suffix(" on duckduckgo") {
        ("duckduckgo", terms)
    } else {
        ("google", query)
    };
    let encoded = encode_query(terms);
    let url = match engine {
        "bing" => format!("https://www.bing.com/search?q={}", encoded),
        "duckduckgo" => format!("https://duckduckgo.com/?q={}", encoded),
        _ => format!("https://www.google.com/search?q={}", encoded),
    };
    (url, engine, terms.to_string())
}

/// Percent-encode a query string, with spaces as `+`.
fn encode_query(terms: &str) -> String {
    let mut out = String::with_capacity(terms.len());
    for byte in terms.bytes() {
        match byte {
            b' ' => out.push('+'),
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Add a scheme and a TLD when the user names a bare site.
fn normalize_website(site: &str) -> String {
    let site = site.trim();
    let with_tld = if site.contains('.') {
        site.to_string()
    } else {
        format!("{}.com", site)
    };
    if with_tld.starts_with("http://") || with_tld.starts_with("https://") {
        with_tld
    } else {
        format!("https://{}", with_tld)
    }
}

fn parse_first_number(text: &str) -> Option<i64> {
    text.split_whitespace()
        .find_map(|word| word.parse::<i64>().ok())
        .filter(|n| *n > 0)
}

/// Parse "in N seconds|minutes|hours" style answers.
fn parse_delay(text: &str) -> Option<Duration> {
    let n = parse_first_number(text)?;
    if text.contains("hour") {
        Some(Duration::hours(n))
    } else if text.contains("minute") {
        Some(Duration::minutes(n))
    } else if text.contains("second") {
        Some(Duration::seconds(n))
    } else {
        None
    }
}

fn spoken_delay(total_secs: i64) -> String {
    if total_secs >= 3600 && total_secs % 3600 == 0 {
        let hours = total_secs / 3600;
        format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
    } else if total_secs >= 60 && total_secs % 60 == 0 {
        let minutes = total_secs / 60;
        format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    } else {
        format!(
            "{} second{}",
            total_secs,
            if total_secs == 1 { "" } else { "s" }
        )
    }
}

/// Open a URL with the platform handler.
async fn open_url(url: &str) -> Result<()> {
    info!("opening url {}", url);

    #[cfg(target_os = "macos")]
    let status = tokio::process::Command::new("open").arg(url).status().await;

    #[cfg(target_os = "linux")]
    let status = tokio::process::Command::new("xdg-open")
        .arg(url)
        .status()
        .await;

    #[cfg(target_os = "windows")]
    let status = tokio::process::Command::new("cmd")
        .args(["/C", "start", "", url])
        .status()
        .await;

    let status = status.map_err(AssistantError::Io)?;
    if !status.success() {
        return Err(AssistantError::ExternalService {
            service: "browser".to_string(),
            detail: format!("opener exited with {}", status),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use sdk::capability::{NullCapture, NullSpeech};

    fn test_config() -> Config {
        let toml = r#"
            [core]
            assistant_name = "Aria"
            data_dir = "/tmp/aria-test"
        "#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml).unwrap();
        Config::load_from_path(&path).unwrap()
    }

    fn bare_core() -> AssistantCore {
        AssistantCore::new(
            &test_config(),
            crate::capabilities::CapabilityRegistry::empty(),
            Box::new(NullCapture),
            Box::new(NullSpeech),
        )
    }

    #[test]
    fn test_greeting_for_hour() {
        assert_eq!(greeting_for_hour(8), "Good morning!");
        assert_eq!(greeting_for_hour(13), "Good afternoon!");
        assert_eq!(greeting_for_hour(21), "Good evening!");
        assert_eq!(greeting_for_hour(0), "Good morning!");
    }

    #[test]
    fn test_search_url_defaults_to_google() {
        let (url, engine, terms) = search_url("rust async runtime");
        assert_eq!(url, "https://www.google.com/search?q=rust+async+runtime");
        assert_eq!(engine, "google");
        assert_eq!(terms, "rust async runtime");
    }

    #[test]
    fn test_search_url_recognizes_other_engines() {
        let (url, engine, _) = search_url("weather today on bing");
        assert_eq!(url, "https://www.bing.com/search?q=weather+today");
        assert_eq!(engine, "bing");

        let (url, engine, _) = search_url("privacy on duckduckgo");
        assert_eq!(url, "https://duckduckgo.com/?q=privacy");
        assert_eq!(engine, "duckduckgo");
    }

    #[test]
    fn test_encode_query_escapes_reserved_bytes() {
        assert_eq!(encode_query("c++ & rust"), "c%2B%2B+%26+rust");
        assert_eq!(encode_query("plain-words_only.ok~"), "plain-words_only.ok~");
    }

    #[test]
    fn test_normalize_website() {
        assert_eq!(normalize_website("example.com"), "https://example.com");
        assert_eq!(normalize_website("github"), "https://github.com");
        assert_eq!(
            normalize_website("https://already.dev"),
            "https://already.dev"
        );
    }

    #[test]
    fn test_parse_delay() {
        assert_eq!(parse_delay("in 10 minutes"), Some(Duration::minutes(10)));
        assert_eq!(parse_delay("2 hours"), Some(Duration::hours(2)));
        assert_eq!(parse_delay("45 seconds"), Some(Duration::seconds(45)));
        assert_eq!(parse_delay("tomorrow"), None);
        assert_eq!(parse_delay("10"), None);
    }

    #[test]
    fn test_spoken_delay() {
        assert_eq!(spoken_delay(300), "5 minutes");
        assert_eq!(spoken_delay(60), "1 minute");
        assert_eq!(spoken_delay(45), "45 seconds");
        assert_eq!(spoken_delay(7200), "2 hours");
    }

    #[test]
    fn test_resolve_device_prefers_longest_match() {
        let mut devices = HashMap::new();
        devices.insert("light".to_string(), 1);
        devices.insert("living room light".to_string(), 3);

        let (name, id) = resolve_device(&devices, "turn on the living room light").unwrap();
        assert_eq!(name, "living room light");
        assert_eq!(id, 3);
    }

    #[test]
    fn test_resolve_device_unknown() {
        let devices = HashMap::new();
        let err = resolve_device(&devices, "turn on the attic fan").unwrap_err();
        assert!(matches!(err, AssistantError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_current_time_needs_no_capabilities() {
        let mut core = bare_core();
        let message = core.respond(Intent::CurrentTime).await.unwrap().unwrap();
        assert!(message.starts_with("It's "));
    }

    #[tokio::test]
    async fn test_exit_ends_session() {
        let mut core = bare_core();
        assert!(core.respond(Intent::Exit).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_capability_is_reported() {
        let mut core = bare_core();
        let err = core.respond(Intent::News).await.unwrap_err();
        assert!(matches!(err, AssistantError::CapabilityUnavailable(_)));
    }

    #[tokio::test]
    async fn test_inline_reminder_is_stored() {
        let mut core = bare_core();
        let message = core
            .respond(Intent::SetReminder {
                text: Some("your reminder".to_string()),
                delay_secs: Some(300),
            })
            .await
            .unwrap()
            .unwrap();
        assert!(message.contains("5 minutes"));
        assert_eq!(core.scheduler.pending_reminders(), 1);
    }

    #[tokio::test]
    async fn test_prompt_without_answer_is_recognition_error() {
        // NullCapture never hears anything, so the clarifying prompt fails.
        let mut core = bare_core();
        let err = core
            .respond(Intent::Calculate { expression: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Recognition(_)));
    }

    #[tokio::test]
    async fn test_calculate_inline() {
        let mut core = bare_core();
        let message = core
            .respond(Intent::Calculate {
                expression: Some("2 to the power of 10".to_string()),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(message, "That's 1024.");
    }

    #[tokio::test]
    async fn test_convert_inline() {
        let mut core = bare_core();
        let message = core
            .respond(Intent::Convert {
                conversion: Some(Conversion {
                    value: "0".to_string(),
                    from_unit: "celsius".to_string(),
                    to_unit: "fahrenheit".to_string(),
                }),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(message, "0 celsius is 32 fahrenheit.");
    }

    #[tokio::test]
    async fn test_convert_without_payload_explains_usage() {
        let mut core = bare_core();
        let message = core
            .respond(Intent::Convert { conversion: None })
            .await
            .unwrap()
            .unwrap();
        assert!(message.contains("convert 10 meters to feet"));
    }

    #[tokio::test]
    async fn test_unrecognized_is_gentle() {
        let mut core = bare_core();
        let message = core.respond(Intent::Unrecognized).await.unwrap().unwrap();
        assert!(message.contains("not sure"));
    }
}
