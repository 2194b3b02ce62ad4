//! The ordered rule table
//!
//! Declaration order encodes priority. The table mirrors the dispatch order
//! of the interpreter: knowledge first, then the web shortcuts, time, app
//! launchers, lookups, stores, small talk, the two calculators, device and
//! file control, the broad open fallback, and finally the power and exit
//! rules.

use regex::Regex;
use sdk::types::SystemApp;
use std::sync::OnceLock;

use super::{Conversion, Intent, Rule, SmartAction, Utterance};

pub(super) fn rule_table() -> Vec<Rule> {
    vec![
        Rule {
            name: "knowledge",
            matches: |u| u.contains("wikipedia"),
            extract: |u| Intent::Knowledge {
                topic: non_empty(&u.text().replace("wikipedia", "").replace("search", "")),
            },
        },
        Rule {
            name: "open-youtube",
            matches: |u| u.contains("open youtube"),
            extract: |_| Intent::OpenUrl {
                url: "https://youtube.com".to_string(),
                spoken: "YouTube".to_string(),
            },
        },
        Rule {
            name: "open-google",
            matches: |u| u.contains("open google"),
            extract: |_| Intent::OpenUrl {
                url: "https://google.com".to_string(),
                spoken: "Google".to_string(),
            },
        },
        Rule {
            name: "play-music",
            matches: |u| u.contains("play music"),
            extract: |_| Intent::OpenUrl {
                url: "https://music.youtube.com".to_string(),
                spoken: "YouTube Music".to_string(),
            },
        },
        Rule {
            name: "current-time",
            matches: |u| {
                u.contains("the time")
                    || u.contains("what time")
                    || u.contains("current time")
                    || u.contains("time now")
            },
            extract: |_| Intent::CurrentTime,
        },
        Rule {
            name: "open-notepad",
            matches: |u| u.contains("open notepad"),
            extract: |_| Intent::OpenApp {
                app: SystemApp::Editor,
            },
        },
        Rule {
            name: "open-calculator",
            matches: |u| u.contains("open calculator"),
            extract: |_| Intent::OpenApp {
                app: SystemApp::Calculator,
            },
        },
        Rule {
            name: "open-terminal",
            matches: |u| u.contains("open command prompt") || u.contains("open terminal"),
            extract: |_| Intent::OpenApp {
                app: SystemApp::Terminal,
            },
        },
        Rule {
            name: "weather",
            // A bare "weather" only fires with >=3 words so that short
            // fragments ("weather?") do not over-trigger.
            matches: |u| {
                u.contains("weather in")
                    || u.contains("weather for")
                    || (u.contains("weather") && u.word_count() > 2)
            },
            extract: |u| Intent::Weather {
                city: extract_city(u),
            },
        },
        Rule {
            name: "news",
            matches: |u| {
                u.contains("tell me the news")
                    || u.contains("what's in the news")
                    || u.contains("news")
            },
            extract: |_| Intent::News,
        },
        Rule {
            name: "set-reminder",
            matches: |u| {
                u.contains("set reminder") || u.contains("set a reminder") || u.contains("remind me")
            },
            extract: extract_reminder,
        },
        Rule {
            name: "schedule-task",
            matches: |u| u.contains("schedule task") || u.contains("schedule a task"),
            extract: |u| {
                let description = after_phrase(u.text(), "schedule task")
                    .or_else(|| after_phrase(u.text(), "schedule a task"))
                    .and_then(|rest| non_empty(&rest));
                Intent::ScheduleTask { description }
            },
        },
        Rule {
            name: "system-info",
            matches: |u| {
                u.contains("system info")
                    || u.contains("system status")
                    || u.contains("system information")
            },
            extract: |_| Intent::SystemInfo,
        },
        Rule {
            name: "joke",
            matches: |u| u.contains("joke"),
            extract: |_| Intent::Joke,
        },
        Rule {
            name: "quote",
            matches: |u| u.contains("quote") || u.contains("inspire me"),
            extract: |_| Intent::Quote,
        },
        Rule {
            name: "calculate",
            matches: |u| u.contains("calculate"),
            extract: |u| {
                let rest = u.text().replace("calculate", "");
                Intent::Calculate {
                    expression: non_empty(&strip_leading_article(rest.trim())),
                }
            },
        },
        Rule {
            name: "convert",
            matches: |u| u.contains("convert"),
            extract: extract_conversion,
        },
        Rule {
            name: "screenshot",
            matches: |u| u.contains("screenshot"),
            extract: |_| Intent::Screenshot,
        },
        Rule {
            name: "smart-home",
            matches: |u| {
                u.contains("turn on")
                    || u.contains("turn off")
                    || u.contains("set brightness")
                    || u.contains("brightness")
            },
            extract: extract_smart_home,
        },
        Rule {
            name: "search-files",
            matches: |u| {
                u.contains("search files for")
                    || u.contains("search for files")
                    || u.contains("find files")
            },
            extract: |u| {
                let keyword = after_phrase(u.text(), "search files for")
                    .or_else(|| after_phrase(u.text(), "search for files"))
                    .or_else(|| after_phrase(u.text(), "find files"))
                    .and_then(|rest| non_empty(&rest));
                Intent::SearchFiles { keyword }
            },
        },
        Rule {
            name: "open-file",
            matches: |u| u.contains("open file"),
            extract: |u| Intent::OpenFile {
                path: after_phrase(u.text(), "open file").and_then(|rest| non_empty(&rest)),
            },
        },
        Rule {
            name: "list-directory",
            matches: |u| {
                u.contains("list directory")
                    || u.contains("list folder")
                    || u.contains("show directory")
            },
            extract: |u| {
                let path = after_phrase(u.text(), "list directory")
                    .or_else(|| after_phrase(u.text(), "list folder"))
                    .or_else(|| after_phrase(u.text(), "show directory"))
                    .and_then(|rest| non_empty(&rest));
                Intent::ListDirectory { path }
            },
        },
        Rule {
            name: "web-search",
            matches: |u| {
                u.contains("search web for")
                    || u.contains("search the web")
                    || u.contains("google search")
            },
            extract: |u| {
                let query = after_phrase(u.text(), "search web for")
                    .or_else(|| after_phrase(u.text(), "search the web"))
                    .or_else(|| after_phrase(u.text(), "google search"))
                    .and_then(|rest| non_empty(&rest.trim_start_matches("for ").to_string()));
                Intent::WebSearch { query }
            },
        },
        Rule {
            name: "open-website",
            // The broad fallback. Must exclude every narrower "open ..."
            // trigger declared above, otherwise table order alone would be
            // the only thing saving them.
            matches: |u| {
                u.contains("open website")
                    || (u.contains("open ")
                        && !u.contains("open notepad")
                        && !u.contains("open calculator")
                        && !u.contains("open command prompt")
                        && !u.contains("open terminal")
                        && !u.contains("open file")
                        && !u.contains("open youtube")
                        && !u.contains("open google"))
            },
            extract: |u| {
                let site = after_phrase(u.text(), "open website")
                    .or_else(|| after_phrase(u.text(), "open"))
                    .and_then(|rest| non_empty(&rest));
                Intent::OpenWebsite { site }
            },
        },
        Rule {
            name: "shutdown",
            matches: |u| u.contains("shutdown") || u.contains("shut down"),
            extract: |_| Intent::Shutdown,
        },
        Rule {
            name: "restart",
            matches: |u| u.contains("restart"),
            extract: |_| Intent::Restart,
        },
        Rule {
            name: "exit",
            matches: |u| u.contains("exit") || u.contains("quit") || u.contains("goodbye"),
            extract: |_| Intent::Exit,
        },
    ]
}

/// Everything after the first occurrence of `phrase`, trimmed.
fn after_phrase(text: &str, phrase: &str) -> Option<String> {
    text.split_once(phrase).map(|(_, rest)| rest.trim().to_string())
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn strip_leading_article(text: &str) -> String {
    for article in ["the ", "an ", "a "] {
        if let Some(rest) = text.strip_prefix(article) {
            return rest.to_string();
        }
    }
    text.to_string()
}

/// First run of digits in the text, if any.
fn first_number(text: &str) -> Option<u32> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let re = DIGITS.get_or_init(|| Regex::new(r"\d+").unwrap());
    re.find(text)?.as_str().parse().ok()
}

fn extract_city(u: &Utterance) -> Option<String> {
    if u.contains("weather in") {
        return after_phrase(u.text(), "weather in").and_then(|rest| non_empty(&rest));
    }
    if u.contains("weather for") {
        return after_phrase(u.text(), "weather for").and_then(|rest| non_empty(&rest));
    }
    after_phrase(u.text(), "weather").and_then(|rest| non_empty(&rest))
}

fn extract_reminder(u: &Utterance) -> Intent {
    let inline_time = after_phrase(u.text(), "set a reminder for")
        .or_else(|| after_phrase(u.text(), "set reminder for"));
    let Some(time_text) = inline_time else {
        // Conversational form: handler prompts for text, then time.
        return Intent::SetReminder {
            text: None,
            delay_secs: None,
        };
    };

    let delay_secs = first_number(&time_text).and_then(|n| {
        if time_text.contains("minute") {
            Some(i64::from(n) * 60)
        } else if time_text.contains("second") {
            Some(i64::from(n))
        } else {
            None
        }
    });

    Intent::SetReminder {
        text: Some("your reminder".to_string()),
        delay_secs,
    }
}

fn extract_conversion(u: &Utterance) -> Intent {
    let Some(rest) = after_phrase(u.text(), "convert") else {
        return Intent::Convert { conversion: None };
    };

    let words: Vec<&str> = rest.split_whitespace().collect();
    // "convert 10 meters to feet" or the terser "convert 32 fahrenheit celsius"
    let conversion = if words.len() >= 4 && words[2] == "to" {
        Some(Conversion {
            value: words[0].to_string(),
            from_unit: words[1].to_string(),
            to_unit: words[3].to_string(),
        })
    } else if words.len() >= 3 {
        Some(Conversion {
            value: words[0].to_string(),
            from_unit: words[1].to_string(),
            to_unit: words[2].to_string(),
        })
    } else {
        None
    };

    Intent::Convert { conversion }
}

fn extract_smart_home(u: &Utterance) -> Intent {
    let device_phrase = u.text().to_string();
    let action = if u.contains("turn on") {
        SmartAction::TurnOn { device_phrase }
    } else if u.contains("turn off") {
        SmartAction::TurnOff { device_phrase }
    } else {
        SmartAction::SetBrightness {
            device_phrase,
            // Clamped to the bridge range here so the handler never sees an
            // out-of-range level.
            level: first_number(u.text()).map(|n| n.min(255) as u8),
        }
    };
    Intent::SmartHome { action }
}

#[cfg(test)]
mod tests {
    use super::super::IntentRouter;
    use super::*;

    fn route(text: &str) -> Intent {
        IntentRouter::new().route(&Utterance::new(text))
    }

    #[test]
    fn test_convert_with_to() {
        assert_eq!(
            route("convert 0 celsius to fahrenheit"),
            Intent::Convert {
                conversion: Some(Conversion {
                    value: "0".to_string(),
                    from_unit: "celsius".to_string(),
                    to_unit: "fahrenheit".to_string(),
                })
            }
        );
    }

    #[test]
    fn test_convert_without_to() {
        assert_eq!(
            route("convert 32 fahrenheit celsius"),
            Intent::Convert {
                conversion: Some(Conversion {
                    value: "32".to_string(),
                    from_unit: "fahrenheit".to_string(),
                    to_unit: "celsius".to_string(),
                })
            }
        );
    }

    #[test]
    fn test_convert_malformed() {
        assert_eq!(route("convert stuff"), Intent::Convert { conversion: None });
    }

    #[test]
    fn test_calculate_extraction() {
        assert_eq!(
            route("calculate 2 to the power of 10"),
            Intent::Calculate {
                expression: Some("2 to the power of 10".to_string())
            }
        );
        // Leading article is stripped
        assert_eq!(
            route("calculate the 5 plus 5"),
            Intent::Calculate {
                expression: Some("5 plus 5".to_string())
            }
        );
        assert_eq!(route("calculate"), Intent::Calculate { expression: None });
    }

    #[test]
    fn test_weather_extraction() {
        assert_eq!(
            route("weather in london"),
            Intent::Weather {
                city: Some("london".to_string())
            }
        );
        assert_eq!(
            route("weather for new york"),
            Intent::Weather {
                city: Some("new york".to_string())
            }
        );
        assert_eq!(
            route("what is the weather tokyo"),
            Intent::Weather {
                city: Some("tokyo".to_string())
            }
        );
    }

    #[test]
    fn test_bare_weather_needs_three_words() {
        assert_eq!(route("weather now"), Intent::Unrecognized);
    }

    #[test]
    fn test_reminder_inline_minutes() {
        assert_eq!(
            route("set reminder for 5 minutes"),
            Intent::SetReminder {
                text: Some("your reminder".to_string()),
                delay_secs: Some(300),
            }
        );
    }

    #[test]
    fn test_reminder_inline_seconds() {
        assert_eq!(
            route("set reminder for 45 seconds"),
            Intent::SetReminder {
                text: Some("your reminder".to_string()),
                delay_secs: Some(45),
            }
        );
    }

    #[test]
    fn test_reminder_inline_with_article() {
        assert_eq!(
            route("set a reminder for 5 minutes"),
            Intent::SetReminder {
                text: Some("your reminder".to_string()),
                delay_secs: Some(300),
            }
        );
    }

    #[test]
    fn test_reminder_inline_unparseable_time() {
        assert_eq!(
            route("set reminder for tomorrow"),
            Intent::SetReminder {
                text: Some("your reminder".to_string()),
                delay_secs: None,
            }
        );
    }

    #[test]
    fn test_reminder_conversational() {
        assert_eq!(
            route("set a reminder"),
            Intent::SetReminder {
                text: None,
                delay_secs: None,
            }
        );
    }

    #[test]
    fn test_schedule_task_extraction() {
        assert_eq!(
            route("schedule task water the plants"),
            Intent::ScheduleTask {
                description: Some("water the plants".to_string())
            }
        );
        assert_eq!(
            route("schedule a task"),
            Intent::ScheduleTask { description: None }
        );
    }

    #[test]
    fn test_knowledge_strips_trigger_words() {
        assert_eq!(
            route("search wikipedia rust language"),
            Intent::Knowledge {
                topic: Some("rust language".to_string())
            }
        );
        assert_eq!(route("wikipedia"), Intent::Knowledge { topic: None });
    }

    #[test]
    fn test_smart_home_actions() {
        assert_eq!(
            route("turn on the living room light"),
            Intent::SmartHome {
                action: SmartAction::TurnOn {
                    device_phrase: "turn on the living room light".to_string()
                }
            }
        );
        assert_eq!(
            route("set brightness bedroom light 128"),
            Intent::SmartHome {
                action: SmartAction::SetBrightness {
                    device_phrase: "set brightness bedroom light 128".to_string(),
                    level: Some(128),
                }
            }
        );
    }

    #[test]
    fn test_brightness_clamps_to_255() {
        let intent = route("set brightness kitchen light 999");
        let Intent::SmartHome {
            action: SmartAction::SetBrightness { level, .. },
        } = intent
        else {
            panic!("expected brightness intent");
        };
        assert_eq!(level, Some(255));
    }

    #[test]
    fn test_file_rules() {
        assert_eq!(
            route("search files for report"),
            Intent::SearchFiles {
                keyword: Some("report".to_string())
            }
        );
        assert_eq!(
            route("list directory /tmp"),
            Intent::ListDirectory {
                path: Some("/tmp".to_string())
            }
        );
        assert_eq!(route("list folder"), Intent::ListDirectory { path: None });
    }

    #[test]
    fn test_web_search_extraction() {
        assert_eq!(
            route("search web for rust tutorials"),
            Intent::WebSearch {
                query: Some("rust tutorials".to_string())
            }
        );
        assert_eq!(
            route("search the web for cat pictures"),
            Intent::WebSearch {
                query: Some("cat pictures".to_string())
            }
        );
    }

    #[test]
    fn test_power_and_exit_rules() {
        assert_eq!(route("shutdown the computer"), Intent::Shutdown);
        assert_eq!(route("please restart"), Intent::Restart);
        assert_eq!(route("goodbye"), Intent::Exit);
    }

    #[test]
    fn test_time_rule() {
        assert_eq!(route("what time is it"), Intent::CurrentTime);
        assert_eq!(route("tell me the time"), Intent::CurrentTime);
    }

    #[test]
    fn test_helpers() {
        assert_eq!(first_number("in 15 minutes"), Some(15));
        assert_eq!(first_number("soon"), None);
        assert_eq!(after_phrase("open file notes.txt", "open file").as_deref(), Some("notes.txt"));
        assert_eq!(strip_leading_article("the 5 plus 5"), "5 plus 5");
    }
}
