//! Canned jokes and quotes for the small-talk intents.

use rand::seq::SliceRandom;

const JOKES: &[&str] = &[
    "Why don't scientists trust atoms? Because they make up everything.",
    "I told my computer I needed a break, and it said no problem, it would go to sleep.",
    "Why did the scarecrow win an award? He was outstanding in his field.",
    "What do you call a fish without eyes? A fsh.",
    "Why do programmers prefer dark mode? Because light attracts bugs.",
];

const QUOTES: &[&str] = &[
    "The only way to do great work is to love what you do.",
    "It always seems impossible until it's done.",
    "The best time to plant a tree was twenty years ago. The second best time is now.",
    "Simplicity is the ultimate sophistication.",
    "Whether you think you can or you think you can't, you're right.",
];

pub fn random_joke() -> &'static str {
    JOKES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(JOKES[0])
}

pub fn random_quote() -> &'static str {
    QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(QUOTES[0])
}
