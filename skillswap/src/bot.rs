//! Scripted FAQ assistant.

use crate::models::ChatBotTurn;

/// Reply when no rule matches.
pub const FALLBACK_REPLY: &str =
    "Hmm 🤔 I didn't get that. Try using a keyword like 'Learn', 'Teach', or 'Projects'!";

/// Keywords and the reply they trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRule {
    pub keywords: Vec<String>,
    pub reply: String,
}

impl ReplyRule {
    /// Create a rule. Keywords are matched in lowercase.
    pub fn new<I, S>(keywords: I, reply: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            reply: reply.into(),
        }
    }

    /// Check whether any keyword occurs in normalized input.
    fn fires(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|k| normalized.contains(k.as_str()))
    }
}

const DEFAULT_RULES: &[(&[&str], &str)] = &[
    (
        &["hello", "hi", "hey"],
        "Hey there! 👋 Welcome to SkillSwap! How can I help you today?",
    ),
    (
        &["hey bot"],
        "Hello! 😄 I'm your SkillBot, here to help you navigate SkillSwap!",
    ),
    (
        &["learn", "learning"],
        "Want to learn something new? 😎 Go to the 'All' section and filter by 'Learn' to find skills!",
    ),
    (
        &["teach", "teaching"],
        "Ready to share your skills? 🙌 Check the 'All' section and filter by 'Teach' to get started.",
    ),
    (
        &["profile"],
        "Your profile shows your skills, badges, and progress. 💪 Keep it updated to shine!",
    ),
    (
        &["points", "score"],
        "Earn points by learning, teaching, or completing activities. 🎯 More points = higher leaderboard rank!",
    ),
    (
        &["badges", "achievement"],
        "Earn badges 🏅 by completing learning goals or teaching sessions. Show them off in your profile!",
    ),
    (
        &["mentor", "help"],
        "Need a mentor? 🤓 Connect with them through the 'All' section or check their profile!",
    ),
    (
        &["chat", "skillbot"],
        "You can ask me anything about SkillSwap! 😄 From learning tips to rewards, I got you!",
    ),
    (
        &["message"],
        "Go to the chat section 💬 to message your mentor or peers directly!",
    ),
    (
        &["events", "workshops"],
        "Exciting workshops coming soon! 📅 Check the homepage to join events.",
    ),
    (
        &["join"],
        "Head to the Events page 📅 to join upcoming workshops and learning sessions!",
    ),
    (
        &["all"],
        "Use the 'All' section to filter by Learn or Teach 🎯 to find exactly what you need.",
    ),
    (
        &["skills", "projects"],
        "You can view all your projects and skills in the 'My Skills' section. 🚀 Keep building!",
    ),
    (
        &["notifications"],
        "Check your notifications 🔔 to stay updated on new messages, projects, or events!",
    ),
    (
        &["faq"],
        "Check the FAQ section 📚 on the homepage for quick answers to common questions.",
    ),
    (
        &["feedback"],
        "Share your thoughts! 💌 Leave feedback for mentors or learners after sessions.",
    ),
    (
        &["contact"],
        "Need help? 💬 Reach out through the Contact page or just ask me, SkillBot!",
    ),
    (
        &["signup", "register"],
        "Ready to join? 📝 Head to Sign Up and start your SkillSwap journey!",
    ),
    (
        &["login", "signin"],
        "Already have an account? 🔑 Use the Login page to continue your adventure!",
    ),
    (
        &["about", "team"],
        "SkillSwap is where students teach & learn from each other! 🤝 Learn, teach, and grow together!",
    ),
    (
        &["default"],
        "Hmm 🤔 I didn't get that. Try asking differently or use keywords like 'Learn', 'Teach', or 'Projects'.",
    ),
];

/// First-matching-keyword reply table.
#[derive(Debug, Clone)]
pub struct ReplyEngine {
    rules: Vec<ReplyRule>,
    fallback: String,
}

impl Default for ReplyEngine {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(keywords, reply)| ReplyRule::new(keywords.iter(), *reply))
            .collect();
        Self::new(rules, FALLBACK_REPLY)
    }
}

impl ReplyEngine {
    /// Engine with a custom rule table, scanned in order.
    pub fn new(rules: Vec<ReplyRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Reply to free text: the first rule with a keyword contained in the
    /// lowercased, trimmed input wins.
    pub fn reply(&self, input: &str) -> &str {
        let normalized = input.trim().to_lowercase();
        self.rules
            .iter()
            .find(|r| r.fires(&normalized))
            .map(|r| r.reply.as_str())
            .unwrap_or(&self.fallback)
    }

    pub fn rules(&self) -> &[ReplyRule] {
        &self.rules
    }
}

/// Assistant transcript for one widget session.
#[derive(Debug, Clone, Default)]
pub struct ChatBot {
    engine: ReplyEngine,
    turns: Vec<ChatBotTurn>,
}

impl ChatBot {
    pub fn new(engine: ReplyEngine) -> Self {
        Self {
            engine,
            turns: Vec::new(),
        }
    }

    /// Record a user turn and the bot's reply. Blank input is ignored.
    pub fn send(&mut self, input: &str) -> Option<&str> {
        if input.trim().is_empty() {
            return None;
        }
        let reply = self.engine.reply(input).to_owned();
        self.turns.push(ChatBotTurn::user(input));
        self.turns.push(ChatBotTurn::bot(reply));
        self.turns.last().map(|t| t.content.as_str())
    }

    pub fn turns(&self) -> &[ChatBotTurn] {
        &self.turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
