//! Assistant handlers.

use colored::Colorize;
use serde::Serialize;
use skillswap::{ChatBot, ReplyEngine};

use crate::output::{PlainPrint, TableRow};

/// One question and answer.
#[derive(Debug, Clone, Serialize)]
pub struct BotReply {
    pub input: String,
    pub reply: String,
}

/// A keyword rule of the reply table.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub keywords: Vec<String>,
    pub reply: String,
}

impl TableRow for RuleInfo {
    fn headers() -> Vec<&'static str> {
        vec!["Keywords", "Reply"]
    }
    fn row(&self) -> Vec<String> {
        vec![self.keywords.join(", "), self.reply.clone()]
    }
}

impl PlainPrint for RuleInfo {
    fn plain_print(&self) {
        println!("{}", self.keywords.join(", ").cyan());
        println!("   {}", self.reply);
    }
}

/// Answer one message. Blank input gets no reply.
pub fn reply(bot: &mut ChatBot, input: &str) -> Option<BotReply> {
    bot.send(input).map(|reply| BotReply {
        input: input.to_string(),
        reply: reply.to_string(),
    })
}

/// The default rule table, in priority order.
pub fn rules() -> Vec<RuleInfo> {
    ReplyEngine::default()
        .rules()
        .iter()
        .map(|r| RuleInfo {
            keywords: r.keywords.clone(),
            reply: r.reply.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply() {
        let mut bot = ChatBot::default();
        let answer = reply(&mut bot, "how do I sign up? register?").unwrap();
        assert!(answer.reply.contains("Sign Up"));
        assert!(reply(&mut bot, "  ").is_none());
        assert_eq!(bot.turns().len(), 2);
    }

    #[test]
    fn test_rules_in_order() {
        let rules = rules();
        assert_eq!(rules.first().map(|r| r.keywords[0].as_str()), Some("hello"));
        assert_eq!(rules.last().map(|r| r.keywords[0].as_str()), Some("default"));
    }
}
