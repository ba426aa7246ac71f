//! Assistant command.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rust_i18n::t;
use skillswap::ChatBot;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::handlers::bot as handlers;
use crate::output::{print_table, print_value, OutputFormat};

/// Delay between revealed characters of a reply.
pub const TYPEWRITER_DELAY: Duration = Duration::from_millis(30);

#[derive(Debug, Args)]
pub struct BotArgs {
    /// Question to ask; starts an interactive session when omitted
    pub message: Vec<String>,

    /// List the keyword rules instead
    #[arg(long)]
    pub rules: bool,

    /// Print replies at once
    #[arg(long)]
    pub no_animation: bool,
}

pub async fn handle(args: BotArgs, format: OutputFormat) -> Result<()> {
    if args.rules {
        print_table(handlers::rules(), format);
        return Ok(());
    }

    let animate = format.is_plain() && !args.no_animation;
    let mut bot = ChatBot::default();

    if !args.message.is_empty() {
        let input = args.message.join(" ");
        return answer(&mut bot, &input, format, animate).await;
    }

    println!("{}", t!("bot_greeting").dimmed());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".cyan());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }
        answer(&mut bot, &line, format, animate).await?;
    }
    Ok(())
}

async fn answer(bot: &mut ChatBot, input: &str, format: OutputFormat, animate: bool) -> Result<()> {
    let Some(reply) = handlers::reply(bot, input) else {
        return Ok(());
    };

    if !format.is_plain() {
        print_value(&reply, format);
    } else if animate {
        typewrite(&reply.reply).await?;
    } else {
        println!("{}", reply.reply);
    }
    Ok(())
}

/// Reveal `text` one character at a time.
async fn typewrite(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    let mut interval = tokio::time::interval(TYPEWRITER_DELAY);
    for ch in text.chars() {
        interval.tick().await;
        write!(stdout, "{}", ch)?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}
