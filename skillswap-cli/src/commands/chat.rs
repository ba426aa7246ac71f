//! Chat commands.

use std::collections::HashSet;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use rust_i18n::t;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::{build_authed_client, Backend};
use crate::handlers::chat::{self as handlers, MessageInfo};
use crate::output::{print_item, print_table, print_value, OutputFormat};

#[derive(Subcommand)]
pub enum ChatAction {
    /// Show messages exchanged with a user
    #[command(alias = "log")]
    History {
        /// Peer user ID
        peer: String,
    },

    /// Send a message
    Send {
        /// Peer user ID
        peer: String,
        /// Message text
        text: String,
    },

    /// Follow a conversation live; lines typed on stdin are sent
    Watch {
        /// Peer user ID
        peer: String,
        /// Skill the conversation is about
        #[arg(short, long)]
        skill: Option<String>,
    },

    /// Count unread messages from a user
    Unread {
        /// Peer user ID
        peer: String,
    },
}

pub async fn handle(action: ChatAction, format: OutputFormat, backend: &Backend) -> Result<()> {
    match action {
        ChatAction::History { peer } => history(&peer, format, backend).await,
        ChatAction::Send { peer, text } => send(&peer, &text, backend).await,
        ChatAction::Watch { peer, skill } => watch(&peer, skill, format, backend).await,
        ChatAction::Unread { peer } => unread(&peer, format, backend).await,
    }
}

async fn history(peer: &str, format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_authed_client(backend)?;
    let result = handlers::history(&client, peer).await?;

    if format.is_plain() {
        println!("{}\n", t!("conversation_with", user = result.peer.green()));
    }

    print_table(result.messages, format);
    Ok(())
}

async fn send(peer: &str, text: &str, backend: &Backend) -> Result<()> {
    let client = build_authed_client(backend)?;
    let result = handlers::send(&client, peer, text).await?;

    match result.message_id {
        Some(_) => println!("{}", t!("message_sent_to", user = peer)),
        None => println!("{}", t!("empty_message").dimmed()),
    }
    Ok(())
}

async fn unread(peer: &str, format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_authed_client(backend)?;
    let result = handlers::unread(&client, peer).await?;

    if format.is_plain() {
        println!("{}", t!("unread_from", count = result.unread, user = peer));
    } else {
        print_value(&result, format);
    }
    Ok(())
}

async fn watch(
    peer: &str,
    skill: Option<String>,
    format: OutputFormat,
    backend: &Backend,
) -> Result<()> {
    let client = build_authed_client(backend)?;
    let me = client
        .current_uid()
        .context("Authentication required. Run 'skillswap auth login' first.")?;

    let mut session = client.chats().open(peer).await?;
    if let Some(skill) = skill {
        session = session.with_skill(skill);
    }
    println!(
        "{}\n",
        t!("chat_opened", user = peer.green(), id = session.id().as_str()).dimmed()
    );

    let mut seen: HashSet<String> = HashSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            update = session.next() => match update {
                Some(Ok(messages)) => {
                    // Each delivery is the whole conversation; print what is new.
                    for message in messages.iter().filter(|m| seen.insert(m.id.clone())) {
                        print_item(&MessageInfo::new(message, &me), format);
                    }
                }
                Some(Err(e)) => tracing::warn!("chat update failed: {}", e),
                None => break,
            },
            line = lines.next_line(), if stdin_open => match line.context("Failed to read stdin")? {
                Some(text) => {
                    if let Err(e) = session.send(&text).await {
                        eprintln!("{}", t!("send_failed", error = e.to_string()).red());
                    }
                }
                None => stdin_open = false,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.close();
    Ok(())
}
