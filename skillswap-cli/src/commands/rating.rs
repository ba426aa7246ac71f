//! Rating commands.

use anyhow::Result;
use clap::Subcommand;
use rust_i18n::t;

use crate::config::{build_authed_client, build_client, Backend};
use crate::handlers::rating as handlers;
use crate::output::{print_item, print_table, OutputFormat};

#[derive(Subcommand)]
pub enum RatingAction {
    /// Rate a teacher from 1 to 5 stars
    Give {
        /// Teacher user ID
        teacher: String,
        /// Stars
        #[arg(value_parser = clap::value_parser!(i32).range(1..=5))]
        score: i32,
    },

    /// Show a teacher's rating
    Show {
        /// Teacher user ID
        teacher: String,
    },

    /// Average rating of every rated teacher
    #[command(alias = "ls")]
    List,
}

pub async fn handle(action: RatingAction, format: OutputFormat, backend: &Backend) -> Result<()> {
    match action {
        RatingAction::Give { teacher, score } => give(&teacher, score, format, backend).await,
        RatingAction::Show { teacher } => show(&teacher, format, backend).await,
        RatingAction::List => list(format, backend).await,
    }
}

async fn give(teacher: &str, score: i32, format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_authed_client(backend)?;
    let info = handlers::give(&client, teacher, score).await?;

    if format.is_plain() {
        println!("{}", t!("rating_saved", teacher = teacher, score = score));
    }
    print_item(&info, format);
    Ok(())
}

async fn show(teacher: &str, format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_client(backend)?;
    let info = handlers::show(&client, teacher).await?;

    if format.is_plain() && info.count == 0 {
        println!("{}", t!("not_rated", teacher = teacher));
        return Ok(());
    }
    print_item(&info, format);
    Ok(())
}

async fn list(format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_client(backend)?;
    let rows = handlers::averages(&client).await?;
    print_table(rows, format);
    Ok(())
}
