//! Listing commands.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use colored::Colorize;
use rust_i18n::t;
use skillswap::{ListingFilter, ListingUpdate, NewListing, SkillStatus, StatusFilter};

use crate::config::{build_authed_client, build_client, Backend};
use crate::handlers::listing as handlers;
use crate::output::{print_item, print_table, OutputFormat};

/// Listing status argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Teach,
    Learn,
}

impl From<StatusArg> for SkillStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Teach => SkillStatus::Teach,
            StatusArg::Learn => SkillStatus::Learn,
        }
    }
}

/// Browse filter arguments.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Only listings with this status
    #[arg(short, long)]
    pub status: Option<StatusArg>,
    /// Exact skill name, case-insensitive
    #[arg(long)]
    pub skill: Option<String>,
    /// Author name prefix, case-insensitive
    #[arg(short, long)]
    pub author: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> ListingFilter {
        let mut filter = ListingFilter::new();
        if let Some(status) = self.status {
            filter = filter.status(StatusFilter::from(SkillStatus::from(status)));
        }
        if let Some(skill) = &self.skill {
            filter = filter.skill(skill);
        }
        if let Some(author) = &self.author {
            filter = filter.author(author);
        }
        filter
    }
}

#[derive(Subcommand)]
pub enum ListingAction {
    /// Browse listings, best-rated teachers first
    #[command(alias = "ls")]
    Browse {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Listings complementing your own
    Matches {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Top rated teachers
    #[command(alias = "top")]
    Leaderboard {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show one listing
    Show {
        /// Listing ID
        id: String,
    },

    /// Add a listing
    Add {
        /// Teach or Learn
        status: StatusArg,
        /// Skill name
        skill: String,
        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Tags
        #[arg(short, long)]
        tag: Vec<String>,
    },

    /// Edit one of your listings
    Edit {
        /// Listing ID
        id: String,
        /// New status
        #[arg(short, long)]
        status: Option<StatusArg>,
        /// New skill name
        #[arg(long)]
        skill: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// Replace tags
        #[arg(short, long)]
        tag: Option<Vec<String>>,
    },

    /// Your own listings
    Mine,
}

pub async fn handle(action: ListingAction, format: OutputFormat, backend: &Backend) -> Result<()> {
    match action {
        ListingAction::Browse { filter } => browse(&filter, format, backend).await,
        ListingAction::Matches { filter } => matches(&filter, format, backend).await,
        ListingAction::Leaderboard { filter } => leaderboard(&filter, format, backend).await,
        ListingAction::Show { id } => show(&id, format, backend).await,
        ListingAction::Add {
            status,
            skill,
            description,
            tag,
        } => {
            let mut listing = NewListing::new(status.into(), skill).description(description);
            for t in tag {
                listing = listing.tag(t);
            }
            add(listing, backend).await
        }
        ListingAction::Edit {
            id,
            status,
            skill,
            description,
            tag,
        } => {
            let update = ListingUpdate {
                status: status.map(Into::into),
                skill_name: skill,
                description,
                tags: tag,
            };
            edit(&id, update, format, backend).await
        }
        ListingAction::Mine => mine(format, backend).await,
    }
}

fn print_filters(filters: &[String]) {
    if !filters.is_empty() {
        println!("{}\n", t!("active_filters", filters = filters.join(", ")).dimmed());
    }
}

async fn browse(filter: &FilterArgs, format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_client(backend)?;
    let result = handlers::browse(&client, &filter.to_filter()).await?;

    if format.is_plain() {
        print_filters(&result.filters);
        println!("{}\n", t!("listing_count", count = result.listings.len()));
    }

    print_table(result.listings, format);

    if format.is_plain() && !result.matches.is_empty() {
        println!("\n{}\n", t!("matches_header").bold());
        print_table(result.matches, format);
    }
    Ok(())
}

async fn matches(filter: &FilterArgs, format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_authed_client(backend)?;
    let result = handlers::browse(&client, &filter.to_filter()).await?;

    if format.is_plain() {
        print_filters(&result.filters);
        println!("{}\n", t!("matches_header").bold());
    }

    print_table(result.matches, format);
    Ok(())
}

async fn leaderboard(filter: &FilterArgs, format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_client(backend)?;
    let entries = handlers::leaderboard(&client, &filter.to_filter()).await?;

    if format.is_plain() {
        println!("{}\n", t!("leaderboard_header").bold());
    }

    print_table(entries, format);
    Ok(())
}

async fn show(id: &str, format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_client(backend)?;
    let detail = handlers::show(&client, id).await?;
    print_item(&detail, format);
    Ok(())
}

async fn add(listing: NewListing, backend: &Backend) -> Result<()> {
    let client = build_authed_client(backend)?;
    let id = handlers::add(&client, listing).await?;
    println!("{}", t!("listing_added", id = id.cyan()));
    Ok(())
}

async fn edit(id: &str, update: ListingUpdate, format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_authed_client(backend)?;
    let listing = handlers::edit(&client, id, update).await?;
    if format.is_plain() {
        println!("{}", t!("listing_updated", id = id.cyan()));
    }
    print_item(&listing, format);
    Ok(())
}

async fn mine(format: OutputFormat, backend: &Backend) -> Result<()> {
    let client = build_authed_client(backend)?;
    let listings = handlers::mine(&client).await?;
    print_table(listings, format);
    Ok(())
}
