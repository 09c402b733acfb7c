use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use tap_sdk::{CheckInRequest, Photo, SeedData, Taproom, TaproomConfig};
use tap_types::format_elapsed;

use crate::cli::*;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let json = cli.format == OutputFormat::Json;
    match cli.command {
        Command::Seed(args) => cmd_seed(args, json),
        Command::Pubs(args) => cmd_pubs(args, config, json).await,
        Command::CheckIn(args) => cmd_check_in(args, config, json).await,
        Command::Missions(args) => cmd_missions(args, config, json).await,
        Command::Config => cmd_config(&config),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<TaproomConfig> {
    match path {
        Some(path) => Ok(TaproomConfig::load(path)?),
        None => Ok(TaproomConfig::default()),
    }
}

fn open(seed: &Path, config: TaproomConfig) -> anyhow::Result<Taproom> {
    let seed = SeedData::load(seed)?;
    Ok(Taproom::in_memory(config, seed)?)
}

fn cmd_seed(args: SeedArgs, json: bool) -> anyhow::Result<()> {
    let seed = SeedData::load(&args.path)?;
    if json {
        let summary = serde_json::json!({
            "pubs": seed.pubs.len(),
            "badges": seed.badges.len(),
            "missions": seed.missions.len(),
        });
        println!("{summary}");
        return Ok(());
    }
    println!("{} Seed {} is valid", "✓".green().bold(), args.path.display());
    println!("  Pubs:     {}", seed.pubs.len().to_string().bold());
    println!("  Badges:   {}", seed.badges.len().to_string().bold());
    println!("  Missions: {}", seed.missions.len().to_string().bold());
    Ok(())
}

async fn cmd_pubs(args: PubsArgs, config: TaproomConfig, json: bool) -> anyhow::Result<()> {
    let taproom = open(&args.seed, config)?;
    taproom.pubs().load_once().await?;
    let pubs = taproom.pubs().snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&pubs)?);
        return Ok(());
    }
    for p in &pubs {
        let points = if p.points > 0 {
            p.points
        } else {
            taproom.config().points_per_check_in
        };
        println!("{}  {}  ({} pts)", p.id.yellow(), p.name.bold(), points);
        if !p.address.is_empty() {
            println!("    {}", p.address.dimmed());
        }
    }
    Ok(())
}

async fn cmd_check_in(args: CheckInArgs, config: TaproomConfig, json: bool) -> anyhow::Result<()> {
    let taproom = open(&args.seed, config)?;
    let photo = match &args.photo {
        Some(path) => Some(Photo::jpeg(std::fs::read(path)?)),
        None => None,
    };
    let check_in = taproom
        .check_in(CheckInRequest {
            pub_id: args.pub_id,
            user_id: args.user.clone(),
            photo,
        })
        .await?;
    let tracked = taproom.tracked_urls()?;
    let total = taproom.points_for(&args.user);
    taproom.shutdown()?;

    if json {
        let out = serde_json::json!({
            "check_in": check_in,
            "tracked_urls": tracked,
            "total_points": total,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    println!(
        "{} Checked into {} {}",
        "✓".green().bold(),
        check_in.pub_id.yellow(),
        format_elapsed(check_in.created_at, Utc::now()).dimmed()
    );
    println!("  Check-in: {}", check_in.id.cyan());
    println!("  Points:   +{} (total {})", check_in.points_awarded, total);
    if let Some(url) = &check_in.image_url {
        println!("  Photo:    {}", url.blue());
    }
    println!("  Tracked photo URLs: {tracked}");
    Ok(())
}

async fn cmd_missions(args: MissionsArgs, config: TaproomConfig, json: bool) -> anyhow::Result<()> {
    let taproom = open(&args.seed, config)?;
    let mut seen = HashSet::new();
    for pub_id in args.visits.iter().filter(|p| seen.insert(p.as_str())) {
        taproom
            .check_in(CheckInRequest {
                pub_id: pub_id.clone(),
                user_id: args.user.clone(),
                photo: None,
            })
            .await?;
    }
    let progress = taproom.mission_progress(&args.user).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&progress)?);
        return Ok(());
    }
    if progress.is_empty() {
        println!("No missions.");
        return Ok(());
    }
    for m in &progress {
        let mark = if m.complete { "✓".green().bold() } else { "·".dimmed() };
        println!(
            "{} {}  {}/{}  {}%",
            mark,
            m.name.bold(),
            m.visited,
            m.total,
            m.percent.to_string().cyan()
        );
    }
    Ok(())
}

fn cmd_config(config: &TaproomConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
