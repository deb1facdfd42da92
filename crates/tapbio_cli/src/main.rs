//! `tapbio` command line studio.
//!
//! # Responsibility
//! - Expose the page editing, preview, sharing and publishing use-cases.
//! - Resolve configuration and start logging before touching storage.
//!
//! Every command runs against the same SQLite file, so successive
//! invocations behave like one editing session.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{info, warn};
use std::path::PathBuf;
use tapbio_core::db::Connection;
use tapbio_core::render::html::render_html;
use tapbio_core::render::{countdown_days, render_page, RenderContext};
use tapbio_core::share::{self, standalone_redirect_html, token_from_query};
use tapbio_core::{
    init_logging, open_db, read_image_data_url, BlockContent, BlockPatch, BlockType,
    ConfigOverrides, EditorSession, PlatformTarget, ProfilePatch, PublishService, SeoPatch,
    SqliteProfileDirectory, SqliteSnapshotRepository, StudioConfig, ThemePatch, ThemePreset,
};

#[derive(Debug, Parser)]
#[command(name = "tapbio", version, about = "Build and preview a bio-link page")]
struct Cli {
    /// Directory holding the studio database (env: TAPBIO_DATA_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error (env: TAPBIO_LOG_LEVEL).
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
    /// Log directory; defaults to `<data-dir>/logs`.
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print profile, blocks and theme.
    Show {
        /// Print the raw snapshot JSON instead.
        #[arg(long)]
        json: bool,
    },
    /// Append a block with kind defaults.
    Add {
        #[arg(value_parser = parse_block_type)]
        kind: BlockType,
    },
    /// Merge a JSON patch into a block, e.g. '{"title":"Shop"}'.
    Update { id: String, patch: String },
    Remove { id: String },
    /// Flip block visibility.
    Toggle { id: String },
    /// Move a block to a zero-based position.
    Move { id: String, index: usize },
    Profile(ProfileArgs),
    /// Merge a JSON theme patch; numbers are clamped to the editor ranges.
    Theme { patch: String },
    /// Switch preset and reset its styling bundle.
    Preset {
        #[arg(value_parser = parse_preset)]
        preset: ThemePreset,
    },
    Seo(SeoArgs),
    /// Render the page to HTML.
    Render(RenderArgs),
    /// Print the public URL carrying the page as a share token.
    Share(ShareArgs),
    /// Replace the page with the state in a share token or share URL.
    Import { token: String },
    /// Publish the page to the hosted directory.
    Publish,
    /// Render the published page at a path such as `/jane-doe`.
    Open {
        path: String,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Discard stored state and restore the sample page.
    Reset,
}

#[derive(Debug, Args)]
struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    bio: Option<String>,
    #[arg(long, value_name = "URL")]
    avatar: Option<String>,
    /// Image file embedded as the avatar.
    #[arg(long, value_name = "FILE", conflicts_with = "avatar")]
    avatar_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct SeoArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Apply schedule windows and platform targeting.
    #[arg(long)]
    public: bool,
    /// Viewer platform for public rendering.
    #[arg(long, value_enum, requires = "public")]
    platform: Option<PlatformArg>,
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ShareArgs {
    /// Where the studio is served (env: TAPBIO_PUBLIC_BASE_URL).
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    /// Also write a self-hosting redirect page.
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlatformArg {
    Ios,
    Android,
}

impl From<PlatformArg> for PlatformTarget {
    fn from(value: PlatformArg) -> Self {
        match value {
            PlatformArg::Ios => PlatformTarget::Ios,
            PlatformArg::Android => PlatformTarget::Android,
        }
    }
}

fn parse_block_type(value: &str) -> Result<BlockType, String> {
    BlockType::parse(value).ok_or_else(|| {
        let known: Vec<&str> = BlockType::ALL.iter().map(|kind| kind.as_str()).collect();
        format!("unknown block type `{value}`; expected one of {}", known.join("|"))
    })
}

fn parse_preset(value: &str) -> Result<ThemePreset, String> {
    ThemePreset::parse(value)
        .ok_or_else(|| format!("unknown preset `{value}`; expected classic|soft|glass"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_url = match &cli.command {
        Command::Share(args) => args.base_url.clone(),
        _ => None,
    };
    let config = StudioConfig::resolve(ConfigOverrides {
        data_dir: cli.data_dir.clone(),
        log_level: cli.log_level.clone(),
        log_dir: cli.log_dir.clone(),
        public_base_url: base_url,
    })?;

    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("failed to create data directory `{}`", config.data_dir.display())
    })?;

    let result = run(cli.command, &config);
    if let Err(err) = &result {
        warn!("event=cli_command module=cli status=error error={err:#}");
    }
    result
}

fn run(command: Command, config: &StudioConfig) -> Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let now = Utc::now();

    if let Command::Publish = command {
        return publish(&conn, now);
    }
    if let Command::Open { path, out } = &command {
        return open_public(&conn, path, out.as_ref(), now);
    }

    let mut session = EditorSession::open(SqliteSnapshotRepository::new(&conn), now)?;

    match command {
        Command::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.snapshot())?);
            } else {
                print_summary(&session);
            }
        }
        Command::Add { kind } => {
            let id = session.add_block(kind)?;
            println!("{id}");
        }
        Command::Update { id, patch } => {
            let patch: BlockPatch =
                serde_json::from_str(&patch).context("patch must be a JSON object")?;
            if !session.update_block(&id, &patch)? {
                bail!("no block with id `{id}`");
            }
        }
        Command::Remove { id } => {
            if !session.remove_block(&id)? {
                bail!("no block with id `{id}`");
            }
        }
        Command::Toggle { id } => match session.toggle_block_visibility(&id)? {
            Some(visible) => println!("{}", if visible { "visible" } else { "hidden" }),
            None => bail!("no block with id `{id}`"),
        },
        Command::Move { id, index } => {
            if !session.move_block(&id, index)? {
                bail!("no block with id `{id}`");
            }
        }
        Command::Profile(args) => {
            let avatar_url = match &args.avatar_file {
                Some(path) => Some(read_image_data_url(path)?),
                None => args.avatar,
            };
            session.set_profile(&ProfilePatch {
                display_name: args.name,
                bio: args.bio,
                avatar_url,
            })?;
        }
        Command::Theme { patch } => {
            let patch: ThemePatch =
                serde_json::from_str(&patch).context("theme patch must be a JSON object")?;
            session.set_theme(&patch.clamped())?;
        }
        Command::Preset { preset } => session.apply_preset(preset)?,
        Command::Seo(args) => {
            session.set_seo(&SeoPatch {
                page_title: args.title,
                meta_description: args.description,
            })?;
            let seo = &session.snapshot().seo;
            if seo.exceeds_guideline() {
                eprintln!(
                    "note: description is {} characters; search results show about 160",
                    seo.description_len()
                );
            }
        }
        Command::Render(args) => {
            let ctx = if args.public {
                RenderContext::public(now, args.platform.map(PlatformTarget::from))
            } else {
                RenderContext::editor(now)
            };
            let snapshot = session.snapshot();
            let html = render_html(&render_page(snapshot, &ctx), &snapshot.seo);
            emit(&html, args.out.as_ref())?;
        }
        Command::Share(args) => {
            let url = share::share_url(&config.public_base_url, session.snapshot())?;
            println!("{url}");
            if let Some(path) = args.html {
                let redirect = standalone_redirect_html(&url);
                std::fs::write(&path, redirect)
                    .with_context(|| format!("failed to write `{}`", path.display()))?;
            }
        }
        Command::Import { token } => {
            let token = token
                .split_once('?')
                .and_then(|(_, query)| token_from_query(query))
                .unwrap_or(token.as_str());
            if !session.import_token(token)? {
                bail!("share token could not be read; page left unchanged");
            }
            info!("event=cli_import module=cli status=ok");
        }
        Command::Reset => session.reset(now)?,
        Command::Publish | Command::Open { .. } => {}
    }
    Ok(())
}

fn publish(conn: &Connection, now: chrono::DateTime<Utc>) -> Result<()> {
    let session = EditorSession::open(SqliteSnapshotRepository::new(conn), now)?;
    let service = PublishService::new(SqliteProfileDirectory::new(conn));
    let slug = service.publish(session.snapshot())?;
    println!("/{slug}");
    Ok(())
}

fn open_public(
    conn: &Connection,
    path: &str,
    out: Option<&PathBuf>,
    now: chrono::DateTime<Utc>,
) -> Result<()> {
    let service = PublishService::new(SqliteProfileDirectory::new(conn));
    let Some(profile) = service.load_public(path)? else {
        bail!("no published profile at `{path}`");
    };
    let snapshot = profile.to_snapshot();
    let html = render_html(
        &render_page(&snapshot, &RenderContext::public(now, None)),
        &snapshot.seo,
    );
    emit(&html, out)
}

fn emit(html: &str, out: Option<&PathBuf>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, html)
            .with_context(|| format!("failed to write `{}`", path.display())),
        None => {
            print!("{html}");
            Ok(())
        }
    }
}

fn print_summary<R: tapbio_core::SnapshotRepository>(session: &EditorSession<R>) {
    let snapshot = session.snapshot();
    let now = Utc::now();
    println!("{} - {}", snapshot.profile.display_name, snapshot.profile.bio);
    println!(
        "theme: {} radius={} shadow={}/{} transparency={}",
        snapshot.theme.preset.as_str(),
        snapshot.theme.border_radius,
        snapshot.theme.shadow_opacity,
        snapshot.theme.shadow_blur,
        snapshot.theme.button_transparency
    );
    println!(
        "seo: {} ({}/160)",
        snapshot.seo.page_title,
        snapshot.seo.description_len()
    );
    for (index, block) in snapshot.blocks.iter().enumerate() {
        let marker = if block.visible { ' ' } else { '-' };
        let detail = match &block.content {
            BlockContent::Link(link) => format!("{} -> {}", link.title, link.url),
            BlockContent::Countdown(countdown) => format!(
                "{} ({} days)",
                countdown.title,
                countdown_days(&countdown.target_date, now)
            ),
            BlockContent::Poll(poll) => {
                format!("{} [{} | {}]", poll.question, poll.option_a, poll.option_b)
            }
            BlockContent::Tip(tip) => format!("{} @{}", tip.service.as_str(), tip.username),
            BlockContent::Image(image) => image.url.clone(),
            BlockContent::Gallery(gallery) => format!("{} images", gallery.images.len()),
            BlockContent::Copy(copy) => format!("{}: {}", copy.label, copy.content),
            BlockContent::Vcard(card) => format!("{} ({})", card.full_name, card.button_label),
        };
        println!(
            "{marker}{index:>2} {:<9} {} {detail}",
            block.kind().as_str(),
            block.id
        );
    }
}
