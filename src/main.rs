use anyhow::{bail, Context};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mycam_core::constants::{SETTINGS_DIR_ENV, USERS_ROOT_ENV};
use mycam_core::{
    AdminConfig, AdminReport, ApprovalFilter, Listing, Platform, RootSearch, StorageStats,
    UploadRepository,
};
use mycam_types::MobileNumber;

#[derive(Parser)]
#[command(name = "mycam-admin")]
#[command(about = "Review and manage MyCam uploads")]
struct Cli {
    /// Use this data root for this run only
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current data root
    Root,
    /// Switch to and save a new data root
    SetRoot {
        /// Directory containing users/
        path: PathBuf,
    },
    /// List users
    Users {
        /// Only users whose mobile number contains this text
        #[arg(long)]
        query: Option<String>,
    },
    /// List a user's uploads, newest first
    Uploads {
        /// Ten-digit mobile number
        mobile: MobileNumber,
        #[arg(long, conflicts_with = "unapproved")]
        approved: bool,
        #[arg(long)]
        unapproved: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show details of one file
    Info {
        path: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Flip the approval flag of a file
    Toggle { path: PathBuf },
    /// List approved files
    Approved,
    /// List files that were approved and then unapproved
    Unapproved,
    /// Move a user's directory to trash/
    Delete { mobile: MobileNumber },
    /// Copy all of a user's uploads out of the data root
    Export {
        mobile: MobileNumber,
        /// Destination directory (default: ~/PhotoExports/user_<mobile>_<ts>)
        #[arg(long)]
        dest: Option<PathBuf>,
    },
    /// Copy one file out of the data root
    Download {
        path: PathBuf,
        /// Destination directory (default: ~/Downloads)
        #[arg(long)]
        dest: Option<PathBuf>,
    },
    /// Show storage usage
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Write a usage report
    Report {
        /// Output directory (default: ~/AdminReports)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Entry point for the MyCam admin tool
///
/// # Environment Variables
/// - `MYCAM_USERS_ROOT`: candidate data root, used when no root has been saved
/// - `MYCAM_SETTINGS_DIR`: settings directory (default: "~/.admin_mycam")
/// - `RUST_LOG`: log filter (default: "mycam=info")
///
/// On Windows `LOCALAPPDATA`/`APPDATA` and on Android `EXTERNAL_STORAGE` are also consulted
/// when searching for a data root.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("mycam=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'mycam-admin --help' for commands");
        return Ok(());
    };

    let mut cfg = load_config()?;
    if let Some(root) = cli.root {
        cfg = cfg.with_root(root);
    }
    let mut repo = UploadRepository::open(cfg).context("failed to open repository")?;

    run(&mut repo, command)
}

fn load_config() -> anyhow::Result<AdminConfig> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let env_path = |key: &str| {
        std::env::var_os(key)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    };

    let search = RootSearch::new(Platform::current(), home.clone())
        .with_override_root(env_path(USERS_ROOT_ENV))
        .with_app_data(env_path("LOCALAPPDATA"), env_path("APPDATA"))
        .with_external_storage(env_path("EXTERNAL_STORAGE"));
    let settings_dir =
        env_path(SETTINGS_DIR_ENV).unwrap_or_else(|| AdminConfig::default_settings_dir(&home));

    tracing::debug!("settings directory: {}", settings_dir.display());
    Ok(AdminConfig::new(settings_dir, search))
}

fn run(repo: &mut UploadRepository, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Root => println!("{}", repo.root().display()),
        Commands::SetRoot { path } => {
            if !repo.set_root(&path) {
                bail!(
                    "{} is not a data root (needs users/ with mobile-numbered entries)",
                    path.display()
                );
            }
            println!("Data root set to {}", repo.root().display());
        }
        Commands::Users { query } => {
            let users = match query {
                Some(q) => repo.search_users(&q),
                None => repo.list_users(),
            };
            report_issues(&users);
            if users.is_empty() {
                println!("No users found.");
            }
            for mobile in &users {
                println!("{mobile}");
            }
        }
        Commands::Uploads {
            mobile,
            approved,
            unapproved,
            json,
        } => {
            let filter = if approved {
                ApprovalFilter::Approved
            } else if unapproved {
                ApprovalFilter::Unapproved
            } else {
                ApprovalFilter::All
            };
            let uploads = repo.list_uploads_filtered(&mobile, filter);
            report_issues(&uploads);
            if json {
                println!("{}", serde_json::to_string_pretty(&uploads.items)?);
            } else if uploads.is_empty() {
                println!("No uploads for {mobile}.");
            } else {
                for upload in &uploads {
                    let when: DateTime<Local> = upload.created_at_utc().into();
                    println!(
                        "{}  {:<5}  {}  {}",
                        if repo.is_approved(upload.path()) { "[x]" } else { "[ ]" },
                        upload.media_type(),
                        when.format("%Y-%m-%d %H:%M:%S"),
                        upload.path().display()
                    );
                }
            }
        }
        Commands::Info { path, json } => {
            let details = repo.upload_details(&path);
            if json {
                println!("{}", serde_json::to_string_pretty(&details)?);
            } else {
                println!("Name:     {}", details.file.file_name);
                println!("Size:     {}", details.file.size_display());
                println!("Modified: {}", details.file.modified_display());
                println!(
                    "User:     {}",
                    details
                        .user
                        .as_ref()
                        .map_or_else(|| "unknown".to_owned(), ToString::to_string)
                );
                println!("Approved: {}", if details.approved { "yes" } else { "no" });
                if let Some(mime) = &details.file.detected_mime {
                    println!("Type:     {mime}");
                }
            }
        }
        Commands::Toggle { path } => {
            let approved = repo.toggle_approval(&path)?;
            println!(
                "{} {}",
                if approved { "Approved" } else { "Unapproved" },
                path.display()
            );
        }
        Commands::Approved => print_paths(&repo.approved_files(), "No approved files."),
        Commands::Unapproved => print_paths(&repo.unapproved_files(), "No unapproved files."),
        Commands::Delete { mobile } => {
            if !repo.delete_user(&mobile) {
                bail!("could not archive user {mobile}");
            }
            println!("Moved {mobile} to {}", repo.trash_dir().display());
        }
        Commands::Export { mobile, dest } => {
            let summary = repo.export_user_uploads(&mobile, dest.as_deref())?;
            println!(
                "Exported {} files to {}",
                summary.files.len(),
                summary.directory.display()
            );
        }
        Commands::Download { path, dest } => {
            let copied = repo.download_file(&path, dest.as_deref())?;
            println!("Saved {}", copied.display());
        }
        Commands::Stats { json } => {
            let stats = StorageStats::collect(repo);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Users:   {}", stats.users);
                println!("Images:  {}", stats.images);
                println!("Videos:  {}", stats.videos);
                println!("Storage: {}", stats.total_size_display());
                for (mobile, bytes) in &stats.bytes_per_user {
                    println!("  {mobile}  {}", mycam_files::format_size(*bytes));
                }
            }
        }
        Commands::Report { dir } => {
            let report = AdminReport::new(repo);
            let dir = dir.unwrap_or_else(|| AdminReport::default_dir(repo.config().home_dir()));
            let path = report.write_to(&dir)?;
            print!("{}", report.render());
            println!("Report saved to {}", path.display());
        }
    }

    Ok(())
}

fn report_issues<T>(listing: &Listing<T>) {
    for issue in &listing.issues {
        eprintln!("warning: skipped {issue}");
    }
}

fn print_paths(paths: &[PathBuf], empty: &str) {
    if paths.is_empty() {
        println!("{empty}");
    }
    for path in paths {
        println!("{}", path.display());
    }
}
