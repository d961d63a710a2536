use std::path::PathBuf;

use admin_core::payloads::UserQuery;
use admin_core::{
    describe, Action, AdminClient, AdminService, ApiError, CreationWorkflow, EditSession,
    FileTokenStore, ImageFile, MarketplaceApi, MarketplacePreview, Pagination, StoredToken,
    TokenStore, UreqTransport, UserStatus, UserType, UsersApi, WorkflowError, DEFAULT_PAGE_SIZE,
};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod manifest;
mod render;

type Service = AdminService<UreqTransport, FileTokenStore>;

#[derive(Debug, Parser)]
#[command(name = "marketplace-admin", version, about = "Admin console for the creator/hotel marketplace")]
struct Cli {
    /// Base URL of the admin API
    #[arg(long, env = "MARKETPLACE_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Where the access token is stored
    #[arg(long, env = "MARKETPLACE_TOKEN_FILE", default_value = ".marketplace-admin/token.json")]
    token_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store an access token for later commands
    Login {
        #[arg(long)]
        token: String,
        /// Token lifetime in seconds
        #[arg(long, default_value_t = 86_400)]
        expires_in: u64,
    },
    /// Forget the stored token
    Logout,
    #[command(subcommand)]
    Users(UsersCommand),
    #[command(subcommand)]
    Profile(ProfileCommand),
    #[command(subcommand)]
    Listings(ListingsCommand),
    #[command(subcommand)]
    Marketplace(MarketplaceCommand),
}

#[derive(Debug, Subcommand)]
enum UsersCommand {
    /// List users, newest first
    List(ListArgs),
    /// Show a user with its profile and listings
    Show { id: Uuid },
    /// Create a user from a JSON manifest
    Create { manifest: PathBuf },
    /// Change account fields; unchanged values are not sent
    Update(UpdateArgs),
    /// Delete a user and everything it owns
    Delete {
        id: Uuid,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Args)]
struct ListArgs {
    #[arg(long = "type", value_parser = wire_value::<UserType>)]
    user_type: Option<UserType>,
    #[arg(long, value_parser = wire_value::<UserStatus>)]
    status: Option<UserStatus>,
    /// Matches name or email
    #[arg(long)]
    search: Option<String>,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    id: Uuid,
    #[arg(long, value_parser = wire_value::<UserStatus>)]
    status: Option<UserStatus>,
    #[arg(long)]
    email_verified: Option<bool>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Subcommand)]
enum ProfileCommand {
    /// Upload a new profile picture for a creator or hotel
    Picture { id: Uuid, path: PathBuf },
}

#[derive(Debug, Subcommand)]
enum ListingsCommand {
    /// Add and remove listing images
    Images {
        user: Uuid,
        listing: Uuid,
        #[arg(long = "add", num_args = 1..)]
        add: Vec<PathBuf>,
        #[arg(long = "remove", num_args = 1..)]
        remove: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
enum MarketplaceCommand {
    /// Listings as creators see them
    Listings,
    /// Creators as hotels see them
    Creators,
    /// Both lists; one failing does not hide the other
    Preview,
}

/// Parse a lowercase wire name such as `hotel` or `verified`.
fn wire_value<T: DeserializeOwned>(s: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(s.to_ascii_lowercase()))
        .map_err(|_| format!("unknown value: {s}"))
}

/// Turn an API failure into the operator-facing message. A rejected token is
/// removed so the next command asks for a fresh login.
fn api_error(api: &Service, action: Action) -> impl Fn(ApiError) -> anyhow::Error + '_ {
    move |err| {
        tracing::debug!(error = %err, "admin api call failed");
        if err.requires_logout() {
            api.tokens().clear();
        }
        anyhow!(describe(&err, action))
    }
}

fn workflow_error(api: &Service, action: Action) -> impl Fn(WorkflowError) -> anyhow::Error + '_ {
    move |err| match err {
        WorkflowError::Api(err) => api_error(api, action)(err),
        WorkflowError::Draft(err) => anyhow!(err),
    }
}

fn list(api: &Service, args: ListArgs) -> Result<()> {
    let query = UserQuery {
        user_type: args.user_type,
        status: args.status,
        search: args.search,
        page: Some(args.page),
        page_size: Some(args.page_size),
    };
    let page = api
        .list_users(&query)
        .map_err(api_error(api, Action::ListUsers))?;
    let pagination = Pagination::new(args.page, args.page_size, page.total);
    render::users(&page.users, &pagination);
    Ok(())
}

fn create(api: &Service, path: PathBuf) -> Result<()> {
    let draft = manifest::load(&path)?;
    let report = CreationWorkflow::new(api)
        .run(&draft)
        .map_err(workflow_error(api, Action::CreateUser))?;
    render::creation(&report);
    Ok(())
}

fn update(api: &Service, args: UpdateArgs) -> Result<()> {
    let mut session = EditSession::load(api, args.id).map_err(api_error(api, Action::LoadUser))?;
    let mut buffer = session.account_buffer();
    if let Some(status) = args.status {
        buffer.status = status;
    }
    if let Some(verified) = args.email_verified {
        buffer.email_verified = verified;
    }
    if let Some(email) = args.email {
        buffer.email = email;
    }
    if let Some(name) = args.name {
        buffer.name = name;
    }
    let saved = session
        .save_account(&buffer)
        .map_err(api_error(api, Action::UpdateUser))?;
    if saved {
        let user = session.snapshot();
        println!(
            "User updated: {} <{}>, {}, email verified: {}",
            user.name,
            user.email,
            user.status.as_str(),
            if user.email_verified { "yes" } else { "no" }
        );
    } else {
        println!("No changes");
    }
    Ok(())
}

fn delete(api: &Service, id: Uuid, yes: bool) -> Result<()> {
    if !yes {
        bail!("Deleting a user also removes its profile, listings and images. Re-run with --yes to confirm.");
    }
    let deleted = api
        .delete_user(id)
        .map_err(api_error(api, Action::DeleteUser))?;
    println!("{}", deleted.message);
    println!("{}", render::user_row(&deleted.deleted_user));
    Ok(())
}

fn replace_picture(api: &Service, id: Uuid, path: PathBuf) -> Result<()> {
    let file = ImageFile::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let mut session = EditSession::load(api, id).map_err(api_error(api, Action::LoadUser))?;
    let url = session
        .replace_profile_picture(&file)
        .map_err(api_error(api, Action::UploadImage))?;
    println!("Profile picture updated: {url}");
    Ok(())
}

fn edit_images(
    api: &Service,
    user: Uuid,
    listing: Uuid,
    add: Vec<PathBuf>,
    remove: Vec<String>,
) -> Result<()> {
    let mut session = EditSession::load(api, user).map_err(api_error(api, Action::LoadUser))?;
    let mut buffer = session
        .listing_buffer(listing)
        .ok_or_else(|| anyhow!("Listing {listing} not found for user {user}"))?;

    for url in &remove {
        if !buffer.images.remove(url) {
            tracing::warn!(%url, "image is not on this listing");
        }
    }
    for path in &add {
        let file = ImageFile::read(path).with_context(|| format!("reading {}", path.display()))?;
        buffer
            .images
            .add(file)
            .map_err(api_error(api, Action::UploadImage))?;
    }

    let saved = session
        .save_listing(&buffer)
        .map_err(api_error(api, Action::SaveListing))?;
    if !saved {
        println!("No changes");
        return Ok(());
    }
    if let Some(updated) = session.snapshot().listing(listing) {
        println!("Listing images ({})", updated.images.len());
        for url in &updated.images {
            println!("  {url}");
        }
    }
    Ok(())
}

fn marketplace(api: &Service, command: MarketplaceCommand) -> Result<()> {
    match command {
        MarketplaceCommand::Listings => {
            let listings = api
                .marketplace_listings()
                .map_err(api_error(api, Action::LoadMarketplace))?;
            render::marketplace_listings(&listings);
        }
        MarketplaceCommand::Creators => {
            let creators = api
                .marketplace_creators()
                .map_err(api_error(api, Action::LoadMarketplace))?;
            render::marketplace_creators(&creators);
        }
        MarketplaceCommand::Preview => {
            let preview = MarketplacePreview::load(api);
            match &preview.listings {
                Ok(listings) => render::marketplace_listings(listings),
                Err(err) => eprintln!("{}", describe(err, Action::LoadMarketplace)),
            }
            println!();
            match &preview.creators {
                Ok(creators) => render::marketplace_creators(creators),
                Err(err) => eprintln!("{}", describe(err, Action::LoadMarketplace)),
            }
            if let Some(err) = preview.error() {
                if err.requires_logout() {
                    api.tokens().clear();
                }
                bail!("Marketplace preview is incomplete");
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let tokens = FileTokenStore::new(&cli.token_file);

    match &cli.command {
        Command::Login { token, expires_in } => {
            tokens
                .save(&StoredToken::expiring_in(token, *expires_in))
                .with_context(|| format!("writing {}", cli.token_file.display()))?;
            println!("Token saved to {}", cli.token_file.display());
            return Ok(());
        }
        Command::Logout => {
            tokens.clear();
            println!("Logged out");
            return Ok(());
        }
        _ => {}
    }

    let api = AdminService::new(AdminClient::new(&cli.api_url), UreqTransport::new(), tokens);
    if api.tokens().access_token().is_none() {
        bail!("Not logged in. Run `marketplace-admin login --token <TOKEN>` first.");
    }

    match cli.command {
        Command::Users(UsersCommand::List(args)) => list(&api, args),
        Command::Users(UsersCommand::Show { id }) => {
            let user = api.get_user(id).map_err(api_error(&api, Action::LoadUser))?;
            render::detail(&user);
            Ok(())
        }
        Command::Users(UsersCommand::Create { manifest }) => create(&api, manifest),
        Command::Users(UsersCommand::Update(args)) => update(&api, args),
        Command::Users(UsersCommand::Delete { id, yes }) => delete(&api, id, yes),
        Command::Profile(ProfileCommand::Picture { id, path }) => replace_picture(&api, id, path),
        Command::Listings(ListingsCommand::Images {
            user,
            listing,
            add,
            remove,
        }) => edit_images(&api, user, listing, add, remove),
        Command::Marketplace(command) => marketplace(&api, command),
        Command::Login { .. } | Command::Logout => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_arguments_parse_wire_names() {
        let cli = Cli::try_parse_from([
            "marketplace-admin",
            "users",
            "list",
            "--type",
            "hotel",
            "--status",
            "Verified",
            "--page",
            "2",
        ])
        .unwrap();
        let Command::Users(UsersCommand::List(args)) = cli.command else {
            panic!("expected users list");
        };
        assert_eq!(args.user_type, Some(UserType::Hotel));
        assert_eq!(args.status, Some(UserStatus::Verified));
        assert_eq!(args.page, 2);
        assert_eq!(args.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result = Cli::try_parse_from(["marketplace-admin", "users", "list", "--status", "banned"]);
        assert!(result.is_err());
    }

    #[test]
    fn marketplace_subcommands_parse() {
        let cli = Cli::try_parse_from(["marketplace-admin", "marketplace", "creators"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Marketplace(MarketplaceCommand::Creators)
        ));
        assert!(Cli::try_parse_from(["marketplace-admin", "marketplace", "hotels"]).is_err());
    }

    #[test]
    fn image_edit_takes_multiple_paths() {
        let cli = Cli::try_parse_from([
            "marketplace-admin",
            "listings",
            "images",
            "00000000-0000-0000-0000-000000000001",
            "00000000-0000-0000-0000-000000000002",
            "--add",
            "a.jpg",
            "b.jpg",
            "--remove",
            "https://cdn/x.jpg",
        ])
        .unwrap();
        let Command::Listings(ListingsCommand::Images { add, remove, .. }) = cli.command else {
            panic!("expected listings images");
        };
        assert_eq!(add.len(), 2);
        assert_eq!(remove, vec!["https://cdn/x.jpg".to_string()]);
    }
}
