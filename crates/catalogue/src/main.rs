//! Emporium catalogue command line.
//!
//! Usage:
//!   emporium install-schema
//!   emporium --role admin get product 058e613db53d782adfc9f2ccb43c45fe
//!   emporium list vendor --title-contains city --limit 10
//!   emporium attributes 058e613db53d782adfc9f2ccb43c45fe

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use emporium_catalogue::config::Config;
use emporium_catalogue::db;
use emporium_catalogue::filter::{BoolFilter, FilterList, IdFilter, StringFilter, active_only};
use emporium_catalogue::models::{
    CategoryFilterList, ContentFilterList, EntityKind, ManufacturerFilterList, ProductFilterList,
    ReviewFilterList, VendorFilterList,
};
use emporium_catalogue::permissions::Authorization;
use emporium_catalogue::repository::Page;
use emporium_catalogue::services::{CatalogueEntity, EntityService};
use emporium_catalogue::state::CatalogueState;

/// Query the Emporium catalogue.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Caller role, resolved through the permission registry. Repeatable.
    #[arg(long = "role", global = true)]
    roles: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the catalogue tables.
    InstallSchema,

    /// Fetch one entity by id.
    Get { entity: Entity, id: String },

    /// List entities matching the given filters.
    List {
        entity: Entity,

        #[command(flatten)]
        filters: ListArgs,
    },

    /// Show a product's attribute values.
    Attributes { product: String },

    /// Show the selection lists offered on a product.
    SelectionLists { product: String },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Entity {
    Category,
    Content,
    Manufacturer,
    Product,
    Review,
    Vendor,
}

impl From<Entity> for EntityKind {
    fn from(entity: Entity) -> Self {
        match entity {
            Entity::Category => EntityKind::Category,
            Entity::Content => EntityKind::Content,
            Entity::Manufacturer => EntityKind::Manufacturer,
            Entity::Product => EntityKind::Product,
            Entity::Review => EntityKind::Review,
            Entity::Vendor => EntityKind::Vendor,
        }
    }
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    /// Case-insensitive substring of the title.
    #[arg(long)]
    title_contains: Option<String>,

    /// Category id.
    #[arg(long)]
    category: Option<String>,

    /// Manufacturer id.
    #[arg(long)]
    manufacturer: Option<String>,

    /// Vendor id.
    #[arg(long)]
    vendor: Option<String>,

    /// Product id (reviews).
    #[arg(long)]
    product: Option<String>,

    /// Exact content folder.
    #[arg(long)]
    folder: Option<String>,

    /// Do not filter on activity.
    #[arg(long)]
    all: bool,

    #[arg(long)]
    offset: Option<u64>,

    #[arg(long)]
    limit: Option<u64>,
}

impl ListArgs {
    fn active(&self) -> Option<BoolFilter> {
        if self.all { None } else { active_only() }
    }

    fn page(&self) -> Page {
        Page::new(self.offset, self.limit)
    }

    /// Reject flags that do not apply to `kind`.
    fn check_flags(&self, kind: EntityKind) -> Result<()> {
        let allowed: &[&str] = match kind {
            EntityKind::Category | EntityKind::Manufacturer | EntityKind::Vendor => {
                &["title-contains"]
            }
            EntityKind::Content => &["folder", "category"],
            EntityKind::Product => &["title-contains", "category", "manufacturer", "vendor"],
            EntityKind::Review => &["product"],
        };
        let set = [
            ("title-contains", self.title_contains.is_some()),
            ("category", self.category.is_some()),
            ("manufacturer", self.manufacturer.is_some()),
            ("vendor", self.vendor.is_some()),
            ("product", self.product.is_some()),
            ("folder", self.folder.is_some()),
        ];
        if let Some((flag, _)) = set
            .iter()
            .find(|(flag, is_set)| *is_set && !allowed.contains(flag))
        {
            bail!("--{flag} does not apply to {kind}");
        }
        Ok(())
    }

    fn into_filters(self, kind: EntityKind) -> Result<FilterList> {
        self.check_flags(kind)?;
        let active = self.active();
        let title = self.title_contains.map(StringFilter::contains);

        let filters = match kind {
            EntityKind::Category => CategoryFilterList {
                title,
                parent: None,
                active,
            }
            .into(),
            EntityKind::Content => ContentFilterList {
                folder: self.folder.map(StringFilter::equals),
                category: self.category.map(IdFilter::new),
                active,
            }
            .into(),
            EntityKind::Manufacturer => ManufacturerFilterList { title, active }.into(),
            EntityKind::Product => ProductFilterList {
                title,
                category: self.category.map(IdFilter::new),
                manufacturer: self.manufacturer.map(IdFilter::new),
                vendor: self.vendor.map(IdFilter::new),
                active,
            }
            .into(),
            EntityKind::Review => ReviewFilterList {
                product: self.product.map(IdFilter::new),
                user: None,
                active,
            }
            .into(),
            EntityKind::Vendor => VendorFilterList { title, active }.into(),
        };
        Ok(filters)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let state = CatalogueState::from_config(&config).await?;
    if !db::check_health(state.store()).await {
        bail!("database is not answering queries");
    }

    match cli.command {
        Command::InstallSchema => {
            db::install_schema(state.store())
                .await
                .context("failed to install schema")?;
            info!("schema ready");
        }
        Command::Get { entity, id } => {
            let caller = state.caller(&cli.roles);
            let value = get(&state, entity.into(), &id, &caller).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::List { entity, filters } => {
            let caller = state.caller(&cli.roles);
            let kind = EntityKind::from(entity);
            let page = filters.page();
            let filters = filters.into_filters(kind)?;
            let value = list(&state, kind, filters, page, &caller).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Attributes { product } => {
            let caller = state.caller(&cli.roles);
            let product = state.products().get(&product, &caller).await?;
            let attributes = state.products().attributes(&product).await?;
            println!("{}", serde_json::to_string_pretty(&attributes)?);
        }
        Command::SelectionLists { product } => {
            let caller = state.caller(&cli.roles);
            let product = state.products().get(&product, &caller).await?;
            let lists = state.products().selection_lists(&product).await?;
            println!("{}", serde_json::to_string_pretty(&lists)?);
        }
    }

    Ok(())
}

async fn get(
    state: &CatalogueState,
    kind: EntityKind,
    id: &str,
    caller: &dyn Authorization,
) -> Result<Value> {
    match kind {
        EntityKind::Category => get_one(state.categories(), id, caller).await,
        EntityKind::Content => get_one(state.contents(), id, caller).await,
        EntityKind::Manufacturer => get_one(state.manufacturers(), id, caller).await,
        EntityKind::Product => get_one(state.products(), id, caller).await,
        EntityKind::Review => get_one(state.reviews(), id, caller).await,
        EntityKind::Vendor => get_one(state.vendors(), id, caller).await,
    }
}

async fn list(
    state: &CatalogueState,
    kind: EntityKind,
    filters: FilterList,
    page: Page,
    caller: &dyn Authorization,
) -> Result<Value> {
    match kind {
        EntityKind::Category => list_all(state.categories(), filters, page, caller).await,
        EntityKind::Content => list_all(state.contents(), filters, page, caller).await,
        EntityKind::Manufacturer => list_all(state.manufacturers(), filters, page, caller).await,
        EntityKind::Product => list_all(state.products(), filters, page, caller).await,
        EntityKind::Review => list_all(state.reviews(), filters, page, caller).await,
        EntityKind::Vendor => list_all(state.vendors(), filters, page, caller).await,
    }
}

async fn get_one<D: CatalogueEntity>(
    service: &EntityService<D>,
    id: &str,
    caller: &dyn Authorization,
) -> Result<Value> {
    let entity = service.get(id, caller).await?;
    Ok(serde_json::to_value(&entity)?)
}

async fn list_all<D: CatalogueEntity>(
    service: &EntityService<D>,
    filters: FilterList,
    page: Page,
    caller: &dyn Authorization,
) -> Result<Value> {
    let entities = service.list(filters, page, caller).await?;
    info!(kind = %D::KIND, count = entities.len(), "listed");
    Ok(serde_json::to_value(&entities)?)
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
