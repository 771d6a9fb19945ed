use anyhow::{bail, Result};
use clap::Parser;
use rental_scout::models::parse_price;
use rental_scout::storage::FileStorage;
use rental_scout::{
    Bathrooms, Bedrooms, ClientConfig, FilterCriteria, HttpBackend, Property, RecentSearchStore,
    Role, SearchViewModel, Session, ViewContent,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rental-scout", version, about = "Search rental listings across portals")]
struct Cli {
    /// District or area, e.g. Miraflores
    #[arg(long, default_value = "")]
    zone: String,

    /// 0 (any), 1, 2, 3 or 4 (4+)
    #[arg(long, default_value = "0")]
    bedrooms: Bedrooms,

    /// 0 (any), 1, 2 or 3 (3+)
    #[arg(long, default_value = "0")]
    bathrooms: Bathrooms,

    #[arg(long)]
    price_min: Option<String>,

    #[arg(long)]
    price_max: Option<String>,

    /// Free-text keywords, e.g. "piscina mascotas"
    #[arg(long, default_value = "")]
    keywords: String,

    /// How many result pages to walk through
    #[arg(long, default_value_t = 1)]
    pages: u32,

    /// Re-run the N-th recent search (1 = newest)
    #[arg(long, value_name = "N")]
    repeat: Option<usize>,

    /// Run the N-th trending search
    #[arg(long, value_name = "N")]
    trending: Option<usize>,

    /// Forget the search history and exit
    #[arg(long)]
    clear_recents: bool,
}

impl Cli {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            zone: self.zone.clone(),
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            price_min: self.price_min.as_deref().and_then(parse_price),
            price_max: self.price_max.as_deref().and_then(parse_price),
            keywords: self.keywords.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    info!("🏠 Rental Scout");
    info!("==========================================");

    let session = Session::new();
    if let Some(token) = &config.token {
        session.sign_in(token.clone(), Role::default());
    }

    let storage = Arc::new(FileStorage::new(config.data_dir.clone()));
    let recents = RecentSearchStore::load(storage);
    let backend = Arc::new(HttpBackend::new(config.clone(), session)?);
    let view = SearchViewModel::new(backend, recents, config.page_size);

    if cli.clear_recents {
        view.clear_recents();
        info!("🧹 Search history cleared");
        return Ok(());
    }

    view.mount();
    view.feeds_settled().await;

    let criteria = if let Some(n) = cli.repeat {
        match view.recents().get(n.wrapping_sub(1)) {
            Some(entry) => entry.criteria.clone(),
            None => bail!("No recent search #{}", n),
        }
    } else if let Some(n) = cli.trending {
        match view.trending().get(n.wrapping_sub(1)) {
            Some(criteria) => criteria.clone(),
            None => bail!("No trending search #{}", n),
        }
    } else {
        cli.criteria()
    };

    if !criteria.is_submittable() {
        print_home(&view);
        return Ok(());
    }

    view.quick_search(criteria).await;
    print_page(&view);

    for _ in 1..cli.pages {
        if view.go_next().await.is_none() {
            break;
        }
        print_page(&view);
    }

    Ok(())
}

fn print_home(view: &SearchViewModel) {
    if let ViewContent::Home { highlights, .. } = view.content() {
        if !highlights.is_empty() {
            println!("Publicaciones destacadas\n");
            for (i, property) in highlights.iter().enumerate() {
                print_property(i + 1, property);
            }
        }
    }

    let trending = view.trending();
    if !trending.is_empty() {
        println!("Más buscados:");
        for (i, criteria) in trending.iter().enumerate() {
            println!("  {}. {}", i + 1, criteria.chip_label());
        }
        println!();
    }

    let recents = view.recents();
    if !recents.is_empty() {
        println!("Tus últimas búsquedas:");
        for (i, entry) in recents.iter().enumerate() {
            println!(
                "  {}. {} ({})",
                i + 1,
                entry.criteria.chip_label(),
                entry.created_at.format("%Y-%m-%d %H:%M")
            );
        }
        println!();
    }
}

fn print_page(view: &SearchViewModel) {
    match view.content() {
        ViewContent::Results(page) => {
            println!("\n✅ {} propiedades encontradas", page.total());
            println!(
                "Página {} de {} · mostrando {} de {}\n",
                page.current_page,
                page.total_pages(),
                page.showing(),
                page.total()
            );
            for (i, property) in page.results.iter().enumerate() {
                print_property(i + 1, property);
            }
        }
        ViewContent::NoResults => {
            println!("No se encontraron propiedades");
            println!("Intenta ajustar los filtros");
        }
        ViewContent::Error(failure) => println!("⚠️ {}", failure),
        ViewContent::Searching | ViewContent::Home { .. } => {}
    }
}

fn print_property(index: usize, property: &Property) {
    let star = if property.is_featured { "★ " } else { "" };
    println!("{}. {}{} ({})", index, star, property.title, property.display_price());
    println!(
        "   {} dorm, {} baños, {} m²",
        property.bedrooms, property.bathrooms, property.area_m2
    );
    if let Some(description) = &property.description {
        println!("   {}", description);
    }
    if let Some(scraped_at) = property.scraped_at {
        println!("   {} • Fuente: {}", scraped_at.format("%Y-%m-%d"), property.source);
    }
    println!("   URL: {}", property.link_url());
    if let Some(image) = property.image() {
        println!("   Imagen: {}", image);
    }
    println!();
}
