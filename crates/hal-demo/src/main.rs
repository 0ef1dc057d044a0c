//! HAL demonstration CLI
//!
//! Generates HAL resources for a small in-memory library of books and
//! prints them as HAL+JSON or HAL+XML, negotiated from `--accept`.

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use halrs::{
    infrastructure::{ExtractorRegistry, Request, RouteTemplates, SerializeExtractor, VecPaginator},
    prelude::*,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = r#"{
    "metadata_map": [
        {
            "__class__": "RouteBasedResourceMetadata",
            "resource_class": "Author",
            "route": "author",
            "extractor": "author"
        },
        {
            "__class__": "RouteBasedResourceMetadata",
            "resource_class": "Book",
            "route": "book",
            "extractor": "book"
        },
        {
            "__class__": "RouteBasedCollectionMetadata",
            "collection_class": "BookPages",
            "collection_relation": "books",
            "route": "books"
        }
    ]
}"#;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Hal(#[from] HalError),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Parser)]
#[command(name = "hal-demo")]
#[command(about = "Render HAL resources for a sample book library", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Accept header used to negotiate the output format
    #[arg(short, long, default_value = "application/hal+json")]
    accept: String,

    /// JSON configuration replacing the built-in metadata and renderer settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated for more output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbosity: u8,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Render a single book with its author embedded
    Book {
        #[arg(value_name = "ID")]
        id: u64,
    },
    /// Render one page of the book collection
    Books {
        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 2)]
        per_page: usize,
    },
    /// Wrap an arbitrary JSON object file in a resource
    Document {
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// URI of the self link
        #[arg(long)]
        uri: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
struct Author {
    id: u64,
    name: String,
}

halrs::impl_entity!(Author);

#[derive(Debug, Clone)]
struct Book {
    id: u64,
    title: String,
    year: u32,
    author: Author,
}

halrs::impl_entity!(Book);

fn library() -> Vec<Book> {
    let le_guin = Author {
        id: 1,
        name: "Ursula K. Le Guin".to_string(),
    };
    let lem = Author {
        id: 2,
        name: "Stanislaw Lem".to_string(),
    };

    vec![
        Book {
            id: 1,
            title: "A Wizard of Earthsea".to_string(),
            year: 1968,
            author: le_guin.clone(),
        },
        Book {
            id: 2,
            title: "The Dispossessed".to_string(),
            year: 1974,
            author: le_guin,
        },
        Book {
            id: 3,
            title: "Solaris".to_string(),
            year: 1961,
            author: lem.clone(),
        },
        Book {
            id: 4,
            title: "The Cyberiad".to_string(),
            year: 1965,
            author: lem,
        },
    ]
}

fn extractors() -> ExtractorRegistry {
    let registry = ExtractorRegistry::new();
    registry.register("author", SerializeExtractor::<Author>::new());
    registry.register_fn("book", |book: &Book| {
        let mut fields = Fields::new();
        fields.insert("id".to_string(), book.id.into());
        fields.insert("title".to_string(), book.title.clone().into());
        fields.insert("year".to_string(), book.year.into());
        fields.insert("author".to_string(), Field::object(book.author.clone()));
        fields
    });
    registry
}

fn routes() -> RouteTemplates {
    RouteTemplates::new()
        .with_route("author", "/authors/{id}")
        .with_route("book", "/books/{id}")
        .with_route("books", "/books")
}

fn load_config(path: Option<&PathBuf>) -> Result<HalConfig, DemoError> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| DemoError::Io {
            path: path.clone(),
            source,
        })?,
        None => DEFAULT_CONFIG.to_string(),
    };
    Ok(HalConfig::from_json_str(&json)?)
}

fn main() -> Result<(), DemoError> {
    let cli = Cli::parse();

    let level = match cli.verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_ref())?;
    let classes = ClassRegistry::new()
        .register::<Author>("Author")
        .register::<Book>("Book")
        .register::<VecPaginator<Book>>("BookPages");
    let metadata = config.build_metadata_map(&classes)?;
    info!(entries = metadata.len(), "Loaded metadata map");

    let generator = ResourceGenerator::from_config(
        &config.resource_generator,
        Arc::new(metadata),
        Arc::new(extractors()),
        LinkGenerator::new(Arc::new(routes())),
    )?;

    let (request, resource) = match cli.command {
        Command::Book { id } => {
            let request = Request::new(format!("/books/{id}"));
            let book = library()
                .into_iter()
                .find(|book| book.id == id)
                .ok_or_else(|| HalError::InvalidObject(format!("no book with id {id}")))?;
            let resource = generator.from_object(&book, &request)?;
            (request, resource)
        }
        Command::Books { page, per_page } => {
            let request = Request::new(format!("/books?page={page}"));
            let books = VecPaginator::new(library(), per_page);
            let resource = generator.from_object(&books, &request)?;
            (request, resource)
        }
        Command::Document { path, uri } => {
            let json = std::fs::read_to_string(&path).map_err(|source| DemoError::Io {
                path: path.clone(),
                source,
            })?;
            let data = serde_json::from_str(&json).map_err(HalError::from)?;
            let resource = generator.from_array(data, uri.as_deref())?;
            (Request::new(uri.unwrap_or_else(|| "/".to_string())), resource)
        }
    };

    let request = request.with_header("Accept", cli.accept);
    let response = ResponseFactory::from_config(&config.renderer).create_response(&request, &resource)?;
    info!(
        status = response.status,
        content_type = %response.content_type,
        "Rendered resource"
    );

    println!("{}", response.body);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> ResourceGenerator {
        let config = load_config(None).unwrap();
        let classes = ClassRegistry::new()
            .register::<Author>("Author")
            .register::<Book>("Book")
            .register::<VecPaginator<Book>>("BookPages");
        ResourceGenerator::from_config(
            &config.resource_generator,
            Arc::new(config.build_metadata_map(&classes).unwrap()),
            Arc::new(extractors()),
            LinkGenerator::new(Arc::new(routes())),
        )
        .unwrap()
    }

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["hal-demo", "-vv", "books", "--page", "2"]).unwrap();
        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.accept, "application/hal+json");
        assert!(matches!(cli.command, Command::Books { page: 2, per_page: 2 }));
    }

    #[test]
    fn test_book_embeds_author() {
        let book = library().remove(0);
        let resource = generator()
            .from_object(&book, &Request::new("/books/1"))
            .unwrap();
        let value = resource.to_value();

        assert_eq!(value["_links"]["self"]["href"], "/books/1");
        assert_eq!(value["_embedded"]["author"]["name"], "Ursula K. Le Guin");
        assert_eq!(value["_embedded"]["author"]["_links"]["self"]["href"], "/authors/1");
    }

    #[test]
    fn test_books_last_page() {
        let books = VecPaginator::new(library(), 3);
        let resource = generator()
            .from_object(&books, &Request::new("/books?page=2"))
            .unwrap();
        let value = resource.to_value();

        assert_eq!(value["_page"], 2);
        assert_eq!(value["_links"]["prev"]["href"], "/books?page=1");
        assert_eq!(value["_embedded"]["books"][0]["title"], "The Cyberiad");
    }
}
