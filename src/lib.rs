pub mod auth;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod router;
pub mod viewer;

pub use catalog::CatalogRepository;
pub use db::models::Issue;
pub use error::ComicError;
