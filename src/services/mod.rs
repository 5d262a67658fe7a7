pub mod catalog;
pub mod context;
pub mod enrichment;
pub mod features;
pub mod metadata;
pub mod neighbors;
pub mod popularity;
pub mod providers;
pub mod recommendations;
pub mod title_search;

pub use context::{ServiceContext, Settings};
pub use providers::{MetadataProvider, TmdbClient};
