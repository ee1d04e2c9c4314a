//! Production implementations of the trait seams.

#[cfg(feature = "chat")]
pub mod chat;
#[cfg(feature = "marketplace")]
pub mod marketplace;

#[cfg(feature = "chat")]
pub use chat::ChatBackend;
#[cfg(feature = "marketplace")]
pub use marketplace::{MarketplaceCatalog, MarketplaceMirror};
