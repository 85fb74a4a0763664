//! Runtime message resolution for Glossa.
//!
//! Application code describes what it wants translated with a
//! [`MessageDescriptor`] and resolves it through a [`LocaleStore`] or a
//! [`Translator`]. Lookups key the active [`Catalog`] with the same message
//! ids the extractor writes, and fall back to the source text when no
//! translation exists.
//!
//! ```
//! use glossa_runtime::{Catalog, LocaleStore, Template};
//! use glossa_common::PluralVariations;
//!
//! let store = LocaleStore::new();
//! store.activate("ja", Catalog::from_messages([("hello {0}", None, "こんにちは {0}")]));
//!
//! let greeting = Template::new(["hello ", ""], ["John"]).expect("arity matches");
//! assert_eq!(store.t(greeting).as_deref(), Ok("こんにちは John"));
//!
//! let items = PluralVariations::from([("one", "# item"), ("other", "# items")]);
//! assert_eq!(store.plural(2.0, &items).as_deref(), Ok("2 items"));
//! ```

mod catalog;
mod descriptor;
mod error;
mod interpolate;
mod loader;
mod plural;
mod resolver;
mod store;

pub use catalog::Catalog;
pub use descriptor::{MessageDescriptor, Structured, Template, msg, msg_plural};
pub use error::{LoadError, ResolveError};
pub use loader::{CatalogLoader, JsonCatalogLoader};
pub use plural::PluralRuleSet;
pub use resolver::Resolver;
pub use store::{LocaleState, LocaleStore, SubscriptionId, Translator};
