//! Shared building blocks for Glossa.
//!
//! Extraction and runtime resolution must agree on how a message is keyed.
//! This crate holds everything both sides derive keys from: message ids,
//! canonical template text, and compiled plural messages. It also holds the
//! source positions and records that extraction produces.

pub mod locale;
pub mod message_id;
pub mod plural;
pub mod record;
pub mod span;
pub mod template;

pub use locale::{DEFAULT_LOCALE, normalise_locale};
pub use message_id::{MESSAGE_ID_LEN, MessageId, UNIT_SEPARATOR, generate_message_id};
pub use plural::{
    PLURAL_ARGUMENT, PluralCategory, PluralSelector, PluralVariations, SelectorError,
    compile_plural,
};
pub use record::{MessageRecord, Origin};
pub use span::{LineIndex, SourceLocation};
pub use template::canonical_template;
