pub mod domain;
pub mod ports;

pub use domain::{Account, AccountCredentials, CaptionLine, Deck, NewWord, Translation, Word};
pub use ports::{DatabaseService, PortError, PortResult, TranscriptService, TranslationService};
