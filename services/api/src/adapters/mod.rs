pub mod db;
pub mod transcript;
pub mod translate;

pub use db::DbAdapter;
pub use transcript::CaptionTrackAdapter;
pub use translate::TranslateApiAdapter;
