mod film;
mod movie;
pub mod popcorn;
mod subtitle;
pub mod yts;

pub use film::Film;
pub use movie::{MovieRecord, ProviderKind, TorrentRecord};
pub use subtitle::{Subtitle, SubtitleFile};
