pub mod external_ids;
pub mod item;
pub mod lookup;
pub mod media;
pub mod outcome;
pub mod trakt_list;

pub use external_ids::ExternalIds;
pub use item::{MediaItemRef, ResolvedIds};
pub use lookup::LookupResult;
pub use media::MediaType;
pub use outcome::AddOutcome;
pub use trakt_list::TraktList;
