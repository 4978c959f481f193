mod rank;
pub use self::rank::{RankPayload, RankRow};

mod profile;
pub use self::profile::{FundProfile, ProfileResponse, PROFILE_ITEMS};
