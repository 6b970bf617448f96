pub mod coordi;
pub mod gender;
pub mod interaction;
pub mod onboarding;
pub mod page;

pub use coordi::Coordi;
pub use gender::{Gender, normalize_gender};
pub use interaction::{ActionType, Interaction, UserProfile};
pub use onboarding::{
	Hashtag, MAX_PREFERRED_HASHTAGS, MIN_PREFERRED_HASHTAGS, PreferenceSelection,
	REQUIRED_SAMPLE_OUTFITS, SAMPLE_OUTFIT_OPTIONS, SelectionError,
};
pub use page::{MAX_PAGE_LIMIT, PageError, PageRequest, Pagination};
