//! Client-side state containers. Each store is a plain struct with a
//! defined set of transition functions, owned by whichever view needs it
//! and injected where shared. No ambient singletons.

mod analytics;
mod emails;
mod session;

pub use analytics::AnalyticsStore;
pub use emails::{EmailFilters, EmailStore};
pub use session::SessionStore;
