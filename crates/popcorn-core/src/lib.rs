pub mod details;
pub mod request;
pub mod search;
pub mod selection;
pub mod session;
pub mod watchlist;

pub use details::{DetailCompletion, DetailController, DetailRequest, DetailState};
pub use request::{RequestGate, RequestId, Ticket};
pub use search::{LifecycleState, QueryChange, QueryObserver, SearchCompletion, SearchController, SearchRequest};
pub use selection::SelectionController;
pub use session::{Completion, Intent, Session, SessionError, Snapshot};
pub use watchlist::{WatchlistError, WatchlistStore};
