mod persistence;
mod session;

pub use persistence::{load_session, save_session};
pub use session::SessionState;
