mod bootstrap;
mod session;

pub use bootstrap::CredentialBootstrapper;
pub use session::SessionManager;
pub use session::SharedSession;
