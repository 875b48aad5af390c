//! Interactive decision session
//!
//! Line-edited prompt with slash commands driving a `SessionHandle`.

mod session;

pub use session::ReplSession;

use eyre::Result;

use crate::config::Config;
use crate::service::create_service;
use crate::session::{SessionController, SessionHandle};

/// Run the interactive REPL
///
/// This is the entry point for `dc` and `dc repl`.
pub async fn run_interactive(config: &Config) -> Result<()> {
    config.validate()?;

    let service = create_service(config)?;
    let handle = SessionHandle::spawn(SessionController::new());

    let mut session = ReplSession::new(handle.clone(), service);
    let result = session.run().await;
    let _ = handle.shutdown().await;
    result
}
