//! Local order sessions.
//!
//! # Usage
//!
//! ```bash
//! tc-cli order --menu products/menu.md
//! ```
//!
//! Runs one order session on this terminal against the real shipping,
//! payment and e-mail services, configured the same way as the server.

use std::path::PathBuf;

use terminal_cafe_server::config::CafeConfig;
use terminal_cafe_server::state::{AppState, production_services};
use terminal_cafe_server::transport::LocalTerminal;
use terminal_cafe_server::{Catalog, SessionOutcome, StartupError};

/// Take one order on stdin/stdout.
///
/// `menu` overrides `CAFE_MENU_PATH`.
pub async fn run(menu: Option<PathBuf>) -> Result<SessionOutcome, StartupError> {
    let config = CafeConfig::from_env()?;
    let menu_path = menu.unwrap_or_else(|| config.menu_path.clone());

    let state = AppState::new(Catalog::load(&menu_path)?, production_services(&config)?);
    let mut terminal = LocalTerminal::new();

    Ok(state.session().run(&mut terminal).await)
}
