//! TCP listener that runs one order session per connection.
//!
//! Each peer is asked for its terminal type over telnet before the session
//! starts; peers that report none are refused by the session.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::{JoinError, JoinSet};
use tracing::Instrument;

use crate::error::SessionOutcome;
use crate::state::AppState;
use crate::telnet;
use crate::transport::StreamTerminal;

/// How long a peer has to report its terminal type.
const NEGOTIATION_TIMEOUT: Duration = Duration::from_secs(3);

/// Accept connections until `shutdown` resolves, then wait for the sessions
/// still running to finish.
///
/// # Errors
///
/// Returns an error if accepting a connection fails.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()>,
) -> std::io::Result<()> {
    tokio::pin!(shutdown);
    let mut sessions = JoinSet::new();

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                let state = state.clone();
                let span = tracing::info_span!("session", %peer);
                sessions.spawn(handle_connection(stream, peer, state).instrument(span));
            }
            Some(finished) = sessions.join_next(), if !sessions.is_empty() => {
                log_finished(finished);
            }
        }
    }

    drop(listener);
    tracing::info!(active = sessions.len(), "Listener stopped, draining sessions");
    while let Some(finished) = sessions.join_next().await {
        log_finished(finished);
    }

    tracing::info!("All sessions finished");
    Ok(())
}

fn log_finished(finished: Result<SessionOutcome, JoinError>) {
    if let Err(e) = finished {
        tracing::error!(error = %e, "Session task failed");
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: AppState) -> SessionOutcome {
    tracing::info!(%peer, "Client connected");

    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    let negotiated =
        telnet::negotiate_terminal_type(&mut reader, &mut writer, NEGOTIATION_TIMEOUT).await;
    let terminal_type = match negotiated {
        Ok(terminal_type) => terminal_type,
        Err(e) => {
            tracing::info!(error = %e, "Client left during negotiation");
            return SessionOutcome::Aborted;
        }
    };
    let interactive = terminal_type
        .as_deref()
        .is_some_and(telnet::is_interactive_type);
    tracing::info!(
        term = terminal_type.as_deref().unwrap_or("none"),
        interactive,
        "Terminal negotiated"
    );

    let mut terminal = StreamTerminal::new(reader, writer)
        .telnet()
        .interactive(interactive);
    let outcome = state.session().run(&mut terminal).await;

    tracing::info!(?outcome, "Client disconnected");
    outcome
}
