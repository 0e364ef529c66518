//! Terminal [`Consent`] flow.

use std::io::{self, BufRead as _, Write as _};

use async_trait::async_trait;
use secrecy::SecretString;
use service::infra::identity::{Consent, Error, FederatedCredential};
use tokio::task;

/// [`Consent`] flow asking for a Google ID token on the terminal.
///
/// An empty line dismisses the flow.
#[derive(Clone, Copy, Debug, Default)]
pub struct Terminal;

impl Terminal {
    /// ID of the federated provider the ID tokens are issued by.
    pub const PROVIDER_ID: &'static str = "google.com";
}

#[async_trait]
impl Consent for Terminal {
    async fn request(&self) -> Result<Option<FederatedCredential>, Error> {
        let line = task::spawn_blocking(|| {
            let mut stdout = io::stdout().lock();
            write!(stdout, "Paste a Google ID token (empty to cancel): ")?;
            stdout.flush()?;

            let mut line = String::new();
            _ = io::stdin().lock().read_line(&mut line)?;
            Ok::<_, io::Error>(line)
        })
        .await
        .map_err(|e| Error::Rejected(e.to_string()))?
        .map_err(|e| Error::Rejected(e.to_string()))?;

        Ok(Some(line.trim())
            .filter(|t| !t.is_empty())
            .map(|token| FederatedCredential {
                provider_id: Self::PROVIDER_ID.to_owned(),
                id_token: SecretString::from(token),
            }))
    }
}
