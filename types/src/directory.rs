//! Static registry of clients and where their notifications go.
//!
//! The directory is built once at startup and never mutated. Holding a
//! [`KnownClient`] proves the id was checked against it, which is how the
//! record store guarantees every persisted `client_id` resolves.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::ids::ClientId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown client: {0}")]
pub struct UnknownClientError(pub ClientId);

/// Rejected submission input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no client selected")]
    MissingClient,
    #[error("client {0} is not in the client directory")]
    UnknownClient(ClientId),
}

impl From<UnknownClientError> for ValidationError {
    fn from(err: UnknownClientError) -> Self {
        Self::UnknownClient(err.0)
    }
}

/// A client id that exists in the directory, plus its resolved address.
///
/// Only [`ClientDirectory::verify`] constructs this:
///
/// ```compile_fail
/// let client = signoff_types::KnownClient {
///     id: signoff_types::ClientId::new("Client Z"),
///     address: String::from("z@example.com"),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownClient {
    id: ClientId,
    address: String,
}

impl KnownClient {
    #[must_use]
    pub fn id(&self) -> &ClientId {
        &self.id
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Immutable mapping of client ids to notification addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientDirectory {
    entries: BTreeMap<ClientId, String>,
}

impl ClientDirectory {
    /// Sample clients used when configuration defines none.
    pub const SAMPLE_CLIENTS: [(&'static str, &'static str); 3] = [
        ("Client A", "client-a@example.com"),
        ("Client B", "client-b@example.com"),
        ("Client C", "client-c@example.com"),
    ];

    #[must_use]
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(id, address)| (ClientId::new(id), address.into()))
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn sample() -> Self {
        Self::from_entries(Self::SAMPLE_CLIENTS)
    }

    /// Notification address for `client_id`.
    pub fn resolve(&self, client_id: &str) -> Result<&str, UnknownClientError> {
        self.entries
            .get(client_id)
            .map(String::as_str)
            .ok_or_else(|| UnknownClientError(ClientId::new(client_id)))
    }

    /// Check a submitted client id. Surrounding whitespace is ignored.
    pub fn verify(&self, client_id: &str) -> Result<KnownClient, ValidationError> {
        let trimmed = client_id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingClient);
        }
        let (id, address) = self
            .entries
            .get_key_value(trimmed)
            .ok_or_else(|| ValidationError::UnknownClient(ClientId::new(trimmed)))?;
        Ok(KnownClient {
            id: id.clone(),
            address: address.clone(),
        })
    }

    /// Client ids in sorted order.
    pub fn client_ids(&self) -> impl Iterator<Item = &ClientId> {
        self.entries.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
