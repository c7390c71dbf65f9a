//! Directory gateway: the operation set the identity core consumes,
//! executed over pooled administrative sessions.
//!
//! Every operation acquires a session from the pool and releases it on
//! every exit path. [`DirectoryGateway::authenticate`] is the exception:
//! it binds a short-lived, unpooled connection with the caller-supplied
//! credential so end-user binds never contaminate the administrative
//! pool.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ldap3::exop::{PasswordModify, WhoAmI};
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Mod, Scope, SearchEntry, SearchResult};
use tracing::{debug, instrument, warn};

use crate::config::{ConfigError, DirectoryConfig};
use crate::entry::{Attributes, DirectoryEntry};
use crate::error::{DirectoryError, DirectoryResult};
use crate::pool::{SessionFactory, SessionPool};

// LDAP result codes the gateway gives dedicated errors.
const RC_SUCCESS: u32 = 0;
const RC_NO_SUCH_OBJECT: u32 = 32;
const RC_INVALID_CREDENTIALS: u32 = 49;
const RC_ENTRY_ALREADY_EXISTS: u32 = 68;

/// Attributes requested when a search names none.
const DEFAULT_SEARCH_ATTRIBUTES: &[&str] = &["cn", "mail", "displayName"];

/// Dials and administratively binds pooled LDAP sessions; probes them
/// with the Who Am I extended operation on release.
pub struct LdapSessionFactory {
    config: Arc<DirectoryConfig>,
}

impl LdapSessionFactory {
    pub fn new(config: Arc<DirectoryConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionFactory for LdapSessionFactory {
    type Session = Ldap;

    async fn dial(&self) -> DirectoryResult<Ldap> {
        let mut ldap = open_connection(&self.config).await?;
        let result = ldap
            .simple_bind(&self.config.bind_dn, &self.config.bind_password)
            .await
            .map_err(|e| {
                DirectoryError::connection_with_source(
                    format!("administrative bind failed for {}", self.config.bind_dn),
                    e,
                )
            })?;
        if result.rc != RC_SUCCESS {
            return Err(DirectoryError::connection(format!(
                "administrative bind failed with code {}: {}",
                result.rc, result.text
            )));
        }
        debug!(url = %self.config.url, "directory session established");
        Ok(ldap)
    }

    async fn probe(&self, session: &mut Ldap) -> bool {
        match session.extended(WhoAmI).await {
            Ok(result) => result.1.rc == RC_SUCCESS,
            Err(_) => false,
        }
    }

    async fn discard(&self, mut session: Ldap) {
        if let Err(e) = session.unbind().await {
            debug!(error = %e, "error while closing discarded session");
        }
    }
}

/// Dial the configured directory and spawn the connection driver.
async fn open_connection(config: &DirectoryConfig) -> DirectoryResult<Ldap> {
    let settings = LdapConnSettings::new()
        .set_conn_timeout(Duration::from_secs(config.connect_timeout_secs));
    let (conn, ldap) = LdapConnAsync::with_settings(settings, &config.url)
        .await
        .map_err(|e| {
            DirectoryError::connection_with_source(
                format!("failed to dial directory at {}", config.url),
                e,
            )
        })?;
    tokio::spawn(async move {
        if let Err(e) = conn.drive().await {
            warn!(error = %e, "directory connection driver error");
        }
    });
    Ok(ldap)
}

/// Map a non-zero LDAP result code onto the error taxonomy.
fn check_code(
    operation: &'static str,
    dn: &str,
    rc: u32,
    text: &str,
) -> DirectoryResult<()> {
    match rc {
        RC_SUCCESS => Ok(()),
        RC_NO_SUCH_OBJECT => Err(DirectoryError::NotFound { dn: dn.to_string() }),
        RC_INVALID_CREDENTIALS => Err(DirectoryError::InvalidCredentials),
        RC_ENTRY_ALREADY_EXISTS => Err(DirectoryError::AlreadyExists { dn: dn.to_string() }),
        _ => Err(DirectoryError::operation(format!(
            "{operation} failed for {dn} with code {rc}: {text}"
        ))),
    }
}

/// Map a protocol-level failure (the request never produced a result).
fn request_failed(
    operation: &'static str,
    dn: &str,
    err: ldap3::LdapError,
) -> DirectoryError {
    DirectoryError::connection_with_source(format!("{operation} request failed for {dn}"), err)
}

/// Gateway over the pooled directory sessions.
pub struct DirectoryGateway {
    config: Arc<DirectoryConfig>,
    pool: SessionPool<LdapSessionFactory>,
}

impl DirectoryGateway {
    /// Build a gateway for a validated configuration.
    pub fn new(config: Arc<DirectoryConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        let pool = SessionPool::new(LdapSessionFactory::new(Arc::clone(&config)));
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Shut down the session pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Subtree search under `base`. Requests the schema-supplied
    /// attribute list, or a minimal default when the caller names none.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        base: &str,
        filter: &str,
        attributes: &[&str],
    ) -> DirectoryResult<Vec<DirectoryEntry>> {
        let requested: Vec<String> = if attributes.is_empty() {
            DEFAULT_SEARCH_ATTRIBUTES
                .iter()
                .map(|a| (*a).to_string())
                .collect()
        } else {
            attributes.iter().map(|a| (*a).to_string()).collect()
        };

        let mut session = self.pool.get().await?;
        let outcome = session
            .search(base, Scope::Subtree, filter, requested)
            .await;
        self.pool.put(session).await;

        let SearchResult(entries, result) =
            outcome.map_err(|e| request_failed("search", base, e))?;
        check_code("search", base, result.rc, &result.text)?;

        Ok(entries
            .into_iter()
            .map(|raw| {
                let entry = SearchEntry::construct(raw);
                DirectoryEntry {
                    dn: entry.dn,
                    attributes: entry.attrs,
                }
            })
            .collect())
    }

    /// Create an entry.
    #[instrument(skip(self, attributes))]
    pub async fn add(
        &self,
        dn: &str,
        object_classes: &[&str],
        attributes: &Attributes,
    ) -> DirectoryResult<()> {
        let mut attrs: Vec<(String, HashSet<String>)> = Vec::with_capacity(attributes.len() + 1);
        attrs.push((
            "objectClass".to_string(),
            object_classes.iter().map(|oc| (*oc).to_string()).collect(),
        ));
        for (name, values) in attributes {
            attrs.push((name.clone(), values.iter().cloned().collect()));
        }

        let mut session = self.pool.get().await?;
        let outcome = session.add(dn, attrs).await;
        self.pool.put(session).await;

        let result = outcome.map_err(|e| request_failed("add", dn, e))?;
        check_code("add", dn, result.rc, &result.text)
    }

    /// Apply add/delete/replace attribute modifications to an entry.
    #[instrument(skip(self, add, delete, replace))]
    pub async fn modify(
        &self,
        dn: &str,
        add: &Attributes,
        delete: &Attributes,
        replace: &Attributes,
    ) -> DirectoryResult<()> {
        let mut mods: Vec<Mod<String>> = Vec::new();
        for (name, values) in add {
            mods.push(Mod::Add(name.clone(), values.iter().cloned().collect()));
        }
        for (name, values) in delete {
            mods.push(Mod::Delete(name.clone(), values.iter().cloned().collect()));
        }
        for (name, values) in replace {
            mods.push(Mod::Replace(name.clone(), values.iter().cloned().collect()));
        }

        let mut session = self.pool.get().await?;
        let outcome = session.modify(dn, mods).await;
        self.pool.put(session).await;

        let result = outcome.map_err(|e| request_failed("modify", dn, e))?;
        check_code("modify", dn, result.rc, &result.text)
    }

    /// Delete an entry.
    #[instrument(skip(self))]
    pub async fn delete(&self, dn: &str) -> DirectoryResult<()> {
        let mut session = self.pool.get().await?;
        let outcome = session.delete(dn).await;
        self.pool.put(session).await;

        let result = outcome.map_err(|e| request_failed("delete", dn, e))?;
        check_code("delete", dn, result.rc, &result.text)
    }

    /// Move or rename an entry: a new leaf component and, optionally, a
    /// new parent container.
    #[instrument(skip(self))]
    pub async fn rename(
        &self,
        dn: &str,
        new_rdn: &str,
        new_superior: Option<&str>,
    ) -> DirectoryResult<()> {
        let mut session = self.pool.get().await?;
        let outcome = session.modifydn(dn, new_rdn, true, new_superior).await;
        self.pool.put(session).await;

        let result = outcome.map_err(|e| request_failed("rename", dn, e))?;
        check_code("rename", dn, result.rc, &result.text)
    }

    /// Replace an entry's credential via the password modify extended
    /// operation.
    #[instrument(skip(self, new_secret))]
    pub async fn set_credential(&self, dn: &str, new_secret: &str) -> DirectoryResult<()> {
        let exop = PasswordModify {
            user_id: Some(dn),
            old_pass: None,
            new_pass: Some(new_secret),
        };

        let mut session = self.pool.get().await?;
        let outcome = session.extended(exop).await;
        self.pool.put(session).await;

        let result = outcome.map_err(|e| request_failed("password modify", dn, e))?;
        check_code("password modify", dn, result.1.rc, &result.1.text)
    }

    /// Verify a credential by binding a dedicated, unpooled connection.
    ///
    /// A rejected credential is `Ok(false)`, not an error; transport and
    /// protocol failures are errors. Empty input short-circuits to
    /// `Ok(false)` without dialing.
    #[instrument(skip(self, secret))]
    pub async fn authenticate(&self, dn: &str, secret: &str) -> DirectoryResult<bool> {
        if dn.is_empty() || secret.is_empty() {
            return Ok(false);
        }

        let mut ldap = open_connection(&self.config).await?;
        let bind = ldap.simple_bind(dn, secret).await;
        if let Err(e) = ldap.unbind().await {
            debug!(error = %e, "error while closing authentication connection");
        }

        let result = bind.map_err(|e| request_failed("authentication bind", dn, e))?;
        match result.rc {
            RC_SUCCESS => Ok(true),
            RC_INVALID_CREDENTIALS => Ok(false),
            rc => Err(DirectoryError::operation(format!(
                "authentication bind failed for {dn} with code {rc}: {}",
                result.text
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_code_passes() {
        assert!(check_code("add", "cn=x", RC_SUCCESS, "").is_ok());
    }

    #[test]
    fn no_such_object_maps_to_not_found() {
        let err = check_code("search", "cn=missing", RC_NO_SUCH_OBJECT, "").unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { dn } if dn == "cn=missing"));
    }

    #[test]
    fn already_exists_maps() {
        let err = check_code("add", "cn=dup", RC_ENTRY_ALREADY_EXISTS, "").unwrap_err();
        assert!(matches!(err, DirectoryError::AlreadyExists { .. }));
    }

    #[test]
    fn invalid_credentials_maps() {
        let err = check_code("bind", "cn=user", RC_INVALID_CREDENTIALS, "").unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidCredentials));
    }

    #[test]
    fn other_codes_map_to_operation() {
        let err = check_code("modify", "cn=x", 50, "insufficient access").unwrap_err();
        match err {
            DirectoryError::Operation { message, .. } => {
                assert!(message.contains("code 50"));
                assert!(message.contains("insufficient access"));
            }
            other => panic!("unexpected variant: {other}"),
        }
    }
}
