//! # Issuer Setup
//!
//! Getting from nothing to an issuer to operate on:
//!
//! 1. Configure the issuer template address for the connected network.
//! 2. List existing issuer components of that template, or create one.
//! 3. Select an issuer, which refreshes it from the ledger and makes it the
//!    active issuer.
//!
//! Creation registers the new issuer under the creating account only after
//! the ledger accepted the transaction and the created component was found
//! in the diff.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

use super::validation::{self, ValidationError};
use super::BusyGuard;
use crate::issuer::{ActiveIssuer, IssuerRecord, NewIssuerParams};
use crate::provider::{IssuerProvider, ProviderError, Substate};
use crate::storage::{DbError, IssuerRegistry, RegistryError, SettingsError, SettingsStore};
use crate::transaction::{classifier, ClassifyError, SubstateKind};

/// Errors from the setup flow.
#[derive(Debug, Error)]
pub enum SetupError {
    /// No issuer template has been configured yet.
    #[error("no issuer template configured")]
    NoTemplate,

    /// Another setup operation is still in flight.
    #[error("an issuer operation is already in flight")]
    Busy,

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Classification(#[from] ClassifyError),

    /// The ledger accepted the creation of `issuer_id`, but reading the new
    /// issuer back failed. The component exists; select it by id to retry.
    #[error("issuer {issuer_id} was created but could not be fetched: {source}")]
    Fetch {
        issuer_id: String,
        source: ProviderError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<SettingsError> for SetupError {
    fn from(e: SettingsError) -> Self {
        match e {
            SettingsError::Validation(e) => Self::Validation(e),
            SettingsError::Db(e) => Self::Db(e),
        }
    }
}

/// Template configuration, issuer listing and creation.
pub struct IssuerSetup {
    provider: Arc<dyn IssuerProvider>,
    settings: SettingsStore,
    registry: IssuerRegistry,
    active: Arc<ActiveIssuer>,
    busy: AtomicBool,
}

impl IssuerSetup {
    pub fn new(
        provider: Arc<dyn IssuerProvider>,
        settings: SettingsStore,
        registry: IssuerRegistry,
        active: Arc<ActiveIssuer>,
    ) -> Self {
        Self {
            provider,
            settings,
            registry,
            active,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn registry(&self) -> &IssuerRegistry {
        &self.registry
    }

    pub fn active(&self) -> &Arc<ActiveIssuer> {
        &self.active
    }

    /// Persist the issuer template. Returns `false` if unchanged.
    ///
    /// A blank template is a [`SetupError::Validation`] error.
    pub fn set_template(&self, template: &str) -> Result<bool, SetupError> {
        Ok(self.settings.set_template(template)?)
    }

    /// The configured template, or [`SetupError::NoTemplate`] when unset or
    /// blank.
    pub fn template(&self) -> Result<String, SetupError> {
        self.settings.template()?.ok_or(SetupError::NoTemplate)
    }

    /// Issuer components instantiated from the configured template.
    pub async fn list_issuer_components(&self) -> Result<Vec<Substate>, SetupError> {
        let template = self.template()?;
        let _busy = BusyGuard::acquire(&self.busy).ok_or(SetupError::Busy)?;

        let substates = self
            .provider
            .list_substates(&template, SubstateKind::Component)
            .await?;
        let listed = substates.len();
        let components: Vec<Substate> = substates
            .into_iter()
            .filter(|s| s.template_address.as_deref() == Some(template.as_str()))
            .collect();

        tracing::debug!(%template, listed, kept = components.len(), "issuer components listed");
        Ok(components)
    }

    /// Create a new issuer for `account` and make it the active issuer.
    ///
    /// The issuer is registered only after the ledger accepted the creation
    /// and the created component was located in the result.
    ///
    /// # Errors
    ///
    /// Fails without contacting the provider on a missing account, missing
    /// template, invalid parameters, or when another operation is in
    /// flight. Ledger rejections come back as
    /// [`SetupError::Classification`]. If the creation was accepted but the
    /// new issuer cannot be read back, [`SetupError::Fetch`] carries its id.
    pub async fn create_issuer(
        &self,
        account: Option<&str>,
        params: NewIssuerParams,
    ) -> Result<IssuerRecord, SetupError> {
        let account = account.ok_or(RegistryError::NoActiveAccount)?;
        let template = self.template()?;
        validation::validate_new_issuer(&params)?;
        let _busy = BusyGuard::acquire(&self.busy).ok_or(SetupError::Busy)?;

        let raw = self.provider.create_new_issuer(&template, &params).await?;
        let issuer_id = classifier::classify(raw, &template).map_err(|e| {
            match &e {
                ClassifyError::InvariantViolation { .. } => {
                    tracing::error!(%template, error = %e, "issuer creation result violated protocol")
                }
                _ => tracing::warn!(%template, error = %e, "issuer creation not accepted"),
            }
            e
        })?;

        let record = match self.provider.get_issuer(&issuer_id).await {
            Ok(record) => record,
            Err(source) => {
                tracing::error!(%account, issuer = %issuer_id, error = %source, "created issuer could not be fetched");
                return Err(SetupError::Fetch { issuer_id, source });
            }
        };
        self.registry.add_issuer(account, record.clone())?;
        self.active.set_active_issuer(Some(record.clone()));

        tracing::info!(%account, issuer = %record.id, symbol = %params.token_symbol, "issuer created");
        Ok(record)
    }

    /// Fetch the latest state of `issuer_id` and make it the active issuer.
    ///
    /// If the active account already has this issuer registered, the stored
    /// record is replaced with the fresh one.
    pub async fn select_issuer(
        &self,
        account: Option<&str>,
        issuer_id: &str,
    ) -> Result<IssuerRecord, SetupError> {
        let record = self.provider.get_issuer(issuer_id).await?;

        if let Some(account) = account {
            if self.registry.find_issuer(Some(account), issuer_id)?.is_some() {
                self.registry.add_issuer(account, record.clone())?;
            }
        }
        self.active.set_active_issuer(Some(record.clone()));
        Ok(record)
    }

    /// Forget the active issuer, e.g. when leaving the issuer view.
    pub fn leave_issuer(&self) {
        self.active.clear_active_issuer();
    }
}
