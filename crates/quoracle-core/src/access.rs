//! Single-owner gate and one-shot initialization latch.

use serde::{Deserialize, Serialize};

use quoracle_types::{Address, OracleEvent};

use crate::{OracleError, Result};

/// Administration state of an oracle instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: Address,
    initialized: bool,
}

impl AccessControl {
    /// Fresh state: `owner` is the deployer and the latch is unset.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            initialized: false,
        }
    }

    /// Rebuild previously persisted state.
    pub fn restore(owner: Address, initialized: bool) -> Self {
        Self { owner, initialized }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// # Errors
    ///
    /// - [`OracleError::Unauthorized`] if `caller` is not the owner
    pub fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller != self.owner {
            return Err(OracleError::Unauthorized(caller));
        }
        Ok(())
    }

    /// Hand ownership to `new_owner`.
    ///
    /// # Errors
    ///
    /// - [`OracleError::Unauthorized`] if `caller` is not the owner
    /// - [`OracleError::InvalidAddress`] if `new_owner` is the zero address
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<OracleEvent> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(OracleError::InvalidAddress(new_owner));
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        tracing::info!(previous = %previous_owner, new = %new_owner, "ownership transferred");
        Ok(OracleEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        })
    }

    /// Set the initialization latch. Open to any caller, once.
    ///
    /// # Errors
    ///
    /// - [`OracleError::AlreadyInitialized`] on every call after the first
    pub fn initialize(&mut self, caller: Address) -> Result<OracleEvent> {
        if self.initialized {
            return Err(OracleError::AlreadyInitialized);
        }
        self.initialized = true;
        tracing::info!(initializer = %caller, "oracle initialized");
        Ok(OracleEvent::OracleInitialized {
            initializer: caller,
        })
    }
}
