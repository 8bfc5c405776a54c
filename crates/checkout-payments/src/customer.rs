//! Customer Fulfillment
//!
//! Customer records are created once per successful payment. The ledger
//! guards that "once": a confirm retried against an already-succeeded
//! intent must not create a second customer.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Profile used when creating the post-payment customer record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub name: String,
    pub email: String,
    pub phone: String,

    /// Free-form key/value pairs forwarded to the processor
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CustomerProfile {
    /// Static demo profile; a real integration would take this from the
    /// authenticated session
    pub fn demo() -> Self {
        let mut metadata = HashMap::new();
        metadata.insert("member_id".to_string(), "123213".to_string());

        Self {
            name: "Jenny Rosen".into(),
            email: "jenny.rosen@example.com".into(),
            phone: "+15555551212".into(),
            metadata,
        }
    }
}

/// Tracks which intents already triggered customer creation
pub trait CustomerLedger: Send + Sync {
    /// Claim fulfillment for an intent.
    ///
    /// Returns `true` exactly once per intent id; later claims return
    /// `false`.
    fn claim(&self, intent_id: &str) -> Result<bool>;

    /// Release a claim so a later confirm can retry fulfillment.
    ///
    /// Used when customer creation fails after a successful payment.
    fn release(&self, intent_id: &str) -> Result<()>;
}

/// In-memory ledger (for development; records do not survive restart)
pub struct MemoryCustomerLedger {
    fulfilled: RwLock<HashSet<String>>,
}

impl Default for MemoryCustomerLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCustomerLedger {
    pub fn new() -> Self {
        Self {
            fulfilled: RwLock::new(HashSet::new()),
        }
    }
}

impl CustomerLedger for MemoryCustomerLedger {
    fn claim(&self, intent_id: &str) -> Result<bool> {
        let mut fulfilled = self.fulfilled.write().unwrap();
        Ok(fulfilled.insert(intent_id.to_string()))
    }

    fn release(&self, intent_id: &str) -> Result<()> {
        let mut fulfilled = self.fulfilled.write().unwrap();
        fulfilled.remove(intent_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_single_use() {
        let ledger = MemoryCustomerLedger::new();
        assert!(ledger.claim("pi_123").unwrap());
        assert!(!ledger.claim("pi_123").unwrap());
        assert!(ledger.claim("pi_456").unwrap());
    }

    #[test]
    fn test_release_allows_retry() {
        let ledger = MemoryCustomerLedger::new();
        assert!(ledger.claim("pi_123").unwrap());
        ledger.release("pi_123").unwrap();
        assert!(ledger.claim("pi_123").unwrap());
    }
}
