use super::store::KeyValueStore;
use crate::config::APP_ID;

/// Decides whether an unlock code grants access to the full result.
pub trait EntitlementCheck: Send + Sync {
    fn verify(&self, code: &str) -> bool;
}

/// Stub entitlement: one shared code for every customer.
///
/// This is not authorization. It stands in until purchases are verified
/// against a real payment record.
#[derive(Debug, Clone)]
pub struct SharedCodeEntitlement {
    code: String,
}

impl SharedCodeEntitlement {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.trim().to_string(),
        }
    }
}

impl EntitlementCheck for SharedCodeEntitlement {
    fn verify(&self, code: &str) -> bool {
        !self.code.is_empty() && code.trim() == self.code
    }
}

pub fn paid_flag_key(app_id: &str) -> String {
    format!("{app_id}_paid")
}

/// The blur overlay state on the result page, persisted in a [`KeyValueStore`].
pub struct Paywall<'a, S: KeyValueStore + ?Sized, E: EntitlementCheck + ?Sized> {
    store: &'a mut S,
    entitlement: &'a E,
    key: String,
}

impl<'a, S: KeyValueStore + ?Sized, E: EntitlementCheck + ?Sized> Paywall<'a, S, E> {
    pub fn new(store: &'a mut S, entitlement: &'a E) -> Self {
        Self::for_app(store, entitlement, APP_ID)
    }

    pub fn for_app(store: &'a mut S, entitlement: &'a E, app_id: &str) -> Self {
        Self {
            store,
            entitlement,
            key: paid_flag_key(app_id),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.store.get(&self.key).as_deref() == Some("true")
    }

    /// Sets the paid flag when the code checks out. Returns whether the page is now unlocked.
    pub fn try_unlock(&mut self, code: &str) -> bool {
        if self.is_unlocked() {
            return true;
        }
        if !self.entitlement.verify(code) {
            log::info!("Unlock rejected");
            return false;
        }
        self.store.set(&self.key, "true");
        log::info!("Unlocked full results ({})", self.key);
        true
    }

    pub fn lock(&mut self) {
        self.store.remove(&self.key);
    }
}
