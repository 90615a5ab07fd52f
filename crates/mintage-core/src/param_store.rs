//! Parameter storage seam.
//!
//! The scheduler reads its [`Params`] through the [`ParamStore`] trait rather
//! than ambient global state, so tests can inject fixed bundles.
//! [`KvParamStore`] is the persistent implementation: one JSON-encoded value
//! per field under the module's parameter key table, all written in a single
//! batch.

use serde_json::{Map, Value};

use crate::constants::{
    KEY_BLOCKS_PER_UNIT, KEY_DECREASE, KEY_MINT_DENOM, KEY_TOTAL_SUPPLY, KEY_UNIT_COIN,
};
use crate::error::{MintError, ParamsError, StoreError};
use crate::params::Params;
use crate::store::KvStore;

/// Typed access to the module's parameter bundle.
///
/// Both directions validate: `get` never hands out an invalid bundle and
/// `set` rejects one before anything becomes visible to the scheduler.
pub trait ParamStore {
    /// Load the current parameters.
    ///
    /// # Errors
    ///
    /// - [`MintError::InvalidConfig`] if a field is missing or fails validation
    /// - [`MintError::StorageFault`] if the backing store fails or holds an
    ///   undecodable value
    fn get(&self) -> Result<Params, MintError>;

    /// Replace the current parameters.
    ///
    /// # Errors
    ///
    /// - [`MintError::InvalidConfig`] if `params` fails validation; nothing is written
    /// - [`MintError::StorageFault`] if the backing store fails
    fn set(&mut self, params: Params) -> Result<(), MintError>;
}

impl<P: ParamStore + ?Sized> ParamStore for &mut P {
    fn get(&self) -> Result<Params, MintError> {
        (**self).get()
    }

    fn set(&mut self, params: Params) -> Result<(), MintError> {
        (**self).set(params)
    }
}

/// A parameter bundle held in memory. Used as a deterministic fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedParams {
    params: Params,
}

impl FixedParams {
    /// Wrap `params`, rejecting an invalid bundle up front.
    pub fn new(params: Params) -> Result<Self, MintError> {
        params.validate()?;
        Ok(Self { params })
    }
}

impl ParamStore for FixedParams {
    fn get(&self) -> Result<Params, MintError> {
        Ok(self.params.clone())
    }

    fn set(&mut self, params: Params) -> Result<(), MintError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }
}

/// Field name → storage key for every persisted parameter.
const PARAM_KEY_TABLE: &[(&str, &[u8])] = &[
    ("mint_denom", KEY_MINT_DENOM),
    ("total_supply", KEY_TOTAL_SUPPLY),
    ("blocks_per_unit", KEY_BLOCKS_PER_UNIT),
    ("unit_coin", KEY_UNIT_COIN),
    ("decrease", KEY_DECREASE),
];

/// Parameter subspace stored in a [`KvStore`].
///
/// The store passed in should already be scoped to the parameter namespace
/// (see [`Prefixed`](crate::store::Prefixed)).
#[derive(Debug, Clone)]
pub struct KvParamStore<S> {
    store: S,
}

impl<S: KvStore> KvParamStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Whether any parameter has been written yet.
    pub fn is_initialized(&self) -> Result<bool, MintError> {
        for (_, key) in PARAM_KEY_TABLE {
            if self.store.has(key)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<S: KvStore> ParamStore for KvParamStore<S> {
    fn get(&self) -> Result<Params, MintError> {
        let mut fields = Map::new();
        for (name, key) in PARAM_KEY_TABLE {
            let bytes = self.store.get(key)?.ok_or(ParamsError::Missing(*name))?;
            let value: Value = serde_json::from_slice(&bytes).map_err(|e| corrupt(key, e))?;
            fields.insert((*name).to_string(), value);
        }

        let params: Params = serde_json::from_value(Value::Object(fields))
            .map_err(|e| StoreError::Corrupt {
                key: "params".to_string(),
                reason: e.to_string(),
            })?;
        params.validate()?;
        Ok(params)
    }

    fn set(&mut self, params: Params) -> Result<(), MintError> {
        params.validate()?;

        let Value::Object(fields) =
            serde_json::to_value(&params).map_err(|e| StoreError::Encoding(e.to_string()))?
        else {
            return Err(StoreError::Encoding("params did not encode as an object".into()).into());
        };

        let mut encoded = Vec::with_capacity(PARAM_KEY_TABLE.len());
        for (name, key) in PARAM_KEY_TABLE {
            let value = fields
                .get(*name)
                .ok_or_else(|| StoreError::Encoding(format!("missing field {name}")))?;
            let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Encoding(e.to_string()))?;
            encoded.push((*key, bytes));
        }

        // One batch: a failed write never leaves a mix of old and new fields.
        let batch: Vec<(&[u8], &[u8])> = encoded
            .iter()
            .map(|(key, bytes)| (*key, bytes.as_slice()))
            .collect();
        self.store.write_batch(&batch)?;
        Ok(())
    }
}

fn corrupt(key: &[u8], err: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt {
        key: String::from_utf8_lossy(key).into_owned(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn params() -> Params {
        Params::new("stake", 10_000, 100, 1_000, 90)
    }

    // ------------------------------------------------------------------
    // FixedParams
    // ------------------------------------------------------------------

    #[test]
    fn fixed_params_round_trip() {
        let mut fixed = FixedParams::new(params()).unwrap();
        assert_eq!(fixed.get().unwrap(), params());

        let updated = Params { decrease: 50, ..params() };
        fixed.set(updated.clone()).unwrap();
        assert_eq!(fixed.get().unwrap(), updated);
    }

    #[test]
    fn fixed_params_rejects_invalid_bundle() {
        let bad = Params { blocks_per_unit: 0, ..params() };
        assert!(matches!(FixedParams::new(bad), Err(MintError::InvalidConfig(_))));
    }

    #[test]
    fn fixed_params_rejected_set_keeps_previous() {
        let mut fixed = FixedParams::new(params()).unwrap();
        let bad = Params { total_supply: -1, ..params() };
        assert_eq!(
            fixed.set(bad),
            Err(MintError::InvalidConfig(ParamsError::TotalSupplyTooSmall(-1)))
        );
        assert_eq!(fixed.get().unwrap(), params());
    }

    // ------------------------------------------------------------------
    // KvParamStore
    // ------------------------------------------------------------------

    #[test]
    fn kv_params_missing_before_first_set() {
        let store = KvParamStore::new(MemoryStore::new());
        assert!(!store.is_initialized().unwrap());
        assert_eq!(
            store.get(),
            Err(MintError::InvalidConfig(ParamsError::Missing("mint_denom")))
        );
    }

    #[test]
    fn kv_params_set_then_get() {
        let mut store = KvParamStore::new(MemoryStore::new());
        store.set(Params::default()).unwrap();
        assert!(store.is_initialized().unwrap());
        assert_eq!(store.get().unwrap(), Params::default());
    }

    #[test]
    fn kv_params_written_under_key_table() {
        let mut store = KvParamStore::new(MemoryStore::new());
        store.set(params()).unwrap();
        let backing = store.into_inner();
        assert_eq!(backing.len(), PARAM_KEY_TABLE.len());
        assert_eq!(backing.get(KEY_MINT_DENOM).unwrap(), Some(br#""stake""#.to_vec()));
        assert_eq!(backing.get(KEY_TOTAL_SUPPLY).unwrap(), Some(br#""10000""#.to_vec()));
        assert_eq!(backing.get(KEY_BLOCKS_PER_UNIT).unwrap(), Some(b"100".to_vec()));
    }

    #[test]
    fn kv_params_invalid_set_writes_nothing() {
        let mut store = KvParamStore::new(MemoryStore::new());
        let bad = Params { blocks_per_unit: 0, ..params() };
        assert!(matches!(store.set(bad), Err(MintError::InvalidConfig(_))));
        assert!(store.into_inner().is_empty());
    }

    /// Store whose backend gives out after a fixed number of key writes.
    /// Batches are staged and applied only if every entry fits.
    struct DiskFullStore {
        inner: MemoryStore,
        writes_left: usize,
    }

    impl KvStore for DiskFullStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
            if self.writes_left == 0 {
                return Err(StoreError::Backend("disk full".into()));
            }
            self.writes_left -= 1;
            self.inner.set(key, value)
        }

        fn write_batch(&mut self, entries: &[(&[u8], &[u8])]) -> Result<(), StoreError> {
            if entries.len() > self.writes_left {
                return Err(StoreError::Backend("disk full".into()));
            }
            self.writes_left -= entries.len();
            self.inner.write_batch(entries)
        }
    }

    #[test]
    fn kv_params_failed_set_keeps_previous_bundle() {
        let mut backing = MemoryStore::new();
        KvParamStore::new(&mut backing).set(params()).unwrap();

        let mut store = KvParamStore::new(DiskFullStore {
            inner: backing,
            writes_left: 2,
        });
        let update = Params::new("umint", 50_000, 7, 3, 50);
        assert_eq!(
            store.set(update),
            Err(MintError::StorageFault(StoreError::Backend("disk full".into())))
        );
        assert_eq!(store.get().unwrap(), params());
    }

    #[test]
    fn kv_params_failed_genesis_leaves_store_uninitialized() {
        let mut store = KvParamStore::new(DiskFullStore {
            inner: MemoryStore::new(),
            writes_left: 2,
        });
        assert!(store.set(params()).is_err());
        assert!(!store.is_initialized().unwrap());
        assert!(store.into_inner().inner.is_empty());
    }

    #[test]
    fn kv_params_invalid_stored_value_rejected_on_get() {
        let mut backing = MemoryStore::new();
        KvParamStore::new(&mut backing).set(params()).unwrap();
        backing.set(KEY_UNIT_COIN, br#""0""#).unwrap();
        assert_eq!(
            KvParamStore::new(&mut backing).get(),
            Err(MintError::InvalidConfig(ParamsError::UnitCoinTooSmall(0)))
        );
    }

    #[test]
    fn kv_params_undecodable_value_is_storage_fault() {
        let mut backing = MemoryStore::new();
        KvParamStore::new(&mut backing).set(params()).unwrap();
        backing.set(KEY_DECREASE, b"\xff\xfe").unwrap();
        assert!(matches!(
            KvParamStore::new(&mut backing).get(),
            Err(MintError::StorageFault(StoreError::Corrupt { .. }))
        ));
    }
}
