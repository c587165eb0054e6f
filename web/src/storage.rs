use gloo::storage::{LocalStorage, Storage};
use memo_bits_core::{ScoreStore, StoreError};
use wasm_bindgen::JsValue;

/// Best-score store backed by the browser's `localStorage`.
///
/// Values go through the raw `web_sys::Storage` rather than gloo's JSON layer, so the record stays a plain base-10
/// string other tools can read.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LocalScoreStore;

impl ScoreStore for LocalScoreStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|err| StoreError::Unavailable(describe(&err)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| StoreError::Rejected(describe(&err)))
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}
