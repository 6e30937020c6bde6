use serde::{de::DeserializeOwned, Serialize};

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    if let Some(storage) = local_storage() {
        if let Ok(Some(raw)) = storage.get_item(key) {
            match serde_json::from_str::<T>(&raw) {
                Ok(value) => return Some(value),
                Err(err) => log::warn!("discarding unreadable '{}' from storage: {}", key, err),
            }
        }
    }
    None
}

pub fn save<T: Serialize>(key: &str, value: &T) {
    if let Some(storage) = local_storage() {
        if let Ok(raw) = serde_json::to_string(value) {
            if storage.set_item(key, &raw).is_err() {
                log::warn!("could not write '{}' to storage", key);
            }
        }
    }
}

pub fn remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}
