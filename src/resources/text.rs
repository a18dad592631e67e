//! Typed access to plain-text resources.

use crate::error::EngineError;

use super::{Codec, LoadTicket, ResourceMap};

pub fn load(map: &mut ResourceMap, key: &str) -> Option<LoadTicket> {
    map.load(key, Codec::Text)
}

/// The decoded text for `key`, or [`EngineError::NotLoaded`].
pub fn get<'a>(map: &'a ResourceMap, key: &str) -> Result<&'a str, EngineError> {
    map.get(key)?
        .as_text()
        .ok_or_else(|| EngineError::NotLoaded(key.to_string()))
}

pub fn unload(map: &mut ResourceMap, key: &str) -> bool {
    map.unload(key)
}
