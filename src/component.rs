use std::any::Any;

use serde::{de::DeserializeOwned, Serialize};

/// Structured document type exchanged with component self-(de)serialization.
pub type Document = serde_json::Value;

pub trait Component: Any {
    fn to_document(&self) -> Document;
    fn apply_document(&mut self, document: &Document);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> Component for T
where
    T: Any + Serialize + DeserializeOwned,
{
    fn to_document(&self) -> Document {
        match serde_json::to_value(self) {
            Ok(document) => document,
            Err(e) => {
                log::error!("could not serialize component, msg = {e}");
                Document::Null
            }
        }
    }

    fn apply_document(&mut self, document: &Document) {
        match serde_json::from_value(document.clone()) {
            Ok(component) => *self = component,
            Err(e) => {
                log::warn!("could not deserialize component, keeping its current values, msg = {e}")
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
