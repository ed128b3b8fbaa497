use std::{fs, io, path::Path};

use serde_json::{Map, Value};

use crate::entity_container::EntityContainer;

pub const PROJECT_FILE_NAME: &str = "project.json";
pub const PROJECT_FORMAT_VERSION: &str = "1.0.0";

#[derive(Debug)]
pub enum ProjectError {
    Io(io::Error),
    Json(serde_json::Error),
    MissingEntityList,
}

impl From<io::Error> for ProjectError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ProjectError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Writes every live entity into `<project_dir>/project.json`, creating the
/// directory first.
pub fn save_project(container: &EntityContainer, project_dir: &Path) -> Result<(), ProjectError> {
    let mut entities = Vec::new();
    for entity_id in container.iter_entity_ids() {
        match container.serialize_entity(entity_id) {
            Ok(document) => entities.push(document),
            Err(e) => log::error!("could not serialize entity {entity_id}, msg = {e:?}"),
        }
    }

    let mut document = Map::new();
    document.insert("version".to_string(), Value::from(PROJECT_FORMAT_VERSION));
    document.insert("entities".to_string(), Value::Array(entities));

    fs::create_dir_all(project_dir)?;
    let contents = serde_json::to_string_pretty(&Value::Object(document))?;
    fs::write(project_dir.join(PROJECT_FILE_NAME), contents)?;
    Ok(())
}

/// Replaces the container's live entities with the ones stored in the
/// project file. Component kinds and systems registered on the container are
/// left untouched so the loaded documents can be resolved against them.
/// Returns the number of entities loaded; malformed entries are skipped.
pub fn load_project(
    container: &mut EntityContainer,
    project_dir: &Path,
) -> Result<usize, ProjectError> {
    let contents = fs::read_to_string(project_dir.join(PROJECT_FILE_NAME))?;
    let document: Value = serde_json::from_str(&contents)?;

    if let Some(version) = document.get("version").and_then(Value::as_str) {
        if version != PROJECT_FORMAT_VERSION {
            log::warn!(
                "project file version {version:?} differs from {PROJECT_FORMAT_VERSION:?}"
            );
        }
    }

    let entities = document
        .get("entities")
        .and_then(Value::as_array)
        .ok_or(ProjectError::MissingEntityList)?;

    container.destroy_all_entities();

    let mut loaded = 0;
    for entity_document in entities {
        match container.deserialize_entity(entity_document) {
            Ok(_) => loaded += 1,
            Err(e) => log::error!("skipping project entity, msg = {e:?}"),
        }
    }

    Ok(loaded)
}
