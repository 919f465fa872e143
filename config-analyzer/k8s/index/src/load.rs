use crate::{Collection, Kind, Snapshot};
use mesh_config_analyzer_k8s_api::{self as k8s, TypeMeta};
use serde::Deserialize;
use serde_yaml::Value;
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, instrument};

/// Reads resources from standard input when given as a path.
pub const STDIN: &str = "-";

/// Names standard input in errors and logs.
pub const STDIN_ORIGIN: &str = "<stdin>";

const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Builds a [`Snapshot`] from YAML or JSON manifests.
#[derive(Clone, Debug)]
pub struct Loader {
    /// Applied to resources that don't specify a namespace.
    default_namespace: String,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {origin}: {error}")]
    Read {
        origin: String,
        #[source]
        error: io::Error,
    },

    #[error("failed to parse {origin}: {error}")]
    Parse {
        origin: String,
        #[source]
        error: serde_yaml::Error,
    },

    #[error("invalid resource in {origin}: {error}")]
    Invalid {
        origin: String,
        #[source]
        error: crate::Error,
    },
}

// === impl Loader ===

impl Loader {
    pub fn new(default_namespace: impl Into<String>) -> Self {
        Self {
            default_namespace: default_namespace.into(),
        }
    }

    /// Loads every manifest at the given paths, descending into directories. Returns the number of
    /// resources added to the snapshot.
    pub fn load_paths<P: AsRef<Path>>(
        &self,
        snapshot: &mut Snapshot,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<usize, Error> {
        let mut loaded = 0;
        for path in paths {
            let path = path.as_ref();
            if path == Path::new(STDIN) {
                loaded += self.load_reader(snapshot, STDIN_ORIGIN, io::stdin().lock())?;
                continue;
            }

            for file in manifest_files(path)? {
                let origin = file.display().to_string();
                let contents = fs::read_to_string(&file).map_err(|error| Error::Read {
                    origin: origin.clone(),
                    error,
                })?;
                loaded += self.load_str(snapshot, &origin, &contents)?;
            }
        }
        Ok(loaded)
    }

    /// Reads a manifest to completion before loading it.
    pub fn load_reader(
        &self,
        snapshot: &mut Snapshot,
        origin: &str,
        reader: impl Read,
    ) -> Result<usize, Error> {
        let contents = io::read_to_string(reader).map_err(|error| Error::Read {
            origin: origin.to_string(),
            error,
        })?;
        self.load_str(snapshot, origin, &contents)
    }

    /// Loads a (possibly multi-document) manifest. `origin` names the source in errors and logs.
    #[instrument(skip(self, snapshot, contents))]
    pub fn load_str(
        &self,
        snapshot: &mut Snapshot,
        origin: &str,
        contents: &str,
    ) -> Result<usize, Error> {
        // Every supported collection is considered provided once manifests are read, so that
        // analyzers run even when no resources of a kind were found.
        for collection in Collection::ALL {
            snapshot.enable(collection);
        }

        let mut loaded = 0;
        for doc in serde_yaml::Deserializer::from_str(contents) {
            let value = Value::deserialize(doc).map_err(|error| Error::Parse {
                origin: origin.to_string(),
                error,
            })?;
            loaded += self.load_value(snapshot, origin, value)?;
        }
        debug!(loaded, "Loaded manifest");
        Ok(loaded)
    }

    fn load_value(&self, snapshot: &mut Snapshot, origin: &str, value: Value) -> Result<usize, Error> {
        if value.is_null() {
            return Ok(0);
        }

        let types = serde_yaml::from_value::<TypeMeta>(value.clone()).map_err(|error| {
            Error::Parse {
                origin: origin.to_string(),
                error,
            }
        })?;

        if types.kind == "List" {
            let items = match value {
                Value::Mapping(mut map) => map.remove("items"),
                _ => None,
            };
            let mut loaded = 0;
            if let Some(Value::Sequence(items)) = items {
                for item in items {
                    loaded += self.load_value(snapshot, origin, item)?;
                }
            }
            return Ok(loaded);
        }

        if is_kind::<k8s::Gateway>(&types) {
            return self.apply::<k8s::Gateway>(snapshot, origin, with_spec(value));
        }

        if is_kind::<k8s::Pod>(&types) {
            return self.apply::<k8s::Pod>(snapshot, origin, value);
        }

        if is_kind::<k8s::Secret>(&types) {
            return self.apply::<k8s::Secret>(snapshot, origin, value);
        }

        debug!(
            api_version = %types.api_version,
            kind = %types.kind,
            "Skipping unsupported resource"
        );
        Ok(0)
    }

    fn apply<K: Kind>(
        &self,
        snapshot: &mut Snapshot,
        origin: &str,
        value: Value,
    ) -> Result<usize, Error> {
        let mut resource = serde_yaml::from_value::<K>(value).map_err(|error| Error::Parse {
            origin: origin.to_string(),
            error,
        })?;

        let meta = resource.meta_mut();
        if meta.namespace.as_deref().map_or(true, str::is_empty) {
            meta.namespace = Some(self.default_namespace.clone());
        }

        let replaced = snapshot.apply(resource).map_err(|error| Error::Invalid {
            origin: origin.to_string(),
            error,
        })?;
        if replaced.is_some() {
            debug!(collection = %K::COLLECTION, "Replaced duplicate resource");
        }
        Ok(1)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new("default")
    }
}

/// Gateways without a `spec` select everything and expose no listeners.
fn with_spec(mut value: Value) -> Value {
    if let Value::Mapping(map) = &mut value {
        if map.get("spec").map_or(true, Value::is_null) {
            map.insert(
                Value::from("spec"),
                Value::Mapping(serde_yaml::Mapping::new()),
            );
        }
    }
    value
}

/// Matches on group and kind so that every served version of a resource is accepted.
fn is_kind<K: Kind>(types: &TypeMeta) -> bool {
    let group = types
        .api_version
        .rsplit_once('/')
        .map(|(group, _)| group)
        .unwrap_or("");
    types.kind == K::kind(&()) && group == K::group(&())
}

/// Lists the manifest files at `path`, recursing through directories in sorted order.
fn manifest_files(path: &Path) -> Result<Vec<PathBuf>, Error> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let read_err = |error| Error::Read {
        origin: path.display().to_string(),
        error,
    };
    let mut entries = fs::read_dir(path)
        .map_err(read_err)?
        .map(|e| e.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()
        .map_err(read_err)?;
    entries.sort();

    let mut files = Vec::new();
    for entry in entries {
        if entry.is_dir() {
            files.extend(manifest_files(&entry)?);
        } else if entry
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| MANIFEST_EXTENSIONS.contains(&ext))
        {
            files.push(entry);
        }
    }
    Ok(files)
}
