use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A bookable service.  A `price` of zero marks a service that is quoted in
/// the shop ("Presupuesto") and contributes nothing to the cart total.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
pub(crate) struct Service {
    pub(crate) id: String,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) price: u32,
}

impl Service {
    pub(crate) fn new<I: Into<String>, N: Into<String>>(id: I, name: N, price: u32) -> Service {
        Service {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    pub(crate) fn is_quoted(&self) -> bool {
        self.price == 0
    }

    /// Price as displayed in listings
    pub(crate) fn price_label(&self) -> String {
        if self.is_quoted() {
            String::from("Presupuesto")
        } else {
            format!("{} €", self.price)
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Catalog {
    services: Vec<Service>,
}

// The file may either be a bare array of services or an object wrapping one
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Bare(Vec<Service>),
    Wrapped { services: Vec<Service> },
}

impl Catalog {
    pub(crate) fn new(services: Vec<Service>) -> Result<Catalog, CatalogError> {
        if services.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for s in &services {
            if !seen.insert(s.id.as_str()) {
                return Err(CatalogError::DuplicateId(s.id.clone()));
            }
        }
        Ok(Catalog { services })
    }

    pub(crate) fn load(path: &Path) -> Result<Catalog, CatalogError> {
        let src = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_owned(),
            source,
        })?;
        Catalog::from_json(&src).map_err(|e| match e {
            CatalogError::Parse(source) => CatalogError::ParseFile {
                path: path.to_owned(),
                source,
            },
            e => e,
        })
    }

    pub(crate) fn from_json(src: &str) -> Result<Catalog, CatalogError> {
        let file = serde_json::from_str::<CatalogFile>(src)
            .map_err(CatalogError::Parse)?;
        let services = match file {
            CatalogFile::Bare(services) | CatalogFile::Wrapped { services } => services,
        };
        Catalog::new(services)
    }

    pub(crate) fn services(&self) -> &[Service] {
        &self.services
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Service> {
        self.services.get(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.services.len()
    }
}

impl Default for Catalog {
    fn default() -> Catalog {
        Catalog {
            services: vec![
                Service::new("corte", "Corte de pelo", 15),
                Service::new("corte-lavado", "Corte y lavado", 20),
                Service::new("barba", "Arreglo de barba", 10),
                Service::new("peinado", "Peinado", 18),
                Service::new("tinte", "Tinte", 0),
                Service::new("mechas", "Mechas", 0),
                Service::new("tratamiento", "Tratamiento hidratante", 25),
            ],
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum CatalogError {
    #[error("failed to read catalog file {}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse catalog file {}", .path.display())]
    ParseFile {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to parse catalog")]
    Parse(#[source] serde_json::Error),
    #[error("catalog does not contain any services")]
    Empty,
    #[error("catalog contains more than one service with id {0:?}")]
    DuplicateId(String),
}
