use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use super::{missing_fields, present};
use crate::error::ServiceError;

pub const INITIAL_PACKAGE_STATUS: &str = "Awaiting Packing";

/// In-memory package tracker. Lives as long as the process; nothing here is
/// written to the document store.
#[derive(Debug, Default)]
pub struct PackageRegistry {
    packages: DashMap<Uuid, String>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self) -> Uuid {
        let package_id = Uuid::new_v4();
        self.packages
            .insert(package_id, INITIAL_PACKAGE_STATUS.to_string());
        info!(package_id = %package_id, "package created");
        package_id
    }

    pub fn update(
        &self,
        package_id: Option<String>,
        status_code: Option<String>,
    ) -> Result<(), ServiceError> {
        // The status code is stored as sent; only blankness is checked.
        let status_code = status_code.filter(|code| !code.trim().is_empty());
        let (package_id, status_code) = match (present(package_id), status_code) {
            (Some(package_id), Some(status_code)) => (package_id, status_code),
            (package_id, status_code) => {
                return Err(missing_fields(&[
                    ("package_id", &package_id),
                    ("status_code", &status_code),
                ]));
            }
        };

        let id = parse_id(&package_id)?;
        let mut entry = self
            .packages
            .get_mut(&id)
            .ok_or(ServiceError::PackageNotFound(package_id))?;

        info!(package_id = %id, status = %status_code, "package updated");
        *entry = status_code;
        Ok(())
    }

    pub fn status(&self, package_id: Option<String>) -> Result<String, ServiceError> {
        let package_id = present(package_id).ok_or(ServiceError::MissingFields(vec!["package_id"]))?;
        let id = parse_id(&package_id)?;

        self.packages
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(ServiceError::PackageNotFound(package_id))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::PackageNotFound(raw.to_string()))
}
