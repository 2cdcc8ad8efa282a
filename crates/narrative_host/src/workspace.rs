//! Workspace (object storage) service contract.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{staging::service::StagingFuture, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Subset of the workspace object-info tuple the widgets display.
pub struct ObjectInfo {
    /// Object reference (`ws/obj/ver`).
    pub upa: String,
    /// Object display name.
    pub name: String,
    /// Workspace type string.
    pub type_string: String,
}

/// Workspace service lookups used to resolve import provenance.
pub trait WorkspaceService {
    /// Resolves one object reference to its info record.
    fn get_object_info<'a>(
        &'a self,
        reference: &'a str,
    ) -> StagingFuture<'a, Result<ObjectInfo, ServiceError>>;
}

#[derive(Debug, Clone, Default)]
/// In-memory workspace adapter keyed by object reference.
pub struct MemoryWorkspaceService {
    objects: Rc<RefCell<HashMap<String, Result<ObjectInfo, ServiceError>>>>,
    lookups: Rc<RefCell<Vec<String>>>,
}

impl MemoryWorkspaceService {
    /// Registers an object under its reference.
    pub fn with_object(self, upa: &str, name: &str, type_string: &str) -> Self {
        self.objects.borrow_mut().insert(
            upa.to_string(),
            Ok(ObjectInfo {
                upa: upa.to_string(),
                name: name.to_string(),
                type_string: type_string.to_string(),
            }),
        );
        self
    }

    /// Makes lookups of `upa` fail.
    pub fn with_error(self, upa: &str, err: ServiceError) -> Self {
        self.objects.borrow_mut().insert(upa.to_string(), Err(err));
        self
    }

    /// References looked up so far.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.borrow().clone()
    }
}

impl WorkspaceService for MemoryWorkspaceService {
    fn get_object_info<'a>(
        &'a self,
        reference: &'a str,
    ) -> StagingFuture<'a, Result<ObjectInfo, ServiceError>> {
        Box::pin(async move {
            self.lookups.borrow_mut().push(reference.to_string());
            self.objects
                .borrow()
                .get(reference)
                .cloned()
                .unwrap_or_else(|| {
                    Err(ServiceError::Rpc(format!(
                        "No object with reference {reference} exists"
                    )))
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn memory_workspace_resolves_registered_objects() {
        let ws = MemoryWorkspaceService::default().with_object("1/2/3", "reads", "KBaseFile.PairedEndLibrary");
        let info = block_on(ws.get_object_info("1/2/3")).expect("info");
        assert_eq!(info.name, "reads");

        let err = block_on(ws.get_object_info("9/9/9")).expect_err("missing");
        assert!(err.body().contains("9/9/9"));
        assert_eq!(ws.lookups(), vec!["1/2/3".to_string(), "9/9/9".to_string()]);
    }
}
