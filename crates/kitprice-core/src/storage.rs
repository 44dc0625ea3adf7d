use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::worksheet::{Worksheet, WorksheetError};

/// An in-place edit applied by [`WorksheetStore::update`].
///
/// A failed edit leaves the stored worksheet unchanged.
pub type WorksheetEdit<'a> =
    Box<dyn FnOnce(&mut Worksheet) -> Result<(), WorksheetError> + Send + 'a>;

/// Boxes a closure as a [`WorksheetEdit`].
pub fn worksheet_edit<'a, F>(edit: F) -> WorksheetEdit<'a>
where
    F: FnOnce(&mut Worksheet) -> Result<(), WorksheetError> + Send + 'a,
{
    Box::new(edit)
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("worksheet {0} not found")]
    NotFound(Uuid),
    #[error("store already holds the maximum of {0} worksheets")]
    CapacityReached(usize),
    #[error(transparent)]
    Worksheet(#[from] WorksheetError),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait WorksheetStore: Send + Sync {
    async fn insert(&self, worksheet: Worksheet) -> Result<Worksheet, StoreError>;
    async fn load(&self, id: Uuid) -> Result<Option<Worksheet>, StoreError>;
    /// Runs `edit` against the stored worksheet with no other writer in
    /// between, and returns the worksheet as stored afterwards.
    async fn update<'a>(&self, id: Uuid, edit: WorksheetEdit<'a>) -> Result<Worksheet, StoreError>;
    async fn remove(&self, id: Uuid) -> Result<bool, StoreError>;
}
