use std::collections::HashMap;

use async_trait::async_trait;
use kitprice_core::{StoreError, Worksheet, WorksheetEdit, WorksheetStore};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct InMemoryWorksheetStore {
    worksheets: RwLock<HashMap<Uuid, Worksheet>>,
    max_worksheets: usize,
}

impl InMemoryWorksheetStore {
    pub fn new(max_worksheets: usize) -> Self {
        Self {
            worksheets: RwLock::new(HashMap::new()),
            max_worksheets,
        }
    }
}

#[async_trait]
impl WorksheetStore for InMemoryWorksheetStore {
    async fn insert(&self, worksheet: Worksheet) -> Result<Worksheet, StoreError> {
        let mut worksheets = self.worksheets.write().await;
        if worksheets.contains_key(&worksheet.id) {
            return Err(anyhow::anyhow!("worksheet {} already exists", worksheet.id).into());
        }
        if worksheets.len() >= self.max_worksheets {
            warn!(max_worksheets = self.max_worksheets, "worksheet store is full");
            return Err(StoreError::CapacityReached(self.max_worksheets));
        }

        debug!(worksheet_id = %worksheet.id, rows = worksheet.rows.len(), "worksheet stored");
        worksheets.insert(worksheet.id, worksheet.clone());
        Ok(worksheet)
    }

    async fn load(&self, id: Uuid) -> Result<Option<Worksheet>, StoreError> {
        let worksheets = self.worksheets.read().await;
        Ok(worksheets.get(&id).cloned())
    }

    async fn update<'a>(&self, id: Uuid, edit: WorksheetEdit<'a>) -> Result<Worksheet, StoreError> {
        let mut worksheets = self.worksheets.write().await;
        let stored = worksheets.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let mut edited = stored.clone();
        edit(&mut edited)?;
        *stored = edited.clone();
        Ok(edited)
    }

    async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut worksheets = self.worksheets.write().await;
        Ok(worksheets.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kitprice_core::{RowEdit, WorksheetError, worksheet_edit};
    use rust_decimal::Decimal;

    use super::*;

    #[tokio::test]
    async fn insert_then_load() {
        let store = InMemoryWorksheetStore::new(10);
        let sheet = store.insert(Worksheet::new(2, 10)).await.unwrap();

        let loaded = store.load(sheet.id).await.unwrap().unwrap();
        assert_eq!(loaded, sheet);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let store = InMemoryWorksheetStore::new(10);
        let sheet = store.insert(Worksheet::new(1, 10)).await.unwrap();
        assert!(matches!(
            store.insert(sheet).await,
            Err(StoreError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn insert_stops_at_capacity() {
        let store = InMemoryWorksheetStore::new(2);
        let first = store.insert(Worksheet::new(1, 10)).await.unwrap();
        store.insert(Worksheet::new(1, 10)).await.unwrap();

        assert!(matches!(
            store.insert(Worksheet::new(1, 10)).await,
            Err(StoreError::CapacityReached(2))
        ));

        assert!(store.remove(first.id).await.unwrap());
        assert!(store.insert(Worksheet::new(1, 10)).await.is_ok());
    }

    #[tokio::test]
    async fn update_applies_edit_and_returns_stored_copy() {
        let store = InMemoryWorksheetStore::new(10);
        let sheet = store.insert(Worksheet::new(1, 10)).await.unwrap();

        let updated = store
            .update(
                sheet.id,
                worksheet_edit(|worksheet| {
                    worksheet.set_kit_price("42");
                    Ok(())
                }),
            )
            .await
            .unwrap();
        assert_eq!(updated.kit_price.get(), Decimal::from(42));

        let loaded = store.load(sheet.id).await.unwrap().unwrap();
        assert_eq!(loaded, updated);
    }

    #[tokio::test]
    async fn failed_edit_leaves_worksheet_untouched() {
        let store = InMemoryWorksheetStore::new(10);
        let sheet = store.insert(Worksheet::new(1, 1)).await.unwrap();

        let result = store
            .update(
                sheet.id,
                worksheet_edit(|worksheet| {
                    worksheet.set_kit_price("10");
                    worksheet.add_row()?;
                    Ok(())
                }),
            )
            .await;
        assert!(matches!(
            result,
            Err(StoreError::Worksheet(WorksheetError::RowLimitReached(1)))
        ));

        let loaded = store.load(sheet.id).await.unwrap().unwrap();
        assert_eq!(loaded, sheet);
    }

    #[tokio::test]
    async fn update_of_unknown_worksheet_is_not_found() {
        let store = InMemoryWorksheetStore::new(10);
        let missing = Uuid::new_v4();
        let result = store.update(missing, worksheet_edit(|_| Ok(()))).await;
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == missing));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_edits_to_different_rows_all_land() {
        let store = Arc::new(InMemoryWorksheetStore::new(10));
        let sheet = store.insert(Worksheet::new(32, 32)).await.unwrap();
        let sheet_id = sheet.id;

        let tasks: Vec<_> = sheet
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let store = Arc::clone(&store);
                let row_id = row.id;
                let price = (index + 1).to_string();
                tokio::spawn(async move {
                    store
                        .update(
                            sheet_id,
                            worksheet_edit(move |worksheet| {
                                let edit = RowEdit {
                                    unit_list_price: Some(price),
                                    ..RowEdit::default()
                                };
                                worksheet.edit_row(row_id, edit)?;
                                Ok(())
                            }),
                        )
                        .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let loaded = store.load(sheet_id).await.unwrap().unwrap();
        for (index, row) in loaded.rows.iter().enumerate() {
            assert_eq!(row.unit_list_price.get(), Decimal::from(index + 1));
        }
    }

    #[tokio::test]
    async fn remove_reports_whether_anything_was_dropped() {
        let store = InMemoryWorksheetStore::new(10);
        let sheet = store.insert(Worksheet::new(1, 10)).await.unwrap();

        assert!(store.remove(sheet.id).await.unwrap());
        assert!(!store.remove(sheet.id).await.unwrap());
        assert!(store.load(sheet.id).await.unwrap().is_none());
    }
}
