use std::collections::HashMap;

use parking_lot::RwLock;
use pedagogy_algo::ItemParams;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankItem {
    pub id: String,
    pub params: ItemParams,
    /// Graded responses folded into `params.difficulty`
    pub responses: u64,
}

/// Calibrated item parameters, keyed by item id.
///
/// Items are validated on insert; everything read back is safe to score.
#[derive(Debug, Default)]
pub struct ItemBank {
    items: RwLock<HashMap<String, BankItem>>,
}

impl ItemBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<String>, params: ItemParams) -> Result<(), ServiceError> {
        params.validate()?;
        let id = id.into();
        let mut items = self.items.write();
        let responses = items.get(&id).map(|item| item.responses).unwrap_or(0);
        items.insert(
            id.clone(),
            BankItem {
                id,
                params,
                responses,
            },
        );
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<BankItem> {
        self.items.read().get(id).cloned()
    }

    pub fn params(&self, id: &str) -> Result<ItemParams, ServiceError> {
        self.items
            .read()
            .get(id)
            .map(|item| item.params)
            .ok_or_else(|| ServiceError::UnknownItem(id.to_string()))
    }

    /// Recalibrate an item's difficulty under the write lock and count the
    /// response. Returns the difficulty before and after.
    pub fn calibrate(
        &self,
        id: &str,
        recalibrate: impl FnOnce(&ItemParams) -> f64,
    ) -> Result<(f64, f64), ServiceError> {
        let mut items = self.items.write();
        let item = items
            .get_mut(id)
            .ok_or_else(|| ServiceError::UnknownItem(id.to_string()))?;
        let before = item.params.difficulty;
        let after = recalibrate(&item.params);
        item.params.difficulty = after;
        item.responses += 1;
        Ok((before, after))
    }

    /// Ids and parameters in id order
    pub fn snapshot(&self) -> Vec<(String, ItemParams)> {
        let mut items: Vec<(String, ItemParams)> = self
            .items
            .read()
            .values()
            .map(|item| (item.id.clone(), item.params))
            .collect();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        items
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}
