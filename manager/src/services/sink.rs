//! In-memory transaction sink

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::{StoredTransaction, TransactionEvent, TransactionQuery};

use crate::error::ManagerResult;
use crate::traits::TransactionSink;

#[derive(Debug, Default)]
pub struct InMemoryTransactionSink {
    transactions: RwLock<Vec<StoredTransaction>>,
}

impl InMemoryTransactionSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TransactionSink for InMemoryTransactionSink {
    async fn append(&self, event: TransactionEvent) -> ManagerResult<StoredTransaction> {
        let stored = StoredTransaction {
            transaction_id: Uuid::new_v4(),
            event,
            created_at: Utc::now(),
        };
        self.transactions.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn query(&self, query: TransactionQuery) -> ManagerResult<Vec<StoredTransaction>> {
        let transactions = self.transactions.read().await;
        let mut matching: Vec<StoredTransaction> = transactions
            .iter()
            .filter(|stored| query.device_id.map_or(true, |id| stored.event.device_id == id))
            .filter(|stored| {
                query
                    .event_type
                    .as_deref()
                    .map_or(true, |event_type| stored.event.event_type == event_type)
            })
            .cloned()
            .collect();

        // Stable sort keeps later appends first among equal timestamps
        matching.reverse();
        matching.sort_by(|a, b| b.event.timestamp.cmp(&a.event.timestamp));
        matching.truncate(query.effective_limit());
        Ok(matching)
    }
}
