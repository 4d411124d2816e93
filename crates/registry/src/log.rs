//! Audit trail writer.
//!
//! A `TransactionsLog` wraps one open transaction row. Engine calls
//! open it right after validation succeeds, log one operation per
//! entity write, and close it before committing. Because the log rows
//! ride on the same store transaction as the entity writes, a rollback
//! discards both together.

use grove_db::models::audit::{OpType, Operation, Transaction};
use grove_db::repositories::{OperationRepo, TransactionRepo};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::context::RegistryContext;
use crate::error::Error;

/// An open audit transaction.
pub struct TransactionsLog {
    tuid: String,
}

impl TransactionsLog {
    /// Open a transaction named after the engine call (for example
    /// `add_ecosystem`), authored by the calling user.
    pub async fn open(
        conn: &mut PgConnection,
        name: &str,
        ctx: &RegistryContext,
    ) -> Result<Self, Error> {
        let tuid = Uuid::new_v4().to_string();
        TransactionRepo::insert(conn, &tuid, name, Some(&ctx.username)).await?;
        tracing::debug!(tuid = %tuid, name, "transaction opened");
        Ok(Self { tuid })
    }

    /// Record one operation. `args` must be the snapshot of the call's
    /// input arguments taken before the write they describe.
    pub async fn log_operation(
        &self,
        conn: &mut PgConnection,
        op_type: OpType,
        entity_type: &str,
        target: &str,
        args: serde_json::Value,
    ) -> Result<Operation, Error> {
        let ouid = Uuid::new_v4().to_string();
        let operation =
            OperationRepo::insert(conn, &ouid, &self.tuid, op_type, entity_type, target, &args)
                .await?;
        tracing::debug!(
            tuid = %self.tuid,
            ouid = %ouid,
            op_type = op_type.as_str(),
            entity_type,
            target,
            "operation logged"
        );
        Ok(operation)
    }

    /// Close the transaction, stamping `closed_at`.
    pub async fn close(self, conn: &mut PgConnection) -> Result<Transaction, Error> {
        let transaction = TransactionRepo::close(conn, &self.tuid).await?;
        tracing::debug!(tuid = %self.tuid, "transaction closed");
        Ok(transaction)
    }

    pub fn tuid(&self) -> &str {
        &self.tuid
    }
}
