use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::types::db::id_sequence::{self, ActiveModel, Entity as IdSequence};

/// SequenceStore hands out monotonically increasing numbers per named sequence
///
/// Each call to `next_value` bumps the row with a single UPDATE, so concurrent
/// transactions on the same sequence serialize at the database and never see
/// the same value. Values are never handed back.
pub struct SequenceStore {}

impl SequenceStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Advance the sequence and return the value just issued
    ///
    /// # Returns
    /// * `Ok(i64)` - The new last value of the sequence
    /// * `Err(InternalError)` - Sequence row missing or database error
    pub async fn next_value(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<i64, InternalError> {
        let result = IdSequence::update_many()
            .col_expr(
                id_sequence::Column::LastValue,
                Expr::col(id_sequence::Column::LastValue).add(1),
            )
            .filter(id_sequence::Column::Name.eq(name))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("advance_sequence", e))?;

        if result.rows_affected == 0 {
            return Err(AccountError::SequenceMissing { name: name.to_string() }.into());
        }

        let sequence = IdSequence::find_by_id(name.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("read_sequence", e))?
            .ok_or_else(|| AccountError::SequenceMissing { name: name.to_string() })?;

        Ok(sequence.last_value)
    }

    /// Last issued value, or None when the sequence does not exist
    pub async fn current_value(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<i64>, InternalError> {
        let sequence = IdSequence::find_by_id(name.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("read_sequence", e))?;

        Ok(sequence.map(|s| s.last_value))
    }

    /// Create a sequence whose next issued value is `last_value + 1`
    pub async fn create_sequence(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
        last_value: i64,
    ) -> Result<(), InternalError> {
        let sequence = ActiveModel {
            name: Set(name.to_string()),
            last_value: Set(last_value),
        };

        sequence
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_sequence", e))?;

        tracing::info!("Created id sequence '{}' starting after {}", name, last_value);

        Ok(())
    }
}

impl std::fmt::Debug for SequenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceStore").finish()
    }
}
