use chrono::Utc;
use migration::ACCOUNT_SEQUENCE;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, SqlErr,
};

use crate::errors::InternalError;
use crate::errors::internal::AccountError;
use crate::stores::SequenceStore;
use crate::types::db::user::{self, ActiveModel, Entity as User};
use crate::types::internal::{AccountEvent, AccountEventKind, AccountId, SaveOutcome, UserAccount};

/// UserStore persists user accounts and assigns their identifiers
///
/// All methods take a connection so callers decide the transaction scope.
pub struct UserStore {
    sequence_store: SequenceStore,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            sequence_store: SequenceStore::new(),
        }
    }

    /// Normalize an email address
    ///
    /// Lower-cases the domain part and keeps the local part as given, since
    /// mailbox names may be case sensitive. Addresses without `@` are returned
    /// trimmed but otherwise unchanged.
    pub fn normalize_email(email: &str) -> String {
        let email = email.trim();
        match email.rsplit_once('@') {
            Some((local, domain)) => format!("{}@{}", local, domain.to_lowercase()),
            None => email.to_string(),
        }
    }

    /// Highest identifier currently stored, compared as strings
    ///
    /// The fixed prefix and width make the string maximum equal to the
    /// numeric maximum.
    pub async fn query_max_id(&self, conn: &impl ConnectionTrait) -> Result<Option<String>, InternalError> {
        let max_id: Option<Option<String>> = User::find()
            .select_only()
            .column_as(user::Column::Id.max(), "max_id")
            .into_tuple()
            .one(conn)
            .await
            .map_err(|e| InternalError::database("query_max_id", e))?;

        Ok(max_id.flatten())
    }

    /// Create the account sequence for a database that has accounts but no
    /// sequence row, so numbering carries on after the highest stored id
    async fn seed_sequence(&self, conn: &impl ConnectionTrait) -> Result<(), InternalError> {
        let seed = match self.query_max_id(conn).await? {
            Some(max_id) => max_id.parse::<AccountId>()?.number(),
            None => 0,
        };

        self.sequence_store.create_sequence(conn, ACCOUNT_SEQUENCE, seed).await
    }

    /// Issue the next account identifier
    ///
    /// The sequence UPDATE must be the first statement of the surrounding
    /// transaction. SQLite then takes the write lock up front and waits on a
    /// busy writer instead of failing a shared-to-write lock upgrade.
    ///
    /// # Returns
    /// * `Ok(AccountId)` - A never-before-issued identifier
    /// * `Err(InternalError)` - Identifier space exhausted or database error
    pub async fn assign_identifier(&self, conn: &impl ConnectionTrait) -> Result<AccountId, InternalError> {
        let number = match self.sequence_store.next_value(conn, ACCOUNT_SEQUENCE).await {
            Err(InternalError::Account(AccountError::SequenceMissing { .. })) => {
                self.seed_sequence(conn).await?;
                self.sequence_store.next_value(conn, ACCOUNT_SEQUENCE).await?
            }
            other => other?,
        };
        let account_id = AccountId::from_number(number)?;

        tracing::debug!("Assigned account identifier {}", account_id);

        Ok(account_id)
    }

    /// Persist an account, creating or updating it
    ///
    /// An account without an id gets one assigned and is inserted; an account
    /// with an id is updated in place and keeps it. Every path starts with a
    /// write, and a rolled back insert hands its identifier back.
    ///
    /// # Returns
    /// * `Ok(SaveOutcome)` - The stored account and the event it produced
    /// * `Err(InternalError)` - Uniqueness violation, account not found, or database error
    pub async fn save(
        &self,
        conn: &impl ConnectionTrait,
        account: UserAccount,
    ) -> Result<SaveOutcome<UserAccount>, InternalError> {
        match account.id {
            None => self.insert(conn, account).await,
            Some(account_id) => self.update(conn, account_id, account).await,
        }
    }

    async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        account: UserAccount,
    ) -> Result<SaveOutcome<UserAccount>, InternalError> {
        let account_id = self.assign_identifier(conn).await?;
        self.ensure_unique(conn, &account).await?;

        let now = Utc::now().timestamp();

        let new_user = ActiveModel {
            id: Set(account_id.to_string()),
            name: Set(account.name.clone()),
            email: Set(account.email.clone()),
            username: Set(account.username.clone()),
            password_hash: Set(account.password_hash.clone()),
            is_active: Set(account.is_active),
            is_staff: Set(account.is_staff),
            is_superuser: Set(account.is_superuser),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = new_user
            .insert(conn)
            .await
            .map_err(|e| map_write_error("insert_account", e, &account))?;

        let saved = UserAccount::try_from(model)?;
        tracing::info!("Account {} created for {}", account_id, saved.username);

        let event = AccountEvent::new(AccountEventKind::Registered, account_id, &saved);
        Ok(SaveOutcome::new(saved, event))
    }

    async fn update(
        &self,
        conn: &impl ConnectionTrait,
        account_id: AccountId,
        account: UserAccount,
    ) -> Result<SaveOutcome<UserAccount>, InternalError> {
        // Collisions on update are caught by the unique indexes
        let changes = ActiveModel {
            id: Set(account_id.to_string()),
            name: Set(account.name.clone()),
            email: Set(account.email.clone()),
            username: Set(account.username.clone()),
            password_hash: Set(account.password_hash.clone()),
            is_active: Set(account.is_active),
            is_staff: Set(account.is_staff),
            is_superuser: Set(account.is_superuser),
            created_at: NotSet,
            updated_at: Set(Utc::now().timestamp()),
        };

        let model = changes.update(conn).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => AccountError::AccountNotFound { account_id: account_id.to_string() }.into(),
            other => map_write_error("update_account", other, &account),
        })?;

        let saved = UserAccount::try_from(model)?;
        tracing::debug!("Account {} updated", account_id);

        let event = AccountEvent::new(AccountEventKind::Updated, account_id, &saved);
        Ok(SaveOutcome::new(saved, event))
    }

    /// Reject the account if another record already holds its email or username
    async fn ensure_unique(
        &self,
        conn: &impl ConnectionTrait,
        account: &UserAccount,
    ) -> Result<(), InternalError> {
        let conflicts = User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(&account.email))
                    .add(user::Column::Username.eq(&account.username)),
            )
            .all(conn)
            .await
            .map_err(|e| InternalError::database("check_account_uniqueness", e))?;

        if conflicts.iter().any(|c| c.email == account.email) {
            return Err(AccountError::duplicate_email(&account.email).into());
        }
        if !conflicts.is_empty() {
            return Err(AccountError::duplicate_username(&account.username).into());
        }

        Ok(())
    }

    /// Look up an account by its login name
    pub async fn find_by_username(
        &self,
        conn: &impl ConnectionTrait,
        username: &str,
    ) -> Result<Option<UserAccount>, InternalError> {
        let model = User::find()
            .filter(user::Column::Username.eq(username))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_account_by_username", e))?;

        Ok(model.map(UserAccount::try_from).transpose()?)
    }

    pub async fn get_by_id(
        &self,
        conn: &impl ConnectionTrait,
        account_id: &AccountId,
    ) -> Result<UserAccount, InternalError> {
        let model = User::find_by_id(account_id.to_string())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_account_by_id", e))?
            .ok_or_else(|| AccountError::AccountNotFound { account_id: account_id.to_string() })?;

        Ok(UserAccount::try_from(model)?)
    }

    /// Remove an account; its identifier stays retired
    pub async fn delete(
        &self,
        conn: &impl ConnectionTrait,
        account_id: &AccountId,
    ) -> Result<(), InternalError> {
        let result = User::delete_by_id(account_id.to_string())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_account", e))?;

        if result.rows_affected == 0 {
            return Err(AccountError::AccountNotFound { account_id: account_id.to_string() }.into());
        }

        tracing::info!("Account {} deleted", account_id);
        Ok(())
    }
}

/// Translate a unique-constraint failure into the field that collided
fn map_write_error(operation: &str, e: DbErr, account: &UserAccount) -> InternalError {
    if let Some(SqlErr::UniqueConstraintViolation(message)) = e.sql_err() {
        if message.contains("email") {
            return AccountError::duplicate_email(&account.email).into();
        }
        if message.contains("username") {
            return AccountError::duplicate_username(&account.username).into();
        }
    }
    InternalError::database(operation, e)
}

impl std::fmt::Debug for UserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserStore")
            .field("sequence_store", &self.sequence_store)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use sea_orm::{DbBackend, Statement, TransactionTrait};

    use crate::test::utils::{setup_file_test_db, setup_test_db, unsaved_account};
    use crate::types::db::id_sequence::Entity as IdSequence;

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(UserStore::normalize_email("Alice.Smith@Example.COM"), "Alice.Smith@example.com");
        assert_eq!(UserStore::normalize_email("  bob@X.com "), "bob@x.com");
        assert_eq!(UserStore::normalize_email("odd@name@Host.Org"), "odd@name@host.org");
        assert_eq!(UserStore::normalize_email("no-at-sign"), "no-at-sign");
    }

    #[tokio::test]
    async fn test_query_max_id_on_empty_table() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        assert_eq!(store.query_max_id(&db).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_first_accounts_get_sequential_ids() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        let first = store.save(&db, unsaved_account("a@x.com", "alice")).await.unwrap();
        let second = store.save(&db, unsaved_account("b@x.com", "bob")).await.unwrap();

        assert_eq!(first.value.id.unwrap().to_string(), "AASC0000001");
        assert_eq!(second.value.id.unwrap().to_string(), "AASC0000002");
        assert_eq!(first.event.kind, AccountEventKind::Registered);
        assert_eq!(store.query_max_id(&db).await.unwrap(), Some("AASC0000002".to_string()));
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_does_not_advance_sequence() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        let created = store.save(&db, unsaved_account("a@x.com", "alice")).await.unwrap().value;
        let original_id = created.id;

        let mut renamed = created.clone();
        renamed.name = "Alice Cooper".to_string();
        let updated = store.save(&db, renamed).await.unwrap();

        assert_eq!(updated.value.id, original_id);
        assert_eq!(updated.value.name, "Alice Cooper");
        assert_eq!(updated.value.created_at, created.created_at);
        assert_eq!(updated.event.kind, AccountEventKind::Updated);

        let next = store.save(&db, unsaved_account("b@x.com", "bob")).await.unwrap().value;
        assert_eq!(next.id.unwrap().to_string(), "AASC0000002");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        store.save(&db, unsaved_account("a@x.com", "alice")).await.unwrap();
        let result = store.save(&db, unsaved_account("a@x.com", "alice2")).await;

        match result {
            Err(InternalError::Account(AccountError::UniquenessViolation { field, .. })) => {
                assert_eq!(field, "email");
            }
            other => panic!("Expected UniquenessViolation, got {:?}", other.map(|o| o.value)),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        store.save(&db, unsaved_account("a@x.com", "alice")).await.unwrap();
        let result = store.save(&db, unsaved_account("other@x.com", "alice")).await;

        match result {
            Err(InternalError::Account(AccountError::UniquenessViolation { field, .. })) => {
                assert_eq!(field, "username");
            }
            other => panic!("Expected UniquenessViolation, got {:?}", other.map(|o| o.value)),
        }
    }

    #[tokio::test]
    async fn test_update_cannot_take_another_accounts_username() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        store.save(&db, unsaved_account("a@x.com", "alice")).await.unwrap();
        let mut bob = store.save(&db, unsaved_account("b@x.com", "bob")).await.unwrap().value;

        bob.username = "alice".to_string();
        let result = store.save(&db, bob).await;

        assert!(matches!(
            result,
            Err(InternalError::Account(AccountError::UniquenessViolation { field: "username", .. }))
        ));
    }

    #[tokio::test]
    async fn test_users_table_indexes_come_from_unique_keys_only() {
        let db = setup_test_db().await;

        let rows = db
            .query_all(Statement::from_string(
                DbBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'users'",
            ))
            .await
            .unwrap();
        let names: Vec<String> = rows.iter().map(|row| row.try_get("", "name").unwrap()).collect();

        // Primary key, email and username
        assert_eq!(names.len(), 3, "unexpected indexes: {:?}", names);
        assert!(names.iter().all(|name| name.starts_with("sqlite_autoindex_users")));
    }

    #[tokio::test]
    async fn test_update_cannot_take_another_accounts_email() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        store.save(&db, unsaved_account("a@x.com", "alice")).await.unwrap();
        let mut bob = store.save(&db, unsaved_account("b@x.com", "bob")).await.unwrap().value;

        bob.email = "a@x.com".to_string();
        let result = store.save(&db, bob).await;

        assert!(matches!(
            result,
            Err(InternalError::Account(AccountError::UniquenessViolation { field: "email", .. }))
        ));
    }

    #[tokio::test]
    async fn test_rolled_back_insert_returns_its_identifier() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        store.save(&db, unsaved_account("a@x.com", "alice")).await.unwrap();

        let txn = db.begin().await.unwrap();
        let result = store.save(&txn, unsaved_account("a@x.com", "alice2")).await;
        assert!(result.is_err());
        txn.rollback().await.unwrap();

        let bob = store.save(&db, unsaved_account("b@x.com", "bob")).await.unwrap().value;
        assert_eq!(bob.id.unwrap().to_string(), "AASC0000002");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_second_writer_waits_for_open_insert_transaction() {
        let (_dir, db) = setup_file_test_db(2).await;
        let store = Arc::new(UserStore::new());

        let first = db.begin().await.unwrap();
        let alice = store.save(&first, unsaved_account("a@x.com", "alice")).await.unwrap().value;

        let waiting = {
            let db = db.clone();
            let store = store.clone();
            tokio::spawn(async move {
                let txn = db.begin().await.map_err(|e| InternalError::database("begin", e))?;
                let outcome = store.save(&txn, unsaved_account("b@x.com", "bob")).await?;
                txn.commit().await.map_err(|e| InternalError::database("commit", e))?;
                Ok::<_, InternalError>(outcome.value)
            })
        };

        tokio::time::sleep(Duration::from_millis(100)).await;
        first.commit().await.unwrap();

        let bob = waiting.await.expect("Task panicked").expect("Second writer failed instead of waiting");
        assert_eq!(alice.id.unwrap().to_string(), "AASC0000001");
        assert_eq!(bob.id.unwrap().to_string(), "AASC0000002");
    }

    #[tokio::test]
    async fn test_update_of_missing_account_fails() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        let mut ghost = unsaved_account("ghost@x.com", "ghost");
        ghost.id = Some(AccountId::from_number(77).unwrap());

        let result = store.save(&db, ghost).await;
        assert!(matches!(
            result,
            Err(InternalError::Account(AccountError::AccountNotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_deleted_id_is_never_reissued() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        store.save(&db, unsaved_account("a@x.com", "alice")).await.unwrap();
        let bob = store.save(&db, unsaved_account("b@x.com", "bob")).await.unwrap().value;

        store.delete(&db, &bob.id.unwrap()).await.unwrap();

        let carol = store.save(&db, unsaved_account("c@x.com", "carol")).await.unwrap().value;
        assert_eq!(carol.id.unwrap().to_string(), "AASC0000003");
    }

    #[tokio::test]
    async fn test_missing_sequence_is_seeded_from_max_id() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        for (email, username) in [("a@x.com", "alice"), ("b@x.com", "bob")] {
            store.save(&db, unsaved_account(email, username)).await.unwrap();
        }

        // Simulate a database that predates the sequence table contents
        IdSequence::delete_many().exec(&db).await.unwrap();

        let carol = store.save(&db, unsaved_account("c@x.com", "carol")).await.unwrap().value;
        assert_eq!(carol.id.unwrap().to_string(), "AASC0000003");
    }

    #[tokio::test]
    async fn test_missing_sequence_on_empty_table_starts_at_one() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        IdSequence::delete_many().exec(&db).await.unwrap();

        let account_id = store.assign_identifier(&db).await.unwrap();
        assert_eq!(account_id.to_string(), "AASC0000001");
    }

    #[tokio::test]
    async fn test_exhausted_sequence_is_reported() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        IdSequence::delete_many().exec(&db).await.unwrap();
        SequenceStore::new()
            .create_sequence(&db, ACCOUNT_SEQUENCE, crate::types::internal::account_id::MAX_ACCOUNT_NUMBER)
            .await
            .unwrap();

        let result = store.save(&db, unsaved_account("a@x.com", "alice")).await;
        assert!(matches!(
            result,
            Err(InternalError::Account(AccountError::IdentifierExhausted { number: 10_000_000 }))
        ));
        assert_eq!(store.query_max_id(&db).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_and_get_by_id() {
        let db = setup_test_db().await;
        let store = UserStore::new();

        let alice = store.save(&db, unsaved_account("a@x.com", "alice")).await.unwrap().value;

        let found = store.find_by_username(&db, "alice").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert!(store.find_by_username(&db, "nobody").await.unwrap().is_none());

        let fetched = store.get_by_id(&db, &alice.id.unwrap()).await.unwrap();
        assert_eq!(fetched.email, "a@x.com");
    }
}
