use async_trait::async_trait;
use lib::{crypto::ProfileKey, identifiers::Uuid};
use rusqlite::{params, OptionalExtension};

use super::{Database, DatabaseError, ProfileKeyStore};

#[async_trait]
impl ProfileKeyStore for Database {
    async fn store_profile_key(
        &self,
        user_id: Uuid,
        profile_key: &ProfileKey,
    ) -> Result<(), DatabaseError> {
        self.get_connection().execute(
            r"
            INSERT OR REPLACE INTO profile_keys
                (user_id, profile_key)
            VALUES (?1, ?2)",
            params![user_id, profile_key.as_bytes().as_slice()],
        )?;

        Ok(())
    }

    async fn profile_key(&self, user_id: Uuid) -> Result<Option<ProfileKey>, DatabaseError> {
        let bytes: Option<Vec<u8>> = self
            .get_connection()
            .query_row(
                "SELECT profile_key FROM profile_keys WHERE user_id = ?",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        bytes
            .map(|bytes| {
                ProfileKey::try_from(bytes.as_slice()).map_err(|_| DatabaseError::CorruptedData)
            })
            .transpose()
    }
}
