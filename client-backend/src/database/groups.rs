use async_trait::async_trait;
use lib::{crypto::SerializedGroupMasterKey, identifiers::GroupIdentifier};
use rusqlite::{params, OptionalExtension};

use super::{Database, DatabaseError, GroupStore};

#[async_trait]
impl GroupStore for Database {
    async fn master_key_for_group(
        &self,
        group_id: &GroupIdentifier,
    ) -> Result<Option<SerializedGroupMasterKey>, DatabaseError> {
        let master_key: Option<String> = self
            .get_connection()
            .query_row(
                "SELECT master_key FROM group_master_keys WHERE group_id = ?",
                params![group_id.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(master_key.map(SerializedGroupMasterKey::new))
    }

    async fn store_master_key(
        &self,
        group_id: &GroupIdentifier,
        master_key: &SerializedGroupMasterKey,
    ) -> Result<(), DatabaseError> {
        self.get_connection().execute(
            "INSERT INTO group_master_keys (group_id, master_key) VALUES (?1, ?2)
                ON CONFLICT(group_id) DO UPDATE SET master_key = excluded.master_key",
            params![group_id.as_str(), master_key.as_str()],
        )?;

        Ok(())
    }
}
