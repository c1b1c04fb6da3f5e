use lib::identifiers::GroupIdentifier;

use super::GroupManager;

impl GroupManager {
    /// Group calls are only ever inferred from call ids seen in messages.
    /// Returns `true` when `call_id` looks like a new incoming call for the
    /// group and `false` when it ends the recorded one.
    pub async fn update_active_calls(&self, group_id: &GroupIdentifier, call_id: &str) -> bool {
        let is_active = self.cache.toggle_call(group_id, call_id).await;
        log::debug!("Call {call_id} in {group_id} is now active: {is_active}");

        is_active
    }
}
