//! Classification payload carried by generic info messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Closed set of keys a classification payload may use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InfoMessageUserInfoKey {
    /// Group model before a group update.
    OldGroupModel,
    /// Group model after a group update.
    NewGroupModel,
    /// Disappearing-message token before a change.
    OldDisappearingMessageToken,
    /// Disappearing-message token after a change.
    NewDisappearingMessageToken,
    /// Address of whoever caused a group update.
    GroupUpdateSourceAddress,
    /// Profile fields that changed.
    ProfileChanges,
    /// Account identifier whose phone number changed.
    ChangePhoneNumberAci,
    /// Phone number before the change.
    ChangePhoneNumberOld,
    /// Phone number after the change.
    ChangePhoneNumberNew,
    /// Who asked for payments activation.
    PaymentActivationRequestSenderAci,
    /// Who activated payments.
    PaymentActivatedAci,
    /// Phone number of the merged thread.
    ThreadMergePhoneNumber,
    /// Phone number involved in a session switchover.
    SessionSwitchoverPhoneNumber,
    /// Display name shown before the profile name was learned.
    DisplayNameBeforeLearningProfileName,
}

/// Classification payload: ordered map of known keys to opaque values.
pub type InfoMessageUserInfo = BTreeMap<InfoMessageUserInfoKey, Value>;

/// Build a payload from a JSON object, dropping keys this build does not
/// know. Non-object values yield an empty payload.
pub(crate) fn user_info_from_value(value: &Value) -> InfoMessageUserInfo {
    let Value::Object(map) = value else {
        debug!("user info payload is not an object, ignoring");
        return InfoMessageUserInfo::new();
    };
    map.iter()
        .filter_map(|(key, v)| {
            match serde_json::from_value::<InfoMessageUserInfoKey>(Value::String(key.clone())) {
                Ok(parsed) => Some((parsed, v.clone())),
                Err(_) => {
                    debug!(key = %key, "dropping unknown user info key");
                    None
                }
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
