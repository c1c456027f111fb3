//! Info message kinds.
//!
//! The table below is the registry of every info message kind; see
//! `define_info_messages!` for what it expands to.

use serde::{Deserialize, Serialize};

define_info_messages! {
    dedicated {
        /// Message to a recipient who is not registered with the service.
        UserNotRegistered => 1 => "user_not_registered",
        /// Message received with a protocol version newer than this build.
        UnknownProtocolVersion => 10 => "unknown_protocol_version",
    }
    generic {
        /// Secure session ended.
        SessionDidEnd => 0 => "session_did_end",
        /// Message content this build does not support.
        UnsupportedMessage => 2 => "unsupported_message",
        /// Group membership or attributes changed.
        GroupUpdate => 3 => "group_update",
        /// Local user left the group.
        GroupQuit => 4 => "group_quit",
        /// Disappearing-message timer changed.
        DisappearingMessagesUpdate => 5 => "disappearing_messages_update",
        /// Offer to add the sender to contacts.
        AddToContactsOffer => 6 => "add_to_contacts_offer",
        /// Safety number verification state changed.
        VerificationStateChange => 7 => "verification_state_change",
        /// Offer to share the profile with a user.
        AddUserToProfileSharingOffer => 8 => "add_user_to_profile_sharing_offer",
        /// Offer to share the profile with a group.
        AddGroupToProfileSharingOffer => 9 => "add_group_to_profile_sharing_offer",
        /// A contact joined the service.
        UserJoined => 11 => "user_joined",
        /// Thread was synced from a linked device.
        SyncedThread => 12 => "synced_thread",
        /// A participant changed their profile.
        ProfileUpdate => 13 => "profile_update",
        /// A participant changed their phone number.
        PhoneNumberChange => 14 => "phone_number_change",
        /// Recipient was hidden.
        RecipientHidden => 15 => "recipient_hidden",
        /// Peer asked the local user to activate payments.
        PaymentsActivationRequest => 16 => "payments_activation_request",
        /// Peer activated payments.
        PaymentsActivated => 17 => "payments_activated",
        /// Two threads for the same recipient were merged.
        ThreadMerge => 18 => "thread_merge",
        /// Session moved to a different identity.
        SessionSwitchover => 19 => "session_switchover",
        /// Local user reported the thread as spam.
        ReportedSpam => 20 => "reported_spam",
        /// Profile name became known.
        LearnedProfileName => 21 => "learned_profile_name",
        /// Local user blocked a user.
        BlockedOtherUser => 22 => "blocked_other_user",
        /// Local user blocked a group.
        BlockedGroup => 23 => "blocked_group",
        /// Local user unblocked a user.
        UnblockedOtherUser => 24 => "unblocked_other_user",
        /// Local user unblocked a group.
        UnblockedGroup => 25 => "unblocked_group",
        /// Local user accepted a message request.
        AcceptedMessageRequest => 26 => "accepted_message_request",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
