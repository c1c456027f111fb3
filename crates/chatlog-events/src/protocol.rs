//! Message protocol versions understood by this build.
//!
//! Incoming messages carry the protocol version they were encoded with.
//! Anything above [`CURRENT_PROTOCOL_VERSION`] cannot be parsed locally and
//! is recorded as an unknown-protocol-version notice instead. Whether a
//! stored notice is still "unknown" is always recomputed against the
//! running build, so upgrading can turn an old notice into a known one.

/// Protocol versions this build can decode, oldest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum KnownProtocolVersion {
    /// Original message format.
    Initial = 0,
    /// Message timers.
    MessageTimers = 1,
    /// View-once media.
    ViewOnceVideo = 2,
    /// Reactions.
    Reactions = 3,
    /// Delete for everyone.
    RemoteDeletion = 4,
    /// Mentions in group bodies.
    Mentions = 5,
    /// Gift badges.
    GiftBadges = 6,
    /// Payments.
    Payments = 7,
}

impl KnownProtocolVersion {
    /// Highest protocol version this build understands.
    pub const CURRENT: Self = Self::Payments;

    /// Map a raw version number onto a known version.
    #[must_use]
    pub fn from_u64(version: u64) -> Option<Self> {
        Some(match version {
            0 => Self::Initial,
            1 => Self::MessageTimers,
            2 => Self::ViewOnceVideo,
            3 => Self::Reactions,
            4 => Self::RemoteDeletion,
            5 => Self::Mentions,
            6 => Self::GiftBadges,
            7 => Self::Payments,
            _ => return None,
        })
    }

    /// Raw version number.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self as u64
    }
}

/// Maximum protocol version number the current build can parse.
///
/// Versions are unbounded on the wire, so comparisons are done in `u64`.
pub const CURRENT_PROTOCOL_VERSION: u64 = KnownProtocolVersion::CURRENT.as_u64();

/// True when `version` is newer than `max_supported`.
#[must_use]
pub const fn is_unknown_version(version: u64, max_supported: u64) -> bool {
    version > max_supported
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
