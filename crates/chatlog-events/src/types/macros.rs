/// Declarative macro generating `InfoMessageType`, `GenericInfoKind`,
/// `ALL_INFO_MESSAGE_TYPES`, and the integer/wire conversions from a single
/// source of truth.
///
/// # Sections
///
/// - **`dedicated`**: Kinds stored by their own record variant. They are
///   absent from `GenericInfoKind`, so the generic constructor cannot
///   produce them.
/// - **`generic`**: Kinds carried by the generic `InfoMessage` shape.
///
/// Each entry is `Variant => code => "wire_name"`. Codes are persisted in
/// the `message_type` column and in legacy archives; never renumber them.
macro_rules! define_info_messages {
    (
        dedicated {
            $(
                $(#[doc = $ddoc:literal])*
                $dv:ident => $dcode:literal => $dwire:literal
            ),* $(,)?
        }
        generic {
            $(
                $(#[doc = $gdoc:literal])*
                $gv:ident => $gcode:literal => $gwire:literal
            ),* $(,)?
        }
    ) => {
        // ── InfoMessageType enum ────────────────────────────────────

        /// Discriminator for every persisted info message kind.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum InfoMessageType {
            $(
                $(#[doc = $ddoc])*
                #[serde(rename = $dwire)]
                $dv,
            )*
            $(
                $(#[doc = $gdoc])*
                #[serde(rename = $gwire)]
                $gv,
            )*
        }

        // ── ALL_INFO_MESSAGE_TYPES constant ─────────────────────────

        /// All info message kinds in definition order.
        pub const ALL_INFO_MESSAGE_TYPES: [InfoMessageType; { [$($dwire,)* $($gwire,)*].len() }] = [
            $(InfoMessageType::$dv,)*
            $(InfoMessageType::$gv,)*
        ];

        // ── InfoMessageType methods ─────────────────────────────────

        impl InfoMessageType {
            /// Persisted integer code.
            #[must_use]
            pub const fn as_code(self) -> i64 {
                match self {
                    $(Self::$dv => $dcode,)*
                    $(Self::$gv => $gcode,)*
                }
            }

            /// Look up a kind by its persisted integer code.
            #[must_use]
            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($dcode => Some(Self::$dv),)*
                    $($gcode => Some(Self::$gv),)*
                    _ => None,
                }
            }

            /// Canonical wire string (e.g. `"unknown_protocol_version"`).
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$dv => $dwire,)*
                    $(Self::$gv => $gwire,)*
                }
            }

            /// Whether this kind is stored by a dedicated record variant.
            #[must_use]
            pub fn has_dedicated_variant(self) -> bool {
                matches!(self, $(Self::$dv)|*)
            }
        }

        impl std::fmt::Display for InfoMessageType {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for InfoMessageType {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($dwire => Ok(Self::$dv),)*
                    $($gwire => Ok(Self::$gv),)*
                    _ => Err(format!("unknown info message type: {s}")),
                }
            }
        }

        // ── GenericInfoKind enum ────────────────────────────────────

        /// Info message kinds without a dedicated variant.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum GenericInfoKind {
            $(
                $(#[doc = $gdoc])*
                #[serde(rename = $gwire)]
                $gv,
            )*
        }

        impl From<GenericInfoKind> for InfoMessageType {
            fn from(kind: GenericInfoKind) -> Self {
                match kind {
                    $(GenericInfoKind::$gv => Self::$gv,)*
                }
            }
        }

        impl TryFrom<InfoMessageType> for GenericInfoKind {
            type Error = InfoMessageType;

            /// Fails with the original kind when it has a dedicated variant.
            fn try_from(message_type: InfoMessageType) -> std::result::Result<Self, Self::Error> {
                match message_type {
                    $(InfoMessageType::$gv => Ok(Self::$gv),)*
                    other => Err(other),
                }
            }
        }
    };
}
