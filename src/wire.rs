//! Named byte-valued enumerations for the fields that appear in A2S responses, plus the
//! engine-flavor tag that selects framing and schema variants.

use bitflags::bitflags;

/// Which generation of the engine a target server speaks: selects multi-packet framing and,
/// for `A2S_INFO`, the response schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Source,
    GoldSrc,
}

/// Indicates the type of server.
///
/// Uppercase ASCII is normalized to lowercase before lookup; any other byte becomes `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerType {
    Dedicated,
    Listen,
    SourceTvRelay,
    Unknown(u8),
}

impl From<u8> for ServerType {
    fn from(value: u8) -> Self {
        match value.to_ascii_lowercase() {
            b'd' => ServerType::Dedicated,
            b'l' => ServerType::Listen,
            b'p' => ServerType::SourceTvRelay,
            _ => ServerType::Unknown(value),
        }
    }
}

/// Indicates the operating system of the server.
///
/// `'L'`/`'W'` are normalized to lowercase before lookup. `'M'`/`'O'` are **not** normalized —
/// a long-standing GoldSrc quirk, so those bytes fall back to `Unknown` rather than matching
/// Mac/OSX.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerEnvironment {
    Linux,
    Windows,
    Mac,
    Osx,
    Unknown(u8),
}

impl From<u8> for ServerEnvironment {
    fn from(value: u8) -> Self {
        let normalized = match value {
            b'L' => b'l',
            b'W' => b'w',
            other => other,
        };

        match normalized {
            b'l' => ServerEnvironment::Linux,
            b'w' => ServerEnvironment::Windows,
            b'm' => ServerEnvironment::Mac,
            b'o' => ServerEnvironment::Osx,
            _ => ServerEnvironment::Unknown(value),
        }
    }
}

/// Indicates whether the server requires a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerVisibility {
    Public,
    Private,
}

impl ServerVisibility {
    /// `true` when the server is password-protected.
    pub fn is_private(self) -> bool {
        matches!(self, ServerVisibility::Private)
    }
}

impl From<u8> for ServerVisibility {
    fn from(value: u8) -> Self {
        if value == 0 {
            ServerVisibility::Public
        } else {
            ServerVisibility::Private
        }
    }
}

/// Specifies whether the server uses Valve Anti-Cheat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vac {
    Unsecured,
    Secured,
}

impl From<u8> for Vac {
    fn from(value: u8) -> Self {
        if value == 0 {
            Vac::Unsecured
        } else {
            Vac::Secured
        }
    }
}

/// Indicates whether a GoldSrc server is running a mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mod {
    HalfLife,
    HalfLifeMod,
}

impl Mod {
    pub fn is_mod(self) -> bool {
        matches!(self, Mod::HalfLifeMod)
    }
}

impl From<u8> for Mod {
    fn from(value: u8) -> Self {
        if value == 0 {
            Mod::HalfLife
        } else {
            Mod::HalfLifeMod
        }
    }
}

/// Indicates the type of mod (GoldSrc `A2S_INFO_GOLDSRC` only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModType {
    SingleAndMultiplayer,
    MultiplayerOnly,
    Unknown(u8),
}

impl From<u8> for ModType {
    fn from(value: u8) -> Self {
        match value {
            0 => ModType::SingleAndMultiplayer,
            1 => ModType::MultiplayerOnly,
            other => ModType::Unknown(other),
        }
    }
}

/// Indicates whether a GoldSrc mod uses its own DLL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModDll {
    UsesHalfLife,
    UsesOwn,
    Unknown(u8),
}

impl From<u8> for ModDll {
    fn from(value: u8) -> Self {
        match value {
            0 => ModDll::UsesHalfLife,
            1 => ModDll::UsesOwn,
            other => ModDll::Unknown(other),
        }
    }
}

/// Game mode reported by The Ship (app ID 2400) in its `A2S_INFO` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TheShipGameMode {
    Hunt,
    Elimination,
    Duel,
    Deathmatch,
    VipTeam,
    TeamElimination,
    Unknown(u8),
}

impl From<u8> for TheShipGameMode {
    fn from(value: u8) -> Self {
        match value {
            0 => TheShipGameMode::Hunt,
            1 => TheShipGameMode::Elimination,
            2 => TheShipGameMode::Duel,
            3 => TheShipGameMode::Deathmatch,
            4 => TheShipGameMode::VipTeam,
            5 => TheShipGameMode::TeamElimination,
            other => TheShipGameMode::Unknown(other),
        }
    }
}

bitflags! {
    /// Bitmask at the tail of the Source `A2S_INFO` response selecting which extra fields
    /// follow.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ExtraDataFlag: u8 {
        const GAME_ID   = 0x01;
        const STEAM_ID  = 0x10;
        const KEYWORDS  = 0x20;
        const SOURCETV  = 0x40;
        const GAME_PORT = 0x80;
    }
}
