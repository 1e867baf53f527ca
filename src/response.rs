//! Decoded response value types.

use crate::wire::{Mod, ModDll, ModType, ServerEnvironment, ServerType, ServerVisibility, Vac};

/// The Ship (app id 2400) appends these three fields to `A2S_INFO` before `version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TheShipInfo {
    pub mode: u8,
    pub witnesses: u8,
    pub duration: u8,
}

/// Extra fields gated by the Source `A2S_INFO` extra-data-flag bitmask.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InfoExtraData {
    pub port: Option<i16>,
    pub steam_id: Option<u64>,
    pub sourcetv: Option<(i16, String)>,
    pub keywords: Option<String>,
    pub game_id: Option<u64>,
}

/// Decoded `A2S_INFO` response (Source schema).
#[derive(Debug, Clone, PartialEq)]
pub struct InfoResponse {
    pub protocol: u8,
    pub name: String,
    pub map: String,
    pub folder: String,
    pub game: String,
    pub app_id: i16,
    pub players: u8,
    pub max_players: u8,
    pub bots: u8,
    pub server_type: ServerType,
    pub server_environment: ServerEnvironment,
    pub server_visibility: ServerVisibility,
    pub vac: Vac,
    pub the_ship: Option<TheShipInfo>,
    pub version: String,
    pub extra_data: InfoExtraData,
}

/// Mod details reported when [`InfoGoldSrcResponse::is_mod`] is set.
#[derive(Debug, Clone, PartialEq)]
pub struct GoldSrcModInfo {
    pub link: String,
    pub download_link: String,
    pub version: i32,
    pub size: i32,
    pub mod_type: ModType,
    pub mod_dll: ModDll,
}

/// Decoded `A2S_INFO` response (GoldSrc schema).
#[derive(Debug, Clone, PartialEq)]
pub struct InfoGoldSrcResponse {
    pub address: String,
    pub name: String,
    pub map: String,
    pub folder: String,
    pub game: String,
    pub players: u8,
    pub max_players: u8,
    pub protocol: u8,
    pub server_type: ServerType,
    pub server_environment: ServerEnvironment,
    pub server_visibility: ServerVisibility,
    pub is_mod: Mod,
    pub mod_info: Option<GoldSrcModInfo>,
    pub vac: Vac,
    pub bots: u8,
}

/// One player entry of an `A2S_PLAYER` response.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub score: i32,
    pub duration: f32,
}

/// Decoded `A2S_PLAYER` response.
///
/// `declared_count` is the count byte the server reported; `players` may have fewer entries
/// than that if the datagram was truncated mid-record.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayersResponse {
    pub declared_count: u8,
    pub players: Vec<Player>,
}

/// Decoded `A2S_RULES` response. Preserves server-reported insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct RulesResponse {
    pub declared_count: i16,
    pub rules: Vec<(String, String)>,
}

/// A challenge handed back by `S2C_CHALLENGE`, used to authenticate a follow-up query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeResponse {
    pub challenge: i32,
}

/// Decoded `A2A_PING` reply. The payload format differs by engine and is not a stable wire
/// contract, so it's surfaced as the raw, undecoded string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingResponse {
    pub raw: String,
}
