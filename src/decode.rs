//! Per-response-kind decode schemas.
//!
//! Each function walks a fixed, statically-known field order for its response kind rather than
//! reflecting over a generic field list -- the wire layout differs enough between kinds
//! (conditional blocks, different engines) that a single generic walker bought nothing but
//! indirection.

use crate::appids::AppId;
use crate::buffer::ByteBuffer;
use crate::error::A2SError;
use crate::response::{
    ChallengeResponse, GoldSrcModInfo, InfoExtraData, InfoGoldSrcResponse, InfoResponse, Player, PingResponse,
    PlayersResponse, RulesResponse, TheShipInfo,
};
use crate::wire::{ExtraDataFlag, Mod, ModDll, ModType, ServerEnvironment, ServerType, ServerVisibility, Vac};

pub fn decode_info(buf: &mut ByteBuffer) -> Result<InfoResponse, A2SError> {
    let protocol = buf.read_byte()?;
    let name = buf.read_string();
    let map = buf.read_string();
    let folder = buf.read_string();
    let game = buf.read_string();
    let app_id = buf.read_short()?;
    let players = buf.read_byte()?;
    let max_players = buf.read_byte()?;
    let bots = buf.read_byte()?;
    let server_type = ServerType::from(buf.read_byte()?);
    let server_environment = ServerEnvironment::from(buf.read_byte()?);
    let server_visibility = ServerVisibility::from(buf.read_byte()?);
    let vac = Vac::from(buf.read_byte()?);

    let the_ship = if app_id == AppId::TheShip.value() as i16 {
        Some(TheShipInfo {
            mode: buf.read_byte()?,
            witnesses: buf.read_byte()?,
            duration: buf.read_byte()?,
        })
    } else {
        None
    };

    let version = buf.read_string();

    // The extra-data-flag byte is only present if the server included it; treat a fully
    // consumed payload as "no extra fields" rather than an error.
    let edf = if buf.remaining() > 0 {
        ExtraDataFlag::from_bits_truncate(buf.read_byte()?)
    } else {
        ExtraDataFlag::empty()
    };

    let mut extra_data = InfoExtraData::default();
    if edf.contains(ExtraDataFlag::GAME_PORT) {
        extra_data.port = Some(buf.read_short()?);
    }
    if edf.contains(ExtraDataFlag::STEAM_ID) {
        extra_data.steam_id = Some(buf.read_long_long()?);
    }
    if edf.contains(ExtraDataFlag::SOURCETV) {
        let port = buf.read_short()?;
        let name = buf.read_string();
        extra_data.sourcetv = Some((port, name));
    }
    if edf.contains(ExtraDataFlag::KEYWORDS) {
        extra_data.keywords = Some(buf.read_string());
    }
    if edf.contains(ExtraDataFlag::GAME_ID) {
        extra_data.game_id = Some(buf.read_long_long()?);
    }

    Ok(InfoResponse {
        protocol,
        name,
        map,
        folder,
        game,
        app_id,
        players,
        max_players,
        bots,
        server_type,
        server_environment,
        server_visibility,
        vac,
        the_ship,
        version,
        extra_data,
    })
}

pub fn decode_info_goldsrc(buf: &mut ByteBuffer) -> Result<InfoGoldSrcResponse, A2SError> {
    let address = buf.read_string();
    let name = buf.read_string();
    let map = buf.read_string();
    let folder = buf.read_string();
    let game = buf.read_string();
    let players = buf.read_byte()?;
    let max_players = buf.read_byte()?;
    let protocol = buf.read_byte()?;
    let server_type = ServerType::from(buf.read_byte()?);
    let server_environment = ServerEnvironment::from(buf.read_byte()?);
    let server_visibility = ServerVisibility::from(buf.read_byte()?);
    let is_mod = Mod::from(buf.read_byte()?);

    let mod_info = if is_mod.is_mod() {
        let link = buf.read_string();
        let download_link = buf.read_string();
        let _reserved = buf.read_byte()?;
        let version = buf.read_long()?;
        let size = buf.read_long()?;
        let mod_type = ModType::from(buf.read_byte()?);
        let mod_dll = ModDll::from(buf.read_byte()?);
        Some(GoldSrcModInfo {
            link,
            download_link,
            version,
            size,
            mod_type,
            mod_dll,
        })
    } else {
        None
    };

    let vac = Vac::from(buf.read_byte()?);
    let bots = buf.read_byte()?;

    Ok(InfoGoldSrcResponse {
        address,
        name,
        map,
        folder,
        game,
        players,
        max_players,
        protocol,
        server_type,
        server_environment,
        server_visibility,
        is_mod,
        mod_info,
        vac,
        bots,
    })
}

fn decode_player_record(buf: &mut ByteBuffer) -> Result<Player, A2SError> {
    let _index = buf.read_byte()?;
    let name = buf.read_string();
    let score = buf.read_long()?;
    let duration = buf.read_float()?;
    Ok(Player { name, score, duration })
}

/// Consumes player records until the buffer is exhausted. A record that fails to decode
/// (because the datagram was cut short mid-record) ends the loop instead of propagating an
/// error -- the caller gets everything that was intact.
pub fn decode_players(buf: &mut ByteBuffer) -> Result<PlayersResponse, A2SError> {
    let declared_count = buf.read_byte()?;
    let mut players = Vec::new();

    while buf.remaining() > 0 {
        match decode_player_record(buf) {
            Ok(player) => players.push(player),
            Err(_) => break,
        }
    }

    Ok(PlayersResponse { declared_count, players })
}

fn decode_rule_record(buf: &mut ByteBuffer) -> Result<(String, String), A2SError> {
    let name = buf.read_string();
    if buf.remaining() == 0 {
        return Err(A2SError::UnexpectedEof);
    }
    let value = buf.read_string();
    Ok((name, value))
}

pub fn decode_rules(buf: &mut ByteBuffer) -> Result<RulesResponse, A2SError> {
    let declared_count = buf.read_short()?;
    let mut rules = Vec::new();

    while buf.remaining() > 0 {
        match decode_rule_record(buf) {
            Ok(rule) => rules.push(rule),
            Err(_) => break,
        }
    }

    Ok(RulesResponse { declared_count, rules })
}

pub fn decode_challenge(buf: &mut ByteBuffer) -> Result<ChallengeResponse, A2SError> {
    Ok(ChallengeResponse {
        challenge: buf.read_long()?,
    })
}

/// The ping payload carries no stable field schema across engines; it's surfaced raw.
pub fn decode_ping(buf: &mut ByteBuffer) -> Result<PingResponse, A2SError> {
    let raw = String::from_utf8_lossy(&buf.read_to_end()).into_owned();
    Ok(PingResponse { raw })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info_payload_source() -> Vec<u8> {
        let mut buf = ByteBuffer::new();
        buf.write_byte(17); // protocol
        buf.write_string("My Server");
        buf.write_string("de_dust2");
        buf.write_string("cstrike");
        buf.write_string("Counter-Strike");
        buf.write_short(10); // app id
        buf.write_byte(5); // players
        buf.write_byte(16); // max players
        buf.write_byte(0); // bots
        buf.write_byte(b'd'); // dedicated
        buf.write_byte(b'l'); // linux
        buf.write_byte(0); // public
        buf.write_byte(1); // vac secured
        buf.write_string("1.0.0.0"); // version
        buf.into_vec()
    }

    #[test]
    fn decodes_concrete_info_payload_byte_for_byte() {
        // FF FF FF FF 49 11 "Test\0" "de_dust2\0" "cstrike\0" "Counter-Strike: Source\0"
        // F0 00 20 20 00 64 77 00 00 "1.0.0\0"
        let bytes: &[u8] = &[
            0x11, b'T', b'e', b's', b't', 0x00, b'd', b'e', b'_', b'd', b'u', b's', b't', b'2', 0x00, b'c', b's',
            b't', b'r', b'i', b'k', b'e', 0x00, b'C', b'o', b'u', b'n', b't', b'e', b'r', b'-', b'S', b't', b'r',
            b'i', b'k', b'e', b':', b' ', b'S', b'o', b'u', b'r', b'c', b'e', 0x00, 0xF0, 0x00, 0x20, 0x20, 0x00,
            0x64, 0x77, 0x00, 0x00, b'1', b'.', b'0', b'.', b'0', 0x00,
        ];

        let mut buf = ByteBuffer::from_bytes(bytes.to_vec());
        let info = decode_info(&mut buf).unwrap();

        assert_eq!(info.protocol, 17);
        assert_eq!(info.name, "Test");
        assert_eq!(info.map, "de_dust2");
        assert_eq!(info.folder, "cstrike");
        assert_eq!(info.game, "Counter-Strike: Source");
        assert_eq!(info.app_id, 240);
        assert_eq!(info.players, 32);
        assert_eq!(info.max_players, 32);
        assert_eq!(info.bots, 0);
        assert_eq!(info.server_type, ServerType::Dedicated);
        assert_eq!(info.server_environment, ServerEnvironment::Windows);
        assert_eq!(info.server_visibility, ServerVisibility::Public);
        assert_eq!(info.vac, Vac::Unsecured);
        assert_eq!(info.version, "1.0.0");
        assert_eq!(info.extra_data, InfoExtraData::default());
    }

    #[test]
    fn decodes_info_without_extra_data() {
        let bytes = info_payload_source();
        let mut buf = ByteBuffer::from_bytes(bytes);
        let info = decode_info(&mut buf).unwrap();
        assert_eq!(info.name, "My Server");
        assert_eq!(info.players, 5);
        assert!(info.the_ship.is_none());
        assert_eq!(info.extra_data, InfoExtraData::default());
    }

    #[test]
    fn decodes_info_with_all_extra_fields_populated() {
        let mut bytes = info_payload_source();
        let mut buf = ByteBuffer::from_bytes(std::mem::take(&mut bytes));
        buf.seek(buf.get_all().len() as u64);
        // 0xF1 = GAME_PORT | SOURCETV | STEAM_ID | GAME_ID (no KEYWORDS)
        buf.write_byte(0xF1);
        buf.write_short(27015);
        buf.write_long_long(0x0102_0304_0506_0708);
        buf.write_short(27020);
        buf.write_string("tv");
        buf.write_long_long(240);

        let mut buf = ByteBuffer::from_bytes(buf.into_vec());
        let info = decode_info(&mut buf).unwrap();
        assert_eq!(info.extra_data.port, Some(27015));
        assert_eq!(info.extra_data.steam_id, Some(0x0102_0304_0506_0708));
        assert_eq!(info.extra_data.sourcetv, Some((27020, "tv".to_string())));
        assert_eq!(info.extra_data.keywords, None);
        assert_eq!(info.extra_data.game_id, Some(240));
    }

    #[test]
    fn decodes_the_ship_fields_when_app_id_matches() {
        let mut buf = ByteBuffer::new();
        buf.write_byte(17);
        buf.write_string("Ship Server");
        buf.write_string("ship_map");
        buf.write_string("ship");
        buf.write_string("The Ship");
        buf.write_short(2400);
        buf.write_byte(1);
        buf.write_byte(8);
        buf.write_byte(0);
        buf.write_byte(b'd');
        buf.write_byte(b'w');
        buf.write_byte(0);
        buf.write_byte(0);
        buf.write_byte(1); // mode
        buf.write_byte(4); // witnesses
        buf.write_byte(120); // duration
        buf.write_string("1.0");

        let mut buf = ByteBuffer::from_bytes(buf.into_vec());
        let info = decode_info(&mut buf).unwrap();
        let ship = info.the_ship.expect("the ship fields expected");
        assert_eq!(ship.mode, 1);
        assert_eq!(ship.witnesses, 4);
        assert_eq!(ship.duration, 120);
    }

    #[test]
    fn truncated_rules_response_stops_cleanly() {
        let mut buf = ByteBuffer::new();
        buf.write_short(2);
        buf.write_string("sv_gravity");
        buf.write_string("800");
        buf.write_string("mp_friendlyfire"); // value missing, simulating truncation

        let mut buf = ByteBuffer::from_bytes(buf.into_vec());
        let rules = decode_rules(&mut buf).unwrap();
        assert_eq!(rules.declared_count, 2);
        assert_eq!(rules.rules, vec![("sv_gravity".to_string(), "800".to_string())]);
    }

    #[test]
    fn truncated_players_response_stops_cleanly() {
        let mut buf = ByteBuffer::new();
        buf.write_byte(2);
        buf.write_byte(0);
        buf.write_string("alice");
        buf.write_long(10);
        buf.write_float(120.5);
        buf.write_byte(1); // second record cut off after the index byte

        let mut buf = ByteBuffer::from_bytes(buf.into_vec());
        let players = decode_players(&mut buf).unwrap();
        assert_eq!(players.declared_count, 2);
        assert_eq!(players.players.len(), 1);
        assert_eq!(players.players[0].name, "alice");
    }

    #[test]
    fn decodes_goldsrc_info_with_mod_block() {
        let mut buf = ByteBuffer::new();
        buf.write_string("1.2.3.4:27015");
        buf.write_string("HL Server");
        buf.write_string("crossfire");
        buf.write_string("valve");
        buf.write_string("Half-Life");
        buf.write_byte(3);
        buf.write_byte(16);
        buf.write_byte(47);
        buf.write_byte(b'd');
        buf.write_byte(b'l');
        buf.write_byte(0);
        buf.write_byte(1); // is mod
        buf.write_string("http://example.com/mod");
        buf.write_string("http://example.com/download");
        buf.write_byte(0); // reserved
        buf.write_long(1);
        buf.write_long(184_549_376);
        buf.write_byte(1); // multiplayer only
        buf.write_byte(0); // uses half-life dll
        buf.write_byte(0); // vac unsecured
        buf.write_byte(3); // bots

        let mut buf = ByteBuffer::from_bytes(buf.into_vec());
        let info = decode_info_goldsrc(&mut buf).unwrap();
        assert!(info.is_mod.is_mod());
        let mod_info = info.mod_info.expect("mod info expected");
        assert_eq!(mod_info.link, "http://example.com/mod");
        assert_eq!(mod_info.mod_type, ModType::MultiplayerOnly);
        assert_eq!(info.bots, 3);
    }

    #[test]
    fn decodes_challenge_response() {
        let mut buf = ByteBuffer::new();
        buf.write_long(584_425_803);
        let mut buf = ByteBuffer::from_bytes(buf.into_vec());
        let challenge = decode_challenge(&mut buf).unwrap();
        assert_eq!(challenge.challenge, 584_425_803);
    }

    #[test]
    fn decodes_ping_as_raw_string() {
        let mut buf = ByteBuffer::from_bytes(b"00000000000000.".to_vec());
        let ping = decode_ping(&mut buf).unwrap();
        assert_eq!(ping.raw, "00000000000000.");
    }
}
