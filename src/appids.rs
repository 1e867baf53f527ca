//! A representative Steam Application ID registry and the title-specific protocol quirks
//! that are keyed off it.

/// A representative subset of Steam Application IDs that behave differently under A2S query,
/// carried for documentation and for the allow-lists below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AppId {
    CounterStrike = 10,
    HalfLife = 70,
    SourceSdkBase2006 = 215,
    CounterStrikeSource = 240,
    HalfLife2Deathmatch = 320,
    TeamFortress2 = 440,
    Left4Dead2 = 550,
    RagDollKungFu = 1002,
    SinMultiplayer = 1309,
    TheShip = 2400,
    GarrysMod = 4000,
    ZombiePanicSourceDedicatedServer = 17505,
    EternalSilence = 17550,
    InsurgencyModernInfantryCombat = 17700,
    Insurgency = 222880,
    InsurgencySandstorm = 581320,
}

impl AppId {
    pub const fn value(self) -> u32 {
        self as u32
    }
}

impl From<AppId> for u32 {
    fn from(id: AppId) -> Self {
        id.value()
    }
}

/// App IDs whose compressed multi-packet Source responses omit the cut-off `packet_size`
/// field on the first fragment, jumping straight from the fragment header to
/// `assembled_size`/`assembled_crc32`.
pub const APPS_NO_PACKET_SIZE_FIELD: &[u32] = &[
    AppId::SourceSdkBase2006.value(),
    AppId::EternalSilence.value(),
    AppId::InsurgencyModernInfantryCombat.value(),
];

/// GoldSrc app IDs whose `A2S_INFO` response nevertheless follows the Source schema rather
/// than the GoldSrc one.
pub const GOLDSRC_APPS_USE_SOURCE_INFO: &[u32] = &[AppId::SinMultiplayer.value(), AppId::RagDollKungFu.value()];

/// Whether `app_id`'s compressed multi-packet responses omit the cut-off size field.
pub fn app_has_no_packet_size_field(app_id: u32) -> bool {
    APPS_NO_PACKET_SIZE_FIELD.contains(&app_id)
}

/// Whether `app_id` is a GoldSrc title that nevertheless uses the Source `A2S_INFO` schema.
pub fn goldsrc_app_uses_source_info(app_id: u32) -> bool {
    GOLDSRC_APPS_USE_SOURCE_INFO.contains(&app_id)
}

/// Common query port numbers.
pub mod query_port {
    /// Default Source Dedicated Server port number.
    pub const SRCDS: u16 = 27_015;
    /// Default SourceTV/HLTV port number.
    pub const SOURCETV: u16 = 27_020;
    /// Standard Insurgency: Sandstorm `-QueryPort` number.
    pub const INSURGENCY_SANDSTORM: u16 = 27_131;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_packet_size_field_allow_list() {
        assert!(app_has_no_packet_size_field(AppId::SourceSdkBase2006.value()));
        assert!(!app_has_no_packet_size_field(AppId::TeamFortress2.value()));
    }

    #[test]
    fn goldsrc_source_info_allow_list() {
        assert!(goldsrc_app_uses_source_info(AppId::SinMultiplayer.value()));
        assert!(goldsrc_app_uses_source_info(AppId::RagDollKungFu.value()));
        assert!(!goldsrc_app_uses_source_info(AppId::HalfLife.value()));
    }
}
