//! MPC-HC window-message command IDs
//!
//! MPC-HC's web interface accepts `wm_command=<id>` on `/command.html`, where
//! `<id>` is the numeric ID of a menu/keyboard command. The media player uses
//! the fixed transport codes below; the remote resolves symbolic names through
//! [`COMMAND_TABLE`].

use std::fmt;

/// Numeric MPC-HC command ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandCode(pub i32);

impl CommandCode {
    pub const QUIT: Self = Self(816);
    pub const PLAY: Self = Self(887);
    pub const PLAY_PAUSE: Self = Self(888);
    pub const PAUSE: Self = Self(888);
    pub const STOP: Self = Self(890);
    pub const VOLUME_UP: Self = Self(907);
    pub const VOLUME_DOWN: Self = Self(908);
    pub const VOLUME_MUTE: Self = Self(909);
    pub const PREVIOUS_FILE: Self = Self(919);
    pub const NEXT_FILE: Self = Self(920);
    /// Pseudo-command carried by seek requests alongside a `position` parameter
    pub const SEEK: Self = Self(-1);

    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Symbolic names accepted by the remote, in MPC-HC menu order.
pub const COMMAND_TABLE: &[(&str, CommandCode)] = &[
    // File
    ("open_file", CommandCode(800)),
    ("open_dvd", CommandCode(801)),
    ("open_device", CommandCode(802)),
    ("close", CommandCode(804)),
    ("save_image", CommandCode(806)),
    ("properties", CommandCode(814)),
    ("quit", CommandCode::QUIT),
    ("turn_off", CommandCode::QUIT),
    // View
    ("toggle_caption_menu", CommandCode(817)),
    ("toggle_seeker", CommandCode(818)),
    ("toggle_controls", CommandCode(819)),
    ("toggle_information", CommandCode(820)),
    ("toggle_statistics", CommandCode(821)),
    ("toggle_status", CommandCode(822)),
    ("toggle_playlist", CommandCode(824)),
    ("view_minimal", CommandCode(827)),
    ("view_compact", CommandCode(828)),
    ("view_normal", CommandCode(829)),
    ("fullscreen", CommandCode(830)),
    ("fullscreen_no_res_change", CommandCode(831)),
    ("zoom_50", CommandCode(832)),
    ("zoom_100", CommandCode(833)),
    ("zoom_200", CommandCode(834)),
    ("zoom_auto_fit", CommandCode(968)),
    ("always_on_top", CommandCode(884)),
    ("options", CommandCode(886)),
    // Play
    ("play", CommandCode::PLAY),
    ("play_pause", CommandCode::PLAY_PAUSE),
    ("pause", CommandCode::PAUSE),
    ("stop", CommandCode::STOP),
    ("frame_step", CommandCode(891)),
    ("frame_step_back", CommandCode(892)),
    ("go_to", CommandCode(893)),
    ("decrease_rate", CommandCode(894)),
    ("increase_rate", CommandCode(895)),
    ("reset_rate", CommandCode(896)),
    ("jump_backward_keyframe", CommandCode(897)),
    ("jump_forward_keyframe", CommandCode(898)),
    ("jump_backward_small", CommandCode(899)),
    ("jump_forward_small", CommandCode(900)),
    ("jump_backward_medium", CommandCode(901)),
    ("jump_forward_medium", CommandCode(902)),
    ("jump_backward_large", CommandCode(903)),
    ("jump_forward_large", CommandCode(904)),
    ("audio_delay_plus", CommandCode(905)),
    ("audio_delay_minus", CommandCode(906)),
    // Volume
    ("volume_up", CommandCode::VOLUME_UP),
    ("volume_down", CommandCode::VOLUME_DOWN),
    ("volume_mute", CommandCode::VOLUME_MUTE),
    ("mute", CommandCode::VOLUME_MUTE),
    // Navigate
    ("previous_track", CommandCode::PREVIOUS_FILE),
    ("next_track", CommandCode::NEXT_FILE),
    ("previous", CommandCode(921)),
    ("next", CommandCode(922)),
    ("dvd_title_menu", CommandCode(923)),
    ("dvd_root_menu", CommandCode(924)),
    ("dvd_menu_left", CommandCode(929)),
    ("dvd_menu_right", CommandCode(930)),
    ("dvd_menu_up", CommandCode(931)),
    ("dvd_menu_down", CommandCode(932)),
    ("dvd_menu_activate", CommandCode(933)),
    ("dvd_menu_back", CommandCode(934)),
    ("boss_key", CommandCode(944)),
    // Tracks
    ("next_audio", CommandCode(952)),
    ("previous_audio", CommandCode(953)),
    ("next_subtitle", CommandCode(954)),
    ("previous_subtitle", CommandCode(955)),
    ("toggle_subtitle", CommandCode(956)),
];

/// Look up a symbolic command name.
pub fn lookup(name: &str) -> Option<CommandCode> {
    COMMAND_TABLE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}

/// Resolve a remote command to the `wm_command` value sent on the wire.
///
/// Known names map to their numeric ID; anything else is passed through
/// unchanged on the assumption that it already is one.
pub fn resolve(name: &str) -> String {
    match lookup(name) {
        Some(code) => code.to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn transport_names_match_media_player_codes() {
        assert_eq!(lookup("play"), Some(CommandCode(887)));
        assert_eq!(lookup("pause"), Some(CommandCode(888)));
        assert_eq!(lookup("play_pause"), Some(CommandCode(888)));
        assert_eq!(lookup("stop"), Some(CommandCode(890)));
        assert_eq!(lookup("volume_up"), Some(CommandCode(907)));
        assert_eq!(lookup("volume_down"), Some(CommandCode(908)));
        assert_eq!(lookup("next_track"), Some(CommandCode(920)));
        assert_eq!(lookup("previous_track"), Some(CommandCode(919)));
        assert_eq!(lookup("turn_off"), Some(CommandCode(816)));
    }

    #[test]
    fn unknown_names_pass_through() {
        assert_eq!(resolve("830"), "830");
        assert_eq!(resolve("not_a_command"), "not_a_command");
        assert_eq!(resolve("fullscreen"), "830");
    }

    #[test]
    fn table_has_no_duplicate_names() {
        let mut seen = HashSet::new();
        for (name, _) in COMMAND_TABLE {
            assert!(seen.insert(*name), "duplicate command name {}", name);
        }
    }

    #[test]
    fn seek_is_negative_one() {
        assert_eq!(CommandCode::SEEK.to_string(), "-1");
    }
}
