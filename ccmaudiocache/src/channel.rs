//! Channel selection for the stereo-to-mono mixdown.

use crate::error::AudioCacheError;
use std::fmt;
use std::str::FromStr;

/// Which channel of the source audio ends up in the encoded stream.
///
/// The game's speaker network plays one DFPWM stream per speaker, so a
/// stereo setup requests `Left` and `Right` separately; a single speaker
/// requests `Mono`. Each variant is cached as its own artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Channel {
    /// Equal-weighted downmix of both input channels.
    #[default]
    Mono,
    /// Isolated left channel at half amplitude.
    Left,
    /// Isolated right channel at half amplitude.
    Right,
}

impl Channel {
    /// ffmpeg pan filter producing the single-channel mixdown.
    ///
    /// The half-amplitude factors match the standard constant-power
    /// stereo panning the game client expects.
    pub fn pan_filter(self) -> &'static str {
        match self {
            Channel::Mono => "pan=mono|c0=0.5*c0+0.5*c1",
            Channel::Left => "pan=mono|c0=0.5*c0",
            Channel::Right => "pan=mono|c0=0.5*c1",
        }
    }

    /// Cache file name for this `(id, channel)` key.
    ///
    /// Mono keeps the historical `{id}.dfpwm` name; isolated channels
    /// are suffixed so the three artifacts never collide.
    pub fn dfpwm_file_name(self, id: &str) -> String {
        match self {
            Channel::Mono => format!("{id}.dfpwm"),
            Channel::Left | Channel::Right => format!("{id}_{self}.dfpwm"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Mono => "mono",
            Channel::Left => "left",
            Channel::Right => "right",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = AudioCacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mono" => Ok(Channel::Mono),
            "left" => Ok(Channel::Left),
            "right" => Ok(Channel::Right),
            other => Err(AudioCacheError::UnknownChannel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_distinct() {
        let names = [
            Channel::Mono.dfpwm_file_name("abc"),
            Channel::Left.dfpwm_file_name("abc"),
            Channel::Right.dfpwm_file_name("abc"),
        ];
        assert_eq!(names[0], "abc.dfpwm");
        assert_eq!(names[1], "abc_left.dfpwm");
        assert_eq!(names[2], "abc_right.dfpwm");
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("MONO".parse::<Channel>().unwrap(), Channel::Mono);
        assert_eq!("left".parse::<Channel>().unwrap(), Channel::Left);
        assert!("center".parse::<Channel>().is_err());
    }
}
