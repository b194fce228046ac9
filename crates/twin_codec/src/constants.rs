//! String constants of the scene document format

use twin_scene::Target;

pub const INFO_ICON: &str = "iottwinmaker.common.icon:Info";
pub const WARNING_ICON: &str = "iottwinmaker.common.icon:Warning";
pub const ERROR_ICON: &str = "iottwinmaker.common.icon:Error";
pub const VIDEO_ICON: &str = "iottwinmaker.common.icon:Video";

pub const RED_COLOR: &str = "iottwinmaker.common.color:#d13212";
pub const GREEN_COLOR: &str = "iottwinmaker.common.color:#1d8102";
pub const YELLOW_COLOR: &str = "iottwinmaker.common.color:#f89256";

/// Map a target to its wire string. `Empty` has no wire form.
pub fn serialize_target(target: Target) -> Option<&'static str> {
    match target {
        Target::Info => Some(INFO_ICON),
        Target::Warning => Some(WARNING_ICON),
        Target::Error => Some(ERROR_ICON),
        Target::Video => Some(VIDEO_ICON),
        Target::Red => Some(RED_COLOR),
        Target::Green => Some(GREEN_COLOR),
        Target::Yellow => Some(YELLOW_COLOR),
        Target::Empty => None,
    }
}

/// Inverse of [`serialize_target`]; unknown or missing strings map to `Empty`
pub fn deserialize_target(value: Option<&str>) -> Target {
    match value {
        Some(INFO_ICON) => Target::Info,
        Some(WARNING_ICON) => Target::Warning,
        Some(ERROR_ICON) => Target::Error,
        Some(VIDEO_ICON) => Target::Video,
        Some(RED_COLOR) => Target::Red,
        Some(GREEN_COLOR) => Target::Green,
        Some(YELLOW_COLOR) => Target::Yellow,
        _ => Target::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_mapping_round_trips() {
        for target in [
            Target::Info,
            Target::Warning,
            Target::Error,
            Target::Video,
            Target::Red,
            Target::Green,
            Target::Yellow,
        ] {
            assert_eq!(deserialize_target(serialize_target(target)), target);
        }
        assert_eq!(serialize_target(Target::Empty), None);
        assert_eq!(deserialize_target(Some("not-a-known-icon")), Target::Empty);
        assert_eq!(deserialize_target(None), Target::Empty);
    }
}
