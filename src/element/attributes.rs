const ROLE_NAME_INTENSITY: &str = "intensity";
const ROLE_NAME_HUE: &str = "hue";
const ROLE_NAME_SATURATION: &str = "saturation";
const ROLE_NAME_RED: &str = "red";
const ROLE_NAME_GREEN: &str = "green";
const ROLE_NAME_BLUE: &str = "blue";
const ROLE_NAME_SPEED: &str = "speed";
const ROLE_NAME_MOVE_TO: &str = "move_to";

/// Settable element attribute
///
/// Input adapters address parameters through roles instead of field names;
/// each element kind exposes a fixed table of the roles it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Intensity,
    Hue,
    Saturation,
    Red,
    Green,
    Blue,
    Speed,
    MoveTo,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intensity => ROLE_NAME_INTENSITY,
            Self::Hue => ROLE_NAME_HUE,
            Self::Saturation => ROLE_NAME_SATURATION,
            Self::Red => ROLE_NAME_RED,
            Self::Green => ROLE_NAME_GREEN,
            Self::Blue => ROLE_NAME_BLUE,
            Self::Speed => ROLE_NAME_SPEED,
            Self::MoveTo => ROLE_NAME_MOVE_TO,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            ROLE_NAME_INTENSITY => Some(Self::Intensity),
            ROLE_NAME_HUE => Some(Self::Hue),
            ROLE_NAME_SATURATION => Some(Self::Saturation),
            ROLE_NAME_RED => Some(Self::Red),
            ROLE_NAME_GREEN => Some(Self::Green),
            ROLE_NAME_BLUE => Some(Self::Blue),
            ROLE_NAME_SPEED => Some(Self::Speed),
            ROLE_NAME_MOVE_TO => Some(Self::MoveTo),
            _ => None,
        }
    }
}

/// Roles accepted by a single light
pub const LIGHT_ROLES: &[Role] = &[
    Role::Intensity,
    Role::Hue,
    Role::Saturation,
    Role::Red,
    Role::Green,
    Role::Blue,
];

/// Roles accepted by a group; intensity scales every child
pub const GROUP_ROLES: &[Role] = &[Role::Intensity];

/// Roles accepted by chases and pulse chases
pub const CHASE_ROLES: &[Role] = &[Role::Intensity, Role::Speed, Role::MoveTo];

/// Whether colour comes from hue/saturation or from raw RGB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Hsv,
    Rgb,
}

/// Public, effect-modulated state of a light
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attributes {
    pub intensity: f64,
    pub hue: f64,
    pub saturation: f64,
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub color_mode: ColorMode,
}

impl Attributes {
    /// Write a colour or intensity role. Writing a raw channel switches the
    /// light to RGB mode, writing hue or saturation switches it back.
    ///
    /// Returns `false` for roles that do not live on a light.
    pub fn set(&mut self, role: Role, value: f64) -> bool {
        match role {
            Role::Intensity => self.intensity = value.clamp(0.0, 1.0),
            Role::Hue => {
                self.hue = value;
                self.color_mode = ColorMode::Hsv;
            }
            Role::Saturation => {
                self.saturation = value.clamp(0.0, 1.0);
                self.color_mode = ColorMode::Hsv;
            }
            Role::Red => {
                self.red = value.clamp(0.0, 1.0);
                self.color_mode = ColorMode::Rgb;
            }
            Role::Green => {
                self.green = value.clamp(0.0, 1.0);
                self.color_mode = ColorMode::Rgb;
            }
            Role::Blue => {
                self.blue = value.clamp(0.0, 1.0);
                self.color_mode = ColorMode::Rgb;
            }
            Role::Speed | Role::MoveTo => return false,
        }
        true
    }

    pub fn get(&self, role: Role) -> Option<f64> {
        match role {
            Role::Intensity => Some(self.intensity),
            Role::Hue => Some(self.hue),
            Role::Saturation => Some(self.saturation),
            Role::Red => Some(self.red),
            Role::Green => Some(self.green),
            Role::Blue => Some(self.blue),
            Role::Speed | Role::MoveTo => None,
        }
    }
}
