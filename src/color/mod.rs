//! Colour helpers on top of `smart-leds` types
//!
//! The animation core works with unit floats (`0.0..=1.0`); conversion to
//! bytes happens only when channel data is written.

use smart_leds::{RGB8, hsv::Hsv as HSV};

pub use smart_leds::hsv::hsv2rgb;

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Quantize a unit float to a channel byte, truncating like a DMX fader
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unit_to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

pub fn byte_to_unit(value: u8) -> f64 {
    f64::from(value) / 255.0
}

/// Hue wraps around the colour wheel, so `1.0` maps back onto `0.0`
pub fn hue_to_byte(hue: f64) -> u8 {
    let wrapped = hue - libm::floor(hue);
    unit_to_byte(wrapped)
}

/// Unit HSV to RGB bytes
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Rgb {
    hsv2rgb(Hsv {
        hue: hue_to_byte(hue),
        sat: unit_to_byte(saturation),
        val: unit_to_byte(value),
    })
}

/// Unit RGB to unit hue and saturation
pub fn rgb_to_hue_saturation(red: f64, green: f64, blue: f64) -> (f64, f64) {
    let hsv = rgb2hsv(Rgb {
        r: unit_to_byte(red),
        g: unit_to_byte(green),
        b: unit_to_byte(blue),
    });
    (byte_to_unit(hsv.hue), byte_to_unit(hsv.sat))
}

/// Convert RGB to HSV (all channels are 0-255).
///
/// Hue is represented on a 0-255 circle, matching `smart_leds::hsv::Hsv`.
#[allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn rgb2hsv(rgb: Rgb) -> Hsv {
    let Rgb { r, g, b } = rgb;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let sat = if max == 0 {
        0
    } else {
        ((u16::from(delta) * 255) / u16::from(max)) as u8
    };

    // 0, 85 and 171 are the red, green and blue sector offsets
    let sector = |offset: i16, a: u8, b: u8| {
        let h = offset + (43i16 * (i16::from(a) - i16::from(b))) / i16::from(delta);
        h.rem_euclid(256) as u8
    };
    let hue = if delta == 0 {
        0
    } else if max == r {
        sector(0, g, b)
    } else if max == g {
        sector(85, b, r)
    } else {
        sector(171, r, g)
    };

    Hsv { hue, sat, val: max }
}
