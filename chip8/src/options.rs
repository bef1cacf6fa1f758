use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

/// 24-bit RGB color, parseable from `RRGGBB` or `#RRGGBB` so it can be used
/// directly as a CLI value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 0xFF,
        g: 0xFF,
        b: 0xFF,
    };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        anyhow::ensure!(hex.len() == 6, "expected a RRGGBB hex color, got {s:?}");
        let value = u32::from_str_radix(hex, 16)
            .with_context(|| format!("parse {s:?} as a hex color"))?;
        Ok(Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        })
    }
}

/// Presenter configuration, built once at startup and passed by reference
/// into the rendering adapter.
#[derive(Debug, Clone, Copy)]
pub struct VideoOptions {
    /// How many surface pixels one framebuffer cell covers.
    pub scale_factor: u32,
    pub foreground: Color,
    pub background: Color,
    /// Outline lit cells in the background color.
    pub outlines: bool,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            scale_factor: 10,
            foreground: Color::WHITE,
            background: Color::BLACK,
            outlines: true,
        }
    }
}

/// Interpreter loop pacing.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Instruction budget per tick; the emulated clock rate is
    /// `steps_per_frame / frame_interval`.
    pub steps_per_frame: usize,
    pub frame_interval: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            steps_per_frame: 11,
            frame_interval: Duration::new(0, 1_000_000_000u32 / 60),
        }
    }
}
