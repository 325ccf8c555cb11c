//! # Joystick Device Module
//!
//! Detects, opens and reads a joystick through the Linux evdev interface and
//! turns its events into [`RawEvent`]s with SDL-style numbering.
//!
//! ## Detection
//!
//! A device counts as a joystick when it reports keys in the joystick/gamepad
//! button range (`BTN_JOYSTICK` to `BTN_DIGI`). Exactly one must be connected
//! unless a device path is configured.
//!
//! ## Numbering
//!
//! | Control | Index |
//! |---------|-------|
//! | Buttons | Supported keys from `BTN_JOYSTICK` upwards, then `BTN_MISC` to `BTN_JOYSTICK` |
//! | Axes | Supported absolute axes in code order, hat axes excluded |
//! | Hats | `ABS_HAT0X/Y` is hat 0, `ABS_HAT1X/Y` is hat 1, ... |
//!
//! For an X-Box 360 pad this gives A=0, B=1, X=2, Y=3, LB=4, RB=5, Back=6,
//! Start=7, Guide=8, left stick click=9, right stick click=10 and axes
//! left X=0, left Y=1, LT=2, right X=3, right Y=4, RT=5.
//!
//! Axis values are rescaled from the device range to `-32768..=32767`.

use evdev::{AbsoluteAxisType, Device, EventStream, InputEvent, InputEventKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::event::RawEvent;
use crate::error::{PadError, Result};
use crate::session::runner::EventSource;

/// First generic button code (`BTN_0`).
pub const BTN_MISC: u16 = 0x100;
/// First joystick button code (`BTN_TRIGGER`).
pub const BTN_JOYSTICK: u16 = 0x120;
/// First digitizer code, end of the gamepad range.
pub const BTN_DIGI: u16 = 0x140;

/// `ABS_HAT0X`
pub const ABS_HAT_FIRST: u16 = 0x10;
/// `ABS_HAT3Y`
pub const ABS_HAT_LAST: u16 = 0x17;
/// Hats addressable through `ABS_HAT0X..=ABS_HAT3Y`.
pub const HAT_COUNT: usize = 4;

const HAT_UP: u8 = 0x1;
const HAT_RIGHT: u8 = 0x2;
const HAT_DOWN: u8 = 0x4;
const HAT_LEFT: u8 = 0x8;

/// Reported range of one absolute axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub code: u16,
    pub minimum: i32,
    pub maximum: i32,
}

/// Dense button and axis numbering of one device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoystickLayout {
    buttons: Vec<u16>,
    axes: Vec<AxisRange>,
    hats: usize,
}

impl JoystickLayout {
    /// Builds the numbering from key codes and absolute axes.
    ///
    /// Hat axes among `axes` are counted as hats, not numbered as axes.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = u16>, axes: impl IntoIterator<Item = AxisRange>) -> Self {
        let mut keys: Vec<u16> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();

        let mut buttons: Vec<u16> = keys.iter().copied().filter(|&code| code >= BTN_JOYSTICK).collect();
        buttons.extend(keys.iter().copied().filter(|&code| (BTN_MISC..BTN_JOYSTICK).contains(&code)));

        let mut hat_axes = Vec::new();
        let mut numbered = Vec::new();
        for range in axes {
            if is_hat_axis(range.code) {
                hat_axes.push(range.code);
            } else {
                numbered.push(range);
            }
        }
        numbered.sort_unstable_by_key(|range| range.code);
        numbered.dedup_by_key(|range| range.code);

        hat_axes.sort_unstable();
        hat_axes.dedup_by_key(|code| hat_id(*code));

        Self {
            buttons,
            axes: numbered,
            hats: hat_axes.len(),
        }
    }

    /// Reads the layout of an open device.
    ///
    /// # Errors
    ///
    /// Returns `Joystick` error if the axis ranges cannot be queried.
    pub fn from_device(device: &Device) -> Result<Self> {
        let keys: Vec<u16> = device
            .supported_keys()
            .map(|keys| keys.iter().map(|key| key.code()).collect())
            .unwrap_or_default();

        let axis_codes: Vec<AbsoluteAxisType> = device
            .supported_absolute_axes()
            .map(|axes| axes.iter().collect())
            .unwrap_or_default();

        let abs_state = if axis_codes.is_empty() {
            None
        } else {
            Some(device.get_abs_state().map_err(|e| {
                PadError::Joystick(format!("Failed to read axis ranges: {}", e))
            })?)
        };

        let axes = axis_codes.into_iter().map(|axis| {
            let (minimum, maximum) = abs_state
                .as_ref()
                .and_then(|state| state.get(axis.0 as usize))
                .map(|info| (info.minimum, info.maximum))
                .unwrap_or((i32::from(i16::MIN), i32::from(i16::MAX)));
            AxisRange { code: axis.0, minimum, maximum }
        });

        Ok(Self::new(keys, axes))
    }

    /// Index of button `code`, if the device has it.
    #[must_use]
    pub fn button_index(&self, code: u16) -> Option<usize> {
        self.buttons.iter().position(|&c| c == code)
    }

    /// Index and range of axis `code`, if the device has it.
    #[must_use]
    pub fn axis(&self, code: u16) -> Option<(usize, &AxisRange)> {
        self.axes
            .iter()
            .enumerate()
            .find(|(_, range)| range.code == code)
    }

    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    #[must_use]
    pub fn hat_count(&self) -> usize {
        self.hats
    }
}

fn is_hat_axis(code: u16) -> bool {
    (ABS_HAT_FIRST..=ABS_HAT_LAST).contains(&code)
}

fn hat_id(code: u16) -> usize {
    usize::from((code - ABS_HAT_FIRST) / 2)
}

/// Rescales `value` from `[minimum, maximum]` to the signed 16-bit range.
///
/// A degenerate range passes the value through, clamped.
#[must_use]
pub fn rescale_axis(value: i32, minimum: i32, maximum: i32) -> i16 {
    let scaled = if maximum > minimum {
        let span = i64::from(maximum) - i64::from(minimum);
        (i64::from(value) - i64::from(minimum)) * 65535 / span - 32768
    } else {
        i64::from(value)
    };
    scaled.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}

/// Returns `true` if the device reports joystick or gamepad buttons.
#[must_use]
pub fn is_joystick(device: &Device) -> bool {
    device
        .supported_keys()
        .map(|keys| keys.iter().any(|key| (BTN_JOYSTICK..BTN_DIGI).contains(&key.code())))
        .unwrap_or(false)
}

/// Converts evdev events into raw events using a device layout.
///
/// Hat axes arrive as separate X and Y values; the translator keeps the last
/// pair per hat and reports the combined mask.
#[derive(Debug, Clone)]
pub struct EventTranslator {
    layout: JoystickLayout,
    hats: [(i32, i32); HAT_COUNT],
}

impl EventTranslator {
    #[must_use]
    pub fn new(layout: JoystickLayout) -> Self {
        Self {
            layout,
            hats: [(0, 0); HAT_COUNT],
        }
    }

    #[must_use]
    pub fn layout(&self) -> &JoystickLayout {
        &self.layout
    }

    /// Translates one evdev event.
    ///
    /// Returns `None` for sync and scan-code events and for key auto-repeat.
    pub fn translate(&mut self, event: &InputEvent) -> Option<RawEvent> {
        let unknown = RawEvent::Unknown {
            kind: event.event_type().0,
            code: event.code(),
        };

        match event.kind() {
            InputEventKind::Synchronization(_) | InputEventKind::Misc(_) => None,
            InputEventKind::Key(key) => {
                let Some(index) = self.layout.button_index(key.code()) else {
                    return Some(unknown);
                };
                match event.value() {
                    0 => Some(RawEvent::Button { index, pressed: false }),
                    1 => Some(RawEvent::Button { index, pressed: true }),
                    _ => None,
                }
            }
            InputEventKind::AbsAxis(axis) if is_hat_axis(axis.0) => {
                Some(self.translate_hat(axis.0, event.value()))
            }
            InputEventKind::AbsAxis(axis) => match self.layout.axis(axis.0) {
                Some((index, range)) => Some(RawEvent::Axis {
                    index,
                    value: rescale_axis(event.value(), range.minimum, range.maximum),
                }),
                None => Some(unknown),
            },
            _ => Some(unknown),
        }
    }

    fn translate_hat(&mut self, code: u16, value: i32) -> RawEvent {
        let hat = hat_id(code);
        let (x, y) = &mut self.hats[hat];
        if (code - ABS_HAT_FIRST) % 2 == 0 {
            *x = value;
        } else {
            *y = value;
        }

        let (x, y) = self.hats[hat];
        let mut mask = 0;
        if y < 0 {
            mask |= HAT_UP;
        }
        if x > 0 {
            mask |= HAT_RIGHT;
        }
        if y > 0 {
            mask |= HAT_DOWN;
        }
        if x < 0 {
            mask |= HAT_LEFT;
        }

        RawEvent::Hat { hat, mask }
    }
}

/// An open joystick delivering raw events.
pub struct Joystick {
    device_path: String,
    name: String,
    stream: EventStream,
    translator: EventTranslator,
}

impl std::fmt::Debug for Joystick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Joystick")
            .field("device_path", &self.device_path)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Joystick {
    /// Opens the configured device, or auto-detects the only joystick.
    ///
    /// # Errors
    ///
    /// - `JoystickNotFound`: no joystick connected
    /// - `AmbiguousJoystick`: several joysticks connected and no path given
    /// - `Joystick`: the device cannot be opened or read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dictapi_pad::controller::joystick::Joystick;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> anyhow::Result<()> {
    /// let joystick = Joystick::open(None)?;
    /// println!("Connected to: {}", joystick.device_path());
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let (path, device) = match path {
            Some(path) => {
                let device = Device::open(path).map_err(|e| {
                    PadError::Joystick(format!("Failed to open {}: {}", path.display(), e))
                })?;
                if !is_joystick(&device) {
                    warn!("{} does not report joystick buttons", path.display());
                }
                (path.to_path_buf(), device)
            }
            None => Self::detect()?,
        };

        let layout = JoystickLayout::from_device(&device)?;
        let name = device.name().unwrap_or("unknown").to_string();
        let device_path = path.to_string_lossy().to_string();

        info!("Connected device: {} at {}", name, device_path);
        info!(
            "buttons: {}, axes: {}, hats: {}",
            layout.button_count(),
            layout.axis_count(),
            layout.hat_count()
        );

        let stream = device
            .into_event_stream()
            .map_err(|e| PadError::Joystick(format!("Failed to start event stream: {}", e)))?;

        Ok(Self {
            device_path,
            name,
            stream,
            translator: EventTranslator::new(layout),
        })
    }

    fn detect() -> Result<(PathBuf, Device)> {
        let mut candidates: Vec<(PathBuf, Device)> = evdev::enumerate()
            .filter(|(path, device)| {
                debug!(
                    "Found input device: {} ({})",
                    path.display(),
                    device.name().unwrap_or("unnamed")
                );
                is_joystick(device)
            })
            .collect();

        match candidates.len() {
            0 => Err(PadError::JoystickNotFound),
            1 => Ok(candidates.remove(0)),
            n => {
                for (path, device) in &candidates {
                    warn!("Joystick candidate: {} ({})", path.display(), device.name().unwrap_or("unnamed"));
                }
                Err(PadError::AmbiguousJoystick(n))
            }
        }
    }

    #[must_use]
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn layout(&self) -> &JoystickLayout {
        self.translator.layout()
    }
}

impl EventSource for Joystick {
    async fn next_event(&mut self) -> Result<Option<RawEvent>> {
        loop {
            let event = self
                .stream
                .next_event()
                .await
                .map_err(|e| PadError::Joystick(format!("Failed to fetch events: {}", e)))?;

            if let Some(raw) = self.translator.translate(&event) {
                return Ok(Some(raw));
            }
        }
    }
}
