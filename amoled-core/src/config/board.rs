//! Board descriptors
//!
//! A board descriptor composes one panel with the pins of everything else
//! soldered next to it. Descriptors are `const` data; the lifecycle
//! controller only ever holds a `&'static` reference to one of them.

use heapless::FnvIndexSet;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::panel::{PanelDescriptor, RM67162_AMOLED, SH8501_AMOLED};
use super::ConfigError;

/// Upper bound on distinct pins a board may use
const MAX_BOARD_PINS: usize = 64;

/// Touch controller pins (I2C + interrupt + optional reset)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TouchPins {
    /// I2C data
    pub sda: u8,
    /// I2C clock
    pub scl: u8,
    /// Interrupt
    pub irq: u8,
    /// Reset, not wired on every board
    pub rst: Option<u8>,
}

/// Power management IC pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PmuPins {
    /// I2C data
    pub sda: u8,
    /// I2C clock
    pub scl: u8,
    /// Interrupt
    pub irq: u8,
}

/// Ambient light sensor pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SensorPins {
    /// I2C data
    pub sda: u8,
    /// I2C clock
    pub scl: u8,
    /// Interrupt
    pub irq: u8,
}

/// Touch controller fitted to a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum TouchModel {
    /// Hynitron CST816 family
    Cst816,
    /// Chipsemi CHSC5816
    Chsc5816,
}

/// Complete description of one board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BoardDescriptor {
    /// Marketing name
    pub name: &'static str,
    /// Display panel
    pub display: PanelDescriptor,
    /// Touch controller pins
    pub touch: TouchPins,
    /// Touch controller model
    pub touch_model: TouchModel,
    /// PMU pins, `None` when the board has no PMU
    pub pmu: Option<&'static PmuPins>,
    /// Light sensor pins, `None` when the board has no sensor
    pub sensor: Option<&'static SensorPins>,
    /// User buttons
    pub buttons: &'static [u8],
    /// Addressable LED data line
    pub pixels_pin: Option<u8>,
    /// Battery ADC input
    pub adc_pin: Option<u8>,
    /// PMIC / panel power enable line
    pub power_enable_pin: Option<u8>,
    /// Driver keeps a frame buffer for this panel
    pub has_framebuffer: bool,
    /// Board has a touch controller
    pub has_touch: bool,
}

impl BoardDescriptor {
    /// Number of user buttons
    pub const fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Check panel invariants and pin assignments
    ///
    /// Every pin may be used once, except I2C data and clock lines, which
    /// the touch controller, PMU and sensor may share with each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.display.validate()?;

        if self.has_framebuffer != self.display.needs_frame_buffer() {
            return Err(ConfigError::FrameBufferMismatch);
        }

        let mut exclusive: FnvIndexSet<u8, MAX_BOARD_PINS> = FnvIndexSet::new();
        let mut claim = |pin: u8| -> Result<(), ConfigError> {
            match exclusive.insert(pin) {
                Ok(true) => Ok(()),
                Ok(false) => Err(ConfigError::PinConflict(pin)),
                Err(_) => Err(ConfigError::TooManyPins),
            }
        };

        for pin in self.display.bus_pins() {
            claim(pin)?;
        }

        claim(self.touch.irq)?;
        if let Some(rst) = self.touch.rst {
            claim(rst)?;
        }
        if let Some(pmu) = self.pmu {
            claim(pmu.irq)?;
        }
        if let Some(sensor) = self.sensor {
            claim(sensor.irq)?;
        }
        for &button in self.buttons {
            claim(button)?;
        }
        for pin in [self.pixels_pin, self.adc_pin, self.power_enable_pin]
            .into_iter()
            .flatten()
        {
            claim(pin)?;
        }

        for pin in self.i2c_pins() {
            if exclusive.contains(&pin) {
                return Err(ConfigError::PinConflict(pin));
            }
        }

        Ok(())
    }

    /// I2C data and clock lines of all I2C peripherals, with repeats
    fn i2c_pins(&self) -> impl Iterator<Item = u8> + '_ {
        let touch = [self.touch.sda, self.touch.scl];
        let pmu = self.pmu.map(|p| [p.sda, p.scl]);
        let sensor = self.sensor.map(|s| [s.sda, s.scl]);
        touch
            .into_iter()
            .chain(pmu.into_iter().flatten())
            .chain(sensor.into_iter().flatten())
    }
}

const AMOLED_191_BUTTONS: [u8; 1] = [0];

const AMOLED_147_BUTTONS: [u8; 2] = [0, 21];
const AMOLED_147_PMU_PINS: PmuPins = PmuPins {
    sda: 1,
    scl: 2,
    irq: 3,
};
const AMOLED_147_SENSOR_PINS: SensorPins = SensorPins {
    sda: 1,
    scl: 2,
    irq: 8,
};

/// LILYGO T-Display S3 AMOLED 1.91" (RM67162 + CST816)
pub const BOARD_AMOLED_191: BoardDescriptor = BoardDescriptor {
    name: "T-Display-S3 AMOLED 1.91",
    display: RM67162_AMOLED,
    touch: TouchPins {
        sda: 3,
        scl: 2,
        irq: 21,
        rst: None,
    },
    touch_model: TouchModel::Cst816,
    pmu: None,
    sensor: None,
    buttons: &AMOLED_191_BUTTONS,
    pixels_pin: None,
    adc_pin: Some(4),
    power_enable_pin: Some(38),
    has_framebuffer: false,
    has_touch: true,
};

/// LILYGO T-Display AMOLED 1.47" (SH8501 + CHSC5816 + AXP2101 + CM32181)
pub const BOARD_AMOLED_147: BoardDescriptor = BoardDescriptor {
    name: "T-Display AMOLED 1.47",
    display: SH8501_AMOLED,
    touch: TouchPins {
        sda: 1,
        scl: 2,
        irq: 13,
        rst: Some(14),
    },
    touch_model: TouchModel::Chsc5816,
    pmu: Some(&AMOLED_147_PMU_PINS),
    sensor: Some(&AMOLED_147_SENSOR_PINS),
    buttons: &AMOLED_147_BUTTONS,
    pixels_pin: Some(18),
    adc_pin: None,
    power_enable_pin: None,
    has_framebuffer: true,
    has_touch: true,
};

/// Supported boards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum BoardVariant {
    /// 1.91" RM67162 board
    Amoled191,
    /// 1.47" SH8501 board
    Amoled147,
}

impl BoardVariant {
    /// Resolve the board descriptor for this variant
    pub const fn descriptor(self) -> &'static BoardDescriptor {
        match self {
            BoardVariant::Amoled191 => &BOARD_AMOLED_191,
            BoardVariant::Amoled147 => &BOARD_AMOLED_147,
        }
    }
}
