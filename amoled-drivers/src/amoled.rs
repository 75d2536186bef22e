//! Board lifecycle controller
//!
//! [`Amoled`] selects a board, brings up the display bus, the panel and
//! whatever peripherals the board carries, and takes them down again for
//! sleep. Every step is reported to the [`State`] machine; any failure
//! during bring-up unwinds what was acquired, in reverse order, and leaves
//! the controller uninitialized so `begin` can be retried.

use heapless::Vec;

use amoled_core::config::{BoardDescriptor, BoardVariant, ConfigError, TouchModel};
use amoled_core::state::{Event, State};
use amoled_core::window::AddressWindow;
use amoled_core::traits::{LightSensing, PowerManagement, TouchInput};
use amoled_hal::{GpioBank, Level, OutputPin, PinError, QspiBus};
use embedded_hal::delay::DelayNs;

use crate::display::{DisplayBus, DisplayError};
use crate::touch::TouchPair;

/// Brightness applied right after the init sequence
pub const DEFAULT_BRIGHTNESS: u8 = 255;

/// Hardware a board runs on
///
/// Ties together the bus, GPIO and delay implementations of a chip HAL
/// with the adapters for every peripheral the driver may find on a board.
/// Both touch adapters share one error type so either can be live.
pub trait Platform {
    /// Quad-line SPI channel
    type Bus: QspiBus;
    /// Output pin source
    type Gpio: GpioBank;
    /// Blocking delay
    type Delay: DelayNs;
    /// Error shared by both touch adapters
    type TouchError: core::fmt::Debug;
    /// CST816 touch adapter
    type Cst816: TouchInput<Error = Self::TouchError>;
    /// CHSC5816 touch adapter
    type Chsc5816: TouchInput<Error = Self::TouchError>;
    /// PMU adapter
    type Pmu: PowerManagement;
    /// Ambient light sensor adapter
    type Sensor: LightSensing;
}

/// Everything the controller owns, handed over once at construction
pub struct Peripherals<P: Platform> {
    /// Display bus channel
    pub bus: P::Bus,
    /// GPIO bank for CS, reset and power-enable lines
    pub gpio: P::Gpio,
    /// Delay provider
    pub delay: P::Delay,
    /// Touch adapters
    pub touch: TouchPair<P::Cst816, P::Chsc5816>,
    /// PMU adapter
    pub pmu: P::Pmu,
    /// Light sensor adapter
    pub sensor: P::Sensor,
    /// Retained frame for boards whose panel has no frame memory, one
    /// `u16` per panel pixel
    pub frame_buffer: Option<&'static mut [u16]>,
}

type Output<P> = <<P as Platform>::Gpio as GpioBank>::Output;
type BusError<P> = <<P as Platform>::Bus as QspiBus>::Error;
type PmuError<P> = <<P as Platform>::Pmu as PowerManagement>::Error;
type SensorError<P> = <<P as Platform>::Sensor as LightSensing>::Error;

/// Which step of `begin` failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BeginError {
    /// Board descriptor failed validation
    Config(ConfigError),
    /// A control pin could not be claimed
    Pin(PinError),
    /// The display bus could not be claimed
    BusClaim,
    /// Init sequence or brightness write failed
    BusTransfer,
    /// Touch controller bring-up failed
    Touch,
    /// PMU bring-up failed
    Pmu,
    /// Light sensor bring-up failed
    Sensor,
    /// Board keeps a frame and none of the panel's size was handed over
    FrameBuffer,
    /// `begin` called while already started
    AlreadyStarted,
}

/// Peripheral access errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeripheralError<E> {
    /// Not fitted on this board, or not running
    NotPresent,
    /// The adapter's own error
    Adapter(E),
}

/// Peripherals the controller sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    /// Power management IC
    Pmu,
    /// Touch controller of the given family
    Touch(TouchModel),
    /// Ambient light sensor
    Sensor,
}

impl Peripheral {
    /// Number of peripheral kinds, at most one of each runs per board
    pub const COUNT: usize = 3;
}

/// Sleep and wake errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleError {
    /// Operation not allowed in this state
    InvalidState(State),
    /// Panel command failed
    Display,
    /// Peripheral failed to change power state
    Peripheral(Peripheral),
}

/// Lifecycle controller for one board
pub struct Amoled<P: Platform> {
    display: DisplayBus<P::Bus, Output<P>>,
    gpio: P::Gpio,
    delay: P::Delay,
    touch: TouchPair<P::Cst816, P::Chsc5816>,
    pmu: P::Pmu,
    sensor: P::Sensor,
    state: State,
    board: Option<&'static BoardDescriptor>,
    power_enable: Option<Output<P>>,
    /// Peripherals brought up, in bring-up order
    running: Vec<Peripheral, { Peripheral::COUNT }>,
}

impl<P: Platform> Amoled<P> {
    /// Take ownership of the board's hardware
    pub fn new(peripherals: Peripherals<P>) -> Self {
        let display = match peripherals.frame_buffer {
            Some(frame) => DisplayBus::with_frame_buffer(peripherals.bus, frame),
            None => DisplayBus::new(peripherals.bus),
        };
        Self {
            display,
            gpio: peripherals.gpio,
            delay: peripherals.delay,
            touch: peripherals.touch,
            pmu: peripherals.pmu,
            sensor: peripherals.sensor,
            state: State::Uninitialized,
            board: None,
            power_enable: None,
            running: Vec::new(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Descriptor of the running board
    pub fn boards_configure(&self) -> Option<&'static BoardDescriptor> {
        self.board
    }

    /// Panel width of the running board
    pub fn width(&self) -> Option<u16> {
        self.board.map(|b| b.display.width)
    }

    /// Panel height of the running board
    pub fn height(&self) -> Option<u16> {
        self.board.map(|b| b.display.height)
    }

    /// Bring up the 1.91" board
    pub fn begin_amoled_191(&mut self) -> Result<(), BeginError> {
        self.begin(BoardVariant::Amoled191)
    }

    /// Bring up the 1.91" board, optionally leaving touch down
    pub fn begin_amoled_191_with_touch(&mut self, touch: bool) -> Result<(), BeginError> {
        self.begin_with(BoardVariant::Amoled191, touch)
    }

    /// Bring up the 1.47" board
    pub fn begin_amoled_147(&mut self) -> Result<(), BeginError> {
        self.begin(BoardVariant::Amoled147)
    }

    /// Bring up `variant` with every peripheral it has
    pub fn begin(&mut self, variant: BoardVariant) -> Result<(), BeginError> {
        self.begin_with(variant, true)
    }

    fn begin_with(&mut self, variant: BoardVariant, enable_touch: bool) -> Result<(), BeginError> {
        if self.state != State::Uninitialized {
            return Err(BeginError::AlreadyStarted);
        }

        let board = variant.descriptor();
        info!("begin: {}", board.name);
        board.validate().map_err(BeginError::Config)?;

        match self.bring_up(board, enable_touch) {
            Ok(()) => {
                self.board = Some(board);
                self.state = self.state.transition(Event::Activated);
                info!("{} active", board.name);
                Ok(())
            }
            Err(e) => {
                error!("begin failed in {}: {}", self.state, e);
                self.unwind();
                self.state = self.state.transition(Event::BringUpFailed);
                Err(e)
            }
        }
    }

    fn bring_up(&mut self, board: &'static BoardDescriptor, enable_touch: bool) -> Result<(), BeginError> {
        if board.has_framebuffer && self.display.frame_len() != Some(board.display.pixel_count() as usize) {
            return Err(BeginError::FrameBuffer);
        }

        if let Some(pin) = board.power_enable_pin {
            let output = self
                .gpio
                .claim_output(pin, Level::High)
                .map_err(BeginError::Pin)?;
            self.power_enable = Some(output);
        }

        // Bus and panel
        let panel = &board.display;
        let cs = self
            .gpio
            .claim_output(panel.cs, Level::High)
            .map_err(BeginError::Pin)?;
        let rst = match self.gpio.claim_output(panel.rst, Level::High) {
            Ok(rst) => rst,
            Err(e) => {
                self.gpio.release_output(cs);
                return Err(BeginError::Pin(e));
            }
        };
        if let Err(failed) = self.display.init_bus(panel, cs, rst, &mut self.delay) {
            self.gpio.release_output(failed.pins.cs);
            self.gpio.release_output(failed.pins.rst);
            return Err(match failed.error {
                DisplayError::FrameBuffer => BeginError::FrameBuffer,
                _ => BeginError::BusClaim,
            });
        }
        self.state = self.state.transition(Event::BusClaimed);

        self.display
            .run_init_sequence(&mut self.delay)
            .and_then(|_| self.display.set_brightness(DEFAULT_BRIGHTNESS))
            .map_err(|_| BeginError::BusTransfer)?;
        self.state = self.state.transition(Event::PanelInitialized);

        // Peripherals
        if let Some(pins) = board.pmu {
            self.pmu.begin(pins).map_err(|_| BeginError::Pmu)?;
            self.mark_running(Peripheral::Pmu);
        }
        if board.has_touch && enable_touch {
            self.touch
                .select(board.touch_model)
                .begin(&board.touch, panel.width, panel.height)
                .map_err(|_| BeginError::Touch)?;
            self.mark_running(Peripheral::Touch(board.touch_model));
        }
        if let Some(pins) = board.sensor {
            self.sensor.begin(pins).map_err(|_| BeginError::Sensor)?;
            self.mark_running(Peripheral::Sensor);
        }
        self.state = self.state.transition(Event::PeripheralsInitialized);

        Ok(())
    }

    fn mark_running(&mut self, peripheral: Peripheral) {
        debug!("{} up", peripheral);
        let pushed = self.running.push(peripheral);
        debug_assert!(pushed.is_ok(), "peripheral brought up twice");
    }

    /// Release everything acquired by a failed bring-up, newest first
    fn unwind(&mut self) {
        while let Some(peripheral) = self.running.pop() {
            if self.power_down(peripheral).is_err() {
                warn!("{} did not power down", peripheral);
            }
        }

        if let Some(pins) = self.display.release() {
            self.gpio.release_output(pins.cs);
            self.gpio.release_output(pins.rst);
        }

        if let Some(mut output) = self.power_enable.take() {
            output.set_low();
            self.gpio.release_output(output);
        }
    }

    fn power_down(&mut self, peripheral: Peripheral) -> Result<(), LifecycleError> {
        let ok = match peripheral {
            Peripheral::Pmu => self.pmu.power_down_rails().is_ok(),
            Peripheral::Touch(model) => self.touch.select(model).sleep().is_ok(),
            Peripheral::Sensor => self.sensor.power_down().is_ok(),
        };
        if ok {
            Ok(())
        } else {
            Err(LifecycleError::Peripheral(peripheral))
        }
    }

    fn power_up(&mut self, peripheral: Peripheral) -> Result<(), LifecycleError> {
        let ok = match peripheral {
            Peripheral::Pmu => self.pmu.power_up_rails().is_ok(),
            Peripheral::Touch(model) => self.touch.select(model).wakeup().is_ok(),
            Peripheral::Sensor => self.sensor.power_on().is_ok(),
        };
        if ok {
            Ok(())
        } else {
            Err(LifecycleError::Peripheral(peripheral))
        }
    }

    /// Put the panel and peripherals to sleep
    ///
    /// Peripherals go down in reverse bring-up order. If one refuses, the
    /// ones already down are powered up again, the panel is woken and the
    /// controller stays `Active` with its addressing window cleared. If
    /// that restore fails too, the controller is left `Asleep` so
    /// [`wakeup`](Self::wakeup) can finish the job. Either way the
    /// peripheral that refused is returned.
    pub fn sleep(&mut self) -> Result<(), LifecycleError> {
        if self.state != State::Active {
            return Err(LifecycleError::InvalidState(self.state));
        }

        self.display.sleep_in().map_err(|_| LifecycleError::Display)?;
        let running = self.running.clone();
        for (i, &peripheral) in running.iter().enumerate().rev() {
            if let Err(e) = self.power_down(peripheral) {
                warn!("{} refused to sleep, restoring", peripheral);
                if self.restore(&running[i + 1..]).is_err() {
                    error!("restore after failed sleep failed");
                    self.state = self.state.transition(Event::Slept);
                }
                return Err(e);
            }
        }

        self.state = self.state.transition(Event::Slept);
        info!("asleep");
        Ok(())
    }

    /// Wake peripherals and panel, restoring brightness
    ///
    /// Stays `Asleep` on failure, so calling again is safe. The addressing
    /// window must be set again before pushing pixels.
    pub fn wakeup(&mut self) -> Result<(), LifecycleError> {
        if self.state != State::Asleep {
            return Err(LifecycleError::InvalidState(self.state));
        }

        let running = self.running.clone();
        self.restore(&running)?;

        self.state = self.state.transition(Event::Woken);
        info!("awake");
        Ok(())
    }

    /// Power `peripherals` up in order, then take the panel out of sleep at
    /// the last brightness
    fn restore(&mut self, peripherals: &[Peripheral]) -> Result<(), LifecycleError> {
        for &peripheral in peripherals {
            self.power_up(peripheral)?;
        }

        let level = self.display.brightness().unwrap_or(DEFAULT_BRIGHTNESS);
        self.display
            .sleep_out(&mut self.delay)
            .and_then(|_| self.display.set_brightness(level))
            .map_err(|_| LifecycleError::Display)
    }

    fn is_running(&self, peripheral: Peripheral) -> bool {
        self.running.contains(&peripheral)
    }

    // ---- Display ----

    fn active_display(&mut self) -> Result<&mut DisplayBus<P::Bus, Output<P>>, DisplayError<BusError<P>>> {
        if self.state.accepts_pixels() {
            Ok(&mut self.display)
        } else {
            Err(DisplayError::NotReady)
        }
    }

    /// Set the addressing window, inclusive on both ends
    pub fn set_address_window(
        &mut self,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
    ) -> Result<(), DisplayError<BusError<P>>> {
        self.active_display()?
            .set_address_window(x_start, y_start, x_end, y_end)
    }

    /// Stream `count` pixels into the current window
    pub fn push_colors(&mut self, pixels: &[u16], count: u32) -> Result<(), DisplayError<BusError<P>>> {
        self.active_display()?.push_colors(pixels, count)
    }

    /// Fill the `width` x `height` rectangle at (`x`, `y`)
    pub fn push_colors_at(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[u16],
    ) -> Result<(), DisplayError<BusError<P>>> {
        self.active_display()?
            .push_colors_at(x, y, width, height, pixels)
    }

    /// Set panel brightness (0-255)
    pub fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError<BusError<P>>> {
        self.active_display()?.set_brightness(level)
    }

    /// Last brightness level set
    pub fn brightness(&self) -> Option<u8> {
        self.display.brightness()
    }

    /// Current addressing window
    pub fn window(&self) -> Option<AddressWindow> {
        self.display.window()
    }

    /// Retained frame, on boards that keep one
    pub fn frame(&self) -> Option<&[u16]> {
        self.display.frame()
    }

    /// Resend the whole retained frame, e.g. after waking
    pub fn flush_frame(&mut self) -> Result<(), DisplayError<BusError<P>>> {
        self.active_display()?.flush_frame()
    }

    // ---- Touch ----

    fn running_touch(&self) -> Option<TouchModel> {
        if self.state != State::Active {
            return None;
        }
        self.running.iter().find_map(|p| match p {
            Peripheral::Touch(model) => Some(*model),
            _ => None,
        })
    }

    /// Read touch points into `xs` and `ys`, returning how many were written
    pub fn get_point(
        &mut self,
        xs: &mut [i16],
        ys: &mut [i16],
    ) -> Result<u8, PeripheralError<P::TouchError>> {
        let model = self.running_touch().ok_or(PeripheralError::NotPresent)?;
        self.touch
            .select(model)
            .get_point(xs, ys)
            .map_err(PeripheralError::Adapter)
    }

    /// Check if the panel is being touched
    pub fn is_pressed(&mut self) -> bool {
        match self.running_touch() {
            Some(model) => self.touch.select(model).is_pressed(),
            None => false,
        }
    }

    // ---- PMU ----

    fn pmu(&mut self) -> Result<&mut P::Pmu, PeripheralError<PmuError<P>>> {
        // The PMU itself stays reachable while its rails are down
        let awake = matches!(self.state, State::Active | State::Asleep);
        if awake && self.is_running(Peripheral::Pmu) {
            Ok(&mut self.pmu)
        } else {
            Err(PeripheralError::NotPresent)
        }
    }

    /// Register a callback for the PMU interrupt line
    pub fn attach_pmu(&mut self, callback: fn()) -> Result<(), PeripheralError<PmuError<P>>> {
        self.pmu()?
            .attach_interrupt(callback)
            .map_err(PeripheralError::Adapter)
    }

    /// Read the PMU interrupt status
    pub fn read_pmu(&mut self) -> Result<u64, PeripheralError<PmuError<P>>> {
        self.pmu()?.read_irq_status().map_err(PeripheralError::Adapter)
    }

    /// Clear pending PMU interrupts
    pub fn clear_pmu(&mut self) -> Result<(), PeripheralError<PmuError<P>>> {
        self.pmu()?.clear_irq_status().map_err(PeripheralError::Adapter)
    }

    /// Unmask PMU interrupts
    pub fn enable_pmu_interrupt(&mut self, mask: u32) -> Result<(), PeripheralError<PmuError<P>>> {
        self.pmu()?.enable_irq(mask).map_err(PeripheralError::Adapter)
    }

    /// Mask PMU interrupts
    pub fn disable_pmu_interrupt(&mut self, mask: u32) -> Result<(), PeripheralError<PmuError<P>>> {
        self.pmu()?.disable_irq(mask).map_err(PeripheralError::Adapter)
    }

    /// Battery voltage in millivolts
    pub fn battery_voltage(&mut self) -> Result<u16, PeripheralError<PmuError<P>>> {
        self.pmu()?
            .battery_voltage_mv()
            .map_err(PeripheralError::Adapter)
    }

    // ---- Light sensor ----

    /// Ambient light in lux
    pub fn read_lux(&mut self) -> Result<f32, PeripheralError<SensorError<P>>> {
        if self.state != State::Active || !self.is_running(Peripheral::Sensor) {
            return Err(PeripheralError::NotPresent);
        }
        self.sensor.read_lux().map_err(PeripheralError::Adapter)
    }
}
