//! Quad-line display bus driver
//!
//! Command-protocol framing shared by the RM67162 and SH8501:
//!
//! - Register write: opcode `0x02` in the command phase, register number
//!   shifted into the address phase, parameters on D0 only.
//! - Pixel write: opcode `0x32`, RAMWR in the address phase, pixel data on
//!   all four lines. Only the first chunk carries command and address; the
//!   rest continue the same memory write while CS stays low.
//!
//! Chip select is a plain GPIO owned by the driver, never by the bus.

use amoled_core::command::{self as cmd, opcode, register_address};
use amoled_core::config::{PanelDescriptor, BYTES_PER_PIXEL, SETTLE_DELAY_MS};
use amoled_core::window::{AddressWindow, WindowError};
use amoled_hal::{DataLines, Level, OutputPin, Phase, QspiBus, QspiConfig, Transaction};
use embedded_hal::delay::DelayNs;

/// Size of the on-stack staging buffer for pixel pushes
pub const STAGE_BYTES: usize = 4096;

/// Reset pulse timing: settle high, hold low, recover high
const RESET_HIGH_MS: u32 = 200;
const RESET_LOW_MS: u32 = 300;

/// Display bus errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// The bus refused the claim
    Claim(E),
    /// A transaction failed on the wire
    Transfer(E),
    /// Addressing window rejected, nothing was sent
    Window(WindowError),
    /// Pixel count does not match the current window
    PixelCountMismatch {
        /// Pixels the window holds
        expected: u32,
        /// Pixels requested
        actual: u32,
    },
    /// Pixel slice is shorter than the requested count
    BufferTooShort {
        /// Pixels requested
        needed: u32,
        /// Pixels supplied
        available: u32,
    },
    /// Pixels pushed before any window was set
    WindowNotSet,
    /// Command or address does not fit the panel's phase widths
    Framing,
    /// Bus not initialized
    NotReady,
    /// Bus already initialized
    AlreadyInitialized,
    /// Panel needs a retained frame and none of the right size is attached
    FrameBuffer,
}

/// Chip-select and reset outputs handed to and back from the driver
#[derive(Debug)]
pub struct BusPins<O> {
    /// Chip select (active low)
    pub cs: O,
    /// Panel reset (active low)
    pub rst: O,
}

/// Failed `init_bus`: the error plus the pins, returned untouched
#[derive(Debug)]
pub struct InitBusError<E, O> {
    /// What went wrong
    pub error: DisplayError<E>,
    /// Pins passed in, for the caller to release
    pub pins: BusPins<O>,
}

/// Runtime state that exists only while the bus is claimed
struct Handle<O> {
    panel: PanelDescriptor,
    pins: BusPins<O>,
    window: Option<AddressWindow>,
    brightness: u8,
}

/// Display bus driver
///
/// Owns the quad-line channel for its whole life. The channel is claimed
/// by [`init_bus`](Self::init_bus) and given back by
/// [`release`](Self::release).
///
/// Panels without their own frame memory (a nonzero `frame_buffer_size`)
/// need a frame attached with [`with_frame_buffer`](Self::with_frame_buffer).
/// Every push to such a panel is copied into the frame first and sent from
/// there, so the frame always mirrors what was last drawn. Panels with
/// frame memory ignore an attached frame.
pub struct DisplayBus<B, O> {
    bus: B,
    frame: Option<&'static mut [u16]>,
    handle: Option<Handle<O>>,
}

impl<B, O> DisplayBus<B, O>
where
    B: QspiBus,
    O: OutputPin,
{
    /// Wrap an unclaimed bus
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            frame: None,
            handle: None,
        }
    }

    /// Wrap an unclaimed bus together with a retained frame, one `u16` per
    /// panel pixel, row-major
    pub fn with_frame_buffer(bus: B, frame: &'static mut [u16]) -> Self {
        Self {
            bus,
            frame: Some(frame),
            handle: None,
        }
    }

    /// Number of pixels the attached frame holds
    pub fn frame_len(&self) -> Option<usize> {
        self.frame.as_ref().map(|f| f.len())
    }

    /// Retained frame, if the running panel keeps one
    pub fn frame(&self) -> Option<&[u16]> {
        let retains = self.handle.as_ref()?.panel.needs_frame_buffer();
        if retains {
            self.frame.as_deref()
        } else {
            None
        }
    }

    /// Check if the bus is claimed and the panel out of reset
    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    /// Panel this bus was initialized for
    pub fn panel(&self) -> Option<&PanelDescriptor> {
        self.handle.as_ref().map(|h| &h.panel)
    }

    /// Claim the bus for `panel` and pulse the panel reset
    ///
    /// On failure nothing stays claimed and the pins are handed back.
    pub fn init_bus<D: DelayNs>(
        &mut self,
        panel: &PanelDescriptor,
        mut cs: O,
        mut rst: O,
        delay: &mut D,
    ) -> Result<(), InitBusError<B::Error, O>> {
        if self.handle.is_some() {
            return Err(InitBusError {
                error: DisplayError::AlreadyInitialized,
                pins: BusPins { cs, rst },
            });
        }

        if panel.needs_frame_buffer() {
            let needed = panel.frame_buffer_size as usize / BYTES_PER_PIXEL;
            if self.frame_len() != Some(needed) {
                error!("{} needs a {} pixel frame", panel.name, needed);
                return Err(InitBusError {
                    error: DisplayError::FrameBuffer,
                    pins: BusPins { cs, rst },
                });
            }
        }

        let config = QspiConfig {
            data_pins: panel.data_pins,
            clock_pin: panel.sck,
            frequency_hz: panel.frequency_hz,
            command_bits: panel.command_bits,
            address_bits: panel.address_bits,
            mode: Default::default(),
        };

        if let Err(e) = self.bus.claim(&config) {
            error!("display bus claim failed for {}", panel.name);
            return Err(InitBusError {
                error: DisplayError::Claim(e),
                pins: BusPins { cs, rst },
            });
        }

        cs.set_high();

        rst.set_level(Level::High);
        delay.delay_ms(RESET_HIGH_MS);
        rst.set_level(Level::Low);
        delay.delay_ms(RESET_LOW_MS);
        rst.set_level(Level::High);
        delay.delay_ms(RESET_HIGH_MS);

        debug!(
            "display bus up: {} at {} Hz",
            panel.name,
            panel.frequency_hz
        );

        self.handle = Some(Handle {
            panel: *panel,
            pins: BusPins { cs, rst },
            window: None,
            brightness: 0,
        });
        Ok(())
    }

    /// Send one register write
    ///
    /// CS is released again whether or not the transfer succeeds.
    pub fn write_command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError<B::Error>> {
        let handle = self.handle.as_mut().ok_or(DisplayError::NotReady)?;

        let command_phase = Phase::new(opcode::WRITE_REG as u32, handle.panel.command_bits);
        let address_phase = Phase::new(register_address(command), handle.panel.address_bits);
        if !command_phase.fits() || !address_phase.fits() {
            return Err(DisplayError::Framing);
        }

        let transaction = Transaction {
            command: Some(command_phase),
            address: Some(address_phase),
            data: params,
            data_lines: DataLines::Single,
        };

        handle.pins.cs.set_low();
        let result = self.bus.transmit(&transaction);
        handle.pins.cs.set_high();

        result.map_err(|e| {
            warn!("register {=u8:#x} write failed", command);
            DisplayError::Transfer(e)
        })
    }

    /// Send the panel's init sequence, honoring each post-delay
    ///
    /// Stops at the first fault.
    pub fn run_init_sequence<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError<B::Error>> {
        let sequence = self
            .handle
            .as_ref()
            .ok_or(DisplayError::NotReady)?
            .panel
            .init_sequence;

        for entry in sequence {
            self.write_command(entry.command, entry.params)?;
            if entry.delay_ms > 0 {
                delay.delay_ms(entry.delay_ms as u32);
            }
        }

        trace!("init sequence done ({} commands)", sequence.len());
        Ok(())
    }

    /// Set the addressing window, inclusive on both ends
    ///
    /// An invalid window is rejected before anything is sent and the
    /// recorded window is left as it was.
    pub fn set_address_window(
        &mut self,
        x_start: u16,
        y_start: u16,
        x_end: u16,
        y_end: u16,
    ) -> Result<(), DisplayError<B::Error>> {
        let panel = self.handle.as_ref().ok_or(DisplayError::NotReady)?.panel;
        let window = AddressWindow::new(x_start, y_start, x_end, y_end, panel.width, panel.height)
            .map_err(DisplayError::Window)?;
        self.apply_window(window)
    }

    fn apply_window(&mut self, window: AddressWindow) -> Result<(), DisplayError<B::Error>> {
        let result = self
            .write_command(cmd::CASET, &window.column_params())
            .and_then(|_| self.write_command(cmd::RASET, &window.row_params()))
            .and_then(|_| self.write_command(cmd::RAMWR, &[]));

        if let Some(handle) = self.handle.as_mut() {
            // A half-written window leaves the panel's pointer unknown
            handle.window = result.is_ok().then_some(window);
        }
        result
    }

    /// Stream `count` RGB565 pixels into the current window, row-major
    ///
    /// `count` must equal the window area and `pixels` must hold at least
    /// that many entries. On panels that retain a frame the pixels land in
    /// the frame first and are sent from it.
    pub fn push_colors(&mut self, pixels: &[u16], count: u32) -> Result<(), DisplayError<B::Error>> {
        let handle = self.handle.as_mut().ok_or(DisplayError::NotReady)?;
        let window = handle.window.ok_or(DisplayError::WindowNotSet)?;

        if count != window.pixel_count() {
            return Err(DisplayError::PixelCountMismatch {
                expected: window.pixel_count(),
                actual: count,
            });
        }
        let pixels = pixels
            .get(..count as usize)
            .ok_or(DisplayError::BufferTooShort {
                needed: count,
                available: pixels.len() as u32,
            })?;

        let stride = handle.panel.width;
        let result = match self.frame.as_deref_mut() {
            Some(frame) if handle.panel.needs_frame_buffer() => {
                blit(frame, stride, window, pixels);
                send_pixels(&mut self.bus, handle, frame_rect(frame, stride, window))
            }
            _ => send_pixels(&mut self.bus, handle, pixels.iter().copied()),
        };

        result.map_err(|e| {
            warn!("pixel push of {} failed", count);
            DisplayError::Transfer(e)
        })
    }

    /// Send the whole retained frame to the panel
    ///
    /// Leaves the addressing window covering the full panel.
    pub fn flush_frame(&mut self) -> Result<(), DisplayError<B::Error>> {
        let panel = self.handle.as_ref().ok_or(DisplayError::NotReady)?.panel;
        if !panel.needs_frame_buffer() {
            return Err(DisplayError::FrameBuffer);
        }
        let window = AddressWindow::from_rect(0, 0, panel.width, panel.height, panel.width, panel.height)
            .map_err(DisplayError::Window)?;
        self.apply_window(window)?;

        let handle = self.handle.as_mut().ok_or(DisplayError::NotReady)?;
        let frame = self.frame.as_deref().ok_or(DisplayError::FrameBuffer)?;
        send_pixels(&mut self.bus, handle, frame_rect(frame, panel.width, window))
            .map_err(DisplayError::Transfer)
    }

    /// Set the window to `width` x `height` at (`x`, `y`) and fill it
    pub fn push_colors_at(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[u16],
    ) -> Result<(), DisplayError<B::Error>> {
        let panel = self.handle.as_ref().ok_or(DisplayError::NotReady)?.panel;
        let window = AddressWindow::from_rect(x, y, width, height, panel.width, panel.height)
            .map_err(DisplayError::Window)?;
        self.apply_window(window)?;
        self.push_colors(pixels, window.pixel_count())
    }

    /// Current addressing window
    pub fn window(&self) -> Option<AddressWindow> {
        self.handle.as_ref().and_then(|h| h.window)
    }

    /// Set panel brightness (0-255)
    ///
    /// The level is recorded even when the panel has no brightness command
    /// or the write fails.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), DisplayError<B::Error>> {
        let handle = self.handle.as_mut().ok_or(DisplayError::NotReady)?;
        handle.brightness = level;
        let command = handle.panel.brightness_command;

        match command {
            Some(command) => self.write_command(command, &[level]),
            None => Ok(()),
        }
    }

    /// Last brightness level set
    pub fn brightness(&self) -> Option<u8> {
        self.handle.as_ref().map(|h| h.brightness)
    }

    /// Put the panel into sleep mode
    pub fn sleep_in(&mut self) -> Result<(), DisplayError<B::Error>> {
        self.write_command(cmd::SLPIN, &[])
    }

    /// Leave sleep mode and turn the display back on
    ///
    /// The panel forgets its addressing window, so the recorded one is
    /// cleared.
    pub fn sleep_out<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DisplayError<B::Error>> {
        self.write_command(cmd::SLPOUT, &[])?;
        delay.delay_ms(SETTLE_DELAY_MS as u32);
        self.write_command(cmd::DISPON, &[])?;

        if let Some(handle) = self.handle.as_mut() {
            handle.window = None;
        }
        Ok(())
    }

    /// Release the bus and hand back the pins
    ///
    /// Returns `None` if the bus was never initialized.
    pub fn release(&mut self) -> Option<BusPins<O>> {
        let mut handle = self.handle.take()?;
        handle.pins.cs.set_high();
        self.bus.release();
        debug!("display bus released");
        Some(handle.pins)
    }
}

/// Send one pixel write with CS held low across every chunk
fn send_pixels<B, O, I>(bus: &mut B, handle: &mut Handle<O>, pixels: I) -> Result<(), B::Error>
where
    B: QspiBus,
    O: OutputPin,
    I: Iterator<Item = u16>,
{
    let command = Phase::new(opcode::WRITE_PIXELS_QUAD as u32, handle.panel.command_bits);
    let address = Phase::new(register_address(cmd::RAMWR), handle.panel.address_bits);

    handle.pins.cs.set_low();
    let result = stream_pixels(bus, command, address, pixels);
    handle.pins.cs.set_high();
    result
}

/// Encode pixels big-endian into the staging buffer and send chunk by chunk
///
/// Only the first chunk carries the command and address phases.
fn stream_pixels<B, I>(bus: &mut B, command: Phase, address: Phase, pixels: I) -> Result<(), B::Error>
where
    B: QspiBus,
    I: Iterator<Item = u16>,
{
    let mut stage = [0u8; STAGE_BYTES];
    let mut filled = 0;
    let mut first = true;

    let mut send = |bus: &mut B, data: &[u8]| {
        let transaction = if first {
            Transaction {
                command: Some(command),
                address: Some(address),
                data,
                data_lines: DataLines::Quad,
            }
        } else {
            Transaction::continuation(data, DataLines::Quad)
        };
        first = false;
        bus.transmit(&transaction)
    };

    for px in pixels {
        stage[filled..filled + BYTES_PER_PIXEL].copy_from_slice(&px.to_be_bytes());
        filled += BYTES_PER_PIXEL;
        if filled == STAGE_BYTES {
            send(bus, &stage[..])?;
            filled = 0;
        }
    }
    if filled > 0 {
        send(bus, &stage[..filled])?;
    }

    Ok(())
}

/// Copy a window's worth of row-major pixels into the frame
fn blit(frame: &mut [u16], stride: u16, window: AddressWindow, pixels: &[u16]) {
    let stride = stride as usize;
    let x = window.x_start as usize;
    for (row, src) in pixels.chunks_exact(window.width() as usize).enumerate() {
        let base = (window.y_start as usize + row) * stride + x;
        frame[base..base + src.len()].copy_from_slice(src);
    }
}

/// Pixels of `window` read back from the frame, row-major
fn frame_rect(frame: &[u16], stride: u16, window: AddressWindow) -> impl Iterator<Item = u16> + '_ {
    let stride = stride as usize;
    let (x_start, x_end) = (window.x_start as usize, window.x_end as usize);
    (window.y_start as usize..=window.y_end as usize).flat_map(move |y| {
        frame[y * stride + x_start..=y * stride + x_end]
            .iter()
            .copied()
    })
}
