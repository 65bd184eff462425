//! PCA9685 PWM controller (I2C)
//!
//! 16 channels, 12-bit resolution, internal 25 MHz oscillator. Each
//! channel has four registers (ON_L, ON_H, OFF_L, OFF_H) starting at
//! `LED0_ON_L + 4 * channel`; with auto-increment enabled one write sets
//! all four.
//!
//! # Frequency
//!
//! `prescale = round(25 MHz / (4096 * f)) - 1`, only writable while the
//! oscillator is asleep. Servos run at 50 Hz (20 ms period).

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// PCA9685 register addresses
pub mod reg {
    /// Mode register 1
    pub const MODE1: u8 = 0x00;
    /// Mode register 2
    pub const MODE2: u8 = 0x01;
    /// Channel 0 ON low byte
    pub const LED0_ON_L: u8 = 0x06;
    /// Prescaler for the PWM output frequency
    pub const PRESCALE: u8 = 0xFE;
}

/// MODE1 bits
pub mod mode1 {
    pub const RESTART: u8 = 0x80;
    pub const AUTO_INCREMENT: u8 = 0x20;
    pub const SLEEP: u8 = 0x10;
    pub const ALLCALL: u8 = 0x01;
}

/// MODE2 totem-pole outputs
const MODE2_OUTDRV: u8 = 0x04;

/// Full-off bit in OFF_H
const FULL_OFF: u8 = 0x10;

/// Default I2C address (all address pins low)
pub const DEFAULT_ADDRESS: u8 = 0x40;

/// Standard analog servo frequency
pub const DEFAULT_FREQUENCY_HZ: u16 = 50;

/// Number of PWM channels
pub const CHANNELS: u8 = 16;

/// Internal oscillator frequency
const OSCILLATOR_HZ: u32 = 25_000_000;

/// Counter resolution
const STEPS: u32 = 4096;

/// Supported output frequency range
const MIN_FREQUENCY_HZ: u16 = 24;
const MAX_FREQUENCY_HZ: u16 = 1526;

/// Oscillator start-up time after leaving sleep
const WAKE_DELAY_US: u32 = 500;

/// PCA9685 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError<E> {
    /// I2C transfer failed
    Bus(E),
    /// Channel index ≥ 16
    InvalidChannel,
    /// Frequency outside 24..=1526 Hz
    InvalidFrequency,
}

/// Prescale value for a PWM frequency
pub fn prescale_for(frequency_hz: u16) -> u8 {
    let divisor = STEPS * u32::from(frequency_hz);
    let rounded = (OSCILLATOR_HZ + divisor / 2) / divisor;
    rounded.saturating_sub(1).clamp(3, 255) as u8
}

/// PCA9685 driver
pub struct Pca9685<I2C> {
    i2c: I2C,
    address: u8,
    frequency_hz: u16,
}

impl<I2C: I2c> Pca9685<I2C> {
    /// Create a driver; call [`init`](Self::init) before use
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
        }
    }

    /// Reset the controller and set the output frequency
    pub fn init(
        &mut self,
        delay: &mut impl DelayNs,
        frequency_hz: u16,
    ) -> Result<(), PwmError<I2C::Error>> {
        if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&frequency_hz) {
            return Err(PwmError::InvalidFrequency);
        }

        self.write_reg(reg::MODE2, MODE2_OUTDRV)?;
        self.write_reg(reg::MODE1, mode1::ALLCALL)?;
        delay.delay_us(WAKE_DELAY_US);

        let old_mode = self.read_reg(reg::MODE1)? & !mode1::RESTART;
        self.write_reg(reg::MODE1, old_mode | mode1::SLEEP)?;
        self.write_reg(reg::PRESCALE, prescale_for(frequency_hz))?;
        self.write_reg(reg::MODE1, old_mode)?;
        delay.delay_us(WAKE_DELAY_US);
        self.write_reg(reg::MODE1, old_mode | mode1::RESTART | mode1::AUTO_INCREMENT)?;

        self.frequency_hz = frequency_hz;
        Ok(())
    }

    /// Configured output frequency
    pub fn frequency_hz(&self) -> u16 {
        self.frequency_hz
    }

    /// Counter ticks for a pulse width at the current frequency
    pub fn ticks_for(&self, pulse_us: u16) -> u16 {
        let ticks = (u64::from(pulse_us) * u64::from(STEPS) * u64::from(self.frequency_hz)
            + 500_000)
            / 1_000_000;
        ticks.min(u64::from(STEPS - 1)) as u16
    }

    /// Output a pulse of `pulse_us` microseconds on a channel
    pub fn set_pulse_us(&mut self, channel: u8, pulse_us: u16) -> Result<(), PwmError<I2C::Error>> {
        let off = self.ticks_for(pulse_us);
        self.set_pwm(channel, 0, off)
    }

    /// Set raw ON/OFF counter values for a channel
    pub fn set_pwm(&mut self, channel: u8, on: u16, off: u16) -> Result<(), PwmError<I2C::Error>> {
        let base = Self::channel_reg(channel)?;
        let [on_l, on_h] = on.to_le_bytes();
        let [off_l, off_h] = off.to_le_bytes();
        self.i2c
            .write(self.address, &[base, on_l, on_h, off_l, off_h])
            .map_err(PwmError::Bus)
    }

    /// Stop driving a channel
    pub fn set_off(&mut self, channel: u8) -> Result<(), PwmError<I2C::Error>> {
        let base = Self::channel_reg(channel)?;
        self.i2c
            .write(self.address, &[base, 0, 0, 0, FULL_OFF])
            .map_err(PwmError::Bus)
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn channel_reg(channel: u8) -> Result<u8, PwmError<I2C::Error>> {
        if channel >= CHANNELS {
            return Err(PwmError::InvalidChannel);
        }
        Ok(reg::LED0_ON_L + 4 * channel)
    }

    fn write_reg(&mut self, register: u8, value: u8) -> Result<(), PwmError<I2C::Error>> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(PwmError::Bus)
    }

    fn read_reg(&mut self, register: u8) -> Result<u8, PwmError<I2C::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(PwmError::Bus)?;
        Ok(buf[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBus, NoDelay};
    use embedded_hal::i2c::ErrorKind;

    #[test]
    fn test_prescale() {
        assert_eq!(prescale_for(50), 121);
        assert_eq!(prescale_for(60), 101);
        assert_eq!(prescale_for(1526), 3);
        assert_eq!(prescale_for(24), 253);
    }

    #[test]
    fn test_init_sequence() {
        let mut pwm = Pca9685::new(MockBus::default(), DEFAULT_ADDRESS);
        pwm.init(&mut NoDelay, 50).unwrap();

        let bus = pwm.release();
        assert!(bus.writes.iter().all(|(addr, _)| *addr == DEFAULT_ADDRESS));
        let writes: std::vec::Vec<&[u8]> = bus.writes.iter().map(|(_, w)| w.as_slice()).collect();
        assert_eq!(
            writes,
            [
                &[reg::MODE2, MODE2_OUTDRV][..],
                &[reg::MODE1, mode1::ALLCALL][..],
                &[reg::MODE1][..],
                &[reg::MODE1, mode1::ALLCALL | mode1::SLEEP][..],
                &[reg::PRESCALE, 121][..],
                &[reg::MODE1, mode1::ALLCALL][..],
                &[
                    reg::MODE1,
                    mode1::ALLCALL | mode1::RESTART | mode1::AUTO_INCREMENT,
                ][..],
            ]
        );
    }

    #[test]
    fn test_rejects_bad_frequency() {
        let mut pwm = Pca9685::new(MockBus::default(), DEFAULT_ADDRESS);
        assert_eq!(pwm.init(&mut NoDelay, 10), Err(PwmError::InvalidFrequency));
        assert!(pwm.release().writes.is_empty());
    }

    #[test]
    fn test_pulse_write() {
        let mut pwm = Pca9685::new(MockBus::default(), DEFAULT_ADDRESS);
        pwm.init(&mut NoDelay, 50).unwrap();
        // 1500 us at 50 Hz = 307.2 ticks
        assert_eq!(pwm.ticks_for(1500), 307);
        pwm.set_pulse_us(3, 1500).unwrap();

        let bus = pwm.release();
        let (_, last) = bus.writes.last().unwrap();
        assert_eq!(last.as_slice(), &[0x06 + 12, 0, 0, 0x33, 0x01]);
    }

    #[test]
    fn test_set_off_and_channel_bounds() {
        let mut pwm = Pca9685::new(MockBus::default(), DEFAULT_ADDRESS);
        pwm.set_off(15).unwrap();
        assert_eq!(pwm.set_off(16), Err(PwmError::InvalidChannel));
        assert_eq!(pwm.set_pulse_us(16, 1000), Err(PwmError::InvalidChannel));

        let bus = pwm.release();
        assert_eq!(bus.writes.len(), 1);
        assert_eq!(bus.writes[0].1.as_slice(), &[0x06 + 60, 0, 0, 0, FULL_OFF]);
    }

    #[test]
    fn test_bus_error() {
        let mut pwm = Pca9685::new(MockBus::failing(), DEFAULT_ADDRESS);
        assert_eq!(
            pwm.set_pulse_us(0, 1500),
            Err(PwmError::Bus(ErrorKind::Other))
        );
    }
}
