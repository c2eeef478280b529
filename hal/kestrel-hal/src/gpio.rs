//! GPIO pin abstractions
//!
//! Provides the pin identifier type shared by bus tables and the pin
//! multiplexing service the SPI driver uses to route pins to a peripheral.

use core::fmt;
use core::str::FromStr;

/// A GPIO pin identified by port letter and pin number
///
/// Displays and parses in the usual `"PB14"` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin {
    port: u8,
    number: u8,
}

impl Pin {
    /// Highest port letter present on any supported chip
    pub const LAST_PORT: char = 'K';

    /// Create a pin from a port letter (`'A'..='K'`) and number (`0..=15`)
    ///
    /// Panics at compile time when used in a const context with an invalid
    /// port or number.
    pub const fn new(port: char, number: u8) -> Self {
        assert!(port >= 'A' && port <= Self::LAST_PORT);
        assert!(number < 16);
        Self {
            port: port as u8 - b'A',
            number,
        }
    }

    /// Port letter (`'A'`, `'B'`, ...)
    pub fn port(&self) -> char {
        (b'A' + self.port) as char
    }

    /// Pin number within the port
    pub fn number(&self) -> u8 {
        self.number
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port(), self.number)
    }
}

/// Error from parsing a pin name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinParseError {
    /// Name does not start with `P` or is too short
    Format,
    /// Port letter outside `A..=K`
    Port,
    /// Pin number missing or above 15
    Number,
}

impl FromStr for Pin {
    type Err = PinParseError;

    /// Parse a pin name such as `"PA6"` or `"pc11"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();

        match chars.next() {
            Some('P') | Some('p') => {}
            _ => return Err(PinParseError::Format),
        }

        let port = chars
            .next()
            .ok_or(PinParseError::Format)?
            .to_ascii_uppercase();
        if !('A'..=Self::LAST_PORT).contains(&port) {
            return Err(PinParseError::Port);
        }

        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PinParseError::Number);
        }
        let number: u8 = digits.parse().map_err(|_| PinParseError::Number)?;
        if number > 15 {
            return Err(PinParseError::Number);
        }

        Ok(Pin::new(port, number))
    }
}

/// Pin alternate-function routing
///
/// Implementations must tolerate redundant calls with the same arguments.
pub trait PinMux {
    /// Route `pin` to alternate function `function`
    ///
    /// `input` selects an input-capable configuration (no output drive),
    /// otherwise the pin is configured as a push-pull alternate output.
    fn set_function(&mut self, pin: Pin, function: u8, input: bool);
}
