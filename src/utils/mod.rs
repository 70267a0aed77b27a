/// Utilities Module
///
/// Hardware adapters for the traits the measurement loop is written against.
pub mod rpi_line;
