//! Fixed offsets of the simulator's clock fields
//!
//! All offsets are relative to the executable's load base. Field widths
//! differ between the read and write paths: hour and minute read back
//! as single bytes but the simulator accepts full-width integer writes
//! to them.

/// Hour of day; read as u8, written as i32
pub const HOUR: usize = 0x0046_176C;
/// Minute; read as u8, written as i32
pub const MINUTE: usize = 0x0046_176D;
/// Second with fractional part; f32
pub const SECOND: usize = 0x0046_1770;
/// Day of month; i32
pub const DAY: usize = 0x0046_1778;
/// Month; i32
pub const MONTH: usize = 0x0046_178C;
/// Four-digit year; i32
pub const YEAR: usize = 0x0046_1790;
