//! Reading and writing the simulator clock block

use chrono::{Datelike, NaiveDateTime, Timelike};

use simsync_core::{compose_reading, SyncResult};

use crate::capability::MemoryAccess;
use crate::offsets;

/// Read the six clock fields and compose a calendar timestamp
///
/// Fails with `InvalidClock` while no scene is loaded and the fields
/// hold garbage.
pub fn read_clock<M: MemoryAccess>(mem: &mut M) -> SyncResult<NaiveDateTime> {
    let hour = mem.read_u8(offsets::HOUR)?;
    let minute = mem.read_u8(offsets::MINUTE)?;
    let second = mem.read_f32(offsets::SECOND)?;
    let day = mem.read_i32(offsets::DAY)?;
    let month = mem.read_i32(offsets::MONTH)?;
    let year = mem.read_i32(offsets::YEAR)?;

    compose_reading(year, month, day, hour, minute, second)
}

/// Write a timestamp into the six clock fields
///
/// Writes are not transactional; a detach mid-sequence leaves the clock
/// partially updated until the next tick corrects it. Time fields go
/// first, then date fields, and the order within the time group is
/// fixed: the full-width hour and minute writes each spill into the
/// following field, and the successor write repairs the spill.
pub fn write_clock<M: MemoryAccess>(mem: &mut M, time: NaiveDateTime) -> SyncResult<()> {
    mem.write_i32(offsets::HOUR, time.hour() as i32)?;
    mem.write_i32(offsets::MINUTE, time.minute() as i32)?;
    mem.write_f32(offsets::SECOND, time.second() as f32)?;

    mem.write_i32(offsets::DAY, time.day() as i32)?;
    mem.write_i32(offsets::MONTH, time.month() as i32)?;
    mem.write_i32(offsets::YEAR, time.year())?;

    Ok(())
}
