//! CSV export of the generated tables.
//!
//! Each writer emits a header row followed by one line per row. Dates use
//! `YYYY-MM-DD`, floats use the shortest text that parses back to the same
//! value, and an absent event id is an empty field.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::calendar::DATE_FORMAT;
use crate::config::OutputPaths;
use crate::consumption::ConsumptionRecord;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::events::GalacticEvent;
use crate::weather::WeatherTable;

pub const EVENTS_HEADER: &str = "event_id,date,event_type,intensity";
pub const WEATHER_HEADER: &str = "date,avg_temperature_celsius,solar_radiation_kwh_m2";
pub const CONSUMPTION_HEADER: &str =
    "date,resource,quantity,temperature,solar_radiation,event_id";

/// Plain decimal float text that always carries a decimal point
/// (`-80` becomes `-80.0`). Never uses exponent notation.
fn format_float(value: f64) -> String {
    let text = format!("{}", value);
    if value.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}

pub fn write_events<W: Write>(out: &mut W, events: &[GalacticEvent]) -> io::Result<()> {
    writeln!(out, "{}", EVENTS_HEADER)?;
    for event in events {
        writeln!(
            out,
            "{},{},{},{}",
            event.event_id,
            event.date.format(DATE_FORMAT),
            event.event_type,
            event.intensity
        )?;
    }
    Ok(())
}

pub fn write_weather<W: Write>(out: &mut W, weather: &WeatherTable) -> io::Result<()> {
    writeln!(out, "{}", WEATHER_HEADER)?;
    for day in weather.iter() {
        writeln!(
            out,
            "{},{},{}",
            day.date.format(DATE_FORMAT),
            format_float(day.avg_temperature_celsius),
            format_float(day.solar_radiation_kwh_m2)
        )?;
    }
    Ok(())
}

pub fn write_consumption<W: Write>(out: &mut W, records: &[ConsumptionRecord]) -> io::Result<()> {
    writeln!(out, "{}", CONSUMPTION_HEADER)?;
    for record in records {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            record.date.format(DATE_FORMAT),
            record.resource,
            format_float(record.quantity),
            format_float(record.temperature),
            format_float(record.solar_radiation),
            record.event_id.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

/// Sibling path used while a table is being written.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_staged<F>(path: &Path, write: F) -> io::Result<PathBuf>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let staging = staging_path(path);
    let mut out = BufWriter::new(File::create(&staging)?);
    write(&mut out)?;
    out.flush()?;
    Ok(staging)
}

/// Sibling path holding the previous table while new ones are moved in.
fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".bak");
    path.with_file_name(name)
}

/// Write all three tables.
///
/// Tables are staged next to their destination and only moved into place
/// once every one of them has been written. If moving any table fails, the
/// tables already moved are put back, so either all three files are new or
/// all three are as they were, and no staging files remain.
pub fn write_dataset(dataset: &Dataset, paths: &OutputPaths) -> Result<()> {
    let targets = paths.all();
    let result = stage_all(dataset, paths).and_then(|staged| commit(&staged, &targets));

    if let Err(e) = result {
        warn!("Failed to write tables, discarding staged files: {}", e);
        for path in targets {
            let _ = fs::remove_file(staging_path(path));
        }
        return Err(e.into());
    }

    for target in targets {
        info!("Wrote {}", target.display());
    }
    Ok(())
}

/// Move staged tables onto their targets, all or nothing.
fn commit(staged: &[PathBuf; 3], targets: &[&Path; 3]) -> io::Result<()> {
    for target in targets {
        if target.exists() && !target.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} exists and is not a file", target.display()),
            ));
        }
    }

    // (target, whether a previous table was moved aside)
    let mut committed: Vec<(&Path, bool)> = Vec::with_capacity(targets.len());
    for (staging, &target) in staged.iter().zip(targets) {
        let had_previous = target.exists();
        if had_previous {
            if let Err(e) = fs::rename(target, backup_path(target)) {
                rollback(&committed);
                return Err(e);
            }
        }
        if let Err(e) = fs::rename(staging, target) {
            if had_previous {
                let _ = fs::rename(backup_path(target), target);
            }
            rollback(&committed);
            return Err(e);
        }
        committed.push((target, had_previous));
    }

    for (target, had_previous) in committed {
        if had_previous {
            let _ = fs::remove_file(backup_path(target));
        }
    }
    Ok(())
}

/// Undo moved tables, newest first, restoring the previous files.
fn rollback(committed: &[(&Path, bool)]) {
    for &(target, had_previous) in committed.iter().rev() {
        let restored = if had_previous {
            fs::rename(backup_path(target), target)
        } else {
            fs::remove_file(target)
        };
        if let Err(e) = restored {
            warn!("Could not restore {}: {}", target.display(), e);
        }
    }
}

fn stage_all(dataset: &Dataset, paths: &OutputPaths) -> io::Result<[PathBuf; 3]> {
    let consumption = write_staged(&paths.consumption, |out| {
        write_consumption(out, &dataset.consumption)
    })?;
    let weather = write_staged(&paths.weather, |out| write_weather(out, &dataset.weather))?;
    let events = write_staged(&paths.events, |out| write_events(out, &dataset.events))?;
    Ok([consumption, weather, events])
}
