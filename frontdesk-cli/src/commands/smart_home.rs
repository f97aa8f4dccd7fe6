//! Smart-home device menu.
//!
//! Devices live in memory while the menu runs and are saved to or loaded
//! from `devices.txt` in the data directory on request.

use crate::console::{finish, stdio_console, ActionResult, Console};
use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};
use chrono::{Local, NaiveTime};
use clap::Args;
use frontdesk::programs::smarthome::{
    AcMode, Adjustment, Device, DeviceKind, DeviceRegistry, Schedule, Scheduler,
    DEVICES_FILE_NAME,
};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Control lights, fans and air conditioners interactively.
#[derive(Args)]
pub struct SmartHomeCommand {}

impl SmartHomeCommand {
    /// Execute the smart-home menu on stdin/stdout.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let path = resolve_data_dir(global)?.join(DEVICES_FILE_NAME);
        let registry = Arc::new(Mutex::new(DeviceRegistry::new()));
        let scheduler =
            Scheduler::new(Arc::clone(&registry)).with_notifier(|message| println!("\n{message}"));
        finish(run(
            &mut stdio_console(),
            &registry,
            &scheduler,
            &path,
            || Local::now().time(),
        ))
    }
}

fn lock(registry: &Mutex<DeviceRegistry>) -> MutexGuard<'_, DeviceRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

fn ask_kind<R: BufRead, W: Write>(console: &mut Console<R, W>) -> ActionResult<DeviceKind> {
    let label = console.ask("Type (Light/Fan/AC): ")?;
    let kind = match label.to_ascii_lowercase().as_str() {
        "light" => DeviceKind::light(console.ask_number("brightness", "Brightness (0-100): ")?)?,
        "fan" => DeviceKind::fan(console.ask_number("speed", "Speed (1-5): ")?)?,
        "ac" => {
            let temperature = console.ask_number("temperature", "Temperature (16-30): ")?;
            let mode: AcMode = console.ask_parsed("Mode (Cool/Heat/Fan): ")?;
            DeviceKind::ac(temperature, mode)?
        }
        _ => {
            let message = format!("unknown device type '{label}'");
            return Err(frontdesk::Error::validation("kind", message).into());
        }
    };
    Ok(kind)
}

fn ask_adjustment<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    kind: DeviceKind,
) -> ActionResult<Adjustment> {
    let adjustment = match kind {
        DeviceKind::Light { .. } => {
            Adjustment::Brightness(console.ask_number("brightness", "New brightness (0-100): ")?)
        }
        DeviceKind::Fan { .. } => {
            Adjustment::Speed(console.ask_number("speed", "New speed (1-5): ")?)
        }
        DeviceKind::Ac { .. } => Adjustment::Climate {
            temperature: console.ask_number("temperature", "New temperature (16-30): ")?,
            mode: console.ask_parsed("New mode (Cool/Heat/Fan): ")?,
        },
    };
    Ok(adjustment)
}

/// Runs the smart-home menu until "Exit" or end of input.
///
/// `now` supplies the wall-clock time schedules are measured from.
pub fn run<R, W, N>(
    console: &mut Console<R, W>,
    registry: &Mutex<DeviceRegistry>,
    scheduler: &Scheduler,
    devices_path: &Path,
    now: N,
) -> ActionResult
where
    R: BufRead,
    W: Write,
    N: Fn() -> NaiveTime,
{
    console.run_menu(
        "Smart Home Controller",
        &[
            "Add Device",
            "Turn Device ON/OFF",
            "Adjust Device",
            "View All Devices",
            "Save Devices",
            "Load Devices",
            "Schedule Device",
            "Exit",
        ],
        |console, choice| {
            match choice {
                1 => {
                    let id = console.ask("Device ID: ")?;
                    let name = console.ask("Device name: ")?;
                    let kind = ask_kind(console)?;
                    lock(registry).add(Device::new(&id, &name, kind)?)?;
                    console.say("Device added.")?;
                }
                2 => {
                    let id = console.ask("Device ID: ")?;
                    let on = console.confirm("Turn ON? (y/n): ")?;
                    let line = lock(registry).toggle(&id, on)?.details();
                    console.say(line)?;
                }
                3 => {
                    let id = console.ask("Device ID: ")?;
                    let kind = lock(registry).get(&id)?.kind;
                    let adjustment = ask_adjustment(console, kind)?;
                    let line = lock(registry).adjust(&id, adjustment)?.details();
                    console.say(line)?;
                }
                4 => {
                    let lines: Vec<String> =
                        lock(registry).list().iter().map(Device::details).collect();
                    console.show_all(&lines, "No devices added.")?;
                }
                5 => {
                    lock(registry).save(devices_path)?;
                    console.say(format!("Devices saved to {}.", devices_path.display()))?;
                }
                6 => {
                    let loaded = DeviceRegistry::load(devices_path)?;
                    let count = loaded.list().len();
                    *lock(registry) = loaded;
                    console.say(format!("Loaded {count} device(s)."))?;
                }
                _ => {
                    let id = console.ask("Device ID: ")?;
                    let instruction = console.ask("Instruction (e.g. Turn ON at 7:30 PM): ")?;
                    let schedule = Schedule::parse(&instruction)?;
                    scheduler.schedule(&id, schedule, now())?;
                    console.say(format!("Scheduled: {schedule}"))?;
                }
            }
            Ok(())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn run_script(registry: &Arc<Mutex<DeviceRegistry>>, path: &Path, script: &str) -> String {
        let scheduler = Scheduler::new(Arc::clone(registry));
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let noon = || NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        finish(run(&mut console, registry, &scheduler, path, noon)).unwrap();
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn test_add_toggle_adjust() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(Mutex::new(DeviceRegistry::new()));
        let out = run_script(
            &registry,
            &dir.path().join(DEVICES_FILE_NAME),
            "1\nL1\nLamp\nlight\n70\n2\nL1\ny\n3\nL1\n40\n4\n8\n",
        );
        assert!(out.contains("Device added."));
        assert!(out.contains("[L1] Lamp - ON, Brightness: 70"));
        assert!(out.contains("[L1] Lamp - ON, Brightness: 40"));
    }

    #[test]
    fn test_save_then_load_in_new_session() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEVICES_FILE_NAME);
        let first = Arc::new(Mutex::new(DeviceRegistry::new()));
        run_script(&first, &path, "1\nA1\nAircon\nAC\n24\ncool\n5\n8\n");

        let second = Arc::new(Mutex::new(DeviceRegistry::new()));
        let out = run_script(&second, &path, "6\n4\n8\n");
        assert!(out.contains("Loaded 1 device(s)."));
        assert!(out.contains("[A1] Aircon - OFF, Temp: 24, Mode: Cool"));
    }

    #[test]
    fn test_load_without_file_reports_error() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(Mutex::new(DeviceRegistry::new()));
        let out = run_script(&registry, &dir.path().join(DEVICES_FILE_NAME), "6\n8\n");
        assert!(out.contains("Error: devices file"));
    }

    #[test]
    fn test_bad_schedule_instruction() {
        let dir = tempdir().unwrap();
        let registry = Arc::new(Mutex::new(DeviceRegistry::new()));
        let out = run_script(
            &registry,
            &dir.path().join(DEVICES_FILE_NAME),
            "1\nF1\nFan\nfan\n2\n7\nF1\nswitch it on\n8\n",
        );
        assert!(out.contains("Error: validation error for 'schedule'"));
    }
}
