//! Smart-home device controller.
//!
//! Devices live in memory in a [`DeviceRegistry`] and are saved to and
//! loaded from a pipe-delimited file, one device per line:
//! `id|name|ON|KIND|p1|p2`. A [`Scheduler`] can switch a device on or off
//! later from a background thread.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{NaiveTime, TimeDelta};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::flatfile::{read_records, split_fields, text_field, write_lines, DELIMITER};
use crate::validate::{in_range, parse_number};

/// File name under the data directory.
pub const DEVICES_FILE_NAME: &str = "devices.txt";

text_enum! {
    /// Air-conditioner operating mode.
    pub enum AcMode as "mode" {
        /// Cooling.
        Cool => "Cool",
        /// Heating.
        Heat => "Heat",
        /// Fan only.
        Fan => "Fan",
    }
}

/// Device kind with its adjustable settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum DeviceKind {
    /// Dimmable light, brightness 0..=100.
    Light {
        /// Brightness percentage.
        brightness: u8,
    },
    /// Ceiling fan, speed 1..=5.
    Fan {
        /// Speed step.
        speed: u8,
    },
    /// Air conditioner, 16..=30 degrees.
    Ac {
        /// Target temperature.
        temperature: u8,
        /// Operating mode.
        mode: AcMode,
    },
}

impl DeviceKind {
    /// A light at `brightness`.
    ///
    /// # Errors
    ///
    /// Returns a validation error outside 0..=100.
    pub fn light(brightness: u8) -> Result<Self> {
        Ok(Self::Light {
            brightness: in_range("brightness", brightness, 0, 100)?,
        })
    }

    /// A fan at `speed`.
    ///
    /// # Errors
    ///
    /// Returns a validation error outside 1..=5.
    pub fn fan(speed: u8) -> Result<Self> {
        Ok(Self::Fan {
            speed: in_range("speed", speed, 1, 5)?,
        })
    }

    /// An air conditioner at `temperature` in `mode`.
    ///
    /// # Errors
    ///
    /// Returns a validation error outside 16..=30 degrees.
    pub fn ac(temperature: u8, mode: AcMode) -> Result<Self> {
        Ok(Self::Ac {
            temperature: in_range("temperature", temperature, 16, 30)?,
            mode,
        })
    }

    /// Label written to the devices file.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Light { .. } => "LIGHT",
            Self::Fan { .. } => "FAN",
            Self::Ac { .. } => "AC",
        }
    }

    fn settings(&self) -> String {
        match self {
            Self::Light { brightness } => format!("Brightness: {brightness}"),
            Self::Fan { speed } => format!("Speed: {speed}"),
            Self::Ac { temperature, mode } => format!("Temp: {temperature}, Mode: {mode}"),
        }
    }

    fn fields(&self) -> (String, String) {
        match self {
            Self::Light { brightness } => (brightness.to_string(), String::new()),
            Self::Fan { speed } => (speed.to_string(), String::new()),
            Self::Ac { temperature, mode } => (temperature.to_string(), mode.to_string()),
        }
    }
}

/// A new setting for one device. Must match the device's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Light brightness.
    Brightness(u8),
    /// Fan speed.
    Speed(u8),
    /// Air-conditioner temperature and mode.
    Climate {
        /// Target temperature.
        temperature: u8,
        /// Operating mode.
        mode: AcMode,
    },
}

/// One controllable device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    /// Identifier, unique ignoring case.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Power state.
    pub on: bool,
    /// Kind and settings.
    #[serde(flatten)]
    pub kind: DeviceKind,
}

impl Device {
    /// Builds a validated device that starts switched off.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank text or text containing `|`.
    pub fn new(id: &str, name: &str, kind: DeviceKind) -> Result<Self> {
        Ok(Self {
            id: text_field("id", id)?,
            name: text_field("name", name)?,
            on: false,
            kind,
        })
    }

    /// `"ON"` or `"OFF"`.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        if self.on {
            "ON"
        } else {
            "OFF"
        }
    }

    /// One-line summary, e.g. `[L1] Lamp - ON, Brightness: 70`.
    #[must_use]
    pub fn details(&self) -> String {
        self.to_string()
    }

    fn to_line(&self) -> String {
        let (first, second) = self.kind.fields();
        let d = DELIMITER;
        format!(
            "{}{d}{}{d}{}{d}{}{d}{first}{d}{second}",
            self.id,
            self.name,
            self.status(),
            self.kind.label()
        )
    }

    fn from_line(line_no: usize, line: &str) -> Result<Self> {
        let fields = split_fields(line_no, line, 6)?;
        let on = match fields[2].to_ascii_uppercase().as_str() {
            "ON" => true,
            "OFF" => false,
            other => {
                return Err(Error::MalformedRecord {
                    line: line_no,
                    reason: format!("unknown status '{other}'"),
                })
            }
        };
        let kind = match fields[3].to_ascii_uppercase().as_str() {
            "LIGHT" => DeviceKind::light(parse_number("brightness", fields[4])?)?,
            "FAN" => DeviceKind::fan(parse_number("speed", fields[4])?)?,
            "AC" => DeviceKind::ac(parse_number("temperature", fields[4])?, fields[5].parse()?)?,
            other => {
                return Err(Error::MalformedRecord {
                    line: line_no,
                    reason: format!("unknown device kind '{other}'"),
                })
            }
        };
        let mut device = Self::new(fields[0], fields[1], kind)?;
        device.on = on;
        Ok(device)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {}, {}",
            self.id,
            self.name,
            self.status(),
            self.kind.settings()
        )
    }
}

/// Devices in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Duplicate`] when the id is taken in any case.
    pub fn add(&mut self, device: Device) -> Result<()> {
        if self.position(&device.id).is_some() {
            return Err(Error::duplicate("device", device.id));
        }
        log::debug!("added device '{}'", device.id);
        self.devices.push(device);
        Ok(())
    }

    /// Looks up a device ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn get(&self, id: &str) -> Result<&Device> {
        self.position(id)
            .map(|i| &self.devices[i])
            .ok_or_else(|| Error::not_found("device", id.trim()))
    }

    /// Switches a device on or off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn toggle(&mut self, id: &str, on: bool) -> Result<&Device> {
        let device = self.get_mut(id)?;
        device.on = on;
        log::debug!("device '{}' switched {}", device.id, device.status());
        Ok(device)
    }

    /// Applies a kind-specific setting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, or a validation error
    /// when the value is out of range or does not fit the device's kind.
    pub fn adjust(&mut self, id: &str, adjustment: Adjustment) -> Result<&Device> {
        let device = self.get_mut(id)?;
        device.kind = match (device.kind, adjustment) {
            (DeviceKind::Light { .. }, Adjustment::Brightness(b)) => DeviceKind::light(b)?,
            (DeviceKind::Fan { .. }, Adjustment::Speed(s)) => DeviceKind::fan(s)?,
            (DeviceKind::Ac { .. }, Adjustment::Climate { temperature, mode }) => {
                DeviceKind::ac(temperature, mode)?
            }
            (kind, _) => {
                return Err(Error::validation(
                    "adjustment",
                    format!("does not apply to a {} device", kind.label()),
                ))
            }
        };
        log::debug!("device '{}' adjusted: {}", device.id, device.kind.settings());
        Ok(device)
    }

    /// Every device in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Device] {
        &self.devices
    }

    /// Writes every device to `path`, replacing the file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_lines(path, self.devices.iter().map(Device::to_line))?;
        log::debug!("saved {} devices to {}", self.devices.len(), path.display());
        Ok(())
    }

    /// Reads a registry from `path`.
    ///
    /// Malformed lines and repeated ids are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the file does not exist, or an I/O
    /// error when it cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::not_found("devices file", path.display().to_string()));
        }
        let mut registry = Self::new();
        for device in read_records(path, Device::from_line)? {
            let id = device.id.clone();
            if registry.add(device).is_err() {
                log::warn!("{}: skipping repeated device id '{id}'", path.display());
            }
        }
        Ok(registry)
    }

    fn position(&self, id: &str) -> Option<usize> {
        let id = id.trim();
        self.devices
            .iter()
            .position(|d| d.id.eq_ignore_ascii_case(id))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Device> {
        match self.position(id) {
            Some(i) => Ok(&mut self.devices[i]),
            None => Err(Error::not_found("device", id.trim())),
        }
    }
}

/// A parsed "Turn ON at 7:30 PM" instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Switch on (`true`) or off.
    pub turn_on: bool,
    /// Wall-clock time to act at.
    pub at: NaiveTime,
}

impl Schedule {
    /// Parses `Turn ON|OFF at h:mm AM|PM`, ignoring case. A 24-hour `HH:MM`
    /// time is accepted too.
    ///
    /// # Errors
    ///
    /// Returns a validation error for any other shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveTime;
    /// use frontdesk::programs::smarthome::Schedule;
    ///
    /// let s = Schedule::parse("turn on at 7:30 pm").unwrap();
    /// assert!(s.turn_on);
    /// assert_eq!(s.at, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::validation("schedule", "expected 'Turn ON|OFF at h:mm AM|PM'");

        let normalized = input.trim().to_ascii_uppercase();
        let (action, time) = normalized.split_once(" AT ").ok_or_else(invalid)?;
        let turn_on = match action.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["TURN", "ON"] => true,
            ["TURN", "OFF"] => false,
            _ => return Err(invalid()),
        };
        let time = time.trim();
        let at = NaiveTime::parse_from_str(time, "%I:%M %p")
            .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M"))
            .map_err(|_| invalid())?;
        Ok(Self { turn_on, at })
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.turn_on { "ON" } else { "OFF" };
        write!(f, "Turn {state} at {}", self.at.format("%-I:%M %p"))
    }
}

/// Time from `now` until the next occurrence of `target`; a target earlier
/// in the day than `now` falls on the next day.
///
/// ```
/// use chrono::NaiveTime;
/// use frontdesk::programs::smarthome::delay_until;
/// use std::time::Duration;
///
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// assert_eq!(delay_until(t(8, 0), t(9, 30)), Duration::from_secs(5400));
/// assert_eq!(delay_until(t(23, 0), t(1, 0)), Duration::from_secs(7200));
/// ```
#[must_use]
pub fn delay_until(now: NaiveTime, target: NaiveTime) -> Duration {
    let mut delta = target.signed_duration_since(now);
    if delta < TimeDelta::zero() {
        delta += TimeDelta::days(1);
    }
    delta.to_std().unwrap_or_default()
}

type Notifier = Arc<dyn Fn(&str) + Send + Sync>;

/// Fires one-shot schedules against a shared registry.
#[derive(Clone)]
pub struct Scheduler {
    registry: Arc<Mutex<DeviceRegistry>>,
    notify: Option<Notifier>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("registry", &self.registry)
            .field("notify", &self.notify.is_some())
            .finish()
    }
}

impl Scheduler {
    /// A scheduler acting on `registry`.
    #[must_use]
    pub fn new(registry: Arc<Mutex<DeviceRegistry>>) -> Self {
        Self {
            registry,
            notify: None,
        }
    }

    /// Calls `notify` with a message like `[Scheduled] Lamp is now ON` each
    /// time a schedule fires.
    #[must_use]
    pub fn with_notifier<F>(mut self, notify: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.notify = Some(Arc::new(notify));
        self
    }

    /// Runs `schedule` on `device_id` at its next occurrence after `now`.
    ///
    /// The timer thread is detached; the handle is returned for callers
    /// that want to wait on it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the device is unknown right now.
    pub fn schedule(
        &self,
        device_id: &str,
        schedule: Schedule,
        now: NaiveTime,
    ) -> Result<JoinHandle<()>> {
        self.schedule_in(device_id, schedule.turn_on, delay_until(now, schedule.at))
    }

    /// Switches `device_id` after `delay`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the device is unknown right now.
    pub fn schedule_in(
        &self,
        device_id: &str,
        turn_on: bool,
        delay: Duration,
    ) -> Result<JoinHandle<()>> {
        let id = {
            let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.get(device_id)?.id.clone()
        };
        log::debug!(
            "scheduled device '{id}' {} in {}s",
            if turn_on { "ON" } else { "OFF" },
            delay.as_secs()
        );

        let registry = Arc::clone(&self.registry);
        let notify = self.notify.clone();
        Ok(thread::spawn(move || {
            thread::sleep(delay);
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            match registry.toggle(&id, turn_on) {
                Ok(device) => {
                    let message = format!("[Scheduled] {} is now {}", device.name, device.status());
                    log::info!("{message}");
                    if let Some(notify) = notify {
                        notify(&message);
                    }
                }
                Err(e) => log::warn!("scheduled action for '{id}' skipped: {e}"),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn sample() -> DeviceRegistry {
        let mut registry = DeviceRegistry::new();
        registry
            .add(Device::new("L1", "Lamp", DeviceKind::light(70).unwrap()).unwrap())
            .unwrap();
        registry
            .add(Device::new("F1", "Ceiling Fan", DeviceKind::fan(2).unwrap()).unwrap())
            .unwrap();
        registry
            .add(Device::new("A1", "Aircon", DeviceKind::ac(24, AcMode::Cool).unwrap()).unwrap())
            .unwrap();
        registry
    }

    #[test]
    fn test_kind_ranges() {
        assert!(DeviceKind::light(101).is_err());
        assert!(DeviceKind::fan(0).is_err());
        assert!(DeviceKind::fan(6).is_err());
        assert!(DeviceKind::ac(15, AcMode::Heat).is_err());
        assert!(DeviceKind::ac(30, AcMode::Heat).is_ok());
    }

    #[test]
    fn test_duplicate_ids_ignore_case() {
        let mut registry = sample();
        let dup = Device::new("l1", "Other", DeviceKind::light(1).unwrap()).unwrap();
        assert!(registry.add(dup).unwrap_err().is_duplicate());
    }

    #[test]
    fn test_toggle_and_details() {
        let mut registry = sample();
        registry.toggle("l1", true).unwrap();
        assert_eq!(
            registry.get("L1").unwrap().details(),
            "[L1] Lamp - ON, Brightness: 70"
        );
        assert_eq!(
            registry.get("A1").unwrap().details(),
            "[A1] Aircon - OFF, Temp: 24, Mode: Cool"
        );
        assert!(registry.toggle("X", true).unwrap_err().is_not_found());
    }

    #[test]
    fn test_adjust_must_match_kind() {
        let mut registry = sample();
        registry.adjust("F1", Adjustment::Speed(5)).unwrap();
        assert_eq!(registry.get("F1").unwrap().kind, DeviceKind::Fan { speed: 5 });
        assert!(registry.adjust("F1", Adjustment::Speed(9)).is_err());
        assert!(registry.adjust("F1", Adjustment::Brightness(10)).is_err());
        registry
            .adjust(
                "A1",
                Adjustment::Climate {
                    temperature: 18,
                    mode: AcMode::Fan,
                },
            )
            .unwrap();
        assert_eq!(
            registry.get("A1").unwrap().details(),
            "[A1] Aircon - OFF, Temp: 18, Mode: Fan"
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEVICES_FILE_NAME);
        let mut registry = sample();
        registry.toggle("A1", true).unwrap();
        registry.save(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("A1|Aircon|ON|AC|24|Cool"));
        assert!(text.contains("L1|Lamp|OFF|LIGHT|70|"));

        assert_eq!(DeviceRegistry::load(&path).unwrap(), registry);
    }

    #[test]
    fn test_load_skips_bad_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(DEVICES_FILE_NAME);
        fs::write(
            &path,
            "L1|Lamp|ON|LIGHT|50|\nbad line\nF1|Fan|OFF|FAN|9|\nl1|Again|ON|LIGHT|1|\nX|Oven|ON|OVEN|1|\n",
        )
        .unwrap();
        let registry = DeviceRegistry::load(&path).unwrap();
        assert_eq!(registry.list().len(), 1);
        assert!(registry.get("L1").unwrap().on);

        assert!(DeviceRegistry::load(&dir.path().join("none.txt"))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_schedule_parse() {
        let s = Schedule::parse("Turn OFF at 12:05 AM").unwrap();
        assert!(!s.turn_on);
        assert_eq!(s.at, t(0, 5));
        assert_eq!(Schedule::parse("TURN ON AT 18:45").unwrap().at, t(18, 45));
        assert_eq!(s.to_string(), "Turn OFF at 12:05 AM");
        assert!(Schedule::parse("Switch on at 7:00 PM").is_err());
        assert!(Schedule::parse("Turn ON 7:00 PM").is_err());
        assert!(Schedule::parse("Turn ON at 25:00").is_err());
    }

    #[test]
    fn test_delay_until_wraps() {
        assert_eq!(delay_until(t(10, 0), t(10, 0)), Duration::ZERO);
        assert_eq!(delay_until(t(10, 1), t(10, 0)), Duration::from_secs(86_340));
    }

    #[test]
    fn test_scheduler_fires_once() {
        let registry = Arc::new(Mutex::new(sample()));
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        let scheduler = Scheduler::new(Arc::clone(&registry))
            .with_notifier(move |m| sink.lock().unwrap().push(m.to_string()));

        let handle = scheduler
            .schedule_in("l1", true, Duration::from_millis(10))
            .unwrap();
        handle.join().unwrap();

        assert!(registry.lock().unwrap().get("L1").unwrap().on);
        assert_eq!(*fired.lock().unwrap(), ["[Scheduled] Lamp is now ON"]);
        assert!(scheduler
            .schedule_in("nope", true, Duration::ZERO)
            .unwrap_err()
            .is_not_found());
    }
}
