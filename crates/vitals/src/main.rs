use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use vital_types::status;

use ppg_sensor::mock_bus::MockBus;
use ppg_sensor::{I2cBus, Max30102Driver, RppalI2cBus, SensorConfig};
use vital_types::FrameEncoder;
use vitals::{MonitorConfig, VitalMonitor};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run against a scripted mock bus instead of the hardware sensor
    #[arg(long)]
    mock: bool,

    /// Publish interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u32,

    /// I2C bus number the sensor is wired to
    #[arg(long, default_value_t = 1)]
    i2c_bus: u8,
}

/// Drives one scheduler iteration: feed the monitor, publish on cadence.
struct Scheduler {
    encoder: FrameEncoder,
    interval_ms: u32,
    last_publish_ms: u32,
}

impl Scheduler {
    fn new(interval_ms: u32) -> Self {
        Self {
            encoder: FrameEncoder::new(),
            interval_ms,
            last_publish_ms: 0,
        }
    }

    fn tick<B: I2cBus>(&mut self, monitor: &mut VitalMonitor<B>, now_ms: u32) -> Result<()> {
        monitor.update(now_ms);
        if now_ms.wrapping_sub(self.last_publish_ms) >= self.interval_ms {
            self.last_publish_ms = now_ms;
            let snapshot = monitor.snapshot();
            if snapshot.has_flag(status::SENSOR_ERROR) {
                if let Some(err) = monitor.last_error() {
                    warn!("sensor degraded: {}", err);
                }
            }
            let frame = self.encoder.encode(&snapshot);
            info!(
                "publish {} frame={:02X?}",
                serde_json::to_string(&snapshot)?,
                frame
            );
        }
        Ok(())
    }
}

/// Synthetic ~72 bpm pulse train for mock runs.
fn synth_sample(t_ms: u32) -> (u32, u32) {
    let phase = t_ms % 833;
    if phase < 40 {
        (54_000, 68_000)
    } else {
        (50_000, 60_000)
    }
}

fn run_mock(args: &Args) -> Result<()> {
    let driver = Max30102Driver::new(MockBus::new(), SensorConfig::default());
    let mut monitor = VitalMonitor::new(driver, MonitorConfig::default());
    monitor
        .initialize()
        .context("sensor initialization failed")?;
    info!("mock sensor ready, publishing every {} ms", args.interval_ms);

    let mut scheduler = Scheduler::new(args.interval_ms);
    let start = Instant::now();
    let mut last_sample_ms = 0u32;
    loop {
        let now_ms = start.elapsed().as_millis() as u32;
        // emulate the sensor filling its FIFO at ~25 Hz
        if now_ms.wrapping_sub(last_sample_ms) >= 40 {
            last_sample_ms = now_ms;
            let (red, ir) = synth_sample(now_ms);
            monitor.driver_mut().bus_mut().push_sample(red, ir);
        }
        scheduler.tick(&mut monitor, now_ms)?;
        std::thread::sleep(Duration::from_millis(20));
    }
}

fn run_hardware(args: &Args) -> Result<()> {
    let config = SensorConfig {
        i2c_bus: args.i2c_bus,
        ..Default::default()
    };
    let bus = RppalI2cBus::new(config.i2c_bus, config.device_address)
        .with_context(|| format!("failed to open I2C bus {}", config.i2c_bus))?;
    let driver = Max30102Driver::new(bus, config);
    let mut monitor = VitalMonitor::new(driver, MonitorConfig::default());
    monitor
        .initialize()
        .context("sensor initialization failed")?;
    info!("sensor initialized, publishing every {} ms", args.interval_ms);

    let mut scheduler = Scheduler::new(args.interval_ms);
    let start = Instant::now();
    loop {
        let now_ms = start.elapsed().as_millis() as u32;
        scheduler.tick(&mut monitor, now_ms)?;
        std::thread::sleep(Duration::from_millis(50));
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.mock {
        run_mock(&args)
    } else {
        run_hardware(&args)
    }
}
