use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use proximity_blinker::config::Args;
use proximity_blinker::line::Direction;
use proximity_blinker::shutdown::{self, Shutdown};
use proximity_blinker::utils::rpi_line::RpiLine;
use proximity_blinker::{Monitor, Rangefinder, SystemClock};
use rppal::gpio::Gpio;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // Before anything else spawns a thread, so the signal mask is inherited
    let (shutdown, trigger) = Shutdown::new();
    shutdown::listen_for_signals(trigger).context("Failed to set up signal handling")?;

    println!("Ultrasonic Measurement");

    let gpio = Gpio::new().context("Failed to open GPIO")?;
    let trig_echo = RpiLine::new(&gpio, args.trig_echo_pin, Direction::Output)
        .with_context(|| format!("Failed to claim trigger/echo GPIO {}", args.trig_echo_pin))?;
    let indicator = RpiLine::new(&gpio, args.indicator_pin, Direction::Output)
        .with_context(|| format!("Failed to claim indicator GPIO {}", args.indicator_pin))?;

    let rangefinder = Rangefinder::new(trig_echo, args.echo_timeout(), shutdown.clone())?;
    let mut monitor = Monitor::new(
        rangefinder,
        indicator,
        SystemClock::new(shutdown.clone()),
        shutdown.clone(),
    )?;

    let result = monitor.run(|reading| {
        println!("  Distance : {:.1} cm", reading.measurement.distance_cm);
    });
    if shutdown.is_requested() {
        println!("Stop");
    }
    monitor.release().context("Failed to release GPIO")?;
    result?;

    Ok(())
}
