//! Build script for cadence-firmware
//!
//! - Adds the cortex-m-rt and defmt linker scripts
//! - Validates board.toml at compile time
//! - Emits the validated values as constants into `OUT_DIR/board_config.rs`

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use cadence_core::config::{
    DebounceConfig, MeasureConfig, ACCEL_INTERVAL, DEBOUNCE_DELAY, GYRO_INTERVAL, TEMP_INTERVAL,
};

fn main() {
    setup_linker();
    let config = load_config();
    let board = validate_config(&config);
    emit_config(&board);
}

/// Linker scripts for the binaries (memory.x comes from embassy-stm32)
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Values pulled out of board.toml
struct BoardValues {
    debounce: DebounceConfig,
    measure: MeasureConfig,
    baudrate: i64,
    imu_address: i64,
    gyro_range: i64,
    accel_range: i64,
    sample_rate_divider: i64,
}

/// Read and parse board.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the cadence-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Report every collected problem at once
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Integer field with a default and an inclusive range
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: i64,
    range: std::ops::RangeInclusive<i64>,
    errors: &mut Vec<String>,
) -> i64 {
    let value = match config.get(section).and_then(|s| s.get(key)) {
        None => return default,
        Some(toml::Value::Integer(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            return default;
        }
    };

    if !range.contains(&value) {
        errors.push(format!(
            "[{}] {} must be {}-{}",
            section,
            key,
            range.start(),
            range.end()
        ));
    }
    value
}

/// Delay field in ticks, checked against the core limits by the caller
fn delay(
    config: &toml::Value,
    section: &str,
    key: &str,
    default: u32,
    errors: &mut Vec<String>,
) -> u32 {
    let range = 0..=i64::from(u32::MAX);
    integer(config, section, key, i64::from(default), range, errors) as u32
}

/// Validate board.toml and collect its values
fn validate_config(config: &toml::Value) -> BoardValues {
    let mut errors = Vec::new();

    for section in ["debounce", "measure", "console", "imu"] {
        match config.get(section) {
            None | Some(toml::Value::Table(_)) => {}
            Some(_) => errors.push(format!("[{}] must be a table", section)),
        }
    }

    let debounce = DebounceConfig {
        settle: delay(config, "debounce", "settle_ms", DEBOUNCE_DELAY, &mut errors),
    };
    if let Err(e) = debounce.validate() {
        errors.push(format!("[debounce] settle_ms: {}", e));
    }

    let measure = MeasureConfig {
        gyro_interval: delay(config, "measure", "gyro_ms", GYRO_INTERVAL, &mut errors),
        accel_interval: delay(config, "measure", "accel_ms", ACCEL_INTERVAL, &mut errors),
        temp_interval: delay(config, "measure", "temp_ms", TEMP_INTERVAL, &mut errors),
    };
    if let Err(e) = measure.validate() {
        errors.push(format!("[measure] {}", e));
    }

    let board = BoardValues {
        debounce,
        measure,
        baudrate: integer(config, "console", "baudrate", 9600, 1200..=921_600, &mut errors),
        imu_address: integer(config, "imu", "address", 0x68, 0x68..=0x69, &mut errors),
        gyro_range: integer(config, "imu", "gyro_range", 0, 0..=3, &mut errors),
        accel_range: integer(config, "imu", "accel_range", 0, 0..=3, &mut errors),
        sample_rate_divider: integer(config, "imu", "sample_rate_divider", 7, 0..=255, &mut errors),
    };

    report("Invalid board configuration", &errors);
    println!("cargo:warning=board.toml validated successfully");
    board
}

/// Write the validated values as Rust constants
fn emit_config(board: &BoardValues) {
    let mut out = String::new();
    let _ = writeln!(out, "// Generated from board.toml by build.rs");
    let _ = writeln!(out, "pub const DEBOUNCE_SETTLE_MS: u32 = {};", board.debounce.settle);
    let _ = writeln!(out, "pub const GYRO_INTERVAL_MS: u32 = {};", board.measure.gyro_interval);
    let _ = writeln!(out, "pub const ACCEL_INTERVAL_MS: u32 = {};", board.measure.accel_interval);
    let _ = writeln!(out, "pub const TEMP_INTERVAL_MS: u32 = {};", board.measure.temp_interval);
    let _ = writeln!(out, "pub const CONSOLE_BAUDRATE: u32 = {};", board.baudrate);
    let _ = writeln!(out, "pub const IMU_ADDRESS: u8 = {:#04x};", board.imu_address);
    let _ = writeln!(out, "pub const IMU_GYRO_RANGE: u8 = {};", board.gyro_range);
    let _ = writeln!(out, "pub const IMU_ACCEL_RANGE: u8 = {};", board.accel_range);
    let _ = writeln!(
        out,
        "pub const IMU_SAMPLE_RATE_DIVIDER: u8 = {};",
        board.sample_rate_divider
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out_dir.join("board_config.rs"), out).expect("failed to write board_config.rs");
}
