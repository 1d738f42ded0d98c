//! Headless probe: types bytes on the PS/2 keyboard port and services the
//! resulting VIA interrupts the way the KERNAL's keyboard driver does.

use std::process::ExitCode;

use clap::Parser;
use emu_core::{Observable, Tickable};
use log::info;
use x16_via::interrupts::{IFR_CA1, IRQ_SUMMARY};
use x16_via::ps2::{DEFAULT_HALF_PERIOD, FrameDecoder, Ps2Transmitter};
use x16_via::registers::{IER, ORA};
use x16_via::{BankLatch, IoConfig, ViaSelect, X16Io};

#[derive(Parser, Debug)]
#[command(name = "x16-via-probe", about = "Drive the X16 VIA pair with PS/2 keyboard traffic")]
struct Args {
    /// Bytes to send, in hex (e.g. `1C F0 1C`).
    #[arg(value_parser = parse_hex_byte, default_values = ["1C", "F0", "1C"])]
    bytes: Vec<u8>,

    /// PS/2 clock half-period in VIA ticks.
    #[arg(long, default_value_t = DEFAULT_HALF_PERIOD)]
    half_period: u32,

    /// Give up after this many ticks.
    #[arg(long, default_value_t = 1_000_000)]
    max_ticks: u64,

    /// Seed for the timer registers.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the VIA state after the run.
    #[arg(long)]
    dump: bool,
}

fn parse_hex_byte(s: &str) -> Result<u8, String> {
    let digits = s.trim_start_matches('$').trim_start_matches("0x");
    u8::from_str_radix(digits, 16).map_err(|e| format!("`{s}` is not a hex byte: {e}"))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = IoConfig {
        timer_seed: args.seed,
    };
    let mut io = X16Io::new(&config, BankLatch::default());
    let mut keyboard = Ps2Transmitter::new(args.half_period);
    let mut decoder = FrameDecoder::new();

    io.write(ViaSelect::Peripheral, IER, IRQ_SUMMARY | IFR_CA1);
    for &byte in &args.bytes {
        keyboard.send(byte);
    }

    let mut received = Vec::new();
    let mut interrupts = 0u64;
    while io.ticks() < args.max_ticks {
        keyboard.tick(&mut io.ps2[0]);
        io.tick();
        if io.irq_active() {
            interrupts += 1;
            // Reading Port A samples PA0 and acknowledges CA1.
            let pa = io.read(ViaSelect::Peripheral, ORA);
            match decoder.push(pa & 0x01 != 0) {
                Some(Ok(byte)) => {
                    info!("received ${byte:02X} at tick {}", io.ticks());
                    received.push(byte);
                }
                Some(Err(err)) => eprintln!("Frame error: {err}"),
                None => {}
            }
        }
        if keyboard.is_idle() && decoder.pending_bits() == 0 && received.len() == args.bytes.len()
        {
            break;
        }
    }

    println!(
        "sent:     {}",
        args.bytes.iter().map(|b| format!("${b:02X}")).collect::<Vec<_>>().join(" ")
    );
    println!(
        "received: {}",
        received.iter().map(|b| format!("${b:02X}")).collect::<Vec<_>>().join(" ")
    );
    println!("interrupts: {interrupts}, ticks: {}", io.ticks());

    if args.dump {
        for path in ["via2.ifr", "via2.ier", "via2.ddra", "via2.pa.readback", "via2.pb.readback"] {
            if let Some(value) = io.query(path) {
                println!("{path:18} {value}");
            }
        }
    }

    if received == args.bytes {
        ExitCode::SUCCESS
    } else {
        eprintln!("Mismatch between sent and received bytes");
        ExitCode::FAILURE
    }
}
